//! Response parsing and expansion logic

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{
    Attribute, Expr, ExprLit, ExprUnary, Field, Ident, Lit, LitInt, LitStr, MetaNameValue, Token,
    UnOp, Visibility, braced, parse::ParseStream, punctuated::Punctuated, spanned::Spanned,
};

/// Pattern for one status byte
#[derive(Debug, Clone)]
pub(crate) enum SwPattern {
    /// `_`
    Any,
    /// A literal byte
    Exact(u8),
    /// `!byte`, anything but the literal
    Not(u8),
    /// A byte constant
    Path(Expr),
}

/// Status word annotation of a variant
#[derive(Debug, Clone)]
pub(crate) enum SwAnnotation {
    /// `#[sw(sw1, sw2)]`
    Bytes(SwPattern, SwPattern),
    /// `#[sw(CONSTANT)]` naming a `StatusWord`
    Word(Expr),
}

/// Response variant
pub(crate) struct ResponseVariant {
    /// Variant name
    pub name: Ident,
    /// Status word the variant is selected by
    pub sw: SwAnnotation,
    /// Named fields, empty for a unit variant
    pub fields: Vec<Field>,
    /// Field receiving the response data
    pub payload_field: Option<Ident>,
    /// Documentation attributes
    pub doc_attrs: Vec<Attribute>,
    /// `#[error(..)]` of an error variant
    pub error_attr: Option<Attribute>,
}

/// Response definition parsed from the `response` block
pub(crate) struct ResponseDef {
    /// Success variants
    pub ok_variants: Vec<ResponseVariant>,
    /// Error variants
    pub error_variants: Vec<ResponseVariant>,
}

impl ResponseDef {
    /// Parse a response definition from a ParseStream
    pub(crate) fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let mut ok_variants = Vec::new();
        let mut error_variants = Vec::new();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            let content;
            braced!(content in input);

            match key.to_string().as_str() {
                "ok" => ok_variants.extend(parse_variants(&content, false)?),
                "errors" => error_variants.extend(parse_variants(&content, true)?),
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("Unknown response field: {key}"),
                    ));
                }
            }

            if !input.is_empty() {
                let _ = input.parse::<Token![,]>();
            }
        }

        if ok_variants.is_empty() && error_variants.is_empty() {
            return Err(syn::Error::new(
                Span::call_site(),
                "Response must have at least one variant in either 'ok' or 'errors' section",
            ));
        }

        Ok(Self {
            ok_variants,
            error_variants,
        })
    }

    fn variants(&self) -> impl Iterator<Item = (&ResponseVariant, bool)> {
        self.ok_variants
            .iter()
            .map(|v| (v, false))
            .chain(self.error_variants.iter().map(|v| (v, true)))
    }
}

fn parse_variants(input: ParseStream<'_>, is_error: bool) -> syn::Result<Vec<ResponseVariant>> {
    let mut variants = Vec::new();

    while !input.is_empty() {
        let attrs = input.call(Attribute::parse_outer)?;
        let name: Ident = input.parse()?;

        let mut sw = None;
        let mut payload_field = None;
        let mut error_attr = None;
        let mut doc_attrs = Vec::new();

        for attr in attrs {
            if attr.path().is_ident("sw") {
                sw = Some(parse_sw_attribute(&attr)?);
            } else if attr.path().is_ident("payload") {
                payload_field = Some(parse_payload_attribute(&attr)?);
            } else if attr.path().is_ident("error") && is_error {
                attr.parse_args::<LitStr>().map_err(|_| {
                    syn::Error::new(attr.span(), "Expected #[error(\"message\")] format")
                })?;
                error_attr = Some(attr);
            } else if attr.path().is_ident("doc") {
                doc_attrs.push(attr);
            } else {
                return Err(syn::Error::new(attr.span(), "Unsupported variant attribute"));
            }
        }

        let fields = if input.peek(syn::token::Brace) {
            let content;
            braced!(content in input);
            content
                .parse_terminated(Field::parse_named, Token![,])?
                .into_iter()
                .collect()
        } else {
            Vec::new()
        };

        if let Some(field) = &payload_field
            && !fields.iter().any(|f| f.ident.as_ref() == Some(field))
        {
            return Err(syn::Error::new(
                field.span(),
                format!("Payload field '{field}' not found in variant '{name}'"),
            ));
        }

        let sw = sw
            .ok_or_else(|| syn::Error::new(name.span(), "Missing #[sw] attribute for variant"))?;

        if is_error && error_attr.is_none() {
            return Err(syn::Error::new(
                name.span(),
                "Error variants must have an #[error(\"message\")] attribute",
            ));
        }

        variants.push(ResponseVariant {
            name,
            sw,
            fields,
            payload_field,
            doc_attrs,
            error_attr,
        });

        if !input.is_empty() {
            input.parse::<Token![,]>()?;
        }
    }

    Ok(variants)
}

/// `#[payload(field = "name")]`
fn parse_payload_attribute(attr: &Attribute) -> syn::Result<Ident> {
    let meta: MetaNameValue = attr.parse_args()?;
    match &meta.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(field),
            ..
        }) if meta.path.is_ident("field") => field.parse(),
        _ => Err(syn::Error::new(
            meta.span(),
            "Expected #[payload(field = \"field_name\")] format",
        )),
    }
}

/// `#[sw(sw1, sw2)]` or `#[sw(STATUS_WORD)]`
fn parse_sw_attribute(attr: &Attribute) -> syn::Result<SwAnnotation> {
    let parts = attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
    let mut parts = parts.into_iter();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(word @ Expr::Path(_)), None, None) => Ok(SwAnnotation::Word(word)),
        (Some(sw1), Some(sw2), None) => Ok(SwAnnotation::Bytes(
            parse_sw_component(sw1)?,
            parse_sw_component(sw2)?,
        )),
        _ => Err(syn::Error::new(
            attr.span(),
            "Expected either (sw1, sw2) format or a StatusWord constant reference",
        )),
    }
}

fn parse_sw_component(expr: Expr) -> syn::Result<SwPattern> {
    match expr {
        Expr::Infer(_) => Ok(SwPattern::Any),
        Expr::Lit(ExprLit {
            lit: Lit::Int(byte),
            ..
        }) => Ok(SwPattern::Exact(byte.base10_parse()?)),
        Expr::Unary(ExprUnary {
            op: UnOp::Not(_),
            expr,
            ..
        }) => match *expr {
            Expr::Lit(ExprLit {
                lit: Lit::Int(byte),
                ..
            }) => Ok(SwPattern::Not(byte.base10_parse()?)),
            other => Err(syn::Error::new(other.span(), "Expected integer literal after !")),
        },
        path @ Expr::Path(_) => Ok(SwPattern::Path(path)),
        other => Err(syn::Error::new(
            other.span(),
            "Expected integer literal, _, !value, or constant reference",
        )),
    }
}

fn byte_lit(value: u8) -> LitInt {
    LitInt::new(&format!("0x{value:02X}u8"), Span::call_site())
}

/// Pattern and guard for one status byte bound to `binding`
fn component_match(pattern: &SwPattern, binding: &Ident) -> (TokenStream, Option<TokenStream>) {
    match pattern {
        SwPattern::Any => (quote! { _ }, None),
        SwPattern::Exact(value) => {
            let lit = byte_lit(*value);
            (quote! { #lit }, None)
        }
        SwPattern::Not(value) => {
            let lit = byte_lit(*value);
            (quote! { #binding }, Some(quote! { #binding != #lit }))
        }
        SwPattern::Path(path) => (quote! { #binding }, Some(quote! { #binding == #path })),
    }
}

fn match_pattern(sw: &SwAnnotation) -> TokenStream {
    let sw1 = Ident::new("sw1", Span::call_site());
    let sw2 = Ident::new("sw2", Span::call_site());

    match sw {
        SwAnnotation::Word(word) => quote! {
            (sw1, sw2) if simkit_apdu_core::StatusWord::new(sw1, sw2) == #word
        },
        SwAnnotation::Bytes(first, second) => {
            let (first, first_guard) = component_match(first, &sw1);
            let (second, second_guard) = component_match(second, &sw2);
            match (first_guard, second_guard) {
                (None, None) => quote! { (#first, #second) },
                (Some(guard), None) | (None, Some(guard)) => {
                    quote! { (#first, #second) if #guard }
                }
                (Some(a), Some(b)) => quote! { (#first, #second) if #a && #b },
            }
        }
    }
}

fn variant_tokens(variant: &ResponseVariant) -> TokenStream {
    let name = &variant.name;
    let doc_attrs = &variant.doc_attrs;
    let error_attr = &variant.error_attr;
    let fields = &variant.fields;

    if fields.is_empty() {
        quote! {
            #(#doc_attrs)*
            #error_attr
            #name
        }
    } else {
        quote! {
            #(#doc_attrs)*
            #error_attr
            #name { #(#fields,)* }
        }
    }
}

fn construct(variant: &ResponseVariant, enum_name: &Ident) -> TokenStream {
    let name = &variant.name;
    if variant.fields.is_empty() {
        return quote! { #enum_name::#name };
    }

    let inits = variant.fields.iter().filter_map(|field| {
        let ident = field.ident.as_ref()?;
        Some(if ident == "sw1" || ident == "sw2" {
            quote! { #ident }
        } else if variant.payload_field.as_ref() == Some(ident) {
            quote! { #ident: ::core::convert::Into::into(payload) }
        } else {
            quote! { #ident: ::core::default::Default::default() }
        })
    });

    quote! { #enum_name::#name { #(#inits,)* } }
}

/// Expand a response definition into its `Ok` and `Error` enums
///
/// Returns the enums and the `parse_response` method for the command impl.
pub(crate) fn expand_response(
    response: &ResponseDef,
    vis: &Visibility,
    ok_name: &Ident,
    error_name: &Ident,
) -> (TokenStream, TokenStream) {
    let ok_variants = response.ok_variants.iter().map(variant_tokens);
    let error_variants = response.error_variants.iter().map(variant_tokens);

    let arms = response.variants().map(|(variant, is_error)| {
        let pattern = match_pattern(&variant.sw);
        if is_error {
            let value = construct(variant, error_name);
            quote! { #pattern => ::core::result::Result::Err(#value) }
        } else {
            let value = construct(variant, ok_name);
            quote! { #pattern => ::core::result::Result::Ok(#value) }
        }
    });

    let split = if response
        .variants()
        .any(|(variant, _)| variant.payload_field.is_some())
    {
        quote! { let (status, payload) = response.into_parts(); }
    } else {
        quote! { let status = simkit_apdu_core::ApduResponse::status(&response); }
    };

    let parse_impl = quote! {
        fn parse_response(
            response: simkit_apdu_core::Response,
        ) -> ::core::result::Result<Self::Success, Self::Error> {
            #split
            let (sw1, sw2) = (status.sw1, status.sw2);

            match (sw1, sw2) {
                #(#arms,)*
                _ => ::core::result::Result::Err(#error_name::Unknown { sw1, sw2 }),
            }
        }
    };

    let tokens = quote! {
        /// Successful response variants
        #[derive(Debug, Clone, PartialEq, Eq)]
        #vis enum #ok_name {
            #(#ok_variants,)*
        }

        /// Error response variants
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        #vis enum #error_name {
            #(#error_variants,)*

            /// Error from response parsing
            #[error(transparent)]
            ResponseError(#[from] simkit_apdu_core::response::error::ResponseError),

            /// Status word not covered by the command
            #[error("Unknown status word: {sw1:02X}{sw2:02X}")]
            Unknown {
                /// First status byte
                sw1: u8,
                /// Second status byte
                sw2: u8,
            },
        }
    };

    (tokens, parse_impl)
}
