//! Procedural macros for declaring APDU commands together with their responses
//!
//! [`apdu_pair!`] turns one declaration into a command struct implementing
//! `simkit_apdu_core::ApduCommand`, an `Ok` enum for the success status words
//! and a `thiserror` `Error` enum for the failing ones.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use heck::ToSnakeCase;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Ident, Token, Visibility, braced,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

mod command;
mod response;

use command::CommandDef;
use response::ResponseDef;

/// Defines a paired APDU command and response
///
/// `Foo` expands to a `foo` module exporting `FooCommand`, `FooOk` and
/// `FooError`. Variants are matched against the status word in declaration
/// order, `ok` before `errors`; anything unmatched becomes `FooError::Unknown`.
/// Fields named `sw1` or `sw2` capture the status bytes and the field named by
/// `#[payload(field = "..")]` receives the response data.
///
/// # Example
///
/// ```
/// use simkit_apdu_core::ApduCommand;
/// use simkit_apdu_macros::apdu_pair;
///
/// apdu_pair! {
///     /// GET RESPONSE
///     pub struct GetResponse {
///         command {
///             cla: 0xA0,
///             ins: 0xC0,
///
///             builders {
///                 /// Fetch `le` bytes
///                 pub const fn expecting(le: u8) -> Self {
///                     Self::new(0x00, 0x00).with_le(le)
///                 }
///             }
///         }
///
///         response {
///             ok {
///                 /// Response data
///                 #[sw(0x90, 0x00)]
///                 #[payload(field = "data")]
///                 Success {
///                     /// Bytes returned by the card
///                     data: Vec<u8>,
///                 }
///             }
///
///             errors {
///                 /// P3 does not match the pending length
///                 #[sw(0x67, _)]
///                 #[error("Incorrect parameter P3, {sw2:02X} expected")]
///                 WrongLength {
///                     /// Length the card wanted
///                     sw2: u8,
///                 }
///             }
///         }
///     }
/// }
///
/// let command = GetResponseCommand::expecting(0x0C);
/// assert_eq!(command.to_bytes().as_ref(), &[0xA0, 0xC0, 0x00, 0x00, 0x0C]);
/// assert_eq!(
///     GetResponseCommand::parse_response_raw(&[0x67, 0x0F]),
///     Err(GetResponseError::WrongLength { sw2: 0x0F })
/// );
/// ```
#[proc_macro]
pub fn apdu_pair(input: TokenStream) -> TokenStream {
    let pair = parse_macro_input!(input as ApduPair);

    expand_apdu_pair(&pair).into()
}

/// Definition of an APDU command and its response
struct ApduPair {
    vis: Visibility,
    struct_name: Ident,
    attrs: Vec<Attribute>,
    command: CommandDef,
    response: ResponseDef,
}

impl Parse for ApduPair {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;

        input.parse::<Token![struct]>()?;
        let struct_name = input.parse()?;

        let content;
        braced!(content in input);

        expect_keyword(&content, "command")?;
        let command;
        braced!(command in content);
        let command = CommandDef::parse(&command)?;

        expect_keyword(&content, "response")?;
        let response;
        braced!(response in content);
        let response = ResponseDef::parse(&response)?;

        Ok(Self {
            vis,
            struct_name,
            attrs,
            command,
            response,
        })
    }
}

fn expect_keyword(input: ParseStream<'_>, keyword: &str) -> syn::Result<()> {
    let ident: Ident = input.parse()?;
    if ident == keyword {
        Ok(())
    } else {
        Err(syn::Error::new(
            ident.span(),
            format!("Expected `{keyword}` section, found `{ident}`"),
        ))
    }
}

/// Expands an APDU pair into command and response definitions
fn expand_apdu_pair(pair: &ApduPair) -> TokenStream2 {
    let name = &pair.struct_name;
    let command_name = Ident::new(&format!("{name}Command"), name.span());
    let ok_name = Ident::new(&format!("{name}Ok"), name.span());
    let error_name = Ident::new(&format!("{name}Error"), name.span());
    let module_name = Ident::new(&name.to_string().to_snake_case(), name.span());

    // Items are public inside the generated module, `vis` applies to the re-export
    let item_vis: Visibility = syn::parse_quote!(pub);
    let (response_tokens, parse_impl) =
        response::expand_response(&pair.response, &item_vis, &ok_name, &error_name);
    let command_tokens = command::expand_command(
        &pair.command,
        &item_vis,
        &pair.attrs,
        &command_name,
        &ok_name,
        &error_name,
        &parse_impl,
    );

    let vis = &pair.vis;
    quote! {
        #[allow(clippy::module_inception)]
        mod #module_name {
            use super::*;

            #command_tokens

            #response_tokens
        }

        #vis use #module_name::{#command_name, #error_name, #ok_name};
    }
}
