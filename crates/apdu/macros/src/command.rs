//! Command parsing and expansion logic

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Attribute, Expr, Ident, ImplItemFn, Token, Visibility, braced, parse::ParseStream};

/// Command definition parsed from the `command` block
pub(crate) struct CommandDef {
    /// Class byte (CLA)
    pub cla: Expr,
    /// Instruction byte (INS)
    pub ins: Expr,
    /// Builder methods
    pub builders: Vec<ImplItemFn>,
}

impl CommandDef {
    /// Parse a command definition from a ParseStream
    pub(crate) fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let mut cla = None;
        let mut ins = None;
        let mut builders = Vec::new();

        while !input.is_empty() {
            let key: Ident = input.parse()?;

            match key.to_string().as_str() {
                "cla" => {
                    input.parse::<Token![:]>()?;
                    cla = Some(input.parse()?);
                    input.parse::<Token![,]>()?;
                }
                "ins" => {
                    input.parse::<Token![:]>()?;
                    ins = Some(input.parse()?);
                    input.parse::<Token![,]>()?;
                }
                "builders" => {
                    let content;
                    braced!(content in input);

                    while !content.is_empty() {
                        builders.push(content.parse()?);
                    }

                    if !input.is_empty() {
                        let _ = input.parse::<Token![,]>();
                    }
                }
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("Unknown command field: {key}"),
                    ));
                }
            }
        }

        let cla =
            cla.ok_or_else(|| syn::Error::new(Span::call_site(), "Missing CLA field in command"))?;
        let ins =
            ins.ok_or_else(|| syn::Error::new(Span::call_site(), "Missing INS field in command"))?;

        Ok(Self { cla, ins, builders })
    }
}

/// Expand a command definition into a command struct and its `ApduCommand` impl
pub(crate) fn expand_command(
    command: &CommandDef,
    vis: &Visibility,
    attrs: &[Attribute],
    command_name: &Ident,
    ok_name: &Ident,
    error_name: &Ident,
    parse_impl: &TokenStream,
) -> TokenStream {
    let cla = &command.cla;
    let ins = &command.ins;
    let builder_methods = &command.builders;

    quote! {
        #(#attrs)*
        #[derive(Debug, Clone, PartialEq, Eq)]
        #vis struct #command_name {
            p1: u8,
            p2: u8,
            data: Option<simkit_apdu_core::Bytes>,
            le: Option<simkit_apdu_core::ExpectedLength>,
        }

        impl #command_name {
            /// Create a new command with given P1 and P2 parameters
            pub const fn new(p1: u8, p2: u8) -> Self {
                Self {
                    p1,
                    p2,
                    data: None,
                    le: None,
                }
            }

            /// Add data to the command
            pub fn with_data(mut self, data: impl Into<simkit_apdu_core::Bytes>) -> Self {
                self.data = Some(data.into());
                self
            }

            /// Set the expected length
            pub const fn with_le(mut self, le: simkit_apdu_core::ExpectedLength) -> Self {
                self.le = Some(le);
                self
            }

            #(#builder_methods)*
        }

        impl simkit_apdu_core::ApduCommand for #command_name {
            type Success = #ok_name;
            type Error = #error_name;

            fn convert_error(
                error: simkit_apdu_core::response::error::ResponseError,
            ) -> Self::Error {
                #error_name::ResponseError(error)
            }

            fn class(&self) -> u8 {
                #cla
            }

            fn instruction(&self) -> u8 {
                #ins
            }

            fn p1(&self) -> u8 {
                self.p1
            }

            fn p2(&self) -> u8 {
                self.p2
            }

            fn data(&self) -> Option<&[u8]> {
                self.data.as_deref()
            }

            fn expected_length(&self) -> Option<simkit_apdu_core::ExpectedLength> {
                self.le
            }

            #parse_impl
        }
    }
}
