//! Derive macros for todoboard
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates helpers for action enums (update requests/events)
//!
//! # Example
//!
//! ```ignore
//! use todoboard_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum ListAction {
//!     #[request]
//!     ToggleAll,
//!
//!     #[event]
//!     ItemsLoaded { count: usize },
//! }
//!
//! // Generated methods:
//! assert!(ListAction::ToggleAll.is_request());
//! assert_eq!(ListAction::ItemsLoaded { count: 1 }.tag(), "ITEMS_LOADED");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use heck::ToShoutySnakeCase;
use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, Variant, parse_macro_input};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_request()` - Returns true if this variant is an update request
/// - `is_event()` - Returns true if this variant is an event fed back by an effect
/// - `tag()` - Returns the variant's wire tag in `SCREAMING_SNAKE_CASE`
///
/// # Attributes
///
/// - `#[request]` - Mark a variant as an update request
/// - `#[event]` - Mark a variant as an event
/// - `#[tag = "NAME"]` - Override the generated tag
///
/// The generated tag follows the same casing as serde's
/// `rename_all = "SCREAMING_SNAKE_CASE"`, so logs and the JSON form agree.
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant has both `#[request]` and `#[event]` attributes
/// - A `#[tag]` attribute is not a string literal
#[proc_macro_derive(Action, attributes(request, event, tag))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut request_arms = Vec::new();
    let mut event_arms = Vec::new();
    let mut tag_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_request = has_attribute(&variant.attrs, "request");
        let is_event = has_attribute(&variant.attrs, "event");

        if is_request && is_event {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[request] and #[event]",
            )
            .to_compile_error()
            .into();
        }

        let tag = match variant_tag(variant) {
            Ok(tag) => tag,
            Err(error) => return error.to_compile_error().into(),
        };

        let pattern = variant_pattern(variant);

        if is_request {
            request_arms.push(quote! { #pattern => true, });
        }

        if is_event {
            event_arms.push(quote! { #pattern => true, });
        }

        tag_arms.push(quote! { #pattern => #tag, });
    }

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is an update request
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_request(&self) -> bool {
                match self {
                    #(#request_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action is an event
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_event(&self) -> bool {
                match self {
                    #(#event_arms)*
                    _ => false,
                }
            }

            /// Returns the wire tag of this action
            #[must_use]
            pub const fn tag(&self) -> &'static str {
                match self {
                    #(#tag_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Match pattern ignoring the variant's fields
fn variant_pattern(variant: &Variant) -> proc_macro2::TokenStream {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Explicit `#[tag = "..."]` or the shouty snake case variant name
fn variant_tag(variant: &Variant) -> syn::Result<String> {
    for attr in &variant.attrs {
        if attr.path().is_ident("tag") {
            let value = &attr.meta.require_name_value()?.value;
            let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) = value
            else {
                return Err(syn::Error::new_spanned(value, "#[tag] expects a string literal"));
            };
            return Ok(LitStr::value(lit));
        }
    }

    Ok(variant.ident.to_string().to_shouty_snake_case())
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
