//! Derive macro for `html-tailor`.
//!
//! This crate generates the traversal code behind `#[derive(Tailorable)]`. It:
//! - reads `#[tailor(...)]` field attributes
//! - emits a `Tailorable` implementation that visits every field under either
//!   the ambient directive or the field's own directive
//!
//! It does **not** know anything about sanitization. Levels, policies and the
//! blocklist live in the main `html-tailor` crate and are applied at runtime.

#![warn(
    bare_trait_objects,
    elided_lifetimes_in_paths,
    rust_2018_idioms,
    unreachable_pub,
    unsafe_code
)]
#![warn(clippy::all, clippy::dbg_macro, clippy::todo, clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use proc_macro2::TokenStream;
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Result, parse_macro_input, spanned::Spanned};

mod derive_enum;
mod derive_struct;
mod fields;
mod generics;
mod strategy;

use derive_enum::derive_enum;
use derive_struct::derive_struct;
use fields::DeriveContext;
use generics::add_tailorable_bounds;

/// Derives `html_tailor::Tailorable` for structs and enums.
///
/// # Field Attributes
///
/// - **No annotation**: the field is visited with the ambient directive, the
///   one passed to `Tailor::rewrite` or inherited from an enclosing field.
/// - `#[tailor]`: the field and everything inside it use `(Safe, blocklist)`.
/// - `#[tailor(level = Text)]`: overrides the level; `blocklist` stays on.
///   Accepted levels are `None`, `Safe`, `TextWithLineBreaks` and `Text`.
/// - `#[tailor(blocklist = false)]`: overrides the blocklist flag; the level
///   stays `Safe`. Combines with `level`.
/// - `#[tailor(skip)]`: the field is never visited and its type need not
///   implement `Tailorable`.
///
/// Every visited field's type must implement `Tailorable`. Generic
/// parameters used by visited fields receive a `Tailorable` bound.
///
/// Unions are rejected at compile time.
#[proc_macro_derive(Tailorable, attributes(tailor))]
pub fn derive_tailorable(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the html-tailor crate root.
///
/// Handles crate renaming (e.g., `tailor = { package = "html-tailor", ... }`).
/// Inside html-tailor itself, and in its tests and doctests, the crate is
/// reachable as `::html_tailor` through `extern crate self as html_tailor`.
fn crate_root() -> TokenStream {
    match crate_name("html-tailor") {
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::html_tailor },
    }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = input;

    let crate_root = crate_root();
    let mut used_generics = Vec::new();
    let mut ctx = DeriveContext {
        generics: &generics,
        crate_root: &crate_root,
        used_generics: &mut used_generics,
    };

    let body = match &data {
        Data::Struct(data) => derive_struct(&mut ctx, data)?,
        Data::Enum(data) => derive_enum(&mut ctx, data)?,
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "`Tailorable` cannot be derived for unions",
            ));
        }
    };

    let trait_path = quote! { #crate_root::Tailorable };
    let bounded = add_tailorable_bounds(generics.clone(), &used_generics, &trait_path);
    let (impl_generics, ty_generics, where_clause) = bounded.split_for_impl();

    Ok(quote! {
        impl #impl_generics #trait_path for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn tailor_with(
                &mut self,
                __tailor: &mut #crate_root::Tailor,
                __directive: #crate_root::Directive,
            ) {
                #body
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn union_is_rejected() {
        let input: DeriveInput = parse_quote! {
            union Bits { a: u32, b: f32 }
        };
        let err = expand(input).unwrap_err();
        assert!(err.to_string().contains("cannot be derived for unions"));
    }

    #[test]
    fn generic_struct_gets_bound() {
        let input: DeriveInput = parse_quote! {
            struct Wrapper<T, U> {
                inner: T,
                #[tailor(skip)]
                other: U,
            }
        };
        let tokens = expand(input).unwrap().to_string();
        assert!(tokens.contains("T : :: html_tailor :: Tailorable"));
        assert!(!tokens.contains("U : :: html_tailor :: Tailorable"));
    }

    #[test]
    fn empty_enum_matches_on_deref() {
        let input: DeriveInput = parse_quote! {
            enum Never {}
        };
        let tokens = expand(input).unwrap().to_string();
        assert!(tokens.contains("match * self { }"));
    }
}
