//! Enum-specific `Tailorable` derivation.
//!
//! Each variant becomes one match arm visiting that variant's fields.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, Result};

use crate::fields::{DeriveContext, FieldsOutput, visit_fields};

pub(crate) fn derive_enum(ctx: &mut DeriveContext<'_>, data: &DataEnum) -> Result<TokenStream> {
    if data.variants.is_empty() {
        return Ok(quote! { match *self {} });
    }

    let mut arms = Vec::new();
    for variant in &data.variants {
        let variant_ident = &variant.ident;
        let FieldsOutput {
            pattern,
            statements,
        } = visit_fields(ctx, &variant.fields)?;
        arms.push(quote! {
            Self::#variant_ident #pattern => {
                #(#statements)*
            }
        });
    }

    Ok(quote! {
        match self {
            #(#arms)*
        }
    })
}
