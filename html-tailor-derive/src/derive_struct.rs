//! Struct-specific `Tailorable` derivation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataStruct, Fields, Result};

use crate::fields::{DeriveContext, FieldsOutput, visit_fields};

pub(crate) fn derive_struct(ctx: &mut DeriveContext<'_>, data: &DataStruct) -> Result<TokenStream> {
    if matches!(data.fields, Fields::Unit) {
        return Ok(quote! {});
    }

    let FieldsOutput {
        pattern,
        statements,
    } = visit_fields(ctx, &data.fields)?;

    Ok(quote! {
        let Self #pattern = self;
        #(#statements)*
    })
}
