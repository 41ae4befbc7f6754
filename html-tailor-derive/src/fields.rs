//! Per-field traversal code shared by struct and enum derivation.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, quote_spanned};
use syn::{Fields, Ident, Result, spanned::Spanned};

use crate::generics::collect_generics_from_type;
use crate::strategy::{Strategy, parse_field_strategy};

/// Shared state while walking the fields of one type.
pub(crate) struct DeriveContext<'a> {
    pub(crate) generics: &'a syn::Generics,
    pub(crate) crate_root: &'a TokenStream,
    pub(crate) used_generics: &'a mut Vec<Ident>,
}

/// Destructuring pattern for a set of fields plus the statements visiting them.
pub(crate) struct FieldsOutput {
    pub(crate) pattern: TokenStream,
    pub(crate) statements: Vec<TokenStream>,
}

fn visit_statement(
    ctx: &DeriveContext<'_>,
    binding: &Ident,
    span: Span,
    strategy: &Strategy,
) -> TokenStream {
    let root = ctx.crate_root;
    match strategy {
        Strategy::Inherit => quote_spanned! { span =>
            #root::Tailorable::tailor_with(#binding, __tailor, __directive);
        },
        Strategy::Override { level, blocklist } => quote_spanned! { span =>
            #root::Tailorable::tailor_with(
                #binding,
                __tailor,
                #root::Directive::new(#root::Level::#level, #blocklist),
            );
        },
        Strategy::Skip => quote! {},
    }
}

pub(crate) fn visit_fields(ctx: &mut DeriveContext<'_>, fields: &Fields) -> Result<FieldsOutput> {
    let mut statements = Vec::new();

    let pattern = match fields {
        Fields::Named(named) => {
            let mut bindings = Vec::new();
            for field in &named.named {
                let strategy = parse_field_strategy(&field.attrs)?;
                if matches!(strategy, Strategy::Skip) {
                    continue;
                }
                let Some(ident) = field.ident.clone() else {
                    return Err(syn::Error::new(field.span(), "named field without identifier"));
                };
                collect_generics_from_type(&field.ty, ctx.generics, ctx.used_generics);
                statements.push(visit_statement(ctx, &ident, field.span(), &strategy));
                bindings.push(ident);
            }
            quote! { { #(#bindings,)* .. } }
        }
        Fields::Unnamed(unnamed) => {
            let mut bindings = Vec::new();
            for (index, field) in unnamed.unnamed.iter().enumerate() {
                let strategy = parse_field_strategy(&field.attrs)?;
                if matches!(strategy, Strategy::Skip) {
                    bindings.push(quote! { _ });
                    continue;
                }
                let ident = format_ident!("__field{}", index);
                collect_generics_from_type(&field.ty, ctx.generics, ctx.used_generics);
                statements.push(visit_statement(ctx, &ident, field.span(), &strategy));
                bindings.push(quote! { #ident });
            }
            quote! { ( #(#bindings),* ) }
        }
        Fields::Unit => quote! {},
    };

    Ok(FieldsOutput {
        pattern,
        statements,
    })
}
