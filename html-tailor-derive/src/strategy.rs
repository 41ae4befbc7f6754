//! Parsing of `#[tailor(...)]` field attributes.
//!
//! This module maps attribute syntax to traversal decisions and produces
//! structured errors for invalid forms.

use proc_macro2::{Ident, Span};
use syn::{Attribute, LitBool, Meta, Result, spanned::Spanned};

/// Level names a field directive may use.
pub(crate) const LEVELS: &[&str] = &["None", "Safe", "TextWithLineBreaks", "Text"];

/// Field traversal strategy based on `#[tailor(...)]` attributes.
///
/// | Attribute | Strategy | Directive used for the field |
/// |-----------|----------|------------------------------|
/// | None | `Inherit` | the ambient directive |
/// | `#[tailor]` | `Override` | `(Safe, blocklist)` |
/// | `#[tailor(level = Text)]` | `Override` | `(Text, blocklist)` |
/// | `#[tailor(blocklist = false)]` | `Override` | `(Safe, no blocklist)` |
/// | `#[tailor(skip)]` | `Skip` | field is not visited |
#[derive(Clone, Debug)]
pub(crate) enum Strategy {
    /// No annotation: visit with the ambient directive.
    Inherit,
    /// Visit with a fixed directive, replacing the ambient one.
    Override { level: Ident, blocklist: bool },
    /// Never visit the field.
    Skip,
}

fn set_strategy(target: &mut Option<Strategy>, next: Strategy, span: Span) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            "multiple #[tailor] attributes specified on the same field",
        ));
    }
    *target = Some(next);
    Ok(())
}

fn marked(span: Span) -> Strategy {
    Strategy::Override {
        level: Ident::new("Safe", span),
        blocklist: true,
    }
}

fn parse_list(list: &syn::MetaList) -> Result<Strategy> {
    let mut level: Option<Ident> = None;
    let mut blocklist: Option<bool> = None;
    let mut skip = false;

    list.parse_nested_meta(|meta| {
        if meta.path.is_ident("skip") {
            skip = true;
            Ok(())
        } else if meta.path.is_ident("level") {
            let ident: Ident = meta.value()?.parse()?;
            if !LEVELS.iter().any(|name| ident == name) {
                return Err(syn::Error::new(
                    ident.span(),
                    format!(
                        "unknown level `{ident}`; expected one of `None`, `Safe`, `TextWithLineBreaks`, `Text`"
                    ),
                ));
            }
            level = Some(ident);
            Ok(())
        } else if meta.path.is_ident("blocklist") {
            let value: LitBool = meta.value()?.parse()?;
            blocklist = Some(value.value);
            Ok(())
        } else {
            Err(meta.error(format!(
                "unknown field option `{}`; expected `level`, `blocklist` or `skip`",
                meta.path
                    .get_ident()
                    .map_or_else(|| "?".to_string(), ToString::to_string)
            )))
        }
    })?;

    if skip {
        if level.is_some() || blocklist.is_some() {
            return Err(syn::Error::new(
                list.span(),
                "`skip` cannot be combined with `level` or `blocklist`",
            ));
        }
        return Ok(Strategy::Skip);
    }

    Ok(Strategy::Override {
        level: level.unwrap_or_else(|| Ident::new("Safe", list.span())),
        blocklist: blocklist.unwrap_or(true),
    })
}

pub(crate) fn parse_field_strategy(attrs: &[Attribute]) -> Result<Strategy> {
    let mut strategy: Option<Strategy> = None;
    for attr in attrs {
        if !attr.path().is_ident("tailor") {
            continue;
        }

        match &attr.meta {
            Meta::Path(_) => {
                set_strategy(&mut strategy, marked(attr.span()), attr.span())?;
            }
            Meta::List(list) => {
                let next = parse_list(list)?;
                set_strategy(&mut strategy, next, attr.span())?;
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "name-value syntax is not supported for #[tailor]",
                ));
            }
        }
    }

    Ok(strategy.unwrap_or(Strategy::Inherit))
}
