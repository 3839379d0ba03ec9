//! Shared utilities for the memoprint procedural macros
//!
//! Attribute parsing and the small code-generation helpers used by
//! `memoprint-macros`. Kept in a regular library crate so they can be unit
//! tested without going through a proc-macro expansion.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Expr, FnArg, GenericArgument, Ident, MetaNameValue, Pat, PathArguments, Token, Type};

/// Where a `#[memoize]` function keeps its store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoScope {
    /// One `LocalStore` per thread (`thread_local!`), opt-in with `scope = "thread"`
    Thread,
    /// One process-wide `SharedStore` behind a lazily initialized static (default)
    Global,
}

/// Parsed `#[memoize(...)]` attributes
pub struct MemoizeAttributes {
    pub strategy: TokenStream2,
    pub scope: MemoScope,
    pub custom_name: Option<String>,
}

impl Default for MemoizeAttributes {
    fn default() -> Self {
        Self {
            strategy: quote! { ::memoprint::KeyStrategy::Raw },
            scope: MemoScope::Global,
            custom_name: None,
        }
    }
}

fn string_literal(nv: &MetaNameValue, key: &str) -> Result<String, TokenStream2> {
    match &nv.value {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            syn::Lit::Str(s) => Ok(s.value()),
            other => Err(syn::Error::new_spanned(
                other,
                format!("Invalid literal for `{key}`: expected string"),
            )
            .to_compile_error()),
        },
        other => Err(syn::Error::new_spanned(
            other,
            format!("Invalid syntax for `{key}`: expected `{key} = \"...\"`"),
        )
        .to_compile_error()),
    }
}

/// Parse the `strategy` attribute into a `KeyStrategy` path
pub fn parse_strategy_attribute(nv: &MetaNameValue) -> Result<TokenStream2, TokenStream2> {
    let value = string_literal(nv, "strategy")?;
    match value.as_str() {
        "raw" => Ok(quote! { ::memoprint::KeyStrategy::Raw }),
        "multi-hash" | "multi-sha256" => Ok(quote! { ::memoprint::KeyStrategy::MultiHash }),
        "single-hash" | "single-sha256" => Ok(quote! { ::memoprint::KeyStrategy::SingleHash }),
        _ => Err(syn::Error::new_spanned(
            &nv.value,
            format!(
                "Invalid strategy `{value}`: expected \"raw\", \"multi-hash\" or \"single-hash\""
            ),
        )
        .to_compile_error()),
    }
}

/// Parse the `scope` attribute
pub fn parse_scope_attribute(nv: &MetaNameValue) -> Result<MemoScope, TokenStream2> {
    match string_literal(nv, "scope")?.as_str() {
        "thread" => Ok(MemoScope::Thread),
        "global" => Ok(MemoScope::Global),
        _ => Err(syn::Error::new_spanned(
            &nv.value,
            "Invalid scope: expected \"thread\" or \"global\"",
        )
        .to_compile_error()),
    }
}

/// Parse the `name` attribute
pub fn parse_name_attribute(nv: &MetaNameValue) -> Result<String, TokenStream2> {
    let name = string_literal(nv, "name")?;
    if name.trim().is_empty() {
        return Err(
            syn::Error::new_spanned(&nv.value, "`name` must not be empty").to_compile_error(),
        );
    }
    Ok(name)
}

/// Parse `#[memoize(...)]` attributes from a token stream
pub fn parse_memoize_attributes(attr: TokenStream2) -> Result<MemoizeAttributes, TokenStream2> {
    use syn::parse::Parser;

    let parser = Punctuated::<MetaNameValue, Token![,]>::parse_terminated;
    let parsed_args = parser.parse2(attr).map_err(|e| {
        let msg = format!("Failed to parse attributes: {}", e);
        quote! { compile_error!(#msg); }
    })?;

    let mut attrs = MemoizeAttributes::default();

    for nv in parsed_args {
        if nv.path.is_ident("strategy") {
            attrs.strategy = parse_strategy_attribute(&nv)?;
        } else if nv.path.is_ident("scope") {
            attrs.scope = parse_scope_attribute(&nv)?;
        } else if nv.path.is_ident("name") {
            attrs.custom_name = Some(parse_name_attribute(&nv)?);
        } else {
            return Err(syn::Error::new_spanned(
                &nv.path,
                "Unknown attribute: expected `strategy`, `scope` or `name`",
            )
            .to_compile_error());
        }
    }

    Ok(attrs)
}

/// Collect the identifiers of the typed arguments, in order.
///
/// The receiver is skipped: one store serves every instance of the type.
pub fn collect_key_idents<'a, I>(inputs: I) -> Result<Vec<Ident>, TokenStream2>
where
    I: IntoIterator<Item = &'a FnArg>,
{
    let mut idents = Vec::new();
    for arg in inputs {
        match arg {
            FnArg::Receiver(_) => {}
            FnArg::Typed(pat_type) => match &*pat_type.pat {
                Pat::Ident(pat_ident) if pat_ident.subpat.is_none() => {
                    idents.push(pat_ident.ident.clone());
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "#[memoize] arguments must be plain identifiers",
                    )
                    .to_compile_error())
                }
            },
        }
    }
    Ok(idents)
}

/// Generate a tuple expression borrowing every key argument: `(&a, &b,)`
pub fn generate_args_tuple(idents: &[Ident]) -> TokenStream2 {
    quote! { ( #( &#idents, )* ) }
}

/// If `ty` is a `Result<T, ...>`, return `T`.
pub fn result_ok_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first()? {
            GenericArgument::Type(ok) => Some(ok),
            _ => None,
        },
        _ => None,
    }
}
