use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, ItemFn, ReturnType};

use memoprint_macro_utils::{
    collect_key_idents, generate_args_tuple, parse_memoize_attributes, result_ok_type, MemoScope,
};

/// Tokens that differ between plain and `Result`-returning functions
struct ValueHandling {
    /// Type held by the store: the return type, or `T` of `Result<T, E>`
    value_type: TokenStream2,
    /// Expression returned on a hit
    hit_expr: TokenStream2,
    /// Statement storing `__result` through `__memo`
    record_stmt: TokenStream2,
}

fn value_handling(ret_type: &TokenStream2, output: &ReturnType) -> ValueHandling {
    let ok_type = match output {
        ReturnType::Type(_, ty) => result_ok_type(ty),
        ReturnType::Default => None,
    };

    match ok_type {
        Some(ok) => ValueHandling {
            value_type: quote! { #ok },
            hit_expr: quote! { ::std::result::Result::Ok(__cached) },
            record_stmt: quote! { __memo.record_outcome(__fingerprint, &__result) },
        },
        None => ValueHandling {
            value_type: ret_type.clone(),
            hit_expr: quote! { __cached },
            record_stmt: quote! {
                __memo.record(__fingerprint, ::std::clone::Clone::clone(&__result))
            },
        },
    }
}

fn fingerprint_failure(fn_name_str: &str) -> TokenStream2 {
    quote! {
        |__err| ::std::panic!(
            "#[memoize] could not fingerprint the arguments of `{}`: {}",
            #fn_name_str,
            __err
        )
    }
}

/// Generate the thread-local memoizer branch
fn generate_thread_local_branch(
    memo_ident: &syn::Ident,
    ret_type: &TokenStream2,
    strategy: &TokenStream2,
    registry_name: &str,
    fn_name_str: &str,
    args_tuple: &TokenStream2,
    block: &syn::Block,
    handling: &ValueHandling,
) -> TokenStream2 {
    let ValueHandling {
        value_type,
        hit_expr,
        record_stmt,
    } = handling;
    let on_failure = fingerprint_failure(fn_name_str);

    quote! {
        ::std::thread_local! {
            static #memo_ident: ::memoprint::Memoizer<#value_type> =
                ::memoprint::MemoizerConfig::new()
                    .strategy(#strategy)
                    .name(#registry_name)
                    .build();
        }

        let __fingerprint = #memo_ident
            .with(|__memo| __memo.fingerprint(&#args_tuple))
            .unwrap_or_else(#on_failure);

        if let ::std::option::Option::Some(__cached) =
            #memo_ident.with(|__memo| __memo.lookup(&__fingerprint))
        {
            return #hit_expr;
        }

        let __result: #ret_type = (|| -> #ret_type #block)();
        #memo_ident.with(|__memo| #record_stmt);
        __result
    }
}

/// Generate the global memoizer branch
fn generate_global_branch(
    memo_ident: &syn::Ident,
    ret_type: &TokenStream2,
    strategy: &TokenStream2,
    registry_name: &str,
    fn_name_str: &str,
    args_tuple: &TokenStream2,
    block: &syn::Block,
    handling: &ValueHandling,
) -> TokenStream2 {
    let ValueHandling {
        value_type,
        hit_expr,
        record_stmt,
    } = handling;
    let on_failure = fingerprint_failure(fn_name_str);

    quote! {
        static #memo_ident: ::memoprint::__private::Lazy<
            ::memoprint::Memoizer<#value_type, ::memoprint::SharedStore<#value_type>>,
        > = ::memoprint::__private::Lazy::new(|| {
            ::memoprint::MemoizerConfig::new()
                .strategy(#strategy)
                .name(#registry_name)
                .build_with_store(::memoprint::SharedStore::new())
        });

        let __memo = &*#memo_ident;
        let __fingerprint = __memo
            .fingerprint(&#args_tuple)
            .unwrap_or_else(#on_failure);

        if let ::std::option::Option::Some(__cached) = __memo.lookup(&__fingerprint) {
            return #hit_expr;
        }

        let __result: #ret_type = (|| -> #ret_type #block)();
        #record_stmt;
        __result
    }
}

/// Memoizes a function or method by fingerprinting its arguments.
///
/// The first call with a given argument list runs the body and stores the
/// result; later calls with an equal argument list (as judged by the key
/// strategy) return a clone of the stored result without running the body.
///
/// # Requirements
///
/// - **Arguments**: plain identifiers whose types implement `serde::Serialize`
/// - **Return type**: must implement `Clone`, and `Send + Sync` unless
///   `scope = "thread"` is used
/// - **No type parameters**: the store is a static, so it cannot depend on generics
///
/// # Macro Parameters
///
/// - `strategy` (optional): how arguments become a fingerprint.
///   - `"raw"` - canonical JSON of the argument list (default)
///   - `"multi-hash"` - SHA-256 per argument, joined with `-`
///   - `"single-hash"` - SHA-256 of the whole argument list
/// - `scope` (optional): where the store lives.
///   - `"global"` - one store shared by all threads (default)
///   - `"thread"` - one store per thread; each thread computes its own values
/// - `name` (optional): statistics registry name. Default: the bare function
///   name, without the enclosing type. Methods of the same name on different
///   types therefore publish into one registry entry unless they set `name`.
///
/// # Behavior
///
/// - **Methods**: the receiver is not part of the key; every instance shares the
///   method's store, and the body still runs with its own `self`
/// - **Result-returning functions**: only `Ok` values are stored; an `Err` is
///   returned as-is and the next call runs the body again
/// - **Recursion**: recursive calls go through the memoizer, so each distinct
///   argument list is computed once
/// - **Concurrency**: two threads missing on the same arguments
///   at the same time may both run the body; the later result is kept
///
/// # Panics
///
/// The generated function panics if its arguments cannot be serialized (for
/// example a map with non-string keys). Use `memoprint::Memoizer` directly to
/// receive that failure as an error instead.
///
/// # Examples
///
/// ```ignore
/// use memoprint::memoize;
///
/// #[memoize]
/// fn fibonacci(n: u64) -> u64 {
///     if n < 2 {
///         return 1;
///     }
///     fibonacci(n - 2) + fibonacci(n - 1)
/// }
///
/// struct Pricing;
///
/// impl Pricing {
///     #[memoize(strategy = "multi-hash", scope = "global", name = "quote_v1")]
///     fn quote(&self, sku: String, quantity: u32) -> Result<f64, String> {
///         if quantity == 0 {
///             return Err("empty order".to_string());
///         }
///         Ok(quantity as f64 * 9.99)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn memoize(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attrs = match parse_memoize_attributes(attr.into()) {
        Ok(attrs) => attrs,
        Err(err) => return err.into(),
    };

    let input = parse_macro_input!(item as ItemFn);
    let fn_attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let ident = &sig.ident;
    let block = &input.block;

    if sig.asyncness.is_some() {
        return syn::Error::new_spanned(sig.asyncness, "#[memoize] does not support async fn")
            .to_compile_error()
            .into();
    }
    if let Some(param) = sig.generics.type_params().next() {
        return syn::Error::new_spanned(param, "#[memoize] does not support type parameters")
            .to_compile_error()
            .into();
    }

    let ret_type = match &sig.output {
        ReturnType::Type(_, ty) => quote! { #ty },
        ReturnType::Default => quote! { () },
    };

    let key_idents = match collect_key_idents(&sig.inputs) {
        Ok(idents) => idents,
        Err(err) => return err.into(),
    };
    let args_tuple = generate_args_tuple(&key_idents);

    let memo_ident = format_ident!("__MEMOPRINT_{}", ident.to_string().to_uppercase());
    let fn_name_str = ident.to_string();
    let registry_name = attrs.custom_name.unwrap_or_else(|| fn_name_str.clone());
    let handling = value_handling(&ret_type, &sig.output);

    let body = match attrs.scope {
        MemoScope::Thread => generate_thread_local_branch(
            &memo_ident,
            &ret_type,
            &attrs.strategy,
            &registry_name,
            &fn_name_str,
            &args_tuple,
            block,
            &handling,
        ),
        MemoScope::Global => generate_global_branch(
            &memo_ident,
            &ret_type,
            &attrs.strategy,
            &registry_name,
            &fn_name_str,
            &args_tuple,
            block,
            &handling,
        ),
    };

    let expanded = quote! {
        #(#fn_attrs)*
        #vis #sig {
            #body
        }
    };

    TokenStream::from(expanded)
}
