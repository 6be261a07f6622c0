//! Procedural macros for theus modules
//!
//! This crate provides [`macro@c_compatible`], which turns an `impl` block into
//! a set of `extern "C"` exports that a host can drive with nothing but
//! integers. Instances never leave the module; the host receives a `u32`
//! handle and passes it back on every call.

use proc_macro::TokenStream;
use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, Error, FnArg, ImplItem, ImplItemFn, ItemImpl, Pat, Path, ReturnType,
    Type, Visibility,
};

const SCALAR_TYPES: &[&str] = &[
    "bool", "char", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize",
    "f32", "f64",
];

/// Generate handle-based C exports for the methods of an `impl` block
///
/// On an inherent `impl T`, every `pub` method becomes an export named
/// `<t>_<method>`, with `T`'s name lowercased. The block must define both
/// `create` and `destroy`. A thread-local handle store for `T` is generated
/// alongside.
///
/// On `impl Trait for T`, every method becomes `<t>_<trait>_<method>` and
/// works on the store generated by `T`'s inherent block.
///
/// | Method shape | Export |
/// |---|---|
/// | `fn create(a: u32) -> Self` | `fn t_create(a: u32) -> u32`, `0` on failure |
/// | `fn m(&self, a: u32) -> R` / `&mut self` | `fn t_m(handle: u32, a: u32) -> R::Abi` |
/// | `fn destroy(self)` | `fn t_destroy(handle: u32)`, no-op for unknown handles |
/// | `fn m(self) -> R` | consumes the instance; the handle dies |
/// | `fn m(a: u32) -> R` | forwarded as-is |
///
/// Return values go through `theus_core::IntoBoundary`, so an invalid
/// handle, `None` or `Err` all come out as the type's sentinel.
///
/// # Example
///
/// ```rust,ignore
/// pub struct Counter {
///     value: u64,
/// }
///
/// #[theus_core::c_compatible]
/// impl Counter {
///     pub fn create(start: u64) -> Self {
///         Counter { value: start }
///     }
///
///     pub fn increment(&mut self) -> u64 {
///         self.value += 1;
///         self.value
///     }
///
///     pub fn destroy(self) {}
/// }
/// ```
///
/// This generates:
///
/// ```rust,ignore
/// #[no_mangle]
/// pub extern "C" fn counter_create(start: u64) -> u32 { /* ... */ }
///
/// #[no_mangle]
/// pub extern "C" fn counter_increment(handle: u32) -> u64 { /* ... */ }
///
/// #[no_mangle]
/// pub extern "C" fn counter_destroy(handle: u32) { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn c_compatible(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let mut output = TokenStream2::from(item);
        output.extend(
            Error::new_spanned(TokenStream2::from(attr), "c_compatible does not take arguments")
                .to_compile_error(),
        );
        return output.into();
    }
    let input = parse_macro_input!(item as ItemImpl);

    match expand(&input) {
        Ok(exports) => quote! {
            #input

            #exports
        }
        .into(),
        Err(errors) => {
            // emit the impl unchanged so its methods still resolve for callers
            let compile_errors = errors.iter().map(Error::to_compile_error);
            quote! {
                #input

                #(#compile_errors)*
            }
            .into()
        }
    }
}

enum Receiver {
    None,
    Shared,
    Owned,
}

fn expand(input: &ItemImpl) -> Result<TokenStream2, Vec<Error>> {
    let mut errors = Vec::new();
    let self_ty = &input.self_ty;

    if !input.generics.params.is_empty() {
        return Err(vec![Error::new_spanned(
            &input.generics,
            "generic impl blocks cannot be exported; each export needs a concrete type",
        )]);
    }

    let type_name = match type_ident(self_ty) {
        Some(name) => name,
        None => {
            return Err(vec![Error::new_spanned(
                self_ty,
                "c_compatible can only be applied to an impl of a named struct",
            )])
        }
    };

    let trait_path = input.trait_.as_ref().map(|(_, path, _)| path);
    let trait_name = trait_path.and_then(|path| path.segments.last().map(|s| s.ident.to_string()));

    let mut has_create = false;
    let mut has_destroy = false;
    let mut exports = Vec::new();

    for item in &input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        if trait_name.is_none() && !matches!(method.vis, Visibility::Public(_)) {
            continue;
        }

        let fn_name = &method.sig.ident;
        let is_inherent = trait_name.is_none();
        let is_create = is_inherent && fn_name == "create";
        let is_destroy = is_inherent && fn_name == "destroy";
        has_create |= is_create;
        has_destroy |= is_destroy;

        let export_name = match &trait_name {
            Some(trait_name) => format_ident!(
                "{}_{}_{}",
                type_name.to_lowercase(),
                trait_name.to_lowercase(),
                fn_name
            ),
            None => format_ident!("{}_{}", type_name.to_lowercase(), fn_name),
        };

        match export_method(
            method,
            self_ty,
            trait_path,
            &export_name,
            is_create,
            is_destroy,
        ) {
            Ok(export) => exports.push(export),
            Err(mut method_errors) => errors.append(&mut method_errors),
        }
    }

    if trait_name.is_none() && (!has_create || !has_destroy) {
        let missing = [("create", has_create), ("destroy", has_destroy)]
            .iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ");
        errors.push(Error::new_spanned(
            self_ty,
            format!(
                "Struct must have both 'create' and 'destroy' functions. Missing: {}",
                missing
            ),
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let handled = if trait_name.is_none() {
        quote! {
            impl ::theus_core::Handled for #self_ty {
                fn store() -> &'static ::std::thread::LocalKey<
                    ::std::cell::RefCell<::theus_core::HandleStore<Self>>,
                > {
                    ::std::thread_local! {
                        static STORE: ::std::cell::RefCell<::theus_core::HandleStore<#self_ty>> =
                            ::std::cell::RefCell::new(::theus_core::HandleStore::new());
                    }
                    &STORE
                }
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        #handled

        #(#exports)*
    })
}

fn export_method(
    method: &ImplItemFn,
    self_ty: &Type,
    trait_path: Option<&Path>,
    export_name: &syn::Ident,
    is_create: bool,
    is_destroy: bool,
) -> Result<TokenStream2, Vec<Error>> {
    let mut errors = Vec::new();
    let sig = &method.sig;
    let fn_name = &sig.ident;

    if !sig.generics.params.is_empty() {
        errors.push(Error::new_spanned(
            &sig.generics,
            "generic methods cannot be exported",
        ));
    }
    if let Some(asyncness) = &sig.asyncness {
        errors.push(Error::new_spanned(asyncness, "async methods cannot be exported"));
    }
    if let Some(unsafety) = &sig.unsafety {
        errors.push(Error::new_spanned(unsafety, "unsafe methods cannot be exported"));
    }

    let mut receiver = Receiver::None;
    let mut params = Vec::new();
    let mut args = Vec::new();

    // syn already rejects a receiver that is not the first parameter
    for arg in &sig.inputs {
        match arg {
            FnArg::Receiver(recv) => {
                if recv.colon_token.is_some() {
                    errors.push(Error::new_spanned(
                        recv,
                        "typed self receivers cannot be exported; use self, &self or &mut self",
                    ));
                    continue;
                }
                receiver = if recv.reference.is_none() {
                    Receiver::Owned
                } else {
                    Receiver::Shared
                };
            }
            FnArg::Typed(pat_type) => {
                let Pat::Ident(pat_ident) = &*pat_type.pat else {
                    errors.push(Error::new_spanned(
                        &pat_type.pat,
                        "exported parameters must be plain identifiers",
                    ));
                    continue;
                };
                if !is_scalar(&pat_type.ty) {
                    errors.push(Error::new_spanned(
                        &pat_type.ty,
                        "Only scalar types can cross the boundary; keep other data behind a handle",
                    ));
                    continue;
                }
                let ident = &pat_ident.ident;
                let ty = &pat_type.ty;
                params.push(quote! { #ident: #ty });
                args.push(quote! { #ident });
            }
        }
    }

    let returns_self = match &sig.output {
        ReturnType::Type(_, ty) => mentions_self(ty, self_ty),
        ReturnType::Default => false,
    };

    if is_create {
        if matches!(receiver, Receiver::Shared | Receiver::Owned) {
            errors.push(Error::new_spanned(
                sig,
                "Create function cannot receive self as argument",
            ));
        }
        if !returns_self {
            errors.push(Error::new_spanned(sig, "Create function must return Self"));
        }
    } else if returns_self {
        errors.push(Error::new_spanned(
            &sig.output,
            "only 'create' may return Self; other instances cannot cross the boundary",
        ));
    }

    if is_destroy && !matches!(receiver, Receiver::Owned) {
        errors.push(Error::new_spanned(
            sig,
            "Destroy function must receive owned self argument",
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let call_path = match trait_path {
        Some(trait_path) => quote! { <#self_ty as #trait_path>::#fn_name },
        None => quote! { <#self_ty>::#fn_name },
    };
    let ret_ty = match &sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };
    let abi_ty = quote! { <#ret_ty as ::theus_core::IntoBoundary>::Abi };

    let doc_comments = method
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .collect::<Vec<_>>();

    let export = if is_create {
        quote! {
            #(#doc_comments)*
            #[no_mangle]
            pub extern "C" fn #export_name(#(#params),*) -> u32 {
                ::theus_core::export::create::<#self_ty>(|| #call_path(#(#args),*))
            }
        }
    } else {
        match receiver {
            Receiver::None => quote! {
                #(#doc_comments)*
                #[no_mangle]
                pub extern "C" fn #export_name(#(#params),*) -> #abi_ty {
                    ::theus_core::IntoBoundary::into_boundary(#call_path(#(#args),*))
                }
            },
            Receiver::Shared => quote! {
                #(#doc_comments)*
                #[no_mangle]
                pub extern "C" fn #export_name(__theus_handle: u32, #(#params),*) -> #abi_ty {
                    ::theus_core::export::with_instance::<#self_ty, _>(
                        __theus_handle,
                        |__theus_this| #call_path(__theus_this, #(#args),*),
                    )
                }
            },
            Receiver::Owned => {
                let helper = if is_destroy {
                    quote! { destroy }
                } else {
                    quote! { consume }
                };
                quote! {
                    #(#doc_comments)*
                    #[no_mangle]
                    pub extern "C" fn #export_name(__theus_handle: u32, #(#params),*) -> #abi_ty {
                        ::theus_core::export::#helper::<#self_ty, _>(
                            __theus_handle,
                            |__theus_this| #call_path(__theus_this, #(#args),*),
                        )
                    }
                }
            }
        }
    };

    Ok(export)
}

fn type_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

fn is_scalar(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    if type_path.qself.is_some() {
        return false;
    }
    match type_path.path.segments.last() {
        Some(segment) => {
            segment.arguments.is_empty()
                && SCALAR_TYPES.contains(&segment.ident.to_string().as_str())
        }
        None => false,
    }
}

/// True if `ty` names `Self` or the implementing type anywhere inside it.
fn mentions_self(ty: &Type, self_ty: &Type) -> bool {
    let name = type_ident(self_ty);
    contains_ident(quote! { #ty }, |ident| {
        ident == "Self" || name.as_deref() == Some(ident)
    })
}

fn contains_ident(tokens: TokenStream2, matches: impl Fn(&str) -> bool + Copy) -> bool {
    tokens.into_iter().any(|token| match token {
        TokenTree::Ident(ident) => matches(&ident.to_string()),
        TokenTree::Group(group) => contains_ident(group.stream(), matches),
        _ => false,
    })
}
