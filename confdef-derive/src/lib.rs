//! Derive macros for the confdef configuration library
//!
//! This crate provides `#[derive(FromConfig)]`, which builds a typed settings
//! struct out of a resolved configuration.
//!
//! # Usage
//!
//! ```text
//! use confdef::FromConfig;
//!
//! #[derive(FromConfig)]
//! #[config(prefix = "consumer")]
//! struct ConsumerSettings {
//!     threads: usize,                    // "consumer.threads"
//!     #[config(key = "consumer.request.timeout.ms")]
//!     request_timeout: u64,
//!     #[config(skip)]
//!     started: bool,                     // Default::default()
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive macro for generating `FromConfig` implementations.
///
/// # Attributes
///
/// ## Container attributes (`#[config(...)]`)
/// - `prefix = "name"` - Prepended with a dot to every derived key
///
/// ## Field attributes (`#[config(...)]`)
/// - `key = "a.b.c"` - Exact setting key, the prefix is not applied
/// - `flatten` - Build the field with its own `FromConfig` impl
/// - `skip` - Not read from the configuration, uses `Default::default()`
///
/// Without `key`, the setting key is the field name with `_` replaced by `.`
#[proc_macro_derive(FromConfig, attributes(config))]
pub fn derive_from_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let container = parse_container_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "FromConfig can only be derived for structs with named fields.\n\nExample:\n  #[derive(FromConfig)]\n  struct MySettings {\n      field: Type,\n  }",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "FromConfig can only be derived for structs.\n\nTry: #[derive(FromConfig)] on a struct, not an enum or union.",
            ));
        }
    };

    let mut initializers = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let field_type = &field.ty;
        let attrs = parse_field_attrs(&field.attrs)?;

        let init = if attrs.skip {
            quote! { <#field_type as ::core::default::Default>::default() }
        } else if attrs.flatten {
            quote! { <#field_type as confdef::FromConfig>::from_config(config)? }
        } else {
            let key = attrs.key.unwrap_or_else(|| {
                let derived = field_name.to_string().replace('_', ".");
                match &container.prefix {
                    Some(prefix) => format!("{prefix}.{derived}"),
                    None => derived,
                }
            });
            quote! { config.get::<#field_type>(#key)? }
        };

        initializers.push(quote! { #field_name: #init });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics confdef::FromConfig for #name #ty_generics #where_clause {
            fn from_config(config: &confdef::ResolvedConfig) -> confdef::Result<Self> {
                Ok(Self {
                    #(#initializers),*
                })
            }
        }
    })
}

/// Container-level attributes from #[config(...)]
#[derive(Default)]
struct ContainerAttrs {
    prefix: Option<String>,
}

/// Field-level attributes from #[config(...)]
#[derive(Default)]
struct FieldAttrs {
    key: Option<String>,
    flatten: bool,
    skip: bool,
}

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut result = ContainerAttrs::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("config")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("prefix") {
                let value: LitStr = meta.value()?.parse()?;
                result.prefix = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unknown container attribute.\n\nExpected: #[config(prefix = \"name\")]"))
            }
        })?;
    }

    Ok(result)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("config")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(syn::Error::new_spanned(value, "#[config(key)] must not be empty"));
                }
                result.key = Some(value.value());
            } else if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("flatten") {
                result.flatten = true;
            } else {
                return Err(meta.error(
                    "unknown field attribute.\n\nExpected one of: key = \"a.b\", flatten, skip",
                ));
            }
            Ok(())
        })?;
    }

    if result.skip && (result.flatten || result.key.is_some()) {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[config(skip)] cannot be combined with `key` or `flatten`",
        ));
    }

    Ok(result)
}
