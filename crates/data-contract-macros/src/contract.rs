//! Contract expansion.
//!
//! For
//!
//! ```ignore
//! data_contract! {
//!     pub contract EntityMethods => EntityDataProvider {
//!         fn find_entity_by_name(String) -> Entity, errors = EntityNotFound;
//!         fn count_entities() -> u64;
//!     }
//! }
//! ```
//!
//! generates:
//!
//! - `pub struct EntityMethods` implementing `DataContract`
//! - `pub mod entity_methods` with one marker per method (`FindEntityByName`,
//!   `CountEntities`), each implementing `DataMethod`
//! - `pub trait EntityDataProvider` with one async operation per method,
//!   returning `Outcome<Marker>`: the bare output, or `Res<Output, Error>`
//!   when errors are declared
//!
//! Each marker caches its schemas in function-local statics, so the validator,
//! the signature and typed parsing share one compiled validator per type.
//!
//! Marker impls are emitted next to the invocation, not inside the marker
//! module, so input and output types resolve in the caller's scope even when
//! a type shares its name with a marker.

use data_contract_parse::{ContractDef, MethodDef, extract_docs};
use heck::{ToSnakeCase, ToUpperCamelCase};
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::Ident;

pub(crate) fn expand_data_contract(def: ContractDef) -> syn::Result<TokenStream2> {
    let ContractDef {
        attrs,
        vis,
        name,
        provider,
        methods,
    } = def;

    let module = format_ident!("{}", name.to_string().to_snake_case(), span = name.span());
    let module_doc = format!("Method markers of [`{name}`].");
    let provider_doc = format!("Operations a backing implementation of [`{name}`] must provide.");

    let markers: Vec<Ident> = methods.iter().map(marker_ident).collect();
    let wire_names: Vec<&str> = methods.iter().map(|m| m.wire_name.as_str()).collect();

    let marker_structs = methods.iter().zip(&markers).map(|(method, marker)| {
        let docs = marker_docs(method);
        quote! {
            #docs
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            pub struct #marker;
        }
    });

    let marker_impls = methods.iter().zip(&markers).map(|(method, marker)| {
        let wire_name = &method.wire_name;
        let input = &method.input;
        let output = &method.output;
        let (errors, errors_schema) = match &method.errors {
            Some(err) => {
                let schema = cached_schema(err);
                (
                    quote! { ::data_contract::Declared<#err> },
                    quote! { ::core::option::Option::Some(#schema) },
                )
            }
            None => (
                quote! { ::data_contract::NoErrors },
                quote! { ::core::option::Option::None },
            ),
        };
        let input_schema = cached_schema(input);
        let output_schema = cached_schema(output);
        quote! {
            impl ::data_contract::DataMethod for #module::#marker {
                const NAME: &'static str = #wire_name;
                type Input = #input;
                type Output = #output;
                type Errors = #errors;

                fn input_schema() -> ::data_contract::Schema {
                    #input_schema
                }

                fn output_schema() -> ::data_contract::Schema {
                    #output_schema
                }

                fn errors_schema() -> ::core::option::Option<::data_contract::Schema> {
                    #errors_schema
                }
            }
        }
    });

    let operations = methods.iter().zip(&markers).map(|(method, marker)| {
        let docs = &method.docs;
        let ident = &method.ident;
        let input = &method.input;
        quote! {
            #(#docs)*
            fn #ident(
                &self,
                input: #input,
            ) -> impl ::core::future::Future<
                Output = ::data_contract::Outcome<#module::#marker>,
            > + ::core::marker::Send;
        }
    });

    Ok(quote! {
        #(#attrs)*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        #vis struct #name;

        #[doc = #module_doc]
        #vis mod #module {
            #(#marker_structs)*
        }

        #(#marker_impls)*

        impl ::data_contract::DataContract for #name {
            const METHOD_NAMES: &'static [&'static str] = &[#(#wire_names),*];

            fn definitions() -> ::std::vec::Vec<::data_contract::MethodDefinition> {
                ::std::vec![
                    #(<#module::#markers as ::data_contract::DataMethod>::definition()),*
                ]
            }
        }

        #[doc = #provider_doc]
        #vis trait #provider: ::core::marker::Send + ::core::marker::Sync {
            #(#operations)*
        }
    })
}

/// One schema handle per marker, built on first use.
fn cached_schema(ty: &syn::Type) -> TokenStream2 {
    quote! {
        {
            static SCHEMA: ::std::sync::OnceLock<::data_contract::Schema> =
                ::std::sync::OnceLock::new();
            SCHEMA
                .get_or_init(::data_contract::Schema::of::<#ty>)
                .clone()
        }
    }
}

/// `find_entity_by_name` -> `FindEntityByName`
fn marker_ident(method: &MethodDef) -> Ident {
    format_ident!(
        "{}",
        method.ident.to_string().to_upper_camel_case(),
        span = method.ident.span()
    )
}

fn marker_docs(method: &MethodDef) -> TokenStream2 {
    let marker = format!("Marker for the `{}` method.", method.wire_name);
    let doc = match extract_docs(&method.docs) {
        Some(docs) => format!("{docs}\n\n{marker}"),
        None => marker,
    };
    quote! { #[doc = #doc] }
}
