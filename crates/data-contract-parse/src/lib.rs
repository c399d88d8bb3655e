//! Shared parsing utilities for data-contract proc macros.
//!
//! This crate parses the body of `data_contract!`:
//!
//! ```text
//! /// docs
//! pub contract EntityMethods => EntityDataProvider {
//!     /// docs
//!     fn find_entity_by_name(String) -> Entity, errors = EntityNotFound;
//!     #[method(name = "create")]
//!     fn create_entity(NewEntity) -> Result<Entity, CreateEntityError>;
//!     fn count_entities() -> u64;
//! }
//! ```

use std::collections::HashMap;

use heck::ToLowerCamelCase;
use proc_macro2::Span;
use syn::parse::{Parse, ParseStream};
use syn::{
    Attribute, GenericArgument, Ident, Lit, Meta, PathArguments, Token, Type, Visibility,
    parenthesized,
};

mod kw {
    syn::custom_keyword!(contract);
    syn::custom_keyword!(errors);
}

/// A parsed contract: a closed, named list of methods.
#[derive(Debug, Clone)]
pub struct ContractDef {
    /// Attributes on the contract (docs are forwarded to the contract type)
    pub attrs: Vec<Attribute>,
    /// Visibility of everything generated
    pub vis: Visibility,
    /// Contract type name
    pub name: Ident,
    /// Provider trait name
    pub provider: Ident,
    /// Methods in declaration order
    pub methods: Vec<MethodDef>,
}

/// One method of a contract
#[derive(Debug, Clone)]
pub struct MethodDef {
    /// Doc attributes, forwarded to the marker type and the trait method
    pub docs: Vec<Attribute>,
    /// Rust identifier of the trait method
    pub ident: Ident,
    /// Literal name used as the merge key
    pub wire_name: String,
    /// Span to report name conflicts at
    pub name_span: Span,
    /// Input type
    pub input: Type,
    /// Output type
    pub output: Type,
    /// Declared error type; None means no errors
    pub errors: Option<Type>,
}

impl Parse for ContractDef {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;

        if !input.peek(kw::contract) {
            return Err(input.error(
                "expected `contract`\n\
                 \n\
                 Example:\n\
                 data_contract! {\n\
                     pub contract EntityMethods => EntityDataProvider {\n\
                         fn find_entity(String) -> Entity;\n\
                     }\n\
                 }",
            ));
        }
        input.parse::<kw::contract>()?;
        let name: Ident = input.parse()?;
        input.parse::<Token![=>]>().map_err(|e| {
            syn::Error::new(
                e.span(),
                "expected `=>` followed by the provider trait name\n\
                 \n\
                 Example: pub contract EntityMethods => EntityDataProvider { ... }",
            )
        })?;
        let provider: Ident = input.parse()?;

        let content;
        syn::braced!(content in input);
        let mut methods = Vec::new();
        while !content.is_empty() {
            methods.push(content.parse::<MethodDef>()?);
        }

        check_unique(&methods)?;

        Ok(Self {
            attrs,
            vis,
            name,
            provider,
            methods,
        })
    }
}

impl Parse for MethodDef {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        input.parse::<Token![fn]>()?;
        let ident: Ident = input.parse()?;

        let (wire_name, name_span) = match parse_method_attrs(&attrs)? {
            Some(lit) => (lit.value(), lit.span()),
            None => (ident.to_string().to_lower_camel_case(), ident.span()),
        };
        if wire_name.is_empty() {
            return Err(syn::Error::new(name_span, "method name must not be empty"));
        }

        let args;
        parenthesized!(args in input);
        let input_ty: Type = if args.is_empty() {
            syn::parse_quote!(())
        } else {
            args.parse()?
        };
        if !args.is_empty() {
            return Err(args.error(
                "a method takes exactly one input type\n\
                 \n\
                 Hint: group several values into a struct or tuple:\n\
                 fn create_entity(NewEntity) -> Entity;",
            ));
        }

        input.parse::<Token![->]>()?;
        let mut output: Type = input.parse()?;

        let mut errors = None;
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            input.parse::<kw::errors>()?;
            input.parse::<Token![=]>()?;
            errors = Some(input.parse::<Type>()?);
        }
        input.parse::<Token![;]>()?;

        // `-> Result<T, E>` is shorthand for `-> T, errors = E`
        if let Some((ok, err)) = extract_result_types(&output) {
            if errors.is_some() {
                return Err(syn::Error::new_spanned(
                    &output,
                    "errors declared twice\n\
                     \n\
                     Use either `-> Result<T, E>` or `-> T, errors = E`, not both",
                ));
            }
            output = ok;
            errors = Some(err);
        }

        let docs = attrs
            .into_iter()
            .filter(|attr| attr.path().is_ident("doc"))
            .collect();

        Ok(Self {
            docs,
            ident,
            wire_name,
            name_span,
            input: input_ty,
            output,
            errors,
        })
    }
}

/// Parse #[method(...)] attributes, returning the name override if any.
///
/// Non-doc attributes other than `method` are rejected.
pub fn parse_method_attrs(attrs: &[Attribute]) -> syn::Result<Option<syn::LitStr>> {
    let mut name = None;

    for attr in attrs {
        if attr.path().is_ident("doc") {
            continue;
        }
        if !attr.path().is_ident("method") {
            return Err(syn::Error::new_spanned(
                attr,
                "unsupported attribute on a contract method\n\
                 \n\
                 Only doc comments and #[method(...)] are allowed here",
            ));
        }

        attr.parse_nested_meta(|meta| {
            // #[method(name = "...")]
            if meta.path.is_ident("name") {
                let value = meta.value()?;
                if !value.peek(syn::LitStr) {
                    return Err(value.error(
                        "method name must be a string literal\n\
                         \n\
                         Example: #[method(name = \"findEntityByName\")]",
                    ));
                }
                name = Some(value.parse::<syn::LitStr>()?);
                Ok(())
            } else {
                Err(meta.error(
                    "unknown attribute\n\
                     \n\
                     Valid attributes: name\n\
                     \n\
                     Example: #[method(name = \"findEntityByName\")]",
                ))
            }
        })?;
    }

    Ok(name)
}

/// Reject two methods with the same name or the same identifier.
pub fn check_unique(methods: &[MethodDef]) -> syn::Result<()> {
    let mut names: HashMap<&str, &Ident> = HashMap::new();
    let mut idents: HashMap<String, &Ident> = HashMap::new();

    for method in methods {
        if let Some(first) = names.insert(method.wire_name.as_str(), &method.ident) {
            return Err(syn::Error::new(
                method.name_span,
                format!(
                    "duplicate method name `{}` (also used by `{}`)\n\
                     \n\
                     Method names must be unique within a contract.\n\
                     Rename one with #[method(name = \"...\")]",
                    method.wire_name, first
                ),
            ));
        }
        if idents
            .insert(method.ident.to_string(), &method.ident)
            .is_some()
        {
            return Err(syn::Error::new(
                method.ident.span(),
                format!("method `{}` is defined more than once", method.ident),
            ));
        }
    }

    Ok(())
}

/// Extract doc comments from attributes
pub fn extract_docs(attrs: &[Attribute]) -> Option<String> {
    let docs: Vec<String> = attrs
        .iter()
        .filter_map(|attr| {
            if attr.path().is_ident("doc")
                && let Meta::NameValue(meta) = &attr.meta
                && let syn::Expr::Lit(syn::ExprLit {
                    lit: Lit::Str(s), ..
                }) = &meta.value
            {
                return Some(s.value().trim().to_string());
            }
            None
        })
        .collect();

    if docs.is_empty() {
        None
    } else {
        Some(docs.join("\n"))
    }
}

/// Check if a type is Result<T, E> and extract T and E
pub fn extract_result_types(ty: &Type) -> Option<(Type, Type)> {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "Result"
        && let PathArguments::AngleBracketed(args) = &segment.arguments
    {
        let mut iter = args.args.iter();
        if let (Some(GenericArgument::Type(ok)), Some(GenericArgument::Type(err))) =
            (iter.next(), iter.next())
        {
            return Some((ok.clone(), err.clone()));
        }
    }
    None
}
