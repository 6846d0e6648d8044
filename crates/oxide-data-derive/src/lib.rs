//! Derive macro for aggregate mapping metadata.
//!
//! This crate provides the `#[derive(Aggregate)]` macro, which describes how
//! a struct maps onto its table so that repository queries can be derived
//! from method names.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, GenericArgument, Ident, Lit,
    Meta, PathArguments, Type,
};

/// Derives `Aggregate` for a struct with named fields.
///
/// # Attributes
///
/// - `#[aggregate(table = "table_name")]` - Specifies the table name
///   (optional, defaults to snake_case of struct name)
///
/// # Field Attributes
///
/// - `#[property(id)]` - Marks the identifier
/// - `#[property(column = "column_name")]` - Overrides the column name
/// - `#[property(embedded)]` - A value object stored in the same table; its
///   type must derive `Aggregate` too
/// - `#[property(prefix = "addr_")]` - Column prefix of an embedded value
///   (defaults to the field name followed by `_`)
/// - `#[property(reference)]` - A reference to another aggregate
/// - `#[property(collection)]` - A collection of child entities
/// - `#[property(transient)]` - Not persisted
///
/// `Option<T>` maps like `T`, `Vec<u8>` maps to bytes and any other `Vec<T>`
/// to an array of `T`. Structs with type or const parameters are rejected;
/// lifetimes are fine.
#[proc_macro_derive(Aggregate, attributes(aggregate, property))]
pub fn derive_aggregate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_aggregate_impl(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_aggregate_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let table_name = get_table_name(&input.attrs, struct_name)?;

    // The metadata lives in one static shared by every instantiation.
    let generics = &input.generics;
    if generics.type_params().next().is_some() || generics.const_params().next().is_some() {
        return Err(syn::Error::new_spanned(
            generics,
            "Aggregate derive does not support type or const parameters",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Aggregate derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Aggregate derive only supports structs",
            ));
        }
    };

    let mut properties = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_property_attrs(&field.attrs)?;
        if attrs.transient {
            continue;
        }
        properties.push(property_tokens(field_name, &field.ty, attrs)?);
    }

    let struct_str = struct_name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::oxide_data_repository::mapping::Aggregate
            for #struct_name #ty_generics #where_clause
        {
            fn metadata() -> &'static ::oxide_data_repository::mapping::EntityMetadata {
                static METADATA: ::std::sync::OnceLock<
                    ::oxide_data_repository::mapping::EntityMetadata,
                > = ::std::sync::OnceLock::new();
                METADATA.get_or_init(|| {
                    ::oxide_data_repository::mapping::EntityMetadata::new(#struct_str, #table_name)
                        #(.with_property(#properties))*
                })
            }
        }
    })
}

fn property_tokens(name: &Ident, ty: &Type, attrs: PropertyAttrs) -> syn::Result<TokenStream2> {
    let name_str = name.to_string();
    let kinds = [attrs.embedded, attrs.reference, attrs.collection]
        .into_iter()
        .filter(|k| *k)
        .count();
    if kinds > 1 {
        return Err(syn::Error::new_spanned(
            name,
            "a property is at most one of embedded, reference and collection",
        ));
    }

    let mut tokens = if attrs.embedded {
        let inner = unwrap_wrappers(ty);
        let prefix = attrs.prefix.unwrap_or_else(|| format!("{name_str}_"));
        quote! {
            ::oxide_data_repository::mapping::PersistentProperty::embedded(
                #name_str,
                #prefix,
                <#inner as ::oxide_data_repository::mapping::Aggregate>::metadata()
                    .properties
                    .clone(),
            )
        }
    } else if attrs.reference {
        let target = type_name(unwrap_wrappers(ty));
        quote! {
            ::oxide_data_repository::mapping::PersistentProperty::reference(#name_str, #target)
        }
    } else if attrs.collection {
        let element = generic_argument(unwrap_wrappers(ty), "Vec").ok_or_else(|| {
            syn::Error::new_spanned(ty, "collection properties must be a Vec")
        })?;
        let target = type_name(unwrap_wrappers(element));
        quote! {
            ::oxide_data_repository::mapping::PersistentProperty::collection(#name_str, #target)
        }
    } else {
        let property_type = property_type(ty);
        quote! {
            ::oxide_data_repository::mapping::PersistentProperty::simple(#name_str, #property_type)
        }
    };

    if let Some(column) = attrs.column {
        tokens = quote! { #tokens.with_column(#column) };
    }
    if attrs.id {
        tokens = quote! { #tokens.id() };
    }
    Ok(tokens)
}

/// Maps a Rust type to a `PropertyType` expression.
fn property_type(ty: &Type) -> TokenStream2 {
    let ty = unwrap_wrappers(ty);
    if let Some(element) = generic_argument(ty, "Vec") {
        if type_name(element) == "u8" {
            return quote! { ::oxide_data_repository::PropertyType::Bytes };
        }
        let element = property_type(element);
        return quote! {
            ::oxide_data_repository::PropertyType::Array(::std::boxed::Box::new(#element))
        };
    }
    let name = type_name(ty);
    let variant = match name.as_str() {
        "bool" => "Bool",
        "i8" => "Int8",
        "i16" => "Int16",
        "i32" => "Int32",
        "i64" => "Int64",
        "u8" => "UInt8",
        "u16" => "UInt16",
        "u32" => "UInt32",
        "u64" => "UInt64",
        "f32" => "Float32",
        "f64" => "Float64",
        "Decimal" => "Decimal",
        "String" | "str" => "Text",
        "char" => "Char",
        "NaiveDate" => "Date",
        "NaiveTime" => "Time",
        "NaiveDateTime" => "Timestamp",
        "DateTime" => "TimestampTz",
        _ => {
            return match name.as_str() {
                "Uuid" => quote! {
                    ::oxide_data_repository::PropertyType::Vendor(
                        ::oxide_data_repository::VendorType::Uuid,
                    )
                },
                "Value" | "JsonValue" => quote! {
                    ::oxide_data_repository::PropertyType::Vendor(
                        ::oxide_data_repository::VendorType::Json,
                    )
                },
                "IpAddr" | "IpNetwork" => quote! {
                    ::oxide_data_repository::PropertyType::Vendor(
                        ::oxide_data_repository::VendorType::Inet,
                    )
                },
                "Duration" => quote! {
                    ::oxide_data_repository::PropertyType::Vendor(
                        ::oxide_data_repository::VendorType::Interval,
                    )
                },
                _ => quote! {
                    ::oxide_data_repository::PropertyType::Other(::std::string::String::from(#name))
                },
            };
        }
    };
    let variant = Ident::new(variant, proc_macro2::Span::call_site());
    quote! { ::oxide_data_repository::PropertyType::#variant }
}

/// Strips `Option`, `Box` and references.
fn unwrap_wrappers(ty: &Type) -> &Type {
    if let Type::Reference(reference) = ty {
        return unwrap_wrappers(&reference.elem);
    }
    for wrapper in ["Option", "Box"] {
        if let Some(inner) = generic_argument(ty, wrapper) {
            return unwrap_wrappers(inner);
        }
    }
    ty
}

/// The single type argument of `wrapper<T>`, if `ty` is one.
fn generic_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

fn type_name(ty: &Type) -> String {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default(),
        Type::Reference(reference) => type_name(&reference.elem),
        other => quote!(#other).to_string().replace(' ', ""),
    }
}

#[derive(Default)]
struct PropertyAttrs {
    id: bool,
    column: Option<String>,
    embedded: bool,
    prefix: Option<String>,
    reference: bool,
    collection: bool,
    transient: bool,
}

fn get_table_name(attrs: &[Attribute], struct_name: &Ident) -> syn::Result<String> {
    for attr in attrs {
        if attr.path().is_ident("aggregate") {
            let mut table_name = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    table_name = Some(string_value(&meta.value()?.parse()?, &meta.path)?);
                    Ok(())
                } else {
                    Err(meta.error("unknown aggregate attribute"))
                }
            })?;
            if let Some(name) = table_name {
                return Ok(name);
            }
        }
    }
    // Default to snake_case of struct name
    Ok(to_snake_case(&struct_name.to_string()))
}

fn parse_property_attrs(attrs: &[Attribute]) -> syn::Result<PropertyAttrs> {
    let mut result = PropertyAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("property") || matches!(attr.meta, Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                result.id = true;
            } else if meta.path.is_ident("embedded") {
                result.embedded = true;
            } else if meta.path.is_ident("reference") {
                result.reference = true;
            } else if meta.path.is_ident("collection") {
                result.collection = true;
            } else if meta.path.is_ident("transient") {
                result.transient = true;
            } else if meta.path.is_ident("column") {
                result.column = Some(string_value(&meta.value()?.parse()?, &meta.path)?);
            } else if meta.path.is_ident("prefix") {
                result.prefix = Some(string_value(&meta.value()?.parse()?, &meta.path)?);
            } else {
                return Err(meta.error("unknown property attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn string_value(value: &Expr, path: &syn::Path) -> syn::Result<String> {
    if let Expr::Lit(lit) = value {
        if let Lit::Str(s) = &lit.lit {
            return Ok(s.value());
        }
    }
    Err(syn::Error::new_spanned(path, "expected a string literal"))
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
