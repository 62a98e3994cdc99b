use quote::ToTokens;

use crate::load::attribute::struct_hooks;
use crate::model::{DeriveConfig, DeriveField, DeriveGenerics, DeriveValue};

impl TryFrom<syn::DeriveInput> for DeriveConfig {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let hooks = struct_hooks(&value.attrs)?;
        let fields = match &value.data {
            syn::Data::Struct(syn::DataStruct {
                fields: syn::Fields::Named(fields),
                ..
            }) => fields
                .named
                .iter()
                .map(DeriveField::load)
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .flatten()
                .collect(),
            syn::Data::Struct(_) => Vec::default(),
            syn::Data::Enum(_) | syn::Data::Union(_) => {
                return Err(syn::Error::new(
                    value.ident.span(),
                    "Invalid - `Config` can only be derived for structs.",
                ));
            }
        };
        let (impl_generics, type_generics, where_clause) = value.generics.split_for_impl();

        Ok(DeriveConfig {
            struct_name: value.ident.clone(),
            generics: DeriveGenerics {
                impl_generics: DeriveValue {
                    tokens: impl_generics.to_token_stream(),
                },
                type_generics: DeriveValue {
                    tokens: type_generics.to_token_stream(),
                },
                where_clause: DeriveValue {
                    tokens: where_clause.to_token_stream(),
                },
            },
            hooks,
            fields,
        })
    }
}
