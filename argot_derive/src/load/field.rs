use argot_builder::parse_tag;

use crate::load::attribute::field_tag;
use crate::model::{DeriveField, FieldKind};

impl DeriveField {
    /// Load a named field, or `None` when the field binds nothing.
    pub(crate) fn load(field: &syn::Field) -> Result<Option<Self>, syn::Error> {
        let field_name = match &field.ident {
            Some(ident) => ident.clone(),
            None => {
                return Err(syn::Error::new_spanned(
                    field,
                    "Invalid - config fields must be named.",
                ))
            }
        };

        if is_phantom(&field.ty) {
            return Ok(None);
        }

        let tag = field_tag(&field.attrs)?;
        let keys: Vec<String> = parse_tag(&tag).into_iter().map(|(key, _)| key).collect();
        let has = |key: &str| keys.iter().any(|k| k == key);

        let kind = if has("-") {
            FieldKind::Skip
        } else if has("embed") {
            FieldKind::Embed
        } else if has("args") {
            FieldKind::Args
        } else if has("append") {
            FieldKind::Append
        } else {
            FieldKind::Scalar
        };

        Ok(Some(DeriveField {
            field_name,
            tag,
            kind,
        }))
    }
}

fn is_phantom(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "PhantomData"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Span;
    use rstest::rstest;
    use syn::parse_quote;

    fn load(field: syn::Field) -> Option<DeriveField> {
        DeriveField::load(&field).unwrap()
    }

    #[rstest]
    #[case("", FieldKind::Scalar)]
    #[case("short=p,help='embed, args or append'", FieldKind::Scalar)]
    #[case("append,short=t", FieldKind::Append)]
    #[case("args", FieldKind::Args)]
    #[case("embed", FieldKind::Embed)]
    #[case("-", FieldKind::Skip)]
    #[case("-,embed,bogus", FieldKind::Skip)]
    fn load_kind(#[case] tag: &str, #[case] expected: FieldKind) {
        // Setup
        let literal = syn::LitStr::new(tag, Span::call_site());
        let field: syn::Field = parse_quote! {
            #[cli(#literal)]
            my_field: u32
        };

        // Execute
        let derive_field = load(field).unwrap();

        // Verify
        assert_eq!(
            derive_field,
            DeriveField {
                field_name: ident("my_field"),
                tag: tag.to_string(),
                kind: expected,
            }
        );
    }

    #[test]
    fn load_raw_ident() {
        let field: syn::Field = parse_quote! { r#type: String };
        let derive_field = load(field).unwrap();
        assert_eq!(derive_field.field_name.to_string(), "r#type");
    }

    #[rstest]
    #[case(parse_quote! { marker: PhantomData<u8> })]
    #[case(parse_quote! { marker: std::marker::PhantomData<fn() -> u8> })]
    fn load_phantom(#[case] field: syn::Field) {
        assert_eq!(load(field), None);
    }

    #[test]
    fn load_unnamed() {
        let field = syn::Field {
            attrs: vec![],
            vis: syn::Visibility::Inherited,
            mutability: syn::FieldMutability::None,
            ident: None,
            colon_token: None,
            ty: parse_quote! { u8 },
        };
        assert!(DeriveField::load(&field).is_err());
    }

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }
}
