use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;

use crate::model::{DeriveField, FieldKind};

impl DeriveField {
    pub(crate) fn generate(self) -> TokenStream2 {
        let DeriveField {
            field_name,
            tag,
            kind,
        } = self;
        let field_name_str = field_name.unraw().to_string();
        let method = match kind {
            FieldKind::Scalar => quote! { field },
            FieldKind::Append => quote! { append },
            FieldKind::Args => quote! { args },
            FieldKind::Embed => quote! { embed },
            FieldKind::Skip => {
                return quote! {
                    binder.skip(#field_name_str, #tag)?;
                }
            }
        };

        quote! {
            binder.#method(#field_name_str, #tag, &mut self.#field_name)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Span;
    use rstest::rstest;

    #[rstest]
    #[case(FieldKind::Scalar, r#"binder . field ("my_field" , "short=m" , & mut self . my_field) ? ;"#)]
    #[case(FieldKind::Append, r#"binder . append ("my_field" , "short=m" , & mut self . my_field) ? ;"#)]
    #[case(FieldKind::Args, r#"binder . args ("my_field" , "short=m" , & mut self . my_field) ? ;"#)]
    #[case(FieldKind::Embed, r#"binder . embed ("my_field" , "short=m" , & mut self . my_field) ? ;"#)]
    fn render_derive_field(#[case] kind: FieldKind, #[case] expected: &str) {
        // Setup
        let field = DeriveField {
            field_name: syn::Ident::new("my_field", Span::call_site()),
            tag: "short=m".to_string(),
            kind,
        };

        // Execute
        let token_stream = field.generate();

        // Verify
        assert_eq!(token_stream.to_string(), expected);
    }

    #[test]
    fn render_derive_field_skip() {
        let field = DeriveField {
            field_name: syn::Ident::new("cache", Span::call_site()),
            tag: "-".to_string(),
            kind: FieldKind::Skip,
        };
        assert_eq!(
            field.generate().to_string(),
            r#"binder . skip ("cache" , "-") ? ;"#
        );
    }

    #[test]
    fn render_derive_field_raw() {
        // Setup
        let field = DeriveField {
            field_name: syn::Ident::new_raw("type", Span::call_site()),
            tag: String::default(),
            kind: FieldKind::Scalar,
        };

        // Execute
        let token_stream = field.generate();

        // Verify
        assert_eq!(
            token_stream.to_string(),
            r#"binder . field ("type" , "" , & mut self . r#type) ? ;"#
        );
    }
}
