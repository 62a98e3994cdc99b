use proc_macro2::TokenStream as TokenStream2;

#[derive(Debug, Clone, Default)]
pub struct DeriveValue {
    pub tokens: TokenStream2,
}

impl PartialEq for DeriveValue {
    fn eq(&self, other: &Self) -> bool {
        self.tokens.to_string() == other.tokens.to_string()
    }
}

impl Eq for DeriveValue {}

/// The pieces of `syn::Generics::split_for_impl`, kept as tokens.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeriveGenerics {
    pub impl_generics: DeriveValue,
    pub type_generics: DeriveValue,
    pub where_clause: DeriveValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    Append,
    Args,
    Embed,
    Skip,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveField {
    pub field_name: syn::Ident,
    pub tag: String,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunHook {
    #[default]
    None,
    Plain,
    Cancellable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeriveHooks {
    pub before: bool,
    pub run: RunHook,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveConfig {
    pub struct_name: syn::Ident,
    pub generics: DeriveGenerics,
    pub hooks: DeriveHooks,
    pub fields: Vec<DeriveField>,
}
