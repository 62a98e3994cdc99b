mod attribute;
mod config;
mod field;

fn conflict_error(span: proc_macro2::Span, left: &str, right: &str) -> syn::Error {
    syn::Error::new(
        span,
        format!("Invalid - config cannot be both `#[cli({left})]` and `#[cli({right})]`."),
    )
}
