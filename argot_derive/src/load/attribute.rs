use syn::punctuated::Punctuated;

use crate::load::conflict_error;
use crate::model::{DeriveHooks, RunHook};

const CLI: &str = "cli";

/// The field's tag: every `#[cli("..")]` literal, joined by commas.
pub(crate) fn field_tag(attributes: &[syn::Attribute]) -> Result<String, syn::Error> {
    let mut parts = Vec::default();

    for attribute in attributes {
        if attribute.path().is_ident(CLI) {
            let literals = attribute
                .parse_args_with(Punctuated::<syn::LitStr, syn::Token![,]>::parse_terminated)?;
            parts.extend(literals.iter().map(syn::LitStr::value));
        }
    }

    Ok(parts.join(","))
}

/// The record's hooks, from `#[cli(before, run)]` style attributes.
pub(crate) fn struct_hooks(attributes: &[syn::Attribute]) -> Result<DeriveHooks, syn::Error> {
    let mut hooks = DeriveHooks::default();

    for attribute in attributes {
        if !attribute.path().is_ident(CLI) {
            continue;
        }

        let idents = attribute
            .parse_args_with(Punctuated::<syn::Ident, syn::Token![,]>::parse_terminated)?;

        for ident in idents {
            let run = match ident.to_string().as_str() {
                "before" => {
                    hooks.before = true;
                    continue;
                }
                "run" => RunHook::Plain,
                "run_cancellable" => RunHook::Cancellable,
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("Invalid - unknown config attribute `{other}`."),
                    ));
                }
            };

            match (hooks.run, run) {
                (RunHook::Plain, RunHook::Cancellable) | (RunHook::Cancellable, RunHook::Plain) => {
                    return Err(conflict_error(ident.span(), "run", "run_cancellable"));
                }
                _ => hooks.run = run,
            }
        }
    }

    Ok(hooks)
}
