//! The derive macro of `argot`; use it through the `argot` crate.
extern crate proc_macro;

mod generate;
mod load;
mod model;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::parse_macro_input;

use crate::model::DeriveConfig;

/// Derive `argot::Config`, binding every named field to a flag.
///
/// Field tags are string literals in `#[cli("...")]`, using the comma separated `key` or `key=value` grammar
/// (ex: `#[cli("short=p,env=PORT,help=port to listen on")]`).
/// The tag also picks how a field binds:
/// * `embed`: the field is a nested config record, flattened into this one.
/// * `args`: the field (a `Vec<String>`) receives the residual positional tokens.
/// * `append`: the field is a `Vec<T>`, and every occurrence of the flag appends to it.
/// * `-`: the field is skipped.
///
/// Any other field is a single valued flag.
/// `PhantomData` fields are skipped, and tuple or unit structs bind no fields.
///
/// Struct level `#[cli(before)]`, `#[cli(run)]` and `#[cli(run_cancellable)]` forward to the record's
/// `argot::Before`, `argot::Run` and `argot::RunCancellable` implementations, respectively.
#[proc_macro_derive(Config, attributes(cli))]
pub fn config(input: TokenStream) -> TokenStream {
    let derive_input = parse_macro_input!(input as syn::DeriveInput);

    match DeriveConfig::try_from(derive_input) {
        Ok(config) => TokenStream2::from(config).into(),
        Err(error) => error.to_compile_error().into(),
    }
}
