use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::model::{DeriveConfig, DeriveGenerics, DeriveHooks, RunHook};

impl From<DeriveConfig> for TokenStream2 {
    fn from(value: DeriveConfig) -> Self {
        let DeriveConfig {
            struct_name,
            generics,
            hooks,
            fields,
        } = value;
        let DeriveGenerics {
            impl_generics,
            type_generics,
            where_clause,
        } = generics;
        let impl_generics = impl_generics.tokens;
        let type_generics = type_generics.tokens;
        let where_clause = where_clause.tokens;

        let bind = if fields.is_empty() {
            quote! {
                let _ = binder;
            }
        } else {
            let fields = fields.into_iter().map(|field| field.generate());
            quote! {
                #( #fields )*
            }
        };
        let hooks = generate_hooks(hooks);

        quote! {
            impl #impl_generics ::argot::Config for #struct_name #type_generics #where_clause {
                fn bind<'__argot>(
                    &'__argot mut self,
                    binder: &mut ::argot::Binder<'__argot>,
                ) -> ::std::result::Result<(), ::argot::BindError> {
                    #bind
                    ::std::result::Result::Ok(())
                }

                #hooks
            }
        }
    }
}

fn generate_hooks(hooks: DeriveHooks) -> TokenStream2 {
    let before = if hooks.before {
        quote! {
            fn before(&mut self) -> ::std::result::Result<(), ::argot::RunError> {
                ::argot::Before::before(self)
            }
        }
    } else {
        TokenStream2::default()
    };
    let run = match hooks.run {
        RunHook::None => TokenStream2::default(),
        RunHook::Plain => quote! {
            fn run_mode(&self) -> ::argot::RunMode {
                ::argot::RunMode::Plain
            }

            fn run(
                &mut self,
                _cancellation: &::argot::Cancellation,
            ) -> ::std::result::Result<(), ::argot::RunError> {
                ::argot::Run::run(self)
            }
        },
        RunHook::Cancellable => quote! {
            fn run_mode(&self) -> ::argot::RunMode {
                ::argot::RunMode::Cancellable
            }

            fn run(
                &mut self,
                cancellation: &::argot::Cancellation,
            ) -> ::std::result::Result<(), ::argot::RunError> {
                ::argot::RunCancellable::run(self, cancellation)
            }
        },
    };

    quote! {
        #before
        #run
    }
}
