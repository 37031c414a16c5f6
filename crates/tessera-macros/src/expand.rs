//! `#[derive(Bind)]` expansion.
//!
//! The generated `visit_fields` reports fields in declaration order. Every
//! field without `#[bind(nested)]` first goes through
//! `tessera_bind::__private::Probe::walk_nested`, which recurses when the
//! field type is `Bindable` and is a no-op otherwise. A tagged field that was
//! not walked is then classified as an assignable, read-only or unsupported
//! leaf; the binder turns the last two into errors when the field is reached.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::parse::{BindField, BindStruct, FieldRole};

/// Expands `#[derive(Bind)]`.
pub fn expand_derive_bind(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;
    let target = BindStruct::parse(input)?;

    Ok(generate_bindable_impl(&target))
}

fn generate_bindable_impl(target: &BindStruct) -> TokenStream {
    let ident = &target.ident;
    let (impl_generics, ty_generics, where_clause) = target.generics.split_for_impl();
    let visits: Vec<TokenStream> = target.fields.iter().map(generate_visit).collect();

    quote! {
        #[automatically_derived]
        impl #impl_generics ::tessera_bind::Bindable for #ident #ty_generics #where_clause {
            #[allow(unused_imports, unused_variables)]
            fn visit_fields(
                &mut self,
                __visitor: &mut dyn ::tessera_bind::FieldVisitor,
            ) -> ::core::result::Result<(), ::tessera_bind::BindError> {
                use ::tessera_bind::__private::{
                    AssignableLeaf as _, NestedField as _, PlainField as _, SharedLeaf as _,
                    UnsupportedLeaf as _,
                };

                #(#visits)*
                ::core::result::Result::Ok(())
            }
        }
    }
}

fn generate_visit(field: &BindField) -> TokenStream {
    let member = &field.member;
    let name = &field.name;

    match &field.role {
        FieldRole::Untagged => quote! {
            (&&::tessera_bind::__private::Probe::new(&mut self.#member))
                .walk_nested(#name, __visitor)?;
        },
        FieldRole::Param(param) => quote! {
            if !(&&::tessera_bind::__private::Probe::new(&mut self.#member))
                .walk_nested(#name, __visitor)?
            {
                __visitor.leaf(::tessera_bind::FieldSlot::new(
                    #name,
                    #param,
                    (&&&::tessera_bind::__private::Probe::new(&mut self.#member)).leaf_target(),
                ))?;
            }
        },
        FieldRole::Nested => quote! {
            __visitor.nested(#name, &mut self.#member)?;
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: TokenStream) -> String {
        expand_derive_bind(input).unwrap().to_string()
    }

    #[test]
    fn test_expand_tagged_and_nested_fields() {
        let output = expand(quote! {
            struct User {
                #[bind(param = "user_id")]
                user_id: String,
                #[bind(nested)]
                profile: Profile,
                note: String,
            }
        });

        assert!(output.contains("impl :: tessera_bind :: Bindable for User"));
        assert!(output.contains("\"user_id\""));
        assert!(output.contains("__visitor . nested (\"profile\""));
        assert!(output.contains("walk_nested (\"note\""));
    }

    #[test]
    fn test_expand_preserves_declaration_order() {
        let output = expand(quote! {
            struct Order {
                #[bind(param = "b")]
                second: i32,
                #[bind(param = "a")]
                first: i32,
            }
        });

        let b = output.find("\"b\"").unwrap();
        let a = output.find("\"a\"").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_expand_generic_struct() {
        let output = expand(quote! {
            struct Page<T: Default> {
                #[bind(param = "limit")]
                limit: i32,
                items: Vec<T>,
            }
        });

        assert!(output.contains("impl < T : Default > :: tessera_bind :: Bindable for Page < T >"));
    }

    #[test]
    fn test_expand_tuple_struct() {
        let output = expand(quote! {
            struct UserId(#[bind(param = "id")] i64);
        });

        assert!(output.contains("self . 0"));
    }

    #[test]
    fn test_expand_tagged_field_tries_nested_walk_first() {
        let output = expand(quote! {
            struct Wrapper {
                #[bind(param = "profile")]
                profile: Profile,
            }
        });

        let walk = output.find("walk_nested (\"profile\"").unwrap();
        let leaf = output.find("__visitor . leaf").unwrap();
        assert!(walk < leaf);
    }

    #[test]
    fn test_expand_struct_without_tags() {
        let output = expand(quote! {
            struct Plain {
                name: String,
            }
        });

        assert!(!output.contains("__visitor . leaf"));
        assert!(output.contains("walk_nested (\"name\""));
        assert!(output.contains("Ok (())"));
    }

    #[test]
    fn test_expand_rejects_enum() {
        let result = expand_derive_bind(quote! {
            enum Kind { A }
        });
        assert!(result.is_err());
    }
}
