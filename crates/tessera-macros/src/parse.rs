//! Parsing for `#[derive(Bind)]`.
//!
//! This module reads the target struct and the `#[bind(...)]` attributes on
//! its fields.

use syn::{
    spanned::Spanned, Data, DeriveInput, Field, Fields, Generics, Ident, Index, LitStr, Member,
};

/// What the binder does with a field.
#[derive(Debug)]
pub enum FieldRole {
    /// No attribute: walked when the field type is `Bindable`, otherwise
    /// left to the body decoder.
    Untagged,
    /// `#[bind(param = "...")]`: the field is filled from a request parameter,
    /// or walked if its type is `Bindable`.
    Param(LitStr),
    /// `#[bind(nested)]`: the field is walked recursively.
    Nested,
}

/// A parsed struct field.
#[derive(Debug)]
pub struct BindField {
    /// Accessor used in generated code (`self.<member>`).
    pub member: Member,
    /// Field name reported to visitors.
    pub name: String,
    /// The field's binding role.
    pub role: FieldRole,
}

/// A parsed `#[derive(Bind)]` target.
#[derive(Debug)]
pub struct BindStruct {
    /// The struct name.
    pub ident: Ident,
    /// The struct generics.
    pub generics: Generics,
    /// The fields in declaration order.
    pub fields: Vec<BindField>,
}

impl BindStruct {
    /// Parses a derive input. Only structs are accepted.
    pub fn parse(input: DeriveInput) -> syn::Result<Self> {
        let fields = match input.data {
            Data::Struct(data) => match data.fields {
                Fields::Named(named) => named.named.into_iter().collect::<Vec<_>>(),
                Fields::Unnamed(unnamed) => unnamed.unnamed.into_iter().collect(),
                Fields::Unit => Vec::new(),
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "Bind can only be derived for structs",
                ))
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "Bind can only be derived for structs",
                ))
            }
        };

        let fields = fields
            .iter()
            .enumerate()
            .map(|(index, field)| BindField::parse(index, field))
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Self {
            ident: input.ident,
            generics: input.generics,
            fields,
        })
    }
}

impl BindField {
    fn parse(index: usize, field: &Field) -> syn::Result<Self> {
        let (member, name) = match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.to_string()),
            None => (
                Member::Unnamed(Index {
                    index: u32::try_from(index)
                        .map_err(|_| syn::Error::new(field.span(), "too many fields"))?,
                    span: field.span(),
                }),
                index.to_string(),
            ),
        };

        Ok(Self {
            member,
            name,
            role: parse_role(field)?,
        })
    }
}

fn parse_role(field: &Field) -> syn::Result<FieldRole> {
    let mut role = FieldRole::Untagged;

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("bind")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("param") {
                let param: LitStr = meta.value()?.parse()?;
                if param.value().trim().is_empty() {
                    return Err(syn::Error::new(
                        param.span(),
                        "parameter name must not be empty",
                    ));
                }
                role = match role {
                    FieldRole::Untagged => FieldRole::Param(param),
                    FieldRole::Param(_) => return Err(meta.error("duplicate `param` attribute")),
                    FieldRole::Nested => {
                        return Err(meta.error("`param` cannot be combined with `nested`"))
                    }
                };
                Ok(())
            } else if meta.path.is_ident("nested") {
                role = match role {
                    FieldRole::Untagged => FieldRole::Nested,
                    FieldRole::Nested => return Err(meta.error("duplicate `nested` attribute")),
                    FieldRole::Param(_) => {
                        return Err(meta.error("`nested` cannot be combined with `param`"))
                    }
                };
                Ok(())
            } else {
                Err(meta.error("unknown bind attribute, expected `param` or `nested`"))
            }
        })?;
    }

    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn parse(input: DeriveInput) -> syn::Result<BindStruct> {
        BindStruct::parse(input)
    }

    #[test]
    fn test_parse_named_fields() {
        let target = parse(parse_quote! {
            struct User {
                #[bind(param = "user_id")]
                user_id: String,
                #[bind(nested)]
                profile: Profile,
                note: String,
            }
        })
        .unwrap();

        assert_eq!(target.ident, "User");
        assert_eq!(target.fields.len(), 3);
        assert!(matches!(&target.fields[0].role, FieldRole::Param(p) if p.value() == "user_id"));
        assert!(matches!(target.fields[1].role, FieldRole::Nested));
        assert!(matches!(target.fields[2].role, FieldRole::Untagged));
        assert_eq!(target.fields[1].name, "profile");
    }

    #[test]
    fn test_parse_tuple_fields() {
        let target = parse(parse_quote! {
            struct Id(#[bind(param = "id")] i64, String);
        })
        .unwrap();

        assert_eq!(target.fields[0].name, "0");
        assert!(matches!(target.fields[0].member, Member::Unnamed(ref i) if i.index == 0));
        assert!(matches!(target.fields[1].role, FieldRole::Untagged));
    }

    #[test]
    fn test_parse_unit_struct() {
        let target = parse(parse_quote! { struct Empty; }).unwrap();
        assert!(target.fields.is_empty());
    }

    #[test]
    fn test_other_attributes_are_ignored() {
        let target = parse(parse_quote! {
            struct Query {
                #[serde(rename = "q")]
                #[bind(param = "q")]
                term: String,
            }
        })
        .unwrap();
        assert!(matches!(target.fields[0].role, FieldRole::Param(_)));
    }

    #[test]
    fn test_duplicate_param_rejected() {
        let err = parse(parse_quote! {
            struct User {
                #[bind(param = "a", param = "b")]
                id: String,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("duplicate `param`"));
    }

    #[test]
    fn test_duplicate_param_across_attributes_rejected() {
        let result = parse(parse_quote! {
            struct User {
                #[bind(param = "a")]
                #[bind(param = "b")]
                id: String,
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_param_with_nested_rejected() {
        let err = parse(parse_quote! {
            struct User {
                #[bind(nested, param = "p")]
                profile: Profile,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("cannot be combined"));
    }

    #[test]
    fn test_empty_param_rejected() {
        let err = parse(parse_quote! {
            struct User {
                #[bind(param = "")]
                id: String,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse(parse_quote! {
            struct User {
                #[bind(header = "x-id")]
                id: String,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("unknown bind attribute"));
    }

    #[test]
    fn test_enum_rejected() {
        let err = parse(parse_quote! {
            enum Choice { A, B }
        })
        .unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));
    }
}
