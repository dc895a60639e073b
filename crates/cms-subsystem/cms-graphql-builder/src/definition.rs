// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Helpers to create the type descriptors builders return.
//!
//! Descriptors are plain `async_graphql_parser` values, so they can be printed, compared and
//! walked (for example, to prune unreachable types) before any executable schema exists.

use async_graphql_parser::{
    Pos, Positioned,
    types::{
        BaseType, EnumType, EnumValueDefinition, FieldDefinition, InputObjectType,
        InputValueDefinition, ObjectType, Type, TypeDefinition, TypeKind, UnionType,
    },
};
use async_graphql_value::{ConstValue, Name};

pub fn default_positioned<T>(value: T) -> Positioned<T> {
    Positioned::new(value, Pos::default())
}

pub fn default_positioned_name(value: &str) -> Positioned<Name> {
    default_positioned(Name::new(value))
}

/// Nullable named type (`Article`)
pub fn named(name: &str) -> Type {
    Type {
        base: BaseType::Named(Name::new(name)),
        nullable: true,
    }
}

/// Non-null named type (`ID!`)
pub fn non_null(name: &str) -> Type {
    Type {
        base: BaseType::Named(Name::new(name)),
        nullable: false,
    }
}

/// Nullable list of `inner` (`[Article]`)
pub fn list_of(inner: Type) -> Type {
    Type {
        base: BaseType::List(Box::new(inner)),
        nullable: true,
    }
}

pub fn required(typ: Type) -> Type {
    Type {
        nullable: false,
        ..typ
    }
}

/// Name of the type at the bottom of any list wrapping (`Article` for `[Article!]!`)
pub fn underlying_type_name(typ: &Type) -> &str {
    match &typ.base {
        BaseType::Named(name) => name.as_str(),
        BaseType::List(inner) => underlying_type_name(inner),
    }
}

pub fn is_list(typ: &Type) -> bool {
    matches!(typ.base, BaseType::List(_))
}

pub fn input_value(name: &str, typ: Type) -> InputValueDefinition {
    InputValueDefinition {
        description: None,
        name: default_positioned_name(name),
        ty: default_positioned(typ),
        default_value: None,
        directives: vec![],
    }
}

pub fn input_value_with_default(
    name: &str,
    typ: Type,
    default_value: ConstValue,
) -> InputValueDefinition {
    InputValueDefinition {
        default_value: Some(default_positioned(default_value)),
        ..input_value(name, typ)
    }
}

pub fn field(name: &str, typ: Type, arguments: Vec<InputValueDefinition>) -> FieldDefinition {
    FieldDefinition {
        description: None,
        name: default_positioned_name(name),
        arguments: arguments.into_iter().map(default_positioned).collect(),
        ty: default_positioned(typ),
        directives: vec![],
    }
}

fn type_definition(name: &str, description: Option<&str>, kind: TypeKind) -> TypeDefinition {
    TypeDefinition {
        extend: false,
        description: description.map(|d| default_positioned(d.to_string())),
        name: default_positioned_name(name),
        directives: vec![],
        kind,
    }
}

pub fn object_type(name: &str, fields: Vec<FieldDefinition>) -> TypeDefinition {
    type_definition(
        name,
        None,
        TypeKind::Object(ObjectType {
            implements: vec![],
            fields: fields.into_iter().map(default_positioned).collect(),
        }),
    )
}

pub fn input_object_type(name: &str, fields: Vec<InputValueDefinition>) -> TypeDefinition {
    type_definition(
        name,
        None,
        TypeKind::InputObject(InputObjectType {
            fields: fields.into_iter().map(default_positioned).collect(),
        }),
    )
}

pub fn enum_type<'a>(name: &str, values: impl IntoIterator<Item = &'a str>) -> TypeDefinition {
    type_definition(
        name,
        None,
        TypeKind::Enum(EnumType {
            values: values
                .into_iter()
                .map(|value| {
                    default_positioned(EnumValueDefinition {
                        description: None,
                        value: default_positioned_name(value),
                        directives: vec![],
                    })
                })
                .collect(),
        }),
    )
}

pub fn union_type<'a>(name: &str, members: impl IntoIterator<Item = &'a str>) -> TypeDefinition {
    type_definition(
        name,
        None,
        TypeKind::Union(UnionType {
            members: members.into_iter().map(default_positioned_name).collect(),
        }),
    )
}

pub fn scalar_type(name: &str, description: Option<&str>) -> TypeDefinition {
    type_definition(name, description, TypeKind::Scalar)
}

pub fn object_fields(definition: &TypeDefinition) -> impl Iterator<Item = &FieldDefinition> {
    let fields: &[Positioned<FieldDefinition>] = match &definition.kind {
        TypeKind::Object(object) => &object.fields,
        _ => &[],
    };
    fields.iter().map(|field| &field.node)
}

pub fn input_fields(definition: &TypeDefinition) -> impl Iterator<Item = &InputValueDefinition> {
    let fields: &[Positioned<InputValueDefinition>] = match &definition.kind {
        TypeKind::InputObject(input) => &input.fields,
        _ => &[],
    };
    fields.iter().map(|field| &field.node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn type_wrappers() {
        let typ = required(list_of(non_null("Article")));
        assert_eq!("[Article!]!", typ.to_string());
        assert_eq!("Article", underlying_type_name(&typ));
        assert!(is_list(&typ));
        assert!(!is_list(&named("Article")));
    }
}
