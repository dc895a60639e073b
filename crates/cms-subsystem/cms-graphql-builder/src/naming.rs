// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Names of generated types and operations.
//!
//! Every name is a pure function of a content type (or component) and a role. Distinct roles
//! use distinct suffixes, so two different `(schema, role)` pairs can only collide if the
//! catalog itself declares clashing names, which the type registry then reports.

use cms_model::{content_type::ContentTypeSchema, primitive_type::ScalarKind};
use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToUpperCamelCase};

/// Types generated for each content type (or component).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRole {
    /// The object type itself (`Article`)
    Entity,
    /// `ArticleEntityResponse`
    EntityResponse,
    /// `ArticleEntityResponseCollection`
    EntityResponseCollection,
    /// `ArticleRelationResponseCollection`
    RelationResponseCollection,
    /// `ArticleFiltersInput`
    FiltersInput,
    /// `ArticleInput`
    Input,
}

/// Types generated for a single attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeRole {
    /// `ENUM_ARTICLE_STATE`
    Enum,
    /// `ArticleBlocksDynamicZone`
    DynamicZone,
    /// `ArticleBlocksDynamicZoneInput`
    DynamicZoneInput,
    /// `ArticleHighlightsMorph`
    Morph,
}

/// Root fields generated for each content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationRole {
    /// `articles`
    Find,
    /// `articles_connection`
    FindConnection,
    /// `article`
    FindOne,
    /// `createArticle`
    Create,
    /// `updateArticle`
    Update,
    /// `deleteArticle`
    Delete,
}

/// Name of the union of every content type and component, used by untargeted polymorphic relations
pub const GENERIC_MORPH_TYPE: &str = "GenericMorph";

/// Base type name: `Article` for a content type, `ComponentSharedSeo` for a component
pub fn type_name(schema: &ContentTypeSchema) -> String {
    let name = schema.info.singular_name.to_upper_camel_case();
    match &schema.category {
        Some(category) if schema.is_component() => {
            format!("Component{}{name}", category.to_upper_camel_case())
        }
        _ => name,
    }
}

pub fn plural_type_name(schema: &ContentTypeSchema) -> String {
    schema.info.plural_name.to_upper_camel_case()
}

pub fn role_type_name(schema: &ContentTypeSchema, role: TypeRole) -> String {
    let base = type_name(schema);
    match role {
        TypeRole::Entity => base,
        TypeRole::EntityResponse => format!("{base}EntityResponse"),
        TypeRole::EntityResponseCollection => format!("{base}EntityResponseCollection"),
        TypeRole::RelationResponseCollection => format!("{base}RelationResponseCollection"),
        TypeRole::FiltersInput => format!("{base}FiltersInput"),
        TypeRole::Input => format!("{base}Input"),
    }
}

pub fn attribute_type_name(
    schema: &ContentTypeSchema,
    attribute_name: &str,
    role: AttributeRole,
) -> String {
    let base = type_name(schema);
    match role {
        AttributeRole::Enum => format!(
            "ENUM_{}_{}",
            base.to_shouty_snake_case(),
            attribute_name.to_shouty_snake_case()
        ),
        AttributeRole::DynamicZone => {
            format!("{base}{}DynamicZone", attribute_name.to_upper_camel_case())
        }
        AttributeRole::DynamicZoneInput => {
            format!("{base}{}DynamicZoneInput", attribute_name.to_upper_camel_case())
        }
        AttributeRole::Morph => format!("{base}{}Morph", attribute_name.to_upper_camel_case()),
    }
}

pub fn operation_name(schema: &ContentTypeSchema, role: OperationRole) -> String {
    let singular = schema.info.singular_name.to_lower_camel_case();
    let plural = schema.info.plural_name.to_lower_camel_case();
    let pascal = type_name(schema);

    match role {
        OperationRole::Find => plural,
        OperationRole::FindConnection => format!("{plural}_connection"),
        OperationRole::FindOne => singular,
        OperationRole::Create => format!("create{pascal}"),
        OperationRole::Update => format!("update{pascal}"),
        OperationRole::Delete => format!("delete{pascal}"),
    }
}

/// `StringFilterInput`, `DateTimeFilterInput`, ...
pub fn scalar_filter_type_name(kind: ScalarKind) -> String {
    format!("{}FilterInput", kind.name())
}

/// Name of the field exposing a relation as a paginated collection (`tags_connection`)
pub fn connection_field_name(attribute_name: &str) -> String {
    format!("{attribute_name}_connection")
}

/// GraphQL enum value for a stored enumeration value (`draft-review` becomes `draft_review`)
pub fn enum_value_name(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    if sanitized.starts_with(|c: char| c.is_ascii_digit()) || sanitized.is_empty() {
        format!("_{sanitized}")
    } else {
        sanitized
    }
}
