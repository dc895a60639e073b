// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Filter input types.
//!
//! One `<Scalar>FilterInput` per scalar, holding the operators that apply to it, and one
//! `<Type>FiltersInput` per content type and component, holding a field per filterable
//! attribute. Both kinds end with the `and`/`or`/`not` combinators over themselves.

use async_graphql_parser::types::{InputValueDefinition, Type, TypeDefinition};
use cms_model::{
    attribute_class::{FilterShape, classify},
    content_type::{AttributeType, ContentTypeSchema},
    operators::{OperandShape, Operator, ROOT_COMBINATORS, applicable_operators, find_operator},
    primitive_type::ScalarKind,
};
use tracing::warn;

use crate::{
    builder_context::{BuilderContext, TargetState},
    definition::{input_object_type, input_value, list_of, named},
    error::ModelBuildingError,
    naming::{TypeRole, role_type_name, scalar_filter_type_name},
};

/// Type of an operator's field in the filter input `filter_type_name` over `scalar`
fn operand_type(operator: &Operator, scalar: ScalarKind, filter_type_name: &str) -> Type {
    match operator.operand {
        OperandShape::Scalar => named(scalar.name()),
        OperandShape::ScalarList => list_of(named(scalar.name())),
        OperandShape::Flag => named("Boolean"),
        OperandShape::Filter => named(filter_type_name),
        OperandShape::FilterList => list_of(named(filter_type_name)),
    }
}

pub fn build_scalar_filter_type(kind: ScalarKind) -> TypeDefinition {
    let type_name = scalar_filter_type_name(kind);

    // Combinators go last, as in content type filters
    let (combinators, operators): (Vec<_>, Vec<_>) =
        applicable_operators(kind).partition(|operator| operator.is_root_combinator());

    let fields = operators
        .into_iter()
        .chain(combinators)
        .map(|operator| {
            input_value(
                operator.field_name,
                operand_type(operator, kind, &type_name),
            )
        })
        .collect();

    input_object_type(&type_name, fields)
}

/// Filter input type for a scalar or enumeration attribute
pub fn attribute_scalar_filter(
    context: &BuilderContext,
    schema: &ContentTypeSchema,
    attribute: &cms_model::content_type::Attribute,
) -> Result<Option<String>, ModelBuildingError> {
    match &attribute.typ {
        AttributeType::Scalar(primitive_type) => {
            let kind = context.scalar_kind(schema, attribute, primitive_type)?;
            Ok(Some(scalar_filter_type_name(kind)))
        }
        // Enumerations are filtered by their stored string values
        AttributeType::Enumeration(_) => Ok(Some(scalar_filter_type_name(ScalarKind::String))),
        _ => Ok(None),
    }
}

pub fn build_content_type_filters(
    context: &BuilderContext,
    schema: &ContentTypeSchema,
) -> Result<TypeDefinition, ModelBuildingError> {
    let type_name = role_type_name(schema, TypeRole::FiltersInput);
    let mut fields: Vec<InputValueDefinition> = vec![];

    for attribute in context.filter_attributes(schema) {
        let field_type_name = match classify(attribute).filter_shape() {
            FilterShape::Operators => attribute_scalar_filter(context, schema, attribute)?,
            FilterShape::Nested => {
                match context.target(schema, attribute)? {
                    TargetState::Enabled(target) => {
                        Some(role_type_name(target, TypeRole::FiltersInput))
                    }
                    TargetState::Disabled => {
                        warn!(
                            "Omitting filter '{}.{}': its target is disabled",
                            schema.uid, attribute.name
                        );
                        None
                    }
                }
            }
            FilterShape::Unfilterable => None,
        };

        if let Some(field_type_name) = field_type_name {
            fields.push(input_value(&attribute.name, named(&field_type_name)));
        }
    }

    for combinator in ROOT_COMBINATORS {
        if let Some(operator) = find_operator(combinator) {
            let typ = match operator.operand {
                OperandShape::FilterList => list_of(named(&type_name)),
                _ => named(&type_name),
            };
            fields.push(input_value(operator.field_name, typ));
        }
    }

    Ok(input_object_type(&type_name, fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::input_fields;
    use crate::test_utils::{sample_catalog, sample_config};
    use multiplatform_test::multiplatform_test;

    fn field_signatures(definition: &TypeDefinition) -> Vec<String> {
        input_fields(definition)
            .map(|field| format!("{}: {}", field.name.node, field.ty.node))
            .collect()
    }

    #[multiplatform_test]
    fn boolean_filter() {
        let definition = build_scalar_filter_type(ScalarKind::Boolean);

        assert_eq!("BooleanFilterInput", definition.name.node.as_str());
        insta::assert_debug_snapshot!(field_signatures(&definition), @r#"
        [
            "eq: Boolean",
            "ne: Boolean",
            "in: [Boolean]",
            "notIn: [Boolean]",
            "null: Boolean",
            "notNull: Boolean",
            "and: [BooleanFilterInput]",
            "or: [BooleanFilterInput]",
            "not: BooleanFilterInput",
        ]
        "#);
    }

    #[multiplatform_test]
    fn article_filters() {
        let catalog = sample_catalog();
        let config = sample_config();
        let context = BuilderContext::new(&catalog, &config);
        let article = catalog.get("api::article.article").unwrap();

        let definition = build_content_type_filters(&context, article).unwrap();

        // No media, dynamic zones, polymorphic relations, private or disabled-target attributes
        insta::assert_debug_snapshot!(field_signatures(&definition), @r#"
        [
            "documentId: IDFilterInput",
            "title: StringFilterInput",
            "slug: StringFilterInput",
            "views: IntFilterInput",
            "rating: FloatFilterInput",
            "publishDate: DateFilterInput",
            "state: StringFilterInput",
            "seo: ComponentSharedSeoFiltersInput",
            "category: CategoryFiltersInput",
            "tags: TagFiltersInput",
            "createdAt: DateTimeFilterInput",
            "updatedAt: DateTimeFilterInput",
            "publishedAt: DateTimeFilterInput",
            "and: [ArticleFiltersInput]",
            "or: [ArticleFiltersInput]",
            "not: ArticleFiltersInput",
        ]
        "#);
    }
}
