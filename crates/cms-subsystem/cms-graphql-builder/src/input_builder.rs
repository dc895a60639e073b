// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Mutation input types (`ArticleInput`, `ComponentSharedSeoInput`).
//!
//! Every input field is nullable so the same type serves creation and partial updates.
//! Relations and media take ids, components take their own input type, and dynamic zones take
//! a list of their input scalar.

use std::collections::HashSet;

use async_graphql_parser::types::{InputValueDefinition, TypeDefinition};
use cms_model::{
    attribute_class::{AttributeClass, classify},
    content_type::{AttributeType, Cardinality, ContentTypeSchema, RelationTarget},
};

use crate::{
    builder_context::{BuilderContext, TargetState},
    definition::{input_object_type, input_value, list_of, named, non_null},
    dynamic_zone_builder::member_components,
    error::ModelBuildingError,
    naming::{AttributeRole, TypeRole, attribute_type_name, role_type_name},
    type_registry::TypeRegistry,
};

/// Components ordered so that every component comes after the components it embeds
pub fn component_build_order<'a>(context: &BuilderContext<'a>) -> Vec<&'a ContentTypeSchema> {
    fn visit<'a>(
        context: &BuilderContext<'a>,
        component: &'a ContentTypeSchema,
        visited: &mut HashSet<String>,
        order: &mut Vec<&'a ContentTypeSchema>,
    ) {
        if !visited.insert(component.uid.clone()) {
            return;
        }
        for attribute in component.attributes.values() {
            if let AttributeType::Component {
                component: nested, ..
            } = &attribute.typ
                && let Some(nested) = context.catalog.component(nested)
            {
                visit(context, nested, visited, order);
            }
        }
        order.push(component);
    }

    let mut visited = HashSet::new();
    let mut order = vec![];
    for component in context.enabled_components() {
        visit(context, component, &mut visited, &mut order);
    }
    order.retain(|component| context.config.is_type_enabled(&component.uid));
    order
}

/// The input type of `schema`, or `None` if it would have no fields. References to other input
/// types only use those already in `registry`.
pub fn build_input_type(
    context: &BuilderContext,
    registry: &TypeRegistry,
    schema: &ContentTypeSchema,
) -> Result<Option<TypeDefinition>, ModelBuildingError> {
    let mut fields: Vec<InputValueDefinition> = vec![];

    for attribute in context.input_attributes(schema) {
        let typ = match (&attribute.typ, classify(attribute)) {
            (AttributeType::Scalar(primitive_type), AttributeClass::Scalar) => {
                let kind = context.scalar_kind(schema, attribute, primitive_type)?;
                Some(named(kind.name()))
            }
            (AttributeType::Enumeration(_), AttributeClass::Enumeration) => Some(named(
                &attribute_type_name(schema, &attribute.name, AttributeRole::Enum),
            )),
            (AttributeType::Media { multiple }, AttributeClass::Media) => {
                match context.target(schema, attribute)? {
                    TargetState::Enabled(_) if *multiple => Some(list_of(named("ID"))),
                    TargetState::Enabled(_) => Some(named("ID")),
                    TargetState::Disabled => None,
                }
            }
            (
                AttributeType::Relation {
                    relation,
                    target: RelationTarget::ContentType(_),
                },
                AttributeClass::Relation,
            ) => match context.target(schema, attribute)? {
                TargetState::Enabled(_) => match relation.cardinality() {
                    Cardinality::One => Some(named("ID")),
                    Cardinality::Many => Some(list_of(named("ID"))),
                },
                TargetState::Disabled => None,
            },
            (AttributeType::Component { repeatable, .. }, AttributeClass::Component) => {
                match context.target(schema, attribute)? {
                    TargetState::Enabled(component) => {
                        let input_name = role_type_name(component, TypeRole::Input);
                        if !registry.has(&input_name) {
                            None
                        } else if *repeatable {
                            Some(list_of(named(&input_name)))
                        } else {
                            Some(named(&input_name))
                        }
                    }
                    TargetState::Disabled => None,
                }
            }
            (AttributeType::DynamicZone { components }, AttributeClass::DynamicZone) => {
                let members = member_components(context, schema, attribute, components)?;
                let input_name =
                    attribute_type_name(schema, &attribute.name, AttributeRole::DynamicZoneInput);
                if members.is_empty() || !registry.has(&input_name) {
                    None
                } else {
                    Some(list_of(non_null(&input_name)))
                }
            }
            // Polymorphic relations are managed through the entity service directly
            _ => None,
        };

        if let Some(typ) = typ {
            fields.push(input_value(&attribute.name, typ));
        }
    }

    if fields.is_empty() {
        return Ok(None);
    }

    Ok(Some(input_object_type(
        &role_type_name(schema, TypeRole::Input),
        fields,
    )))
}
