// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Polymorphic relations, exposed as unions over their possible targets.

use cms_model::content_type::{Attribute, Cardinality, ContentTypeSchema};
use tracing::warn;

use crate::{
    builder_context::{BuilderContext, BuiltField, SchemaFragment},
    definition::{field, list_of, named, union_type},
    error::ModelBuildingError,
    naming::{AttributeRole, GENERIC_MORPH_TYPE, attribute_type_name, type_name},
    resolver_spec::ResolverSpec,
    type_registry::{RegistryConfig, RegistryKind},
};

/// The union over every enabled content type and component, if there is any
pub fn build_generic_morph(context: &BuilderContext) -> Option<SchemaFragment> {
    let members: Vec<String> = context
        .enabled_content_types()
        .chain(context.enabled_components())
        .map(type_name)
        .collect();

    if members.is_empty() {
        return None;
    }

    Some(SchemaFragment::default().with_type(
        union_type(GENERIC_MORPH_TYPE, members.iter().map(String::as_str)),
        RegistryConfig::new(RegistryKind::Morph),
    ))
}

pub fn build_morph_attribute(
    context: &BuilderContext,
    schema: &ContentTypeSchema,
    attribute: &Attribute,
    cardinality: Cardinality,
    targets: Option<&[String]>,
) -> Result<Option<(BuiltField, SchemaFragment)>, ModelBuildingError> {
    let (union_name, fragment) = match targets {
        None => (GENERIC_MORPH_TYPE.to_string(), SchemaFragment::default()),
        Some(targets) => {
            let mut members = vec![];
            for target in targets {
                let target_schema = context.catalog.get(target).ok_or_else(|| {
                    ModelBuildingError::UnknownContentType {
                        uid: schema.uid.clone(),
                        attribute: attribute.name.clone(),
                        target: target.clone(),
                    }
                })?;
                if context.config.is_type_enabled(target) {
                    members.push(type_name(target_schema));
                }
            }

            if members.is_empty() {
                warn!(
                    "Omitting '{}.{}': every target is disabled",
                    schema.uid, attribute.name
                );
                return Ok(None);
            }

            let union_name = attribute_type_name(schema, &attribute.name, AttributeRole::Morph);
            let fragment = SchemaFragment::default().with_type(
                union_type(&union_name, members.iter().map(String::as_str)),
                RegistryConfig::for_attribute(RegistryKind::Morph, &schema.uid, &attribute.name),
            );
            (union_name, fragment)
        }
    };

    let typ = match cardinality {
        Cardinality::One => named(&union_name),
        Cardinality::Many => list_of(named(&union_name)),
    };

    let built_field = BuiltField::resolved(
        field(&attribute.name, typ, vec![]),
        ResolverSpec::Association {
            source_uid: schema.uid.clone(),
            attribute: attribute.name.clone(),
            unwrap_nodes: cardinality == Cardinality::Many,
        },
    );

    Ok(Some((built_field, fragment)))
}
