// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;

use cms_model::content_type::{Attribute, ContentTypeSchema};

use crate::{
    builder_context::{BuiltField, SchemaFragment},
    definition::{enum_type, field, named, required},
    error::ModelBuildingError,
    naming::{AttributeRole, attribute_type_name, enum_value_name},
    resolver_spec::ResolverSpec,
    type_registry::{RegistryConfig, RegistryKind},
};

/// Stored values paired with their GraphQL names, rejecting values whose names clash
pub fn enum_value_mapping(
    schema: &ContentTypeSchema,
    attribute: &Attribute,
    values: &[String],
) -> Result<Vec<(String, String)>, ModelBuildingError> {
    let invalid = |message: String| ModelBuildingError::InvalidAttribute {
        uid: schema.uid.clone(),
        attribute: attribute.name.clone(),
        message,
    };

    if values.is_empty() {
        return Err(invalid("enumeration without values".to_string()));
    }

    let mut seen = HashSet::new();
    values
        .iter()
        .map(|value| {
            let name = enum_value_name(value);
            if seen.insert(name.clone()) {
                Ok((value.clone(), name))
            } else {
                Err(invalid(format!(
                    "value '{value}' clashes with another value named '{name}'"
                )))
            }
        })
        .collect()
}

pub fn build_enum_attribute(
    schema: &ContentTypeSchema,
    attribute: &Attribute,
    values: &[String],
) -> Result<(BuiltField, SchemaFragment), ModelBuildingError> {
    let enum_name = attribute_type_name(schema, &attribute.name, AttributeRole::Enum);
    let mapping = enum_value_mapping(schema, attribute, values)?;

    let definition = enum_type(&enum_name, mapping.iter().map(|(_, name)| name.as_str()));
    let fragment = SchemaFragment::default().with_type(
        definition,
        RegistryConfig::for_attribute(RegistryKind::Enum, &schema.uid, &attribute.name),
    );

    let typ = if attribute.required {
        required(named(&enum_name))
    } else {
        named(&enum_name)
    };

    let built_field = BuiltField::resolved(
        field(&attribute.name, typ, vec![]),
        ResolverSpec::Enumeration { values: mapping },
    );

    Ok((built_field, fragment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_catalog;
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn article_state_enum() {
        let catalog = sample_catalog();
        let article = catalog.get("api::article.article").unwrap();
        let state = article.attribute("state").unwrap();
        let values = vec![
            "draft-review".to_string(),
            "approved".to_string(),
            "archived".to_string(),
        ];

        let (built_field, fragment) = build_enum_attribute(article, state, &values).unwrap();

        assert_eq!("state: ENUM_ARTICLE_STATE", format!("{}: {}", built_field.name(), built_field.definition.ty.node));
        assert_eq!(1, fragment.types.len());
        assert_eq!(
            Some(ResolverSpec::Enumeration {
                values: vec![
                    ("draft-review".to_string(), "draft_review".to_string()),
                    ("approved".to_string(), "approved".to_string()),
                    ("archived".to_string(), "archived".to_string()),
                ]
            }),
            built_field.resolver
        );
    }

    #[multiplatform_test]
    fn clashing_values_fail() {
        let catalog = sample_catalog();
        let article = catalog.get("api::article.article").unwrap();
        let state = article.attribute("state").unwrap();
        let values = vec!["in-review".to_string(), "in_review".to_string()];

        assert!(matches!(
            build_enum_attribute(article, state, &values),
            Err(ModelBuildingError::InvalidAttribute { .. })
        ));
    }
}
