// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Dynamic zones: lists of heterogeneous component instances.
//!
//! Output is a union over the member components (plus `Error`, used for the payload of empty
//! zones). Input is a scalar accepting objects discriminated by `__typename`, checked against
//! the member components when the mutation runs.

use cms_model::content_type::{Attribute, ContentTypeSchema};

use crate::{
    builder_context::{BuilderContext, BuiltField, SchemaFragment},
    definition::{field, list_of, named, scalar_type, union_type},
    error::ModelBuildingError,
    internal_types::ERROR_TYPE,
    naming::{AttributeRole, attribute_type_name, type_name},
    resolver_spec::ResolverSpec,
    type_registry::{RegistryConfig, RegistryKind},
};

/// Enabled member components of a zone. Unknown components are fatal.
pub fn member_components<'a>(
    context: &BuilderContext<'a>,
    schema: &ContentTypeSchema,
    attribute: &Attribute,
    components: &[String],
) -> Result<Vec<&'a ContentTypeSchema>, ModelBuildingError> {
    let mut members = vec![];
    for component in components {
        let component_schema = context.catalog.component(component).ok_or_else(|| {
            ModelBuildingError::UnknownComponent {
                uid: schema.uid.clone(),
                attribute: attribute.name.clone(),
                component: component.clone(),
            }
        })?;
        if context.config.is_type_enabled(component) {
            members.push(component_schema);
        }
    }
    Ok(members)
}

pub fn build_dynamic_zone(
    context: &BuilderContext,
    schema: &ContentTypeSchema,
    attribute: &Attribute,
    components: &[String],
) -> Result<(BuiltField, SchemaFragment), ModelBuildingError> {
    let members = member_components(context, schema, attribute, components)?;

    let zone_name = attribute_type_name(schema, &attribute.name, AttributeRole::DynamicZone);
    let input_name = attribute_type_name(schema, &attribute.name, AttributeRole::DynamicZoneInput);

    let member_names: Vec<String> = members.iter().map(|member| type_name(member)).collect();

    let union = union_type(
        &zone_name,
        member_names
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(ERROR_TYPE)),
    );

    let input_description = format!(
        "Input for the '{}' dynamic zone. Each entry names its component with `__typename`, one of: {}",
        attribute.name,
        member_names.join(", ")
    );
    let input = scalar_type(&input_name, Some(&input_description));

    let fragment = SchemaFragment::default()
        .with_type(
            union,
            RegistryConfig::for_attribute(RegistryKind::DynamicZone, &schema.uid, &attribute.name),
        )
        .with_type(
            input,
            RegistryConfig::for_attribute(
                RegistryKind::DynamicZoneInput,
                &schema.uid,
                &attribute.name,
            ),
        );

    let resolver = if members.is_empty() {
        ResolverSpec::EmptyDynamicZone
    } else {
        ResolverSpec::DynamicZone {
            source_uid: schema.uid.clone(),
            attribute: attribute.name.clone(),
        }
    };

    let built_field = BuiltField::resolved(
        field(&attribute.name, list_of(named(&zone_name)), vec![]),
        resolver,
    );

    Ok((built_field, fragment))
}

#[cfg(test)]
mod tests {
    use async_graphql_parser::types::TypeKind;

    use super::*;
    use crate::test_utils::{sample_catalog, sample_config};
    use multiplatform_test::multiplatform_test;

    fn union_members(fragment: &SchemaFragment) -> Vec<String> {
        match &fragment.types[0].0.kind {
            TypeKind::Union(union) => union.members.iter().map(|m| m.node.to_string()).collect(),
            _ => panic!("expected a union"),
        }
    }

    #[multiplatform_test]
    fn zone_over_components() {
        let catalog = sample_catalog();
        let config = sample_config();
        let context = BuilderContext::new(&catalog, &config);
        let article = catalog.get("api::article.article").unwrap();
        let blocks = article.attribute("blocks").unwrap();

        let (built_field, fragment) = build_dynamic_zone(
            &context,
            article,
            blocks,
            &["shared.quote".to_string(), "shared.rich-text".to_string()],
        )
        .unwrap();

        assert_eq!(
            vec!["ComponentSharedQuote", "ComponentSharedRichText", "Error"],
            union_members(&fragment)
        );
        assert_eq!(
            "ArticleBlocksDynamicZoneInput",
            fragment.types[1].0.name.node.as_str()
        );
        assert_eq!(
            "[ArticleBlocksDynamicZone]",
            built_field.definition.ty.node.to_string()
        );
        assert!(matches!(
            built_field.resolver,
            Some(ResolverSpec::DynamicZone { .. })
        ));
    }

    #[multiplatform_test]
    fn empty_zone_resolves_to_error_payload() {
        let catalog = sample_catalog();
        let config = sample_config();
        let context = BuilderContext::new(&catalog, &config);
        let article = catalog.get("api::article.article").unwrap();
        let empty_zone = article.attribute("emptyZone").unwrap();

        let (built_field, fragment) =
            build_dynamic_zone(&context, article, empty_zone, &[]).unwrap();

        assert_eq!(vec!["Error"], union_members(&fragment));
        assert_eq!(Some(ResolverSpec::EmptyDynamicZone), built_field.resolver);
    }

    #[multiplatform_test]
    fn unknown_component_is_fatal() {
        let catalog = sample_catalog();
        let config = sample_config();
        let context = BuilderContext::new(&catalog, &config);
        let article = catalog.get("api::article.article").unwrap();
        let blocks = article.attribute("blocks").unwrap();

        let result = build_dynamic_zone(&context, article, blocks, &["shared.video".to_string()]);

        assert!(matches!(
            result,
            Err(ModelBuildingError::UnknownComponent { component, .. }) if component == "shared.video"
        ));
    }
}
