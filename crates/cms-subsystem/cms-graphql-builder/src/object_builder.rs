// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Output object types for content types and components.
//!
//! Each exposed attribute is classified and handed to the builder for its class. Builders
//! return the field(s) to add plus any type they need (enums, unions, inputs for dynamic
//! zones), which end up in the returned fragment.

use cms_model::{
    attribute_class::{AttributeClass, classify},
    content_type::{Attribute, AttributeType, Cardinality, ContentTypeSchema, RelationTarget},
};
use tracing::{debug, warn};

use crate::{
    builder_context::{BuilderContext, BuiltField, SchemaFragment, TargetState},
    definition::{field, named, object_type, required},
    dynamic_zone_builder::build_dynamic_zone,
    enum_builder::build_enum_attribute,
    error::ModelBuildingError,
    morph_builder::build_morph_attribute,
    naming::type_name,
    relation_builder::{build_component_field, build_relation_fields},
    type_registry::{RegistryConfig, RegistryKind},
};

pub fn build_object_type(
    context: &BuilderContext,
    schema: &ContentTypeSchema,
) -> Result<SchemaFragment, ModelBuildingError> {
    let object_name = type_name(schema);
    debug!("Building object type {object_name} for {}", schema.uid);

    let mut fragment = SchemaFragment::default();
    let mut fields = vec![];

    for attribute in context.output_attributes(schema) {
        let (attribute_fields, attribute_fragment) = build_attribute(context, schema, attribute)?;
        fields.extend(attribute_fields);
        fragment = fragment.merge(attribute_fragment);
    }

    let (fragment, definitions) = fragment.with_fields(&object_name, fields)?;

    let kind = if schema.is_component() {
        RegistryKind::Component
    } else {
        RegistryKind::ContentType
    };

    Ok(fragment.with_type(
        object_type(&object_name, definitions),
        RegistryConfig::for_content_type(kind, &schema.uid),
    ))
}

fn build_attribute(
    context: &BuilderContext,
    schema: &ContentTypeSchema,
    attribute: &Attribute,
) -> Result<(Vec<BuiltField>, SchemaFragment), ModelBuildingError> {
    let omitted = || {
        warn!(
            "Omitting '{}.{}': its target is disabled",
            schema.uid, attribute.name
        );
        Ok((vec![], SchemaFragment::default()))
    };

    match (&attribute.typ, classify(attribute)) {
        (AttributeType::Scalar(primitive_type), AttributeClass::Scalar) => {
            let kind = context.scalar_kind(schema, attribute, primitive_type)?;
            let typ = if attribute.required {
                required(named(kind.name()))
            } else {
                named(kind.name())
            };
            Ok((
                vec![BuiltField::plain(field(&attribute.name, typ, vec![]))],
                SchemaFragment::default(),
            ))
        }
        (AttributeType::Enumeration(values), AttributeClass::Enumeration) => {
            let (built_field, fragment) = build_enum_attribute(schema, attribute, values)?;
            Ok((vec![built_field], fragment))
        }
        (AttributeType::Media { multiple }, AttributeClass::Media) => {
            match context.target(schema, attribute)? {
                TargetState::Enabled(media) => {
                    let cardinality = if *multiple {
                        Cardinality::Many
                    } else {
                        Cardinality::One
                    };
                    Ok((
                        build_relation_fields(schema, attribute, media, cardinality),
                        SchemaFragment::default(),
                    ))
                }
                TargetState::Disabled => omitted(),
            }
        }
        (AttributeType::Component { repeatable, .. }, AttributeClass::Component) => {
            match context.target(schema, attribute)? {
                TargetState::Enabled(component) => Ok((
                    vec![build_component_field(
                        schema,
                        attribute,
                        component,
                        *repeatable,
                    )],
                    SchemaFragment::default(),
                )),
                TargetState::Disabled => omitted(),
            }
        }
        (AttributeType::DynamicZone { components }, AttributeClass::DynamicZone) => {
            let (built_field, fragment) =
                build_dynamic_zone(context, schema, attribute, components)?;
            Ok((vec![built_field], fragment))
        }
        (
            AttributeType::Relation {
                relation,
                target: RelationTarget::Polymorphic(targets),
            },
            AttributeClass::PolymorphicRelation,
        ) => {
            let built = build_morph_attribute(
                context,
                schema,
                attribute,
                relation.cardinality(),
                targets.as_deref(),
            )?;
            Ok(match built {
                Some((built_field, fragment)) => (vec![built_field], fragment),
                None => (vec![], SchemaFragment::default()),
            })
        }
        (AttributeType::Relation { relation, .. }, AttributeClass::Relation) => {
            match context.target(schema, attribute)? {
                TargetState::Enabled(target) => Ok((
                    build_relation_fields(schema, attribute, target, relation.cardinality()),
                    SchemaFragment::default(),
                )),
                TargetState::Disabled => omitted(),
            }
        }
        (_, class) => Err(ModelBuildingError::InvalidAttribute {
            uid: schema.uid.clone(),
            attribute: attribute.name.clone(),
            message: format!("attribute classified as {class:?} does not match its type"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::object_fields;
    use crate::test_utils::{sample_catalog, sample_config};
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn article_object_type() {
        let catalog = sample_catalog();
        let config = sample_config();
        let context = BuilderContext::new(&catalog, &config);
        let article = catalog.get("api::article.article").unwrap();

        let fragment = build_object_type(&context, article).unwrap();
        let (object, registry_config) = fragment.types.last().unwrap();

        assert_eq!(RegistryKind::ContentType, registry_config.kind);
        let fields: Vec<_> = object_fields(object)
            .map(|f| format!("{}: {}", f.name.node, f.ty.node))
            .collect();

        insta::assert_debug_snapshot!(fields, @r#"
        [
            "documentId: ID!",
            "title: String!",
            "slug: String",
            "views: Int",
            "rating: Float",
            "publishDate: Date",
            "state: ENUM_ARTICLE_STATE",
            "cover: File",
            "gallery: [File]!",
            "gallery_connection: FileRelationResponseCollection",
            "seo: ComponentSharedSeo",
            "blocks: [ArticleBlocksDynamicZone]",
            "emptyZone: [ArticleEmptyZoneDynamicZone]",
            "category: Category",
            "tags: [Tag]!",
            "tags_connection: TagRelationResponseCollection",
            "related: [GenericMorph]",
            "highlights: [ArticleHighlightsMorph]",
            "createdAt: DateTime",
            "updatedAt: DateTime",
            "publishedAt: DateTime",
        ]
        "#);

        let scoped: Vec<_> = fragment
            .auth_scopes
            .iter()
            .map(|(path, scope)| format!("{path} -> {scope}"))
            .collect();
        assert!(scoped.contains(&"Article.cover -> plugin::upload.file.find".to_string()));
        assert!(scoped.contains(&"Article.tags_connection -> api::tag.tag.find".to_string()));
        assert!(!scoped.iter().any(|s| s.starts_with("Article.legacy")));
    }

    #[multiplatform_test]
    fn missing_scalar_mapping_is_fatal() {
        let catalog = cms_model::catalog::ContentTypeCatalog::from_json(
            r#"{
                "contentTypes": [{
                    "uid": "api::swatch.swatch",
                    "info": { "singularName": "swatch" },
                    "attributes": { "color": { "type": "plugin::color-picker.color" } }
                }]
            }"#,
        )
        .unwrap();
        let config = sample_config();
        let context = BuilderContext::new(&catalog, &config);

        let result = build_object_type(&context, catalog.get("api::swatch.swatch").unwrap());

        assert!(matches!(
            result,
            Err(ModelBuildingError::MissingScalarMapping { attribute, .. }) if attribute == "color"
        ));
    }
}
