// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use cms_model::{catalog::ContentTypeCatalog, config::SchemaConfig};
use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::{
    builder_context::{BuilderContext, BuiltField, SchemaFragment},
    definition::object_type,
    error::ModelBuildingError,
    filter_builder::build_content_type_filters,
    input_builder::{build_input_type, component_build_order},
    internal_types,
    morph_builder::build_generic_morph,
    mutation_builder::build_mutation_fields,
    object_builder::build_object_type,
    pruning::reachable_types,
    query_builder::build_query_fields,
    resolver_spec::{FieldPath, ResolverSpec},
    response_builder::build_response_types,
    type_registry::{RegistryConfig, RegistryKind, TypeRegistry},
};

pub const QUERY_TYPE: &str = "Query";
pub const MUTATION_TYPE: &str = "Mutation";

/// Result of a build. Immutable: a changed catalog or configuration means building a new one.
#[derive(Debug)]
pub struct BuiltSchema {
    pub registry: TypeRegistry,
    pub resolvers: IndexMap<FieldPath, ResolverSpec>,
    /// Scope required to read each guarded field
    pub auth_scopes: IndexMap<FieldPath, String>,
}

impl BuiltSchema {
    pub fn resolver(&self, type_name: &str, field_name: &str) -> Option<&ResolverSpec> {
        self.resolvers.get(&FieldPath::new(type_name, field_name))
    }

    pub fn auth_scope(&self, type_name: &str, field_name: &str) -> Option<&str> {
        self.auth_scopes
            .get(&FieldPath::new(type_name, field_name))
            .map(String::as_str)
    }

    pub fn has_mutations(&self) -> bool {
        self.registry.has(MUTATION_TYPE)
    }
}

#[derive(Default)]
struct SchemaAccumulator {
    registry: TypeRegistry,
    resolvers: IndexMap<FieldPath, ResolverSpec>,
    auth_scopes: IndexMap<FieldPath, String>,
}

impl SchemaAccumulator {
    fn absorb(&mut self, fragment: SchemaFragment) -> Result<(), ModelBuildingError> {
        for (definition, config) in fragment.types {
            self.registry.register(definition, config)?;
        }
        self.resolvers.extend(fragment.resolvers);
        self.auth_scopes.extend(fragment.auth_scopes);
        Ok(())
    }

    fn absorb_root(
        &mut self,
        type_name: &str,
        fields: Vec<BuiltField>,
    ) -> Result<(), ModelBuildingError> {
        let (fragment, definitions) = SchemaFragment::default().with_fields(type_name, fields)?;
        self.absorb(fragment.with_type(
            object_type(type_name, definitions),
            RegistryConfig::new(RegistryKind::Root),
        ))
    }
}

/// Build the schema of every enabled content type and component of `catalog`.
///
/// Fails without producing anything on the first fatal error.
#[instrument(name = "cms_graphql_builder::build", skip_all)]
pub fn build(
    catalog: &ContentTypeCatalog,
    config: &SchemaConfig,
) -> Result<BuiltSchema, ModelBuildingError> {
    let context = BuilderContext::new(catalog, config);
    let mut schema = SchemaAccumulator::default();

    schema.absorb(internal_types::build())?;

    for content_type in context
        .enabled_content_types()
        .chain(context.enabled_components())
    {
        schema.absorb(build_object_type(&context, content_type)?)?;
        if !content_type.is_component() {
            schema.absorb(build_response_types(content_type)?)?;
        }
        schema.registry.register(
            build_content_type_filters(&context, content_type)?,
            RegistryConfig::for_content_type(RegistryKind::FiltersInput, &content_type.uid),
        )?;
    }

    // Embedded components first, so that referencing inputs see theirs
    for content_type in component_build_order(&context)
        .into_iter()
        .chain(context.enabled_content_types())
    {
        match build_input_type(&context, &schema.registry, content_type)? {
            Some(input) => {
                schema.registry.register(
                    input,
                    RegistryConfig::for_content_type(RegistryKind::Input, &content_type.uid),
                )?;
            }
            None => debug!("No input type for {}: nothing is writable", content_type.uid),
        }
    }

    if let Some(generic_morph) = build_generic_morph(&context) {
        schema.absorb(generic_morph)?;
    }

    let query_fields: Vec<_> = context
        .enabled_content_types()
        .flat_map(|content_type| build_query_fields(&context, content_type))
        .collect();
    if query_fields.is_empty() {
        return Err(ModelBuildingError::Generic(
            "No content type exposes a query: the schema would be empty".to_string(),
        ));
    }
    schema.absorb_root(QUERY_TYPE, query_fields)?;

    let mutation_fields: Vec<_> = context
        .enabled_content_types()
        .flat_map(|content_type| build_mutation_fields(&context, &schema.registry, content_type))
        .collect();
    if !mutation_fields.is_empty() {
        schema.absorb_root(MUTATION_TYPE, mutation_fields)?;
    }

    let reachable = reachable_types(&schema.registry, &[QUERY_TYPE, MUTATION_TYPE]);
    let SchemaAccumulator {
        registry,
        mut resolvers,
        mut auth_scopes,
    } = schema;

    let before = registry.len();
    let registry = registry.retained(|entry| reachable.contains(&entry.name))?;
    debug!(
        "Pruned {} unreachable types, {} remain",
        before - registry.len(),
        registry.len()
    );

    resolvers.retain(|path, _| registry.has(&path.type_name));
    auth_scopes.retain(|path, _| registry.has(&path.type_name));

    Ok(BuiltSchema {
        registry,
        resolvers,
        auth_scopes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{input_fields, object_fields};
    use crate::test_utils::{sample_catalog, sample_config};
    use multiplatform_test::multiplatform_test;

    fn field_names(built: &BuiltSchema, type_name: &str) -> Vec<String> {
        let definition = &built.registry.get(type_name).unwrap().definition;
        object_fields(definition)
            .map(|f| f.name.node.to_string())
            .chain(input_fields(definition).map(|f| f.name.node.to_string()))
            .collect()
    }

    #[multiplatform_test]
    fn sample_schema_roots() {
        let built = build(&sample_catalog(), &sample_config()).unwrap();

        insta::assert_debug_snapshot!(field_names(&built, QUERY_TYPE), @r#"
        [
            "articles",
            "articles_connection",
            "article",
            "categories",
            "categories_connection",
            "category",
            "tags",
            "tags_connection",
            "tag",
            "homepage",
            "files",
            "files_connection",
            "file",
        ]
        "#);
        insta::assert_debug_snapshot!(field_names(&built, MUTATION_TYPE), @r#"
        [
            "createArticle",
            "updateArticle",
            "deleteArticle",
            "createCategory",
            "updateCategory",
            "deleteCategory",
            "createTag",
            "updateTag",
            "updateHomepage",
            "deleteHomepage",
            "createFile",
            "updateFile",
            "deleteFile",
        ]
        "#);

        assert_eq!(
            Some("api::article.article.findOne"),
            built.auth_scope(QUERY_TYPE, "article")
        );
        assert!(matches!(
            built.resolver("ArticleEntityResponseCollection", "pageInfo"),
            Some(ResolverSpec::PageInfo)
        ));
    }

    #[multiplatform_test]
    fn disabled_target_is_omitted_everywhere() {
        let built = build(&sample_catalog(), &sample_config()).unwrap();

        for type_name in ["Article", "ArticleFiltersInput", "ArticleInput"] {
            assert!(
                !field_names(&built, type_name).contains(&"legacy".to_string()),
                "{type_name} still has legacy"
            );
        }
        assert!(!built.registry.has("Legacy"));
        assert!(!built.registry.has("LegacyFiltersInput"));
        assert!(field_names(&built, "Article").contains(&"category".to_string()));
    }

    #[multiplatform_test]
    fn unreachable_types_are_pruned() {
        let built = build(&sample_catalog(), &sample_config()).unwrap();
        let registry = &built.registry;

        // Single types have no connection query
        assert!(!registry.has("HomepageEntityResponseCollection"));
        // Components inside dynamic zones are never filtered
        assert!(registry.has("ComponentSharedQuote"));
        assert!(!registry.has("ComponentSharedQuoteFiltersInput"));
        // Empty zones accept no input
        assert!(registry.has("ArticleEmptyZoneDynamicZone"));
        assert!(!registry.has("ArticleEmptyZoneDynamicZoneInput"));
        // Reachable only through unions
        assert!(registry.has("Error"));
        assert!(registry.has("ArticleHighlightsMorph"));

        for path in built.resolvers.keys().chain(built.auth_scopes.keys()) {
            assert!(
                field_names(&built, &path.type_name).contains(&path.field_name),
                "dangling descriptor {path}"
            );
        }
    }

    #[multiplatform_test]
    fn nested_component_inputs() {
        let built = build(&sample_catalog(), &sample_config()).unwrap();

        let seo_input = &built.registry.get("ComponentSharedSeoInput").unwrap().definition;
        let links = input_fields(seo_input)
            .find(|f| f.name.node == "links")
            .unwrap();
        assert_eq!("[ComponentSharedLinkInput]", links.ty.node.to_string());
    }

    #[multiplatform_test]
    fn no_queries_is_an_error() {
        let config = SchemaConfig::from_toml_str("shadow_crud = false").unwrap();

        let result = build(&sample_catalog(), &config);

        assert!(matches!(result, Err(ModelBuildingError::Generic(_))));
    }

    #[multiplatform_test]
    fn colliding_type_names_are_fatal() {
        let catalog = ContentTypeCatalog::from_json(
            r#"{
                "contentTypes": [
                    { "uid": "api::article.article", "info": { "singularName": "article" }, "attributes": {} },
                    { "uid": "api::blog.article", "info": { "singularName": "article" }, "attributes": {} }
                ]
            }"#,
        )
        .unwrap();

        let result = build(&catalog, &SchemaConfig::default());

        assert!(matches!(result, Err(ModelBuildingError::DuplicateName(name)) if name == "Article"));
    }

    #[multiplatform_test]
    fn colliding_root_field_names_are_fatal() {
        // `peoples.findOne` and `person.find` are both named `people`
        let catalog = ContentTypeCatalog::from_json(
            r#"{
                "contentTypes": [
                    { "uid": "api::people.people", "info": { "singularName": "people", "pluralName": "peoples" } },
                    { "uid": "api::person.person", "info": { "singularName": "person", "pluralName": "people" } }
                ]
            }"#,
        )
        .unwrap();

        let result = build(&catalog, &SchemaConfig::default());

        assert!(matches!(
            result,
            Err(ModelBuildingError::DuplicateName(name)) if name == "Query.people"
        ));
    }

    #[multiplatform_test]
    fn unknown_dynamic_zone_component_is_fatal() {
        let catalog = ContentTypeCatalog::from_json(
            r#"{
                "contentTypes": [{
                    "uid": "api::page.page",
                    "info": { "singularName": "page" },
                    "attributes": {
                        "sections": { "type": "dynamiczone", "components": ["sections.hero"] }
                    }
                }]
            }"#,
        )
        .unwrap();

        let result = build(&catalog, &SchemaConfig::default());

        assert!(matches!(
            result,
            Err(ModelBuildingError::UnknownComponent { component, .. }) if component == "sections.hero"
        ));
    }
}
