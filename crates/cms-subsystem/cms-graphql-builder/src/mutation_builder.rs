// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::types::FieldDefinition;
use cms_model::{config::CrudAction, content_type::ContentTypeSchema};

use crate::{
    args::{data_arg, document_id_arg, status_args},
    builder_context::{BuilderContext, BuiltField},
    definition::{field, named},
    internal_types::DELETE_MUTATION_RESPONSE_TYPE,
    naming::{OperationRole, TypeRole, operation_name, role_type_name},
    resolver_spec::{OperationAction, ResolverSpec, auth_scope},
    type_registry::TypeRegistry,
};

fn scoped(
    schema: &ContentTypeSchema,
    definition: FieldDefinition,
    action: OperationAction,
) -> BuiltField {
    BuiltField::resolved(
        definition,
        ResolverSpec::Operation {
            uid: schema.uid.clone(),
            action,
        },
    )
    .with_auth_scope(auth_scope(&schema.uid, action.crud_action()))
}

/// Root mutation fields of a content type. `create` and `update` need the content type's input
/// type to be in `registry`; types without writable attributes only get `delete`.
pub fn build_mutation_fields(
    context: &BuilderContext,
    registry: &TypeRegistry,
    schema: &ContentTypeSchema,
) -> Vec<BuiltField> {
    let uid = &schema.uid;
    let has_input = registry.has(&role_type_name(schema, TypeRole::Input));
    let entity_response = role_type_name(schema, TypeRole::EntityResponse);
    let single = schema.is_single_type();

    let mut fields = vec![];

    if has_input && !single && context.config.is_action_enabled(uid, CrudAction::Create) {
        let mut args = vec![data_arg(schema)];
        args.extend(status_args(schema));

        fields.push(scoped(
            schema,
            field(
                &operation_name(schema, OperationRole::Create),
                named(&entity_response),
                args,
            ),
            OperationAction::Create,
        ));
    }

    if has_input && context.config.is_action_enabled(uid, CrudAction::Update) {
        let mut args = if single {
            vec![]
        } else {
            vec![document_id_arg()]
        };
        args.push(data_arg(schema));
        args.extend(status_args(schema));

        fields.push(scoped(
            schema,
            field(
                &operation_name(schema, OperationRole::Update),
                named(&entity_response),
                args,
            ),
            OperationAction::Update,
        ));
    }

    if context.config.is_action_enabled(uid, CrudAction::Delete) {
        let args = if single {
            vec![]
        } else {
            vec![document_id_arg()]
        };

        fields.push(scoped(
            schema,
            field(
                &operation_name(schema, OperationRole::Delete),
                named(DELETE_MUTATION_RESPONSE_TYPE),
                args,
            ),
            OperationAction::Delete,
        ));
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::input_object_type;
    use crate::test_utils::{sample_catalog, sample_config};
    use crate::type_registry::{RegistryConfig, RegistryKind};
    use multiplatform_test::multiplatform_test;

    fn signatures(fields: &[BuiltField]) -> Vec<String> {
        fields
            .iter()
            .map(|f| {
                let args: Vec<_> = f
                    .definition
                    .arguments
                    .iter()
                    .map(|arg| format!("{}: {}", arg.node.name.node, arg.node.ty.node))
                    .collect();
                format!("{}({}): {}", f.name(), args.join(", "), f.definition.ty.node)
            })
            .collect()
    }

    fn registry_with_inputs(names: &[&str]) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register_many(
                names.iter().map(|name| input_object_type(name, vec![])),
                RegistryConfig::new(RegistryKind::Input),
            )
            .unwrap();
        registry
    }

    #[multiplatform_test]
    fn collection_type_mutations() {
        let catalog = sample_catalog();
        let config = sample_config();
        let context = BuilderContext::new(&catalog, &config);
        let registry = registry_with_inputs(&["ArticleInput"]);

        let fields =
            build_mutation_fields(&context, &registry, catalog.get("api::article.article").unwrap());

        insta::assert_debug_snapshot!(signatures(&fields), @r#"
        [
            "createArticle(data: ArticleInput!, status: PublicationStatus): ArticleEntityResponse",
            "updateArticle(documentId: ID!, data: ArticleInput!, status: PublicationStatus): ArticleEntityResponse",
            "deleteArticle(documentId: ID!): DeleteMutationResponse",
        ]
        "#);
        assert_eq!(
            Some("api::article.article.update"),
            fields[1].auth_scope.as_deref()
        );
    }

    #[multiplatform_test]
    fn single_type_mutations() {
        let catalog = sample_catalog();
        let config = sample_config();
        let context = BuilderContext::new(&catalog, &config);
        let registry = registry_with_inputs(&["HomepageInput"]);

        let fields = build_mutation_fields(
            &context,
            &registry,
            catalog.get("api::homepage.homepage").unwrap(),
        );

        assert_eq!(
            vec![
                "updateHomepage(data: HomepageInput!): HomepageEntityResponse",
                "deleteHomepage(): DeleteMutationResponse",
            ],
            signatures(&fields)
        );
    }

    #[multiplatform_test]
    fn without_input_only_delete_remains() {
        let catalog = sample_catalog();
        let config = sample_config();
        let context = BuilderContext::new(&catalog, &config);
        let registry = TypeRegistry::new();

        let fields = build_mutation_fields(
            &context,
            &registry,
            catalog.get("api::category.category").unwrap(),
        );

        assert_eq!(
            vec!["deleteCategory(documentId: ID!): DeleteMutationResponse"],
            signatures(&fields)
        );
    }

    #[multiplatform_test]
    fn disabled_delete_is_skipped() {
        let catalog = sample_catalog();
        let config = sample_config();
        let context = BuilderContext::new(&catalog, &config);
        let registry = registry_with_inputs(&["TagInput"]);

        let fields =
            build_mutation_fields(&context, &registry, catalog.get("api::tag.tag").unwrap());

        assert_eq!(
            vec!["createTag", "updateTag"],
            fields.iter().map(BuiltField::name).collect::<Vec<_>>()
        );
    }
}
