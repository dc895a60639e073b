// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Root query fields of a content type.
//!
//! Collection types get `articles`, `articles_connection` and `article`; single types get one
//! field returning their only document. Each field requires the scope of its action.

use cms_model::{config::CrudAction, content_type::ContentTypeSchema};

use crate::{
    args::{collection_args, document_id_arg, status_args},
    builder_context::{BuilderContext, BuiltField},
    definition::{field, list_of, named, required},
    naming::{OperationRole, TypeRole, operation_name, role_type_name, type_name},
    resolver_spec::{OperationAction, ResolverSpec, auth_scope},
};

fn operation(schema: &ContentTypeSchema, action: OperationAction) -> ResolverSpec {
    ResolverSpec::Operation {
        uid: schema.uid.clone(),
        action,
    }
}

fn scoped(
    schema: &ContentTypeSchema,
    definition: async_graphql_parser::types::FieldDefinition,
    action: OperationAction,
) -> BuiltField {
    BuiltField::resolved(definition, operation(schema, action))
        .with_auth_scope(auth_scope(&schema.uid, action.crud_action()))
}

pub fn build_query_fields(context: &BuilderContext, schema: &ContentTypeSchema) -> Vec<BuiltField> {
    let uid = &schema.uid;
    let entity = type_name(schema);

    if schema.is_single_type() {
        if !context.config.is_action_enabled(uid, CrudAction::Find) {
            return vec![];
        }
        return vec![scoped(
            schema,
            field(
                &operation_name(schema, OperationRole::FindOne),
                named(&entity),
                status_args(schema),
            ),
            OperationAction::FindSingle,
        )];
    }

    let mut fields = vec![];

    if context.config.is_action_enabled(uid, CrudAction::Find) {
        let args = || {
            let mut args = collection_args(schema);
            args.extend(status_args(schema));
            args
        };

        fields.push(scoped(
            schema,
            field(
                &operation_name(schema, OperationRole::Find),
                required(list_of(named(&entity))),
                args(),
            ),
            OperationAction::FindMany,
        ));
        fields.push(scoped(
            schema,
            field(
                &operation_name(schema, OperationRole::FindConnection),
                named(&role_type_name(schema, TypeRole::EntityResponseCollection)),
                args(),
            ),
            OperationAction::FindConnection,
        ));
    }

    if context.config.is_action_enabled(uid, CrudAction::FindOne) {
        let mut args = vec![document_id_arg()];
        args.extend(status_args(schema));

        fields.push(scoped(
            schema,
            field(
                &operation_name(schema, OperationRole::FindOne),
                named(&entity),
                args,
            ),
            OperationAction::FindOne,
        ));
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_catalog, sample_config};
    use cms_model::config::SchemaConfig;
    use multiplatform_test::multiplatform_test;

    fn signatures(fields: &[BuiltField]) -> Vec<String> {
        fields
            .iter()
            .map(|f| {
                let args: Vec<_> = f
                    .definition
                    .arguments
                    .iter()
                    .map(|arg| arg.node.name.node.to_string())
                    .collect();
                format!(
                    "{}({}): {} [{}]",
                    f.name(),
                    args.join(", "),
                    f.definition.ty.node,
                    f.auth_scope.as_deref().unwrap_or_default()
                )
            })
            .collect()
    }

    #[multiplatform_test]
    fn collection_type_queries() {
        let catalog = sample_catalog();
        let config = sample_config();
        let context = BuilderContext::new(&catalog, &config);

        let fields = build_query_fields(&context, catalog.get("api::article.article").unwrap());

        insta::assert_debug_snapshot!(signatures(&fields), @r#"
        [
            "articles(filters, pagination, sort, status): [Article]! [api::article.article.find]",
            "articles_connection(filters, pagination, sort, status): ArticleEntityResponseCollection [api::article.article.find]",
            "article(documentId, status): Article [api::article.article.findOne]",
        ]
        "#);
    }

    #[multiplatform_test]
    fn single_type_query() {
        let catalog = sample_catalog();
        let config = sample_config();
        let context = BuilderContext::new(&catalog, &config);

        let fields = build_query_fields(&context, catalog.get("api::homepage.homepage").unwrap());

        assert_eq!(
            vec!["homepage(): Homepage [api::homepage.homepage.find]"],
            signatures(&fields)
        );
        assert_eq!(
            Some(ResolverSpec::Operation {
                uid: "api::homepage.homepage".to_string(),
                action: OperationAction::FindSingle,
            }),
            fields[0].resolver
        );
    }

    #[multiplatform_test]
    fn disabled_actions_are_skipped() {
        let catalog = sample_catalog();
        let config = SchemaConfig::from_toml_str(
            r#"
            [types."api::category.category"]
            disabled_actions = ["find"]
            "#,
        )
        .unwrap();
        let context = BuilderContext::new(&catalog, &config);

        let fields = build_query_fields(&context, catalog.get("api::category.category").unwrap());

        assert_eq!(
            vec!["category(documentId): Category [api::category.category.findOne]"],
            signatures(&fields)
        );
    }
}
