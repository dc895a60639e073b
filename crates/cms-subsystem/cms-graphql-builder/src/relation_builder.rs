// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Fields for attributes pointing to other records: relations, media and components.
//!
//! All of them resolve through the association resolver. To-many attributes get a list field
//! (the loaded collection's `nodes`) and, for relations and media, a `_connection` field
//! exposing the collection itself.

use cms_model::{
    config::CrudAction,
    content_type::{Attribute, Cardinality, ContentTypeSchema},
};

use crate::{
    args::collection_args,
    builder_context::BuiltField,
    definition::{field, list_of, named, required},
    naming::{TypeRole, connection_field_name, role_type_name, type_name},
    resolver_spec::{ResolverSpec, auth_scope},
};

fn association(schema: &ContentTypeSchema, attribute: &Attribute, unwrap_nodes: bool) -> ResolverSpec {
    ResolverSpec::Association {
        source_uid: schema.uid.clone(),
        attribute: attribute.name.clone(),
        unwrap_nodes,
    }
}

/// Fields for a relation or media attribute whose target is enabled. Each requires the
/// `find` scope on the target.
pub fn build_relation_fields(
    schema: &ContentTypeSchema,
    attribute: &Attribute,
    target: &ContentTypeSchema,
    cardinality: Cardinality,
) -> Vec<BuiltField> {
    let scope = auth_scope(&target.uid, CrudAction::Find);
    let target_type = type_name(target);

    match cardinality {
        Cardinality::One => vec![
            BuiltField::resolved(
                field(&attribute.name, named(&target_type), vec![]),
                association(schema, attribute, false),
            )
            .with_auth_scope(scope),
        ],
        Cardinality::Many => vec![
            BuiltField::resolved(
                field(
                    &attribute.name,
                    required(list_of(named(&target_type))),
                    collection_args(target),
                ),
                association(schema, attribute, true),
            )
            .with_auth_scope(scope.clone()),
            BuiltField::resolved(
                field(
                    &connection_field_name(&attribute.name),
                    named(&role_type_name(target, TypeRole::RelationResponseCollection)),
                    collection_args(target),
                ),
                association(schema, attribute, false),
            )
            .with_auth_scope(scope),
        ],
    }
}

/// Field for a component attribute whose component is enabled
pub fn build_component_field(
    schema: &ContentTypeSchema,
    attribute: &Attribute,
    component: &ContentTypeSchema,
    repeatable: bool,
) -> BuiltField {
    let component_type = type_name(component);

    let definition = if repeatable {
        field(
            &attribute.name,
            list_of(named(&component_type)),
            collection_args(component),
        )
    } else {
        let typ = if attribute.required {
            required(named(&component_type))
        } else {
            named(&component_type)
        };
        field(&attribute.name, typ, vec![])
    };

    BuiltField::resolved(definition, association(schema, attribute, repeatable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_catalog;
    use multiplatform_test::multiplatform_test;

    fn signature(built_field: &BuiltField) -> String {
        let args: Vec<_> = built_field
            .definition
            .arguments
            .iter()
            .map(|arg| format!("{}: {}", arg.node.name.node, arg.node.ty.node))
            .collect();
        format!(
            "{}({}): {}",
            built_field.name(),
            args.join(", "),
            built_field.definition.ty.node
        )
    }

    #[multiplatform_test]
    fn to_many_relation() {
        let catalog = sample_catalog();
        let article = catalog.get("api::article.article").unwrap();
        let tag = catalog.get("api::tag.tag").unwrap();

        let fields = build_relation_fields(
            article,
            article.attribute("tags").unwrap(),
            tag,
            Cardinality::Many,
        );

        insta::assert_debug_snapshot!(fields.iter().map(signature).collect::<Vec<_>>(), @r#"
        [
            "tags(filters: TagFiltersInput, pagination: PaginationArg, sort: [String]): [Tag]!",
            "tags_connection(filters: TagFiltersInput, pagination: PaginationArg, sort: [String]): TagRelationResponseCollection",
        ]
        "#);
        assert!(
            fields
                .iter()
                .all(|f| f.auth_scope.as_deref() == Some("api::tag.tag.find"))
        );
        assert_eq!(
            Some(ResolverSpec::Association {
                source_uid: "api::article.article".to_string(),
                attribute: "tags".to_string(),
                unwrap_nodes: true,
            }),
            fields[0].resolver
        );
    }

    #[multiplatform_test]
    fn to_one_relation() {
        let catalog = sample_catalog();
        let article = catalog.get("api::article.article").unwrap();
        let category = catalog.get("api::category.category").unwrap();

        let fields = build_relation_fields(
            article,
            article.attribute("category").unwrap(),
            category,
            Cardinality::One,
        );

        assert_eq!(1, fields.len());
        assert_eq!("category(): Category", signature(&fields[0]));
        assert_eq!(
            Some("api::category.category.find"),
            fields[0].auth_scope.as_deref()
        );
    }

    #[multiplatform_test]
    fn repeatable_component() {
        let catalog = sample_catalog();
        let seo = catalog.get("shared.seo").unwrap();
        let link = catalog.get("shared.link").unwrap();

        let built_field = build_component_field(seo, seo.attribute("links").unwrap(), link, true);

        assert_eq!(
            "links(filters: ComponentSharedLinkFiltersInput, pagination: PaginationArg, sort: [String]): [ComponentSharedLink]",
            signature(&built_field)
        );
        assert_eq!(None, built_field.auth_scope);
    }
}
