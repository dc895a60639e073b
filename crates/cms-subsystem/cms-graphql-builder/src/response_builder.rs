// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use cms_model::content_type::ContentTypeSchema;

use crate::{
    builder_context::{BuiltField, SchemaFragment},
    definition::{field, list_of, named, non_null, object_type, required},
    error::ModelBuildingError,
    internal_types::PAGINATION_TYPE,
    naming::{TypeRole, role_type_name, type_name},
    resolver_spec::ResolverSpec,
    type_registry::{RegistryConfig, RegistryKind},
};

/// `<T>EntityResponse`, `<T>EntityResponseCollection` and `<T>RelationResponseCollection`
pub fn build_response_types(
    schema: &ContentTypeSchema,
) -> Result<SchemaFragment, ModelBuildingError> {
    let entity = type_name(schema);
    let nodes = || field("nodes", required(list_of(non_null(&entity))), vec![]);

    let entity_response = role_type_name(schema, TypeRole::EntityResponse);
    let collection = role_type_name(schema, TypeRole::EntityResponseCollection);
    let relation_collection = role_type_name(schema, TypeRole::RelationResponseCollection);

    let (fragment, collection_fields) = SchemaFragment::default().with_fields(
        &collection,
        vec![
            BuiltField::plain(nodes()),
            BuiltField::resolved(
                field("pageInfo", non_null(PAGINATION_TYPE), vec![]),
                ResolverSpec::PageInfo,
            ),
        ],
    )?;

    let config = |kind| RegistryConfig::for_content_type(kind, &schema.uid);

    Ok(fragment
        .with_type(
            object_type(&entity_response, vec![field("data", named(&entity), vec![])]),
            config(RegistryKind::EntityResponse),
        )
        .with_type(
            object_type(&collection, collection_fields),
            config(RegistryKind::EntityResponseCollection),
        )
        .with_type(
            object_type(&relation_collection, vec![nodes()]),
            config(RegistryKind::RelationResponseCollection),
        ))
}
