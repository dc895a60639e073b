// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Arguments shared by generated fields.

use async_graphql_parser::types::InputValueDefinition;
use async_graphql_value::{ConstValue, Name};
use cms_model::content_type::ContentTypeSchema;

use crate::{
    definition::{input_value, input_value_with_default, list_of, named, non_null},
    internal_types::{PAGINATION_ARG_TYPE, PUBLICATION_STATUS_PUBLISHED, PUBLICATION_STATUS_TYPE},
    naming::{TypeRole, role_type_name},
};

pub const FILTERS_ARG: &str = "filters";
pub const PAGINATION_ARG: &str = "pagination";
pub const SORT_ARG: &str = "sort";
pub const STATUS_ARG: &str = "status";
pub const DOCUMENT_ID_ARG: &str = "documentId";
pub const DATA_ARG: &str = "data";

pub fn filters_arg(target: &ContentTypeSchema) -> InputValueDefinition {
    input_value(
        FILTERS_ARG,
        named(&role_type_name(target, TypeRole::FiltersInput)),
    )
}

pub fn pagination_arg() -> InputValueDefinition {
    input_value_with_default(
        PAGINATION_ARG,
        named(PAGINATION_ARG_TYPE),
        ConstValue::Object(Default::default()),
    )
}

pub fn sort_arg() -> InputValueDefinition {
    input_value_with_default(
        SORT_ARG,
        list_of(named("String")),
        ConstValue::List(vec![]),
    )
}

pub fn status_arg() -> InputValueDefinition {
    input_value_with_default(
        STATUS_ARG,
        named(PUBLICATION_STATUS_TYPE),
        ConstValue::Enum(Name::new(PUBLICATION_STATUS_PUBLISHED)),
    )
}

pub fn document_id_arg() -> InputValueDefinition {
    input_value(DOCUMENT_ID_ARG, non_null("ID"))
}

pub fn data_arg(schema: &ContentTypeSchema) -> InputValueDefinition {
    input_value(DATA_ARG, non_null(&role_type_name(schema, TypeRole::Input)))
}

/// `filters`, `pagination` and `sort` over `target`
pub fn collection_args(target: &ContentTypeSchema) -> Vec<InputValueDefinition> {
    vec![filters_arg(target), pagination_arg(), sort_arg()]
}

/// `status`, present only for types with draft and publish
pub fn status_args(schema: &ContentTypeSchema) -> Vec<InputValueDefinition> {
    if schema.draft_and_publish {
        vec![status_arg()]
    } else {
        vec![]
    }
}
