// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use cms_graphql_builder::args::{FILTERS_ARG, PAGINATION_ARG, SORT_ARG, STATUS_ARG};
use cms_model::{catalog::ContentTypeCatalog, config::SchemaConfig, content_type::ContentTypeSchema};
use serde_json::Value;

use crate::{
    entity_service::{EntityQuery, PublicationStatus},
    error::ResolverError,
    filters::FilterTranslator,
    pagination::window,
};

/// Turns field arguments into entity queries
pub struct QueryArgs<'a> {
    catalog: &'a ContentTypeCatalog,
    config: &'a SchemaConfig,
}

impl<'a> QueryArgs<'a> {
    pub fn new(catalog: &'a ContentTypeCatalog, config: &'a SchemaConfig) -> Self {
        Self { catalog, config }
    }

    /// A query from `filters`, `sort` and `pagination` over documents of `schema`. The status
    /// comes from the `status` argument, or else from `default_status`.
    pub fn collection_query(
        &self,
        args: &Value,
        schema: &ContentTypeSchema,
        default_status: Option<PublicationStatus>,
    ) -> Result<EntityQuery, ResolverError> {
        let filters = args
            .get(FILTERS_ARG)
            .filter(|filters| !filters.is_null())
            .map(|filters| FilterTranslator::new(self.catalog, self.config).translate(filters, schema));

        let window = window(
            args.get(PAGINATION_ARG).filter(|p| !p.is_null()),
            self.config.default_limit,
            self.config.max_limit,
        )?;

        Ok(EntityQuery {
            filters,
            sort: sort_keys(args.get(SORT_ARG)),
            start: window.start,
            limit: window.limit,
            status: self.status(args, schema, default_status),
        })
    }

    /// A query selecting only by status
    pub fn status_query(
        &self,
        args: &Value,
        schema: &ContentTypeSchema,
        default_status: Option<PublicationStatus>,
    ) -> EntityQuery {
        EntityQuery::with_status(self.status(args, schema, default_status))
    }

    fn status(
        &self,
        args: &Value,
        schema: &ContentTypeSchema,
        default_status: Option<PublicationStatus>,
    ) -> Option<PublicationStatus> {
        if !schema.draft_and_publish {
            return None;
        }
        args.get(STATUS_ARG)
            .and_then(Value::as_str)
            .and_then(PublicationStatus::from_graphql_name)
            .or(default_status)
    }
}

fn sort_keys(sort: Option<&Value>) -> Vec<String> {
    match sort {
        Some(Value::String(key)) => vec![key.clone()],
        Some(Value::Array(keys)) => keys
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => vec![],
    }
}
