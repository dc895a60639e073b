// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use cms_model::{
    catalog::ContentTypeCatalog,
    content_type::{AttributeType, ContentTypeSchema, RelationTarget},
    operators::find_root_combinator,
};
use serde_json::{Map, Value};

use crate::{entity_service::EntityQuery, error::ResolverError, request_context::AuthContext};

/// Checks and cleans data crossing the API boundary
pub trait Sanitizer: Send + Sync {
    /// Clean documents before they are returned
    fn sanitize_output(
        &self,
        data: Value,
        schema: &ContentTypeSchema,
        auth: &AuthContext,
    ) -> Result<Value, ResolverError>;

    /// Reject queries the requester may not run
    fn validate_query(
        &self,
        query: &EntityQuery,
        schema: &ContentTypeSchema,
        auth: &AuthContext,
    ) -> Result<(), ResolverError>;

    /// Clean mutation data before it is stored
    fn sanitize_input(
        &self,
        data: Value,
        schema: &ContentTypeSchema,
        auth: &AuthContext,
    ) -> Result<Value, ResolverError>;
}

/// Hides private attributes: strips them from outputs and inputs, and refuses to filter or
/// sort on them
pub struct PrivateFieldSanitizer {
    catalog: Arc<ContentTypeCatalog>,
}

impl PrivateFieldSanitizer {
    pub fn new(catalog: Arc<ContentTypeCatalog>) -> Self {
        Self { catalog }
    }

    /// Schema of the documents an attribute holds. Polymorphic and dynamic zone values say
    /// which schema they follow themselves.
    fn nested_schema(&self, typ: &AttributeType, value: &Value) -> Option<&ContentTypeSchema> {
        match typ {
            AttributeType::DynamicZone { .. } => value
                .get("__component")
                .and_then(Value::as_str)
                .and_then(|uid| self.catalog.component(uid)),
            AttributeType::Relation {
                target: RelationTarget::Polymorphic(_),
                ..
            } => value
                .get("__type")
                .and_then(Value::as_str)
                .and_then(|uid| self.catalog.get(uid)),
            _ => typ.target_uid().and_then(|uid| self.catalog.get(uid)),
        }
    }

    fn strip(&self, data: Value, schema: &ContentTypeSchema, writable_only: bool) -> Value {
        match data {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.strip(item, schema, writable_only))
                    .collect(),
            ),
            Value::Object(map) => {
                let mut sanitized = Map::new();
                for (key, value) in map {
                    match schema.attribute(&key) {
                        Some(attribute)
                            if attribute.private || (writable_only && !attribute.writable) => {}
                        Some(attribute) => {
                            let value = self.strip_nested(&attribute.typ, value, writable_only);
                            sanitized.insert(key, value);
                        }
                        None => {
                            sanitized.insert(key, value);
                        }
                    }
                }
                Value::Object(sanitized)
            }
            other => other,
        }
    }

    fn strip_nested(&self, typ: &AttributeType, value: Value, writable_only: bool) -> Value {
        match value {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.strip_nested(typ, item, writable_only))
                    .collect(),
            ),
            Value::Object(_) => match self.nested_schema(typ, &value) {
                Some(nested) => self.strip(value, nested, writable_only),
                None => value,
            },
            other => other,
        }
    }

    fn validate_filters(
        &self,
        filters: &Value,
        schema: &ContentTypeSchema,
    ) -> Result<(), ResolverError> {
        match filters {
            Value::Array(items) => items
                .iter()
                .try_for_each(|item| self.validate_filters(item, schema)),
            Value::Object(map) => {
                for (key, value) in map {
                    match schema.attribute(key) {
                        Some(attribute) if attribute.private => {
                            return Err(ResolverError::Validation(format!("Invalid key {key}")));
                        }
                        Some(attribute) => {
                            if let Some(nested) = attribute
                                .typ
                                .target_uid()
                                .and_then(|uid| self.catalog.get(uid))
                            {
                                self.validate_filters(value, nested)?;
                            }
                        }
                        None if find_root_combinator(key).is_some() => {
                            self.validate_filters(value, schema)?;
                        }
                        None => {}
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn validate_sort(&self, sort: &str, schema: &ContentTypeSchema) -> Result<(), ResolverError> {
        let invalid = || ResolverError::Validation(format!("Invalid sort key {sort}"));

        let (path, direction) = sort.split_once(':').unwrap_or((sort, "asc"));
        if !matches!(direction.to_ascii_lowercase().as_str(), "asc" | "desc") {
            return Err(invalid());
        }

        let mut current = schema;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let attribute = current.attribute(segment).ok_or_else(invalid)?;
            if attribute.private {
                return Err(invalid());
            }
            if segments.peek().is_some() {
                current = attribute
                    .typ
                    .target_uid()
                    .and_then(|uid| self.catalog.get(uid))
                    .ok_or_else(invalid)?;
            }
        }
        Ok(())
    }
}

impl Sanitizer for PrivateFieldSanitizer {
    fn sanitize_output(
        &self,
        data: Value,
        schema: &ContentTypeSchema,
        _auth: &AuthContext,
    ) -> Result<Value, ResolverError> {
        Ok(self.strip(data, schema, false))
    }

    fn validate_query(
        &self,
        query: &EntityQuery,
        schema: &ContentTypeSchema,
        _auth: &AuthContext,
    ) -> Result<(), ResolverError> {
        if let Some(filters) = &query.filters {
            self.validate_filters(filters, schema)?;
        }
        query
            .sort
            .iter()
            .try_for_each(|sort| self.validate_sort(sort, schema))
    }

    fn sanitize_input(
        &self,
        data: Value,
        schema: &ContentTypeSchema,
        _auth: &AuthContext,
    ) -> Result<Value, ResolverError> {
        if !data.is_object() {
            return Err(ResolverError::Validation(
                "Mutation data must be an object".to_string(),
            ));
        }
        Ok(self.strip(data, schema, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_catalog;
    use multiplatform_test::multiplatform_test;
    use serde_json::json;

    fn sanitizer() -> (PrivateFieldSanitizer, Arc<ContentTypeCatalog>) {
        let catalog = Arc::new(sample_catalog());
        (PrivateFieldSanitizer::new(catalog.clone()), catalog)
    }

    #[multiplatform_test]
    fn strips_private_attributes_recursively() {
        let (sanitizer, catalog) = sanitizer();
        let category = catalog.get("api::category.category").unwrap();

        let sanitized = sanitizer
            .sanitize_output(
                json!({
                    "name": "News",
                    "articles": [{ "title": "Hello", "secret": "s3cr3t" }]
                }),
                category,
                &AuthContext::anonymous(),
            )
            .unwrap();

        assert_eq!(
            json!({ "name": "News", "articles": [{ "title": "Hello" }] }),
            sanitized
        );
    }

    #[multiplatform_test]
    fn rejects_queries_on_private_attributes() {
        let (sanitizer, catalog) = sanitizer();
        let article = catalog.get("api::article.article").unwrap();
        let auth = AuthContext::anonymous();

        let by_filter = EntityQuery {
            filters: Some(json!({ "$or": [{ "secret": { "$eq": "x" } }] })),
            ..EntityQuery::default()
        };
        assert!(matches!(
            sanitizer.validate_query(&by_filter, article, &auth),
            Err(ResolverError::Validation(_))
        ));

        let by_sort = EntityQuery {
            sort: vec!["secret:desc".to_string()],
            ..EntityQuery::default()
        };
        assert!(matches!(
            sanitizer.validate_query(&by_sort, article, &auth),
            Err(ResolverError::Validation(_))
        ));

        let fine = EntityQuery {
            filters: Some(json!({ "category": { "name": { "$eq": "News" } } })),
            sort: vec!["views:desc".to_string(), "category.name".to_string()],
            ..EntityQuery::default()
        };
        assert!(sanitizer.validate_query(&fine, article, &auth).is_ok());
    }
}
