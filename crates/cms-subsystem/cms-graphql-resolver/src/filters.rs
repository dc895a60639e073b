// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Translation of filter arguments into backend filters.
//!
//! Filter arguments mirror the generated filter input types: attribute keys hold either
//! operators (`{title: {eq: "a"}}`) or, for associations, a filter over the target
//! (`{category: {name: {eq: "News"}}}`), and `and`/`or`/`not` combine filters. The backend
//! uses the same shape with operator symbols (`$eq`, `$and`).
//!
//! A key naming an attribute is always treated as that attribute, even if it is also a
//! combinator name. Keys that are neither are dropped, as are filters on attributes the filter
//! input types leave out and on associations whose target is disabled.

use cms_model::{
    attribute_class::{FilterShape, classify},
    catalog::ContentTypeCatalog,
    config::SchemaConfig,
    content_type::ContentTypeSchema,
    operators::{find_operator, find_operator_by_backend_symbol, find_root_combinator},
};
use serde_json::{Map, Value};
use tracing::debug;

pub struct FilterTranslator<'a> {
    catalog: &'a ContentTypeCatalog,
    config: &'a SchemaConfig,
}

impl<'a> FilterTranslator<'a> {
    pub fn new(catalog: &'a ContentTypeCatalog, config: &'a SchemaConfig) -> Self {
        Self { catalog, config }
    }

    /// Translate `filters`, a filter over documents of `schema`
    pub fn translate(&self, filters: &Value, schema: &ContentTypeSchema) -> Value {
        match filters {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.translate(item, schema))
                    .collect(),
            ),
            Value::Object(map) => {
                let mut translated = Map::new();

                for (key, value) in map {
                    if let Some(attribute) = schema.attribute(key) {
                        match classify(attribute).filter_shape() {
                            FilterShape::Operators => {
                                translated.insert(key.clone(), translate_operators(value));
                            }
                            FilterShape::Nested => {
                                match self.enabled_target(attribute.typ.target_uid()) {
                                    Some(target) => {
                                        translated
                                            .insert(key.clone(), self.translate(value, target));
                                    }
                                    None => {
                                        debug!("Dropping filter on '{}.{key}'", schema.uid)
                                    }
                                }
                            }
                            FilterShape::Unfilterable => {
                                debug!("Dropping filter on '{}.{key}'", schema.uid)
                            }
                        }
                    } else if let Some(combinator) = find_root_combinator(key) {
                        translated.insert(
                            combinator.backend_symbol.to_string(),
                            self.translate(value, schema),
                        );
                    }
                }

                Value::Object(translated)
            }
            leaf => leaf.clone(),
        }
    }

    fn enabled_target(&self, uid: Option<&str>) -> Option<&'a ContentTypeSchema> {
        let uid = uid?;
        self.catalog
            .get(uid)
            .filter(|_| self.config.is_type_enabled(uid))
    }
}

/// Translate the operators applied to a scalar (`{eq: "a", not: {null: true}}`)
fn translate_operators(filter: &Value) -> Value {
    match filter {
        Value::Array(items) => Value::Array(items.iter().map(translate_operators).collect()),
        Value::Object(map) => {
            let mut translated = Map::new();
            for (key, value) in map {
                let Some(operator) =
                    find_operator(key).or_else(|| find_operator_by_backend_symbol(key))
                else {
                    continue;
                };
                let value = if operator.is_root_combinator() {
                    translate_operators(value)
                } else {
                    value.clone()
                };
                translated.insert(operator.backend_symbol.to_string(), value);
            }
            Value::Object(translated)
        }
        // A bare value (`{title: "a"}`) means equality; the backend accepts it as is
        leaf => leaf.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_catalog, sample_config};
    use multiplatform_test::multiplatform_test;
    use serde_json::json;

    fn translate(filters: Value) -> Value {
        let catalog = sample_catalog();
        let config = sample_config();
        FilterTranslator::new(&catalog, &config)
            .translate(&filters, catalog.get("api::article.article").unwrap())
    }

    #[multiplatform_test]
    fn operators_and_combinators() {
        assert_eq!(
            json!({ "title": { "$eq": "a" }, "$and": [{ "views": { "$gt": 1 } }] }),
            translate(json!({ "title": { "eq": "a" }, "and": [{ "views": { "gt": 1 } }] }))
        );
    }

    #[multiplatform_test]
    fn date_leaves_are_untouched() {
        assert_eq!(
            json!({ "publishDate": { "$between": ["2024-01-01", "2024-12-31"] } }),
            translate(json!({ "publishDate": { "between": ["2024-01-01", "2024-12-31"] } }))
        );
    }

    #[multiplatform_test]
    fn nested_associations() {
        assert_eq!(
            json!({
                "category": { "name": { "$containsi": "news" } },
                "seo": { "metaTitle": { "$null": false } },
                "$not": { "tags": { "$or": [{ "label": { "$eq": "x" } }] } }
            }),
            translate(json!({
                "category": { "name": { "containsi": "news" } },
                "seo": { "metaTitle": { "null": false } },
                "not": { "tags": { "or": [{ "label": { "eq": "x" } }] } }
            }))
        );
    }

    #[multiplatform_test]
    fn scalar_level_combinators() {
        assert_eq!(
            json!({ "views": { "$or": [{ "$lt": 5 }, { "$gt": 10 }], "$not": { "$eq": 7 } } }),
            translate(json!({ "views": { "or": [{ "lt": 5 }, { "gt": 10 }], "not": { "eq": 7 } } }))
        );
    }

    #[multiplatform_test]
    fn unknown_keys_and_unfilterable_attributes_are_dropped() {
        assert_eq!(
            json!({ "title": { "$eq": "a" } }),
            translate(json!({
                "title": { "eq": "a", "regex": ".*" },
                "legacy": { "code": { "eq": "x" } },
                "blocks": { "body": { "eq": "x" } },
                "cover": { "name": { "eq": "x.png" } },
                "unknown": { "eq": 1 }
            }))
        );
    }

    #[multiplatform_test]
    fn attribute_keys_win_over_combinators() {
        let catalog = ContentTypeCatalog::from_json(
            r#"{
                "contentTypes": [{
                    "uid": "api::rule.rule",
                    "info": { "singularName": "rule" },
                    "attributes": { "and": { "type": "string" } }
                }]
            }"#,
        )
        .unwrap();
        let config = SchemaConfig::default();

        let translated = FilterTranslator::new(&catalog, &config).translate(
            &json!({ "and": { "eq": "both" } }),
            catalog.get("api::rule.rule").unwrap(),
        );

        assert_eq!(json!({ "and": { "$eq": "both" } }), translated);
    }

    #[multiplatform_test]
    fn translating_twice_changes_nothing() {
        let once = translate(json!({ "title": { "eq": "a" }, "or": [{ "views": { "gt": 1 } }] }));

        let catalog = sample_catalog();
        let config = sample_config();
        let twice = FilterTranslator::new(&catalog, &config)
            .translate(&once, catalog.get("api::article.article").unwrap());

        assert_eq!(once, twice);
    }
}
