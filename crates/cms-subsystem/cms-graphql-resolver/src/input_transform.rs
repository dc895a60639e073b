// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Mutation data, from its GraphQL shape to its stored shape.
//!
//! Enum values come back to their stored spelling (`draft_review` to `draft-review`) and
//! dynamic zone entries trade their `__typename` for the `__component` uid.

use std::collections::HashMap;

use cms_graphql_builder::naming::{enum_value_name, type_name};
use cms_model::{
    catalog::ContentTypeCatalog,
    content_type::{AttributeType, ContentTypeSchema},
};
use serde_json::{Map, Value};

use crate::error::ResolverError;

const TYPENAME_KEY: &str = "__typename";
pub const COMPONENT_KEY: &str = "__component";

pub struct InputTransformer<'a> {
    catalog: &'a ContentTypeCatalog,
    /// Component uid by GraphQL type name
    components_by_type: HashMap<String, &'a str>,
}

impl<'a> InputTransformer<'a> {
    pub fn new(catalog: &'a ContentTypeCatalog) -> Self {
        let components_by_type = catalog
            .components()
            .map(|component| (type_name(component), component.uid.as_str()))
            .collect();

        Self {
            catalog,
            components_by_type,
        }
    }

    pub fn transform(&self, data: Value, schema: &ContentTypeSchema) -> Result<Value, ResolverError> {
        let Value::Object(map) = data else {
            return Ok(data);
        };

        let mut transformed = Map::new();
        for (key, value) in map {
            let value = match schema.attribute(&key).map(|attribute| &attribute.typ) {
                Some(AttributeType::Enumeration(values)) => stored_enum_value(value, values),
                Some(AttributeType::Component { component, .. }) => {
                    match self.catalog.component(component) {
                        Some(component) => self.transform_each(value, component)?,
                        None => value,
                    }
                }
                Some(AttributeType::DynamicZone { components }) => {
                    self.transform_zone(&key, value, components)?
                }
                _ => value,
            };
            transformed.insert(key, value);
        }
        Ok(Value::Object(transformed))
    }

    fn transform_each(&self, value: Value, schema: &ContentTypeSchema) -> Result<Value, ResolverError> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.transform(item, schema))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => self.transform(other, schema),
        }
    }

    fn transform_zone(
        &self,
        attribute_name: &str,
        value: Value,
        allowed: &[String],
    ) -> Result<Value, ResolverError> {
        let Value::Array(entries) = value else {
            return Ok(value);
        };

        entries
            .into_iter()
            .map(|entry| self.transform_zone_entry(attribute_name, entry, allowed))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn transform_zone_entry(
        &self,
        attribute_name: &str,
        entry: Value,
        allowed: &[String],
    ) -> Result<Value, ResolverError> {
        let Value::Object(mut map) = entry else {
            return Err(ResolverError::Validation(format!(
                "Entries of '{attribute_name}' must be objects"
            )));
        };

        let uid = match map.remove(TYPENAME_KEY) {
            Some(Value::String(typename)) => self
                .components_by_type
                .get(&typename)
                .map(|uid| uid.to_string())
                .ok_or(typename),
            _ => match map.remove(COMPONENT_KEY) {
                Some(Value::String(uid)) => Ok(uid),
                _ => Err(String::new()),
            },
        };

        let component = uid
            .ok()
            .filter(|uid| allowed.contains(uid))
            .and_then(|uid| self.catalog.component(&uid))
            .ok_or_else(|| {
                ResolverError::application(
                    "ApplicationError",
                    format!(
                        "Invalid component for '{attribute_name}'. Expected one of: {}",
                        self.allowed_type_names(allowed).join(", ")
                    ),
                )
            })?;

        let mut transformed = match self.transform(Value::Object(map), component)? {
            Value::Object(transformed) => transformed,
            _ => Map::new(),
        };
        transformed.insert(COMPONENT_KEY.to_string(), Value::String(component.uid.clone()));
        Ok(Value::Object(transformed))
    }

    fn allowed_type_names(&self, allowed: &[String]) -> Vec<String> {
        allowed
            .iter()
            .filter_map(|uid| self.catalog.component(uid))
            .map(type_name)
            .collect()
    }
}

fn stored_enum_value(value: Value, stored: &[String]) -> Value {
    match &value {
        Value::String(name) => stored
            .iter()
            .find(|stored| enum_value_name(stored) == *name)
            .map(|stored| Value::String(stored.clone()))
            .unwrap_or(value),
        _ => value,
    }
}
