// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Values produced by field resolvers.
//!
//! A composite value travels down the response tree as a [`Node`], carrying what its fields
//! need beyond the raw document: the publication status of the query that produced it (so
//! that nested associations default to the same status) and, for entity response
//! collections, the query needed to compute `pageInfo`.

use std::sync::Arc;

use async_graphql::{Name, Value as GraphQLValue, dynamic::FieldValue};
use serde_json::Value;
use tracing::warn;

use crate::entity_service::{EntityQuery, PublicationStatus};

/// The query behind a paginated collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSource {
    pub uid: String,
    pub query: EntityQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub value: Value,
    pub status: Option<PublicationStatus>,
    pub collection: Option<Arc<CollectionSource>>,
}

impl Node {
    pub fn new(value: Value, status: Option<PublicationStatus>) -> Self {
        Self {
            value,
            status,
            collection: None,
        }
    }

    pub fn with_collection(self, source: CollectionSource) -> Self {
        Self {
            collection: Some(Arc::new(source)),
            ..self
        }
    }

    /// A node for a value nested in this one
    pub fn child(&self, value: Value) -> Node {
        Node::new(value, self.status)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Null,
    /// A scalar (or a JSON value of a `JSON` field)
    Leaf(Value),
    /// An enum value, by its GraphQL name
    Enum(String),
    Node(Node),
    /// A member of a union, with the name of its concrete type
    Typed(Node, String),
    List(Vec<Resolved>),
}

impl Resolved {
    /// Nodes for every document in `documents`, in order
    pub fn nodes(documents: Vec<Value>, status: Option<PublicationStatus>) -> Resolved {
        Resolved::List(
            documents
                .into_iter()
                .map(|document| Resolved::Node(Node::new(document, status)))
                .collect(),
        )
    }

    pub fn into_field_value<'a>(self) -> Option<FieldValue<'a>> {
        match self {
            Resolved::Null => None,
            Resolved::Leaf(Value::Null) => None,
            Resolved::Leaf(value) => Some(FieldValue::value(leaf_value(value))),
            Resolved::Enum(name) => Some(FieldValue::value(GraphQLValue::Enum(Name::new(name)))),
            Resolved::Node(node) => Some(FieldValue::owned_any(node)),
            Resolved::Typed(node, type_name) => {
                Some(FieldValue::owned_any(node).with_type(type_name))
            }
            Resolved::List(items) => Some(FieldValue::list(
                items
                    .into_iter()
                    .map(|item| item.into_field_value().unwrap_or(FieldValue::NULL)),
            )),
        }
    }
}

/// A scalar leaf as a response value. A value that cannot be represented becomes `null`.
fn leaf_value(value: Value) -> GraphQLValue {
    match GraphQLValue::from_json(value) {
        Ok(value) => value,
        Err(e) => {
            warn!("Returning null for a leaf value that cannot be represented: {e}");
            GraphQLValue::Null
        }
    }
}

/// Resolve a field by reading the property of the same name off its parent.
///
/// Composite fields (objects, unions and lists of them) wrap what they read in nodes, which
/// inherit the status of the parent; other fields return the value itself.
pub fn resolve_property(parent: Option<&Node>, field_name: &str, composite: bool) -> Resolved {
    let Some(parent) = parent else {
        return Resolved::Null;
    };

    match parent.get(field_name) {
        None | Some(Value::Null) => Resolved::Null,
        Some(value) if composite => wrap_composite(parent, value),
        Some(value) => Resolved::Leaf(value.clone()),
    }
}

fn wrap_composite(parent: &Node, value: &Value) -> Resolved {
    match value {
        Value::Null => Resolved::Null,
        Value::Array(items) => Resolved::List(
            items
                .iter()
                .map(|item| wrap_composite(parent, item))
                .collect(),
        ),
        other => Resolved::Node(parent.child(other.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplatform_test::multiplatform_test;
    use serde_json::json;

    #[multiplatform_test]
    fn properties() {
        let parent = Node::new(
            json!({ "title": "Hello", "seo": { "metaTitle": "Hi" }, "links": [{ "url": "/" }, null] }),
            Some(PublicationStatus::Draft),
        );

        assert_eq!(
            Resolved::Leaf(json!("Hello")),
            resolve_property(Some(&parent), "title", false)
        );
        assert_eq!(Resolved::Null, resolve_property(Some(&parent), "views", false));
        assert_eq!(
            Resolved::Node(Node::new(
                json!({ "metaTitle": "Hi" }),
                Some(PublicationStatus::Draft)
            )),
            resolve_property(Some(&parent), "seo", true)
        );
        assert_eq!(
            Resolved::List(vec![
                Resolved::Node(Node::new(
                    json!({ "url": "/" }),
                    Some(PublicationStatus::Draft)
                )),
                Resolved::Null
            ]),
            resolve_property(Some(&parent), "links", true)
        );
        assert_eq!(Resolved::Null, resolve_property(None, "title", false));
    }

    #[multiplatform_test]
    fn leaf_values_keep_their_structure() {
        let value = leaf_value(json!({ "count": 3, "tags": ["a", null], "ratio": 0.5 }));

        assert_eq!(
            json!({ "count": 3, "tags": ["a", null], "ratio": 0.5 }),
            value.into_json().unwrap()
        );
        assert_eq!(GraphQLValue::Null, leaf_value(Value::Null));
    }
}
