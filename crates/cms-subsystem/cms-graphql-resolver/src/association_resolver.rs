// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolvers of attributes loaded through the entity service: relations, media, components,
//! polymorphic relations and dynamic zones.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use cms_graphql_builder::{internal_types::ERROR_TYPE, naming::type_name};
use cms_model::content_type::{AttributeType, Cardinality, ContentTypeSchema, RelationTarget};
use serde_json::{Map, Value, json};

use crate::{
    chain::{FieldResolver, Invocation},
    entity_service::{EntityQuery, PublicationStatus},
    error::ResolverError,
    input_transform::COMPONENT_KEY,
    resolved::{Node, Resolved},
    services::Runtime,
};

const MORPH_TYPE_KEY: &str = "__type";

/// What an association attribute points to, worked out when the schema is assembled
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AssociationTarget {
    /// A single content type or component
    Single { uid: String, cardinality: Cardinality },
    /// Content types named by each value. `members` maps the uids the field may return to
    /// their type names.
    Polymorphic {
        cardinality: Cardinality,
        members: HashMap<String, String>,
    },
}

impl AssociationTarget {
    /// The target of `attribute`, restricted for polymorphic attributes to the types in
    /// `union_members`
    pub fn of(
        runtime: &Runtime,
        schema: &ContentTypeSchema,
        attribute_name: &str,
        union_members: &[String],
    ) -> Option<Self> {
        let attribute = schema.attribute(attribute_name)?;

        let single = |uid: &str, many: bool| AssociationTarget::Single {
            uid: uid.to_string(),
            cardinality: if many {
                Cardinality::Many
            } else {
                Cardinality::One
            },
        };

        match &attribute.typ {
            AttributeType::Media { multiple } => {
                attribute.typ.target_uid().map(|uid| single(uid, *multiple))
            }
            AttributeType::Component {
                component,
                repeatable,
            } => Some(single(component, *repeatable)),
            AttributeType::Relation {
                relation,
                target: RelationTarget::ContentType(uid),
            } => Some(AssociationTarget::Single {
                uid: uid.clone(),
                cardinality: relation.cardinality(),
            }),
            AttributeType::Relation {
                relation,
                target: RelationTarget::Polymorphic(_),
            } => Some(AssociationTarget::Polymorphic {
                cardinality: relation.cardinality(),
                members: runtime
                    .catalog
                    .all()
                    .map(|schema| (schema.uid.clone(), type_name(schema)))
                    .filter(|(_, name)| union_members.contains(name))
                    .collect(),
            }),
            _ => None,
        }
    }
}

pub(crate) struct AssociationResolver {
    source_uid: String,
    attribute: String,
    unwrap_nodes: bool,
    target: AssociationTarget,
    runtime: Arc<Runtime>,
}

impl AssociationResolver {
    pub fn new(
        source_uid: String,
        attribute: String,
        unwrap_nodes: bool,
        target: AssociationTarget,
        runtime: Arc<Runtime>,
    ) -> Self {
        Self {
            source_uid,
            attribute,
            unwrap_nodes,
            target,
            runtime,
        }
    }

    async fn resolve_single(
        &self,
        parent: &Node,
        uid: &str,
        cardinality: Cardinality,
        invocation: &Invocation<'_>,
    ) -> Result<Resolved, ResolverError> {
        let runtime = &self.runtime;
        let target = runtime.schema(uid)?;
        let auth = &invocation.request.auth;

        // Nested documents follow the status of the query that loaded their parent, or are
        // published ones when it had none
        let default_status = parent.status.or_else(|| {
            target
                .draft_and_publish
                .then_some(PublicationStatus::Published)
        });
        let query = match cardinality {
            Cardinality::Many => {
                runtime
                    .query_args()
                    .collection_query(invocation.args, target, default_status)?
            }
            Cardinality::One => {
                runtime
                    .query_args()
                    .status_query(invocation.args, target, default_status)
            }
        };
        runtime
            .services
            .sanitizer
            .validate_query(&query, target, auth)?;

        let loaded = runtime
            .services
            .entity_service
            .load(&self.source_uid, &parent.value, &self.attribute, &query)
            .await?;
        let loaded = runtime
            .services
            .sanitizer
            .sanitize_output(loaded, target, auth)?;

        let status = query.status.or(parent.status);
        Ok(self.shape(parent, loaded, cardinality, |document| {
            Some(Resolved::Node(Node::new(document, status)))
        }))
    }

    async fn resolve_polymorphic(
        &self,
        parent: &Node,
        cardinality: Cardinality,
        members: &HashMap<String, String>,
        invocation: &Invocation<'_>,
    ) -> Result<Resolved, ResolverError> {
        let loaded = load_sanitized(
            &self.runtime,
            &self.source_uid,
            &self.attribute,
            parent,
            invocation,
        )
        .await?;

        Ok(self.shape(parent, loaded, cardinality, |document| {
            let type_name = document
                .get(MORPH_TYPE_KEY)
                .and_then(Value::as_str)
                .and_then(|uid| members.get(uid))?
                .clone();
            Some(Resolved::Typed(parent.child(document), type_name))
        }))
    }

    /// A single value, a list, or a `{nodes}` collection, as the field expects
    fn shape(
        &self,
        parent: &Node,
        loaded: Value,
        cardinality: Cardinality,
        wrap: impl Fn(Value) -> Option<Resolved>,
    ) -> Resolved {
        match cardinality {
            Cardinality::One => match loaded {
                Value::Null => Resolved::Null,
                Value::Array(items) => items
                    .into_iter()
                    .next()
                    .and_then(&wrap)
                    .unwrap_or(Resolved::Null),
                document => wrap(document).unwrap_or(Resolved::Null),
            },
            Cardinality::Many => {
                let documents = match loaded {
                    Value::Array(items) => items,
                    Value::Null => vec![],
                    document => vec![document],
                };
                if self.unwrap_nodes {
                    Resolved::List(documents.into_iter().filter_map(wrap).collect())
                } else {
                    Resolved::Node(parent.child(json!({ "nodes": documents })))
                }
            }
        }
    }
}

#[async_trait]
impl FieldResolver for AssociationResolver {
    async fn resolve(&self, invocation: &Invocation<'_>) -> Result<Resolved, ResolverError> {
        let Some(parent) = invocation.parent else {
            return Ok(Resolved::Null);
        };

        match &self.target {
            AssociationTarget::Single { uid, cardinality } => {
                self.resolve_single(parent, uid, *cardinality, invocation)
                    .await
            }
            AssociationTarget::Polymorphic {
                cardinality,
                members,
            } => {
                self.resolve_polymorphic(parent, *cardinality, members, invocation)
                    .await
            }
        }
    }
}

/// Load an attribute whose values say which schema they follow, and sanitize it through its
/// parent's schema
async fn load_sanitized(
    runtime: &Runtime,
    source_uid: &str,
    attribute: &str,
    parent: &Node,
    invocation: &Invocation<'_>,
) -> Result<Value, ResolverError> {
    let source = runtime.schema(source_uid)?;
    let loaded = runtime
        .services
        .entity_service
        .load(
            source_uid,
            &parent.value,
            attribute,
            &EntityQuery::with_status(parent.status),
        )
        .await?;

    let mut container = Map::new();
    container.insert(attribute.to_string(), loaded);

    let container = runtime.services.sanitizer.sanitize_output(
        Value::Object(container),
        source,
        &invocation.request.auth,
    )?;

    Ok(match container {
        Value::Object(mut map) => map.remove(attribute).unwrap_or(Value::Null),
        _ => Value::Null,
    })
}

/// Resolver of a dynamic zone with components
pub(crate) struct DynamicZoneResolver {
    source_uid: String,
    attribute: String,
    /// Type name of each member component, by uid
    members: HashMap<String, String>,
    runtime: Arc<Runtime>,
}

impl DynamicZoneResolver {
    pub fn new(
        source_uid: String,
        attribute: String,
        union_members: &[String],
        runtime: Arc<Runtime>,
    ) -> Self {
        let members = runtime
            .catalog
            .components()
            .map(|component| (component.uid.clone(), type_name(component)))
            .filter(|(_, name)| union_members.contains(name))
            .collect();

        Self {
            source_uid,
            attribute,
            members,
            runtime,
        }
    }
}

#[async_trait]
impl FieldResolver for DynamicZoneResolver {
    async fn resolve(&self, invocation: &Invocation<'_>) -> Result<Resolved, ResolverError> {
        let Some(parent) = invocation.parent else {
            return Ok(Resolved::Null);
        };

        let loaded = load_sanitized(
            &self.runtime,
            &self.source_uid,
            &self.attribute,
            parent,
            invocation,
        )
        .await?;

        let entries = match loaded {
            Value::Array(entries) => entries,
            Value::Null => return Ok(Resolved::Null),
            entry => vec![entry],
        };

        Ok(Resolved::List(
            entries
                .into_iter()
                .filter_map(|entry| {
                    let type_name = entry
                        .get(COMPONENT_KEY)
                        .and_then(Value::as_str)
                        .and_then(|uid| self.members.get(uid))?
                        .clone();
                    Some(Resolved::Typed(parent.child(entry), type_name))
                })
                .collect(),
        ))
    }
}

/// Resolver of a dynamic zone without components, which always reports it is empty
pub(crate) struct EmptyDynamicZoneResolver;

pub(crate) fn empty_dynamic_zone() -> Resolved {
    Resolved::List(vec![Resolved::Typed(
        Node::new(
            json!({
                "code": "dynamiczone.empty",
                "message": "This dynamic zone is empty",
            }),
            None,
        ),
        ERROR_TYPE.to_string(),
    )])
}

#[async_trait]
impl FieldResolver for EmptyDynamicZoneResolver {
    async fn resolve(&self, _invocation: &Invocation<'_>) -> Result<Resolved, ResolverError> {
        Ok(empty_dynamic_zone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_graphql_builder::resolver_spec::FieldPath;

    use crate::request_context::{AuthContext, RequestContext};

    #[tokio::test]
    async fn empty_zones_report_an_error_payload() {
        let field = FieldPath::new("Article", "emptyZone");
        let args = json!({});
        let request = RequestContext::new(AuthContext::anonymous());
        let parent = Node::new(json!({ "emptyZone": [{ "__component": "shared.quote" }] }), None);

        let resolved = EmptyDynamicZoneResolver
            .resolve(&Invocation {
                field: &field,
                parent: Some(&parent),
                args: &args,
                request: &request,
            })
            .await
            .unwrap();

        assert_eq!(
            Resolved::List(vec![Resolved::Typed(
                Node::new(
                    json!({ "code": "dynamiczone.empty", "message": "This dynamic zone is empty" }),
                    None
                ),
                "Error".to_string()
            )]),
            resolved
        );
    }
}
