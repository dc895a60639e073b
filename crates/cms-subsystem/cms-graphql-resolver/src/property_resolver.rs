// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::{
    chain::{FieldResolver, Invocation},
    error::ResolverError,
    resolved::{Resolved, resolve_property},
};

/// Reads the field off its parent
pub(crate) struct PropertyResolver {
    pub composite: bool,
}

#[async_trait]
impl FieldResolver for PropertyResolver {
    async fn resolve(&self, invocation: &Invocation<'_>) -> Result<Resolved, ResolverError> {
        Ok(resolve_property(
            invocation.parent,
            &invocation.field.field_name,
            self.composite,
        ))
    }
}

/// Reads a stored enumeration value off the parent and returns its GraphQL name
pub(crate) struct EnumerationResolver {
    /// (stored value, GraphQL name)
    pub values: Vec<(String, String)>,
}

impl EnumerationResolver {
    fn graphql_name(&self, stored: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(value, _)| value == stored)
            .map(|(_, name)| name.as_str())
    }
}

#[async_trait]
impl FieldResolver for EnumerationResolver {
    async fn resolve(&self, invocation: &Invocation<'_>) -> Result<Resolved, ResolverError> {
        let field_name = &invocation.field.field_name;
        let stored = invocation
            .parent
            .and_then(|parent| parent.get(field_name))
            .and_then(Value::as_str);

        Ok(match stored {
            None => Resolved::Null,
            Some(stored) => match self.graphql_name(stored) {
                Some(name) => Resolved::Enum(name.to_string()),
                None => {
                    warn!("Stored value '{stored}' of {} is not in its enumeration", invocation.field);
                    Resolved::Null
                }
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_graphql_builder::resolver_spec::FieldPath;
    use serde_json::json;

    use crate::{
        request_context::{AuthContext, RequestContext},
        resolved::Node,
    };

    #[tokio::test]
    async fn stored_enum_values_map_to_names() {
        let resolver = EnumerationResolver {
            values: vec![
                ("draft-review".to_string(), "draft_review".to_string()),
                ("approved".to_string(), "approved".to_string()),
            ],
        };
        let field = FieldPath::new("Article", "state");
        let args = json!({});
        let request = RequestContext::new(AuthContext::anonymous());

        let mut resolved = vec![];
        for state in [json!("draft-review"), json!("unknown"), Value::Null] {
            let parent = Node::new(json!({ "state": state }), None);
            resolved.push(
                resolver
                    .resolve(&Invocation {
                        field: &field,
                        parent: Some(&parent),
                        args: &args,
                        request: &request,
                    })
                    .await
                    .unwrap(),
            );
        }

        assert_eq!(
            vec![
                Resolved::Enum("draft_review".to_string()),
                Resolved::Null,
                Resolved::Null
            ],
            resolved
        );
    }
}
