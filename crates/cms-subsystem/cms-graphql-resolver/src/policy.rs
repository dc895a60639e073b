// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Policies: named checks attached to fields, run after middlewares and before the resolver.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use cms_graphql_builder::resolver_spec::FieldPath;
use serde_json::Value;

use crate::{error::ResolverError, request_context::RequestContext};

/// What a policy gets to look at
pub struct PolicyContext<'a> {
    pub field: &'a FieldPath,
    pub parent: Option<&'a Value>,
    pub args: &'a Value,
    pub request: &'a RequestContext,
    /// Configuration given where the policy is attached
    pub config: &'a Value,
}

#[async_trait]
pub trait Policy: Send + Sync {
    /// `Ok(false)` rejects the request
    async fn check(&self, context: &PolicyContext<'_>) -> Result<bool, ResolverError>;
}

/// A policy from a synchronous predicate
pub struct FnPolicy<F>(F);

pub fn policy_fn<F>(predicate: F) -> FnPolicy<F>
where
    F: Fn(&PolicyContext<'_>) -> bool + Send + Sync,
{
    FnPolicy(predicate)
}

#[async_trait]
impl<F> Policy for FnPolicy<F>
where
    F: Fn(&PolicyContext<'_>) -> bool + Send + Sync,
{
    async fn check(&self, context: &PolicyContext<'_>) -> Result<bool, ResolverError> {
        Ok((self.0)(context))
    }
}

/// A policy attached to a field, by name
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRef {
    pub name: String,
    pub config: Value,
}

impl PolicyRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: Value::Null,
        }
    }

    pub fn with_config(self, config: Value) -> Self {
        Self { config, ..self }
    }
}

#[derive(Clone)]
pub struct ResolvedPolicy {
    pub name: String,
    pub handler: Arc<dyn Policy>,
    pub config: Value,
}

/// Turns policy references into handlers, in the order given
pub trait PolicyResolver: Send + Sync {
    fn resolve(&self, refs: &[PolicyRef]) -> Result<Vec<ResolvedPolicy>, ResolverError>;
}

/// Policies registered by name
#[derive(Default, Clone)]
pub struct PolicyRegistry {
    policies: HashMap<String, Arc<dyn Policy>>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: impl Into<String>, policy: impl Policy + 'static) -> Self {
        self.policies.insert(name.into(), Arc::new(policy));
        self
    }
}

impl PolicyResolver for PolicyRegistry {
    fn resolve(&self, refs: &[PolicyRef]) -> Result<Vec<ResolvedPolicy>, ResolverError> {
        refs.iter()
            .map(|policy_ref| {
                let handler = self.policies.get(&policy_ref.name).ok_or_else(|| {
                    ResolverError::application(
                        "ApplicationError",
                        format!("Unknown policy '{}'", policy_ref.name),
                    )
                })?;
                Ok(ResolvedPolicy {
                    name: policy_ref.name.clone(),
                    handler: handler.clone(),
                    config: policy_ref.config.clone(),
                })
            })
            .collect()
    }
}
