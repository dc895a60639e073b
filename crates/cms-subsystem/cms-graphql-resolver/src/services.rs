// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use cms_model::{catalog::ContentTypeCatalog, config::SchemaConfig, content_type::ContentTypeSchema};

use crate::{
    auth::{AuthVerifier, ScopeAuthVerifier},
    entity_service::EntityService,
    error::ResolverError,
    policy::{PolicyRegistry, PolicyResolver},
    query_args::QueryArgs,
    sanitizer::{PrivateFieldSanitizer, Sanitizer},
};

/// Collaborators the resolvers delegate to
#[derive(Clone)]
pub struct Services {
    pub entity_service: Arc<dyn EntityService>,
    pub auth_verifier: Arc<dyn AuthVerifier>,
    pub policy_resolver: Arc<dyn PolicyResolver>,
    pub sanitizer: Arc<dyn Sanitizer>,
}

impl Services {
    /// Services with the default verifier, policy registry (empty) and sanitizer
    pub fn new(entity_service: Arc<dyn EntityService>, catalog: Arc<ContentTypeCatalog>) -> Self {
        Self {
            entity_service,
            auth_verifier: Arc::new(ScopeAuthVerifier),
            policy_resolver: Arc::new(PolicyRegistry::new()),
            sanitizer: Arc::new(PrivateFieldSanitizer::new(catalog)),
        }
    }

    pub fn with_auth_verifier(self, auth_verifier: Arc<dyn AuthVerifier>) -> Self {
        Self {
            auth_verifier,
            ..self
        }
    }

    pub fn with_policy_resolver(self, policy_resolver: Arc<dyn PolicyResolver>) -> Self {
        Self {
            policy_resolver,
            ..self
        }
    }

    pub fn with_sanitizer(self, sanitizer: Arc<dyn Sanitizer>) -> Self {
        Self { sanitizer, ..self }
    }
}

/// Everything a resolver needs at request time, shared by every field of a schema
pub(crate) struct Runtime {
    pub catalog: Arc<ContentTypeCatalog>,
    pub config: Arc<SchemaConfig>,
    pub services: Services,
}

impl Runtime {
    pub fn schema(&self, uid: &str) -> Result<&ContentTypeSchema, ResolverError> {
        self.catalog
            .get(uid)
            .ok_or_else(|| ResolverError::delegate(format!("Unknown content type '{uid}'")))
    }

    pub fn query_args(&self) -> QueryArgs<'_> {
        QueryArgs::new(&self.catalog, &self.config)
    }
}
