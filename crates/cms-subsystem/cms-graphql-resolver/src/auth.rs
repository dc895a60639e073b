// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{error::ResolverError, request_context::AuthContext};

/// Checks a requester against the scopes guarding a field
pub trait AuthVerifier: Send + Sync {
    fn verify(&self, auth: &AuthContext, scopes: &[String]) -> Result<(), ResolverError>;
}

/// Grants access when the credentials hold any of the required scopes
#[derive(Debug, Default, Clone, Copy)]
pub struct ScopeAuthVerifier;

impl AuthVerifier for ScopeAuthVerifier {
    fn verify(&self, auth: &AuthContext, scopes: &[String]) -> Result<(), ResolverError> {
        let credentials = auth
            .credentials
            .as_ref()
            .ok_or_else(|| ResolverError::Unauthorized("Missing credentials".to_string()))?;

        if scopes.is_empty() || scopes.iter().any(|scope| credentials.scopes.contains(scope)) {
            Ok(())
        } else {
            Err(ResolverError::Forbidden("Forbidden access".to_string()))
        }
    }
}
