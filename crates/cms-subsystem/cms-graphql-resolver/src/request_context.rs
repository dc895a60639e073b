// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;

/// Who is making a request, as established by the transport
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub credentials: Option<Credentials>,
}

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub subject: Option<String>,
    /// Scopes granted to the requester (`api::article.article.find`, ...)
    pub scopes: HashSet<String>,
}

impl AuthContext {
    /// A requester with no credentials at all
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_scopes<S: Into<String>>(scopes: impl IntoIterator<Item = S>) -> Self {
        Self {
            credentials: Some(Credentials {
                subject: None,
                scopes: scopes.into_iter().map(Into::into).collect(),
            }),
        }
    }

    pub fn subject(self, subject: impl Into<String>) -> Self {
        Self {
            credentials: self.credentials.map(|credentials| Credentials {
                subject: Some(subject.into()),
                ..credentials
            }),
        }
    }
}

/// State scoped to one request, attached to the execution as request data.
///
/// Resolvers only read it, so concurrent sibling fields need no coordination.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub auth: AuthContext,
}

impl RequestContext {
    pub fn new(auth: AuthContext) -> Self {
        Self { auth }
    }
}
