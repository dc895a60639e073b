// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql::{ErrorExtensions, Value};
use heck::ToShoutySnakeCase;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";
pub const FORBIDDEN: &str = "FORBIDDEN";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
pub const GRAPHQL_VALIDATION_FAILED: &str = "GRAPHQL_VALIDATION_FAILED";

const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// Errors raised while resolving a field
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Policy '{0}' failed")]
    Policy(String),

    /// A domain error with a name of its own (`NotFoundError`, `PaginationError`, ...)
    #[error("{name}: {message}")]
    Application {
        name: String,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error(transparent)]
    Delegate(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ResolverError {
    pub fn application(name: &str, message: impl Into<String>) -> Self {
        ResolverError::Application {
            name: name.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::application("NotFoundError", message)
    }

    pub fn pagination(message: impl Into<String>) -> Self {
        Self::application("PaginationError", message)
    }

    pub fn delegate(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ResolverError::Delegate(error.into())
    }

    pub fn name(&self) -> &str {
        match self {
            ResolverError::Validation(_) => "ValidationError",
            ResolverError::Forbidden(_) => "ForbiddenError",
            ResolverError::Unauthorized(_) => "UnauthorizedError",
            ResolverError::Policy(_) => "PolicyError",
            ResolverError::Application { name, .. } => name,
            ResolverError::Delegate(_) => "InternalServerError",
        }
    }

    pub fn code(&self) -> String {
        match self {
            ResolverError::Validation(_) => BAD_USER_INPUT.to_string(),
            ResolverError::Forbidden(_)
            | ResolverError::Unauthorized(_)
            | ResolverError::Policy(_) => FORBIDDEN.to_string(),
            ResolverError::Application { name, .. } => {
                format!("CMS_{}", name.to_shouty_snake_case())
            }
            ResolverError::Delegate(_) => INTERNAL_SERVER_ERROR.to_string(),
        }
    }

    /// Message safe to show to clients
    pub fn user_error_message(&self) -> String {
        match self {
            ResolverError::Validation(message)
            | ResolverError::Forbidden(message)
            | ResolverError::Unauthorized(message) => message.clone(),
            ResolverError::Policy(_) => "Policy Failed".to_string(),
            ResolverError::Application { message, .. } => message.clone(),
            ResolverError::Delegate(_) => INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
        }
    }

    fn details(&self) -> serde_json::Value {
        match self {
            ResolverError::Application {
                details: Some(details),
                ..
            } => details.clone(),
            _ => json!({}),
        }
    }

    /// The error as reported in the response, with `extensions.code` and, for classified
    /// errors, `extensions.error`
    pub fn into_graphql_error(self) -> async_graphql::Error {
        let code = self.code();

        if let ResolverError::Delegate(cause) = &self {
            error!("Unclassified error while resolving a field: {cause:?}");
            return async_graphql::Error::new(INTERNAL_SERVER_ERROR_MESSAGE)
                .extend_with(|_, extensions| extensions.set("code", code));
        }

        let message = self.user_error_message();
        let error = Value::from_json(json!({
            "name": self.name(),
            "message": message,
            "details": self.details(),
        }))
        .unwrap_or_default();

        async_graphql::Error::new(message).extend_with(|_, extensions| {
            extensions.set("code", code);
            extensions.set("error", error);
        })
    }
}
