// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A GraphQL request, as posted by clients
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OperationsPayload {
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,
    pub query: String,
    pub variables: Option<Map<String, Value>>,
}

impl OperationsPayload {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            operation_name: None,
            query: query.into(),
            variables: None,
        }
    }

    pub fn with_variables(self, variables: Map<String, Value>) -> Self {
        Self {
            variables: Some(variables),
            ..self
        }
    }

    pub fn from_json(json: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(json)
    }
}
