// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

/// Fatal errors while building the schema. A build that returns one of these publishes nothing.
#[derive(Error, Debug)]
pub enum ModelBuildingError {
    #[error("'{0}' is already registered")]
    DuplicateName(String),

    #[error("Unknown component '{component}' referenced by '{uid}.{attribute}'")]
    UnknownComponent {
        uid: String,
        attribute: String,
        component: String,
    },

    #[error("Unknown content type '{target}' referenced by '{uid}.{attribute}'")]
    UnknownContentType {
        uid: String,
        attribute: String,
        target: String,
    },

    #[error("No GraphQL scalar for type '{primitive_type}' of '{uid}.{attribute}'")]
    MissingScalarMapping {
        uid: String,
        attribute: String,
        primitive_type: String,
    },

    #[error("Invalid attribute '{uid}.{attribute}': {message}")]
    InvalidAttribute {
        uid: String,
        attribute: String,
        message: String,
    },

    #[error("Could not assemble the executable schema: {0}")]
    Schema(String),

    #[error("{0}")]
    Generic(String),
}
