// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolution of the operations of a built content schema.
//!
//! [`CompiledSchema`] turns the output of `cms-graphql-builder` into an executable
//! `async_graphql` schema. Root fields run through a chain of authorization, policies and
//! middlewares before reaching the entity service; nested fields load their associations
//! through the same service.

pub mod artifacts;
pub mod auth;
pub mod chain;
pub mod compiled_schema;
pub mod entity_service;
pub mod error;
pub mod filters;
pub mod in_memory;
pub mod input_transform;
pub mod operation_payload;
pub mod pagination;
pub mod policy;
pub mod query_args;
pub mod request_context;
pub mod resolved;
pub mod sanitizer;
pub mod services;

mod association_resolver;
mod operation_resolver;
mod property_resolver;

pub use chain::{AuthRequirement, ResolverConfig, ResolversConfig};
pub use compiled_schema::CompiledSchema;
pub use error::ResolverError;
pub use in_memory::InMemoryEntityService;
pub use operation_payload::OperationsPayload;
pub use request_context::AuthContext;
pub use services::Services;

#[cfg(test)]
mod test_utils;
