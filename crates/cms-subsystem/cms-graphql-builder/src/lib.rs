// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

pub mod args;
pub mod builder_context;
pub mod definition;
pub mod error;
pub mod internal_types;
pub mod naming;
pub mod resolver_spec;
pub mod system_builder;
pub mod type_registry;

mod dynamic_zone_builder;
mod enum_builder;
mod filter_builder;
mod input_builder;
mod morph_builder;
mod mutation_builder;
mod object_builder;
mod pruning;
mod query_builder;
mod relation_builder;
mod response_builder;

pub use error::ModelBuildingError;
pub use system_builder::{BuiltSchema, MUTATION_TYPE, QUERY_TYPE, build};

#[cfg(test)]
mod test_utils;
