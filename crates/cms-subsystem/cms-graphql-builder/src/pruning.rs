// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Removal of types that no root operation can reach.

use std::collections::HashSet;

use async_graphql_parser::types::TypeKind;

use crate::{definition::underlying_type_name, type_registry::TypeRegistry};

/// Names of the registered types reachable from `roots` through field types, argument types,
/// input field types and union members
pub fn reachable_types(registry: &TypeRegistry, roots: &[&str]) -> HashSet<String> {
    let mut reachable = HashSet::new();
    let mut pending: Vec<String> = roots
        .iter()
        .copied()
        .filter(|root| registry.has(root))
        .map(str::to_string)
        .collect();

    while let Some(name) = pending.pop() {
        if !reachable.insert(name.clone()) {
            continue;
        }
        let Some(entry) = registry.get(&name) else {
            continue;
        };

        let mut referenced: Vec<&str> = vec![];
        match &entry.definition.kind {
            TypeKind::Object(object) => {
                for field in &object.fields {
                    referenced.push(underlying_type_name(&field.node.ty.node));
                    for argument in &field.node.arguments {
                        referenced.push(underlying_type_name(&argument.node.ty.node));
                    }
                }
            }
            TypeKind::InputObject(input) => {
                for field in &input.fields {
                    referenced.push(underlying_type_name(&field.node.ty.node));
                }
            }
            TypeKind::Union(union) => {
                for member in &union.members {
                    referenced.push(member.node.as_str());
                }
            }
            TypeKind::Interface(interface) => {
                for field in &interface.fields {
                    referenced.push(underlying_type_name(&field.node.ty.node));
                }
            }
            TypeKind::Scalar | TypeKind::Enum(_) => {}
        }

        pending.extend(
            referenced
                .into_iter()
                .filter(|name| registry.has(name) && !reachable.contains(*name))
                .map(str::to_string),
        );
    }

    reachable
}
