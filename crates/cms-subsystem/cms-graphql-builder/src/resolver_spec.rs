// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use cms_model::config::CrudAction;

/// `Type.field` path identifying a field of a generated object type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    pub type_name: String,
    pub field_name: String,
}

impl FieldPath {
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field_name)
    }
}

/// How a generated field obtains its value. Fields without a spec read the property of the
/// same name from their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverSpec {
    /// A root query or mutation
    Operation { uid: String, action: OperationAction },
    /// `pageInfo` of an entity response collection
    PageInfo,
    /// A relation, media or component attribute loaded through the entity service
    Association {
        source_uid: String,
        attribute: String,
        /// List fields expose `nodes` of the loaded collection directly
        unwrap_nodes: bool,
    },
    DynamicZone { source_uid: String, attribute: String },
    /// A dynamic zone without components
    EmptyDynamicZone,
    /// Stored enumeration values mapped to their GraphQL names
    Enumeration { values: Vec<(String, String)> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationAction {
    FindMany,
    FindConnection,
    FindOne,
    /// The document of a single type
    FindSingle,
    Create,
    Update,
    Delete,
}

impl OperationAction {
    pub fn crud_action(&self) -> CrudAction {
        match self {
            OperationAction::FindMany
            | OperationAction::FindConnection
            | OperationAction::FindSingle => CrudAction::Find,
            OperationAction::FindOne => CrudAction::FindOne,
            OperationAction::Create => CrudAction::Create,
            OperationAction::Update => CrudAction::Update,
            OperationAction::Delete => CrudAction::Delete,
        }
    }
}

/// Authorization scope `<uid>.<action>` (such as `api::article.article.find`)
pub fn auth_scope(uid: &str, action: CrudAction) -> String {
    format!("{uid}.{}", action.scope_name())
}
