// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::primitive_type::PrimitiveType;

/// Uid of the content type backing media attributes
pub const MEDIA_UID: &str = "plugin::upload.file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    ContentType,
    Component,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Collection,
    Single,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeInfo {
    pub singular_name: String,
    pub plural_name: String,
    pub display_name: Option<String>,
}

/// A content type or a component, as declared by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeSchema {
    pub uid: String,
    pub model_type: ModelType,
    /// Always `Collection` for components
    pub kind: ContentKind,
    /// Set only for components (`shared` in `shared.seo`)
    pub category: Option<String>,
    pub info: ContentTypeInfo,
    pub draft_and_publish: bool,
    pub attributes: IndexMap<String, Attribute>,
}

impl ContentTypeSchema {
    pub fn is_component(&self) -> bool {
        self.model_type == ModelType::Component
    }

    pub fn is_single_type(&self) -> bool {
        self.model_type == ModelType::ContentType && self.kind == ContentKind::Single
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Attributes exposed through the API (the storage layer still sees private ones)
    pub fn public_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values().filter(|attribute| !attribute.private)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub typ: AttributeType,
    pub private: bool,
    pub required: bool,
    /// System-maintained attributes (timestamps, ids) are not writable
    pub writable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeType {
    Scalar(PrimitiveType),
    Enumeration(Vec<String>),
    Media {
        multiple: bool,
    },
    Component {
        component: String,
        repeatable: bool,
    },
    DynamicZone {
        components: Vec<String>,
    },
    Relation {
        relation: RelationKind,
        target: RelationTarget,
    },
}

impl AttributeType {
    /// Uid of the type this attribute points to, if it points to exactly one.
    pub fn target_uid(&self) -> Option<&str> {
        match self {
            AttributeType::Media { .. } => Some(MEDIA_UID),
            AttributeType::Component { component, .. } => Some(component),
            AttributeType::Relation {
                target: RelationTarget::ContentType(uid),
                ..
            } => Some(uid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    MorphToOne,
    MorphToMany,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

impl RelationKind {
    pub fn from_catalog_name(name: &str) -> Option<RelationKind> {
        Some(match name {
            "oneToOne" => RelationKind::OneToOne,
            "oneToMany" => RelationKind::OneToMany,
            "manyToOne" => RelationKind::ManyToOne,
            "manyToMany" => RelationKind::ManyToMany,
            "morphToOne" => RelationKind::MorphToOne,
            "morphToMany" => RelationKind::MorphToMany,
            _ => return None,
        })
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            RelationKind::OneToOne | RelationKind::ManyToOne | RelationKind::MorphToOne => {
                Cardinality::One
            }
            RelationKind::OneToMany | RelationKind::ManyToMany | RelationKind::MorphToMany => {
                Cardinality::Many
            }
        }
    }

    pub fn is_morph(&self) -> bool {
        matches!(self, RelationKind::MorphToOne | RelationKind::MorphToMany)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationTarget {
    ContentType(String),
    /// Polymorphic relation. `None` means "any content type or component".
    Polymorphic(Option<Vec<String>>),
}
