// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The single namespace of generated types.
//!
//! Like a mapped arena, entries live in a `typed_generational_arena::Arena` and are looked up
//! through a name index. The index is an `IndexMap` so iteration follows registration order,
//! which keeps the printed schema stable across builds. Registration is append-only: there is
//! no removal, and a name can be registered only once.

use async_graphql_parser::types::TypeDefinition;
use indexmap::IndexMap;
use typed_generational_arena::{Arena, IgnoreGeneration, Index};

use crate::error::ModelBuildingError;

pub type RegistrySlab = Arena<RegistryEntry, usize, IgnoreGeneration>;
pub type RegistryIndex = Index<RegistryEntry, usize, IgnoreGeneration>;

/// What a registered type stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Scalar,
    Enum,
    ScalarFilter,
    ContentType,
    Component,
    EntityResponse,
    EntityResponseCollection,
    RelationResponseCollection,
    FiltersInput,
    Input,
    DynamicZone,
    DynamicZoneInput,
    Morph,
    /// Types every schema has (`Pagination`, `PublicationStatus`, ...)
    Internal,
    /// `Query` and `Mutation`
    Root,
}

/// Metadata stored next to a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub kind: RegistryKind,
    /// Uid of the content type (or component) the type was generated for
    pub content_type: Option<String>,
    pub attribute_name: Option<String>,
}

impl RegistryConfig {
    pub fn new(kind: RegistryKind) -> Self {
        Self {
            kind,
            content_type: None,
            attribute_name: None,
        }
    }

    pub fn for_content_type(kind: RegistryKind, uid: &str) -> Self {
        Self {
            content_type: Some(uid.to_string()),
            ..Self::new(kind)
        }
    }

    pub fn for_attribute(kind: RegistryKind, uid: &str, attribute_name: &str) -> Self {
        Self {
            attribute_name: Some(attribute_name.to_string()),
            ..Self::for_content_type(kind, uid)
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub name: String,
    pub definition: TypeDefinition,
    pub config: RegistryConfig,
}

/// Source of the configuration for entries passed to [`TypeRegistry::register_many`]: either one
/// config shared by all entries or a function of each entry.
pub trait EntryConfig {
    fn config_for(&self, name: &str, definition: &TypeDefinition) -> RegistryConfig;
}

impl EntryConfig for RegistryConfig {
    fn config_for(&self, _name: &str, _definition: &TypeDefinition) -> RegistryConfig {
        self.clone()
    }
}

impl<F> EntryConfig for F
where
    F: Fn(&str, &TypeDefinition) -> RegistryConfig,
{
    fn config_for(&self, name: &str, definition: &TypeDefinition) -> RegistryConfig {
        self(name, definition)
    }
}

#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: RegistrySlab,
    names: IndexMap<String, RegistryIndex>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under its own name. Fails if the name is taken, even by an
    /// identical definition.
    pub fn register(
        &mut self,
        definition: TypeDefinition,
        config: RegistryConfig,
    ) -> Result<RegistryIndex, ModelBuildingError> {
        let name = definition.name.node.to_string();
        if self.names.contains_key(&name) {
            return Err(ModelBuildingError::DuplicateName(name));
        }

        let index = self.entries.insert(RegistryEntry {
            name: name.clone(),
            definition,
            config,
        });
        self.names.insert(name, index);
        Ok(index)
    }

    pub fn register_many(
        &mut self,
        definitions: impl IntoIterator<Item = TypeDefinition>,
        config: impl EntryConfig,
    ) -> Result<(), ModelBuildingError> {
        for definition in definitions {
            let entry_config = config.config_for(definition.name.node.as_str(), &definition);
            self.register(definition, entry_config)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.names.get(name).map(|index| &self.entries[*index])
    }

    pub fn has(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Entries matching `predicate`, in registration order
    pub fn entries_where<'a>(
        &'a self,
        predicate: impl Fn(&RegistryEntry) -> bool + 'a,
    ) -> impl Iterator<Item = &'a RegistryEntry> + 'a {
        self.iter().filter(move |entry| predicate(entry))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.names.values().map(|index| &self.entries[*index])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// A new registry holding only the entries `keep` accepts. The original is consumed, so a
    /// registry is never edited in place.
    pub fn retained(self, keep: impl Fn(&RegistryEntry) -> bool) -> Result<Self, ModelBuildingError> {
        let TypeRegistry { mut entries, names } = self;

        let mut retained = TypeRegistry::new();
        for (_, index) in names {
            if let Some(entry) = entries.remove(index)
                && keep(&entry)
            {
                retained.register(entry.definition, entry.config)?;
            }
        }
        Ok(retained)
    }
}
