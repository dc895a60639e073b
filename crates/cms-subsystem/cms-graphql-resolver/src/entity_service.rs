// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Storage collaborator.
//!
//! Resolvers never talk to storage directly: they build an [`EntityQuery`] in backend syntax
//! (`$eq`, `$and`, ...) and hand it to an [`EntityService`].

use async_trait::async_trait;
use cms_graphql_builder::internal_types::{PUBLICATION_STATUS_DRAFT, PUBLICATION_STATUS_PUBLISHED};
use serde_json::Value;

use crate::error::ResolverError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationStatus {
    Draft,
    Published,
}

impl PublicationStatus {
    pub fn from_graphql_name(name: &str) -> Option<Self> {
        match name {
            PUBLICATION_STATUS_DRAFT => Some(PublicationStatus::Draft),
            PUBLICATION_STATUS_PUBLISHED => Some(PublicationStatus::Published),
            _ => None,
        }
    }
}

/// A query in backend syntax
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityQuery {
    /// Translated filters (`{"title": {"$eq": "a"}}`)
    pub filters: Option<Value>,
    /// `field` or `field:desc`, in priority order
    pub sort: Vec<String>,
    pub start: u64,
    /// `None` means no limit
    pub limit: Option<u64>,
    /// Only meaningful for content types with draft and publish
    pub status: Option<PublicationStatus>,
}

impl EntityQuery {
    pub fn with_status(status: Option<PublicationStatus>) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// Storage of documents, addressed by content type uid and document id
#[async_trait]
pub trait EntityService: Send + Sync {
    async fn find_many(&self, uid: &str, query: &EntityQuery) -> Result<Vec<Value>, ResolverError>;

    async fn find_one(
        &self,
        uid: &str,
        document_id: &str,
        query: &EntityQuery,
    ) -> Result<Option<Value>, ResolverError>;

    /// The first document matching `query` (the document of a single type)
    async fn find_first(&self, uid: &str, query: &EntityQuery)
    -> Result<Option<Value>, ResolverError>;

    async fn create(
        &self,
        uid: &str,
        data: Value,
        query: &EntityQuery,
    ) -> Result<Value, ResolverError>;

    /// Update a document; single types pass no document id. Returns `None` if there is no such
    /// document.
    async fn update(
        &self,
        uid: &str,
        document_id: Option<&str>,
        data: Value,
        query: &EntityQuery,
    ) -> Result<Option<Value>, ResolverError>;

    /// Delete a document, returning it
    async fn delete(
        &self,
        uid: &str,
        document_id: Option<&str>,
    ) -> Result<Option<Value>, ResolverError>;

    /// Number of documents matching the filters and status of `query` (pagination is ignored)
    async fn count(&self, uid: &str, query: &EntityQuery) -> Result<u64, ResolverError>;

    /// Load the value of an association attribute of `parent`, a document of `uid`.
    ///
    /// To-one attributes load an object or null, to-many attributes an array. Polymorphic
    /// values carry the uid of their content type in `__type`, dynamic zone entries that of
    /// their component in `__component`.
    async fn load(
        &self,
        uid: &str,
        parent: &Value,
        attribute: &str,
        query: &EntityQuery,
    ) -> Result<Value, ResolverError>;
}
