// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_trait::async_trait;
use cms_graphql_builder::{
    args::{DATA_ARG, DOCUMENT_ID_ARG},
    resolver_spec::OperationAction,
};
use cms_model::content_type::ContentTypeSchema;
use serde_json::{Value, json};

use crate::{
    chain::{FieldResolver, Invocation},
    entity_service::PublicationStatus,
    error::ResolverError,
    input_transform::InputTransformer,
    pagination::{Window, page_info},
    resolved::{CollectionSource, Node, Resolved},
    services::Runtime,
};

/// Resolver of a root query or mutation
pub(crate) struct OperationResolver {
    uid: String,
    action: OperationAction,
    runtime: Arc<Runtime>,
}

impl OperationResolver {
    pub fn new(uid: String, action: OperationAction, runtime: Arc<Runtime>) -> Self {
        Self {
            uid,
            action,
            runtime,
        }
    }

    fn document_id<'a>(&self, invocation: &'a Invocation<'_>) -> Result<&'a str, ResolverError> {
        invocation
            .args
            .get(DOCUMENT_ID_ARG)
            .and_then(Value::as_str)
            .ok_or_else(|| ResolverError::Validation(format!("Missing '{DOCUMENT_ID_ARG}'")))
    }

    /// The document id argument, which single types do not take
    fn optional_document_id<'a>(
        &self,
        schema: &ContentTypeSchema,
        invocation: &'a Invocation<'_>,
    ) -> Result<Option<&'a str>, ResolverError> {
        if schema.is_single_type() {
            Ok(None)
        } else {
            self.document_id(invocation).map(Some)
        }
    }

    fn mutation_data(
        &self,
        schema: &ContentTypeSchema,
        invocation: &Invocation<'_>,
    ) -> Result<Value, ResolverError> {
        let data = invocation
            .args
            .get(DATA_ARG)
            .cloned()
            .ok_or_else(|| ResolverError::Validation(format!("Missing '{DATA_ARG}'")))?;

        let data = InputTransformer::new(&self.runtime.catalog).transform(data, schema)?;
        self.runtime
            .services
            .sanitizer
            .sanitize_input(data, schema, &invocation.request.auth)
    }

    fn output(
        &self,
        document: Value,
        schema: &ContentTypeSchema,
        invocation: &Invocation<'_>,
    ) -> Result<Value, ResolverError> {
        self.runtime
            .services
            .sanitizer
            .sanitize_output(document, schema, &invocation.request.auth)
    }

    fn entity_response(
        &self,
        document: Value,
        schema: &ContentTypeSchema,
        invocation: &Invocation<'_>,
        status: Option<PublicationStatus>,
    ) -> Result<Resolved, ResolverError> {
        let document = self.output(document, schema, invocation)?;
        Ok(Resolved::Node(Node::new(json!({ "data": document }), status)))
    }
}

#[async_trait]
impl FieldResolver for OperationResolver {
    async fn resolve(&self, invocation: &Invocation<'_>) -> Result<Resolved, ResolverError> {
        let runtime = &self.runtime;
        let schema = runtime.schema(&self.uid)?;
        let service = &runtime.services.entity_service;
        let sanitizer = &runtime.services.sanitizer;
        let auth = &invocation.request.auth;
        let args = invocation.args;
        let default_status = schema
            .draft_and_publish
            .then_some(PublicationStatus::Published);

        match self.action {
            OperationAction::FindMany | OperationAction::FindConnection => {
                let query = runtime
                    .query_args()
                    .collection_query(args, schema, default_status)?;
                sanitizer.validate_query(&query, schema, auth)?;

                let documents = service
                    .find_many(&self.uid, &query)
                    .await?
                    .into_iter()
                    .map(|document| self.output(document, schema, invocation))
                    .collect::<Result<Vec<_>, _>>()?;

                if self.action == OperationAction::FindMany {
                    Ok(Resolved::nodes(documents, query.status))
                } else {
                    let status = query.status;
                    Ok(Resolved::Node(
                        Node::new(json!({ "nodes": documents }), status).with_collection(
                            CollectionSource {
                                uid: self.uid.clone(),
                                query,
                            },
                        ),
                    ))
                }
            }
            OperationAction::FindOne | OperationAction::FindSingle => {
                let query = runtime
                    .query_args()
                    .status_query(args, schema, default_status);
                sanitizer.validate_query(&query, schema, auth)?;

                let document = if self.action == OperationAction::FindOne {
                    service
                        .find_one(&self.uid, self.document_id(invocation)?, &query)
                        .await?
                } else {
                    service.find_first(&self.uid, &query).await?
                };

                match document {
                    Some(document) => Ok(Resolved::Node(Node::new(
                        self.output(document, schema, invocation)?,
                        query.status,
                    ))),
                    None => Ok(Resolved::Null),
                }
            }
            OperationAction::Create => {
                let data = self.mutation_data(schema, invocation)?;
                let query = runtime
                    .query_args()
                    .status_query(args, schema, default_status);

                let created = service.create(&self.uid, data, &query).await?;
                self.entity_response(created, schema, invocation, query.status)
            }
            OperationAction::Update => {
                let document_id = self.optional_document_id(schema, invocation)?;
                let data = self.mutation_data(schema, invocation)?;
                let query = runtime
                    .query_args()
                    .status_query(args, schema, default_status);

                let updated = service
                    .update(&self.uid, document_id, data, &query)
                    .await?
                    .ok_or_else(|| ResolverError::not_found("Document not found"))?;
                self.entity_response(updated, schema, invocation, query.status)
            }
            OperationAction::Delete => {
                let document_id = self.optional_document_id(schema, invocation)?;

                let deleted = service
                    .delete(&self.uid, document_id)
                    .await?
                    .ok_or_else(|| ResolverError::not_found("Document not found"))?;

                let document_id = deleted
                    .get("documentId")
                    .cloned()
                    .or_else(|| document_id.map(|id| Value::String(id.to_string())))
                    .unwrap_or(Value::Null);
                Ok(Resolved::Node(Node::new(
                    json!({ "documentId": document_id }),
                    None,
                )))
            }
        }
    }
}

/// Resolver of `pageInfo`, from the query of the parent collection
pub(crate) struct PageInfoResolver {
    runtime: Arc<Runtime>,
}

impl PageInfoResolver {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl FieldResolver for PageInfoResolver {
    async fn resolve(&self, invocation: &Invocation<'_>) -> Result<Resolved, ResolverError> {
        let Some(parent) = invocation.parent else {
            return Ok(Resolved::Null);
        };
        let Some(source) = &parent.collection else {
            return Err(ResolverError::delegate(format!(
                "No collection to paginate for {}",
                invocation.field
            )));
        };

        let total = self
            .runtime
            .services
            .entity_service
            .count(&source.uid, &source.query)
            .await?;
        let window = Window {
            start: source.query.start,
            limit: source.query.limit,
        };
        let info = serde_json::to_value(page_info(total, &window)).map_err(ResolverError::delegate)?;

        Ok(Resolved::Node(parent.child(info)))
    }
}
