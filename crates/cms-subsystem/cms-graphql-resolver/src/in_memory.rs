// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! An entity service keeping documents in memory.
//!
//! Documents are stored as JSON, per content type, in insertion order. Relations and media
//! hold document ids (a string or a list of strings), components and dynamic zones are stored
//! inline, and polymorphic relations hold `{"__type": <uid>, "documentId": <id>}` references.
//! With draft and publish, a document is published when its `publishedAt` is set; a query for
//! drafts sees every document.

use std::{
    cmp::Ordering,
    sync::{
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicU64, Ordering as AtomicOrdering},
    },
};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use cms_model::{
    catalog::ContentTypeCatalog,
    content_type::{AttributeType, Cardinality, ContentTypeSchema, RelationTarget},
};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::{
    entity_service::{EntityQuery, EntityService, PublicationStatus},
    error::ResolverError,
};

const DOCUMENT_ID: &str = "documentId";
const PUBLISHED_AT: &str = "publishedAt";
const MORPH_TYPE_KEY: &str = "__type";
const COMPONENT_KEY: &str = "__component";

type Documents = IndexMap<String, Vec<Value>>;

pub struct InMemoryEntityService {
    catalog: Arc<ContentTypeCatalog>,
    documents: RwLock<Documents>,
    next_id: AtomicU64,
}

impl InMemoryEntityService {
    pub fn new(catalog: Arc<ContentTypeCatalog>) -> Self {
        Self {
            catalog,
            documents: RwLock::new(IndexMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Add documents of `uid` as they are, giving a document id to those without one
    pub fn with_documents(mut self, uid: &str, documents: impl IntoIterator<Item = Value>) -> Self {
        let documents: Vec<Value> = documents
            .into_iter()
            .map(|document| match document {
                Value::Object(mut map) => {
                    if !map.contains_key(DOCUMENT_ID) {
                        map.insert(DOCUMENT_ID.to_string(), Value::String(self.new_document_id()));
                    }
                    Value::Object(map)
                }
                other => other,
            })
            .collect();

        self.documents
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(uid.to_string())
            .or_default()
            .extend(documents);
        self
    }

    /// Add the documents of a seed file: an object mapping content type uids to documents
    pub fn with_seed(self, seed: Value) -> Result<Self, ResolverError> {
        let Value::Object(seed) = seed else {
            return Err(ResolverError::Validation(
                "Seed data must map content type uids to lists of documents".to_string(),
            ));
        };

        seed.into_iter().try_fold(self, |service, (uid, documents)| {
            if service.catalog.get(&uid).is_none() {
                return Err(ResolverError::Validation(format!(
                    "Seed data for unknown content type '{uid}'"
                )));
            }
            match documents {
                Value::Array(documents) => Ok(service.with_documents(&uid, documents)),
                _ => Err(ResolverError::Validation(format!(
                    "Seed data for '{uid}' must be a list"
                ))),
            }
        })
    }

    fn new_document_id(&self) -> String {
        format!("{:024x}", self.next_id.fetch_add(1, AtomicOrdering::Relaxed))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Documents>, ResolverError> {
        self.documents
            .read()
            .map_err(|_| ResolverError::delegate("Document store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Documents>, ResolverError> {
        self.documents
            .write()
            .map_err(|_| ResolverError::delegate("Document store lock poisoned"))
    }

    fn schema(&self, uid: &str) -> Result<&ContentTypeSchema, ResolverError> {
        self.catalog
            .get(uid)
            .ok_or_else(|| ResolverError::delegate(format!("Unknown content type '{uid}'")))
    }

    fn insert(
        &self,
        documents: &mut Documents,
        schema: &ContentTypeSchema,
        data: Value,
        status: Option<PublicationStatus>,
    ) -> Value {
        let now = now();
        let mut document = Map::new();
        document.insert(DOCUMENT_ID.to_string(), Value::String(self.new_document_id()));
        if let Value::Object(data) = data {
            document.extend(data);
        }
        document.insert("createdAt".to_string(), Value::String(now.clone()));
        document.insert("updatedAt".to_string(), Value::String(now.clone()));
        if schema.draft_and_publish {
            let published_at = match status {
                Some(PublicationStatus::Published) => Value::String(now),
                _ => Value::Null,
            };
            document.insert(PUBLISHED_AT.to_string(), published_at);
        }

        let mut document = Value::Object(document);
        self.assign_component_ids(&mut document, schema);

        documents
            .entry(schema.uid.clone())
            .or_default()
            .push(document.clone());
        document
    }

    /// Give an `id` to every component entry without one
    fn assign_component_ids(&self, document: &mut Value, schema: &ContentTypeSchema) {
        let Value::Object(map) = document else {
            return;
        };

        for attribute in schema.attributes.values() {
            let Some(value) = map.get_mut(&attribute.name) else {
                continue;
            };
            let entries: Vec<&mut Value> = match value {
                Value::Array(items) => items.iter_mut().collect(),
                Value::Null => vec![],
                other => vec![other],
            };

            for entry in entries {
                let component = match &attribute.typ {
                    AttributeType::Component { component, .. } => self.catalog.component(component),
                    AttributeType::DynamicZone { .. } => entry
                        .get(COMPONENT_KEY)
                        .and_then(Value::as_str)
                        .and_then(|uid| self.catalog.component(uid)),
                    _ => None,
                };
                let Some(component) = component else {
                    continue;
                };
                if let Value::Object(entry_map) = entry {
                    if !entry_map.contains_key("id") {
                        let id = self.next_id.fetch_add(1, AtomicOrdering::Relaxed);
                        entry_map.insert("id".to_string(), Value::from(id));
                    }
                }
                self.assign_component_ids(entry, component);
            }
        }
    }

    /// Position of the document to update or delete; single types have only one
    fn position(
        documents: &Documents,
        schema: &ContentTypeSchema,
        document_id: Option<&str>,
    ) -> Option<usize> {
        let documents = documents.get(&schema.uid)?;
        match document_id {
            Some(document_id) => documents
                .iter()
                .position(|document| has_document_id(document, document_id)),
            None if schema.is_single_type() && !documents.is_empty() => Some(0),
            None => None,
        }
    }
}

#[async_trait]
impl EntityService for InMemoryEntityService {
    async fn find_many(&self, uid: &str, query: &EntityQuery) -> Result<Vec<Value>, ResolverError> {
        let schema = self.schema(uid)?;
        let documents = self.read()?;
        let store = Store::new(&self.catalog, &documents);
        Ok(store.select(store.all(uid), schema, query, true))
    }

    async fn find_one(
        &self,
        uid: &str,
        document_id: &str,
        query: &EntityQuery,
    ) -> Result<Option<Value>, ResolverError> {
        let schema = self.schema(uid)?;
        let documents = self.read()?;
        let store = Store::new(&self.catalog, &documents);
        let candidates = store
            .all(uid)
            .filter(|document| has_document_id(document, document_id));
        Ok(store.select(candidates, schema, query, false).into_iter().next())
    }

    async fn find_first(
        &self,
        uid: &str,
        query: &EntityQuery,
    ) -> Result<Option<Value>, ResolverError> {
        let schema = self.schema(uid)?;
        let documents = self.read()?;
        let store = Store::new(&self.catalog, &documents);
        Ok(store
            .select(store.all(uid), schema, query, false)
            .into_iter()
            .next())
    }

    async fn create(
        &self,
        uid: &str,
        data: Value,
        query: &EntityQuery,
    ) -> Result<Value, ResolverError> {
        let schema = self.schema(uid)?;
        let mut documents = self.write()?;
        Ok(self.insert(&mut documents, schema, data, query.status))
    }

    async fn update(
        &self,
        uid: &str,
        document_id: Option<&str>,
        data: Value,
        query: &EntityQuery,
    ) -> Result<Option<Value>, ResolverError> {
        let schema = self.schema(uid)?;
        let mut documents = self.write()?;

        let Some(position) = Self::position(&documents, schema, document_id) else {
            // Updating a single type creates its document
            return Ok(schema
                .is_single_type()
                .then(|| self.insert(&mut documents, schema, data, query.status)));
        };

        let Some(Value::Object(document)) = documents
            .get_mut(uid)
            .and_then(|documents| documents.get_mut(position))
        else {
            return Ok(None);
        };

        if let Value::Object(data) = data {
            document.extend(data);
        }
        let now = now();
        document.insert("updatedAt".to_string(), Value::String(now.clone()));
        if schema.draft_and_publish && query.status == Some(PublicationStatus::Published) {
            document.insert(PUBLISHED_AT.to_string(), Value::String(now));
        }

        let mut updated = Value::Object(document.clone());
        self.assign_component_ids(&mut updated, schema);
        if let Some(stored) = documents
            .get_mut(uid)
            .and_then(|documents| documents.get_mut(position))
        {
            *stored = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn delete(
        &self,
        uid: &str,
        document_id: Option<&str>,
    ) -> Result<Option<Value>, ResolverError> {
        let schema = self.schema(uid)?;
        let mut documents = self.write()?;

        let Some(position) = Self::position(&documents, schema, document_id) else {
            return Ok(None);
        };
        Ok(documents
            .get_mut(uid)
            .map(|documents| documents.remove(position)))
    }

    async fn count(&self, uid: &str, query: &EntityQuery) -> Result<u64, ResolverError> {
        let schema = self.schema(uid)?;
        let documents = self.read()?;
        let store = Store::new(&self.catalog, &documents);
        Ok(store.select(store.all(uid), schema, query, false).len() as u64)
    }

    async fn load(
        &self,
        uid: &str,
        parent: &Value,
        attribute: &str,
        query: &EntityQuery,
    ) -> Result<Value, ResolverError> {
        let schema = self.schema(uid)?;
        let Some(attribute) = schema.attribute(attribute) else {
            return Ok(Value::Null);
        };
        let value = parent.get(&attribute.name).cloned().unwrap_or(Value::Null);

        let documents = self.read()?;
        let store = Store::new(&self.catalog, &documents);

        Ok(match &attribute.typ {
            AttributeType::Media { multiple } => {
                let target = attribute.typ.target_uid().unwrap_or_default();
                store.load_related(target, &value, *multiple, query)?
            }
            AttributeType::Relation {
                relation,
                target: RelationTarget::ContentType(target),
            } => store.load_related(
                target,
                &value,
                relation.cardinality() == Cardinality::Many,
                query,
            )?,
            AttributeType::Relation {
                relation,
                target: RelationTarget::Polymorphic(_),
            } => {
                let loaded: Vec<Value> = as_list(&value)
                    .into_iter()
                    .filter_map(|reference| store.load_reference(reference, query))
                    .collect();
                match relation.cardinality() {
                    Cardinality::Many => Value::Array(loaded),
                    Cardinality::One => loaded.into_iter().next().unwrap_or(Value::Null),
                }
            }
            AttributeType::Component {
                component,
                repeatable: true,
            } => match (self.catalog.component(component), value) {
                (Some(component), Value::Array(entries)) => {
                    Value::Array(store.select(entries.iter(), component, query, true))
                }
                (_, value) => value,
            },
            _ => value,
        })
    }
}

/// A read-only view of the documents
struct Store<'a> {
    catalog: &'a ContentTypeCatalog,
    documents: &'a Documents,
}

impl<'a> Store<'a> {
    fn new(catalog: &'a ContentTypeCatalog, documents: &'a Documents) -> Self {
        Self { catalog, documents }
    }

    fn all(&self, uid: &str) -> impl Iterator<Item = &'a Value> + use<'a> {
        self.documents
            .get(uid)
            .map(|documents| documents.as_slice())
            .unwrap_or_default()
            .iter()
    }

    fn by_id(&self, uid: &str, document_id: &str) -> Option<&'a Value> {
        self.all(uid)
            .find(|document| has_document_id(document, document_id))
    }

    /// Candidates passing the status and filters of `query`, sorted, and windowed if asked
    fn select<'v>(
        &self,
        candidates: impl Iterator<Item = &'v Value>,
        schema: &ContentTypeSchema,
        query: &EntityQuery,
        windowed: bool,
    ) -> Vec<Value> {
        let mut selected: Vec<Value> = candidates
            .filter(|document| status_matches(document, schema, query.status))
            .filter(|document| {
                query
                    .filters
                    .as_ref()
                    .is_none_or(|filters| self.matches(document, filters, schema))
            })
            .cloned()
            .collect();

        sort_documents(&mut selected, &query.sort);

        if windowed {
            let start = usize::try_from(query.start).unwrap_or(usize::MAX);
            let limit = query
                .limit
                .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
                .unwrap_or(usize::MAX);
            selected.into_iter().skip(start).take(limit).collect()
        } else {
            selected
        }
    }

    fn load_related(
        &self,
        target: &str,
        ids: &Value,
        many: bool,
        query: &EntityQuery,
    ) -> Result<Value, ResolverError> {
        let schema = self
            .catalog
            .get(target)
            .ok_or_else(|| ResolverError::delegate(format!("Unknown content type '{target}'")))?;

        let related = document_ids(ids)
            .into_iter()
            .filter_map(|document_id| self.by_id(target, &document_id));

        let selected = self.select(related, schema, query, many);
        Ok(if many {
            Value::Array(selected)
        } else {
            selected.into_iter().next().unwrap_or(Value::Null)
        })
    }

    /// The document a polymorphic reference points to, tagged with its type
    fn load_reference(&self, reference: &Value, query: &EntityQuery) -> Option<Value> {
        let uid = reference.get(MORPH_TYPE_KEY)?.as_str()?;
        let Some(document_id) = reference.get(DOCUMENT_ID).and_then(Value::as_str) else {
            // Inline values (components) are their own documents
            return Some(reference.clone());
        };

        let schema = self.catalog.get(uid)?;
        let document = self
            .by_id(uid, document_id)
            .filter(|document| status_matches(document, schema, query.status))?;

        let mut document = document.clone();
        if let Value::Object(map) = &mut document {
            map.insert(MORPH_TYPE_KEY.to_string(), Value::String(uid.to_string()));
        }
        Some(document)
    }

    fn matches(&self, document: &Value, filter: &Value, schema: &ContentTypeSchema) -> bool {
        match filter {
            Value::Array(filters) => filters
                .iter()
                .all(|filter| self.matches(document, filter, schema)),
            Value::Object(conditions) => {
                conditions
                    .iter()
                    .all(|(key, condition)| match key.as_str() {
                        "$and" => as_list(condition)
                            .into_iter()
                            .all(|filter| self.matches(document, filter, schema)),
                        "$or" => as_list(condition)
                            .into_iter()
                            .any(|filter| self.matches(document, filter, schema)),
                        "$not" => !self.matches(document, condition, schema),
                        _ => match schema.attribute(key) {
                            Some(attribute) => {
                                self.attribute_matches(document.get(key), &attribute.typ, condition)
                            }
                            None => true,
                        },
                    })
            }
            _ => true,
        }
    }

    fn attribute_matches(&self, value: Option<&Value>, typ: &AttributeType, condition: &Value) -> bool {
        match typ {
            AttributeType::Scalar(_) | AttributeType::Enumeration(_) => {
                operators_match(value.unwrap_or(&Value::Null), condition)
            }
            AttributeType::Component { component, .. } => {
                let Some(component) = self.catalog.component(component) else {
                    return false;
                };
                value
                    .map(as_list)
                    .unwrap_or_default()
                    .into_iter()
                    .any(|entry| self.matches(entry, condition, component))
            }
            AttributeType::Media { .. }
            | AttributeType::Relation {
                target: RelationTarget::ContentType(_),
                ..
            } => {
                let Some(target) = typ.target_uid().and_then(|uid| self.catalog.get(uid)) else {
                    return false;
                };
                value
                    .map(document_ids)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|document_id| self.by_id(&target.uid, &document_id))
                    .any(|related| self.matches(related, condition, target))
            }
            _ => true,
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn has_document_id(document: &Value, document_id: &str) -> bool {
    document.get(DOCUMENT_ID).and_then(Value::as_str) == Some(document_id)
}

fn status_matches(
    document: &Value,
    schema: &ContentTypeSchema,
    status: Option<PublicationStatus>,
) -> bool {
    if !schema.draft_and_publish {
        return true;
    }
    match status {
        Some(PublicationStatus::Published) => document
            .get(PUBLISHED_AT)
            .is_some_and(|published_at| !published_at.is_null()),
        Some(PublicationStatus::Draft) | None => true,
    }
}

fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => vec![],
        other => vec![other],
    }
}

fn document_ids(value: &Value) -> Vec<String> {
    as_list(value)
        .into_iter()
        .filter_map(|id| match id {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            Value::Object(reference) => reference
                .get(DOCUMENT_ID)
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect()
}

fn operators_match(value: &Value, condition: &Value) -> bool {
    match condition {
        Value::Object(operators) => operators
            .iter()
            .all(|(operator, operand)| operator_matches(value, operator, operand)),
        operand => equals(value, operand),
    }
}

fn operator_matches(value: &Value, operator: &str, operand: &Value) -> bool {
    let ordered = |accept: fn(Ordering) -> bool| compare(value, operand).is_some_and(accept);
    let text_match = |lowercase: bool, test: fn(&str, &str) -> bool| match (text(value), text(operand)) {
        (Some(value), Some(operand)) if lowercase => {
            test(&value.to_lowercase(), &operand.to_lowercase())
        }
        (Some(value), Some(operand)) => test(&value, &operand),
        _ => false,
    };

    match operator {
        "$eq" => equals(value, operand),
        "$ne" => !equals(value, operand),
        "$eqi" => text_match(true, |a, b| a == b),
        "$nei" => !text_match(true, |a, b| a == b),
        "$lt" => ordered(Ordering::is_lt),
        "$lte" => ordered(Ordering::is_le),
        "$gt" => ordered(Ordering::is_gt),
        "$gte" => ordered(Ordering::is_ge),
        "$in" => as_list(operand).into_iter().any(|item| equals(value, item)),
        "$notIn" => !as_list(operand).into_iter().any(|item| equals(value, item)),
        "$contains" => text_match(false, |a, b| a.contains(b)),
        "$notContains" => !text_match(false, |a, b| a.contains(b)),
        "$containsi" => text_match(true, |a, b| a.contains(b)),
        "$notContainsi" => !text_match(true, |a, b| a.contains(b)),
        "$startsWith" => text_match(false, |a, b| a.starts_with(b)),
        "$endsWith" => text_match(false, |a, b| a.ends_with(b)),
        "$null" => value.is_null() == operand.as_bool().unwrap_or(true),
        "$notNull" => value.is_null() != operand.as_bool().unwrap_or(true),
        "$between" => match as_list(operand).as_slice() {
            [low, high] => {
                compare(value, low).is_some_and(Ordering::is_ge)
                    && compare(value, high).is_some_and(Ordering::is_le)
            }
            _ => false,
        },
        "$and" => as_list(operand)
            .into_iter()
            .all(|condition| operators_match(value, condition)),
        "$or" => as_list(operand)
            .into_iter()
            .any(|condition| operators_match(value, condition)),
        "$not" => !operators_match(value, operand),
        _ => true,
    }
}

fn equals(value: &Value, operand: &Value) -> bool {
    match (value, operand) {
        (Value::Number(_), Value::Number(_)) => compare(value, operand) == Some(Ordering::Equal),
        _ => value == operand,
    }
}

fn compare(value: &Value, operand: &Value) -> Option<Ordering> {
    match (value, operand) {
        (Value::Number(value), Value::Number(operand)) => {
            value.as_f64()?.partial_cmp(&operand.as_f64()?)
        }
        (Value::String(value), Value::String(operand)) => Some(value.cmp(operand)),
        (Value::Bool(value), Value::Bool(operand)) => Some(value.cmp(operand)),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn path_value<'v>(document: &'v Value, path: &str) -> &'v Value {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
        .unwrap_or(&Value::Null)
}

/// Sort by keys such as `title` or `views:desc`, nulls first
fn sort_documents(documents: &mut [Value], sort: &[String]) {
    if sort.is_empty() {
        return;
    }

    documents.sort_by(|a, b| {
        for key in sort {
            let (path, direction) = key.split_once(':').unwrap_or((key.as_str(), "asc"));
            let (a, b) = (path_value(a, path), path_value(b, path));
            let ordering = match (a.is_null(), b.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => compare(a, b).unwrap_or(Ordering::Equal),
            };
            let ordering = if direction.eq_ignore_ascii_case("desc") {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_service;
    use serde_json::json;

    fn titles(documents: &[Value]) -> Vec<&str> {
        documents
            .iter()
            .filter_map(|document| document.get("title").and_then(Value::as_str))
            .collect()
    }

    #[tokio::test]
    async fn filters_sort_and_window() {
        let service = sample_service();

        let query = EntityQuery {
            filters: Some(json!({
                "$or": [{ "views": { "$gt": 100 } }, { "title": { "$containsi": "RUST" } }]
            })),
            sort: vec!["views:desc".to_string()],
            ..EntityQuery::default()
        };
        let found = service.find_many("api::article.article", &query).await.unwrap();
        assert_eq!(vec!["Hello world", "Rust in production"], titles(&found));

        let windowed = EntityQuery {
            sort: vec!["title".to_string()],
            start: 1,
            limit: Some(1),
            ..EntityQuery::default()
        };
        let found = service
            .find_many("api::article.article", &windowed)
            .await
            .unwrap();
        assert_eq!(vec!["Rust in production"], titles(&found));
    }

    #[tokio::test]
    async fn nested_relation_filters() {
        let service = sample_service();

        let query = EntityQuery {
            filters: Some(json!({ "category": { "name": { "$eq": "Tech" } } })),
            ..EntityQuery::default()
        };
        let found = service.find_many("api::article.article", &query).await.unwrap();

        assert_eq!(vec!["Rust in production"], titles(&found));
    }

    #[tokio::test]
    async fn published_documents_only() {
        let service = sample_service();

        let published = EntityQuery::with_status(Some(PublicationStatus::Published));
        assert_eq!(
            2,
            service
                .count("api::article.article", &published)
                .await
                .unwrap()
        );

        let drafts = EntityQuery::with_status(Some(PublicationStatus::Draft));
        assert_eq!(
            3,
            service.count("api::article.article", &drafts).await.unwrap()
        );
    }

    #[tokio::test]
    async fn loads_associations() {
        let service = sample_service();
        let published = EntityQuery::with_status(Some(PublicationStatus::Published));
        let article = service
            .find_one("api::article.article", "hello", &published)
            .await
            .unwrap()
            .unwrap();

        let category = service
            .load("api::article.article", &article, "category", &published)
            .await
            .unwrap();
        assert_eq!(Some(&json!("News")), category.get("name"));

        let highlights = service
            .load("api::article.article", &article, "highlights", &published)
            .await
            .unwrap();
        assert_eq!(
            vec![
                json!("api::category.category"),
                json!("api::article.article")
            ],
            highlights
                .as_array()
                .unwrap()
                .iter()
                .map(|highlight| highlight["__type"].clone())
                .collect::<Vec<_>>()
        );

        let category_articles = service
            .load(
                "api::category.category",
                &json!({ "articles": ["hello", "draft"] }),
                "articles",
                &published,
            )
            .await
            .unwrap();
        assert_eq!(
            vec!["Hello world"],
            titles(category_articles.as_array().unwrap())
        );
    }

    #[tokio::test]
    async fn create_update_delete() {
        let service = sample_service();
        let draft = EntityQuery::with_status(Some(PublicationStatus::Draft));

        let created = service
            .create(
                "api::article.article",
                json!({ "title": "New", "seo": { "metaTitle": "New" } }),
                &draft,
            )
            .await
            .unwrap();
        let document_id = created["documentId"].as_str().unwrap().to_string();
        assert_eq!(Value::Null, created["publishedAt"]);
        assert!(created["seo"]["id"].is_u64());

        let published = EntityQuery::with_status(Some(PublicationStatus::Published));
        let updated = service
            .update(
                "api::article.article",
                Some(&document_id),
                json!({ "views": 1 }),
                &published,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(json!("New"), updated["title"]);
        assert_eq!(json!(1), updated["views"]);
        assert!(updated["publishedAt"].is_string());

        let deleted = service
            .delete("api::article.article", Some(&document_id))
            .await
            .unwrap();
        assert!(deleted.is_some());
        assert!(
            service
                .delete("api::article.article", Some(&document_id))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn single_types_have_one_document() {
        let service = sample_service();
        let query = EntityQuery::default();

        let updated = service
            .update(
                "api::homepage.homepage",
                None,
                json!({ "headline": "Hello again" }),
                &query,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(json!("home"), updated["documentId"]);
        assert_eq!(
            1,
            service.count("api::homepage.homepage", &query).await.unwrap()
        );
    }
}
