// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use cms_model::{catalog::ContentTypeCatalog, config::SchemaConfig};
use serde_json::json;

use crate::in_memory::InMemoryEntityService;

const SAMPLE_CATALOG: &str = include_str!("../../test-fixtures/catalog.json");

pub fn sample_catalog() -> ContentTypeCatalog {
    ContentTypeCatalog::from_json(SAMPLE_CATALOG).unwrap()
}

/// Default settings, with `legacy` switched off and tags not deletable
pub fn sample_config() -> SchemaConfig {
    SchemaConfig::from_toml_str(
        r#"
        max_limit = 100

        [types."api::legacy.legacy"]
        enabled = false

        [types."api::tag.tag"]
        disabled_actions = ["delete"]
        "#,
    )
    .unwrap()
}

/// Three articles (two published), two categories, two tags, a file and the homepage
pub fn sample_service() -> InMemoryEntityService {
    InMemoryEntityService::new(Arc::new(sample_catalog()))
        .with_documents(
            "api::article.article",
            [
                json!({
                    "documentId": "hello",
                    "title": "Hello world",
                    "slug": "hello-world",
                    "views": 120,
                    "rating": 4.5,
                    "publishDate": "2024-03-01",
                    "state": "approved",
                    "secret": "s3cr3t",
                    "cover": "f1",
                    "gallery": ["f1"],
                    "seo": {
                        "id": 1,
                        "metaTitle": "Hello",
                        "links": [{ "id": 2, "label": "Home", "url": "/" }]
                    },
                    "blocks": [
                        { "__component": "shared.quote", "id": 3, "body": "To be", "author": "W" },
                        { "__component": "shared.rich-text", "id": 4, "body": "<p>Hi</p>" }
                    ],
                    "category": "news",
                    "tags": ["t1", "t2"],
                    "highlights": [
                        { "__type": "api::category.category", "documentId": "tech" },
                        { "__type": "api::article.article", "documentId": "rust" }
                    ],
                    "createdAt": "2024-02-28T09:00:00.000Z",
                    "updatedAt": "2024-03-01T10:00:00.000Z",
                    "publishedAt": "2024-03-01T10:00:00.000Z"
                }),
                json!({
                    "documentId": "rust",
                    "title": "Rust in production",
                    "views": 42,
                    "state": "draft-review",
                    "category": "tech",
                    "tags": ["t1"],
                    "createdAt": "2024-03-30T09:00:00.000Z",
                    "updatedAt": "2024-04-01T10:00:00.000Z",
                    "publishedAt": "2024-04-01T10:00:00.000Z"
                }),
                json!({
                    "documentId": "draft",
                    "title": "Unpublished draft",
                    "views": 3,
                    "state": "draft-review",
                    "category": "news",
                    "createdAt": "2024-04-02T09:00:00.000Z",
                    "updatedAt": "2024-04-02T09:00:00.000Z",
                    "publishedAt": null
                }),
            ],
        )
        .with_documents(
            "api::category.category",
            [
                json!({ "documentId": "news", "name": "News", "articles": ["hello", "draft"] }),
                json!({ "documentId": "tech", "name": "Tech", "articles": ["rust"] }),
            ],
        )
        .with_documents(
            "api::tag.tag",
            [
                json!({ "documentId": "t1", "label": "rust" }),
                json!({ "documentId": "t2", "label": "graphql" }),
            ],
        )
        .with_documents(
            "plugin::upload.file",
            [json!({
                "documentId": "f1",
                "name": "cover.png",
                "url": "/uploads/cover.png",
                "mime": "image/png",
                "size": 12.5
            })],
        )
        .with_documents(
            "api::homepage.homepage",
            [json!({ "documentId": "home", "headline": "Welcome", "featured": "hello" })],
        )
}
