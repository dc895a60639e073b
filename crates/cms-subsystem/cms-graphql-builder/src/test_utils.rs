// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use cms_model::{catalog::ContentTypeCatalog, config::SchemaConfig};

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
