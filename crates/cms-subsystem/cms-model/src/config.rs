// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Build-time configuration.
//!
//! Loaded from TOML (typically `cms-graphql.toml`). Every key is optional. A key present in
//! the file replaces the default, an absent key keeps it; nested tables are not merged with
//! anything.
//!
//! ```toml
//! endpoint = "/graphql"
//! shadow_crud = true
//! depth_limit = 10      # 0 disables the depth check
//! default_limit = 10
//! max_limit = 100       # -1 for no maximum
//! landing_page = false
//!
//! [artifacts]
//! generate = true
//! schema = "schema.graphql"
//! typegen = "types.d.ts"
//!
//! [types."api::tag.tag"]
//! mutations = false
//! disabled_actions = ["delete"]
//!
//! [types."api::article.article".fields.internalNotes]
//! output = false
//! ```

use std::{collections::HashMap, path::Path, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub const DEFAULT_ENDPOINT: &str = "/graphql";
pub const DEFAULT_DEPTH_LIMIT: usize = 10;
pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_SCHEMA_ARTIFACT: &str = "schema.graphql";
pub const DEFAULT_TYPEGEN_ARTIFACT: &str = "types.d.ts";

#[derive(Debug, Clone)]
pub struct SchemaConfig {
    pub endpoint: String,
    /// When false, no content type gets generated types or operations
    pub shadow_crud: bool,
    pub depth_limit: Option<usize>,
    pub default_limit: i64,
    /// `-1` means no maximum
    pub max_limit: i64,
    pub landing_page: LandingPage,
    pub artifacts: ArtifactsConfig,
    pub shadow_crud_extension: ShadowCrud,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            shadow_crud: true,
            depth_limit: Some(DEFAULT_DEPTH_LIMIT),
            default_limit: DEFAULT_LIMIT,
            max_limit: -1,
            landing_page: LandingPage::Default,
            artifacts: ArtifactsConfig::default(),
            shadow_crud_extension: ShadowCrud::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum LandingPage {
    Enabled,
    Disabled,
    /// Decided by a function of whether we run in production
    Custom(fn(bool) -> bool),
    /// Enabled outside production
    Default,
}

impl LandingPage {
    pub fn is_enabled(&self, production: bool) -> bool {
        match self {
            LandingPage::Enabled => true,
            LandingPage::Disabled => false,
            LandingPage::Custom(decide) => decide(production),
            LandingPage::Default => !production,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactsConfig {
    pub generate: bool,
    pub schema: Option<PathBuf>,
    pub typegen: Option<PathBuf>,
}

impl ArtifactsConfig {
    pub fn schema_path(&self) -> PathBuf {
        self.schema
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_ARTIFACT))
    }

    pub fn typegen_path(&self) -> PathBuf {
        self.typegen
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TYPEGEN_ARTIFACT))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CrudAction {
    Find,
    FindOne,
    Create,
    Update,
    Delete,
}

impl CrudAction {
    /// Name used in auth scopes (`api::article.article.findOne`)
    pub fn scope_name(&self) -> &'static str {
        match self {
            CrudAction::Find => "find",
            CrudAction::FindOne => "findOne",
            CrudAction::Create => "create",
            CrudAction::Update => "update",
            CrudAction::Delete => "delete",
        }
    }
}

/// Per content type and per attribute switches over the generated API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShadowCrud {
    pub types: HashMap<String, TypeOverrides>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeOverrides {
    pub enabled: bool,
    pub queries: bool,
    pub mutations: bool,
    pub disabled_actions: Vec<CrudAction>,
    pub fields: HashMap<String, FieldOverrides>,
}

impl Default for TypeOverrides {
    fn default() -> Self {
        Self {
            enabled: true,
            queries: true,
            mutations: true,
            disabled_actions: vec![],
            fields: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldOverrides {
    pub enabled: bool,
    pub output: bool,
    pub input: bool,
    pub filters: bool,
}

impl Default for FieldOverrides {
    fn default() -> Self {
        Self {
            enabled: true,
            output: true,
            input: true,
            filters: true,
        }
    }
}

impl SchemaConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: SchemaConfigSer = toml::from_str(toml_str)?;
        config.try_into()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let toml_str = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        Self::from_toml_str(&toml_str)
    }

    fn type_overrides(&self, uid: &str) -> Option<&TypeOverrides> {
        self.shadow_crud_extension.types.get(uid)
    }

    fn field_overrides(&self, uid: &str, field: &str) -> Option<&FieldOverrides> {
        self.type_overrides(uid)
            .and_then(|overrides| overrides.fields.get(field))
    }

    /// Whether the content type (or component) gets any generated types
    pub fn is_type_enabled(&self, uid: &str) -> bool {
        self.shadow_crud && self.type_overrides(uid).is_none_or(|o| o.enabled)
    }

    pub fn are_queries_enabled(&self, uid: &str) -> bool {
        self.is_type_enabled(uid) && self.type_overrides(uid).is_none_or(|o| o.queries)
    }

    pub fn are_mutations_enabled(&self, uid: &str) -> bool {
        self.is_type_enabled(uid) && self.type_overrides(uid).is_none_or(|o| o.mutations)
    }

    pub fn is_action_enabled(&self, uid: &str, action: CrudAction) -> bool {
        let group_enabled = match action {
            CrudAction::Find | CrudAction::FindOne => self.are_queries_enabled(uid),
            CrudAction::Create | CrudAction::Update | CrudAction::Delete => {
                self.are_mutations_enabled(uid)
            }
        };

        group_enabled
            && self
                .type_overrides(uid)
                .is_none_or(|o| !o.disabled_actions.contains(&action))
    }

    pub fn is_field_enabled(&self, uid: &str, field: &str) -> bool {
        self.field_overrides(uid, field).is_none_or(|o| o.enabled)
    }

    pub fn is_output_enabled(&self, uid: &str, field: &str) -> bool {
        self.is_field_enabled(uid, field) && self.field_overrides(uid, field).is_none_or(|o| o.output)
    }

    pub fn is_input_enabled(&self, uid: &str, field: &str) -> bool {
        self.is_field_enabled(uid, field) && self.field_overrides(uid, field).is_none_or(|o| o.input)
    }

    pub fn is_filter_enabled(&self, uid: &str, field: &str) -> bool {
        self.is_field_enabled(uid, field)
            && self.field_overrides(uid, field).is_none_or(|o| o.filters)
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfigSer {
    pub endpoint: Option<String>,
    pub shadow_crud: Option<bool>,
    pub depth_limit: Option<usize>,
    pub default_limit: Option<i64>,
    pub max_limit: Option<i64>,
    pub landing_page: Option<bool>,
    pub artifacts: Option<ArtifactsSer>,
    pub types: Option<HashMap<String, TypeOverridesSer>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ArtifactsSer {
    pub generate: Option<bool>,
    pub schema: Option<PathBuf>,
    pub typegen: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct TypeOverridesSer {
    pub enabled: Option<bool>,
    pub queries: Option<bool>,
    pub mutations: Option<bool>,
    pub disabled_actions: Option<Vec<CrudAction>>,
    pub fields: Option<HashMap<String, FieldOverridesSer>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FieldOverridesSer {
    pub enabled: Option<bool>,
    pub output: Option<bool>,
    pub input: Option<bool>,
    pub filters: Option<bool>,
}

impl TryFrom<SchemaConfigSer> for SchemaConfig {
    type Error = ConfigError;

    fn try_from(config: SchemaConfigSer) -> Result<Self, Self::Error> {
        let defaults = SchemaConfig::default();

        let default_limit = config.default_limit.unwrap_or(defaults.default_limit);
        if default_limit == 0 || default_limit < -1 {
            return Err(ConfigError::Invalid(format!(
                "default_limit must be positive or -1, got {default_limit}"
            )));
        }

        let max_limit = config.max_limit.unwrap_or(defaults.max_limit);
        if max_limit == 0 || max_limit < -1 {
            return Err(ConfigError::Invalid(format!(
                "max_limit must be positive or -1, got {max_limit}"
            )));
        }

        let endpoint = config.endpoint.unwrap_or(defaults.endpoint);
        if !endpoint.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "endpoint must start with '/', got '{endpoint}'"
            )));
        }

        Ok(SchemaConfig {
            endpoint,
            shadow_crud: config.shadow_crud.unwrap_or(defaults.shadow_crud),
            depth_limit: match config.depth_limit {
                Some(0) => None,
                Some(limit) => Some(limit),
                None => defaults.depth_limit,
            },
            default_limit,
            max_limit,
            landing_page: match config.landing_page {
                Some(true) => LandingPage::Enabled,
                Some(false) => LandingPage::Disabled,
                None => defaults.landing_page,
            },
            artifacts: config
                .artifacts
                .map(ArtifactsConfig::from)
                .unwrap_or(defaults.artifacts),
            shadow_crud_extension: ShadowCrud {
                types: config
                    .types
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(uid, overrides)| (uid, overrides.into()))
                    .collect(),
            },
        })
    }
}

impl From<ArtifactsSer> for ArtifactsConfig {
    fn from(artifacts: ArtifactsSer) -> Self {
        ArtifactsConfig {
            generate: artifacts.generate.unwrap_or(false),
            schema: artifacts.schema,
            typegen: artifacts.typegen,
        }
    }
}

impl From<TypeOverridesSer> for TypeOverrides {
    fn from(overrides: TypeOverridesSer) -> Self {
        let defaults = TypeOverrides::default();
        TypeOverrides {
            enabled: overrides.enabled.unwrap_or(defaults.enabled),
            queries: overrides.queries.unwrap_or(defaults.queries),
            mutations: overrides.mutations.unwrap_or(defaults.mutations),
            disabled_actions: overrides.disabled_actions.unwrap_or_default(),
            fields: overrides
                .fields
                .unwrap_or_default()
                .into_iter()
                .map(|(name, field)| (name, field.into()))
                .collect(),
        }
    }
}

impl From<FieldOverridesSer> for FieldOverrides {
    fn from(overrides: FieldOverridesSer) -> Self {
        let defaults = FieldOverrides::default();
        FieldOverrides {
            enabled: overrides.enabled.unwrap_or(defaults.enabled),
            output: overrides.output.unwrap_or(defaults.output),
            input: overrides.input.unwrap_or(defaults.input),
            filters: overrides.filters.unwrap_or(defaults.filters),
        }
    }
}
