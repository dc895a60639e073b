// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::ArgMatches;
use cms_graphql_builder::BuiltSchema;
use cms_graphql_resolver::{CompiledSchema, InMemoryEntityService, ResolversConfig, Services};
use cms_model::{catalog::ContentTypeCatalog, config::SchemaConfig};
use tracing::debug;

use super::command::{get, get_required};

pub(crate) fn load_catalog(matches: &ArgMatches) -> Result<Arc<ContentTypeCatalog>> {
    let path: PathBuf = get_required(matches, "catalog")?;
    let catalog = ContentTypeCatalog::load(&path)
        .with_context(|| format!("Could not load the catalog at {}", path.display()))?;
    debug!("Loaded {} schemas from {}", catalog.all().count(), path.display());
    Ok(Arc::new(catalog))
}

pub(crate) fn load_config(matches: &ArgMatches) -> Result<Arc<SchemaConfig>> {
    let config = match get::<PathBuf>(matches, "config") {
        Some(path) => SchemaConfig::load(&path)
            .with_context(|| format!("Could not load the configuration at {}", path.display()))?,
        None => SchemaConfig::default(),
    };
    Ok(Arc::new(config))
}

pub(crate) fn build_schema(
    catalog: &ContentTypeCatalog,
    config: &SchemaConfig,
) -> Result<BuiltSchema> {
    cms_graphql_builder::build(catalog, config).context("Could not build the GraphQL schema")
}

/// Assemble `built` over an in-memory store holding `seed`
pub(crate) fn compile_schema(
    built: BuiltSchema,
    catalog: Arc<ContentTypeCatalog>,
    config: Arc<SchemaConfig>,
    seed: Option<serde_json::Value>,
) -> Result<CompiledSchema> {
    let mut entity_service = InMemoryEntityService::new(catalog.clone());
    if let Some(seed) = seed {
        entity_service = entity_service
            .with_seed(seed)
            .context("Could not load the seed documents")?;
    }
    let services = Services::new(Arc::new(entity_service), catalog.clone());

    CompiledSchema::assemble(built, catalog, config, services, &ResolversConfig::new())
        .context("Could not assemble the GraphQL schema")
}

/// Write `content` to the `output` argument if given, or to stdout
pub(crate) fn write_output(matches: &ArgMatches, content: &str) -> Result<()> {
    match get::<PathBuf>(matches, "output") {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)
                .with_context(|| format!("Could not write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::command::{catalog_arg, config_arg, output_arg};
    use clap::Command;

    fn matches(args: &[&str]) -> ArgMatches {
        Command::new("test")
            .arg(catalog_arg())
            .arg(config_arg())
            .arg(output_arg())
            .get_matches_from(std::iter::once("test").chain(args.iter().copied()))
    }

    #[test]
    fn missing_config_means_defaults() {
        let config = load_config(&matches(&[])).unwrap();
        assert_eq!("/graphql", config.endpoint);
        assert!(config.shadow_crud);
    }

    #[test]
    fn loads_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graphql.toml");
        fs::write(&path, "endpoint = \"/api/graphql\"\nmax_limit = 50\n").unwrap();

        let config = load_config(&matches(&["--config", path.to_str().unwrap()])).unwrap();
        assert_eq!("/api/graphql", config.endpoint);
        assert_eq!(50, config.max_limit);
    }

    #[test]
    fn reports_missing_catalogs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nowhere.json");

        let error = load_catalog(&matches(&["--catalog", path.to_str().unwrap()])).unwrap_err();
        assert!(error.to_string().starts_with("Could not load the catalog at"));
    }

    #[test]
    fn writes_output_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generated").join("schema.graphql");

        write_output(&matches(&["-o", path.to_str().unwrap()]), "type Query").unwrap();
        assert_eq!("type Query", fs::read_to_string(&path).unwrap());
    }
}
