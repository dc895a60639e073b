// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches, Command};
use cms_graphql_resolver::{AuthContext, OperationsPayload};
use serde_json::{Map, Value};

use super::{
    command::{CommandDefinition, catalog_arg, config_arg, get, output_arg},
    util::{build_schema, compile_schema, load_catalog, load_config, write_output},
};

pub(crate) struct ExecuteCommandDefinition {}

#[async_trait]
impl CommandDefinition for ExecuteCommandDefinition {
    fn command(&self) -> Command {
        Command::new("execute")
            .about("Run one GraphQL operation against documents held in memory")
            .arg(catalog_arg())
            .arg(config_arg())
            .arg(output_arg())
            .arg(
                Arg::new("query")
                    .help("The GraphQL document to run")
                    .required_unless_present("query-file")
                    .index(1),
            )
            .arg(
                Arg::new("query-file")
                    .help("Read the GraphQL document from this file")
                    .long("query-file")
                    .conflicts_with("query")
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("variables")
                    .help("Variables of the operation, as a JSON object")
                    .long("variables"),
            )
            .arg(
                Arg::new("operation-name")
                    .help("The operation to run, if the document holds more than one")
                    .long("operation-name"),
            )
            .arg(
                Arg::new("seed")
                    .help("JSON file mapping content type uids to the documents to start with")
                    .long("seed")
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("scope")
                    .help("A scope granted to the requester (repeatable)")
                    .long("scope")
                    .action(ArgAction::Append),
            )
            .arg(
                Arg::new("all-scopes")
                    .help("Grant every scope the schema checks")
                    .long("all-scopes")
                    .conflicts_with("scope")
                    .action(ArgAction::SetTrue),
            )
    }

    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let catalog = load_catalog(matches)?;
        let config = load_config(matches)?;
        let built = build_schema(&catalog, &config)?;

        let auth = if matches.get_flag("all-scopes") {
            AuthContext::with_scopes(built.auth_scopes.values().cloned())
        } else {
            match matches.get_many::<String>("scope") {
                Some(scopes) => AuthContext::with_scopes(scopes.cloned()),
                None => AuthContext::anonymous(),
            }
        };

        let seed = get::<PathBuf>(matches, "seed")
            .map(|path| read_json(&path))
            .transpose()?;
        let schema = compile_schema(built, catalog, config, seed)?;

        let response = schema.execute(payload(matches)?, auth).await;
        write_output(matches, &format!("{}\n", serde_json::to_string_pretty(&response)?))
    }
}

fn payload(matches: &ArgMatches) -> Result<OperationsPayload> {
    let query = match get::<PathBuf>(matches, "query-file") {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?,
        None => get::<String>(matches, "query")
            .ok_or_else(|| anyhow!("Either a query or a query file is required"))?,
    };

    let mut payload = OperationsPayload::new(query);
    payload.operation_name = get(matches, "operation-name");
    if let Some(variables) = get::<String>(matches, "variables") {
        payload = payload.with_variables(parse_variables(&variables)?);
    }
    Ok(payload)
}

fn parse_variables(variables: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(variables).context("Variables must be valid JSON")? {
        Value::Object(variables) => Ok(variables),
        _ => Err(anyhow!("Variables must be a JSON object")),
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Malformed JSON in {}", path.display()))
}
