// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::Result;
use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command, ValueEnum, builder::PossibleValue};
use cms_graphql_builder::type_registry::RegistryKind;
use cms_graphql_resolver::artifacts::typescript_declarations;

use super::{
    command::{
        CommandDefinition, SubcommandDefinition, catalog_arg, config_arg, get, output_arg,
    },
    util::{build_schema, compile_schema, load_catalog, load_config, write_output},
};

pub fn command_definition() -> SubcommandDefinition {
    SubcommandDefinition::new(
        "schema",
        "Export and verify the GraphQL schema of a catalog",
        vec![
            Box::new(ExportCommandDefinition {}),
            Box::new(VerifyCommandDefinition {}),
        ],
    )
}

pub(super) struct ExportCommandDefinition {}

#[async_trait]
impl CommandDefinition for ExportCommandDefinition {
    fn command(&self) -> Command {
        Command::new("export")
            .about("Print the GraphQL schema (SDL) or TypeScript declarations of its types")
            .arg(catalog_arg())
            .arg(config_arg())
            .arg(output_arg())
            .arg(
                Arg::new("format")
                    .long("format")
                    .short('f')
                    .value_parser(clap::builder::EnumValueParser::<ExportFormat>::new())
                    .help("Output format. Default: graphql (sdl)")
                    .default_value("graphql"),
            )
    }

    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let catalog = load_catalog(matches)?;
        let config = load_config(matches)?;
        let built = build_schema(&catalog, &config)?;

        let output = match get(matches, "format").unwrap_or(ExportFormat::Graphql) {
            ExportFormat::Typescript => typescript_declarations(&built.registry),
            ExportFormat::Graphql => compile_schema(built, catalog, config, None)?.sdl(),
        };

        write_output(matches, &output)
    }
}

pub(super) struct VerifyCommandDefinition {}

#[async_trait]
impl CommandDefinition for VerifyCommandDefinition {
    fn command(&self) -> Command {
        Command::new("verify")
            .about("Check that a catalog builds into a valid schema")
            .arg(catalog_arg())
            .arg(config_arg())
    }

    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let catalog = load_catalog(matches)?;
        let config = load_config(matches)?;
        let built = build_schema(&catalog, &config)?;

        let type_count = built
            .registry
            .iter()
            .filter(|entry| entry.config.kind != RegistryKind::Root)
            .count();
        let operation_count = built.resolvers.len();
        compile_schema(built, catalog, config, None)?;

        println!("Schema is valid: {type_count} types, {operation_count} resolved fields");
        Ok(())
    }
}

#[derive(Clone, Debug)]
enum ExportFormat {
    Graphql,
    Typescript,
}

impl ValueEnum for ExportFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Graphql, Self::Typescript]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Graphql => Some(PossibleValue::new("graphql")),
            Self::Typescript => Some(PossibleValue::new("typescript")),
        }
    }
}
