// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches, Command};
use common::env_const::is_production;

use super::{
    command::{CommandDefinition, catalog_arg, config_arg, output_arg},
    util::{build_schema, compile_schema, load_catalog, load_config, write_output},
};

pub(crate) struct PlaygroundCommandDefinition {}

#[async_trait]
impl CommandDefinition for PlaygroundCommandDefinition {
    fn command(&self) -> Command {
        Command::new("playground")
            .about("Print the landing page (GraphiQL) served next to the endpoint")
            .arg(catalog_arg())
            .arg(config_arg())
            .arg(output_arg())
            .arg(
                Arg::new("production")
                    .help("Render as a production deployment would (defaults to CMS_DEPLOYMENT_MODE)")
                    .long("production")
                    .action(ArgAction::SetTrue),
            )
    }

    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let catalog = load_catalog(matches)?;
        let config = load_config(matches)?;
        let built = build_schema(&catalog, &config)?;
        let schema = compile_schema(built, catalog, config, None)?;

        let production = matches.get_flag("production") || is_production();
        let landing_page = schema.landing_page(production).ok_or_else(|| {
            anyhow!("The landing page of {} is disabled", schema.endpoint())
        })?;

        write_output(matches, &landing_page)
    }
}
