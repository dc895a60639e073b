// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::Result;
use common::logging_tracing;

use commands::{
    command::{CommandDefinition, SubcommandDefinition},
    execute::ExecuteCommandDefinition,
    playground::PlaygroundCommandDefinition,
    schema,
};

mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    logging_tracing::init()?;

    let subcommand_definition = top_level_definition();

    let command = subcommand_definition
        .command()
        .version(env!("CARGO_PKG_VERSION"));

    let matches = command.get_matches();

    subcommand_definition.execute(&matches).await
}

fn top_level_definition() -> SubcommandDefinition {
    SubcommandDefinition::new(
        "cms-graphql",
        "Build and query the GraphQL schema of a content catalog",
        vec![
            Box::new(schema::command_definition()),
            Box::new(ExecuteCommandDefinition {}),
            Box::new(PlaygroundCommandDefinition {}),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_is_well_formed() {
        top_level_definition().command().debug_assert();
    }
}
