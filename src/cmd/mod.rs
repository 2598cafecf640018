//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`] or [`health`]. Each handler lives in its
//! own submodule.

pub mod health;
pub mod run;

use crate::cli::{Cli, Commands};
use crate::error::GatewayError;

pub async fn dispatch(cli: Cli) -> Result<(), GatewayError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  gatehouse v{version} \u{2014} edge HTTP gateway\n\n  \
         No command provided. To get started:\n\n    \
         gatehouse run                      Serve ./public and forward /api to localhost:8080\n    \
         gatehouse run -u http://api:8080   Point /api at a specific backend\n    \
         gatehouse health                   Check a running instance\n    \
         gatehouse --help                   See all commands and options\n"
    );
}
