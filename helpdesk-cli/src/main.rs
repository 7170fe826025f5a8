mod cli;
mod commands;
mod config;
mod error;
mod paths;
mod render;

use std::process::ExitCode;

use clap::Parser;
use log::error;

use crate::cli::{Cli, Command};
use crate::commands::AuditArgs;
use crate::config::Config;
use crate::error::CliError;

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::load(cli.global.config.as_deref())?;

    match cli.command {
        Command::Table { source, view } => commands::table(&source, &view, &config).await,
        Command::Export {
            source,
            view,
            format,
            out,
            title,
        } => {
            commands::export(&source, &view, format.into(), &out, title.as_deref(), &config).await
        }
        Command::Audit {
            source,
            search,
            action,
            user,
            from,
            to,
            page,
            per_page,
            oldest_first,
        } => {
            let args = AuditArgs {
                search: search.as_deref(),
                action: action.as_deref(),
                user: user.as_deref(),
                from: from.as_deref(),
                to: to.as_deref(),
                page,
                per_page,
                oldest_first,
            };
            commands::audit(&source, args, &config).await
        }
        Command::Print {
            source,
            id,
            title,
            html,
            lines_per_page,
        } => {
            commands::print(
                &source,
                id.as_deref(),
                title.as_deref(),
                html.as_deref(),
                lines_per_page,
                &config,
            )
            .await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    paths::init_logging(cli.global.log_level.into());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
