//! Deckhand CLI - Command-line interface for flashcard notes and media sync
//!
//! Add and edit notes with duplicate detection, and mirror the media folder
//! in the foreground.

mod cli;
mod commands;
mod credentials;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::{resolve_config_path, resolve_db_path};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::dupe::run_dupe;
use crate::commands::edit::run_set;
use crate::commands::list::run_list;
use crate::commands::media::run_media;
use crate::commands::notetype::run_notetype;
use crate::commands::show::run_show;
use crate::commands::tag::run_tag;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "deckhand=info".parse::<tracing_subscriber::filter::Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Notetype { command } => run_notetype(command, &resolve_db_path(cli.db_path)?)?,
        Commands::Add {
            notetype,
            fields,
            tags,
        } => run_add(&notetype, &fields, tags.as_deref(), &resolve_db_path(cli.db_path)?)?,
        Commands::List {
            notetype,
            limit,
            json,
        } => run_list(notetype.as_deref(), limit, json, &resolve_db_path(cli.db_path)?)?,
        Commands::Show { id, json } => run_show(&id, json, &resolve_db_path(cli.db_path)?)?,
        Commands::Set { id, field, value } => {
            run_set(&id, &field, &value, &resolve_db_path(cli.db_path)?)?;
        }
        Commands::Tag { command } => run_tag(command, &resolve_db_path(cli.db_path)?)?,
        Commands::Dupe { id } => run_dupe(&id, &resolve_db_path(cli.db_path)?)?,
        Commands::Media { command } => {
            run_media(command, &resolve_config_path(cli.config)?).await?;
        }
        Commands::Config { command } => run_config(command, &resolve_config_path(cli.config)?)?,
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
    }

    Ok(())
}
