mod artifacts;
mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod exit_codes;
mod infra;
mod services;
mod workflow;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::artifacts::ArtifactFolders;
use crate::cmd::create::{self, CreateTicketArgs};
use crate::cmd::update::{self, UpdateTicketArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::shortcut::ShortcutClient;
use crate::workflow::story::StoryWorkflowOutcome;

#[derive(Parser)]
#[command(
    name = "shortcut-story",
    author,
    version,
    about = "Create and update Shortcut stories"
)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a story, optionally with attachments and labels.
    CreateTicket(CreateTicketArgs),
    /// Update an existing story by its public id.
    UpdateTicket(UpdateTicketArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(error) => {
            if error.is_remote() {
                println!("{error}");
            } else {
                eprintln!("Error: {error}");
            }
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    debug!("Tracing initialized with level: {}", level);
}

async fn run(command: Commands) -> AppResult<()> {
    let config = AppConfig::load()?;
    let artifacts = ArtifactFolders::initialize(&config.artifacts_root, &config.service_name)?;

    match command {
        Commands::CreateTicket(args) => {
            let ctx = build_context(&config, &args.story.access_token, artifacts);
            let outcome = create::run(&ctx, args).await?;
            match &outcome.story.app_url {
                Some(url) => println!("Story created successfully at: {url}"),
                None => println!("Story {} created successfully", outcome.story.id),
            }
            log_outcome(&outcome);
        }
        Commands::UpdateTicket(args) => {
            let ctx = build_context(&config, &args.story.access_token, artifacts);
            let outcome = update::run(&ctx, args).await?;
            println!("Story {} updated successfully", outcome.story.id);
            log_outcome(&outcome);
        }
    }

    Ok(())
}

fn build_context(config: &AppConfig, token: &str, artifacts: ArtifactFolders) -> AppContext {
    let story_tracker = Arc::new(ShortcutClient::new(config.api_base_url.clone(), token));
    AppContext::new(story_tracker, artifacts)
}

fn log_outcome(outcome: &StoryWorkflowOutcome) {
    debug!(
        "Attached {} file(s); response saved to {}",
        outcome.uploaded.len(),
        outcome.response_path.display()
    );
}
