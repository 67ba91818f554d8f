//! Prop Status CLI
//!
//! Plans a status change for a prop document and prints the resulting patch
//! (or the updated document with `--apply`). Rejections are printed to stderr
//! with exit code 2.
//!
//! Usage:
//!   prop-status statuses
//!   prop-status transition --file prop.json --to checked_out --recipient "Jane Doe"
//!   cat prop.json | prop-status transition --to damaged_awaiting_repair \
//!     --notes "cracked rim" --photo file:///photos/rim.jpg --apply
//!   prop-status transition --file prop.json --to available_in_storage --dest-box b7

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use props_lifecycle::{
    Actor, AssignmentKind, LifecycleEngine, LifecycleError, LifecycleStatus, PolicyLoader, Prop,
    StatusCatalog, TransitionContext,
};

#[derive(Parser)]
#[command(name = "prop-status")]
#[command(version)]
#[command(about = "Validate and plan prop lifecycle status changes")]
struct Cli {
    /// Lifecycle policy YAML (permissive when absent)
    #[arg(long, global = true, env = "PROPS_POLICY_PATH")]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every status with its label and priority
    Statuses {
        /// Sort most urgent first
        #[arg(long)]
        by_priority: bool,
    },

    /// Plan a status change for a prop document
    Transition {
        /// Prop JSON document (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Proposed status (e.g. checked_out)
        #[arg(long, value_parser = parse_status)]
        to: LifecycleStatus,

        #[command(flatten)]
        context: ContextArgs,

        #[arg(long, default_value = "system")]
        actor: String,

        #[arg(long, default_value = "System")]
        actor_name: String,

        /// Print the updated prop instead of the patch
        #[arg(long)]
        apply: bool,
    },
}

/// Context flags for a status change
#[derive(Args, Debug)]
struct ContextArgs {
    /// Checkout recipient
    #[arg(long)]
    recipient: Option<String>,

    #[arg(long)]
    notes: Option<String>,

    /// Due back date (YYYY-MM-DD)
    #[arg(long)]
    due_back: Option<NaiveDate>,

    #[arg(long)]
    maker: Option<String>,

    /// Delivery date (YYYY-MM-DD)
    #[arg(long)]
    delivery_date: Option<NaiveDate>,

    #[arg(long)]
    venue: Option<String>,

    /// Who holds the backup
    #[arg(long)]
    backup: Option<String>,

    /// Damage photo URI (repeatable)
    #[arg(long)]
    photo: Vec<String>,

    /// Check-in destination box ID
    #[arg(long, conflicts_with = "dest_location")]
    dest_box: Option<String>,

    /// Check-in destination location ID
    #[arg(long)]
    dest_location: Option<String>,
}

impl ContextArgs {
    fn into_context(self) -> TransitionContext {
        let destination = self
            .dest_box
            .map(|id| (AssignmentKind::Box, id))
            .or(self.dest_location.map(|id| (AssignmentKind::Location, id)));

        let context = TransitionContext {
            to: self.recipient,
            notes: self.notes,
            due_back_date: self.due_back,
            maker_name: self.maker,
            delivery_date: self.delivery_date,
            delivery_venue: self.venue,
            who_has_backup: self.backup,
            damage_photos: self.photo,
            destination: None,
        };
        match destination {
            Some((kind, id)) => context.destination(kind, id, ""),
            None => context,
        }
    }
}

fn parse_status(s: &str) -> Result<LifecycleStatus, String> {
    s.parse::<LifecycleStatus>().map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Statuses { by_priority } => {
            let statuses = if by_priority {
                StatusCatalog::by_priority()
            } else {
                StatusCatalog::all_statuses().to_vec()
            };
            for status in statuses {
                println!(
                    "{:<30} {:<32} {}",
                    status.as_str(),
                    status.label(),
                    status.priority()
                );
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Transition {
            file,
            to,
            context,
            actor,
            actor_name,
            apply,
        } => {
            let policy = match &cli.policy {
                Some(path) => PolicyLoader::load_from_file(path)
                    .with_context(|| format!("Failed to load policy {}", path.display()))?,
                None => Default::default(),
            };
            let engine = LifecycleEngine::new(policy);

            let mut prop = read_prop(file.as_ref())?;
            let context = context.into_context();

            let actor = Actor::new(actor, actor_name);
            let patch = match engine.plan_transition(&prop, to, &context, &actor, Utc::now()) {
                Ok(patch) => patch,
                Err(LifecycleError::Rejected(rejection)) => {
                    eprintln!("{}", rejection.message);
                    return Ok(ExitCode::from(2));
                }
                Err(e) => return Err(e.into()),
            };

            let output = if apply {
                patch.apply_to(&mut prop);
                serde_json::to_string_pretty(&prop)?
            } else {
                serde_json::to_string_pretty(&patch)?
            };
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_prop(file: Option<&PathBuf>) -> Result<Prop> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read prop from stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Failed to parse prop document")
}
