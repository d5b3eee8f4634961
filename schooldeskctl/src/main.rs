//! `schooldeskctl`: browse and manage SchoolDesk screens from a terminal.

mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    name = "schooldeskctl",
    version,
    about = "SchoolDesk admin dashboard on the command line"
)]
struct Cli {
    /// Config file (defaults to the per-user config directory)
    #[arg(long, global = true, env = "SCHOOLDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Session blob (defaults to the per-user data directory)
    #[arg(long, global = true, env = "SCHOOLDESK_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the available screens
    Screens,
    /// Show, set or clear the stored session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Fetch one page of a screen and print it
    List(ListArgs),
    /// Delete one row of a screen
    Delete {
        /// Screen key, e.g. `students`
        screen: String,
        /// Row id
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum SessionAction {
    /// Print the signed-in actor
    Show,
    /// Store a bearer token and the actor profile it belongs to
    Set {
        /// Access token issued by the backend
        #[arg(long, env = "SCHOOLDESK_TOKEN", hide_env_values = true)]
        token: String,
        /// JSON file holding the actor profile
        #[arg(long)]
        profile: PathBuf,
    },
    /// Forget the stored session
    Clear,
}

#[derive(Debug, clap::Args)]
pub(crate) struct ListArgs {
    /// Screen key, e.g. `students`
    pub screen: String,
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    pub page: u32,
    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub size: Option<u32>,
    /// Free-text search
    #[arg(long, default_value = "")]
    pub search: String,
    /// Filter as key=value; repeatable. Lists are comma separated.
    #[arg(long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,
    /// Layout width in columns; narrower than the breakpoint prints cards
    #[arg(long)]
    pub width: Option<u16>,
    /// Print the raw response instead of a table
    #[arg(long)]
    pub json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let paths = commands::Paths {
        config: cli.config,
        session: cli.session_file,
    };

    match cli.command {
        Command::Screens => commands::screens(),
        Command::Session { action } => match action {
            SessionAction::Show => commands::session_show(&paths),
            SessionAction::Set { token, profile } => {
                commands::session_set(&paths, token, &profile)
            }
            SessionAction::Clear => commands::session_clear(&paths),
        },
        Command::List(args) => commands::list(&paths, args).await,
        Command::Delete { screen, id, yes } => {
            commands::delete(&paths, &screen, &id, yes).await
        }
    }
}
