//! Glimt CLI - A small photo-sharing social network in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{comment, demo, feed, friends, logs, post, status};

/// Glimt - share posts, photos, and comments with friends
#[derive(Parser)]
#[command(name = "glimt", version, about, long_about = None)]
struct Cli {
    /// Act as this user (email); defaults to GLIMT_USER
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the public feed
    Feed {
        /// Page number (starts at 1)
        #[arg(long, default_value = "1")]
        page: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create and manage posts
    Post {
        #[command(subcommand)]
        command: post::PostCommands,
    },

    /// Comment on posts
    Comment {
        #[command(subcommand)]
        command: comment::CommentCommands,
    },

    /// Manage friends
    Friends {
        #[command(subcommand)]
        command: Option<friends::FriendsCommands>,
    },

    /// Show database status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Feed { .. } => "feed",
            Commands::Post { .. } => "post",
            Commands::Comment { .. } => "comment",
            Commands::Friends { .. } => "friends",
            Commands::Status { .. } => "status",
            Commands::Demo { .. } => "demo",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command_name = cli.command.name();
    let user = commands::resolve_identity(cli.user.clone());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_failure(command_name, user.as_deref(), &e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let identity = commands::resolve_identity(cli.user);

    match cli.command {
        Commands::Feed { page, json } => feed::run(page, json),
        Commands::Post { command } => post::run(identity, command),
        Commands::Comment { command } => comment::run(identity, command),
        Commands::Friends { command } => friends::run(identity, command),
        Commands::Status { json } => status::run(json),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
