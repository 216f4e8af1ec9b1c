//! Friends command - manage one-directional friendships

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::{get_context, get_logger, log_event};
use crate::output::{create_table, success};
use glimt_core::services::LogEvent;

#[derive(Subcommand)]
pub enum FriendsCommands {
    /// List your friends and users you can add
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a friend by email
    Add {
        /// Email of the user to add
        email: String,
    },
    /// Remove a friendship by ID
    Remove {
        /// Friendship ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run(identity: Option<String>, command: Option<FriendsCommands>) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let identity = identity.as_deref();

    match command.unwrap_or(FriendsCommands::List { json: false }) {
        FriendsCommands::List { json } => {
            log_event(
                &logger,
                LogEvent::new("command_executed").with_command("friends list"),
            );

            let overview = ctx.friend_service.friends_overview(identity)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
                return Ok(());
            }

            println!("{}", "Friends".bold());
            println!();

            if overview.friends.is_empty() {
                println!("You have no friends yet.");
            } else {
                let mut table = create_table();
                table.set_header(vec!["ID", "Friend", "Since"]);
                for friend in &overview.friends {
                    table.add_row(vec![
                        friend.id.to_string(),
                        friend.friend_email.clone(),
                        friend.created_at.format("%Y-%m-%d").to_string(),
                    ]);
                }
                println!("{}", table);
            }

            if !overview.users.is_empty() {
                println!();
                println!("{}", "People you may know".bold());
                for user in &overview.users {
                    println!("  {}", user.email);
                }
            }
            Ok(())
        }
        FriendsCommands::Add { email } => {
            log_event(
                &logger,
                LogEvent::new("command_executed").with_command("friends add"),
            );

            ctx.friend_service.add_friend(identity, &email)?;
            success(&format!("Added {} as a friend", email));
            Ok(())
        }
        FriendsCommands::Remove { id, force } => {
            log_event(
                &logger,
                LogEvent::new("command_executed").with_command("friends remove"),
            );

            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove friendship {}?", id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    bail!("Cancelled.");
                }
            }

            ctx.friend_service.remove_friend(identity, id)?;
            success(&format!("Removed friendship {}", id));
            Ok(())
        }
    }
}
