//! Comment command - comment on posts

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::{get_context, get_logger, log_event};
use crate::output::{create_table, success, truncate};
use glimt_core::services::LogEvent;

#[derive(Subcommand)]
pub enum CommentCommands {
    /// Add a comment to a post
    Add {
        /// Post ID to comment on
        post_id: i64,
        /// Comment text
        content: String,
    },
    /// List comments on a post
    List {
        /// Post ID
        post_id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a comment's text
    Edit {
        /// Comment ID
        id: i64,
        /// New comment text
        content: String,
    },
    /// Delete a comment
    Delete {
        /// Comment ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run(identity: Option<String>, command: CommentCommands) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let identity = identity.as_deref();

    match command {
        CommentCommands::Add { post_id, content } => {
            log_event(
                &logger,
                LogEvent::new("command_executed").with_command("comment add"),
            );

            let comment = ctx.comment_service.add_comment(identity, post_id, &content)?;
            success(&format!("Added comment {} to post {}", comment.id, post_id));
            Ok(())
        }
        CommentCommands::List { post_id, json } => {
            log_event(
                &logger,
                LogEvent::new("command_executed").with_command("comment list"),
            );

            let comments = ctx.comment_service.comments_for_post(post_id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&comments)?);
                return Ok(());
            }

            if comments.is_empty() {
                println!("No comments on post {}.", post_id);
                return Ok(());
            }

            println!("{}", format!("Comments on post {}", post_id).bold());
            println!();

            let mut table = create_table();
            table.set_header(vec!["ID", "Author", "Comment", "Posted"]);
            for comment in &comments {
                table.add_row(vec![
                    comment.id.to_string(),
                    comment.user_email.clone(),
                    truncate(&comment.content, 60),
                    comment.created_at.format("%Y-%m-%d %H:%M").to_string(),
                ]);
            }
            println!("{}", table);
            Ok(())
        }
        CommentCommands::Edit { id, content } => {
            log_event(
                &logger,
                LogEvent::new("command_executed").with_command("comment edit"),
            );

            ctx.comment_service.edit_comment(identity, id, &content)?;
            success(&format!("Updated comment {}", id));
            Ok(())
        }
        CommentCommands::Delete { id, force } => {
            log_event(
                &logger,
                LogEvent::new("command_executed").with_command("comment delete"),
            );

            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete comment {}?", id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    bail!("Cancelled.");
                }
            }

            ctx.comment_service.delete_comment(identity, id)?;
            success(&format!("Deleted comment {}", id));
            Ok(())
        }
    }
}
