//! Post command - create and manage posts

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::{get_context, get_logger, log_event};
use crate::output::{create_table, success, truncate};
use glimt_core::services::{ImageUpload, LogEvent, NewPostInput, UpdatePostRequest};

#[derive(Subcommand)]
pub enum PostCommands {
    /// Create a new post
    Create {
        /// Text content of the post
        #[arg(long)]
        content: Option<String>,
        /// Path to an image file to attach
        #[arg(long)]
        image: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List your own posts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a post's content
    Update {
        /// Post ID
        id: i64,
        /// New text content
        content: String,
    },
    /// Delete a post
    Delete {
        /// Post ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run(identity: Option<String>, command: PostCommands) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let identity = identity.as_deref();

    match command {
        PostCommands::Create {
            content,
            image,
            json,
        } => {
            log_event(
                &logger,
                LogEvent::new("command_executed").with_command("post create"),
            );

            let image = match image {
                Some(path) => {
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "image".to_string());
                    let bytes = std::fs::read(&path)?;
                    Some(ImageUpload { file_name, bytes })
                }
                None => None,
            };

            let post = ctx
                .post_service
                .create_post(identity, NewPostInput { content, image })?;

            if json {
                println!("{}", serde_json::to_string_pretty(&post)?);
            } else {
                success(&format!("Created post {}", post.id));
            }
            Ok(())
        }
        PostCommands::List { json } => {
            log_event(
                &logger,
                LogEvent::new("command_executed").with_command("post list"),
            );

            let posts = ctx.post_service.my_posts(identity)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
                return Ok(());
            }

            if posts.is_empty() {
                println!("You have no posts yet.");
                return Ok(());
            }

            println!("{}", "My Posts".bold());
            println!();

            let mut table = create_table();
            table.set_header(vec!["ID", "Content", "Image", "Posted"]);
            for post in &posts {
                table.add_row(vec![
                    post.id.to_string(),
                    truncate(post.content.as_deref().unwrap_or(""), 60),
                    post.image_path.clone().unwrap_or_default(),
                    post.created_at.format("%Y-%m-%d %H:%M").to_string(),
                ]);
            }
            println!("{}", table);
            Ok(())
        }
        PostCommands::Update { id, content } => {
            log_event(
                &logger,
                LogEvent::new("command_executed").with_command("post update"),
            );

            ctx.post_service
                .update_post(identity, UpdatePostRequest { id, content })?;
            success(&format!("Updated post {}", id));
            Ok(())
        }
        PostCommands::Delete { id, force } => {
            log_event(
                &logger,
                LogEvent::new("command_executed").with_command("post delete"),
            );

            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete post {}?", id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    bail!("Cancelled.");
                }
            }

            ctx.post_service.delete_post(identity, id)?;
            success(&format!("Deleted post {}", id));
            Ok(())
        }
    }
}
