//! Feed command - show the public feed, newest first

use anyhow::Result;
use colored::Colorize;

use super::{get_context, get_logger, log_event};
use crate::output::{create_table, truncate};
use glimt_core::services::LogEvent;

pub fn run(page: i64, json: bool) -> Result<()> {
    let logger = get_logger();
    log_event(&logger, LogEvent::new("command_executed").with_command("feed"));

    let ctx = get_context()?;
    let feed = ctx.post_service.feed(Some(page))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&feed)?);
        return Ok(());
    }

    if feed.posts.is_empty() {
        println!("No posts on page {}.", feed.page);
        return Ok(());
    }

    println!("{}", "Feed".bold());
    println!();

    let mut table = create_table();
    table.set_header(vec!["ID", "Author", "Content", "Image", "Posted"]);

    for post in &feed.posts {
        table.add_row(vec![
            post.id.to_string(),
            post.user_email.clone(),
            truncate(post.content.as_deref().unwrap_or(""), 60),
            post.image_path.clone().unwrap_or_default(),
            post.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    println!("{}", table);
    println!();

    let total_pages = (feed.total_posts + feed.page_size - 1) / feed.page_size;
    println!(
        "Page {} of {} ({} posts total)",
        feed.page,
        total_pages.max(1),
        feed.total_posts
    );

    Ok(())
}
