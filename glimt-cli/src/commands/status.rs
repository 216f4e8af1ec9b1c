//! Status command - show database status and summary

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Glimt Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Users", &status.total_users.to_string()]);
    table.add_row(vec!["Posts", &status.total_posts.to_string()]);
    table.add_row(vec!["Comments", &status.total_comments.to_string()]);
    table.add_row(vec!["Friendships", &status.total_friendships.to_string()]);

    println!("{}", table);

    if ctx.config.demo_mode {
        println!();
        println!("Demo mode is {}", "ON".green());
    }

    Ok(())
}
