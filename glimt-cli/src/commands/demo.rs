//! Demo command - manage demo mode

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_glimt_dir;
use glimt_core::services::SeedService;

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode
    #[command(name = "on")]
    On,
    /// Disable demo mode
    #[command(name = "off")]
    Off {
        /// Also delete the demo database
        #[arg(long)]
        clean: bool,
    },
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let glimt_dir = get_glimt_dir();
    std::fs::create_dir_all(&glimt_dir)?;
    let seed_service = SeedService::new(&glimt_dir);

    match command {
        Some(DemoCommands::On) => {
            seed_service.enable()?;
            println!("{}", "Demo mode enabled".green());
            println!("Demo data has been populated. Run 'glimt feed' to see the demo posts.");
            Ok(())
        }
        Some(DemoCommands::Off { clean }) => {
            seed_service.disable(clean)?;
            println!("{}", "Demo mode disabled".yellow());
            if clean {
                println!("Demo data deleted.");
            }
            Ok(())
        }
        Some(DemoCommands::Status) | None => {
            if seed_service.is_enabled()? {
                println!("Demo mode is {}", "ON".green());
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
            Ok(())
        }
    }
}
