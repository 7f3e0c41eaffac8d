//! Command-line interface
//!
//! Clap-derive definitions plus the command dispatcher. The CLI is the
//! dashboard's query surface: it reads through the store, runs session
//! reconstruction and the metrics engine, and prints the result.

pub mod commands;

use std::fmt;

use clap::{Parser, Subcommand, ValueEnum};

use crate::storage::StorageFactory;
use commands::{
    add_site, export_hits, list_sites, remove_site, run_report, seed_demo, wipe_store,
};

/// Sitebeacon - self-hosted web analytics engine
#[derive(Parser)]
#[command(name = "sitebeacon")]
#[command(version)]
#[command(about = "Self-hosted web analytics: hit store, session reconstruction and metrics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tracked sites
    Site {
        #[command(subcommand)]
        action: SiteCommands,
    },

    /// Print the traffic report for a site
    Report {
        /// Site id
        site_id: String,

        /// Reporting range
        #[arg(long, default_value = "30d")]
        range: String,
    },

    /// Export hits in their native record shape
    Export {
        /// Output file path (default: stdout)
        file_path: Option<String>,

        /// Restrict to one site
        #[arg(long)]
        site: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },

    /// Seed a site with generated demo traffic
    Seed {
        /// Site id to seed
        site_id: String,

        /// Days of history to generate
        #[arg(long, default_value_t = 30)]
        days: i64,

        /// Number of distinct visitors
        #[arg(long, default_value_t = 50)]
        visitors: usize,
    },

    /// Delete every site and hit
    Wipe {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum SiteCommands {
    /// Register a site
    Add {
        name: String,
        domain: String,

        /// Session inactivity timeout in minutes
        #[arg(long, default_value_t = 30)]
        timeout_min: i32,
    },

    /// List registered sites
    List,

    /// Delete a site and all of its hits
    Remove {
        site_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::SitebeaconError> for CliError {
    fn from(err: crate::errors::SitebeaconError) -> Self {
        CliError::StorageError(err.to_string())
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    let storage = StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;

    match cmd {
        Commands::Site { action } => match action {
            SiteCommands::Add {
                name,
                domain,
                timeout_min,
            } => add_site(storage, name, domain, timeout_min).await,
            SiteCommands::List => list_sites(storage).await,
            SiteCommands::Remove { site_id } => remove_site(storage, site_id).await,
        },

        Commands::Report { site_id, range } => run_report(storage, site_id, range).await,

        Commands::Export {
            file_path,
            site,
            format,
        } => export_hits(storage, file_path, site, format).await,

        Commands::Seed {
            site_id,
            days,
            visitors,
        } => seed_demo(storage, site_id, days, visitors).await,

        Commands::Wipe { yes } => wipe_store(storage, yes).await,
    }
}
