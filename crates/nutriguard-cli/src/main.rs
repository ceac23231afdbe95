//! NutriGuard CLI
//!
//! Looks food products up in Open Food Facts and screens them for kid
//! safety and for the allergens the user has selected.

use anyhow::Result;
use clap::{Parser, Subcommand};
use nutriguard_core::Severity;
use std::path::PathBuf;
use tracing::debug;

mod commands;
mod config;
mod render;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "nutriguard")]
#[command(about = "Scan food products for kid safety and allergens", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "nutriguard.yaml", env = "NUTRIGUARD_CONFIG")]
    config: String,

    /// Product database base URL
    #[arg(long, global = true, env = "NUTRIGUARD_API_URL")]
    api_url: Option<String>,

    /// Preference file path
    #[arg(short, long, global = true, env = "NUTRIGUARD_PREFERENCES")]
    preferences: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up a product by barcode and screen it
    Scan {
        /// Product barcode
        code: String,
    },

    /// Search products by name and screen each result
    Search {
        /// Free-text product name
        query: String,

        /// Maximum number of results to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Screen popular products in a category, or list the built-in categories
    Browse {
        /// Category id, e.g. `snacks`; omit to list categories
        category: Option<String>,
    },

    /// Screen the most popular products overall
    Trending,

    /// Manage allergen preferences
    #[command(subcommand)]
    Allergens(AllergenCommand),

    /// Show or change general settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Clear all stored preferences
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AllergenCommand {
    /// Show the catalog with current selection and severities
    List,

    /// Select or unselect an allergen
    Toggle {
        /// Allergen id, e.g. `milk` or `custom-1700000000000`
        id: String,
    },

    /// Create and select a custom allergen
    Add {
        /// Name matched against ingredient text
        name: String,
    },

    /// Delete a custom allergen
    Remove {
        /// Custom allergen id
        id: String,
    },

    /// Set the severity reported for an allergen
    Severity {
        /// Allergen id
        id: String,

        /// low, medium or high
        level: Severity,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Show general settings
    Show,

    /// Change general settings
    Set {
        #[arg(long)]
        notifications: Option<bool>,

        #[arg(long)]
        scan_sound: Option<bool>,

        #[arg(long)]
        high_contrast: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config = AppConfig::load(&cli.config, &cli)?;
    debug!(
        api = %config.api_base_url,
        preferences = %config.preferences_path().display(),
        "configuration loaded"
    );

    commands::run(cli.command, &config, cli.json).await
}

/// Initialize tracing subscriber on stderr so stdout stays parseable
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("nutriguard=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nutriguard=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
