//! CLI module for Encore
//!
//! Provides command-line access to the profile and song APIs without
//! starting the graphical client. Useful for scripting and for poking
//! at a server during development.

mod commands;
mod output;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

/// Encore - VR karaoke client
#[derive(Parser, Debug)]
#[command(name = "encore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[command(flatten)]
    pub output: OutputOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Profile management
    Profile {
        #[command(subcommand)]
        command: commands::profile::ProfileCommands,
    },

    /// Song catalog queries
    Songs {
        #[command(subcommand)]
        command: commands::songs::SongCommands,
    },
}

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.output.format();
    let quiet = cli.output.quiet;

    match cli.command {
        Commands::Profile { command } => commands::profile::run(command, format, quiet).await,
        Commands::Songs { command } => commands::songs::run(command, format, quiet).await,
    }
}
