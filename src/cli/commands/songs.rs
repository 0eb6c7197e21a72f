//! Song catalog commands

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::api::{ApiClient, ApiService, SongPage};
use crate::cli::output::{OutputFormat, print_formatted};
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub enum SongCommands {
    /// List songs in the catalog
    List {
        /// Restrict to a room theme (e.g. "kpop", "rock")
        #[arg(long)]
        theme: Option<String>,
    },

    /// Search songs by title or artist
    Search {
        /// Search query
        query: String,
    },
}

pub async fn run(command: SongCommands, format: OutputFormat, _quiet: bool) -> Result<()> {
    match command {
        SongCommands::List { theme } => list(theme.as_deref(), format).await,
        SongCommands::Search { query } => search(&query, format).await,
    }
}

fn page_text(page: &SongPage) -> String {
    if page.songs.is_empty() {
        return "No songs found".to_string();
    }
    let mut lines: Vec<String> = page
        .songs
        .iter()
        .map(|s| format!("{:<24} {:<20} [{}] {}", s.title, s.artist, s.theme, s.id))
        .collect();
    lines.push(format!("{} of {} songs", page.songs.len(), page.total));
    lines.join("\n")
}

async fn list(theme: Option<&str>, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let api = ApiClient::new(&config.api.base_url).context("Failed to create HTTP client")?;
    let page = api.list_songs(theme).await?;
    print_formatted(&page, format, page_text);
    Ok(())
}

async fn search(query: &str, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let api = ApiClient::new(&config.api.base_url).context("Failed to create HTTP client")?;
    let page = api.search_songs(query).await?;
    print_formatted(&page, format, page_text);
    Ok(())
}
