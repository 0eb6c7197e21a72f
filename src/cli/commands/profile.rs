//! Profile management commands

use anyhow::{Context, Result, bail};
use clap::Subcommand;

use crate::api::{ApiClient, ApiError, ApiService, Profile, validate_display_name};
use crate::cli::output::{OutputFormat, print_error, print_formatted, print_success};
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Create a new profile and remember it for future sessions
    Create {
        /// Display name (3-20 characters after trimming)
        name: String,
    },

    /// Show a profile
    Get {
        /// Profile id (defaults to the cached one)
        id: Option<String>,
    },

    /// Change the display name of a profile
    Rename {
        /// New display name
        name: String,

        /// Profile id (defaults to the cached one)
        #[arg(long)]
        id: Option<String>,
    },

    /// Forget the cached profile id
    Forget,
}

pub async fn run(command: ProfileCommands, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        ProfileCommands::Create { name } => create(&name, format, quiet).await,
        ProfileCommands::Get { id } => get(id, format).await,
        ProfileCommands::Rename { name, id } => rename(&name, id, format, quiet).await,
        ProfileCommands::Forget => forget(quiet),
    }
}

fn client(config: &Config) -> Result<ApiClient> {
    ApiClient::new(&config.api.base_url).context("Failed to create HTTP client")
}

/// Resolve an explicit id or fall back to the cached one.
fn resolve_id(explicit: Option<String>, config: &Config) -> Result<String> {
    match explicit.or_else(|| config.session.profile_id.clone()) {
        Some(id) => Ok(id),
        None => bail!("No profile id given and none cached. Run `encore profile create` first."),
    }
}

fn profile_text(profile: &Profile) -> String {
    format!(
        "{} ({})\n  created:     {}\n  last active: {}",
        profile.display_name,
        profile.id,
        profile.created_at.format("%Y-%m-%d %H:%M UTC"),
        profile.last_active.format("%Y-%m-%d %H:%M UTC"),
    )
}

async fn create(name: &str, format: OutputFormat, quiet: bool) -> Result<()> {
    let trimmed = match validate_display_name(name) {
        Ok(trimmed) => trimmed,
        Err(e) => {
            print_error(&e.to_string());
            bail!("Invalid display name");
        }
    };

    let mut config = Config::load()?;
    let api = client(&config)?;
    let profile = api.create_profile(trimmed).await?;

    config.session.profile_id = Some(profile.id.clone());
    config.save()?;

    print_formatted(&profile, format, profile_text);
    print_success("Profile cached for future sessions", quiet);
    Ok(())
}

async fn get(id: Option<String>, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let id = resolve_id(id, &config)?;
    let api = client(&config)?;

    match api.get_profile(&id).await {
        Ok(profile) => {
            print_formatted(&profile, format, profile_text);
            Ok(())
        }
        Err(ApiError::NotFound) => {
            print_error(&format!("No profile with id {}", id));
            bail!("Profile not found");
        }
        Err(e) => Err(e.into()),
    }
}

async fn rename(name: &str, id: Option<String>, format: OutputFormat, quiet: bool) -> Result<()> {
    let trimmed = match validate_display_name(name) {
        Ok(trimmed) => trimmed,
        Err(e) => {
            print_error(&e.to_string());
            bail!("Invalid display name");
        }
    };

    let config = Config::load()?;
    let id = resolve_id(id, &config)?;
    let api = client(&config)?;
    let profile = api.update_profile(&id, trimmed).await?;

    print_formatted(&profile, format, profile_text);
    print_success("Profile renamed", quiet);
    Ok(())
}

fn forget(quiet: bool) -> Result<()> {
    let mut config = Config::load()?;
    if config.session.profile_id.take().is_some() {
        config.save()?;
        print_success("Cached profile id cleared", quiet);
    } else {
        print_success("No cached profile id", quiet);
    }
    Ok(())
}
