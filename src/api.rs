//! Karaoke API client.
//!
//! This module provides:
//!
//! - `ApiService`: the trait the flow controller calls for profile and song
//!   operations (implemented over HTTP here, by an in-memory fake in tests)
//! - `ApiClient`: reqwest-backed implementation against the REST API
//! - `Profile`, `Song`, `SongPage`: deserialized API responses
//! - Display name validation, applied before any network call is issued
//!
//! All endpoints are JSON under the configured base path (e.g.
//! `http://host/api`): `POST /profiles`, `GET|PUT /profiles/:id`,
//! `GET /songs?theme=`, `GET /songs/search?q=`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::app_data;

/// User agent for API requests
const USER_AGENT: &str = concat!("Encore/", env!("CARGO_PKG_VERSION"));

/// Display name length bounds (inclusive, after trimming)
pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 20;

/// A singer profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// A song in the catalog. Immutable; fetched on demand and never persisted
/// client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub youtube_id: String,
    pub title: String,
    pub artist: String,
    pub theme: String,
}

/// A page of songs from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongPage {
    pub songs: Vec<Song>,
    pub total: usize,
}

/// Local display name validation failure. Surfaced inline on the profile
/// panel; never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Name must be at least {NAME_MIN_LEN} characters")]
    TooShort,
    #[error("Name must be at most {NAME_MAX_LEN} characters")]
    TooLong,
}

/// Validate a display name, returning the trimmed form accepted by the API.
pub fn validate_display_name(name: &str) -> Result<&str, NameError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len < NAME_MIN_LEN {
        Err(NameError::TooShort)
    } else if len > NAME_MAX_LEN {
        Err(NameError::TooLong)
    } else {
        Ok(trimmed)
    }
}

/// Check that a string has the shape of a YouTube video id.
pub fn is_valid_youtube_id(id: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());
    re.is_match(id)
}

/// A failed API call
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("API error: {status}")]
    Http { status: u16 },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Error body returned by the API on 4xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Profile and song operations as seen by the flow controller.
#[async_trait]
pub trait ApiService: Send + Sync {
    async fn create_profile(&self, display_name: &str) -> Result<Profile, ApiError>;
    async fn get_profile(&self, id: &str) -> Result<Profile, ApiError>;
    async fn update_profile(&self, id: &str, display_name: &str) -> Result<Profile, ApiError>;
    /// List songs, optionally filtered to a room theme.
    async fn list_songs(&self, theme: Option<&str>) -> Result<SongPage, ApiError>;
    async fn search_songs(&self, query: &str) -> Result<SongPage, ApiError>;
}

/// HTTP implementation of `ApiService`
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client against the given base URL (no trailing slash).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let timeout = app_data::client_data().api.request_timeout_secs;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a response to the typed body, converting error statuses.
    async fn decode<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        match status.as_u16() {
            404 => Err(ApiError::NotFound),
            400 => {
                let message = response
                    .json::<ErrorBody>()
                    .await
                    .map(|b| b.error)
                    .unwrap_or_else(|_| "Invalid request".to_string());
                Err(ApiError::BadRequest(message))
            }
            code => Err(ApiError::Http { status: code }),
        }
    }
}

#[async_trait]
impl ApiService for ApiClient {
    async fn create_profile(&self, display_name: &str) -> Result<Profile, ApiError> {
        let response = self
            .client
            .post(self.url("/profiles"))
            .json(&serde_json::json!({ "displayName": display_name }))
            .send()
            .await?;
        let profile: Profile = Self::decode(response).await?;
        tracing::info!("Created profile {} ({})", profile.id, profile.display_name);
        Ok(profile)
    }

    async fn get_profile(&self, id: &str) -> Result<Profile, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/profiles/{}", id)))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_profile(&self, id: &str, display_name: &str) -> Result<Profile, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/profiles/{}", id)))
            .json(&serde_json::json!({ "displayName": display_name }))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn list_songs(&self, theme: Option<&str>) -> Result<SongPage, ApiError> {
        let mut request = self.client.get(self.url("/songs"));
        if let Some(theme) = theme {
            request = request.query(&[("theme", theme)]);
        }
        let page: SongPage = Self::decode(request.send().await?).await?;
        tracing::debug!(
            "Fetched {} songs (theme: {})",
            page.songs.len(),
            theme.unwrap_or("any")
        );
        Ok(page)
    }

    async fn search_songs(&self, query: &str) -> Result<SongPage, ApiError> {
        let response = self
            .client
            .get(self.url("/songs/search"))
            .query(&[("q", query)])
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation_accepts_in_range_lengths() {
        assert_eq!(validate_display_name("Alice"), Ok("Alice"));
        assert_eq!(validate_display_name("  Bob  "), Ok("Bob"));
        assert_eq!(validate_display_name("abc"), Ok("abc"));
        assert_eq!(validate_display_name(&"x".repeat(20)).is_ok(), true);
    }

    #[test]
    fn name_validation_rejects_out_of_range_lengths() {
        assert_eq!(validate_display_name("Al"), Err(NameError::TooShort));
        assert_eq!(validate_display_name("   "), Err(NameError::TooShort));
        assert_eq!(
            validate_display_name(&"x".repeat(21)),
            Err(NameError::TooLong)
        );
        // Whitespace padding does not rescue a short name
        assert_eq!(validate_display_name("  a  "), Err(NameError::TooShort));
    }

    #[test]
    fn youtube_id_shape_check() {
        assert!(is_valid_youtube_id("dQw4w9WgXcQ"));
        assert!(is_valid_youtube_id("abc-DEF_123"));
        assert!(!is_valid_youtube_id("short"));
        assert!(!is_valid_youtube_id("has spaces 1"));
        assert!(!is_valid_youtube_id("toolongtoolong"));
    }

    #[test]
    fn profile_deserializes_from_api_shape() {
        let json = r#"{
            "id": "prof_8c1f",
            "displayName": "Alice",
            "createdAt": "2026-01-02T03:04:05Z",
            "lastActive": "2026-01-02T03:04:05Z"
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, "prof_8c1f");
        assert_eq!(profile.display_name, "Alice");
    }

    #[test]
    fn song_page_deserializes_from_api_shape() {
        let json = r#"{
            "songs": [
                {
                    "id": "song_1",
                    "youtubeId": "dQw4w9WgXcQ",
                    "title": "Never Gonna Give You Up",
                    "artist": "Rick Astley",
                    "theme": "pop"
                }
            ],
            "total": 1
        }"#;
        let page: SongPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.songs[0].youtube_id, "dQw4w9WgXcQ");
    }
}
