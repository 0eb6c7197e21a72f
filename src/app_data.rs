//! Application data embedded from TOML files at compile time.
//!
//! This module provides access to application-level constants that are:
//! - Embedded at compile time via `include_str!`
//! - Parsed lazily on first access via `OnceLock`
//! - Immutable at runtime (not user-configurable)
//!
//! This is distinct from `config.rs` which handles user preferences.
//! App data defines *how the client works* (room catalog, interaction
//! tuning), while config defines *user choices* (API endpoint, cached
//! profile).
//!
//! Data files are located in `embedded/`:
//! - `rooms.toml` - room catalog with anchor positions
//! - `client.toml` - API defaults, interaction and flow tuning, keyboard layout

use serde::Deserialize;
use std::sync::OnceLock;

const ROOMS_TOML: &str = include_str!("../embedded/rooms.toml");
const CLIENT_TOML: &str = include_str!("../embedded/client.toml");

// ============================================================================
// Room catalog
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RoomCatalog {
    pub rooms: Vec<RoomDef>,
}

/// A selectable karaoke room theme.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomDef {
    /// Theme identifier, also the song catalog filter value (e.g. "kpop")
    pub id: String,
    /// Display name (shown on the room selection panel)
    pub title: String,
    /// Accent color as RGB
    pub accent: [u8; 3],
    /// User spawn position in room space
    pub spawn: [f32; 3],
    /// Microphone stand position
    pub mic: [f32; 3],
    /// Video screen center position
    pub screen: [f32; 3],
}

/// Get the room catalog (lazy-loaded)
pub fn room_catalog() -> &'static RoomCatalog {
    static CATALOG: OnceLock<RoomCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| {
        toml::from_str(ROOMS_TOML).unwrap_or_else(|e| {
            panic!("Failed to parse rooms.toml: {}", e);
        })
    })
}

/// Look up a room definition by theme id.
pub fn room_by_id(id: &str) -> Option<&'static RoomDef> {
    room_catalog().rooms.iter().find(|r| r.id == id)
}

// ============================================================================
// Client tuning
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ClientData {
    pub api: ApiData,
    pub interaction: InteractionData,
    pub flow: FlowData,
    pub keyboard: KeyboardData,
}

#[derive(Debug, Deserialize)]
pub struct ApiData {
    pub default_base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct InteractionData {
    pub overlay_distance: f32,
    pub panel_distance: f32,
    pub mouse_fov_factor: f32,
}

#[derive(Debug, Deserialize)]
pub struct FlowData {
    pub song_fetch_delay_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct KeyboardData {
    /// Key rows, top to bottom
    pub rows: Vec<String>,
    /// Key edge length in panel units (meters)
    pub key_size: f32,
    /// Gap between keys
    pub key_gap: f32,
}

/// Get client tuning data (lazy-loaded)
pub fn client_data() -> &'static ClientData {
    static DATA: OnceLock<ClientData> = OnceLock::new();
    DATA.get_or_init(|| {
        toml::from_str(CLIENT_TOML).unwrap_or_else(|e| {
            panic!("Failed to parse client.toml: {}", e);
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_room_catalog_parses() {
        let catalog = room_catalog();
        assert!(!catalog.rooms.is_empty());
        assert!(room_by_id("kpop").is_some());
        assert!(room_by_id("no-such-theme").is_none());
    }

    #[test]
    fn embedded_client_data_parses() {
        let data = client_data();
        assert!(data.interaction.overlay_distance > 0.0);
        assert!(!data.keyboard.rows.is_empty());
        assert!(data.api.default_base_url.starts_with("http"));
    }
}
