//! Scene/room loading seam.
//!
//! Building the themed 3D environment is an external concern; the flow
//! controller only needs the anchor positions the room reports back. The
//! desktop build ships `LocalSceneLoader`, which synthesizes anchors from
//! the embedded room catalog; a VR backend would substitute its own
//! implementation.

use async_trait::async_trait;
use glam::Vec3;
use std::time::Duration;
use thiserror::Error;

use crate::app_data;

/// Anchor positions a loaded room reports back, in room space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomAnchors {
    /// Where the user spawns, facing -Z
    pub spawn: Vec3,
    /// Microphone stand position
    pub mic: Vec3,
    /// Video screen center
    pub screen: Vec3,
}

/// A failed room load
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Unknown room theme: {0}")]
    UnknownTheme(String),
    #[error("Room setup failed: {0}")]
    Setup(String),
}

/// Instantiates a themed environment and reports its anchors.
#[async_trait]
pub trait SceneLoader: Send + Sync {
    async fn load_room(&self, theme: &str) -> Result<RoomAnchors, SceneError>;
    /// Tear down the current room. Idempotent.
    fn unload(&self);
}

/// Desktop scene loader backed by the embedded room catalog.
///
/// There is no real asset pipeline on the desktop preview; a short delay
/// stands in for environment setup so the loading overlay is exercised.
pub struct LocalSceneLoader {
    setup_delay: Duration,
}

impl LocalSceneLoader {
    pub fn new() -> Self {
        Self {
            setup_delay: Duration::from_millis(300),
        }
    }
}

impl Default for LocalSceneLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SceneLoader for LocalSceneLoader {
    async fn load_room(&self, theme: &str) -> Result<RoomAnchors, SceneError> {
        let room = app_data::room_by_id(theme)
            .ok_or_else(|| SceneError::UnknownTheme(theme.to_string()))?;

        tokio::time::sleep(self.setup_delay).await;
        tracing::info!("Loaded room '{}' ({})", room.title, room.id);

        Ok(RoomAnchors {
            spawn: Vec3::from_array(room.spawn),
            mic: Vec3::from_array(room.mic),
            screen: Vec3::from_array(room.screen),
        })
    }

    fn unload(&self) {
        tracing::debug!("Room unloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_anchors_for_known_theme() {
        let loader = LocalSceneLoader {
            setup_delay: Duration::ZERO,
        };
        let anchors = loader.load_room("kpop").await.unwrap();
        assert!(anchors.screen.z < 0.0, "screen should sit ahead of spawn");
    }

    #[tokio::test]
    async fn unknown_theme_is_an_error() {
        let loader = LocalSceneLoader {
            setup_delay: Duration::ZERO,
        };
        let err = loader.load_room("disco").await.unwrap_err();
        assert!(matches!(err, SceneError::UnknownTheme(_)));
    }
}
