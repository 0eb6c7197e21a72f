//! Video player seam.
//!
//! The real playback surface is an embedded YouTube player owned by the
//! rendering layer; the flow controller only issues `load/play/pause/stop`
//! and folds the player's events into an `is_playing` flag. The desktop
//! build ships `BrowserPlayer`, which hands the video off to the system
//! browser; it cannot observe real playback, so it reports state changes
//! optimistically.

use thiserror::Error;

use crate::api;

/// Playback state as derived from player events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    Ended,
}

/// Events a player implementation reports back, drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The requested video finished loading
    Ready,
    StateChange(PlaybackState),
    /// Playback failed; the message is shown on the error overlay
    Error(String),
}

/// A failed player command
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("Invalid video id: {0}")]
    InvalidId(String),
    #[error("Failed to start playback: {0}")]
    Launch(String),
}

/// Embedded video player contract.
pub trait VideoPlayer: Send {
    /// Load a video by YouTube id. Playback starts on `play`.
    fn load(&mut self, youtube_id: &str) -> Result<(), VideoError>;
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    /// Drain events reported since the last poll.
    fn poll_events(&mut self) -> Vec<PlayerEvent>;
}

/// Desktop player that opens the video in the system browser.
pub struct BrowserPlayer {
    loaded: Option<String>,
    pending: Vec<PlayerEvent>,
}

impl BrowserPlayer {
    pub fn new() -> Self {
        Self {
            loaded: None,
            pending: Vec::new(),
        }
    }
}

impl Default for BrowserPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoPlayer for BrowserPlayer {
    fn load(&mut self, youtube_id: &str) -> Result<(), VideoError> {
        if !api::is_valid_youtube_id(youtube_id) {
            return Err(VideoError::InvalidId(youtube_id.to_string()));
        }

        let url = format!("https://www.youtube.com/watch?v={}", youtube_id);
        open::that(&url).map_err(|e| VideoError::Launch(e.to_string()))?;

        tracing::info!("Opened {} in browser", url);
        self.loaded = Some(youtube_id.to_string());
        self.pending.push(PlayerEvent::Ready);
        Ok(())
    }

    fn play(&mut self) {
        if self.loaded.is_some() {
            self.pending.push(PlayerEvent::StateChange(PlaybackState::Playing));
        }
    }

    fn pause(&mut self) {
        if self.loaded.is_some() {
            self.pending.push(PlayerEvent::StateChange(PlaybackState::Paused));
        }
    }

    fn stop(&mut self) {
        if self.loaded.take().is_some() {
            self.pending.push(PlayerEvent::StateChange(PlaybackState::Idle));
        }
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Test doubles shared with the flow controller tests.
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Player fake that records commands instead of launching anything.
    pub struct RecordingPlayer {
        pub loaded: Vec<String>,
        pub stops: usize,
        pub fail_load: bool,
        pending: Vec<PlayerEvent>,
    }

    impl RecordingPlayer {
        pub fn new() -> Self {
            Self {
                loaded: Vec::new(),
                stops: 0,
                fail_load: false,
                pending: Vec::new(),
            }
        }

        /// Script an event as if the real player reported it.
        pub fn push_event(&mut self, event: PlayerEvent) {
            self.pending.push(event);
        }
    }

    /// Handle that lets a test inspect a `RecordingPlayer` after the flow
    /// controller has taken ownership of it.
    #[derive(Clone)]
    pub struct SharedPlayer(pub Arc<Mutex<RecordingPlayer>>);

    impl SharedPlayer {
        pub fn new() -> Self {
            Self(Arc::new(Mutex::new(RecordingPlayer::new())))
        }
    }

    impl VideoPlayer for SharedPlayer {
        fn load(&mut self, youtube_id: &str) -> Result<(), VideoError> {
            self.0.lock().unwrap().load(youtube_id)
        }

        fn play(&mut self) {
            self.0.lock().unwrap().play()
        }

        fn pause(&mut self) {
            self.0.lock().unwrap().pause()
        }

        fn stop(&mut self) {
            self.0.lock().unwrap().stop()
        }

        fn poll_events(&mut self) -> Vec<PlayerEvent> {
            self.0.lock().unwrap().poll_events()
        }
    }

    impl VideoPlayer for RecordingPlayer {
        fn load(&mut self, youtube_id: &str) -> Result<(), VideoError> {
            if self.fail_load {
                return Err(VideoError::Launch("player offline".to_string()));
            }
            self.loaded.push(youtube_id.to_string());
            self.pending.push(PlayerEvent::Ready);
            Ok(())
        }

        fn play(&mut self) {
            self.pending.push(PlayerEvent::StateChange(PlaybackState::Playing));
        }

        fn pause(&mut self) {
            self.pending.push(PlayerEvent::StateChange(PlaybackState::Paused));
        }

        fn stop(&mut self) {
            self.stops += 1;
            self.pending.push(PlayerEvent::StateChange(PlaybackState::Idle));
        }

        fn poll_events(&mut self) -> Vec<PlayerEvent> {
            std::mem::take(&mut self.pending)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingPlayer;
    use super::*;

    #[test]
    fn browser_player_rejects_malformed_ids() {
        let mut player = BrowserPlayer::new();
        let err = player.load("not a valid id").unwrap_err();
        assert!(matches!(err, VideoError::InvalidId(_)));
        assert!(player.poll_events().is_empty());
    }

    #[test]
    fn stop_without_load_emits_nothing() {
        let mut player = BrowserPlayer::new();
        player.stop();
        player.play();
        assert!(player.poll_events().is_empty());
    }

    #[test]
    fn recording_player_reports_ready_then_playing() {
        let mut player = RecordingPlayer::new();
        player.load("dQw4w9WgXcQ").unwrap();
        player.play();
        let events = player.poll_events();
        assert_eq!(events[0], PlayerEvent::Ready);
        assert_eq!(events[1], PlayerEvent::StateChange(PlaybackState::Playing));
        // Drained on poll
        assert!(player.poll_events().is_empty());
    }
}
