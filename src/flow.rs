//! Application flow state machine.
//!
//! `FlowController` owns the single `AppState`, sequences panel visibility
//! through the registry, and is the only component that calls the external
//! services (API, scene loader, video player). Service calls run as tokio
//! tasks polled once per frame; while one is outstanding the loading
//! overlay is visible and panel input is suppressed.
//!
//! No error escapes this module: validation failures surface inline on the
//! profile panel, service failures raise the error overlay with a stored
//! retry action, and callers only ever observe state changes.

use glam::Vec3;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::api::{self, ApiError, ApiService, NameError, Profile, Song, SongPage};
use crate::app_data;
use crate::panel::{ids, Button, ButtonAction, ButtonRect, PanelRegistry};
use crate::scene::{RoomAnchors, SceneError, SceneLoader};
use crate::spatial::{pose_in_front, Pose};
use crate::task::{poll_task, Delay, PollResult};
use crate::video::{PlaybackState, PlayerEvent, VideoPlayer};

/// The application-level state. Exactly one value is active at a time and
/// the flow controller is its sole owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Initializing,
    ProfileInput,
    RoomSelection,
    LoadingRoom,
    InRoom,
    SongSearch,
    PlayingSong,
    Error,
}

/// Which text buffer the spatial keyboard edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardTarget {
    ProfileName,
    SongQuery,
}

/// The retry thunk: the last failed operation with its parameters, stored
/// for the error overlay's Retry button and re-dispatched verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryAction {
    CreateProfile { name: String },
    LoadRoom { theme: String },
    FetchSongs { theme: String },
    SearchSongs { query: String },
    LoadVideo { song: Song },
}

/// Effects the flow controller asks its owner to apply (persisting the
/// cached profile id lives outside the state machine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    CacheProfileId(String),
    ClearCachedProfile,
}

/// A room the user is currently in.
#[derive(Debug, Clone)]
pub struct LoadedRoom {
    pub theme: String,
    pub anchors: RoomAnchors,
}

/// Result of a background flow task.
enum TaskOutcome {
    ProfileLookup(Result<Profile, ApiError>),
    ProfileCreated {
        name: String,
        result: Result<Profile, ApiError>,
    },
    RoomLoaded {
        theme: String,
        result: Result<RoomAnchors, SceneError>,
    },
    SongsFetched {
        theme: String,
        result: Result<SongPage, ApiError>,
    },
    SearchDone {
        query: String,
        result: Result<SongPage, ApiError>,
    },
}

const NAME_INPUT_CAP: usize = 32;
const QUERY_INPUT_CAP: usize = 64;
/// Songs shown on the search panel at once
const SONG_LIST_LIMIT: usize = 8;

pub struct FlowController {
    state: AppState,
    api: Arc<dyn ApiService>,
    scene: Arc<dyn SceneLoader>,
    player: Box<dyn VideoPlayer>,

    /// The single outstanding flow task; a second request is ignored while
    /// one is pending
    pending: Option<JoinHandle<TaskOutcome>>,
    /// Retry thunk for the error overlay
    retry: Option<RetryAction>,
    /// One-shot timer for the automatic song fetch after entering a room
    song_delay: Delay,

    profile: Option<Profile>,
    room: Option<LoadedRoom>,
    songs: Vec<Song>,
    current_song: Option<Song>,
    is_playing: bool,

    keyboard_target: KeyboardTarget,
    name_input: String,
    query_input: String,
    /// Inline validation failure shown on the profile panel
    validation_error: Option<NameError>,
    /// Blocking failure with no retry (e.g. a VR session that cannot start)
    unrecoverable: Option<String>,

    /// Latest head pose, used to place overlays at display time
    head: Pose,
    events: Vec<FlowEvent>,
}

impl FlowController {
    pub fn new(
        api: Arc<dyn ApiService>,
        scene: Arc<dyn SceneLoader>,
        player: Box<dyn VideoPlayer>,
    ) -> Self {
        Self {
            state: AppState::Initializing,
            api,
            scene,
            player,
            pending: None,
            retry: None,
            song_delay: Delay::idle(),
            profile: None,
            room: None,
            songs: Vec::new(),
            current_song: None,
            is_playing: false,
            keyboard_target: KeyboardTarget::ProfileName,
            name_input: String::new(),
            query_input: String::new(),
            validation_error: None,
            unrecoverable: None,
            head: Pose::default(),
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors for the rendering layer
    // ------------------------------------------------------------------

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn busy(&self) -> bool {
        self.pending.is_some()
    }

    /// True while something time-driven is outstanding and the frame loop
    /// should keep repainting (a pending task or the armed song fetch).
    pub fn needs_tick(&self) -> bool {
        self.pending.is_some() || self.song_delay.is_armed()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn room(&self) -> Option<&LoadedRoom> {
        self.room.as_ref()
    }

    pub fn current_song(&self) -> Option<&Song> {
        self.current_song.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn retry_action(&self) -> Option<&RetryAction> {
        self.retry.as_ref()
    }

    pub fn unrecoverable(&self) -> Option<&str> {
        self.unrecoverable.as_deref()
    }

    /// Drain effects for the owner to apply.
    pub fn take_events(&mut self) -> Vec<FlowEvent> {
        std::mem::take(&mut self.events)
    }

    /// Make the armed song-fetch delay elapse on the next poll.
    #[cfg(test)]
    fn expire_song_delay(&mut self) {
        if self.song_delay.is_armed() {
            self.song_delay.arm(std::time::Duration::ZERO);
        }
    }

    /// Record the head pose used for overlay placement. Called once per
    /// frame; overlays sample it at display time only.
    pub fn set_head(&mut self, head: Pose) {
        self.head = head;
    }

    // ------------------------------------------------------------------
    // Panel construction
    // ------------------------------------------------------------------

    /// Register every panel this flow drives. Called once at startup.
    pub fn init_panels(&self, registry: &mut PanelRegistry) {
        let tuning = &app_data::client_data().interaction;
        let ahead = pose_in_front(&self.head, tuning.panel_distance);
        let mut below = ahead;
        below.position += Vec3::new(0.0, -0.55, 0.0);

        registry.create_panel(ids::PROFILE, ahead, 1.0, 0.5);
        registry.set_title(ids::PROFILE, "Who's singing?");
        registry.add_button(
            ids::PROFILE,
            Button::new(
                "submit_name",
                ButtonRect::new(0.0, -0.18, 0.4, 0.1),
                "Join",
                ButtonAction::SubmitName,
            ),
        );

        registry.create_panel(ids::ROOMS, ahead, 1.2, 0.8);
        registry.set_title(ids::ROOMS, "Pick a room");
        let rooms = &app_data::room_catalog().rooms;
        for (i, room) in rooms.iter().enumerate() {
            let y = 0.25 - i as f32 * 0.16;
            registry.add_button(
                ids::ROOMS,
                Button::new(
                    &format!("room_{}", room.id),
                    ButtonRect::new(0.0, y, 0.9, 0.13),
                    &room.title,
                    ButtonAction::SelectRoom(room.id.clone()),
                ),
            );
        }

        registry.create_panel(ids::SONGS, ahead, 1.4, 1.0);
        registry.set_title(ids::SONGS, "Pick a song");

        registry.create_panel(ids::PLAYBACK, below, 0.8, 0.25);
        registry.add_button(
            ids::PLAYBACK,
            Button::new(
                "stop",
                ButtonRect::new(-0.2, 0.0, 0.3, 0.12),
                "Stop",
                ButtonAction::Stop,
            ),
        );
        registry.add_button(
            ids::PLAYBACK,
            Button::new(
                "leave",
                ButtonRect::new(0.2, 0.0, 0.3, 0.12),
                "Leave room",
                ButtonAction::Back,
            ),
        );

        registry.create_panel(ids::KEYBOARD, below, 1.2, 0.5);
        for button in keyboard_buttons() {
            registry.add_button(ids::KEYBOARD, button);
        }

        registry.create_overlay(ids::LOADING, 0.8, 0.25, true);
        registry.create_overlay(ids::ERROR, 1.0, 0.5, false);
        registry.set_title(ids::ERROR, "Something went wrong");
        registry.add_button(
            ids::ERROR,
            Button::new(
                "retry",
                ButtonRect::new(-0.22, -0.15, 0.35, 0.1),
                "Retry",
                ButtonAction::Retry,
            ),
        );
        registry.add_button(
            ids::ERROR,
            Button::new(
                "dismiss",
                ButtonRect::new(0.22, -0.15, 0.35, 0.1),
                "Dismiss",
                ButtonAction::DismissError,
            ),
        );
    }

    // ------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------

    /// Begin the user journey: resolve the cached profile id, if any.
    pub fn start(&mut self, registry: &mut PanelRegistry, cached_id: Option<String>) {
        match cached_id {
            None => {
                tracing::info!("No cached profile, starting at name entry");
                self.enter(registry, AppState::ProfileInput);
            }
            Some(id) => {
                self.show_loading(registry, "Loading profile...");
                let api = Arc::clone(&self.api);
                self.pending = Some(tokio::spawn(async move {
                    TaskOutcome::ProfileLookup(api.get_profile(&id).await)
                }));
            }
        }
    }

    /// React to an activated button. The registry resolved which button was
    /// hit; this is the entire action surface of the UI.
    pub fn handle_action(&mut self, registry: &mut PanelRegistry, action: ButtonAction) {
        match action {
            ButtonAction::Key(c) => self.type_char(registry, c),
            ButtonAction::Backspace => self.erase_char(registry),
            ButtonAction::Commit => match self.keyboard_target {
                KeyboardTarget::ProfileName => self.submit_name(registry),
                KeyboardTarget::SongQuery => self.search(registry),
            },
            ButtonAction::SubmitName => self.submit_name(registry),
            ButtonAction::SelectRoom(theme) => self.select_room(registry, &theme),
            ButtonAction::Search => self.search(registry),
            ButtonAction::SelectSong(song_id) => self.select_song(registry, &song_id),
            ButtonAction::Stop => self.stop_playback(registry),
            ButtonAction::Back => self.leave_room(registry),
            ButtonAction::Retry => self.retry(registry),
            ButtonAction::DismissError => self.dismiss_error(registry),
        }
    }

    /// Surface a failure that has no retry path (e.g. the VR session cannot
    /// start). Requires external remediation; input keeps working so the
    /// message stays readable.
    pub fn fail_unrecoverable(&mut self, registry: &mut PanelRegistry, message: &str) {
        tracing::error!("Unrecoverable: {}", message);
        self.unrecoverable = Some(message.to_string());
        self.pending = None;
        registry.hide(ids::LOADING);
        self.place_overlay(registry, ids::ERROR);
        registry.set_body(
            ids::ERROR,
            vec![message.to_string(), "This device cannot continue.".to_string()],
        );
        registry.replace_buttons(ids::ERROR, Vec::new());
        self.enter(registry, AppState::Error);
        registry.show(ids::ERROR);
    }

    // ------------------------------------------------------------------
    // Frame update
    // ------------------------------------------------------------------

    /// Per-frame update: fold player events, poll the outstanding task, and
    /// fire the delayed song fetch.
    pub fn poll(&mut self, registry: &mut PanelRegistry) {
        for event in self.player.poll_events() {
            match event {
                PlayerEvent::Ready => {
                    tracing::debug!("Video ready");
                }
                PlayerEvent::StateChange(playback) => {
                    self.is_playing = playback == PlaybackState::Playing;
                    if playback == PlaybackState::Ended && self.state == AppState::PlayingSong {
                        tracing::info!("Song ended");
                        self.current_song = None;
                        self.enter(registry, AppState::InRoom);
                    }
                }
                PlayerEvent::Error(message) => {
                    let retry = self
                        .current_song
                        .take()
                        .map(|song| RetryAction::LoadVideo { song });
                    self.is_playing = false;
                    self.service_failure(registry, &format!("Playback failed: {}", message), retry);
                }
            }
        }

        match poll_task(&mut self.pending) {
            PollResult::NoTask | PollResult::Pending => {}
            PollResult::Complete(Ok(outcome)) => self.settle(registry, outcome),
            PollResult::Complete(Err(e)) => {
                tracing::error!("Flow task panicked: {}", e);
                self.service_failure(registry, "Internal error", None);
            }
        }

        if self.song_delay.fired() && self.state == AppState::InRoom && self.pending.is_none() {
            if let Some(theme) = self.room.as_ref().map(|r| r.theme.clone()) {
                self.fetch_songs(registry, &theme);
            }
        }
    }

    // ------------------------------------------------------------------
    // User actions
    // ------------------------------------------------------------------

    fn type_char(&mut self, registry: &mut PanelRegistry, c: char) {
        match self.keyboard_target {
            KeyboardTarget::ProfileName => {
                if self.name_input.chars().count() < NAME_INPUT_CAP {
                    self.name_input.push(c);
                }
                self.validation_error = None;
                self.refresh_profile_panel(registry);
            }
            KeyboardTarget::SongQuery => {
                if self.query_input.chars().count() < QUERY_INPUT_CAP {
                    self.query_input.push(c);
                }
                self.refresh_songs_panel(registry);
            }
        }
    }

    fn erase_char(&mut self, registry: &mut PanelRegistry) {
        match self.keyboard_target {
            KeyboardTarget::ProfileName => {
                self.name_input.pop();
                self.validation_error = None;
                self.refresh_profile_panel(registry);
            }
            KeyboardTarget::SongQuery => {
                self.query_input.pop();
                self.refresh_songs_panel(registry);
            }
        }
    }

    fn submit_name(&mut self, registry: &mut PanelRegistry) {
        if self.state != AppState::ProfileInput || self.pending.is_some() {
            return;
        }
        match api::validate_display_name(&self.name_input) {
            Err(e) => {
                // Local failure: no network call, state unchanged
                self.validation_error = Some(e);
                self.refresh_profile_panel(registry);
            }
            Ok(trimmed) => {
                self.validation_error = None;
                let name = trimmed.to_string();
                self.create_profile(registry, &name);
            }
        }
    }

    fn select_room(&mut self, registry: &mut PanelRegistry, theme: &str) {
        if self.state != AppState::RoomSelection || self.pending.is_some() {
            return;
        }
        self.load_room(registry, theme);
    }

    fn search(&mut self, registry: &mut PanelRegistry) {
        if self.state != AppState::SongSearch || self.pending.is_some() {
            return;
        }
        let query = self.query_input.trim().to_string();
        if query.is_empty() {
            return;
        }
        self.search_songs(registry, &query);
    }

    fn select_song(&mut self, registry: &mut PanelRegistry, song_id: &str) {
        if self.state != AppState::SongSearch {
            return;
        }
        let Some(song) = self.songs.iter().find(|s| s.id == song_id).cloned() else {
            tracing::warn!("Selected unknown song '{}'", song_id);
            return;
        };
        self.load_video(registry, song);
    }

    fn stop_playback(&mut self, registry: &mut PanelRegistry) {
        if self.state != AppState::PlayingSong {
            return;
        }
        self.player.stop();
        self.is_playing = false;
        self.current_song = None;
        self.enter(registry, AppState::InRoom);
    }

    /// Back out of the room entirely: stop any video, unload the scene, and
    /// return to room selection.
    fn leave_room(&mut self, registry: &mut PanelRegistry) {
        self.player.stop();
        self.is_playing = false;
        self.current_song = None;
        self.scene.unload();
        self.room = None;
        self.songs.clear();
        self.query_input.clear();
        self.enter(registry, AppState::RoomSelection);
    }

    fn retry(&mut self, registry: &mut PanelRegistry) {
        // Taking the thunk clears it; a failed retry stores a fresh one
        let Some(action) = self.retry.take() else {
            self.dismiss_error(registry);
            return;
        };
        registry.hide(ids::ERROR);
        tracing::info!("Retrying {:?}", action);
        match action {
            RetryAction::CreateProfile { name } => self.create_profile(registry, &name),
            RetryAction::LoadRoom { theme } => self.load_room(registry, &theme),
            RetryAction::FetchSongs { theme } => self.fetch_songs(registry, &theme),
            RetryAction::SearchSongs { query } => self.search_songs(registry, &query),
            RetryAction::LoadVideo { song } => self.load_video(registry, song),
        }
    }

    /// Dismiss routes back to the panel the failure originated from: a
    /// failed profile create returns to name entry (there is no profile to
    /// proceed with); with a room loaded it returns to the song list;
    /// otherwise to room selection.
    fn dismiss_error(&mut self, registry: &mut PanelRegistry) {
        let origin = self.retry.take();
        registry.hide(ids::ERROR);
        let target = match origin {
            Some(RetryAction::CreateProfile { .. }) => AppState::ProfileInput,
            _ if self.room.is_some() => AppState::SongSearch,
            _ => AppState::RoomSelection,
        };
        self.enter(registry, target);
    }

    // ------------------------------------------------------------------
    // Service calls
    // ------------------------------------------------------------------

    fn create_profile(&mut self, registry: &mut PanelRegistry, name: &str) {
        self.show_loading(registry, "Creating profile...");
        let api = Arc::clone(&self.api);
        let name = name.to_string();
        self.pending = Some(tokio::spawn(async move {
            let result = api.create_profile(&name).await;
            TaskOutcome::ProfileCreated { name, result }
        }));
    }

    fn load_room(&mut self, registry: &mut PanelRegistry, theme: &str) {
        self.enter(registry, AppState::LoadingRoom);
        self.show_loading(registry, "Loading room...");
        let scene = Arc::clone(&self.scene);
        let theme = theme.to_string();
        self.pending = Some(tokio::spawn(async move {
            let result = scene.load_room(&theme).await;
            TaskOutcome::RoomLoaded { theme, result }
        }));
    }

    fn fetch_songs(&mut self, registry: &mut PanelRegistry, theme: &str) {
        self.show_loading(registry, "Loading songs...");
        let api = Arc::clone(&self.api);
        let theme = theme.to_string();
        self.pending = Some(tokio::spawn(async move {
            let result = api.list_songs(Some(&theme)).await;
            TaskOutcome::SongsFetched { theme, result }
        }));
    }

    fn search_songs(&mut self, registry: &mut PanelRegistry, query: &str) {
        self.show_loading(registry, "Searching...");
        let api = Arc::clone(&self.api);
        let query = query.to_string();
        self.pending = Some(tokio::spawn(async move {
            let result = api.search_songs(&query).await;
            TaskOutcome::SearchDone { query, result }
        }));
    }

    /// Video load is synchronous against the player seam; failure raises
    /// the error overlay like any other service call.
    fn load_video(&mut self, registry: &mut PanelRegistry, song: Song) {
        match self.player.load(&song.youtube_id) {
            Ok(()) => {
                self.player.play();
                tracing::info!("Playing '{}' by {}", song.title, song.artist);
                self.current_song = Some(song);
                self.enter(registry, AppState::PlayingSong);
            }
            Err(e) => {
                self.service_failure(
                    registry,
                    &e.to_string(),
                    Some(RetryAction::LoadVideo { song }),
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Task settlement
    // ------------------------------------------------------------------

    fn settle(&mut self, registry: &mut PanelRegistry, outcome: TaskOutcome) {
        // The overlay is cleared before any transition happens
        registry.hide(ids::LOADING);

        match outcome {
            TaskOutcome::ProfileLookup(Ok(profile)) => {
                tracing::info!("Welcome back, {}", profile.display_name);
                self.profile = Some(profile);
                self.enter(registry, AppState::RoomSelection);
            }
            TaskOutcome::ProfileLookup(Err(e)) => {
                // A stale cached id is discarded, not surfaced as an error
                tracing::warn!("Cached profile lookup failed: {}", e);
                if matches!(e, ApiError::NotFound) {
                    self.events.push(FlowEvent::ClearCachedProfile);
                }
                self.enter(registry, AppState::ProfileInput);
            }
            TaskOutcome::ProfileCreated { result: Ok(profile), .. } => {
                self.events.push(FlowEvent::CacheProfileId(profile.id.clone()));
                self.profile = Some(profile);
                self.enter(registry, AppState::RoomSelection);
            }
            TaskOutcome::ProfileCreated { name, result: Err(e) } => {
                self.service_failure(
                    registry,
                    &format!("Could not create profile: {}", e),
                    Some(RetryAction::CreateProfile { name }),
                );
            }
            TaskOutcome::RoomLoaded { theme, result: Ok(anchors) } => {
                tracing::info!("Entered room '{}'", theme);
                self.room = Some(LoadedRoom { theme, anchors });
                self.enter(registry, AppState::InRoom);
            }
            TaskOutcome::RoomLoaded { theme, result: Err(e) } => {
                self.service_failure(
                    registry,
                    &format!("Could not load room: {}", e),
                    Some(RetryAction::LoadRoom { theme }),
                );
            }
            TaskOutcome::SongsFetched { result: Ok(page), .. } => {
                self.songs = page.songs;
                self.enter(registry, AppState::SongSearch);
                self.rebuild_song_list(registry);
            }
            TaskOutcome::SongsFetched { theme, result: Err(e) } => {
                self.service_failure(
                    registry,
                    &format!("Could not load songs: {}", e),
                    Some(RetryAction::FetchSongs { theme }),
                );
            }
            TaskOutcome::SearchDone { result: Ok(page), .. } => {
                self.songs = page.songs;
                self.enter(registry, AppState::SongSearch);
                self.rebuild_song_list(registry);
            }
            TaskOutcome::SearchDone { query, result: Err(e) } => {
                self.service_failure(
                    registry,
                    &format!("Search failed: {}", e),
                    Some(RetryAction::SearchSongs { query }),
                );
            }
        }
    }

    /// A failed service call: store the retry thunk and raise the error
    /// overlay in front of the user's current view.
    fn service_failure(
        &mut self,
        registry: &mut PanelRegistry,
        message: &str,
        retry: Option<RetryAction>,
    ) {
        tracing::error!("Service failure: {}", message);
        registry.hide(ids::LOADING);
        self.retry = retry;
        self.enter(registry, AppState::Error);
        self.place_overlay(registry, ids::ERROR);
        registry.set_body(ids::ERROR, vec![message.to_string()]);
        registry.show(ids::ERROR);
    }

    // ------------------------------------------------------------------
    // Panels
    // ------------------------------------------------------------------

    /// Switch state: hide every main panel, then show the new state's
    /// panel(s). Overlays are managed by their own call sites.
    fn enter(&mut self, registry: &mut PanelRegistry, state: AppState) {
        registry.hide_all();
        self.song_delay.cancel();

        match state {
            AppState::Initializing | AppState::LoadingRoom | AppState::Error => {}
            AppState::ProfileInput => {
                self.keyboard_target = KeyboardTarget::ProfileName;
                self.refresh_profile_panel(registry);
                registry.show(ids::PROFILE);
                registry.show(ids::KEYBOARD);
            }
            AppState::RoomSelection => {
                registry.show(ids::ROOMS);
            }
            AppState::InRoom => {
                // The song list arrives automatically after a beat
                let delay = app_data::client_data().flow.song_fetch_delay_ms;
                self.song_delay.arm(std::time::Duration::from_millis(delay));
            }
            AppState::SongSearch => {
                self.keyboard_target = KeyboardTarget::SongQuery;
                self.refresh_songs_panel(registry);
                registry.show(ids::SONGS);
                registry.show(ids::KEYBOARD);
            }
            AppState::PlayingSong => {
                registry.show(ids::PLAYBACK);
            }
        }

        tracing::debug!("State {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn show_loading(&mut self, registry: &mut PanelRegistry, label: &str) {
        self.place_overlay(registry, ids::LOADING);
        registry.set_body(ids::LOADING, vec![label.to_string()]);
        registry.show(ids::LOADING);
    }

    /// Overlays are placed straight ahead of the head as it is right now;
    /// they do not follow the head afterwards.
    fn place_overlay(&self, registry: &mut PanelRegistry, id: &str) {
        let distance = app_data::client_data().interaction.overlay_distance;
        registry.set_anchor(id, pose_in_front(&self.head, distance));
    }

    fn refresh_profile_panel(&self, registry: &mut PanelRegistry) {
        let mut body = vec![format!("Name: {}_", self.name_input)];
        if let Some(e) = &self.validation_error {
            body.push(e.to_string());
        }
        registry.set_body(ids::PROFILE, body);
    }

    fn refresh_songs_panel(&self, registry: &mut PanelRegistry) {
        registry.set_body(ids::SONGS, vec![format!("Search: {}_", self.query_input)]);
    }

    /// Rebuild the song panel's button set from the current list.
    fn rebuild_song_list(&self, registry: &mut PanelRegistry) {
        let mut buttons = vec![Button::new(
            "search",
            ButtonRect::new(0.55, 0.42, 0.25, 0.08),
            "Search",
            ButtonAction::Search,
        )];

        for (i, song) in self.songs.iter().take(SONG_LIST_LIMIT).enumerate() {
            let y = 0.3 - i as f32 * 0.09;
            buttons.push(Button::new(
                &format!("song_{}", song.id),
                ButtonRect::new(0.0, y, 1.2, 0.08),
                &format!("{} — {}", song.title, song.artist),
                ButtonAction::SelectSong(song.id.clone()),
            ));
        }

        buttons.push(Button::new(
            "back",
            ButtonRect::new(-0.55, -0.45, 0.25, 0.08),
            "Back",
            ButtonAction::Back,
        ));

        registry.replace_buttons(ids::SONGS, buttons);
    }
}

/// Build the shared keyboard panel's buttons from the embedded layout.
fn keyboard_buttons() -> Vec<Button> {
    let layout = &app_data::client_data().keyboard;
    let pitch = layout.key_size + layout.key_gap;
    let mut buttons = Vec::new();

    for (row_idx, row) in layout.rows.iter().enumerate() {
        let count = row.chars().count();
        let row_width = count as f32 * pitch;
        let y = 0.18 - row_idx as f32 * pitch;
        for (col, c) in row.chars().enumerate() {
            let x = -row_width * 0.5 + (col as f32 + 0.5) * pitch;
            buttons.push(Button::new(
                &format!("key_{}", c),
                ButtonRect::new(x, y, layout.key_size, layout.key_size),
                &c.to_string(),
                ButtonAction::Key(c),
            ));
        }
    }

    let bottom = 0.18 - layout.rows.len() as f32 * pitch;
    buttons.push(Button::new(
        "key_space",
        ButtonRect::new(-0.1, bottom, 0.4, layout.key_size),
        "space",
        ButtonAction::Key(' '),
    ));
    buttons.push(Button::new(
        "key_backspace",
        ButtonRect::new(0.25, bottom, 0.2, layout.key_size),
        "⌫",
        ButtonAction::Backspace,
    ));
    buttons.push(Button::new(
        "key_enter",
        ButtonRect::new(0.45, bottom, 0.15, layout.key_size),
        "↵",
        ButtonAction::Commit,
    ));

    buttons
}
