use eframe::egui;
use glam::{Vec2, Vec3};
use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::flow::{AppState, FlowController, FlowEvent};
use crate::input::{InputRouter, MouseSnapshot, PointerEvent, VrSnapshot};
use crate::panel::PanelRegistry;
use crate::scene::LocalSceneLoader;
use crate::spatial::Pose;
use crate::ui::{self, Theme};
use crate::video::BrowserPlayer;

/// Standing eye height for the desktop camera
const EYE_HEIGHT: f32 = 1.6;

/// Main application: owns the flow controller, panel registry and input
/// router, and drives them from the eframe update callback.
pub struct EncoreApp {
    config: Config,
    flow: FlowController,
    registry: PanelRegistry,
    router: InputRouter,
    /// Head pose; on the desktop this is a fixed standing camera
    camera: Pose,
}

impl EncoreApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        // Load configuration
        let config = Config::load().unwrap_or_default();

        let api = ApiClient::new(&config.api.base_url).expect("Failed to create HTTP client");
        let scene = LocalSceneLoader::new();
        let player = BrowserPlayer::new();

        let camera = Pose::new(Vec3::new(0.0, EYE_HEIGHT, 0.0), glam::Quat::IDENTITY);

        let mut flow = FlowController::new(Arc::new(api), Arc::new(scene), Box::new(player));
        flow.set_head(camera);

        let mut registry = PanelRegistry::new();
        flow.init_panels(&mut registry);

        // Resume the journey from the cached profile, if any
        let cached = config.session.profile_id.clone();
        flow.start(&mut registry, cached);

        Self {
            config,
            flow,
            registry,
            router: InputRouter::new(),
            camera,
        }
    }

    /// Snapshot of the active VR session's controllers. The desktop build
    /// has no XR runtime, so this is always `None` and input falls back to
    /// the mouse modality.
    fn vr_snapshot(&self) -> Option<VrSnapshot> {
        None
    }

    /// Apply effects the flow controller asked for.
    fn apply_flow_events(&mut self) {
        for event in self.flow.take_events() {
            match event {
                FlowEvent::CacheProfileId(id) => {
                    self.config.session.profile_id = Some(id);
                    self.save_config();
                }
                FlowEvent::ClearCachedProfile => {
                    self.config.session.profile_id = None;
                    self.save_config();
                }
            }
        }
    }

    /// Save configuration to disk
    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    /// Route this frame's input to the panels. Suppressed entirely while
    /// the loading overlay is up so clicks cannot leak through to panels
    /// hidden underneath it.
    fn route_input(&mut self, ctx: &egui::Context, viewport: egui::Rect) {
        if self.registry.input_locked() {
            return;
        }

        let vr = if self.config.input.prefer_vr {
            self.vr_snapshot()
        } else {
            None
        };
        let event: Option<PointerEvent> = match vr {
            Some(snapshot) => self.router.route_vr(&snapshot),
            None => ctx.input(|i| {
                i.pointer.latest_pos().map(|pos| {
                    let snapshot = MouseSnapshot {
                        position: Vec2::new(pos.x, pos.y),
                        viewport: Vec2::new(viewport.width(), viewport.height()),
                        clicked: i.pointer.primary_pressed(),
                        released: i.pointer.primary_released(),
                    };
                    self.router.route_mouse(&self.camera, &snapshot)
                })
            }),
        };

        let Some(event) = event else {
            return;
        };

        self.registry.hit_test(&event.ray);
        if event.pressed {
            if let Some(action) = self.registry.activate_hovered() {
                self.flow.handle_action(&mut self.registry, action);
            }
        }
        if event.released {
            self.registry.release();
        }
    }

    fn status_line(&self) -> String {
        if let Some(message) = self.flow.unrecoverable() {
            return format!("Fatal: {}", message);
        }
        let who = self
            .flow
            .profile()
            .map(|p| p.display_name.clone())
            .unwrap_or_else(|| "guest".to_string());
        match self.flow.state() {
            AppState::Initializing => "Starting...".to_string(),
            AppState::ProfileInput => "Enter your name".to_string(),
            AppState::RoomSelection => format!("{} — pick a room", who),
            AppState::LoadingRoom => "Loading room...".to_string(),
            AppState::InRoom => {
                let theme = self.flow.room().map(|r| r.theme.as_str()).unwrap_or("?");
                format!("{} — in the {} room", who, theme)
            }
            AppState::SongSearch => format!("{} — pick a song", who),
            AppState::PlayingSong => {
                let title = self
                    .flow
                    .current_song()
                    .map(|s| s.title.as_str())
                    .unwrap_or("?");
                if self.flow.is_playing() {
                    format!("Now playing: {}", title)
                } else {
                    format!("Paused: {}", title)
                }
            }
            AppState::Error => "Error".to_string(),
        }
    }

    fn theme(&self) -> Theme {
        match self
            .flow
            .room()
            .and_then(|r| crate::app_data::room_by_id(&r.theme))
        {
            Some(room) => Theme::with_accent(room.accent),
            None => Theme::default(),
        }
    }
}

impl eframe::App for EncoreApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Advance the state machine: player events, pending task, timers
        self.flow.set_head(self.camera);
        self.flow.poll(&mut self.registry);
        self.apply_flow_events();

        if self.flow.needs_tick() {
            ctx.request_repaint();
        }

        // Status bar at bottom
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status_line());
                if self.flow.busy() {
                    ui.spinner();
                }
            });
        });

        let theme = self.theme();
        egui::CentralPanel::default().show(ctx, |ui| {
            let viewport = ui.max_rect();
            self.route_input(ctx, viewport);
            ui::draw_panels(ui.painter(), &self.camera, viewport, &self.registry, &theme);
        });
    }
}
