//! Spatial UI panels and ray hit-testing.
//!
//! A panel is a named quad in world space carrying buttons on its local XY
//! plane. The registry owns every panel, answers hit-tests against the
//! buttons of visible panels, and tracks per-button hover/press state.
//!
//! Buttons carry a typed `ButtonAction` instead of callbacks; whoever routes
//! input hands the activated action to the flow controller.

use glam::{Vec2, Vec3};

use crate::spatial::{Pose, Ray};

/// Well-known panel ids
pub mod ids {
    pub const PROFILE: &str = "profile";
    pub const ROOMS: &str = "rooms";
    pub const SONGS: &str = "songs";
    pub const KEYBOARD: &str = "keyboard";
    pub const PLAYBACK: &str = "playback";
    pub const LOADING: &str = "loading";
    pub const ERROR: &str = "error";
}

/// What pressing a button means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Type a character into the active text buffer
    Key(char),
    Backspace,
    /// Keyboard enter: commits the active text buffer (submit or search,
    /// depending on the keyboard target)
    Commit,
    /// Submit the profile name buffer
    SubmitName,
    /// Enter the room with the given theme id
    SelectRoom(String),
    /// Run a free-text song search with the current query buffer
    Search,
    /// Play the song with the given catalog id
    SelectSong(String),
    /// Stop playback, stay in the room
    Stop,
    /// Leave the room back to room selection
    Back,
    Retry,
    DismissError,
}

/// Per-button interaction state: `Idle -> Hovered -> Pressed -> Hovered ->
/// Idle`, driven by hit-tests and press/release edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    Hovered,
    Pressed,
}

/// Axis-aligned rectangle in panel-local meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonRect {
    pub center: Vec2,
    pub size: Vec2,
}

impl ButtonRect {
    pub fn new(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            center: Vec2::new(cx, cy),
            size: Vec2::new(w, h),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.size * 0.5;
        (point.x - self.center.x).abs() <= half.x && (point.y - self.center.y).abs() <= half.y
    }
}

/// An interactive region on a panel.
#[derive(Debug, Clone)]
pub struct Button {
    pub id: String,
    pub rect: ButtonRect,
    pub label: String,
    pub action: ButtonAction,
    pub state: ButtonState,
}

impl Button {
    pub fn new(id: &str, rect: ButtonRect, label: &str, action: ButtonAction) -> Self {
        Self {
            id: id.to_string(),
            rect,
            label: label.to_string(),
            action,
            state: ButtonState::Idle,
        }
    }
}

/// A named group of buttons shown/hidden as a unit.
#[derive(Debug)]
pub struct Panel {
    pub id: String,
    pub anchor: Pose,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
    /// Overlays coexist with main panels and survive `hide_all`
    pub overlay: bool,
    /// A visible panel with this flag suppresses all input routing
    /// (the loading overlay; it has no buttons of its own)
    pub blocks_input: bool,
    /// Optional heading painted above the buttons
    pub title: String,
    /// Free-form text lines painted on the panel (error message, input echo)
    pub body: Vec<String>,
    pub buttons: Vec<Button>,
}

/// Result of a successful hit-test.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub panel_id: String,
    pub button_id: String,
    /// Distance along the ray to the intersection
    pub distance: f32,
}

/// Owns the panel set; the sole mutator of hover/press flags.
#[derive(Debug, Default)]
pub struct PanelRegistry {
    panels: Vec<Panel>,
    /// Currently hovered button as (panel index, button index)
    hovered: Option<(usize, usize)>,
    /// Visibility operations in call order, for transition tests
    #[cfg(test)]
    pub journal: Vec<String>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a main panel, initially hidden. Replaces any previous panel
    /// with the same id.
    pub fn create_panel(&mut self, id: &str, anchor: Pose, width: f32, height: f32) {
        self.insert(Panel {
            id: id.to_string(),
            anchor,
            width,
            height,
            visible: false,
            overlay: false,
            blocks_input: false,
            title: String::new(),
            body: Vec::new(),
            buttons: Vec::new(),
        });
    }

    /// Register an overlay panel. Overlays survive `hide_all`; one with
    /// `blocks_input` suppresses routing while visible.
    pub fn create_overlay(&mut self, id: &str, width: f32, height: f32, blocks_input: bool) {
        self.insert(Panel {
            id: id.to_string(),
            anchor: Pose::default(),
            width,
            height,
            visible: false,
            overlay: true,
            blocks_input,
            title: String::new(),
            body: Vec::new(),
            buttons: Vec::new(),
        });
    }

    fn insert(&mut self, panel: Panel) {
        self.hovered = None;
        if let Some(existing) = self.panels.iter_mut().find(|p| p.id == panel.id) {
            *existing = panel;
        } else {
            self.panels.push(panel);
        }
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.panels.iter().position(|p| p.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn add_button(&mut self, panel_id: &str, button: Button) {
        if let Some(panel) = self.panels.iter_mut().find(|p| p.id == panel_id) {
            panel.buttons.push(button);
        } else {
            tracing::warn!("add_button: no panel '{}'", panel_id);
        }
    }

    /// Swap out a panel's button set (the song list is rebuilt per fetch).
    /// Clears any hover pointing into the old set.
    pub fn replace_buttons(&mut self, panel_id: &str, buttons: Vec<Button>) {
        let Some(idx) = self.index_of(panel_id) else {
            tracing::warn!("replace_buttons: no panel '{}'", panel_id);
            return;
        };
        if matches!(self.hovered, Some((p, _)) if p == idx) {
            self.hovered = None;
        }
        self.panels[idx].buttons = buttons;
    }

    pub fn set_anchor(&mut self, panel_id: &str, anchor: Pose) {
        if let Some(panel) = self.panels.iter_mut().find(|p| p.id == panel_id) {
            panel.anchor = anchor;
        }
    }

    pub fn set_title(&mut self, panel_id: &str, title: &str) {
        if let Some(panel) = self.panels.iter_mut().find(|p| p.id == panel_id) {
            panel.title = title.to_string();
        }
    }

    pub fn set_body(&mut self, panel_id: &str, body: Vec<String>) {
        if let Some(panel) = self.panels.iter_mut().find(|p| p.id == panel_id) {
            panel.body = body;
        }
    }

    pub fn show(&mut self, id: &str) {
        #[cfg(test)]
        self.journal.push(format!("show:{}", id));
        if let Some(panel) = self.panels.iter_mut().find(|p| p.id == id) {
            panel.visible = true;
        } else {
            tracing::warn!("show: no panel '{}'", id);
        }
    }

    /// Hide a panel. Idempotent; hiding an already-hidden or unknown panel
    /// is a no-op.
    pub fn hide(&mut self, id: &str) {
        #[cfg(test)]
        self.journal.push(format!("hide:{}", id));
        if let Some(idx) = self.index_of(id) {
            self.panels[idx].visible = false;
            self.clear_interaction(idx);
        }
    }

    /// Hide every main panel. Overlays are untouched. Idempotent.
    pub fn hide_all(&mut self) {
        #[cfg(test)]
        self.journal.push("hide_all".to_string());
        for idx in 0..self.panels.len() {
            if !self.panels[idx].overlay && self.panels[idx].visible {
                self.panels[idx].visible = false;
                self.clear_interaction(idx);
            }
        }
    }

    fn clear_interaction(&mut self, panel_idx: usize) {
        for button in &mut self.panels[panel_idx].buttons {
            button.state = ButtonState::Idle;
        }
        if matches!(self.hovered, Some((p, _)) if p == panel_idx) {
            self.hovered = None;
        }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.get(id).map(|p| p.visible).unwrap_or(false)
    }

    /// Ids of visible non-overlay panels. The flow controller hides
    /// everything before each show, so this holds at most the current
    /// state's panel plus its keyboard companion.
    pub fn visible_main_panels(&self) -> Vec<&str> {
        self.panels
            .iter()
            .filter(|p| p.visible && !p.overlay)
            .map(|p| p.id.as_str())
            .collect()
    }

    /// True while a visible overlay suppresses input routing.
    pub fn input_locked(&self) -> bool {
        self.panels.iter().any(|p| p.visible && p.blocks_input)
    }

    /// Intersect a pointer ray against every button of every visible panel.
    ///
    /// The nearest hit along the ray wins. As a side effect the previous
    /// hover is reset and the new one set; a pressed button that is still
    /// under the ray stays pressed.
    pub fn hit_test(&mut self, ray: &Ray) -> Option<Hit> {
        let mut best: Option<(usize, usize, f32)> = None;

        for (pi, panel) in self.panels.iter().enumerate() {
            if !panel.visible {
                continue;
            }
            let Some((local, t)) = intersect_panel_plane(&panel.anchor, ray) else {
                continue;
            };
            for (bi, button) in panel.buttons.iter().enumerate() {
                if button.rect.contains(local) {
                    match best {
                        Some((_, _, best_t)) if best_t <= t => {}
                        _ => best = Some((pi, bi, t)),
                    }
                }
            }
        }

        let next = best.map(|(pi, bi, _)| (pi, bi));
        if self.hovered != next {
            if let Some((pi, bi)) = self.hovered {
                self.panels[pi].buttons[bi].state = ButtonState::Idle;
            }
            if let Some((pi, bi)) = next {
                self.panels[pi].buttons[bi].state = ButtonState::Hovered;
            }
            self.hovered = next;
        }

        best.map(|(pi, bi, t)| Hit {
            panel_id: self.panels[pi].id.clone(),
            button_id: self.panels[pi].buttons[bi].id.clone(),
            distance: t,
        })
    }

    /// Press edge: mark the hovered button pressed and return its action.
    /// Returns `None` when nothing is hovered.
    pub fn activate_hovered(&mut self) -> Option<ButtonAction> {
        let (pi, bi) = self.hovered?;
        let button = &mut self.panels[pi].buttons[bi];
        button.state = ButtonState::Pressed;
        Some(button.action.clone())
    }

    /// Release edge: a pressed button drops back to hovered.
    pub fn release(&mut self) {
        if let Some((pi, bi)) = self.hovered {
            let button = &mut self.panels[pi].buttons[bi];
            if button.state == ButtonState::Pressed {
                button.state = ButtonState::Hovered;
            }
        }
    }

    pub fn hovered_state(&self) -> Option<ButtonState> {
        self.hovered.map(|(pi, bi)| self.panels[pi].buttons[bi].state)
    }
}

/// Intersect a ray with a panel's local XY plane.
///
/// Returns the panel-local intersection point and the distance along the
/// ray, or `None` when the ray is parallel to the plane or the intersection
/// lies behind the origin.
fn intersect_panel_plane(anchor: &Pose, ray: &Ray) -> Option<(Vec2, f32)> {
    let local_origin = anchor.inverse_transform_point(ray.origin);
    let local_dir = anchor.orientation.inverse() * ray.direction;

    if local_dir.z.abs() < 1e-6 {
        return None;
    }
    let t = -local_origin.z / local_dir.z;
    if t <= 0.0 {
        return None;
    }

    let point: Vec3 = local_origin + local_dir * t;
    Some((Vec2::new(point.x, point.y), t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    /// Panel 1m x 1m facing the origin from z = -2.
    fn registry_with_panel() -> PanelRegistry {
        let mut registry = PanelRegistry::new();
        let anchor = Pose::new(Vec3::new(0.0, 0.0, -2.0), Quat::IDENTITY);
        registry.create_panel("test", anchor, 1.0, 1.0);
        registry
    }

    fn forward_ray() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::NEG_Z)
    }

    #[test]
    fn hit_test_finds_button_under_ray() {
        let mut registry = registry_with_panel();
        registry.add_button(
            "test",
            Button::new(
                "ok",
                ButtonRect::new(0.0, 0.0, 0.2, 0.1),
                "OK",
                ButtonAction::SubmitName,
            ),
        );
        registry.show("test");

        let hit = registry.hit_test(&forward_ray()).unwrap();
        assert_eq!(hit.button_id, "ok");
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert_eq!(registry.hovered_state(), Some(ButtonState::Hovered));
    }

    #[test]
    fn hidden_panels_are_not_hit() {
        let mut registry = registry_with_panel();
        registry.add_button(
            "test",
            Button::new(
                "ok",
                ButtonRect::new(0.0, 0.0, 0.2, 0.1),
                "OK",
                ButtonAction::SubmitName,
            ),
        );
        assert!(registry.hit_test(&forward_ray()).is_none());
    }

    #[test]
    fn nearest_of_overlapping_buttons_wins() {
        let mut registry = PanelRegistry::new();
        let near = Pose::new(Vec3::new(0.0, 0.0, -1.0), Quat::IDENTITY);
        let far = Pose::new(Vec3::new(0.0, 0.0, -3.0), Quat::IDENTITY);
        registry.create_panel("near", near, 1.0, 1.0);
        registry.create_panel("far", far, 1.0, 1.0);
        let rect = ButtonRect::new(0.0, 0.0, 0.5, 0.5);
        registry.add_button("far", Button::new("far_btn", rect, "", ButtonAction::Back));
        registry.add_button("near", Button::new("near_btn", rect, "", ButtonAction::Stop));
        registry.show("near");
        registry.show("far");

        let hit = registry.hit_test(&forward_ray()).unwrap();
        assert_eq!(hit.button_id, "near_btn");
        assert!((hit.distance - 1.0).abs() < 1e-5);
    }

    #[test]
    fn hover_moves_between_buttons() {
        let mut registry = registry_with_panel();
        registry.add_button(
            "test",
            Button::new(
                "left",
                ButtonRect::new(-0.3, 0.0, 0.2, 0.2),
                "",
                ButtonAction::Back,
            ),
        );
        registry.add_button(
            "test",
            Button::new(
                "right",
                ButtonRect::new(0.3, 0.0, 0.2, 0.2),
                "",
                ButtonAction::Stop,
            ),
        );
        registry.show("test");

        let toward_left = Ray::new(Vec3::ZERO, Vec3::new(-0.3, 0.0, -2.0));
        let toward_right = Ray::new(Vec3::ZERO, Vec3::new(0.3, 0.0, -2.0));

        let hit = registry.hit_test(&toward_left).unwrap();
        assert_eq!(hit.button_id, "left");
        let hit = registry.hit_test(&toward_right).unwrap();
        assert_eq!(hit.button_id, "right");
        // Old hover was reset
        let panel = registry.get("test").unwrap();
        assert_eq!(panel.buttons[0].state, ButtonState::Idle);
        assert_eq!(panel.buttons[1].state, ButtonState::Hovered);
    }

    #[test]
    fn press_release_cycle() {
        let mut registry = registry_with_panel();
        registry.add_button(
            "test",
            Button::new(
                "ok",
                ButtonRect::new(0.0, 0.0, 0.2, 0.1),
                "",
                ButtonAction::Retry,
            ),
        );
        registry.show("test");
        registry.hit_test(&forward_ray());

        let action = registry.activate_hovered();
        assert_eq!(action, Some(ButtonAction::Retry));
        assert_eq!(registry.hovered_state(), Some(ButtonState::Pressed));

        // Still under the ray while held: stays pressed, no re-fire
        registry.hit_test(&forward_ray());
        assert_eq!(registry.hovered_state(), Some(ButtonState::Pressed));

        registry.release();
        assert_eq!(registry.hovered_state(), Some(ButtonState::Hovered));
    }

    #[test]
    fn activate_without_hover_returns_none() {
        let mut registry = registry_with_panel();
        registry.show("test");
        assert_eq!(registry.activate_hovered(), None);
    }

    #[test]
    fn hide_is_idempotent() {
        let mut registry = registry_with_panel();
        registry.show("test");
        registry.hide("test");
        assert!(!registry.is_visible("test"));
        registry.hide("test");
        assert!(!registry.is_visible("test"));
        // Unknown id is a no-op too
        registry.hide("nope");
    }

    #[test]
    fn hide_all_skips_overlays_and_is_safe_when_empty() {
        let mut registry = registry_with_panel();
        registry.create_overlay("loading", 0.8, 0.3, true);
        registry.show("test");
        registry.show("loading");

        registry.hide_all();
        assert!(!registry.is_visible("test"));
        assert!(registry.is_visible("loading"));

        // Nothing visible left to hide
        registry.hide("loading");
        registry.hide_all();
        assert!(registry.visible_main_panels().is_empty());
    }

    #[test]
    fn input_locked_tracks_blocking_overlay() {
        let mut registry = registry_with_panel();
        registry.create_overlay("loading", 0.8, 0.3, true);
        registry.create_overlay("error", 0.8, 0.5, false);
        assert!(!registry.input_locked());
        registry.show("error");
        assert!(!registry.input_locked());
        registry.show("loading");
        assert!(registry.input_locked());
    }

    #[test]
    fn replace_buttons_clears_stale_hover() {
        let mut registry = registry_with_panel();
        registry.add_button(
            "test",
            Button::new(
                "old",
                ButtonRect::new(0.0, 0.0, 0.5, 0.5),
                "",
                ButtonAction::Back,
            ),
        );
        registry.show("test");
        registry.hit_test(&forward_ray());
        assert!(registry.hovered_state().is_some());

        registry.replace_buttons("test", Vec::new());
        assert!(registry.hovered_state().is_none());
        assert_eq!(registry.activate_hovered(), None);
    }

    #[test]
    fn ray_from_behind_does_not_hit() {
        let mut registry = registry_with_panel();
        registry.add_button(
            "test",
            Button::new(
                "ok",
                ButtonRect::new(0.0, 0.0, 0.5, 0.5),
                "",
                ButtonAction::Back,
            ),
        );
        registry.show("test");
        // Pointing away from the panel
        let away = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(registry.hit_test(&away).is_none());
    }
}
