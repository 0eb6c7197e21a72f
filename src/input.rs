//! Input routing: VR controllers and desktop mouse normalized into one
//! pointer-ray + activate-edge contract.
//!
//! Only one modality is active per frame; the app picks VR when a session
//! exists and mouse otherwise. Trigger edges are computed by diffing the
//! current controller snapshot against the previous one, keyed by controller
//! id, so repeat-fire while held is impossible and controllers may appear
//! or disappear between frames.

use glam::Vec2;
use std::collections::HashMap;

use crate::app_data;
use crate::spatial::{Pose, Ray};

/// One tracked controller in a frame snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ControllerState {
    /// Stable identity of the input source within the session
    pub id: u64,
    pub pose: Pose,
    pub trigger: bool,
}

/// All controllers visible this frame.
#[derive(Debug, Clone, Default)]
pub struct VrSnapshot {
    pub controllers: Vec<ControllerState>,
}

/// Desktop pointer state for a frame. `clicked`/`released` are discrete
/// events as delivered by the windowing layer, not levels.
#[derive(Debug, Clone, Copy)]
pub struct MouseSnapshot {
    /// Cursor position in viewport pixels, origin top-left
    pub position: Vec2,
    /// Viewport size in pixels
    pub viewport: Vec2,
    pub clicked: bool,
    pub released: bool,
}

/// Where a pointer event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Controller(u64),
    Mouse,
}

/// The normalized per-frame pointer event consumed by the panel registry.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub ray: Ray,
    /// Activate edge: pressed this frame, not pressed last frame
    pub pressed: bool,
    pub released: bool,
    pub source: PointerSource,
}

/// Converts controller or mouse snapshots into `PointerEvent`s.
#[derive(Debug, Default)]
pub struct InputRouter {
    /// Trigger levels from the previous VR snapshot, by controller id
    prev_triggers: HashMap<u64, bool>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a VR frame. The pointing controller is the one with a press
    /// edge this frame if any, otherwise the first in the snapshot.
    pub fn route_vr(&mut self, snapshot: &VrSnapshot) -> Option<PointerEvent> {
        let mut current: HashMap<u64, bool> = HashMap::with_capacity(snapshot.controllers.len());
        let mut chosen: Option<PointerEvent> = None;

        for controller in &snapshot.controllers {
            current.insert(controller.id, controller.trigger);

            // A controller first seen mid-press yields no edge until it
            // releases; this avoids spurious activation on (re)appearance.
            let prev = self.prev_triggers.get(&controller.id).copied();
            let pressed = controller.trigger && prev == Some(false);
            let released = !controller.trigger && prev == Some(true);

            let event = PointerEvent {
                ray: Ray::from_pose(&controller.pose),
                pressed,
                released,
                source: PointerSource::Controller(controller.id),
            };

            match &chosen {
                None => chosen = Some(event),
                Some(existing) if !existing.pressed && pressed => chosen = Some(event),
                Some(_) => {}
            }
        }

        self.prev_triggers = current;
        chosen
    }

    /// Route a desktop frame: the ray starts at the camera and deflects the
    /// camera forward vector by the normalized mouse offset scaled by a
    /// fixed field-of-view factor.
    pub fn route_mouse(&mut self, camera: &Pose, snapshot: &MouseSnapshot) -> PointerEvent {
        let fov = app_data::client_data().interaction.mouse_fov_factor;

        // Normalized offset from the viewport center: x right, y up
        let nx = (snapshot.position.x / snapshot.viewport.x.max(1.0)) * 2.0 - 1.0;
        let ny = 1.0 - (snapshot.position.y / snapshot.viewport.y.max(1.0)) * 2.0;

        let direction = camera.forward() + camera.right() * (nx * fov) + camera.up() * (ny * fov);

        PointerEvent {
            ray: Ray::new(camera.position, direction),
            pressed: snapshot.clicked,
            released: snapshot.released,
            source: PointerSource::Mouse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn controller(id: u64, trigger: bool) -> ControllerState {
        ControllerState {
            id,
            pose: Pose::new(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY),
            trigger,
        }
    }

    fn snapshot(controllers: Vec<ControllerState>) -> VrSnapshot {
        VrSnapshot { controllers }
    }

    #[test]
    fn trigger_press_fires_exactly_once() {
        let mut router = InputRouter::new();

        let event = router.route_vr(&snapshot(vec![controller(1, false)])).unwrap();
        assert!(!event.pressed);

        let event = router.route_vr(&snapshot(vec![controller(1, true)])).unwrap();
        assert!(event.pressed);
        assert_eq!(event.source, PointerSource::Controller(1));

        // Held: no repeat fire
        let event = router.route_vr(&snapshot(vec![controller(1, true)])).unwrap();
        assert!(!event.pressed);

        let event = router.route_vr(&snapshot(vec![controller(1, false)])).unwrap();
        assert!(event.released);
    }

    #[test]
    fn controller_appearing_mid_press_does_not_activate() {
        let mut router = InputRouter::new();
        let event = router.route_vr(&snapshot(vec![controller(7, true)])).unwrap();
        assert!(!event.pressed);
    }

    #[test]
    fn vanished_controller_forgets_state() {
        let mut router = InputRouter::new();
        router.route_vr(&snapshot(vec![controller(1, true)]));
        // Controller 1 disappears for a frame
        assert!(router.route_vr(&snapshot(vec![])).is_none());
        // Reappears still held: no edge
        let event = router.route_vr(&snapshot(vec![controller(1, true)])).unwrap();
        assert!(!event.pressed);
    }

    #[test]
    fn pressing_controller_wins_pointer_selection() {
        let mut router = InputRouter::new();
        router.route_vr(&snapshot(vec![controller(1, false), controller(2, false)]));
        let event = router
            .route_vr(&snapshot(vec![controller(1, false), controller(2, true)]))
            .unwrap();
        assert!(event.pressed);
        assert_eq!(event.source, PointerSource::Controller(2));
    }

    #[test]
    fn centered_mouse_points_along_camera_forward() {
        let mut router = InputRouter::new();
        let camera = Pose::new(Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY);
        let snap = MouseSnapshot {
            position: Vec2::new(400.0, 300.0),
            viewport: Vec2::new(800.0, 600.0),
            clicked: false,
            released: false,
        };
        let event = router.route_mouse(&camera, &snap);
        assert!((event.ray.direction - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(event.ray.origin, camera.position);
    }

    #[test]
    fn mouse_offset_deflects_the_ray() {
        let mut router = InputRouter::new();
        let camera = Pose::default();
        let right_edge = MouseSnapshot {
            position: Vec2::new(800.0, 300.0),
            viewport: Vec2::new(800.0, 600.0),
            clicked: true,
            released: false,
        };
        let event = router.route_mouse(&camera, &right_edge);
        assert!(event.ray.direction.x > 0.0);
        assert!(event.pressed);

        let top_edge = MouseSnapshot {
            position: Vec2::new(400.0, 0.0),
            viewport: Vec2::new(800.0, 600.0),
            clicked: false,
            released: false,
        };
        let event = router.route_mouse(&camera, &top_edge);
        assert!(event.ray.direction.y > 0.0);
    }
}
