//! Poses and pointer rays.
//!
//! Conventions follow WebXR: right-handed, -Z is forward. A panel's content
//! lives on its local XY plane with the normal along local +Z, so a panel
//! placed ahead of the viewer with the viewer's own orientation faces back
//! at them.

use glam::{Quat, Vec3};

/// A rigid transform: position plus orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    /// Forward direction (-Z in local space).
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Map a point from this pose's local space to world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }

    /// Map a world-space point into this pose's local space.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.orientation.inverse() * (world - self.position)
    }
}

/// A pointer ray in world space. `direction` is kept normalized so distances
/// along the ray compare directly.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray along a pose's forward direction (a tracked controller).
    pub fn from_pose(pose: &Pose) -> Self {
        Self::new(pose.position, pose.forward())
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Pose for a transient overlay placed straight ahead of the head.
///
/// Computed once at display time from the current head pose; the overlay is
/// not re-anchored as the head moves afterwards.
pub fn pose_in_front(head: &Pose, distance: f32) -> Pose {
    Pose {
        position: head.position + head.forward() * distance,
        orientation: head.orientation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_is_negative_z_for_identity() {
        let pose = Pose::default();
        assert!((pose.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn transform_point_round_trips() {
        let pose = Pose::new(
            Vec3::new(1.0, 2.0, -3.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_3),
        );
        let local = Vec3::new(0.25, -0.5, 0.1);
        let world = pose.transform_point(local);
        let back = pose.inverse_transform_point(world);
        assert!((back - local).length() < 1e-5);
    }

    #[test]
    fn pose_in_front_lands_ahead_of_head() {
        let head = Pose::new(Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY);
        let overlay = pose_in_front(&head, 2.0);
        assert!((overlay.position - Vec3::new(0.0, 1.6, -2.0)).length() < 1e-6);
        // Overlay keeps the head orientation, so its +Z normal points back.
        assert_eq!(overlay.orientation, head.orientation);
    }

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert!((ray.point_at(2.0) - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-6);
    }
}
