//! Perspective projection of panel quads onto the egui painter.

use eframe::egui::{self, Align2, FontId, Pos2, Shape, Stroke};
use glam::Vec3;

use crate::panel::{ButtonState, Panel, PanelRegistry};
use crate::spatial::Pose;
use crate::ui::theme::Theme;

/// Focal length as a fraction of the viewport height.
const FOCAL_FACTOR: f32 = 0.95;
/// Points closer than this to the camera plane are culled.
const NEAR_PLANE: f32 = 0.05;

/// Project a world point into screen space. Returns `None` behind the
/// near plane.
fn project(camera: &Pose, viewport: egui::Rect, world: Vec3) -> Option<Pos2> {
    let local = camera.inverse_transform_point(world);
    let depth = -local.z;
    if depth < NEAR_PLANE {
        return None;
    }
    let focal = viewport.height() * FOCAL_FACTOR;
    let center = viewport.center();
    Some(Pos2::new(
        center.x + local.x / depth * focal,
        center.y - local.y / depth * focal,
    ))
}

/// Screen-space corners of a panel-local rectangle, or `None` when any
/// corner is behind the camera.
fn project_rect(
    camera: &Pose,
    viewport: egui::Rect,
    anchor: &Pose,
    center: glam::Vec2,
    size: glam::Vec2,
) -> Option<Vec<Pos2>> {
    let half = size * 0.5;
    let corners = [
        Vec3::new(center.x - half.x, center.y + half.y, 0.0),
        Vec3::new(center.x + half.x, center.y + half.y, 0.0),
        Vec3::new(center.x + half.x, center.y - half.y, 0.0),
        Vec3::new(center.x - half.x, center.y - half.y, 0.0),
    ];
    corners
        .iter()
        .map(|&c| project(camera, viewport, anchor.transform_point(c)))
        .collect()
}

/// Text size that shrinks with distance from the camera.
fn text_size(camera: &Pose, world: Vec3, base: f32) -> f32 {
    let depth = (-camera.inverse_transform_point(world).z).max(NEAR_PLANE);
    (base / depth).clamp(8.0, 48.0)
}

fn draw_panel(painter: &egui::Painter, camera: &Pose, viewport: egui::Rect, panel: &Panel, theme: &Theme) {
    let anchor = &panel.anchor;

    if let Some(corners) = project_rect(
        camera,
        viewport,
        anchor,
        glam::Vec2::ZERO,
        glam::Vec2::new(panel.width, panel.height),
    ) {
        painter.add(Shape::convex_polygon(
            corners,
            theme.panel_fill,
            Stroke::new(1.5, theme.panel_stroke),
        ));
    }

    if !panel.title.is_empty() {
        let world = anchor.transform_point(Vec3::new(0.0, panel.height * 0.5 - 0.05, 0.0));
        if let Some(pos) = project(camera, viewport, world) {
            painter.text(
                pos,
                Align2::CENTER_CENTER,
                &panel.title,
                FontId::proportional(text_size(camera, world, 34.0)),
                theme.accent,
            );
        }
    }

    for (i, line) in panel.body.iter().enumerate() {
        let y = panel.height * 0.5 - 0.14 - i as f32 * 0.07;
        let world = anchor.transform_point(Vec3::new(0.0, y, 0.0));
        if let Some(pos) = project(camera, viewport, world) {
            painter.text(
                pos,
                Align2::CENTER_CENTER,
                line,
                FontId::proportional(text_size(camera, world, 26.0)),
                theme.text,
            );
        }
    }

    for button in &panel.buttons {
        let fill = match button.state {
            ButtonState::Idle => theme.button_idle,
            ButtonState::Hovered => theme.button_hovered,
            ButtonState::Pressed => theme.button_pressed,
        };
        if let Some(corners) = project_rect(camera, viewport, anchor, button.rect.center, button.rect.size) {
            painter.add(Shape::convex_polygon(
                corners,
                fill,
                Stroke::new(1.0, theme.panel_stroke),
            ));
        }
        if !button.label.is_empty() {
            let world = anchor.transform_point(Vec3::new(button.rect.center.x, button.rect.center.y, 0.0));
            if let Some(pos) = project(camera, viewport, world) {
                let color = if button.state == ButtonState::Idle {
                    theme.text_dim
                } else {
                    theme.text
                };
                painter.text(
                    pos,
                    Align2::CENTER_CENTER,
                    &button.label,
                    FontId::proportional(text_size(camera, world, 22.0)),
                    color,
                );
            }
        }
    }
}

/// Paint every visible panel, far to near so near panels draw on top.
pub fn draw_panels(
    painter: &egui::Painter,
    camera: &Pose,
    viewport: egui::Rect,
    registry: &PanelRegistry,
    theme: &Theme,
) {
    painter.rect_filled(viewport, egui::CornerRadius::ZERO, theme.background);

    let mut visible: Vec<&Panel> = registry.panels().iter().filter(|p| p.visible).collect();
    visible.sort_by(|a, b| {
        let da = (a.anchor.position - camera.position).length();
        let db = (b.anchor.position - camera.position).length();
        db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
    });

    // Overlays always paint above main panels
    visible.sort_by_key(|p| p.overlay);

    for panel in visible {
        draw_panel(painter, camera, viewport, panel, theme);
    }
}
