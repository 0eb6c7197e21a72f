//! Desktop rendering of the spatial panels.
//!
//! The VR presentation layer is an external collaborator; this module is the
//! minimal desktop preview that projects panel quads onto the egui painter
//! so the client is usable with a mouse.

mod panels;
mod theme;

pub use panels::draw_panels;
pub use theme::Theme;
