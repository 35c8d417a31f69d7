pub mod camera;
pub mod picking;
pub mod projection;

pub use camera::{CameraController, DragState, Spherical};
pub use picking::pick;
pub use projection::{build_labels, project, Label};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Degenerate sizes are clamped to one pixel.
    pub fn new(width: f32, height: f32) -> Self {
        let fix = |v: f32| if v.is_finite() { v.max(1.0) } else { 1.0 };
        Self {
            width: fix(width),
            height: fix(height),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}
