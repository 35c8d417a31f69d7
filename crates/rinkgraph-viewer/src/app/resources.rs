use bevy::prelude::Resource;
use rinkgraph_engine::Engine;

use crate::util::config::ViewerConfig;

#[derive(Resource)]
pub struct EngineRes(pub Engine);

#[derive(Resource)]
pub struct ViewerState {
    pub cfg: ViewerConfig,
    pub help_open: bool,
    pub fps: f32,
    pub status: Option<String>,
}

impl ViewerState {
    pub fn new(cfg: ViewerConfig) -> Self {
        Self {
            cfg,
            help_open: false,
            fps: 0.0,
            status: None,
        }
    }

    /// Exponential moving average of the frame rate.
    pub fn record_frame(&mut self, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        let fps = 1.0 / dt;
        self.fps = if self.fps == 0.0 {
            fps
        } else {
            self.fps * 0.9 + fps * 0.1
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_average_ignores_bad_deltas() {
        let mut st = ViewerState::new(ViewerConfig::default());
        st.record_frame(0.0);
        assert_eq!(st.fps, 0.0);
        st.record_frame(1.0 / 50.0);
        assert!((st.fps - 50.0).abs() < 1e-3);
        st.record_frame(f32::NAN);
        st.record_frame(1.0 / 100.0);
        assert!((st.fps - 55.0).abs() < 1e-2);
    }
}
