use bevy::prelude::*;

use crate::app::resources::{EngineRes, ViewerState};

/// Visible connections and motion trails as immediate-mode gizmo lines.
pub fn draw_links(engine: Res<EngineRes>, st: Res<ViewerState>, mut gizmos: Gizmos) {
    let Some(out) = engine.0.output() else {
        return;
    };

    if st.cfg.show_edges {
        for seg in &out.segments {
            let [r, g, b] = seg.color;
            gizmos.line(seg.from_vec(), seg.to_vec(), Color::srgba(r, g, b, seg.alpha));
        }
    }

    if st.cfg.show_trails {
        for node in engine.0.nodes().nodes.iter() {
            if node.is_filler || node.trail.len() < 2 {
                continue;
            }
            let [r, g, b] = node.color;
            let alpha = st.cfg.trail_alpha * node.energy;
            gizmos.linestrip(node.trail.iter(), Color::srgba(r, g, b, alpha));
        }
    }
}
