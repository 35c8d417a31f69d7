use glam::{Mat4, Vec2, Vec3};
use rinkgraph_core::NodeId;
use serde::Serialize;

use crate::graph::model::{Node, NodeIndex};
use crate::util::config::LabelConfig;
use crate::view::{CameraController, Viewport};

const W_EPS: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    #[serde(skip)]
    pub index: NodeIndex,
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub depth: f32,
    pub text: String,
}

/// Screen position (origin top-left, y down) and NDC depth of `point`, or
/// `None` when it is behind the camera or outside the depth range.
pub fn project_with(point: Vec3, view_proj: &Mat4, viewport: Viewport) -> Option<(Vec2, f32)> {
    if !point.is_finite() {
        return None;
    }
    let clip = *view_proj * point.extend(1.0);
    if !(clip.w > W_EPS) {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    if !(0.0..=1.0).contains(&ndc.z) {
        return None;
    }
    let x = (ndc.x + 1.0) * 0.5 * viewport.width;
    let y = (1.0 - ndc.y) * 0.5 * viewport.height;
    Some((Vec2::new(x, y), ndc.z))
}

pub fn project(point: Vec3, camera: &CameraController, viewport: Viewport) -> Option<Vec2> {
    project_with(point, &camera.view_projection(viewport), viewport).map(|(p, _)| p)
}

/// Overlay badges: connected players plus the hovered and selected node,
/// on screen only, nearest first.
pub fn build_labels(
    nodes: &[Node],
    camera: &CameraController,
    viewport: Viewport,
    cfg: &LabelConfig,
    pinned: &[NodeIndex],
    out: &mut Vec<Label>,
) {
    out.clear();
    let view_proj = camera.view_projection(viewport);
    for (i, node) in nodes.iter().enumerate() {
        if node.is_filler {
            continue;
        }
        let idx = NodeIndex(i);
        let wanted = node.connections.len() >= cfg.min_degree || pinned.contains(&idx);
        if !wanted {
            continue;
        }
        let Some((screen, depth)) = project_with(node.position, &view_proj, viewport) else {
            continue;
        };
        if !viewport.contains(screen.x, screen.y) {
            continue;
        }
        out.push(Label {
            index: idx,
            id: node.id.clone(),
            x: screen.x,
            y: screen.y,
            depth,
            text: node.label.clone(),
        });
    }
    out.sort_by(|a, b| {
        let pa = pinned.contains(&a.index);
        let pb = pinned.contains(&b.index);
        pb.cmp(&pa).then(a.depth.total_cmp(&b.depth))
    });
    out.truncate(cfg.max_labels);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{test_node, NodeSet};
    use crate::util::config::CameraConfig;
    use rinkgraph_core::Team;

    fn camera(vp: Viewport) -> CameraController {
        let mut cam = CameraController::new(&CameraConfig::default(), vp);
        cam.update();
        cam
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let vp = Viewport::new(800.0, 600.0);
        let cam = camera(vp);
        let p = project(cam.target(), &cam, vp).expect("target visible");
        assert!((p.x - 400.0).abs() < 1e-2 && (p.y - 300.0).abs() < 1e-2);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let vp = Viewport::new(800.0, 600.0);
        let cam = camera(vp);
        let behind = cam.position() - cam.forward() * 10.0;
        assert_eq!(project(behind, &cam, vp), None);
        assert_eq!(project(cam.position(), &cam, vp), None);
        assert_eq!(project(Vec3::NAN, &cam, vp), None);
    }

    #[test]
    fn projection_is_pure() {
        let vp = Viewport::new(640.0, 480.0);
        let cam = camera(vp);
        let p = Vec3::new(10.0, 5.0, -3.0);
        assert_eq!(project(p, &cam, vp), project(p, &cam, vp));
    }

    #[test]
    fn above_target_projects_higher_on_screen() {
        let vp = Viewport::new(800.0, 600.0);
        let cam = camera(vp);
        let up = project(Vec3::new(0.0, 10.0, 0.0), &cam, vp).expect("visible");
        assert!(up.y < 300.0);
    }

    #[test]
    fn labels_skip_fillers_and_offscreen_and_keep_pinned() {
        let vp = Viewport::new(800.0, 600.0);
        let cam = camera(vp);
        let mut set = NodeSet {
            nodes: vec![
                test_node("near", Team::Home, Vec3::new(0.0, 0.0, 20.0)),
                test_node("far", Team::Away, Vec3::new(0.0, 0.0, -20.0)),
                test_node("lonely", Team::Away, Vec3::new(3.0, 0.0, 0.0)),
                test_node("filler", Team::Home, Vec3::ZERO),
                test_node("behind", Team::Home, cam.position() - cam.forward() * 5.0),
            ],
        };
        set.nodes[3].is_filler = true;
        set.connect(NodeIndex(0), NodeIndex(1));
        set.connect(NodeIndex(3), NodeIndex(4));

        let mut out = Vec::new();
        build_labels(&set.nodes, &cam, vp, &LabelConfig::default(), &[NodeIndex(2)], &mut out);

        let ids: Vec<&str> = out.iter().map(|l| l.id.0.as_str()).collect();
        assert_eq!(ids, vec!["lonely", "near", "far"]);

        let cfg = LabelConfig {
            max_labels: 1,
            ..LabelConfig::default()
        };
        build_labels(&set.nodes, &cam, vp, &cfg, &[], &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id.0, "near");
    }
}
