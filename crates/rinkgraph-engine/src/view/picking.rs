use glam::{Vec2, Vec3};

use crate::graph::model::{Node, NodeIndex};
use crate::view::{CameraController, Viewport};

/// Ray distances closer than this count as a tie and fall back to depth.
const TIE_EPS: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

/// Ray from the camera through a cursor position in screen pixels.
pub fn screen_ray(cursor: Vec2, camera: &CameraController, viewport: Viewport) -> Option<Ray> {
    if !cursor.is_finite() {
        return None;
    }
    let ndc = Vec2::new(
        2.0 * cursor.x / viewport.width - 1.0,
        1.0 - 2.0 * cursor.y / viewport.height,
    );
    let inv = camera.view_projection(viewport).inverse();
    let far = inv.project_point3(ndc.extend(1.0));
    let origin = camera.position();
    let dir = (far - origin).normalize_or_zero();
    if dir == Vec3::ZERO || !dir.is_finite() {
        return None;
    }
    Some(Ray { origin, dir })
}

/// Nearest non-filler node within `radius` of the cursor ray and in front of
/// the camera. Returns the node and its distance from the ray.
pub fn pick(
    cursor: Vec2,
    camera: &CameraController,
    viewport: Viewport,
    nodes: &[Node],
    radius: f32,
) -> Option<(NodeIndex, f32)> {
    let ray = screen_ray(cursor, camera, viewport)?;
    let forward = camera.forward();
    let mut best: Option<(NodeIndex, f32, f32)> = None;

    for (i, node) in nodes.iter().enumerate() {
        if node.is_filler || !node.position.is_finite() {
            continue;
        }
        let to_node = node.position - ray.origin;
        if to_node.dot(forward) <= 0.0 {
            continue;
        }
        let t = to_node.dot(ray.dir);
        if t <= 0.0 {
            continue;
        }
        let d = node.position.distance(ray.origin + ray.dir * t);
        if d >= radius {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, bd, bt)) if (d - bd).abs() <= TIE_EPS => t < bt,
            Some((_, bd, _)) => d < bd,
        };
        if better {
            best = Some((NodeIndex(i), d, t));
        }
    }

    best.map(|(idx, d, _)| (idx, d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::test_node;
    use crate::util::config::CameraConfig;
    use crate::view::project;
    use rinkgraph_core::Team;

    fn setup() -> (CameraController, Viewport, Vec<Node>) {
        let vp = Viewport::new(1024.0, 768.0);
        let mut cam = CameraController::new(&CameraConfig::default(), vp);
        cam.rotate(40.0, -25.0);
        cam.update();
        let nodes = vec![
            test_node("a", Team::Home, Vec3::new(12.0, 4.0, -7.0)),
            test_node("b", Team::Away, Vec3::new(-20.0, -3.0, 15.0)),
            test_node("c", Team::Away, Vec3::new(0.0, 18.0, 2.0)),
        ];
        (cam, vp, nodes)
    }

    #[test]
    fn cursor_on_projected_node_picks_it() {
        let (cam, vp, nodes) = setup();
        for (i, n) in nodes.iter().enumerate() {
            let cursor = project(n.position, &cam, vp).expect("visible");
            let (idx, d) = pick(cursor, &cam, vp, &nodes, 1.5).expect("hit");
            assert_eq!(idx, NodeIndex(i));
            assert!(d < 1e-2, "ray distance {d}");
        }
    }

    #[test]
    fn empty_space_and_fillers_miss() {
        let (cam, vp, mut nodes) = setup();
        assert_eq!(pick(Vec2::new(2.0, 2.0), &cam, vp, &nodes, 1.5), None);

        let cursor = project(nodes[0].position, &cam, vp).expect("visible");
        nodes[0].is_filler = true;
        assert_eq!(pick(cursor, &cam, vp, &nodes, 1.5), None);
    }

    #[test]
    fn nearer_node_wins_on_same_ray() {
        let (cam, vp, _) = setup();
        let cursor = Vec2::new(300.0, 200.0);
        let ray = screen_ray(cursor, &cam, vp).expect("ray");
        let nodes = vec![
            test_node("back", Team::Home, ray.origin + ray.dir * 150.0),
            test_node("front", Team::Home, ray.origin + ray.dir * 100.0),
        ];
        let (idx, _) = pick(cursor, &cam, vp, &nodes, 1.5).expect("hit");
        assert_eq!(idx, NodeIndex(1));
    }

    #[test]
    fn nodes_behind_camera_are_ignored() {
        let (cam, vp, _) = setup();
        let behind = cam.position() - cam.forward() * 10.0;
        let nodes = vec![test_node("behind", Team::Home, behind)];
        let center = Vec2::new(vp.width * 0.5, vp.height * 0.5);
        assert_eq!(pick(center, &cam, vp, &nodes, 50.0), None);
    }
}
