use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

use crate::input::{PointerButton, TouchPoint};
use crate::util::config::CameraConfig;
use crate::view::Viewport;

const POLE_EPS: f32 = 1e-4;
const INERTIA_EPS: f32 = 1e-5;

/// Orbit offset around the target, +Y up. `phi` is measured from +Y,
/// `theta` around +Y starting at +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn to_offset(self) -> Vec3 {
        let r_sin_phi = self.radius * self.phi.sin();
        Vec3::new(
            r_sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            r_sin_phi * self.theta.cos(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Rotating,
    Panning,
    TouchRotate,
    TouchDollyPan,
}

impl DragState {
    pub fn is_dragging(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[derive(Debug, Clone, Copy)]
struct Pinch {
    distance: f32,
    midpoint: Vec2,
}

fn pinch_of(touches: &[TouchPoint]) -> Option<Pinch> {
    let [a, b, ..] = touches else {
        return None;
    };
    Some(Pinch {
        distance: a.pos.distance(b.pos),
        midpoint: (a.pos + b.pos) * 0.5,
    })
}

#[derive(Debug, Clone)]
pub struct CameraController {
    cfg: CameraConfig,
    target: Vec3,
    spherical: Spherical,
    position: Vec3,

    // per-frame accumulators, consumed by `update`
    delta: Vec2,
    scale: f32,
    pan_offset: Vec3,

    velocity: Vec2,
    state: DragState,
    last_pointer: Vec2,
    pinch: Option<Pinch>,
    viewport: Viewport,
}

impl CameraController {
    pub fn new(cfg: &CameraConfig, viewport: Viewport) -> Self {
        let mut cfg = cfg.clone();
        cfg.min_radius = cfg.min_radius.max(1e-3);
        cfg.max_radius = cfg.max_radius.max(cfg.min_radius);
        cfg.min_polar = cfg.min_polar.clamp(POLE_EPS, PI - POLE_EPS);
        cfg.max_polar = cfg.max_polar.clamp(cfg.min_polar, PI - POLE_EPS);

        let spherical = Spherical {
            radius: cfg.initial_radius.clamp(cfg.min_radius, cfg.max_radius),
            theta: cfg.initial_theta.rem_euclid(TAU),
            phi: cfg.initial_phi.clamp(cfg.min_polar, cfg.max_polar),
        };
        Self {
            target: Vec3::ZERO,
            position: spherical.to_offset(),
            spherical,
            delta: Vec2::ZERO,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            velocity: Vec2::ZERO,
            state: DragState::Idle,
            last_pointer: Vec2::ZERO,
            pinch: None,
            viewport,
            cfg,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.cfg
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn fov_y(&self) -> f32 {
        self.cfg.fov_y_degrees.clamp(1.0, 179.0).to_radians()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    fn basis(&self) -> (Vec3, Vec3) {
        let forward = self.forward();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        (right, up)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        let near = self.cfg.near.max(1e-4);
        let far = self.cfg.far.max(near * 2.0);
        Mat4::perspective_rh(self.fov_y(), aspect.max(1e-4), near, far)
    }

    pub fn view_projection(&self, viewport: Viewport) -> Mat4 {
        self.projection(viewport.aspect()) * self.view()
    }

    // ----- accumulating operations -----

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let h = self.viewport.height.max(1.0);
        let step = Vec2::new(-TAU * dx / h, -TAU * dy / h) * self.cfg.rotate_speed;
        if step.is_finite() {
            self.delta += step;
        }
    }

    /// Multiplies the pending zoom; `radius *= factor` at the next update.
    pub fn dolly(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.scale *= factor;
        }
    }

    pub fn wheel(&mut self, delta_y: f32) {
        let zoom = 0.95_f32.powf(self.cfg.zoom_speed);
        if delta_y > 0.0 {
            self.dolly(1.0 / zoom);
        } else if delta_y < 0.0 {
            self.dolly(zoom);
        }
    }

    /// Moves the target with the drag, in screen pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let h = self.viewport.height.max(1.0);
        let half_extent = self.spherical.radius * (self.fov_y() * 0.5).tan();
        let per_pixel = 2.0 * half_extent / h * self.cfg.pan_speed;
        let (right, up) = self.basis();
        let offset = -right * dx * per_pixel + up * dy * per_pixel;
        if offset.is_finite() {
            self.pan_offset += offset;
        }
    }

    pub fn focus_on(&mut self, point: Vec3) {
        if !point.is_finite() {
            return;
        }
        self.target = point;
        self.pan_offset = Vec3::ZERO;
        self.position = self.target + self.spherical.to_offset();
    }

    // ----- pointer / touch state machine -----

    pub fn pointer_down(&mut self, pos: Vec2, button: PointerButton) {
        self.state = match button {
            PointerButton::Primary => DragState::Rotating,
            PointerButton::Secondary | PointerButton::Middle => DragState::Panning,
        };
        self.last_pointer = pos;
        self.velocity = Vec2::ZERO;
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        let d = pos - self.last_pointer;
        match self.state {
            DragState::Rotating => self.rotate(d.x, d.y),
            DragState::Panning => self.pan(d.x, d.y),
            _ => {}
        }
        self.last_pointer = pos;
    }

    pub fn pointer_up(&mut self) {
        if matches!(self.state, DragState::Rotating | DragState::Panning) {
            self.state = DragState::Idle;
        }
    }

    pub fn touch_start(&mut self, touches: &[TouchPoint]) {
        self.velocity = Vec2::ZERO;
        match touches.len() {
            0 => {
                self.state = DragState::Idle;
                self.pinch = None;
            }
            1 => {
                self.state = DragState::TouchRotate;
                self.last_pointer = touches[0].pos;
                self.pinch = None;
            }
            _ => {
                self.state = DragState::TouchDollyPan;
                self.pinch = pinch_of(touches);
            }
        }
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint]) {
        match (self.state, touches.len()) {
            (DragState::TouchRotate, 1) => {
                let d = touches[0].pos - self.last_pointer;
                self.rotate(d.x, d.y);
                self.last_pointer = touches[0].pos;
            }
            (DragState::TouchDollyPan, n) if n >= 2 => {
                let (Some(prev), Some(cur)) = (self.pinch, pinch_of(touches)) else {
                    return;
                };
                if cur.distance > f32::EPSILON && prev.distance > f32::EPSILON {
                    // fingers apart -> closer to the target
                    self.dolly(prev.distance / cur.distance);
                }
                let m = cur.midpoint - prev.midpoint;
                self.pan(m.x, m.y);
                self.pinch = Some(cur);
            }
            _ => self.touch_start(touches),
        }
    }

    /// `remaining` are the touches still down after the end event.
    pub fn touch_end(&mut self, remaining: &[TouchPoint]) {
        self.touch_start(remaining);
    }

    /// Applies accumulated input and inertia; call once per frame.
    pub fn update(&mut self) {
        let dragging = matches!(self.state, DragState::Rotating | DragState::TouchRotate);
        let mut d = self.delta;
        if dragging {
            self.velocity = d;
        } else {
            d += self.velocity;
            self.velocity *= self.cfg.inertia_decay.clamp(0.0, 0.999);
            if self.velocity.length() < INERTIA_EPS {
                self.velocity = Vec2::ZERO;
            }
        }

        let s = &mut self.spherical;
        s.theta = (s.theta + d.x).rem_euclid(TAU);
        s.phi = (s.phi + d.y).clamp(self.cfg.min_polar, self.cfg.max_polar);
        let radius = s.radius * self.scale;
        s.radius = if radius.is_finite() {
            radius.clamp(self.cfg.min_radius, self.cfg.max_radius)
        } else {
            self.cfg.initial_radius.clamp(self.cfg.min_radius, self.cfg.max_radius)
        };
        if !s.theta.is_finite() {
            s.theta = 0.0;
        }
        if !s.phi.is_finite() {
            s.phi = self.cfg.min_polar.max(self.cfg.initial_phi.min(self.cfg.max_polar));
        }

        self.target += self.pan_offset;
        self.position = self.target + self.spherical.to_offset();

        self.delta = Vec2::ZERO;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn camera() -> CameraController {
        CameraController::new(&CameraConfig::default(), Viewport::new(800.0, 600.0))
    }

    #[test]
    fn clamps_hold_after_any_input_sequence() {
        let mut cam = camera();
        let cfg = cam.config().clone();
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..2000 {
            match rng.gen_range(0..4) {
                0 => cam.rotate(rng.gen_range(-2000.0..2000.0), rng.gen_range(-2000.0..2000.0)),
                1 => cam.dolly(rng.gen_range(0.01..100.0)),
                2 => cam.wheel(rng.gen_range(-3.0..3.0)),
                _ => cam.update(),
            }
            cam.update();
            let s = cam.spherical();
            assert!(s.phi >= cfg.min_polar && s.phi <= cfg.max_polar, "phi {}", s.phi);
            assert!(s.radius >= cfg.min_radius && s.radius <= cfg.max_radius, "radius {}", s.radius);
            assert!((0.0..TAU).contains(&s.theta));
        }
    }

    #[test]
    fn dolly_half_then_double_restores_radius() {
        let mut cam = camera();
        let before = cam.spherical().radius;

        cam.dolly(0.5);
        cam.update();
        assert!((cam.spherical().radius - before * 0.5).abs() < 1e-3);
        cam.dolly(2.0);
        cam.update();
        assert!((cam.spherical().radius - before).abs() < 1e-3);

        cam.dolly(0.5);
        cam.dolly(2.0);
        cam.update();
        assert!((cam.spherical().radius - before).abs() < 1e-3);
    }

    #[test]
    fn dolly_ignores_degenerate_factors() {
        let mut cam = camera();
        let before = cam.spherical().radius;
        cam.dolly(0.0);
        cam.dolly(-3.0);
        cam.dolly(f32::NAN);
        cam.update();
        assert_eq!(cam.spherical().radius, before);
    }

    #[test]
    fn wheel_down_zooms_out() {
        let mut cam = camera();
        let before = cam.spherical().radius;
        cam.wheel(120.0);
        cam.update();
        assert!(cam.spherical().radius > before);
        cam.wheel(-120.0);
        cam.update();
        assert!((cam.spherical().radius - before).abs() < 1e-3);
    }

    #[test]
    fn full_yaw_wraps_and_pitch_stops_at_pole() {
        let mut cam = camera();
        let theta0 = cam.spherical().theta;
        // one viewport height of drag is a full turn
        cam.rotate(-600.0, 0.0);
        cam.update();
        assert!((cam.spherical().theta - theta0).abs() < 1e-3 || (cam.spherical().theta - TAU).abs() < 1e-3);

        cam.rotate(0.0, 10_000.0);
        cam.update();
        assert_eq!(cam.spherical().phi, cam.config().min_polar);
        cam.rotate(0.0, -10_000.0);
        cam.update();
        assert_eq!(cam.spherical().phi, cam.config().max_polar);
    }

    #[test]
    fn inertia_carries_rotation_then_decays() {
        let mut cam = camera();
        cam.pointer_down(Vec2::new(100.0, 100.0), PointerButton::Primary);
        cam.pointer_move(Vec2::new(130.0, 100.0));
        cam.update();
        assert_eq!(cam.state(), DragState::Rotating);
        cam.pointer_up();
        assert_eq!(cam.state(), DragState::Idle);

        let mut last = cam.spherical().theta;
        cam.update();
        assert_ne!(cam.spherical().theta, last, "inertia should keep turning");
        for _ in 0..500 {
            last = cam.spherical().theta;
            cam.update();
        }
        assert_eq!(cam.velocity(), Vec2::ZERO);
        assert_eq!(cam.spherical().theta, last);
    }

    #[test]
    fn holding_still_while_dragging_has_no_inertia() {
        let mut cam = camera();
        cam.pointer_down(Vec2::ZERO, PointerButton::Primary);
        cam.pointer_move(Vec2::new(40.0, 0.0));
        cam.update();
        cam.update();
        cam.pointer_up();
        let theta = cam.spherical().theta;
        cam.update();
        assert_eq!(cam.spherical().theta, theta);
    }

    #[test]
    fn position_orbits_target_at_radius() {
        let mut cam = camera();
        cam.focus_on(Vec3::new(5.0, -2.0, 9.0));
        cam.rotate(37.0, -12.0);
        cam.update();
        let d = cam.position().distance(cam.target());
        assert!((d - cam.spherical().radius).abs() < 1e-2);
        assert_eq!(cam.target(), Vec3::new(5.0, -2.0, 9.0));
    }

    #[test]
    fn pan_moves_target_in_screen_plane() {
        let mut cam = camera();
        let forward = cam.forward();
        cam.pointer_down(Vec2::ZERO, PointerButton::Secondary);
        cam.pointer_move(Vec2::new(50.0, 20.0));
        cam.update();
        let moved = cam.target();
        assert!(moved.length() > 0.0);
        assert!(moved.normalize().dot(forward).abs() < 1e-3);
        assert_eq!(cam.velocity(), Vec2::ZERO);
    }

    #[test]
    fn pinch_out_zooms_in() {
        let mut cam = camera();
        let before = cam.spherical().radius;
        let t = |id, x: f32| TouchPoint {
            id,
            pos: Vec2::new(x, 300.0),
        };
        cam.touch_start(&[t(0, 350.0), t(1, 450.0)]);
        assert_eq!(cam.state(), DragState::TouchDollyPan);
        cam.touch_move(&[t(0, 300.0), t(1, 500.0)]);
        cam.update();
        assert!((cam.spherical().radius - before * 0.5).abs() < 1e-2);

        cam.touch_end(&[t(0, 300.0)]);
        assert_eq!(cam.state(), DragState::TouchRotate);
        cam.touch_end(&[]);
        assert_eq!(cam.state(), DragState::Idle);
    }
}
