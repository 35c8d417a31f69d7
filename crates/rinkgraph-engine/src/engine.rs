use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rinkgraph_core::{Game, NodeId};
use serde::Serialize;

use crate::graph::{ingest, ConnectionBuilder, ConnectionSegment, IngestReport, NodeIndex, NodeSet, Simulator, StepStats};
use crate::input::{InputEvent, InputQueue, InputSender, PointerButton, TouchPoint};
use crate::util::config::{EngineConfig, Rgb};
use crate::view::{build_labels, pick, CameraController, Label, Viewport};

const FILLER_ALPHA: f32 = 0.3;
const BASE_ALPHA: f32 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hover {
    pub index: NodeIndex,
    pub id: NodeId,
    pub label: String,
    /// Distance between the node and the cursor ray, in world units.
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameStats {
    pub frame: u64,
    pub live_nodes: usize,
    pub visible_segments: usize,
    pub active_links: usize,
    pub resets: usize,
    pub max_speed: f32,
}

/// Everything a renderer needs for one frame. Per-node arrays are indexed by
/// `NodeIndex` and keep their length for the lifetime of the engine.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameOutput {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<Rgb>,
    pub sizes: Vec<f32>,
    pub energies: Vec<f32>,
    pub alphas: Vec<f32>,
    pub segments: Vec<ConnectionSegment>,
    pub hover: Option<Hover>,
    pub selected: Option<NodeIndex>,
    pub labels: Vec<Label>,
    pub stats: FrameStats,
}

impl FrameOutput {
    fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.sizes.clear();
        self.energies.clear();
        self.alphas.clear();
        self.segments.clear();
        self.hover = None;
        self.selected = None;
        self.labels.clear();
        self.stats = FrameStats::default();
    }
}

/// Pointer press that may still turn into a click.
#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Vec2,
    moved: bool,
}

pub struct Engine {
    cfg: EngineConfig,
    nodes: NodeSet,
    report: IngestReport,
    simulator: Simulator,
    connections: ConnectionBuilder,
    camera: CameraController,
    viewport: Viewport,
    queue: InputQueue,
    pending: Vec<InputEvent>,
    cursor: Option<Vec2>,
    press: Option<Press>,
    hover: Option<Hover>,
    selected: Option<NodeIndex>,
    frame: u64,
    output: FrameOutput,
    disposed: bool,
}

impl Engine {
    /// Ingests a games snapshot and lays out the initial graph. The same
    /// games, config and seed always produce the same starting state.
    pub fn init(games: &[Game], cfg: EngineConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let (nodes, report) = ingest(games, &cfg.ingest, &cfg.layout, &mut rng);
        let viewport = Viewport::default();
        let camera = CameraController::new(&cfg.camera, viewport);

        tracing::info!(
            nodes = nodes.len(),
            players = report.players,
            fillers = report.fillers,
            edges = report.edges,
            seed,
            "engine ready"
        );

        Self {
            cfg,
            nodes,
            report,
            simulator: Simulator::default(),
            connections: ConnectionBuilder::default(),
            camera,
            viewport,
            queue: InputQueue::new(),
            pending: Vec::new(),
            cursor: None,
            press: None,
            hover: None,
            selected: None,
            frame: 0,
            output: FrameOutput::default(),
            disposed: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn hover(&self) -> Option<&Hover> {
        self.hover.as_ref()
    }

    pub fn selected(&self) -> Option<NodeIndex> {
        self.selected
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Last frame produced by `tick`.
    pub fn output(&self) -> Option<&FrameOutput> {
        (!self.disposed).then_some(&self.output)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Producer handle for input coming from other threads or host callbacks.
    pub fn input_sender(&self) -> InputSender {
        self.queue.sender()
    }

    // ----- input (enqueue only) -----

    pub fn on_pointer_down(&self, x: f32, y: f32, button: PointerButton) {
        self.queue.push(InputEvent::PointerDown {
            pos: Vec2::new(x, y),
            button,
        });
    }

    pub fn on_pointer_move(&self, x: f32, y: f32) {
        self.queue.push(InputEvent::PointerMove { pos: Vec2::new(x, y) });
    }

    pub fn on_pointer_up(&self, x: f32, y: f32, button: PointerButton) {
        self.queue.push(InputEvent::PointerUp {
            pos: Vec2::new(x, y),
            button,
        });
    }

    pub fn on_pointer_leave(&self) {
        self.queue.push(InputEvent::PointerLeave);
    }

    pub fn on_wheel(&self, delta_y: f32) {
        self.queue.push(InputEvent::Wheel { delta_y });
    }

    pub fn on_touch_start(&self, touches: &[TouchPoint]) {
        self.queue.push(InputEvent::TouchStart {
            touches: touches.to_vec(),
        });
    }

    pub fn on_touch_move(&self, touches: &[TouchPoint]) {
        self.queue.push(InputEvent::TouchMove {
            touches: touches.to_vec(),
        });
    }

    pub fn on_touch_end(&self, remaining: &[TouchPoint]) {
        self.queue.push(InputEvent::TouchEnd {
            touches: remaining.to_vec(),
        });
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.queue.push(InputEvent::Resize { width, height });
    }

    /// Points the camera at the selected node, if any.
    pub fn focus_selected(&mut self) -> bool {
        let Some(node) = self.selected.and_then(|idx| self.nodes.get(idx)) else {
            return false;
        };
        let p = node.position;
        self.camera.focus_on(p);
        true
    }

    pub fn select(&mut self, idx: Option<NodeIndex>) {
        self.selected = idx.filter(|i| i.0 < self.nodes.len());
    }

    // ----- frame loop -----

    /// Advances one frame. Returns `None` once the engine is disposed.
    pub fn tick(&mut self, dt: f32) -> Option<&FrameOutput> {
        if self.disposed {
            return None;
        }

        self.apply_input();

        let stats = self.simulator.step(
            &mut self.nodes.nodes,
            dt,
            &self.cfg.physics,
            &self.cfg.connections,
        );
        self.connections
            .rebuild(&self.nodes.nodes, &self.cfg.connections);
        self.camera.update();
        self.update_hover();

        let mut pinned: Vec<NodeIndex> = Vec::with_capacity(2);
        pinned.extend(self.hover.as_ref().map(|h| h.index));
        pinned.extend(self.selected);
        build_labels(
            &self.nodes.nodes,
            &self.camera,
            self.viewport,
            &self.cfg.labels,
            &pinned,
            &mut self.output.labels,
        );

        self.frame += 1;
        self.fill_output(stats);
        Some(&self.output)
    }

    /// Disconnects every input sender and releases per-frame buffers. Further
    /// ticks return `None`.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.queue.close();
        self.pending.clear();
        self.connections.clear();
        self.output.clear();
        self.cursor = None;
        self.press = None;
        self.hover = None;
        self.disposed = true;
        tracing::debug!(frames = self.frame, "engine disposed");
    }

    fn apply_input(&mut self) {
        if let Some(events) = self.queue.drain() {
            self.pending.extend(events);
        }
        let mut pending = std::mem::take(&mut self.pending);
        for ev in pending.drain(..) {
            self.apply(ev);
        }
        self.pending = pending;
    }

    fn apply(&mut self, ev: InputEvent) {
        let slop = self.cfg.camera.click_slop;
        match ev {
            InputEvent::PointerDown { pos, button } => {
                self.cursor = Some(pos);
                self.press = (button == PointerButton::Primary).then_some(Press {
                    origin: pos,
                    moved: false,
                });
                self.camera.pointer_down(pos, button);
            }
            InputEvent::PointerMove { pos } => {
                self.cursor = Some(pos);
                if let Some(press) = self.press.as_mut() {
                    press.moved |= pos.distance(press.origin) > slop;
                }
                self.camera.pointer_move(pos);
            }
            InputEvent::PointerUp { pos, button } => {
                self.cursor = Some(pos);
                self.camera.pointer_up();
                if button == PointerButton::Primary {
                    if let Some(press) = self.press.take() {
                        if !press.moved && pos.distance(press.origin) <= slop {
                            self.click(pos);
                        }
                    }
                }
            }
            InputEvent::PointerLeave => {
                self.cursor = None;
                self.press = None;
                self.camera.pointer_up();
            }
            InputEvent::Wheel { delta_y } => self.camera.wheel(delta_y),
            InputEvent::TouchStart { touches } => {
                self.press = match touches.as_slice() {
                    [one] => Some(Press {
                        origin: one.pos,
                        moved: false,
                    }),
                    _ => None,
                };
                self.cursor = touches.first().map(|t| t.pos);
                self.camera.touch_start(&touches);
            }
            InputEvent::TouchMove { touches } => {
                match touches.as_slice() {
                    [one] => {
                        if let Some(press) = self.press.as_mut() {
                            press.moved |= one.pos.distance(press.origin) > slop;
                        }
                    }
                    _ => self.press = None,
                }
                self.cursor = touches.first().map(|t| t.pos);
                self.camera.touch_move(&touches);
            }
            InputEvent::TouchEnd { touches } => {
                if touches.is_empty() {
                    if let (Some(press), Some(pos)) = (self.press.take(), self.cursor) {
                        if !press.moved {
                            self.click(pos);
                        }
                    }
                    self.cursor = None;
                }
                self.camera.touch_end(&touches);
            }
            InputEvent::Resize { width, height } => {
                self.viewport = Viewport::new(width, height);
                self.camera.set_viewport(self.viewport);
                tracing::debug!(width = self.viewport.width, height = self.viewport.height, "viewport resized");
            }
        }
    }

    /// Clicking empty space clears the selection.
    fn click(&mut self, pos: Vec2) {
        self.selected = pick(
            pos,
            &self.camera,
            self.viewport,
            &self.nodes.nodes,
            self.cfg.picking.pick_radius,
        )
        .map(|(idx, _)| idx);
        if let Some(node) = self.selected.and_then(|idx| self.nodes.get(idx)) {
            tracing::debug!(node = %node.id, "node selected");
        }
    }

    fn update_hover(&mut self) {
        self.hover = None;
        if !self.cfg.picking.hover_enabled || self.camera.state().is_dragging() {
            return;
        }
        let Some(cursor) = self.cursor else {
            return;
        };
        let hit = pick(
            cursor,
            &self.camera,
            self.viewport,
            &self.nodes.nodes,
            self.cfg.picking.pick_radius,
        );
        self.hover = hit.and_then(|(index, distance)| {
            self.nodes.get(index).map(|node| Hover {
                index,
                id: node.id.clone(),
                label: node.label.clone(),
                distance,
            })
        });
    }

    fn fill_output(&mut self, stats: StepStats) {
        let hovered = self.hover.as_ref().map(|h| h.index);
        let out = &mut self.output;
        out.positions.clear();
        out.colors.clear();
        out.sizes.clear();
        out.energies.clear();
        out.alphas.clear();

        for (idx, node) in self.nodes.iter() {
            out.positions.push(node.position.to_array());
            out.colors.push(node.color);
            out.sizes.push(node.size);
            out.energies.push(node.energy);
            let alpha = if Some(idx) == hovered || Some(idx) == self.selected {
                1.0
            } else if node.is_filler {
                FILLER_ALPHA
            } else {
                BASE_ALPHA + (1.0 - BASE_ALPHA) * node.energy
            };
            out.alphas.push(alpha);
        }

        out.segments.clear();
        out.segments.extend_from_slice(self.connections.segments());
        out.hover = self.hover.clone();
        out.selected = self.selected;
        out.stats = FrameStats {
            frame: self.frame,
            live_nodes: self.nodes.len(),
            visible_segments: out.segments.len(),
            active_links: stats.active_links,
            resets: stats.resets,
            max_speed: stats.max_speed,
        };
    }
}
