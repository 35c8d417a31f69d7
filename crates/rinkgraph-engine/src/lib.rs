//! Force-directed event graph for hockey games: ingestion, per-frame physics,
//! orbit camera, picking and screen projection. Rendering is left to the host,
//! which feeds input in and reads a [`FrameOutput`] back each frame.

pub mod engine;
pub mod graph;
pub mod input;
pub mod util;
pub mod view;

pub use engine::{Engine, FrameOutput, FrameStats, Hover};
pub use graph::{ConnectionSegment, IngestReport, Node, NodeIndex, NodeSet, Theme};
pub use input::{InputEvent, InputSender, PointerButton, TouchPoint};
pub use util::config::EngineConfig;
pub use view::{CameraController, Label, Viewport};
