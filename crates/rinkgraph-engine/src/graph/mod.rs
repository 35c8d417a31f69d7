pub mod connections;
pub mod ingest;
pub mod layout;
pub mod model;
pub mod physics;

pub use connections::{ConnectionBuilder, ConnectionSegment};
pub use ingest::{ingest, IngestReport};
pub use model::{Node, NodeIndex, NodeSet, Theme};
pub use physics::{Simulator, StepStats};
