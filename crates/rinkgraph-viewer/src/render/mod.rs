pub mod camera;
pub mod links;
pub mod nodes;

pub use camera::{setup_scene, sync_camera};
pub use links::draw_links;
pub use nodes::{spawn_nodes, update_nodes};
