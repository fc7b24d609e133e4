pub mod chunk;
pub mod meshing;
pub mod plugin;
pub mod raycast;
pub mod types;
pub mod world;
