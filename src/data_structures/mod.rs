//! Engine data structures: meshes, instances, the scene graph and textures.
//!
//! - `model` holds vertex layouts and uploaded GPU meshes
//! - `instance` holds per-node transforms and their GPU layout
//! - `scene_graph` enables hierarchical scene organization
//! - `texture` holds the depth attachment

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
