//! Scene management
//!
//! The scene graph organizes every positioned thing in a level into a single
//! transform hierarchy rooted at an identity frame.

pub mod scene_graph;

pub use scene_graph::{SceneError, SceneGraph, TransformId};
