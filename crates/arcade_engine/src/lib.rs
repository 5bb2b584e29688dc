//! # Arcade Engine
//!
//! Simulation core for a real-time 2D arcade shooter.
//!
//! ## Features
//!
//! - **Transform hierarchy**: arena-backed scene graph with parent/child composition
//! - **Motion integration**: velocity, acceleration and speed limits per body
//! - **Polygon collision**: bounding-circle broad phase, SAT narrow phase, contact manifolds
//! - **Deferred lifecycle**: entities created or destroyed mid-frame join or leave at a single flush point
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arcade_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let mut sim = Simulation::new(SimulationConfig::default())?;
//!     let level = sim.load_level();
//!     level.step(0.016)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod physics;
pub mod render;
pub mod scene;

mod engine;

pub use engine::{EngineError, Simulation};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, SimulationConfig},
        ecs::{
            CollisionEvent, ContactPeer, EntityId, EntityKind, FrameContext, FrameReport,
            GameObject, World, WorldError,
        },
        foundation::math::{from_heading, Vec2, Vec2Ext},
        physics::{AccelerationMode, Collider, PhysicsBody, Shape},
        render::{Color, Drawable, RenderContext},
        scene::{SceneGraph, TransformId},
        EngineError, Simulation,
    };
}
