//! Arena bounds and shared run statistics

use arcade_engine::prelude::*;
use arcade_engine::scene::SceneError;
use std::cell::RefCell;
use std::rc::Rc;

/// Half the width (and height) of the square play area
pub const ARENA_HALF_EXTENT: f64 = 400.0;

/// Counters the entities update as the run progresses
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArenaStats {
    /// Projectiles launched by ships
    pub shots_fired: u32,
    /// Hazards that hit the player
    pub ship_hits: u32,
    /// Asteroids broken up or destroyed
    pub asteroids_destroyed: u32,
    /// Destroyed asteroids whose shooter was still alive to claim them
    pub kills_credited: u32,
}

/// Statistics shared between the entities and the driver
pub type SharedStats = Rc<RefCell<ArenaStats>>;

/// Move a root-level transform that left the arena to the opposite edge
pub fn wrap_into_arena(scene: &mut SceneGraph, transform: TransformId) -> Result<(), SceneError> {
    let position = scene.local_position(transform)?;
    let wrapped = Vec2::new(wrap_axis(position.x), wrap_axis(position.y));
    if wrapped != position {
        scene.set_local_position(transform, wrapped)?;
    }
    Ok(())
}

fn wrap_axis(value: f64) -> f64 {
    let span = ARENA_HALF_EXTENT * 2.0;
    if value > ARENA_HALF_EXTENT {
        value - span
    } else if value < -ARENA_HALF_EXTENT {
        value + span
    } else {
        value
    }
}
