//! Entity lifecycle and the per-frame simulation loop
//!
//! Entities are trait objects owned by the [`World`]. They never touch the
//! live set directly: creation and destruction go through a command queue
//! that the world applies after the update and collision passes.

pub mod commands;
pub mod entity;
pub mod game_object;
pub mod world;

pub use commands::{CommandQueue, PendingEntity};
pub use entity::{EntityId, EntityKind};
pub use game_object::{CollisionEvent, ContactPeer, FrameContext, GameObject};
pub use world::{collider_of, FrameReport, World, WorldError};
