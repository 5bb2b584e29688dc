//! Physics module
//!
//! Convex polygon shapes, colliders with a two-phase overlap test, and the
//! motion integrator that drives transforms each frame.

pub mod body;
pub mod collider;
pub mod shape;

pub use body::{AccelerationMode, PhysicsBody, PhysicsError};
pub use collider::{
    collide_polygons, BoundingCircle, BoundingMode, Collider, ColliderError, ContactChange,
    ContactManifold, PairSide, PairTest, WorldPolygon,
};
pub use shape::{Shape, ShapeError};
