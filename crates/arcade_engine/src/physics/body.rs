//! Rigid-body motion integrator
//!
//! A [`PhysicsBody`] is a transform node plus linear motion state. It owns
//! exactly one [`Collider`], created when a shape is assigned.

use crate::config::SimulationConfig;
use crate::foundation::math::Vec2;
use crate::physics::collider::{BoundingMode, Collider, ColliderError};
use crate::physics::shape::Shape;
use crate::scene::{SceneError, SceneGraph, TransformId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How accumulated acceleration is folded into velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccelerationMode {
    /// `velocity += acceleration` once per tick, regardless of frame length
    PerTick,
    /// `velocity += acceleration * dt`
    #[default]
    PerSecond,
}

/// Integration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// The body was integrated before a shape was assigned
    #[error("Physics body {0:?} has no collider. Did you forget to call set_shape?")]
    MissingCollider(TransformId),

    /// The body's transform is gone from the scene graph
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Moving body with a transform, velocity, acceleration and a collider
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    transform: TransformId,
    /// Linear velocity in units per second
    pub velocity: Vec2,
    /// Acceleration accumulated since the last integration step
    pub acceleration: Vec2,
    max_speed: f64,
    collider: Option<Collider>,
}

impl PhysicsBody {
    /// Spawn a body's transform under `parent`
    pub fn new(
        scene: &mut SceneGraph,
        parent: TransformId,
        position: Vec2,
        rotation: f64,
        max_speed: f64,
    ) -> Result<Self, SceneError> {
        let transform = scene.spawn(parent, position, rotation)?;
        Ok(Self {
            transform,
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            max_speed: max_speed.max(0.0),
            collider: None,
        })
    }

    /// Spawn a body capped at the configured default speed
    pub fn with_default_speed(
        scene: &mut SceneGraph,
        parent: TransformId,
        position: Vec2,
        rotation: f64,
        config: &SimulationConfig,
    ) -> Result<Self, SceneError> {
        Self::new(scene, parent, position, rotation, config.default_max_speed)
    }

    /// Transform node driven by this body
    pub fn transform(&self) -> TransformId {
        self.transform
    }

    /// Assign the collision shape, replacing any previous collider
    pub fn set_shape(&mut self, scene: &SceneGraph, shape: Shape) -> Result<(), ColliderError> {
        self.set_shape_with_mode(scene, shape, BoundingMode::default())
    }

    /// Assign the collision shape with an explicit broad-phase radius rule
    pub fn set_shape_with_mode(
        &mut self,
        scene: &SceneGraph,
        shape: Shape,
        mode: BoundingMode,
    ) -> Result<(), ColliderError> {
        self.collider = Some(Collider::with_bounding_mode(scene, self.transform, shape, mode)?);
        Ok(())
    }

    /// Collider, if a shape was assigned
    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    /// Mutable collider, if a shape was assigned
    pub fn collider_mut(&mut self) -> Option<&mut Collider> {
        self.collider.as_mut()
    }

    /// Speed limit
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Change the speed limit (negative values clamp to zero)
    pub fn set_max_speed(&mut self, max_speed: f64) {
        self.max_speed = max_speed.max(0.0);
    }

    /// Accumulate acceleration for the next integration step
    pub fn apply_force(&mut self, acceleration: Vec2) {
        self.acceleration += acceleration;
    }

    /// Change velocity immediately
    pub fn apply_impulse(&mut self, delta_velocity: Vec2) {
        self.velocity += delta_velocity;
    }

    /// Speed (velocity magnitude)
    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    /// Global position of the body's transform
    pub fn position(&self, scene: &SceneGraph) -> Result<Vec2, SceneError> {
        scene.global_position(self.transform)
    }

    /// Move the body in its parent's frame
    pub fn set_position(&self, scene: &mut SceneGraph, position: Vec2) -> Result<(), SceneError> {
        scene.set_local_position(self.transform, position)
    }

    /// Global rotation of the body's transform
    pub fn rotation(&self, scene: &SceneGraph) -> Result<f64, SceneError> {
        scene.global_rotation(self.transform)
    }

    /// Turn the body by `angle` radians
    pub fn rotate_by(&self, scene: &mut SceneGraph, angle: f64) -> Result<(), SceneError> {
        scene.rotate(self.transform, angle)
    }

    /// Unit vector along the body's global heading
    pub fn forward(&self, scene: &SceneGraph) -> Result<Vec2, SceneError> {
        scene.forward(self.transform)
    }

    /// Advance the body by `dt` seconds
    ///
    /// Fails before touching any state when no collider is assigned.
    /// Afterwards the speed never exceeds the limit and the accumulated
    /// acceleration is cleared.
    pub fn integrate(&mut self, scene: &mut SceneGraph, dt: f64, mode: AccelerationMode) -> Result<(), PhysicsError> {
        if self.collider.is_none() {
            return Err(PhysicsError::MissingCollider(self.transform));
        }
        let position = scene.local_position(self.transform)?;

        self.velocity += match mode {
            AccelerationMode::PerTick => self.acceleration,
            AccelerationMode::PerSecond => self.acceleration * dt,
        };

        let speed = self.velocity.magnitude();
        if speed > self.max_speed {
            self.velocity *= self.max_speed / speed;
        }

        scene.set_local_position(self.transform, position + self.velocity * dt)?;
        self.acceleration = Vec2::zeros();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn body_at_origin(scene: &mut SceneGraph, max_speed: f64) -> PhysicsBody {
        let root = scene.root();
        let mut body = PhysicsBody::new(scene, root, Vec2::zeros(), 0.0, max_speed).unwrap();
        body.set_shape(scene, Shape::triangle(Vec2::zeros(), 1.0)).unwrap();
        body
    }

    #[test]
    fn test_constant_velocity_step() {
        let mut scene = SceneGraph::new();
        let mut body = body_at_origin(&mut scene, 100.0);
        body.velocity = Vec2::new(10.0, 0.0);

        body.integrate(&mut scene, 1.0, AccelerationMode::PerTick).unwrap();

        assert_relative_eq!(body.position(&scene).unwrap(), Vec2::new(10.0, 0.0));
        assert_relative_eq!(body.velocity, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_speed_clamped_to_limit() {
        let mut scene = SceneGraph::new();
        let mut body = body_at_origin(&mut scene, 100.0);
        body.velocity = Vec2::new(90.0, 0.0);

        for _ in 0..5 {
            body.apply_force(Vec2::new(30.0, 40.0));
            body.integrate(&mut scene, 0.5, AccelerationMode::PerTick).unwrap();
            assert!(body.speed() <= 100.0 + 1e-9);
        }
        assert_relative_eq!(body.speed(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_acceleration_modes() {
        let mut scene = SceneGraph::new();
        let mut per_tick = body_at_origin(&mut scene, 1000.0);
        let mut per_second = body_at_origin(&mut scene, 1000.0);

        per_tick.apply_force(Vec2::new(10.0, 0.0));
        per_second.apply_force(Vec2::new(10.0, 0.0));
        per_tick.integrate(&mut scene, 0.1, AccelerationMode::PerTick).unwrap();
        per_second.integrate(&mut scene, 0.1, AccelerationMode::PerSecond).unwrap();

        assert_relative_eq!(per_tick.velocity, Vec2::new(10.0, 0.0));
        assert_relative_eq!(per_second.velocity, Vec2::new(1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(per_tick.position(&scene).unwrap(), Vec2::new(1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(per_second.position(&scene).unwrap(), Vec2::new(0.1, 0.0), epsilon = 1e-12);

        // acceleration does not carry over into the next step
        assert_eq!(per_tick.acceleration, Vec2::zeros());
        per_tick.integrate(&mut scene, 0.1, AccelerationMode::PerTick).unwrap();
        assert_relative_eq!(per_tick.velocity, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_default_speed_comes_from_config() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let config = SimulationConfig { default_max_speed: 40.0, ..SimulationConfig::default() };
        let mut body = PhysicsBody::with_default_speed(&mut scene, root, Vec2::zeros(), 0.0, &config).unwrap();
        body.set_shape(&scene, Shape::triangle(Vec2::zeros(), 1.0)).unwrap();
        assert_relative_eq!(body.max_speed(), 40.0);

        body.velocity = Vec2::new(100.0, 0.0);
        body.integrate(&mut scene, 1.0, config.acceleration_mode).unwrap();
        assert_relative_eq!(body.speed(), 40.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_collider_is_rejected_before_mutation() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let mut body = PhysicsBody::new(&mut scene, root, Vec2::new(1.0, 1.0), 0.0, 10.0).unwrap();
        body.velocity = Vec2::new(5.0, 0.0);
        body.apply_force(Vec2::new(1.0, 0.0));

        let result = body.integrate(&mut scene, 1.0, AccelerationMode::PerSecond);
        assert_eq!(result, Err(PhysicsError::MissingCollider(body.transform())));
        assert_eq!(body.velocity, Vec2::new(5.0, 0.0));
        assert_eq!(body.acceleration, Vec2::new(1.0, 0.0));
        assert_eq!(body.position(&scene).unwrap(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_child_body_moves_in_parent_frame() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let parent = scene.spawn(root, Vec2::new(10.0, 0.0), crate::foundation::math::constants::HALF_PI).unwrap();
        let mut body = PhysicsBody::new(&mut scene, parent, Vec2::zeros(), 0.0, 50.0).unwrap();
        body.set_shape(&scene, Shape::centered_rectangle(Vec2::zeros(), 1.0, 1.0)).unwrap();

        body.apply_impulse(Vec2::new(2.0, 0.0));
        body.integrate(&mut scene, 1.0, AccelerationMode::PerSecond).unwrap();

        // local +X is global +Y under a quarter-turned parent
        assert_relative_eq!(body.position(&scene).unwrap(), Vec2::new(10.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(body.forward(&scene).unwrap(), Vec2::new(0.0, 1.0), epsilon = 1e-12);
    }
}
