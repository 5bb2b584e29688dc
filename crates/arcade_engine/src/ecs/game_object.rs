//! Entity behavior hooks and the context they run in
//!
//! Every callback receives a [`FrameContext`] instead of reaching for
//! globals. Through it an entity can move transforms, look at other
//! entities, and queue creations or destructions for the end of the frame.
//! Nothing a callback does can change the live entity set mid-iteration.

use crate::config::SimulationConfig;
use crate::ecs::commands::{CommandQueue, PendingEntity};
use crate::ecs::entity::{EntityId, EntityKind};
use crate::ecs::world::{validate_destroy, EntitySlot, WorldError};
use crate::foundation::math::Vec2;
use crate::physics::{ContactManifold, PhysicsBody};
use crate::render::{Color, RenderContext};
use crate::scene::{SceneGraph, TransformId};
use slotmap::SlotMap;

/// The other side of a contact, as seen by the entity being notified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPeer {
    /// Peer entity
    pub id: EntityId,
    /// Peer role
    pub kind: EntityKind,
    /// Entity that queued the peer's creation, if any
    pub spawned_by: Option<EntityId>,
}

/// Overlap reported to one side of a colliding pair
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    /// Entity on the other side
    pub other: ContactPeer,
    /// Unit normal pointing from the receiver towards `other`
    pub normal: Vec2,
    /// Full contact geometry
    pub manifold: ContactManifold,
    /// Whether the pair started overlapping this frame
    pub began: bool,
}

impl CollisionEvent {
    /// Overlap depth
    pub fn penetration(&self) -> f64 {
        self.manifold.penetration
    }

    /// Contact points in world space
    pub fn contacts(&self) -> &[Vec2] {
        &self.manifold.contacts
    }
}

/// Behavior of an entity living in a [`World`](crate::ecs::World)
///
/// Only `name`, `kind` and `transform` are required. Entities that move or
/// collide expose a [`PhysicsBody`] whose transform must be the entity's own;
/// the world integrates that body after `update` and tests its collider
/// against every other collider once per frame.
pub trait GameObject {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Role of the entity
    fn kind(&self) -> EntityKind;

    /// Transform node the entity is positioned by
    fn transform(&self) -> TransformId;

    /// Physics state, for entities that move or collide
    fn body(&self) -> Option<&PhysicsBody> {
        None
    }

    /// Mutable physics state
    fn body_mut(&mut self) -> Option<&mut PhysicsBody> {
        None
    }

    /// Per-frame logic, run before the body is integrated
    fn update(&mut self, _ctx: &mut FrameContext<'_>, _dt: f64) -> Result<(), WorldError> {
        Ok(())
    }

    /// Called on both sides of a pair for every frame the pair overlaps
    fn on_collision(&mut self, _ctx: &mut FrameContext<'_>, _event: &CollisionEvent) -> Result<(), WorldError> {
        Ok(())
    }

    /// Called once when a pair starts overlapping, before `on_collision`
    fn on_trigger_enter(&mut self, _ctx: &mut FrameContext<'_>, _other: &ContactPeer) -> Result<(), WorldError> {
        Ok(())
    }

    /// Called once when a pair stops overlapping
    fn on_trigger_exit(&mut self, _ctx: &mut FrameContext<'_>, _other: &ContactPeer) -> Result<(), WorldError> {
        Ok(())
    }

    /// Called at the flush point, just before the entity leaves the world
    ///
    /// The entity is still live and its transform still valid here, so this
    /// is the place to spawn debris or effects at its last position.
    /// Destroy requests made from here are applied at the next flush.
    fn on_death(&mut self, _ctx: &mut FrameContext<'_>) -> Result<(), WorldError> {
        Ok(())
    }

    /// Draw the entity; outlines the collider by default
    fn draw(&self, scene: &SceneGraph, ctx: &mut dyn RenderContext) {
        let Some(collider) = self.body().and_then(PhysicsBody::collider) else {
            return;
        };
        if let Ok(polygon) = collider.world_polygon(scene) {
            ctx.draw_polygon(&polygon.vertices, Color::WHITE);
        }
    }
}

/// What a callback may see and request while the world is iterating
pub struct FrameContext<'a> {
    scene: &'a mut SceneGraph,
    commands: &'a mut CommandQueue,
    entities: &'a SlotMap<EntityId, EntitySlot>,
    config: &'a SimulationConfig,
    player: Option<EntityId>,
    this: EntityId,
}

impl<'a> FrameContext<'a> {
    pub(crate) fn new(
        scene: &'a mut SceneGraph,
        commands: &'a mut CommandQueue,
        entities: &'a SlotMap<EntityId, EntitySlot>,
        config: &'a SimulationConfig,
        player: Option<EntityId>,
        this: EntityId,
    ) -> Self {
        Self { scene, commands, entities, config, player, this }
    }

    /// Entity the callback is running for
    pub fn id(&self) -> EntityId {
        self.this
    }

    /// The player entity, once one has been assigned
    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    /// Active simulation settings
    pub fn config(&self) -> &'a SimulationConfig {
        self.config
    }

    /// The level's transform hierarchy
    pub fn scene(&self) -> &SceneGraph {
        &*self.scene
    }

    /// Mutable transform hierarchy, for spawning nodes and moving parts
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut *self.scene
    }

    /// Whether `id` is in the live set (entities queued for destruction stay
    /// alive until the flush)
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Whether `id` is already queued to leave at the next flush
    pub fn is_marked_for_destruction(&self, id: EntityId) -> bool {
        self.commands.is_marked_for_destruction(id)
    }

    /// Role of a live entity
    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.entities.get(id).map(|slot| slot.kind)
    }

    /// Transform of a live entity
    pub fn transform_of(&self, id: EntityId) -> Option<TransformId> {
        self.entities.get(id).map(|slot| slot.transform)
    }

    /// World position of a live entity
    pub fn position_of(&self, id: EntityId) -> Option<Vec2> {
        let transform = self.transform_of(id)?;
        self.scene.global_position(transform).ok()
    }

    /// Queue a new entity attached under the scene root
    pub fn create(&mut self, object: Box<dyn GameObject>) {
        self.create_under(object, None);
    }

    /// Queue a new entity attached under `parent`
    pub fn create_with_parent(&mut self, object: Box<dyn GameObject>, parent: TransformId) {
        self.create_under(object, Some(parent));
    }

    fn create_under(&mut self, object: Box<dyn GameObject>, parent: Option<TransformId>) {
        self.commands.enqueue_create(PendingEntity {
            object,
            parent,
            spawned_by: Some(self.this),
        });
    }

    /// Queue `id` for destruction at the end of the frame
    ///
    /// The player cannot be destroyed this way; use
    /// [`destroy_player`](Self::destroy_player).
    pub fn destroy(&mut self, id: EntityId) -> Result<(), WorldError> {
        validate_destroy(self.entities, self.player, id)?;
        self.commands.enqueue_destroy(id);
        Ok(())
    }

    /// Queue the calling entity for destruction
    pub fn destroy_self(&mut self) -> Result<(), WorldError> {
        self.destroy(self.this)
    }

    /// Queue the player for destruction
    pub fn destroy_player(&mut self) -> Result<(), WorldError> {
        let player = self.player.ok_or(WorldError::NoPlayer)?;
        if !self.entities.contains_key(player) {
            return Err(WorldError::UnknownEntity(player));
        }
        self.commands.enqueue_destroy(player);
        Ok(())
    }
}
