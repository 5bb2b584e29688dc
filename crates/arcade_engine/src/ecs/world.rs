//! Level world: the live entity set and the per-frame loop
//!
//! A frame always runs in the same order:
//!
//! 1. **Update**: every live entity's `update` hook, then its body's integration
//! 2. **Collide**: every unordered pair of live colliders, broad then narrow
//!    phase, with callbacks on both sides
//! 3. **Flush deletions**: death hooks, touching-set cleanup, transform removal
//! 4. **Flush creations**: attach to the hierarchy and join the live set
//!
//! Steps 1 and 2 iterate a snapshot of the live set taken at the start of the
//! frame. Creation and destruction requests made during those steps are only
//! queued, so an entity destroyed mid-pass keeps colliding until the flush
//! and an entity created mid-frame first updates on the next frame.

use crate::config::SimulationConfig;
use crate::ecs::commands::{CommandQueue, PendingEntity};
use crate::ecs::entity::{EntityId, EntityKind};
use crate::ecs::game_object::{CollisionEvent, ContactPeer, FrameContext, GameObject};
use crate::physics::{
    Collider, ColliderError, ContactChange, PairSide, PhysicsBody, PhysicsError, ShapeError,
};
use crate::render::{Drawable, RenderContext};
use crate::scene::{SceneError, SceneGraph, TransformId};
use log::{debug, info, warn};
use slotmap::SlotMap;
use thiserror::Error;

/// World errors
///
/// Everything here indicates a wiring mistake; the world never retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// Transform hierarchy error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Invalid shape
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Collider construction error
    #[error(transparent)]
    Collider(#[from] ColliderError),

    /// Integration error
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    /// The player slot is assigned once per world
    #[error("A player is already assigned ({0:?}); the player can only be set once")]
    PlayerAlreadySet(EntityId),

    /// The player went through the generic destroy path
    #[error("Player {0:?} cannot be destroyed with destroy(); use destroy_player()")]
    PlayerDestroyed(EntityId),

    /// No player has been assigned yet
    #[error("No player has been assigned")]
    NoPlayer,

    /// Handle does not refer to a live entity
    #[error("Unknown entity {0:?}")]
    UnknownEntity(EntityId),

    /// The entity is already inside one of its own callbacks
    #[error("Entity {0:?} is busy in a callback")]
    EntityBusy(EntityId),
}

/// Storage for one live entity
///
/// The object is taken out while its callbacks run so the context can still
/// answer questions about the rest of the world.
pub(crate) struct EntitySlot {
    pub(crate) object: Option<Box<dyn GameObject>>,
    pub(crate) kind: EntityKind,
    pub(crate) transform: TransformId,
    pub(crate) spawned_by: Option<EntityId>,
}

/// Check a generic destroy request
pub(crate) fn validate_destroy(
    entities: &SlotMap<EntityId, EntitySlot>,
    player: Option<EntityId>,
    id: EntityId,
) -> Result<(), WorldError> {
    if player == Some(id) {
        return Err(WorldError::PlayerDestroyed(id));
    }
    if !entities.contains_key(id) {
        return Err(WorldError::UnknownEntity(id));
    }
    Ok(())
}

/// Summary of one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Entities updated
    pub updated: usize,
    /// Collider pairs tested
    pub pairs_tested: usize,
    /// Pairs found overlapping
    pub contacts: usize,
    /// Entities that joined the live set at the flush
    pub created: Vec<EntityId>,
    /// Entities removed at the flush
    pub destroyed: Vec<EntityId>,
}

/// A level: transform hierarchy, live entities and deferred requests
pub struct World {
    scene: SceneGraph,
    entities: SlotMap<EntityId, EntitySlot>,
    order: Vec<EntityId>,
    commands: CommandQueue,
    player: Option<EntityId>,
    config: SimulationConfig,
    frame: u64,
}

impl World {
    /// Create an empty level
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            scene: SceneGraph::new(),
            entities: SlotMap::with_key(),
            order: Vec::new(),
            commands: CommandQueue::new(),
            player: None,
            config,
            frame: 0,
        }
    }

    /// Transform hierarchy
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Mutable transform hierarchy, for building entities outside a frame
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// Active settings
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Number of frames stepped so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the live set is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live entities in insertion order
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    /// Whether `id` is in the live set
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Role of a live entity
    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.entities.get(id).map(|slot| slot.kind)
    }

    /// Live entity by handle
    pub fn get(&self, id: EntityId) -> Option<&dyn GameObject> {
        self.entities.get(id)?.object.as_deref()
    }

    /// Mutable live entity by handle
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut dyn GameObject> {
        let object: &mut dyn GameObject = &mut **self.entities.get_mut(id)?.object.as_mut()?;
        Some(object)
    }

    /// Entities waiting for the next flush
    pub fn pending_creations(&self) -> usize {
        self.commands.pending_creations()
    }

    /// Live entities queued to leave at the next flush
    pub fn pending_destructions(&self) -> usize {
        self.commands.pending_destructions()
    }

    /// The player, once assigned
    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    /// Assign the player
    ///
    /// The assignment happens once per world; a second call fails even if
    /// the first player has since been destroyed.
    pub fn set_player(&mut self, id: EntityId) -> Result<(), WorldError> {
        if let Some(existing) = self.player {
            return Err(WorldError::PlayerAlreadySet(existing));
        }
        if !self.entities.contains_key(id) {
            return Err(WorldError::UnknownEntity(id));
        }
        self.player = Some(id);
        info!("Player assigned: {:?}", id);
        Ok(())
    }

    /// Queue an entity, attached under the scene root at the next flush
    pub fn create(&mut self, object: Box<dyn GameObject>) {
        self.commands.enqueue_create(PendingEntity { object, parent: None, spawned_by: None });
    }

    /// Queue an entity attached under `parent` at the next flush
    pub fn create_with_parent(&mut self, object: Box<dyn GameObject>, parent: TransformId) {
        self.commands.enqueue_create(PendingEntity {
            object,
            parent: Some(parent),
            spawned_by: None,
        });
    }

    /// Queue a live entity for destruction at the next flush
    pub fn destroy(&mut self, id: EntityId) -> Result<(), WorldError> {
        validate_destroy(&self.entities, self.player, id)?;
        self.commands.enqueue_destroy(id);
        Ok(())
    }

    /// Queue the player for destruction at the next flush
    pub fn destroy_player(&mut self) -> Result<(), WorldError> {
        let player = self.player.ok_or(WorldError::NoPlayer)?;
        if !self.entities.contains_key(player) {
            return Err(WorldError::UnknownEntity(player));
        }
        self.commands.enqueue_destroy(player);
        Ok(())
    }

    /// Run one frame: update, collide, then flush the queues
    pub fn step(&mut self, dt: f64) -> Result<FrameReport, WorldError> {
        self.frame += 1;
        let mut report = FrameReport { frame: self.frame, ..FrameReport::default() };
        let snapshot = self.order.clone();

        for &id in &snapshot {
            self.update_entity(id, dt)?;
            report.updated += 1;
        }

        let collidable: Vec<EntityId> = snapshot
            .iter()
            .copied()
            .filter(|&id| self.has_collider(id))
            .collect();
        for (i, &first) in collidable.iter().enumerate() {
            for &second in &collidable[i + 1..] {
                report.pairs_tested += 1;
                if self.resolve_pair(first, second)? {
                    report.contacts += 1;
                }
            }
        }

        self.flush_into(&mut report)?;
        debug!(
            "Frame {}: {} updated, {} pairs, {} contacts, +{} -{}",
            report.frame,
            report.updated,
            report.pairs_tested,
            report.contacts,
            report.created.len(),
            report.destroyed.len()
        );
        Ok(report)
    }

    /// Apply queued destructions, then queued creations, without running a frame
    ///
    /// Useful for populating a level before the first step.
    pub fn flush(&mut self) -> Result<FrameReport, WorldError> {
        let mut report = FrameReport { frame: self.frame, ..FrameReport::default() };
        self.flush_into(&mut report)?;
        Ok(report)
    }

    /// Draw every live entity in insertion order
    pub fn render(&self, ctx: &mut dyn RenderContext) {
        for slot in self.order.iter().filter_map(|&id| self.entities.get(id)) {
            let Some(object) = slot.object.as_deref() else {
                continue;
            };
            object.draw(&self.scene, ctx);
            if self.config.debug_colliders {
                if let Some(collider) = object.body().and_then(PhysicsBody::collider) {
                    collider.draw(&self.scene, ctx);
                }
            }
        }
    }

    /// Log the transform hierarchy at debug level
    pub fn log_hierarchy(&self) {
        debug!("Level hierarchy:\n{}", self.scene.describe());
    }

    fn context(&mut self, id: EntityId) -> FrameContext<'_> {
        FrameContext::new(
            &mut self.scene,
            &mut self.commands,
            &self.entities,
            &self.config,
            self.player,
            id,
        )
    }

    fn take_object(&mut self, id: EntityId) -> Result<Box<dyn GameObject>, WorldError> {
        self.entities
            .get_mut(id)
            .ok_or(WorldError::UnknownEntity(id))?
            .object
            .take()
            .ok_or(WorldError::EntityBusy(id))
    }

    fn restore_object(&mut self, id: EntityId, object: Box<dyn GameObject>) {
        if let Some(slot) = self.entities.get_mut(id) {
            slot.object = Some(object);
        }
    }

    fn has_collider(&self, id: EntityId) -> bool {
        self.get(id)
            .and_then(|object| object.body())
            .and_then(PhysicsBody::collider)
            .is_some()
    }

    fn peer(&self, id: EntityId) -> Result<ContactPeer, WorldError> {
        let slot = self.entities.get(id).ok_or(WorldError::UnknownEntity(id))?;
        Ok(ContactPeer { id, kind: slot.kind, spawned_by: slot.spawned_by })
    }

    fn update_entity(&mut self, id: EntityId, dt: f64) -> Result<(), WorldError> {
        let mut object = self.take_object(id)?;
        let result = self.run_update(id, &mut *object, dt);
        self.restore_object(id, object);
        result
    }

    fn run_update(&mut self, id: EntityId, object: &mut dyn GameObject, dt: f64) -> Result<(), WorldError> {
        object.update(&mut self.context(id), dt)?;
        if let Some(body) = object.body_mut() {
            body.integrate(&mut self.scene, dt, self.config.acceleration_mode)?;
        }
        Ok(())
    }

    /// Test one pair and notify both sides; returns whether they overlap
    fn resolve_pair(&mut self, first: EntityId, second: EntityId) -> Result<bool, WorldError> {
        let mut first_object = self.take_object(first)?;
        let mut second_object = match self.take_object(second) {
            Ok(object) => object,
            Err(err) => {
                self.restore_object(first, first_object);
                return Err(err);
            }
        };

        let result = self.dispatch_pair(first, &mut *first_object, second, &mut *second_object);

        self.restore_object(first, first_object);
        self.restore_object(second, second_object);
        result
    }

    fn dispatch_pair(
        &mut self,
        first: EntityId,
        first_object: &mut dyn GameObject,
        second: EntityId,
        second_object: &mut dyn GameObject,
    ) -> Result<bool, WorldError> {
        let first_collider = first_object.body_mut().and_then(PhysicsBody::collider_mut);
        let second_collider = second_object.body_mut().and_then(PhysicsBody::collider_mut);
        let test = match (first_collider, second_collider) {
            (Some(a), Some(b)) => a.check_collision_with(b, &self.scene)?,
            _ => return Ok(false),
        };

        let first_peer = self.peer(first)?;
        let second_peer = self.peer(second)?;

        match test.change {
            ContactChange::Began => {
                debug!("Contact began: {:?} <-> {:?}", first, second);
                first_object.on_trigger_enter(&mut self.context(first), &second_peer)?;
                second_object.on_trigger_enter(&mut self.context(second), &first_peer)?;
            }
            ContactChange::Ended => {
                debug!("Contact ended: {:?} <-> {:?}", first, second);
                first_object.on_trigger_exit(&mut self.context(first), &second_peer)?;
                second_object.on_trigger_exit(&mut self.context(second), &first_peer)?;
            }
            ContactChange::Persisted | ContactChange::Idle => {}
        }

        let Some(manifold) = test.manifold else {
            return Ok(false);
        };
        let began = test.change == ContactChange::Began;

        let to_first = CollisionEvent {
            other: second_peer,
            normal: manifold.normal_from(PairSide::First),
            manifold: manifold.clone(),
            began,
        };
        first_object.on_collision(&mut self.context(first), &to_first)?;

        let to_second = CollisionEvent {
            other: first_peer,
            normal: manifold.normal_from(PairSide::Second),
            manifold,
            began,
        };
        second_object.on_collision(&mut self.context(second), &to_second)?;
        Ok(true)
    }

    /// Apply both queues in full; the first error is returned once every
    /// request has been handled
    fn flush_into(&mut self, report: &mut FrameReport) -> Result<(), WorldError> {
        let mut first_error = None;

        // destroys queued by death hooks wait for the next flush
        for id in self.commands.drain_destroy() {
            if let Err(err) = self.remove_entity(id, &mut report.destroyed) {
                warn!("Destroying {:?} failed: {}", id, err);
                first_error.get_or_insert(err);
            }
        }
        for pending in self.commands.drain_create() {
            match self.insert_entity(pending) {
                Ok(Some(id)) => report.created.push(id),
                Ok(None) => {}
                Err(err) => {
                    warn!("Creating an entity failed: {}", err);
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn remove_entity(&mut self, id: EntityId, removed: &mut Vec<EntityId>) -> Result<(), WorldError> {
        // already gone with an ancestor
        let Some(transform) = self.entities.get(id).map(|slot| slot.transform) else {
            return Ok(());
        };
        let mut object = self.take_object(id)?;

        // the slot stays in place so the hook can still look itself up
        let death = object.on_death(&mut self.context(id));
        self.entities.remove(id);
        self.order.retain(|&other| other != id);

        if let Some(collider) = object.body_mut().and_then(PhysicsBody::collider_mut) {
            let owner = collider.owner();
            if !collider.take_touching().is_empty() {
                self.forget_peer(owner);
            }
        }

        // entities parented below this one leave with it
        let descendants: Vec<EntityId> = self
            .order
            .iter()
            .copied()
            .filter(|&other| {
                self.entities
                    .get(other)
                    .is_some_and(|slot| self.scene.is_descendant_of(slot.transform, transform))
            })
            .collect();
        let mut cascade = Ok(());
        for descendant in descendants {
            let result = self.remove_entity(descendant, removed);
            if cascade.is_ok() {
                cascade = result;
            }
        }

        if self.scene.contains(transform) {
            self.scene.despawn(transform)?;
        }
        removed.push(id);
        info!("Destroyed {} ({:?})", object.name(), id);
        death.and(cascade)
    }

    fn forget_peer(&mut self, owner: TransformId) {
        let colliders = self
            .entities
            .values_mut()
            .filter_map(|slot| slot.object.as_mut())
            .filter_map(|object| object.body_mut().and_then(PhysicsBody::collider_mut));
        for collider in colliders {
            collider.forget(owner);
        }
    }

    /// Attach a pending entity; `None` when it was dropped because the
    /// transform it hangs from left the scene first
    fn insert_entity(&mut self, pending: PendingEntity) -> Result<Option<EntityId>, WorldError> {
        let PendingEntity { object, parent, spawned_by } = pending;
        let kind = object.kind();
        let transform = object.transform();

        if !self.scene.contains(transform) {
            warn!("Dropping {}: its transform was removed before it joined", object.name());
            return Ok(None);
        }
        if let Some(parent) = parent.filter(|&parent| !self.scene.contains(parent)) {
            warn!("Dropping {}: parent {:?} was destroyed before it joined", object.name(), parent);
            self.scene.despawn(transform)?;
            return Ok(None);
        }
        if kind == EntityKind::Player {
            if let Some(existing) = self.player {
                self.scene.despawn(transform)?;
                return Err(WorldError::PlayerAlreadySet(existing));
            }
        }

        let parent = parent.unwrap_or_else(|| self.scene.root());
        if let Err(err) = self.scene.set_parent(transform, Some(parent)) {
            if !self.scene.is_root(transform) {
                self.scene.despawn(transform)?;
            }
            return Err(err.into());
        }
        self.scene.set_label(transform, object.name())?;

        let name = object.name().to_owned();
        let id = self.entities.insert(EntitySlot {
            object: Some(object),
            kind,
            transform,
            spawned_by,
        });
        self.order.push(id);
        if kind == EntityKind::Player {
            self.player = Some(id);
        }
        info!("Created {} ({:?}) as {:?}", name, id, kind);
        Ok(Some(id))
    }
}

/// Collider of an entity, if it has a body with a shape
pub fn collider_of(object: &dyn GameObject) -> Option<&Collider> {
    object.body().and_then(PhysicsBody::collider)
}
