//! Deferred create and destroy requests
//!
//! Requests are only recorded here. The world applies them at its flush
//! point, after the update and collision passes have finished iterating.

use crate::ecs::entity::EntityId;
use crate::ecs::game_object::GameObject;
use crate::scene::TransformId;

/// Entity waiting to join the live set
pub struct PendingEntity {
    /// The entity itself
    pub object: Box<dyn GameObject>,
    /// Transform to attach under; the scene root when `None`
    pub parent: Option<TransformId>,
    /// Entity that asked for the creation, if any
    pub spawned_by: Option<EntityId>,
}

impl std::fmt::Debug for PendingEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingEntity")
            .field("name", &self.object.name())
            .field("kind", &self.object.kind())
            .field("parent", &self.parent)
            .field("spawned_by", &self.spawned_by)
            .finish()
    }
}

/// Queues of pending creations and destructions
#[derive(Debug, Default)]
pub struct CommandQueue {
    create: Vec<PendingEntity>,
    destroy: Vec<EntityId>,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a creation request
    pub fn enqueue_create(&mut self, pending: PendingEntity) {
        self.create.push(pending);
    }

    /// Record a destruction request
    ///
    /// Asking twice for the same entity is harmless; it is destroyed once.
    pub fn enqueue_destroy(&mut self, id: EntityId) {
        if !self.destroy.contains(&id) {
            self.destroy.push(id);
        }
    }

    /// Whether `id` is already queued for destruction
    pub fn is_marked_for_destruction(&self, id: EntityId) -> bool {
        self.destroy.contains(&id)
    }

    /// Number of queued creations
    pub fn pending_creations(&self) -> usize {
        self.create.len()
    }

    /// Number of queued destructions
    pub fn pending_destructions(&self) -> usize {
        self.destroy.len()
    }

    /// Take every queued destruction, leaving the queue empty
    pub fn drain_destroy(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.destroy)
    }

    /// Take every queued creation, leaving the queue empty
    pub fn drain_create(&mut self) -> Vec<PendingEntity> {
        std::mem::take(&mut self.create)
    }
}
