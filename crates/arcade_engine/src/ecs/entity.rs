//! Entity handles and capability tags

use slotmap::new_key_type;

new_key_type! {
    /// Generational entity identifier
    ///
    /// A handle to a destroyed entity never aliases a later one, so stored
    /// references ("who fired this projectile") can be checked with
    /// [`World::is_alive`](crate::ecs::World::is_alive).
    pub struct EntityId;
}

/// Role of an entity, used by peers to decide how to react to contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The single player-controlled entity
    Player,
    /// Hostile ship
    Enemy,
    /// Anything fired by a ship
    Projectile,
    /// Hazards such as asteroids
    Environment,
    /// Visual-only entities
    Effect,
    /// No particular role
    Neutral,
}

impl EntityKind {
    /// Whether contact with this kind hurts ships
    pub fn is_hazard(self) -> bool {
        matches!(self, Self::Enemy | Self::Projectile | Self::Environment)
    }
}
