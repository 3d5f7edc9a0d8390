//! Boundary contract between the interpreter and the surrounding simulation.
//!
//! The interpreter never touches world state directly. Everything it can
//! perceive (targeting, distances, health) or do (steer, brake, fire, aim)
//! goes through an [`AgentAdapter`] implemented by the host — the live
//! simulation in the game, plain mock structs in tests.

use std::fmt;

use ai_tree::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque reference to an entity tracked by the surrounding simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sensor and actuator surface one agent exposes to its interpreter.
///
/// Sensor methods take `&self` and must be cheap — several may run within a
/// single tick. Actuator methods take `&mut self`; the host decides what
/// "move" or "fire" physically mean.
pub trait AgentAdapter {
    // --- sensors ---

    /// The entity this adapter belongs to.
    fn self_id(&self) -> EntityId;

    /// Current target picked by the host's sensor sweep, if any.
    fn current_target(&self) -> Option<EntityId>;

    fn has_target(&self) -> bool {
        self.current_target().is_some()
    }

    /// World position of this agent on the arena plane.
    fn position(&self) -> Vec2;

    /// World position of `target`, or `None` once it is gone.
    fn target_position(&self, target: EntityId) -> Option<Vec2>;

    fn distance_to(&self, target: EntityId) -> f32;

    /// Health as a percentage of maximum (0–100).
    fn health_percent(&self) -> f32;

    fn armor_value(&self) -> f32;

    fn is_enemy(&self, target: EntityId) -> bool;

    fn is_ally(&self, target: EntityId) -> bool;

    fn matches_tag(&self, target: EntityId, tag: &str) -> bool;

    /// Effective range of the equipped weapon.
    fn weapon_range(&self) -> f32;

    /// True when the weapon cooldown has elapsed and the current target is
    /// within [`Self::weapon_range`].
    fn can_fire(&self) -> bool;

    // --- actuators ---

    /// Emits a projectile toward `target` and resets the weapon cooldown.
    fn fire_at(&mut self, target: EntityId);

    /// Steers along `direction` (unit vector) for this tick.
    fn move_toward(&mut self, direction: Vec2);

    /// Applies braking until the next steering call.
    fn stop_movement(&mut self);

    /// Rotates the turret toward `target` for this tick.
    fn rotate_turret_toward(&mut self, target: EntityId);

    /// Slow in-place scan rotation (used while holding a guard post).
    fn rotate_in_place(&mut self);

    /// Extension point for sub-tree nodes: the host may switch in another
    /// tree by name. The default does nothing; traversal continues either
    /// way.
    fn enter_subtree(&mut self, name: &str) {
        let _ = name;
    }
}
