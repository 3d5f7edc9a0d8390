//! Interpreter tuning knobs.

use ai_tree::Vec2;
use serde::{Deserialize, Serialize};

/// Per-agent tunables for condition evaluation and long-running tasks.
///
/// Durations are expressed in ticks of the host's fixed-timestep loop (the
/// defaults assume 10 ticks per simulated second).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Radius of the disc around the agent from which wander targets are
    /// drawn.
    pub wander_radius: f32,
    /// Distance at which a wander target counts as reached.
    pub arrive_tolerance: f32,
    /// Ticks to idle at a wander target before picking the next one.
    pub wander_idle_ticks: u32,
    /// Patrol endpoints sit at the dispatch position plus/minus this offset.
    pub patrol_offset: Vec2,
    /// Distance at which a patrol endpoint counts as reached.
    pub patrol_tolerance: f32,
    /// Ticks to pause at each patrol endpoint.
    pub patrol_pause_ticks: u32,
    /// Maximum drift from the guard post before the agent walks back.
    pub guard_tolerance: f32,
    /// Ticks a `Wait` action holds the agent in place.
    pub wait_ticks: u32,
    /// Identity tag matched by `IfTag` conditions.
    pub identity_tag: String,
    /// Seed for the wander RNG; agents with equal seeds wander identically.
    pub rng_seed: u64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            wander_radius: 100.0,
            arrive_tolerance: 3.0,
            wander_idle_ticks: 10,
            patrol_offset: Vec2::new(10.0, 0.0),
            patrol_tolerance: 2.0,
            patrol_pause_ticks: 10,
            guard_tolerance: 5.0,
            wait_ticks: 20,
            identity_tag: "Tank".to_string(),
            rng_seed: 0,
        }
    }
}
