//! Tick-driven interpreter for authored tank behavior trees.
//!
//! One [`TreeInterpreter`] runs per agent per branch (navigation or turret),
//! sharing a compiled [`ai_tree::ExecutableTree`] with every other agent
//! equipped with the same tree. The surrounding simulation calls
//! [`TreeInterpreter::tick`] once per fixed step with its
//! [`AgentAdapter`] — the only boundary through which the interpreter
//! perceives or affects the world.
//!
//! Traversal is a cursor walk, not a conventional composite tick: the
//! interpreter holds one "current node", evaluates it, and moves. Conditions
//! branch on priority (higher canvas `y` first) with backtracking to the
//! nearest untried sibling on failure; actions dispatch an effect or a
//! long-running [`ActiveTask`] and chain to their first successor, restarting
//! from the top of the tree when the chain ends. Dead ends idle the agent
//! instead of failing — the engine always prefers *some* next state over an
//! error.

pub mod adapter;
pub mod config;
pub mod interpreter;
pub mod rng;
pub mod task;

mod condition;

pub use adapter::{AgentAdapter, EntityId};
pub use config::InterpreterConfig;
pub use interpreter::TreeInterpreter;
pub use rng::Pcg32;
pub use task::{ActiveTask, TaskStatus};
