//! Authored behavior-tree documents and their executable form.
//!
//! A tank's AI is authored in a node-graph editor as a [`TreeDocument`]:
//! free-form labelled nodes plus directed connections, with two reserved
//! synthetic roots marking the entry points of the navigation and turret
//! branches. This crate turns that document into something an interpreter can
//! walk every simulation tick:
//!
//! - [`label`]: compiles a human-authored node label (e.g. `"If HP > 50%"`)
//!   into a canonical [`Operation`] and an extracted numeric operand.
//! - [`ExecutableTree`]: the compiled, immutable snapshot — one
//!   [`ExecutableNode`] per document node with its successors pre-sorted by
//!   branching priority, plus the lookup indexes traversal needs.
//!
//! The single global ordering rule lives here: a node's out-edges are sorted
//! **descending by the target's `position.y`**, so "higher on the canvas" is
//! always "tried first". Editing a document invalidates its compiled tree;
//! callers recompile rather than patching executable nodes in place.

pub mod compile;
pub mod document;
pub mod label;
pub mod operation;

pub use compile::{CompileError, ExecutableNode, ExecutableTree};
pub use document::{
    BranchKind, ConnectionData, NAV_ROOT_ID, NodeData, TURRET_ROOT_ID, TreeDocument, Vec2,
    is_synthetic_root,
};
pub use label::Comparator;
pub use operation::{NodeKind, Operation};
