//! Tick-driven tree traversal.
//!
//! The traversal state per agent is tiny: the current node cursor, the
//! active long-running task, and a private RNG stream. The compiled tree is
//! shared read-only; all mutation stays inside the interpreter or flows out
//! through the adapter.

use std::sync::Arc;

use ai_tree::{ExecutableNode, ExecutableTree, NodeKind, Operation};

use crate::adapter::AgentAdapter;
use crate::condition;
use crate::config::InterpreterConfig;
use crate::rng::Pcg32;
use crate::task::{self, ActiveTask, TaskStatus};

/// Walks one compiled tree for one agent, one node per tick.
///
/// Created idle; the host calls [`TreeInterpreter::start`] to bind the
/// cursor to the tree's entry node and then [`TreeInterpreter::tick`] once
/// per fixed simulation step. A dead end parks the interpreter back in the
/// idle state until the host calls `start` again.
pub struct TreeInterpreter {
    tree: Arc<ExecutableTree>,
    config: InterpreterConfig,
    current: Option<usize>,
    active: Option<ActiveTask>,
    rng: Pcg32,
}

impl TreeInterpreter {
    pub fn new(tree: Arc<ExecutableTree>, config: InterpreterConfig) -> Self {
        let rng = Pcg32::new(config.rng_seed);
        Self {
            tree,
            config,
            current: None,
            active: None,
            rng,
        }
    }

    pub fn tree(&self) -> &ExecutableTree {
        &self.tree
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// The node the next tick will evaluate, if the agent is running.
    pub fn current(&self) -> Option<&ExecutableNode> {
        self.current.map(|i| &self.tree.nodes()[i])
    }

    /// The long-running task currently driving the agent, if any.
    pub fn active_task(&self) -> Option<&ActiveTask> {
        self.active.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Binds the cursor to the tree's entry node and returns it.
    ///
    /// Returns `None` when the tree has no start connection; the agent then
    /// performs no behavior until restarted with a usable tree.
    pub fn start(&mut self) -> Option<&ExecutableNode> {
        self.current = self.tree.entry_index();
        if self.current.is_none() {
            tracing::warn!(
                branch = %self.tree.branch_kind(),
                "tree has no start connection; agent stays idle"
            );
        }
        self.current()
    }

    /// Advances one fixed simulation step.
    ///
    /// Drives the active task, evaluates the current node, and rebinds the
    /// cursor. A `None` cursor makes this a no-op until [`Self::start`].
    pub fn tick<A: AgentAdapter>(&mut self, adapter: &mut A) {
        let Some(index) = self.current else {
            return;
        };

        if let Some(active) = self.active.as_mut()
            && active.drive(adapter, &self.config, &mut self.rng) == TaskStatus::Finished
        {
            self.active = None;
        }

        self.current = self.evaluate_and_advance(index, adapter);
        if self.current.is_none() {
            tracing::debug!("traversal reached a dead end; agent is idle");
        }
    }

    fn evaluate_and_advance<A: AgentAdapter>(
        &mut self,
        index: usize,
        adapter: &mut A,
    ) -> Option<usize> {
        let tree = Arc::clone(&self.tree);
        let node = &tree.nodes()[index];
        match node.kind {
            NodeKind::Condition => {
                let result = condition::evaluate(node, adapter, &self.config);
                tracing::debug!(
                    node = %node.node_id,
                    operation = %node.operation,
                    result,
                    "condition evaluated"
                );
                self.next_from_condition(index, result)
            }
            NodeKind::Action => {
                // A new dispatch always supersedes the running task, even
                // when it installs nothing (Fire, Stop, unknowns).
                self.active = task::dispatch(node, adapter, &self.config);
                self.advance_from_action(index)
            }
            NodeKind::SubTree => {
                let name = match &node.operation {
                    Operation::SubTree(name) => name.as_str(),
                    _ => node.original_label.as_str(),
                };
                tracing::debug!(node = %node.node_id, name, "delegating sub-tree to host hook");
                adapter.enter_subtree(name);
                self.advance_from_action(index)
            }
        }
    }

    /// First-successor rule: actions chain to their highest-priority
    /// successor, or loop back to the entry when the chain ends.
    fn advance_from_action(&self, index: usize) -> Option<usize> {
        let node = &self.tree.nodes()[index];
        match node.out_edges.first() {
            Some(id) => self.tree.index_of(id),
            None => self.tree.entry_index(),
        }
    }

    fn next_from_condition(&self, index: usize, result: bool) -> Option<usize> {
        let node = &self.tree.nodes()[index];
        if node.out_edges.is_empty() {
            // Dead end regardless of the result.
            return None;
        }
        if result {
            return self.tree.index_of(&node.out_edges[0]);
        }
        if node.out_edges.len() > 1 {
            // Second-highest successor is the "else" branch by convention.
            return self.tree.index_of(&node.out_edges[1]);
        }
        self.backtrack(index)
    }

    /// Failure recovery for a condition with no "else" branch: climb toward
    /// the root looking for the nearest untried sibling.
    fn backtrack(&self, failed: usize) -> Option<usize> {
        let failed_id = self.tree.nodes()[failed].node_id.as_str();

        if let Some(parent) = self.tree.parent_index_of(failed_id)
            && parent != failed
        {
            return self.next_alternative_from_parent(parent, failed_id);
        }
        if self.tree.is_root_child(failed_id) {
            // Top-level node: next root sibling, else restart from the top.
            return self
                .tree
                .next_root_sibling(failed_id)
                .or_else(|| self.tree.entry_index());
        }
        // Orphan with no parent and no root connection: restart.
        self.tree.entry_index()
    }

    fn next_alternative_from_parent(&self, parent: usize, failed_child: &str) -> Option<usize> {
        if let Some(next) = self.tree.next_sibling(parent, failed_child) {
            return Some(next);
        }
        let parent_id = self.tree.nodes()[parent].node_id.as_str();
        match self.tree.parent_index_of(parent_id) {
            Some(grandparent) if grandparent != parent => {
                self.next_alternative_from_parent(grandparent, parent_id)
            }
            // Chain exhausted with no untried sibling anywhere above.
            _ => None,
        }
    }
}
