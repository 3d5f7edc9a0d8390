//! Compiling authored documents into executable trees.
//!
//! Compilation produces an immutable snapshot: the interpreter only ever
//! reads an [`ExecutableTree`], so a single compiled tree can be shared by
//! any number of agents. Document edits require a recompile; executable
//! nodes are never patched in place.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::document::{BranchKind, NAV_ROOT_ID, TreeDocument, Vec2, is_synthetic_root};
use crate::label;
use crate::operation::{NodeKind, Operation};

/// Malformations the compiler refuses to accept.
///
/// Everything else degrades gracefully: dangling connections are dropped with
/// a warning and a missing start connection merely leaves agents idle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("duplicate node id `{0}` in document")]
    DuplicateNodeId(String),
}

/// Compiled, tick-ready form of one document node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutableNode {
    #[serde(rename = "id")]
    pub node_id: String,
    pub operation: Operation,
    /// Authored label, kept for re-reading comparison operators at
    /// evaluation time.
    #[serde(rename = "label")]
    pub original_label: String,
    pub kind: NodeKind,
    /// Numeric value extracted from the label (0 if none).
    pub operand: f32,
    /// Successor ids, sorted descending by the target's `position.y`
    /// (ties keep connection insertion order). This order *is* the
    /// branching priority.
    #[serde(rename = "connectedIds")]
    pub out_edges: Vec<String>,
    #[serde(flatten)]
    pub position: Vec2,
}

/// Serialized shape of an [`ExecutableTree`]; the lookup indexes are
/// rebuilt on deserialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutableTreeData {
    #[serde(rename = "branchKind")]
    pub branch_kind: BranchKind,
    #[serde(rename = "executableNodes")]
    pub nodes: Vec<ExecutableNode>,
    #[serde(rename = "startNodeId")]
    pub start_node_id: Option<String>,
    #[serde(rename = "rootIds")]
    pub root_children: Vec<String>,
}

/// Immutable executable snapshot of a [`TreeDocument`].
///
/// Holds the compiled node list plus the lookups traversal needs every tick:
/// id → index, child → parent (first parent in node order wins), and the
/// root-connected nodes in priority order.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "ExecutableTreeData", from = "ExecutableTreeData")]
pub struct ExecutableTree {
    branch_kind: BranchKind,
    nodes: Vec<ExecutableNode>,
    start_node_id: Option<String>,
    root_children: Vec<String>,
    index: HashMap<String, usize>,
    parent: HashMap<String, usize>,
}

impl PartialEq for ExecutableTree {
    fn eq(&self, other: &Self) -> bool {
        // Indexes are derived, so structural equality is decided by the
        // compiled data alone.
        self.branch_kind == other.branch_kind
            && self.nodes == other.nodes
            && self.start_node_id == other.start_node_id
            && self.root_children == other.root_children
    }
}

impl ExecutableTree {
    /// Compiles a document into its executable form.
    pub fn compile(document: &TreeDocument) -> Result<Self, CompileError> {
        let mut seen = HashSet::new();
        for node in &document.nodes {
            if !seen.insert(node.node_id.as_str()) {
                return Err(CompileError::DuplicateNodeId(node.node_id.clone()));
            }
        }

        let position_of: HashMap<&str, Vec2> = document
            .nodes
            .iter()
            .map(|n| (n.node_id.as_str(), n.position))
            .collect();

        // First root connection in insertion order names the fallback start.
        let start_node_id = document
            .connections
            .iter()
            .find(|c| is_synthetic_root(&c.from_node_id))
            .map(|c| c.to_node_id.clone());
        if start_node_id.is_none() {
            tracing::warn!(
                branch = %document.branch_kind,
                "document has no start connection; agents will stay idle"
            );
        }

        let mut nodes = Vec::with_capacity(document.nodes.len());
        for raw in &document.nodes {
            let (operation, operand) = label::compile(&raw.label);
            let mut out_edges = Vec::new();
            for conn in &document.connections {
                if conn.from_node_id != raw.node_id {
                    continue;
                }
                if position_of.contains_key(conn.to_node_id.as_str()) {
                    out_edges.push(conn.to_node_id.clone());
                } else {
                    tracing::warn!(
                        from = %raw.node_id,
                        to = %conn.to_node_id,
                        "dropping connection to unknown node"
                    );
                }
            }
            sort_by_priority(&mut out_edges, &position_of);

            nodes.push(ExecutableNode {
                node_id: raw.node_id.clone(),
                operation,
                original_label: raw.label.clone(),
                kind: label::classify(&raw.label),
                operand,
                out_edges,
                position: raw.position,
            });
        }

        // Root-level siblings share the one start button id regardless of
        // branch kind; turret documents wired through their own root rely on
        // the recorded start node instead.
        let mut root_children = Vec::new();
        for conn in &document.connections {
            if conn.from_node_id != NAV_ROOT_ID {
                continue;
            }
            if position_of.contains_key(conn.to_node_id.as_str()) {
                root_children.push(conn.to_node_id.clone());
            } else {
                tracing::warn!(
                    to = %conn.to_node_id,
                    "dropping start connection to unknown node"
                );
            }
        }
        sort_by_priority(&mut root_children, &position_of);

        Ok(Self::assemble(
            document.branch_kind,
            nodes,
            start_node_id,
            root_children,
        ))
    }

    fn assemble(
        branch_kind: BranchKind,
        nodes: Vec<ExecutableNode>,
        start_node_id: Option<String>,
        root_children: Vec<String>,
    ) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.node_id.clone(), i))
            .collect();

        let mut parent = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            for child in &node.out_edges {
                // Documents are expected to form a tree; with multiple
                // parents the first in node order wins.
                parent.entry(child.clone()).or_insert(i);
            }
        }

        Self {
            branch_kind,
            nodes,
            start_node_id,
            root_children,
            index,
            parent,
        }
    }

    pub fn branch_kind(&self) -> BranchKind {
        self.branch_kind
    }

    /// Compiled nodes in document order.
    pub fn nodes(&self) -> &[ExecutableNode] {
        &self.nodes
    }

    /// Fallback entry recorded from the first root connection.
    pub fn start_node_id(&self) -> Option<&str> {
        self.start_node_id.as_deref()
    }

    /// Nodes connected directly from the start button, highest priority first.
    pub fn root_children(&self) -> &[String] {
        &self.root_children
    }

    pub fn get(&self, id: &str) -> Option<&ExecutableNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Index of the first parent (in node order) whose out-edges contain `id`.
    pub fn parent_index_of(&self, id: &str) -> Option<usize> {
        self.parent.get(id).copied()
    }

    pub fn is_root_child(&self, id: &str) -> bool {
        self.root_children.iter().any(|c| c == id)
    }

    /// Entry point: the highest-priority root child, falling back to the
    /// recorded start node when the root has no connections.
    pub fn entry_index(&self) -> Option<usize> {
        self.root_children
            .first()
            .and_then(|id| self.index_of(id))
            .or_else(|| self.start_node_id.as_deref().and_then(|id| self.index_of(id)))
    }

    /// The successor of `parent` ranked immediately after `child_id`, if any.
    pub fn next_sibling(&self, parent: usize, child_id: &str) -> Option<usize> {
        let siblings = &self.nodes.get(parent)?.out_edges;
        let at = siblings.iter().position(|id| id == child_id)?;
        siblings.get(at + 1).and_then(|id| self.index_of(id))
    }

    /// The root child ranked immediately after `child_id`, if any.
    pub fn next_root_sibling(&self, child_id: &str) -> Option<usize> {
        let at = self.root_children.iter().position(|id| id == child_id)?;
        self.root_children
            .get(at + 1)
            .and_then(|id| self.index_of(id))
    }
}

impl From<ExecutableTreeData> for ExecutableTree {
    fn from(data: ExecutableTreeData) -> Self {
        Self::assemble(
            data.branch_kind,
            data.nodes,
            data.start_node_id,
            data.root_children,
        )
    }
}

impl From<ExecutableTree> for ExecutableTreeData {
    fn from(tree: ExecutableTree) -> Self {
        Self {
            branch_kind: tree.branch_kind,
            nodes: tree.nodes,
            start_node_id: tree.start_node_id,
            root_children: tree.root_children,
        }
    }
}

/// Sorts node ids descending by the referenced node's `position.y`; the sort
/// is stable, so ties keep connection insertion order.
fn sort_by_priority(ids: &mut [String], position_of: &HashMap<&str, Vec2>) {
    ids.sort_by(|a, b| {
        let ya = position_of.get(a.as_str()).map(|p| p.y).unwrap_or(0.0);
        let yb = position_of.get(b.as_str()).map(|p| p.y).unwrap_or(0.0);
        yb.partial_cmp(&ya).unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TURRET_ROOT_ID;

    fn doc_with_fanout() -> TreeDocument {
        let mut doc = TreeDocument::new(BranchKind::Navigation);
        doc.add_node("cond", "If Enemy", Vec2::new(0.0, 50.0));
        doc.add_node("low", "Wander", Vec2::new(10.0, 5.0));
        doc.add_node("high", "Fire", Vec2::new(10.0, 20.0));
        doc.add_node("mid", "Chase", Vec2::new(10.0, 12.0));
        doc.add_connection(NAV_ROOT_ID, "cond");
        doc.add_connection("cond", "low");
        doc.add_connection("cond", "high");
        doc.add_connection("cond", "mid");
        doc
    }

    #[test]
    fn out_edges_sorted_descending_by_y() {
        let tree = ExecutableTree::compile(&doc_with_fanout()).unwrap();
        let cond = tree.get("cond").unwrap();
        assert_eq!(cond.out_edges, ["high", "mid", "low"]);

        // Invariant: every adjacent pair is non-increasing in y.
        for pair in cond.out_edges.windows(2) {
            let a = tree.get(&pair[0]).unwrap().position.y;
            let b = tree.get(&pair[1]).unwrap().position.y;
            assert!(a >= b);
        }
    }

    #[test]
    fn ties_keep_connection_order() {
        let mut doc = TreeDocument::new(BranchKind::Navigation);
        doc.add_node("a", "If Any", Vec2::new(0.0, 10.0));
        doc.add_node("b", "Fire", Vec2::new(0.0, 5.0));
        doc.add_node("c", "Stop", Vec2::new(0.0, 5.0));
        doc.add_connection("a", "b");
        doc.add_connection("a", "c");

        let tree = ExecutableTree::compile(&doc).unwrap();
        assert_eq!(tree.get("a").unwrap().out_edges, ["b", "c"]);
    }

    #[test]
    fn dangling_connections_are_dropped() {
        let mut doc = doc_with_fanout();
        doc.add_connection("cond", "ghost");
        let tree = ExecutableTree::compile(&doc).unwrap();
        assert_eq!(tree.get("cond").unwrap().out_edges, ["high", "mid", "low"]);
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let mut doc = TreeDocument::new(BranchKind::Navigation);
        doc.add_node("a", "Fire", Vec2::ZERO);
        doc.add_node("a", "Stop", Vec2::ZERO);
        assert_eq!(
            ExecutableTree::compile(&doc),
            Err(CompileError::DuplicateNodeId("a".to_string()))
        );
    }

    #[test]
    fn start_node_is_first_root_connection_in_insertion_order() {
        let mut doc = TreeDocument::new(BranchKind::Navigation);
        doc.add_node("a", "Fire", Vec2::new(0.0, 1.0));
        doc.add_node("b", "Stop", Vec2::new(0.0, 99.0));
        doc.add_connection(NAV_ROOT_ID, "a");
        doc.add_connection(NAV_ROOT_ID, "b");

        let tree = ExecutableTree::compile(&doc).unwrap();
        assert_eq!(tree.start_node_id(), Some("a"));
        // Priority order still ranks "b" first among root children.
        assert_eq!(tree.root_children(), ["b", "a"]);
        assert_eq!(tree.entry_index(), tree.index_of("b"));
    }

    #[test]
    fn turret_root_falls_back_to_start_node() {
        let mut doc = TreeDocument::new(BranchKind::Turret);
        doc.add_node("aim", "Track Target", Vec2::ZERO);
        doc.add_connection(TURRET_ROOT_ID, "aim");

        let tree = ExecutableTree::compile(&doc).unwrap();
        assert!(tree.root_children().is_empty());
        assert_eq!(tree.start_node_id(), Some("aim"));
        assert_eq!(tree.entry_index(), tree.index_of("aim"));
    }

    #[test]
    fn no_start_connection_yields_no_entry() {
        let mut doc = TreeDocument::new(BranchKind::Navigation);
        doc.add_node("a", "Fire", Vec2::ZERO);
        let tree = ExecutableTree::compile(&doc).unwrap();
        assert_eq!(tree.entry_index(), None);
    }

    #[test]
    fn parent_index_prefers_first_parent_in_node_order() {
        let mut doc = TreeDocument::new(BranchKind::Navigation);
        doc.add_node("p1", "If Any", Vec2::new(0.0, 10.0));
        doc.add_node("p2", "If Enemy", Vec2::new(0.0, 5.0));
        doc.add_node("child", "Fire", Vec2::ZERO);
        doc.add_connection("p2", "child");
        doc.add_connection("p1", "child");

        let tree = ExecutableTree::compile(&doc).unwrap();
        assert_eq!(tree.parent_index_of("child"), tree.index_of("p1"));
    }

    #[test]
    fn compilation_is_idempotent() {
        let doc = doc_with_fanout();
        let first = ExecutableTree::compile(&doc).unwrap();
        let second = ExecutableTree::compile(&doc).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.nodes(), second.nodes());
    }

    #[test]
    fn labels_compile_into_nodes() {
        let tree = ExecutableTree::compile(&doc_with_fanout()).unwrap();
        let cond = tree.get("cond").unwrap();
        assert_eq!(cond.operation, Operation::IfEnemy);
        assert_eq!(cond.kind, NodeKind::Condition);
        assert_eq!(cond.original_label, "If Enemy");
        assert_eq!(tree.get("high").unwrap().operation, Operation::Fire);
    }

    #[test]
    fn sibling_lookups() {
        let tree = ExecutableTree::compile(&doc_with_fanout()).unwrap();
        let cond = tree.index_of("cond").unwrap();
        assert_eq!(tree.next_sibling(cond, "high"), tree.index_of("mid"));
        assert_eq!(tree.next_sibling(cond, "mid"), tree.index_of("low"));
        assert_eq!(tree.next_sibling(cond, "low"), None);
        assert_eq!(tree.next_root_sibling("cond"), None);
    }
}
