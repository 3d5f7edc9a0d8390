//! The authored graph: nodes, connections, and branch kind.
//!
//! A [`TreeDocument`] is pure data produced by the external node editor. The
//! interpreter never touches it directly; it is compiled into an
//! [`crate::ExecutableTree`] snapshot first. Field renames follow the
//! serialized form the editor reads and writes.

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::label;

/// Reserved connection source marking the entry point of a navigation tree.
///
/// Synthetic roots are not members of [`TreeDocument::nodes`]; they exist only
/// as `from_node_id` values on connections.
pub const NAV_ROOT_ID: &str = "StartNavButton";

/// Reserved connection source marking the entry point of a turret tree.
pub const TURRET_ROOT_ID: &str = "StartTurretButton";

/// Returns true if `id` names one of the reserved synthetic roots.
pub fn is_synthetic_root(id: &str) -> bool {
    id == NAV_ROOT_ID || id == TURRET_ROOT_ID
}

/// 2D vector used both for canvas positions and for world-space steering.
///
/// For document nodes, `y` is not cosmetic: it is the branching priority key
/// (higher `y` is tried first).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Unit-length copy of this vector, or [`Vec2::ZERO`] for the zero vector.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            Self::ZERO
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Which half of a tank's brain a tree drives.
///
/// The branch kind selects the operation vocabulary the surrounding
/// simulation expects (steering calls for navigation, aim/fire calls for
/// the turret); the traversal rules are identical for both.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum BranchKind {
    #[default]
    Navigation,
    Turret,
}

/// One authored node as the editor stores it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Unique within a document.
    #[serde(rename = "id")]
    pub node_id: String,
    /// Editor-side palette category (e.g. `"Condition"`, `"Action"`). Kept
    /// for round-tripping; compilation re-derives the kind from the label.
    #[serde(rename = "type")]
    pub node_type: String,
    pub label: String,
    /// Canvas position; `y` is the branching priority key.
    #[serde(flatten)]
    pub position: Vec2,
}

/// One directed edge between two nodes (or from a synthetic root).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionData {
    #[serde(rename = "fromId")]
    pub from_node_id: String,
    #[serde(rename = "fromPort", default)]
    pub from_port_id: String,
    #[serde(rename = "toId")]
    pub to_node_id: String,
    #[serde(rename = "toPort", default)]
    pub to_port_id: String,
}

/// The authored/serialized graph for one agent behavior.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    #[serde(rename = "branchKind")]
    pub branch_kind: BranchKind,
    pub nodes: Vec<NodeData>,
    pub connections: Vec<ConnectionData>,
}

impl TreeDocument {
    pub fn new(branch_kind: BranchKind) -> Self {
        Self {
            branch_kind,
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.nodes.iter().find(|n| n.node_id == id)
    }

    /// Connections leaving either synthetic root, in insertion order.
    pub fn root_connections(&self) -> impl Iterator<Item = &ConnectionData> {
        self.connections
            .iter()
            .filter(|c| is_synthetic_root(&c.from_node_id))
    }

    /// Appends a node, deriving the editor category from the label.
    pub fn add_node(&mut self, id: impl Into<String>, label: impl Into<String>, position: Vec2) {
        let label = label.into();
        self.nodes.push(NodeData {
            node_id: id.into(),
            node_type: label::classify(&label).to_string(),
            label,
            position,
        });
    }

    /// Appends a connection with empty port ids.
    pub fn add_connection(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.connections.push(ConnectionData {
            from_node_id: from.into(),
            from_port_id: String::new(),
            to_node_id: to.into(),
            to_port_id: String::new(),
        });
    }
}
