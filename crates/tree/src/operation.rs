//! Canonical operations and node kinds.
//!
//! The label compiler resolves every authored label to one [`Operation`] at
//! compile time, so the interpreter dispatches on a closed enum instead of
//! comparing strings every tick. The canonical string form (used by the
//! serialized executable node list) round-trips through `Display`/`From`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the interpreter treats a node during traversal.
///
/// The kind is derived from the label independently of the operation: a label
/// like `"Check fire"` classifies as a condition even though its operation
/// resolves to [`Operation::Fire`]. Evaluating such a node logs a warning and
/// fails the condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum NodeKind {
    Condition,
    Action,
    SubTree,
}

/// Canonical behavior identifier produced by the label compiler.
///
/// `SubTree` carries the sanitized name of the delegated tree; `Custom`
/// carries the sanitized form of a label no keyword matched (dispatched as a
/// logged no-op).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Operation {
    IfSelf,
    IfEnemy,
    IfAlly,
    IfAny,
    IfRifle,
    IfHp,
    IfArmor,
    IfRange,
    IfTag,
    Fire,
    Wander,
    Move,
    Stop,
    Chase,
    Flee,
    Patrol,
    Guard,
    Wait,
    TrackTarget,
    SubTree(String),
    Custom(String),
}

impl Operation {
    /// True for the built-in `If*` predicates.
    pub fn is_condition(&self) -> bool {
        matches!(
            self,
            Self::IfSelf
                | Self::IfEnemy
                | Self::IfAlly
                | Self::IfAny
                | Self::IfRifle
                | Self::IfHp
                | Self::IfArmor
                | Self::IfRange
                | Self::IfTag
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IfSelf => write!(f, "IfSelf"),
            Self::IfEnemy => write!(f, "IfEnemy"),
            Self::IfAlly => write!(f, "IfAlly"),
            Self::IfAny => write!(f, "IfAny"),
            Self::IfRifle => write!(f, "IfRifle"),
            Self::IfHp => write!(f, "IfHP"),
            Self::IfArmor => write!(f, "IfArmor"),
            Self::IfRange => write!(f, "IfRange"),
            Self::IfTag => write!(f, "IfTag"),
            Self::Fire => write!(f, "Fire"),
            Self::Wander => write!(f, "Wander"),
            Self::Move => write!(f, "Move"),
            Self::Stop => write!(f, "Stop"),
            Self::Chase => write!(f, "Chase"),
            Self::Flee => write!(f, "Flee"),
            Self::Patrol => write!(f, "Patrol"),
            Self::Guard => write!(f, "Guard"),
            Self::Wait => write!(f, "Wait"),
            Self::TrackTarget => write!(f, "TrackTarget"),
            Self::SubTree(name) => write!(f, "SubAI_{name}"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

impl From<&str> for Operation {
    fn from(s: &str) -> Self {
        match s {
            "IfSelf" => Self::IfSelf,
            "IfEnemy" => Self::IfEnemy,
            "IfAlly" => Self::IfAlly,
            "IfAny" => Self::IfAny,
            "IfRifle" => Self::IfRifle,
            "IfHP" => Self::IfHp,
            "IfArmor" => Self::IfArmor,
            "IfRange" => Self::IfRange,
            "IfTag" => Self::IfTag,
            "Fire" => Self::Fire,
            "Wander" => Self::Wander,
            "Move" => Self::Move,
            "Stop" => Self::Stop,
            "Chase" => Self::Chase,
            "Flee" => Self::Flee,
            "Patrol" => Self::Patrol,
            "Guard" => Self::Guard,
            "Wait" => Self::Wait,
            "TrackTarget" | "CenterTarget" => Self::TrackTarget,
            _ => match s.strip_prefix("SubAI_") {
                Some(name) => Self::SubTree(name.to_string()),
                None => Self::Custom(s.to_string()),
            },
        }
    }
}

impl From<String> for Operation {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.to_string()
    }
}
