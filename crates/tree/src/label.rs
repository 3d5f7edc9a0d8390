//! Label compilation: canonical operations from human-authored labels.
//!
//! Authors type free-form labels into the node editor (`"If HP > 50%"`,
//! `"Fire"`, `"wander around"`). [`compile`] maps a label to its canonical
//! [`Operation`] plus an extracted numeric operand, and [`classify`] decides
//! how the interpreter treats the node. Keyword checks run in a fixed
//! priority order, so a label matching several keywords always resolves the
//! same way. Both functions are pure; identical input yields identical
//! output.
//!
//! Comparison operators (`>`, `<`) are deliberately *not* resolved here: the
//! original label is kept on the executable node and re-read at evaluation
//! time via [`explicit_comparator`].

use crate::operation::{NodeKind, Operation};

/// Comparison operator written into a condition label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparator {
    Greater,
    Less,
}

/// Compiles a label into its canonical operation and numeric operand.
pub fn compile(label: &str) -> (Operation, f32) {
    (operation_for(label), extract_operand(label))
}

fn operation_for(label: &str) -> Operation {
    let clean = label.trim().to_lowercase();

    // Condition patterns: first match wins, in this exact order.
    if clean.starts_with("if") {
        if clean.contains("self") {
            return Operation::IfSelf;
        }
        if clean.contains("enemy") {
            return Operation::IfEnemy;
        }
        if clean.contains("ally") {
            return Operation::IfAlly;
        }
        if clean.contains("any") {
            return Operation::IfAny;
        }
        if clean.contains("rifle") || clean.contains("weapon") {
            return Operation::IfRifle;
        }
        if clean.contains("hp") || clean.contains("health") {
            return Operation::IfHp;
        }
        if clean.contains("armor") || clean.contains("armour") {
            return Operation::IfArmor;
        }
        if clean.contains("range") || clean.contains("distance") {
            return Operation::IfRange;
        }
        if clean.contains("tag") {
            return Operation::IfTag;
        }
    }

    // Action keywords; an unmatched "if ..." label falls through to these.
    if clean.contains("fire") || clean.contains("shoot") {
        return Operation::Fire;
    }
    if clean.contains("wander") || clean.contains("roam") {
        return Operation::Wander;
    }
    if clean.contains("move") || clean.contains("go") {
        return Operation::Move;
    }
    if clean.contains("stop") || clean.contains("halt") {
        return Operation::Stop;
    }
    if clean.contains("chase") || clean.contains("follow") {
        return Operation::Chase;
    }
    if clean.contains("flee") || clean.contains("escape") {
        return Operation::Flee;
    }
    if clean.contains("patrol") {
        return Operation::Patrol;
    }
    if clean.contains("guard") || clean.contains("defend") {
        return Operation::Guard;
    }

    if is_subtree_label(&clean) {
        return Operation::SubTree(sanitize(label));
    }

    // No keyword matched: the sanitized label itself names the operation.
    // A handful of sanitized names are recognized built-ins.
    match sanitize(label) {
        name if name == "Wait" => Operation::Wait,
        name if name == "TrackTarget" || name == "CenterTarget" => Operation::TrackTarget,
        name => Operation::Custom(name),
    }
}

/// Determines how a labelled node behaves during traversal.
pub fn classify(label: &str) -> NodeKind {
    let clean = label.trim().to_lowercase();
    if clean.starts_with("if")
        || clean.contains("condition")
        || clean.contains("check")
        || clean.contains("when")
    {
        return NodeKind::Condition;
    }
    if is_subtree_label(&clean) {
        return NodeKind::SubTree;
    }
    NodeKind::Action
}

fn is_subtree_label(clean: &str) -> bool {
    clean.contains("subai") || clean.contains("sub-ai") || clean.contains("sub ai")
}

/// Extracts the first decimal number (`\d+(\.\d+)?`) in the label, or 0.
pub fn extract_operand(label: &str) -> f32 {
    let bytes = label.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            // Fractional part only counts when a digit follows the dot.
            if i + 1 < bytes.len() && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            return label[start..i].parse().unwrap_or(0.0);
        }
        i += 1;
    }
    0.0
}

/// Comparison operator written into the label, if any.
///
/// Called on every condition evaluation rather than cached at compile time;
/// the label is static per node, so re-reading it is equivalent and keeps the
/// compiled node free of evaluation policy.
pub fn explicit_comparator(label: &str) -> Option<Comparator> {
    if label.contains('>') {
        Some(Comparator::Greater)
    } else if label.contains('<') {
        Some(Comparator::Less)
    } else {
        None
    }
}

/// Collapses a label into an alphanumeric, title-cased identifier.
///
/// Anything that is not ASCII alphanumeric separates words; each word is
/// title-cased and concatenated. An empty result becomes `"Unknown"`.
pub fn sanitize(label: &str) -> String {
    let mut out = String::new();
    for word in label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
        }
    }
    if out.is_empty() { "Unknown".to_string() } else { out }
}
