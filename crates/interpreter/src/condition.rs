//! Condition predicate evaluation.
//!
//! Comparison operators are re-read from the authored label on every
//! evaluation (the label is static per node, so this is equivalent to
//! caching). Without an explicit `>` or `<`, health and armor checks default
//! to "at least" and range checks to "within".

use ai_tree::{Comparator, ExecutableNode, Operation, label};

use crate::adapter::AgentAdapter;
use crate::config::InterpreterConfig;

enum DefaultCmp {
    AtLeast,
    Within,
}

/// Evaluates a condition node against the adapter's current sensor view.
pub(crate) fn evaluate<A: AgentAdapter>(
    node: &ExecutableNode,
    adapter: &A,
    config: &InterpreterConfig,
) -> bool {
    match &node.operation {
        Operation::IfSelf => adapter.current_target() == Some(adapter.self_id()),
        Operation::IfEnemy => adapter.current_target().is_some_and(|t| adapter.is_enemy(t)),
        Operation::IfAlly => adapter.current_target().is_some_and(|t| adapter.is_ally(t)),
        Operation::IfAny => adapter.has_target(),
        Operation::IfRifle => adapter
            .current_target()
            .is_some_and(|t| adapter.distance_to(t) <= adapter.weapon_range()),
        Operation::IfHp => compare(node, adapter.health_percent(), DefaultCmp::AtLeast),
        Operation::IfArmor => compare(node, adapter.armor_value(), DefaultCmp::AtLeast),
        Operation::IfRange => match adapter.current_target() {
            Some(target) => compare(node, adapter.distance_to(target), DefaultCmp::Within),
            None => false,
        },
        Operation::IfTag => adapter
            .current_target()
            .is_some_and(|t| adapter.matches_tag(t, &config.identity_tag)),
        other => {
            tracing::warn!(
                node = %node.node_id,
                operation = %other,
                "unrecognized condition, evaluating as false"
            );
            false
        }
    }
}

fn compare(node: &ExecutableNode, value: f32, default: DefaultCmp) -> bool {
    match label::explicit_comparator(&node.original_label) {
        Some(Comparator::Greater) => value > node.operand,
        Some(Comparator::Less) => value < node.operand,
        None => match default {
            DefaultCmp::AtLeast => value >= node.operand,
            DefaultCmp::Within => value <= node.operand,
        },
    }
}

#[cfg(test)]
mod tests {
    use ai_tree::{NodeKind, Vec2};

    use super::*;
    use crate::adapter::EntityId;

    /// Minimal sensor stub; actuators are unreachable from conditions.
    struct Sensors {
        target: Option<EntityId>,
        enemy: bool,
        ally: bool,
        tagged: bool,
        distance: f32,
        health: f32,
        armor: f32,
        range: f32,
    }

    impl Default for Sensors {
        fn default() -> Self {
            Self {
                target: Some(EntityId(7)),
                enemy: true,
                ally: false,
                tagged: false,
                distance: 10.0,
                health: 100.0,
                armor: 0.0,
                range: 25.0,
            }
        }
    }

    impl AgentAdapter for Sensors {
        fn self_id(&self) -> EntityId {
            EntityId(1)
        }
        fn current_target(&self) -> Option<EntityId> {
            self.target
        }
        fn position(&self) -> Vec2 {
            Vec2::ZERO
        }
        fn target_position(&self, _target: EntityId) -> Option<Vec2> {
            self.target.map(|_| Vec2::new(self.distance, 0.0))
        }
        fn distance_to(&self, _target: EntityId) -> f32 {
            self.distance
        }
        fn health_percent(&self) -> f32 {
            self.health
        }
        fn armor_value(&self) -> f32 {
            self.armor
        }
        fn is_enemy(&self, _target: EntityId) -> bool {
            self.enemy
        }
        fn is_ally(&self, _target: EntityId) -> bool {
            self.ally
        }
        fn matches_tag(&self, _target: EntityId, _tag: &str) -> bool {
            self.tagged
        }
        fn weapon_range(&self) -> f32 {
            self.range
        }
        fn can_fire(&self) -> bool {
            false
        }
        fn fire_at(&mut self, _target: EntityId) {}
        fn move_toward(&mut self, _direction: Vec2) {}
        fn stop_movement(&mut self) {}
        fn rotate_turret_toward(&mut self, _target: EntityId) {}
        fn rotate_in_place(&mut self) {}
    }

    fn node(label: &str) -> ExecutableNode {
        let (operation, operand) = ai_tree::label::compile(label);
        ExecutableNode {
            node_id: "n".to_string(),
            operation,
            original_label: label.to_string(),
            kind: NodeKind::Condition,
            operand,
            out_edges: Vec::new(),
            position: Vec2::ZERO,
        }
    }

    fn eval(label: &str, sensors: &Sensors) -> bool {
        evaluate(&node(label), sensors, &InterpreterConfig::default())
    }

    #[test]
    fn target_classification_conditions() {
        let sensors = Sensors::default();
        assert!(eval("If Enemy", &sensors));
        assert!(!eval("If Ally", &sensors));
        assert!(eval("If Any", &sensors));
        assert!(!eval("If Self", &sensors));

        let no_target = Sensors {
            target: None,
            ..Sensors::default()
        };
        assert!(!eval("If Enemy", &no_target));
        assert!(!eval("If Any", &no_target));
    }

    #[test]
    fn if_self_matches_own_id() {
        let sensors = Sensors {
            target: Some(EntityId(1)),
            ..Sensors::default()
        };
        assert!(eval("If Self", &sensors));
    }

    #[test]
    fn rifle_checks_weapon_range() {
        let sensors = Sensors {
            distance: 25.0,
            ..Sensors::default()
        };
        assert!(eval("If Rifle", &sensors));
        let far = Sensors {
            distance: 25.1,
            ..Sensors::default()
        };
        assert!(!eval("If weapon ready", &far));
    }

    #[test]
    fn hp_comparator_comes_from_the_label() {
        let sensors = Sensors {
            health: 50.0,
            ..Sensors::default()
        };
        assert!(!eval("If HP > 50%", &sensors));
        assert!(!eval("If HP < 50%", &sensors));
        // No operator: "at least".
        assert!(eval("If HP 50%", &sensors));
        assert!(eval("If HP > 49", &sensors));
    }

    #[test]
    fn armor_defaults_to_at_least() {
        let sensors = Sensors {
            armor: 12.0,
            ..Sensors::default()
        };
        assert!(eval("If Armor 12", &sensors));
        assert!(!eval("If Armor > 12", &sensors));
    }

    #[test]
    fn range_defaults_to_within() {
        let sensors = Sensors {
            distance: 8.0,
            ..Sensors::default()
        };
        assert!(eval("If Range 10", &sensors));
        assert!(eval("If Range < 10", &sensors));
        assert!(!eval("If Range > 10", &sensors));

        let no_target = Sensors {
            target: None,
            ..Sensors::default()
        };
        assert!(!eval("If Range < 10", &no_target));
    }

    #[test]
    fn tag_uses_configured_identity() {
        let sensors = Sensors {
            tagged: true,
            ..Sensors::default()
        };
        assert!(eval("If tag", &sensors));
    }

    #[test]
    fn non_predicate_operation_fails() {
        // "Check fire" classifies as a condition but resolves to Fire.
        let sensors = Sensors::default();
        assert!(!eval("Check fire", &sensors));
    }
}
