//! Proximity-triggered interactions.
//!
//! A scene carries an ordered list of [`InteractionRule`]s. When the player
//! presses the interact key, [`evaluate`] walks the list in order and returns
//! the outcome of the first rule whose target is still in the world and lies
//! strictly inside the rule's radius. Evaluation never mutates anything; the
//! caller applies the returned [`Outcome`].

use std::{collections::HashMap, fmt};

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::DistanceAlg;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueId(pub String);

impl DialogueId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DialogueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    ShowDialogue {
        dialogue: DialogueId,
        duration_ms: u64,
    },
    CollectItem {
        item: EntityId,
        display_name: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionRule {
    pub target: EntityId,
    pub radius: f32,
    pub outcome: Outcome,
}

impl InteractionRule {
    pub fn show_dialogue(target: &str, radius: f32, dialogue: &str, duration_ms: u64) -> Self {
        Self {
            target: EntityId::new(target),
            radius,
            outcome: Outcome::ShowDialogue {
                dialogue: DialogueId::new(dialogue),
                duration_ms,
            },
        }
    }

    pub fn collect_item(target: &str, radius: f32, display_name: &str) -> Self {
        Self {
            target: EntityId::new(target),
            radius,
            outcome: Outcome::CollectItem {
                item: EntityId::new(target),
                display_name: display_name.to_string(),
            },
        }
    }

    /// Strict comparison: a player exactly on the radius is out of range. A
    /// NaN or non-positive radius never matches.
    pub fn in_range(&self, player: Point, target: Point) -> bool {
        DistanceAlg::Pythagoras.distance2d(player, target) < self.radius
    }
}

/// Read-only view of which entities are present and where.
pub trait WorldView {
    /// `None` when the entity was never spawned or has been retired.
    fn position_of(&self, id: &EntityId) -> Option<Point>;
}

/// Removal of collected items from the world.
pub trait ItemRetirement {
    /// Returns false if `id` was not present, so nothing changed.
    fn retire(&mut self, id: &EntityId) -> bool;
}

impl WorldView for HashMap<EntityId, Point> {
    fn position_of(&self, id: &EntityId) -> Option<Point> {
        self.get(id).copied()
    }
}

impl ItemRetirement for HashMap<EntityId, Point> {
    fn retire(&mut self, id: &EntityId) -> bool {
        self.remove(id).is_some()
    }
}

/// First-match-wins evaluation over `rules` in list order.
pub fn evaluate<'r, W>(player: Point, rules: &'r [InteractionRule], world: &W) -> Option<&'r Outcome>
where
    W: WorldView + ?Sized,
{
    for rule in rules {
        let Some(target) = world.position_of(&rule.target) else {
            log::debug!("rule for `{}` skipped: target not in world", rule.target);
            continue;
        };
        if rule.in_range(player, target) {
            log::debug!(
                "rule for `{}` fired at distance {:.1}",
                rule.target,
                DistanceAlg::Pythagoras.distance2d(player, target)
            );
            return Some(&rule.outcome);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(entries: &[(&str, Point)]) -> HashMap<EntityId, Point> {
        entries
            .iter()
            .map(|(id, point)| (EntityId::new(*id), *point))
            .collect()
    }

    fn court_rules() -> Vec<InteractionRule> {
        vec![
            InteractionRule::show_dialogue("npc", 100.0, "npc", 3000),
            InteractionRule::collect_item("crystal", 100.0, "Crystal"),
            InteractionRule::show_dialogue("king", 50.0, "king", 3000),
        ]
    }

    fn court() -> HashMap<EntityId, Point> {
        world(&[
            ("npc", Point::new(600, 200)),
            ("king", Point::new(300, 500)),
            ("crystal", Point::new(600, 600)),
        ])
    }

    #[test]
    fn nothing_fires_when_everything_is_far_away() {
        let rules = court_rules();
        let world = court();
        for player in [
            Point::new(100, 100),
            Point::new(0, 0),
            Point::new(1200, 700),
            Point::new(450, 350),
        ] {
            assert_eq!(evaluate(player, &rules, &world), None, "at {player:?}");
        }
    }

    #[test]
    fn single_target_in_range_returns_its_outcome() {
        let rules = court_rules();
        let world = court();

        let near_npc = evaluate(Point::new(560, 230), &rules, &world);
        assert_eq!(
            near_npc,
            Some(&Outcome::ShowDialogue {
                dialogue: DialogueId::new("npc"),
                duration_ms: 3000,
            })
        );

        let near_king = evaluate(Point::new(320, 520), &rules, &world);
        assert_eq!(
            near_king,
            Some(&Outcome::ShowDialogue {
                dialogue: DialogueId::new("king"),
                duration_ms: 3000,
            })
        );

        let near_crystal = evaluate(Point::new(600, 650), &rules, &world);
        assert_eq!(
            near_crystal,
            Some(&Outcome::CollectItem {
                item: EntityId::new("crystal"),
                display_name: "Crystal".to_string(),
            })
        );
    }

    #[test]
    fn radius_boundary_is_exclusive() {
        let rules = vec![InteractionRule::show_dialogue("king", 50.0, "king", 3000)];
        let world = world(&[("king", Point::new(300, 500))]);
        assert_eq!(evaluate(Point::new(350, 500), &rules, &world), None);
        assert!(evaluate(Point::new(349, 500), &rules, &world).is_some());
    }

    #[test]
    fn first_listed_rule_wins_when_radii_overlap() {
        let rules = court_rules();
        // 80 units from the npc, 40 from the crystal.
        let world = world(&[
            ("npc", Point::new(180, 100)),
            ("crystal", Point::new(100, 140)),
        ]);
        let outcome = evaluate(Point::new(100, 100), &rules, &world);
        assert_eq!(
            outcome,
            Some(&Outcome::ShowDialogue {
                dialogue: DialogueId::new("npc"),
                duration_ms: 3000,
            })
        );
    }

    #[test]
    fn retired_target_is_skipped_so_later_rules_can_fire() {
        let rules = vec![
            InteractionRule::collect_item("crystal", 100.0, "Crystal"),
            InteractionRule::collect_item("crystal_2", 100.0, "Crystal Shard"),
        ];
        let world = world(&[("crystal_2", Point::new(120, 100))]);
        let outcome = evaluate(Point::new(100, 100), &rules, &world);
        assert_eq!(
            outcome,
            Some(&Outcome::CollectItem {
                item: EntityId::new("crystal_2"),
                display_name: "Crystal Shard".to_string(),
            })
        );
    }

    #[test]
    fn empty_or_malformed_rules_yield_nothing() {
        let world = court();
        assert_eq!(evaluate(Point::new(600, 200), &[], &world), None);

        let malformed = vec![
            InteractionRule::show_dialogue("npc", f32::NAN, "npc", 3000),
            InteractionRule::show_dialogue("npc", -10.0, "npc", 3000),
            InteractionRule::show_dialogue("ghost", 100.0, "ghost", 3000),
        ];
        assert_eq!(evaluate(Point::new(600, 200), &malformed, &world), None);
    }

    #[test]
    fn outcome_reads_from_tagged_toml() {
        let rule: InteractionRule = toml::from_str(
            r#"
            target = "crystal"
            radius = 100.0
            outcome = { kind = "collect_item", item = "crystal", display_name = "Crystal" }
            "#,
        )
        .unwrap();
        assert_eq!(rule, InteractionRule::collect_item("crystal", 100.0, "Crystal"));
    }
}
