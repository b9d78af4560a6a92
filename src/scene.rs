//! One running scene: entity records, inventory, dialogue overlays and the
//! scene clock, driven by the engine's frame callback and key events.

use std::collections::BTreeMap;

use bracket_geometry::prelude::Point;
use serde::Serialize;

use crate::{
    config::{DialogueConfig, SceneConfig},
    dialogue::DialogueBoard,
    ecs::{SceneWorld, components::Renderable},
    interaction::{DialogueId, Outcome, evaluate},
    inventory::{CollectResult, Inventory},
};

/// What the overlay panels need to draw.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PresentationSnapshot {
    pub inventory: Vec<String>,
    pub dialogue_visibility: BTreeMap<DialogueId, bool>,
}

#[derive(Serialize)]
struct SnapshotDump<'a> {
    captured_at: String,
    frame: u64,
    player: [i32; 2],
    #[serde(flatten)]
    snapshot: &'a PresentationSnapshot,
}

pub struct Scene {
    config: SceneConfig,
    world: SceneWorld,
    inventory: Inventory,
    dialogues: DialogueBoard,
    clock_ms: f64,
    notices: Vec<String>,
    torn_down: bool,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        let world = SceneWorld::new(&config);
        let dialogues =
            DialogueBoard::with_dialogues(config.dialogues.iter().map(|d| d.id.clone()));
        Self {
            config,
            world,
            inventory: Inventory::new(),
            dialogues,
            clock_ms: 0.0,
            notices: Vec::new(),
            torn_down: false,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock_ms as u64
    }

    pub fn frame(&self) -> u64 {
        self.world.frame
    }

    /// Frame callback: advances the clock, moves entities and fires due
    /// dialogue hides.
    pub fn update(&mut self, delta_ms: f32) {
        if self.torn_down {
            return;
        }
        self.clock_ms += f64::from(delta_ms.max(0.0));
        self.world.advance(delta_ms);
        let now = self.now_ms();
        for hidden in self.dialogues.advance(now) {
            log::debug!("dialogue `{hidden}` auto-hidden at {now}ms");
        }
    }

    /// Queues one frame of movement. Each axis is clamped to -1..=1.
    pub fn move_player(&mut self, dx: i32, dy: i32) {
        if self.torn_down || (dx == 0 && dy == 0) {
            return;
        }
        self.world
            .queue_player_step(Point::new(dx.signum(), dy.signum()));
    }

    pub fn player_point(&self) -> Point {
        self.world.player_point()
    }

    #[cfg(test)]
    pub fn set_player_position(&mut self, point: Point) {
        self.world.set_player_position(point);
    }

    /// The current outcome for the interact key, without applying it.
    pub fn evaluate(&self) -> Option<&Outcome> {
        evaluate(self.world.player_point(), &self.config.rules, &self.world)
    }

    /// Interact key handler: evaluates the rules and applies at most one
    /// outcome.
    pub fn interact(&mut self) -> Option<Outcome> {
        if self.torn_down {
            return None;
        }
        let outcome = self.evaluate().cloned();
        match &outcome {
            Some(outcome) => self.apply(outcome),
            None => log::debug!("interact at {:?}: nothing in range", self.player_point()),
        }
        outcome
    }

    pub fn apply(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::ShowDialogue {
                dialogue,
                duration_ms,
            } => {
                log::info!("showing dialogue `{dialogue}` for {duration_ms}ms");
                let now = self.now_ms();
                self.dialogues.show_exclusive(dialogue, *duration_ms, now);
            }
            Outcome::CollectItem { item, display_name } => {
                if let CollectResult::Collected { .. } =
                    self.inventory.collect(&mut self.world, item, display_name)
                {
                    self.notices.push("You picked up the item!".to_string());
                }
            }
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    #[cfg(test)]
    pub fn is_visible(&self, id: &DialogueId) -> bool {
        self.dialogues.is_visible(id)
    }

    pub fn visible_dialogues(&self) -> Vec<&DialogueConfig> {
        self.dialogues
            .visible()
            .filter_map(|id| self.config.dialogue(id))
            .collect()
    }

    pub fn drain_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn each_renderable<F>(&self, f: F)
    where
        F: FnMut(Point, &Renderable),
    {
        self.world.each_renderable(f);
    }

    pub fn snapshot(&self) -> PresentationSnapshot {
        PresentationSnapshot {
            inventory: self.inventory.entries().to_vec(),
            dialogue_visibility: self.dialogues.visibility_map(),
        }
    }

    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        let snapshot = self.snapshot();
        let player = self.player_point();
        serde_json::to_string(&SnapshotDump {
            captured_at: chrono::Local::now().to_rfc3339(),
            frame: self.frame(),
            player: [player.x, player.y],
            snapshot: &snapshot,
        })
    }

    /// Cancels pending dialogue hides and stops reacting to input and
    /// frames. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let cancelled = self.dialogues.teardown();
        self.world.clear_player_intent();
        self.torn_down = true;
        log::info!("scene torn down, {cancelled} dialogue timers cancelled");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
