//! Scene configuration.
//!
//! The builtin scene comes from `data/`; a TOML file with the same shape can
//! replace it. Loading validates that every rule points at something that
//! exists, so the dispatcher only ever has to cope with retired targets.

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::RGB;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    data::{self, PLAYER_SPRITE},
    ecs::PLAYER_ID,
    interaction::{DialogueId, EntityId, InteractionRule, Outcome},
};

pub const SCENE_ENV: &str = "CRYSTALCOURT_SCENE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scene file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse scene file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("scene size {width}x{height} is not positive")]
    EmptyScene { width: i32, height: i32 },
    #[error("player {field} must be a positive finite number, got {value}")]
    InvalidMovement { field: &'static str, value: f32 },
    #[error("player step of {distance} units is longer than the scene ({limit})")]
    StepTooLong { distance: f32, limit: i32 },
    #[error("entity id `{0}` is used more than once")]
    DuplicateEntity(EntityId),
    #[error("entity `{id}` uses unknown sprite `{sprite}`")]
    UnknownSprite { id: EntityId, sprite: String },
    #[error("rule #{index} targets unknown entity `{target}`")]
    UnknownTarget { index: usize, target: EntityId },
    #[error("rule #{index} has invalid radius {radius}")]
    InvalidRadius { index: usize, radius: f32 },
    #[error("rule #{index} shows unknown dialogue `{dialogue}`")]
    UnknownDialogue { index: usize, dialogue: DialogueId },
    #[error("rule #{index} collects `{item}`, which is not an item in the scene")]
    NotAnItem { index: usize, item: EntityId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Npc,
    Item,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub fg: [u8; 3],
    pub bg: [u8; 3],
}

impl OverlayStyle {
    pub fn fg(&self) -> RGB {
        RGB::from_u8(self.fg[0], self.fg[1], self.fg[2])
    }

    pub fn bg(&self) -> RGB {
        RGB::from_u8(self.bg[0], self.bg[1], self.bg[2])
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            fg: [255, 255, 255],
            bg: [0, 0, 0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub x: i32,
    pub y: i32,
    /// Scene units per second while a movement key is held.
    pub speed: f32,
    /// Seconds of movement applied per movement key event.
    pub step_seconds: f32,
    pub sprite: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            speed: 160.0,
            step_seconds: 0.1,
            sprite: PLAYER_SPRITE.to_string(),
        }
    }
}

impl PlayerConfig {
    pub fn spawn(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub sprite: String,
}

impl EntityConfig {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DialogueConfig {
    pub id: DialogueId,
    pub speaker: String,
    pub line: String,
    #[serde(default)]
    pub style: OverlayStyle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: i32,
    pub height: i32,
    pub cell_width: i32,
    pub cell_height: i32,
    pub player: PlayerConfig,
    pub entities: Vec<EntityConfig>,
    pub rules: Vec<InteractionRule>,
    pub dialogues: Vec<DialogueConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let npcs = data::npcs::builtin_npcs();
        let items = data::items::builtin_items();

        let mut entities: Vec<EntityConfig> = npcs
            .iter()
            .map(|npc| EntityConfig {
                id: EntityId::new(npc.id),
                kind: EntityKind::Npc,
                name: npc.name.to_string(),
                x: npc.x,
                y: npc.y,
                sprite: npc.sprite.key.to_string(),
            })
            .collect();
        entities.extend(items.iter().map(|item| EntityConfig {
            id: EntityId::new(item.id),
            kind: EntityKind::Item,
            name: item.display_name.to_string(),
            x: item.x,
            y: item.y,
            sprite: item.sprite.key.to_string(),
        }));

        let dialogues = npcs
            .iter()
            .map(|npc| DialogueConfig {
                id: DialogueId::new(npc.id),
                speaker: npc.name.to_string(),
                line: npc.line.to_string(),
                style: npc.style,
            })
            .collect();

        Self {
            width: 1280,
            height: 720,
            cell_width: 16,
            cell_height: 24,
            player: PlayerConfig::default(),
            entities,
            rules: data::builtin_rules(),
            dialogues,
        }
    }
}

impl SceneConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Scene named by `CRYSTALCOURT_SCENE`, or the builtin one. A broken file
    /// is logged and replaced by the builtin scene.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(SCENE_ENV) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => {
                log::info!("loaded scene from {}", Path::new(&path).display());
                config
            }
            Err(err) => {
                log::warn!("{err}; falling back to the builtin scene");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::EmptyScene {
                width: self.width,
                height: self.height,
            });
        }

        for (field, value) in [
            ("speed", self.player.speed),
            ("step_seconds", self.player.step_seconds),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidMovement { field, value });
            }
        }
        let distance = self.player.speed * self.player.step_seconds;
        let limit = self.width.max(self.height);
        if distance > limit as f32 {
            return Err(ConfigError::StepTooLong { distance, limit });
        }

        let player_id = EntityId::new(PLAYER_ID);
        let mut seen = HashSet::from([&player_id]);
        for entity in &self.entities {
            if !seen.insert(&entity.id) {
                return Err(ConfigError::DuplicateEntity(entity.id.clone()));
            }
            if data::sprite(&entity.sprite).is_none() {
                return Err(ConfigError::UnknownSprite {
                    id: entity.id.clone(),
                    sprite: entity.sprite.clone(),
                });
            }
        }
        if data::sprite(&self.player.sprite).is_none() {
            return Err(ConfigError::UnknownSprite {
                id: player_id.clone(),
                sprite: self.player.sprite.clone(),
            });
        }

        for (index, rule) in self.rules.iter().enumerate() {
            let Some(target) = self.entity(&rule.target) else {
                return Err(ConfigError::UnknownTarget {
                    index,
                    target: rule.target.clone(),
                });
            };
            if !rule.radius.is_finite() || rule.radius <= 0.0 {
                return Err(ConfigError::InvalidRadius {
                    index,
                    radius: rule.radius,
                });
            }
            match &rule.outcome {
                Outcome::ShowDialogue { dialogue, .. } => {
                    if self.dialogue(dialogue).is_none() {
                        return Err(ConfigError::UnknownDialogue {
                            index,
                            dialogue: dialogue.clone(),
                        });
                    }
                }
                Outcome::CollectItem { item, .. } => {
                    let is_item = self
                        .entity(item)
                        .is_some_and(|entity| entity.kind == EntityKind::Item);
                    if !is_item || target.kind != EntityKind::Item {
                        return Err(ConfigError::NotAnItem {
                            index,
                            item: item.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn entity(&self, id: &EntityId) -> Option<&EntityConfig> {
        self.entities.iter().find(|entity| &entity.id == id)
    }

    pub fn dialogue(&self, id: &DialogueId) -> Option<&DialogueConfig> {
        self.dialogues.iter().find(|dialogue| &dialogue.id == id)
    }

    /// Terminal cells needed to show the whole scene.
    pub fn grid_size(&self) -> (i32, i32) {
        (
            self.width / self.cell_width.max(1),
            self.height / self.cell_height.max(1),
        )
    }
}
