pub mod items;
pub mod npcs;

use bracket_terminal::prelude::{MAGENTA, RGB, YELLOW, to_cp437};

use crate::interaction::InteractionRule;

pub const PLAYER_SPRITE: &str = "player";

/// Glyph animation stand-in for a sprite sheet.
#[derive(Clone, Debug)]
pub struct SpriteTemplate {
    pub key: &'static str,
    pub frames: &'static str,
    pub color: RGB,
    pub frame_rate: f32,
}

impl SpriteTemplate {
    pub const fn new(key: &'static str, frames: &'static str, color: RGB, frame_rate: f32) -> Self {
        Self {
            key,
            frames,
            color,
            frame_rate,
        }
    }

    pub fn glyphs(&self) -> Vec<u16> {
        self.frames.chars().map(to_cp437).collect()
    }

    pub fn first_glyph(&self) -> u16 {
        self.frames.chars().next().map(to_cp437).unwrap_or(b'?' as u16)
    }

    pub fn is_animated(&self) -> bool {
        self.frames.chars().count() > 1 && self.frame_rate > 0.0
    }
}

pub fn builtin_sprites() -> Vec<SpriteTemplate> {
    let mut sprites = vec![SpriteTemplate::new(
        PLAYER_SPRITE,
        "@",
        RGB::named(YELLOW),
        0.0,
    )];
    sprites.extend(npcs::builtin_npcs().into_iter().map(|npc| npc.sprite));
    sprites.extend(items::builtin_items().into_iter().map(|item| item.sprite));
    sprites
}

pub fn placeholder_color() -> RGB {
    RGB::named(MAGENTA)
}

pub fn sprite(key: &str) -> Option<SpriteTemplate> {
    builtin_sprites().into_iter().find(|sprite| sprite.key == key)
}

/// Evaluation order matters: the first rule in range wins.
pub fn builtin_rules() -> Vec<InteractionRule> {
    vec![
        InteractionRule::show_dialogue(npcs::DOG, 100.0, npcs::DOG, npcs::DIALOGUE_MS),
        InteractionRule::collect_item(items::CRYSTAL, 100.0, "Crystal"),
        InteractionRule::show_dialogue(npcs::KING, 50.0, npcs::KING, npcs::DIALOGUE_MS),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_sprite_key_is_unique() {
        let sprites = builtin_sprites();
        for (idx, sprite) in sprites.iter().enumerate() {
            assert!(
                sprites[idx + 1..].iter().all(|other| other.key != sprite.key),
                "duplicate sprite {}",
                sprite.key
            );
        }
    }

    #[test]
    fn idle_loops_have_four_frames() {
        for key in ["npc", "king", "item"] {
            let sprite = sprite(key).unwrap();
            assert_eq!(sprite.glyphs().len(), 4, "{key}");
            assert!(sprite.is_animated());
        }
        assert!(!sprite(PLAYER_SPRITE).unwrap().is_animated());
    }
}
