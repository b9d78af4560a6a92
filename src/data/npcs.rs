use bracket_terminal::prelude::RGB;

use super::SpriteTemplate;
use crate::config::OverlayStyle;

pub const DOG: &str = "npc";
pub const KING: &str = "king";
pub const DIALOGUE_MS: u64 = 3000;

#[derive(Clone, Debug)]
pub struct NpcTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub x: i32,
    pub y: i32,
    pub sprite: SpriteTemplate,
    pub line: &'static str,
    pub style: OverlayStyle,
}

pub fn builtin_npcs() -> Vec<NpcTemplate> {
    vec![
        NpcTemplate {
            id: DOG,
            name: "Dog",
            x: 600,
            y: 200,
            sprite: SpriteTemplate::new("npc", "dDdd", RGB::from_u8(205, 160, 100), 3.0),
            line: "Hi there! Welcome to our world.",
            style: OverlayStyle {
                fg: [255, 255, 255],
                bg: [0, 0, 0],
            },
        },
        NpcTemplate {
            id: KING,
            name: "King",
            x: 300,
            y: 500,
            sprite: SpriteTemplate::new("king", "KkKk", RGB::from_u8(255, 200, 40), 3.0),
            line: "Find me a crystal and I will reward you as the new king!",
            style: OverlayStyle {
                fg: [0, 0, 0],
                bg: [252, 248, 248],
            },
        },
    ]
}
