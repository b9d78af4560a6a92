use bracket_terminal::prelude::RGB;

use super::SpriteTemplate;

pub const CRYSTAL: &str = "crystal";

#[derive(Clone, Debug)]
pub struct ItemTemplate {
    pub id: &'static str,
    pub display_name: &'static str,
    pub x: i32,
    pub y: i32,
    pub sprite: SpriteTemplate,
}

pub fn builtin_items() -> Vec<ItemTemplate> {
    vec![ItemTemplate {
        id: CRYSTAL,
        display_name: "Crystal",
        x: 600,
        y: 600,
        sprite: SpriteTemplate::new("item", "|/-\\", RGB::from_u8(120, 220, 255), 6.0),
    }]
}
