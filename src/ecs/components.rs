use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::RGB;
use specs::prelude::{Component, NullStorage, VecStorage};

#[derive(Clone, Debug)]
pub struct Position {
    pub point: Point,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Renderable {
    pub glyph: u16,
    pub color: RGB,
    pub order: i32,
}

impl Component for Renderable {
    type Storage = VecStorage<Self>;
}

/// Anything with an `Actor` can be moved by an [`IntentStep`].
#[derive(Clone, Debug)]
pub struct Actor {
    pub speed: f32,
}

impl Component for Actor {
    type Storage = VecStorage<Self>;
}

/// Direction for this frame only; each axis is -1, 0 or 1.
#[derive(Clone, Debug)]
pub struct IntentStep {
    pub delta: Point,
}

impl Default for IntentStep {
    fn default() -> Self {
        Self {
            delta: Point::new(0, 0),
        }
    }
}

impl Component for IntentStep {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, Default)]
pub struct IdleAnimation {
    pub frames: Vec<u16>,
    pub frame_rate: f32,
    pub elapsed: f32,
    pub current: usize,
}

impl Component for IdleAnimation {
    type Storage = VecStorage<Self>;
}

#[derive(Default)]
pub struct PlayerTag;

impl Component for PlayerTag {
    type Storage = NullStorage<Self>;
}
