use bracket_geometry::prelude::Point;

use crate::config::SceneConfig;

#[derive(Clone, Debug)]
pub struct MovementContext {
    pub width: i32,
    pub height: i32,
    pub step_seconds: f32,
}

impl MovementContext {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            step_seconds: config.player.step_seconds,
        }
    }

    /// Scene units covered by one step at `speed`, never longer than the
    /// scene. Negative or non-finite products do not move.
    pub fn step_length(&self, speed: f32) -> i32 {
        let distance = speed * self.step_seconds;
        if !distance.is_finite() || distance <= 0.0 {
            return 0;
        }
        let limit = self.width.max(self.height).max(0);
        (distance.round() as i32).min(limit)
    }

    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(0, (self.width - 1).max(0)),
            point.y.clamp(0, (self.height - 1).max(0)),
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameTime {
    pub delta_seconds: f32,
}
