use bracket_geometry::prelude::Point;
use specs::prelude::*;

use super::{
    components::{Actor, IdleAnimation, IntentStep, Position, Renderable},
    resources::{FrameTime, MovementContext},
};

#[derive(Default)]
pub struct MovementSystem;

impl<'a> System<'a> for MovementSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, Position>,
        WriteStorage<'a, IntentStep>,
        ReadStorage<'a, Actor>,
        ReadExpect<'a, MovementContext>,
    );

    fn run(
        &mut self,
        (entities, mut positions, mut intents, actors, movement): Self::SystemData,
    ) {
        let mut to_clear = Vec::new();
        for (entity, pos, intent, actor) in (&entities, &mut positions, &intents, &actors).join() {
            let step = movement.step_length(actor.speed);
            let target = Point::new(
                pos.point.x.saturating_add(intent.delta.x.signum() * step),
                pos.point.y.saturating_add(intent.delta.y.signum() * step),
            );
            pos.point = movement.clamp(target);
            to_clear.push(entity);
        }

        for entity in to_clear {
            intents.remove(entity);
        }
    }
}

#[derive(Default)]
pub struct AnimationSystem;

impl<'a> System<'a> for AnimationSystem {
    type SystemData = (
        ReadExpect<'a, FrameTime>,
        WriteStorage<'a, IdleAnimation>,
        WriteStorage<'a, Renderable>,
    );

    fn run(&mut self, (frame_time, mut animations, mut renderables): Self::SystemData) {
        for (animation, renderable) in (&mut animations, &mut renderables).join() {
            if animation.frames.is_empty() || animation.frame_rate <= 0.0 {
                continue;
            }
            let period = 1.0 / animation.frame_rate;
            animation.elapsed += frame_time.delta_seconds.max(0.0);
            while animation.elapsed >= period {
                animation.elapsed -= period;
                animation.current = (animation.current + 1) % animation.frames.len();
            }
            renderable.glyph = animation.frames[animation.current];
        }
    }
}
