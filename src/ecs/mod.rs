pub mod components;
pub mod resources;
pub mod systems;

use std::collections::HashMap;

use bracket_geometry::prelude::Point;
use specs::prelude::{
    Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
};

use crate::{
    config::{EntityConfig, EntityKind, SceneConfig},
    data::{self, SpriteTemplate},
    interaction::{EntityId, ItemRetirement, WorldView},
};

use self::{
    components::{Actor, IdleAnimation, IntentStep, PlayerTag, Position, Renderable},
    resources::{FrameTime, MovementContext},
    systems::{AnimationSystem, MovementSystem},
};

pub const PLAYER_ID: &str = "player";

/// Entity records for one scene, indexed by their configured id.
pub struct SceneWorld {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
    player: Entity,
    index: HashMap<EntityId, Entity>,
    pub frame: u64,
}

impl SceneWorld {
    pub fn new(config: &SceneConfig) -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        specs_world.insert(MovementContext::from_config(config));
        specs_world.insert(FrameTime::default());

        let mut index = HashMap::new();
        let player = Self::spawn_player(&mut specs_world, config);
        index.insert(EntityId::new(PLAYER_ID), player);
        for spawn in &config.entities {
            let entity = Self::spawn_prop(&mut specs_world, spawn);
            index.insert(spawn.id.clone(), entity);
        }

        let dispatcher = DispatcherBuilder::new()
            .with(MovementSystem, "movement", &[])
            .with(AnimationSystem, "animation", &[])
            .build();

        log::info!(
            "scene set up with {} entities in {}x{}",
            index.len(),
            config.width,
            config.height
        );

        Self {
            specs_world,
            dispatcher,
            player,
            index,
            frame: 0,
        }
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<Position>();
        world.register::<Renderable>();
        world.register::<Actor>();
        world.register::<IntentStep>();
        world.register::<IdleAnimation>();
        world.register::<PlayerTag>();
    }

    fn sprite_or_placeholder(key: &str) -> SpriteTemplate {
        data::sprite(key).unwrap_or_else(|| {
            log::warn!("no sprite `{key}`, drawing a placeholder");
            SpriteTemplate::new("placeholder", "?", data::placeholder_color(), 0.0)
        })
    }

    fn spawn_player(world: &mut SpecsWorld, config: &SceneConfig) -> Entity {
        let sprite = Self::sprite_or_placeholder(&config.player.sprite);
        world
            .create_entity()
            .with(Position {
                point: config.player.spawn(),
            })
            .with(Renderable {
                glyph: sprite.first_glyph(),
                color: sprite.color,
                order: 2,
            })
            .with(Actor {
                speed: config.player.speed,
            })
            .with(PlayerTag)
            .build()
    }

    fn spawn_prop(world: &mut SpecsWorld, spawn: &EntityConfig) -> Entity {
        let sprite = Self::sprite_or_placeholder(&spawn.sprite);
        let order = match spawn.kind {
            EntityKind::Item => 0,
            EntityKind::Npc => 1,
        };
        let mut builder = world
            .create_entity()
            .with(Position {
                point: spawn.point(),
            })
            .with(Renderable {
                glyph: sprite.first_glyph(),
                color: sprite.color,
                order,
            });
        if sprite.is_animated() {
            builder = builder.with(IdleAnimation {
                frames: sprite.glyphs(),
                frame_rate: sprite.frame_rate,
                elapsed: 0.0,
                current: 0,
            });
        }
        builder.build()
    }

    /// Runs one frame of movement and animation.
    pub fn advance(&mut self, delta_ms: f32) {
        self.specs_world.insert(FrameTime {
            delta_seconds: delta_ms / 1000.0,
        });
        self.dispatcher.dispatch(&self.specs_world);
        self.specs_world.maintain();
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn queue_player_step(&mut self, delta: Point) {
        let mut intents = self.specs_world.write_component::<IntentStep>();
        let _ = intents.insert(self.player, IntentStep { delta });
    }

    pub fn clear_player_intent(&mut self) {
        let mut intents = self.specs_world.write_component::<IntentStep>();
        let _ = intents.remove(self.player);
    }

    pub fn player_point(&self) -> Point {
        let storage = self.specs_world.read_component::<Position>();
        storage
            .get(self.player)
            .map(|pos| pos.point)
            .unwrap_or(Point::new(0, 0))
    }

    #[cfg(test)]
    pub fn set_player_position(&mut self, point: Point) {
        let context = (*self.specs_world.read_resource::<MovementContext>()).clone();
        let mut positions = self.specs_world.write_component::<Position>();
        if let Some(pos) = positions.get_mut(self.player) {
            pos.point = context.clamp(point);
        }
    }

    pub fn each_renderable<F>(&self, mut f: F)
    where
        F: FnMut(Point, &Renderable),
    {
        let positions = self.specs_world.read_component::<Position>();
        let renderables = self.specs_world.read_component::<Renderable>();
        let mut drawn: Vec<(Point, &Renderable)> = (&positions, &renderables)
            .join()
            .map(|(pos, renderable)| (pos.point, renderable))
            .collect();
        drawn.sort_by_key(|(_, renderable)| renderable.order);
        for (point, renderable) in drawn {
            f(point, renderable);
        }
    }

    #[cfg(test)]
    pub fn entity_count(&self) -> usize {
        self.index.len()
    }
}

impl ItemRetirement for SceneWorld {
    /// Removes a prop from the scene. Returns false if it was already gone.
    fn retire(&mut self, id: &EntityId) -> bool {
        if id.as_str() == PLAYER_ID {
            return false;
        }
        let Some(entity) = self.index.remove(id) else {
            return false;
        };
        self.specs_world.delete_entity(entity).is_ok()
    }
}

impl WorldView for SceneWorld {
    fn position_of(&self, id: &EntityId) -> Option<Point> {
        let entity = *self.index.get(id)?;
        let positions = self.specs_world.read_component::<Position>();
        positions.get(entity).map(|pos| pos.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_scene_spawns_player_and_props() {
        let world = SceneWorld::new(&SceneConfig::default());
        assert_eq!(world.entity_count(), 4);
        assert_eq!(world.player_point(), Point::new(100, 100));
        assert_eq!(
            world.position_of(&EntityId::new("king")),
            Some(Point::new(300, 500))
        );
    }

    #[test]
    fn player_step_moves_by_speed_times_step() {
        let mut world = SceneWorld::new(&SceneConfig::default());
        world.queue_player_step(Point::new(1, 0));
        world.advance(16.0);
        assert_eq!(world.player_point(), Point::new(116, 100));

        // Intent lasts a single frame.
        world.advance(16.0);
        assert_eq!(world.player_point(), Point::new(116, 100));
    }

    #[test]
    fn player_is_clamped_to_the_scene() {
        let mut world = SceneWorld::new(&SceneConfig::default());
        world.set_player_position(Point::new(5, 5));
        world.queue_player_step(Point::new(-1, -1));
        world.advance(16.0);
        assert_eq!(world.player_point(), Point::new(0, 0));

        world.set_player_position(Point::new(5000, 5000));
        assert_eq!(world.player_point(), Point::new(1279, 719));
    }

    #[test]
    fn oversized_speed_is_capped_at_the_scene_edge() {
        let mut config = SceneConfig::default();
        config.player.speed = 1e12;
        let mut world = SceneWorld::new(&config);
        world.queue_player_step(Point::new(1, 0));
        world.advance(16.0);
        assert_eq!(world.player_point(), Point::new(1279, 100));

        world.queue_player_step(Point::new(0, 1));
        world.advance(16.0);
        assert_eq!(world.player_point(), Point::new(1279, 719));
    }

    #[test]
    fn negative_speed_does_not_reverse_the_keys() {
        let mut config = SceneConfig::default();
        config.player.speed = -160.0;
        let mut world = SceneWorld::new(&config);
        world.queue_player_step(Point::new(1, 0));
        world.advance(16.0);
        assert_eq!(world.player_point(), Point::new(100, 100));
    }

    #[test]
    fn retired_entity_leaves_the_world_view() {
        let mut world = SceneWorld::new(&SceneConfig::default());
        let crystal = EntityId::new("crystal");
        assert!(world.retire(&crystal));
        assert!(!world.retire(&crystal));
        assert_eq!(world.position_of(&crystal), None);
        assert!(!world.retire(&EntityId::new(PLAYER_ID)));

        let mut drawn = 0;
        world.each_renderable(|_, _| drawn += 1);
        assert_eq!(drawn, 3);
    }

    #[test]
    fn idle_animation_cycles_frames() {
        let mut world = SceneWorld::new(&SceneConfig::default());
        let crystal_frames = data::sprite("item").unwrap().glyphs();
        let glyph_at = |world: &SceneWorld| {
            let mut glyph = None;
            world.each_renderable(|point, renderable| {
                if point == Point::new(600, 600) {
                    glyph = Some(renderable.glyph);
                }
            });
            glyph
        };
        assert_eq!(glyph_at(&world), Some(crystal_frames[0]));
        // Crystal spins at 6 fps.
        world.advance(170.0);
        assert_eq!(glyph_at(&world), Some(crystal_frames[1]));
    }
}
