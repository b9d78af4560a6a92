mod config;
mod data;
mod dialogue;
mod ecs;
mod interaction;
mod inventory;
mod render;
mod scene;
mod scripted_input;
mod timer;

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use config::SceneConfig;
use render::{Viewport, draw_backdrop, draw_dialogues, draw_header, draw_inventory, draw_log};
use scene::Scene;
use scripted_input::{SCRIPT_ENV, ScriptedInput};

const SCENE_ORIGIN_Y: i32 = 3;
const LOG_PANEL_TOP: i32 = 42;
const LOG_VISIBLE_ROWS: usize = 5;
const LOG_MAX_ENTRIES: usize = 8;

enum InputSource {
    Keyboard,
    Scripted(ScriptedInput),
    Detached,
}

impl InputSource {
    fn from_env() -> Self {
        let Some(path) = std::env::var_os(SCRIPT_ENV) else {
            return Self::Keyboard;
        };
        match ScriptedInput::from_file(&path) {
            Ok(script) => {
                log::info!("replaying keys from {}", path.to_string_lossy());
                Self::Scripted(script)
            }
            Err(err) => {
                log::warn!("cannot open key script {}: {err}", path.to_string_lossy());
                Self::Keyboard
            }
        }
    }

    fn next_key(&mut self, ctx: &BTerm) -> Option<VirtualKeyCode> {
        match self {
            Self::Keyboard => ctx.key,
            Self::Scripted(script) => script.next_key(),
            Self::Detached => None,
        }
    }
}

struct CrystalCourtState {
    scene: Scene,
    viewport: Viewport,
    input: InputSource,
    message_log: Vec<String>,
}

impl CrystalCourtState {
    fn new(config: SceneConfig, input: InputSource) -> Self {
        let viewport = Viewport::new(
            Point::new(0, SCENE_ORIGIN_Y),
            config.cell_width,
            config.cell_height,
            config.grid_size(),
        );
        let scene = Scene::new(config);
        Self {
            scene,
            viewport,
            input,
            message_log: vec!["Walk with the arrow keys. Press space near someone.".to_string()],
        }
    }
}

impl GameState for CrystalCourtState {
    fn tick(&mut self, ctx: &mut BTerm) {
        if self.scene.is_torn_down() {
            ctx.quit();
            return;
        }
        self.handle_input(ctx);
        if self.scene.is_torn_down() {
            ctx.quit();
            return;
        }
        self.scene.update(ctx.frame_time_ms);
        for notice in self.scene.drain_notices() {
            self.push_log_entry(notice);
        }
        ctx.cls();
        self.draw_scene(ctx);
    }
}

impl CrystalCourtState {
    fn handle_input(&mut self, ctx: &mut BTerm) {
        let Some(key) = self.input.next_key(ctx) else {
            return;
        };
        match key {
            VirtualKeyCode::Left | VirtualKeyCode::A => self.scene.move_player(-1, 0),
            VirtualKeyCode::Right | VirtualKeyCode::D => self.scene.move_player(1, 0),
            VirtualKeyCode::Up | VirtualKeyCode::W => self.scene.move_player(0, -1),
            VirtualKeyCode::Down | VirtualKeyCode::S => self.scene.move_player(0, 1),
            VirtualKeyCode::Space | VirtualKeyCode::E => self.interact(),
            VirtualKeyCode::P => self.dump_snapshot(),
            VirtualKeyCode::Escape | VirtualKeyCode::Q => self.teardown(),
            _ => {}
        }
    }

    fn interact(&mut self) {
        if self.scene.interact().is_none() {
            self.push_log_entry("Nobody and nothing nearby.");
        }
    }

    fn dump_snapshot(&mut self) {
        match self.scene.snapshot_json() {
            Ok(json) => {
                log::info!("snapshot {json}");
                self.push_log_entry("Snapshot written to the log.");
            }
            Err(err) => log::warn!("snapshot failed: {err}"),
        }
    }

    fn teardown(&mut self) {
        self.scene.teardown();
        self.input = InputSource::Detached;
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }

    fn draw_scene(&mut self, ctx: &mut BTerm) {
        draw_header(
            ctx,
            self.scene.frame(),
            self.scene.now_ms(),
            self.scene.player_point(),
        );
        draw_backdrop(ctx, &self.viewport);
        let viewport = self.viewport;
        self.scene.each_renderable(|point, renderable| {
            let cell = viewport.project(point);
            ctx.set(
                cell.x,
                cell.y,
                renderable.color,
                RGB::named(BLACK),
                renderable.glyph,
            );
        });
        draw_inventory(ctx, &self.viewport, self.scene.inventory().entries());
        draw_dialogues(ctx, &self.viewport, &self.scene.visible_dialogues());
        draw_log(ctx, &self.message_log, LOG_PANEL_TOP, LOG_VISIBLE_ROWS);
    }
}

fn main() -> BError {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = SceneConfig::from_env();
    let input = InputSource::from_env();
    let context = BTermBuilder::simple80x50()
        .with_title("Crystal Court")
        .build()?;
    let game_state = CrystalCourtState::new(config, input);
    main_loop(context, game_state)
}
