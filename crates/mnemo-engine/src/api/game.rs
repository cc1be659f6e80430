use glam::Vec2;
use serde::Deserialize;

use crate::api::types::{CellId, GameEvent, SoundEvent};
use crate::components::grid::{Grid, GridLayout};
use crate::input::queue::InputQueue;

/// Configuration for the engine, provided by the game.
/// Deserializes from partial JSON; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed step length in milliseconds (default: 1000/60).
    pub step_ms: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Empty border kept around the grid, in game units.
    pub grid_margin: f32,
    /// Initial grid rows.
    pub grid_rows: u32,
    /// Initial grid columns.
    pub grid_cols: u32,
    /// Seed for the grid's random cell picks.
    pub seed: u64,
    /// Maximum number of cells in the shared buffer (default: 1024).
    pub max_cells: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            step_ms: 1000.0 / 60.0,
            world_width: 800.0,
            world_height: 600.0,
            grid_margin: 20.0,
            grid_rows: 3,
            grid_cols: 3,
            seed: 42,
            max_cells: 1024,
            max_sounds: 32,
            max_events: 32,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state and launch the game.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step: react to input, advance timers, emit events.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Apply game-specific settings from JSON. The default ignores them.
    fn load_settings(&mut self, _json: &str, _ctx: &mut EngineContext) -> Result<(), serde_json::Error> {
        Ok(())
    }
}

/// Mutable access to engine state, passed to Game::init and Game::update.
#[derive(Debug)]
pub struct EngineContext {
    pub grid: Grid,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    step_ms: f32,
    elapsed_ms: f64,
    world_width: f32,
    world_height: f32,
    grid_margin: f32,
    max_cells: usize,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            grid: Grid::new(config.grid_rows, config.grid_cols, config.seed),
            sounds: Vec::new(),
            events: Vec::new(),
            step_ms: config.step_ms,
            elapsed_ms: 0.0,
            world_width: config.world_width,
            world_height: config.world_height,
            grid_margin: config.grid_margin,
            max_cells: config.max_cells,
        }
    }

    /// Length of the current fixed step, in milliseconds.
    pub fn step_ms(&self) -> f32 {
        self.step_ms
    }

    /// Simulated time since init, in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Account for one fixed step. Called by the runner before `Game::update`.
    pub fn begin_step(&mut self) {
        self.elapsed_ms += self.step_ms as f64;
    }

    /// Most cells the shared buffer can publish; grids must stay within it.
    pub fn max_cells(&self) -> usize {
        self.max_cells
    }

    /// Current placement of the grid in world space.
    pub fn layout(&self) -> GridLayout {
        self.grid.layout(self.world_width, self.world_height, self.grid_margin)
    }

    /// The cell under a world position, if any.
    pub fn cell_at_world(&self, pos: Vec2) -> Option<CellId> {
        let (row, col) = self.layout().world_to_cell(pos)?;
        self.grid.cell_at(row, col)
    }

    /// Emit a sound event to be forwarded to the page.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to the page.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_follows_config() {
        let config = GameConfig {
            grid_rows: 4,
            grid_cols: 6,
            step_ms: 10.0,
            ..GameConfig::default()
        };
        let mut ctx = EngineContext::from_config(&config);
        assert_eq!((ctx.grid.rows(), ctx.grid.cols()), (4, 6));
        assert!(ctx.grid.is_empty());
        assert_eq!(ctx.max_cells(), 1024);

        ctx.begin_step();
        ctx.begin_step();
        assert_eq!(ctx.elapsed_ms(), 20.0);
    }

    #[test]
    fn config_from_partial_json() {
        let config: GameConfig = serde_json::from_str(r#"{ "grid_rows": 5, "seed": 9 }"#).unwrap();
        assert_eq!(config.grid_rows, 5);
        assert_eq!(config.seed, 9);
        assert_eq!(config.grid_cols, GameConfig::default().grid_cols);
        assert_eq!(config.max_cells, 1024);
    }

    #[test]
    fn cell_at_world_uses_layout() {
        let mut ctx = EngineContext::new();
        ctx.grid.build();
        let layout = ctx.layout();
        let centre = layout.cell_center(2, 1);
        assert_eq!(ctx.cell_at_world(centre), ctx.grid.cell_at(2, 1));
        assert_eq!(ctx.cell_at_world(Vec2::new(-1.0, -1.0)), None);
    }

    #[test]
    fn clear_frame_data_empties_queues() {
        let mut ctx = EngineContext::new();
        ctx.emit_sound(SoundEvent(1));
        ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
        ctx.clear_frame_data();
        assert!(ctx.sounds.is_empty());
        assert!(ctx.events.is_empty());
    }
}
