use mnemo_engine::bridge::protocol::{
    HEADER_CELL_COUNT, HEADER_EVENT_COUNT, HEADER_FLOATS, HEADER_FRAME_COUNTER, HEADER_GRID_COLS,
    HEADER_GRID_ROWS, HEADER_SOUND_COUNT,
};
use mnemo_engine::{
    build_cell_buffer, CellBuffer, EngineContext, FixedTimestep, Game, GameConfig, InputEvent,
    InputQueue, ProtocolLayout,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    cells: CellBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    initialized: bool,
    frame: u64,
    /// Flat buffer of sound event IDs for shared-buffer reads.
    sound_buffer: Vec<u8>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            cells: CellBuffer::with_capacity(config.max_cells),
            timestep: FixedTimestep::new(config.step_ms),
            header: layout.header(&config),
            sound_buffer: Vec::with_capacity(config.max_sounds),
            initialized: false,
            frame: 0,
            game,
            layout,
            config,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.publish();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame: fixed steps of game logic, then rebuild the shared buffers.
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt_ms);
        for _ in 0..steps {
            self.ctx.begin_step();
            self.game.update(&mut self.ctx, &self.input);
            // Input is consumed by the first step that sees it
            self.input.drain();
        }

        self.frame += 1;
        self.publish();
    }

    /// Hand game-specific settings JSON to the game. Rejected JSON keeps the old settings.
    pub fn load_settings(&mut self, json: &str) {
        match self.game.load_settings(json, &mut self.ctx) {
            Ok(()) => {
                self.timestep.reset();
                self.publish();
                log::info!("settings applied");
            }
            Err(err) => log::warn!("settings rejected: {}", err),
        }
    }

    /// Rebuild the cell buffer, clamp per-frame queues to capacity and refresh the header.
    fn publish(&mut self) {
        build_cell_buffer(&self.ctx.grid, &self.ctx.layout(), &mut self.cells);
        if self.cells.instances.len() > self.layout.max_cells {
            log::warn!(
                "grid has {} cells, buffer holds {}",
                self.cells.instances.len(),
                self.layout.max_cells
            );
            self.cells.instances.truncate(self.layout.max_cells);
        }
        self.ctx.sounds.truncate(self.layout.max_sounds);
        self.ctx.events.truncate(self.layout.max_events);

        self.sound_buffer.clear();
        self.sound_buffer.extend(self.ctx.sounds.iter().map(|s| s.0 as u8));

        self.header[HEADER_FRAME_COUNTER] = self.frame as f32;
        self.header[HEADER_GRID_ROWS] = self.ctx.grid.rows() as f32;
        self.header[HEADER_GRID_COLS] = self.ctx.grid.cols() as f32;
        self.header[HEADER_CELL_COUNT] = self.cells.cell_count() as f32;
        self.header[HEADER_SOUND_COUNT] = self.sound_buffer.len() as f32;
        self.header[HEADER_EVENT_COUNT] = self.ctx.events.len() as f32;
    }

    // ---- Pointer accessors for shared-buffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn cells_ptr(&self) -> *const f32 {
        self.cells.cells_ptr()
    }

    pub fn cell_count(&self) -> u32 {
        self.cells.cell_count()
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn grid_rows(&self) -> u32 {
        self.ctx.grid.rows()
    }

    pub fn grid_cols(&self) -> u32 {
        self.ctx.grid.cols()
    }

    // ---- Capacity accessors (read by the page via wasm_bindgen exports) ----

    pub fn max_cells(&self) -> u32 {
        self.layout.max_cells as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    /// Read access for tests and debugging tools.
    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_engine::{GameEvent, SoundEvent};

    /// Counts steps and picks; emits one event per pick.
    #[derive(Default)]
    struct Counter {
        steps: u32,
        picks: u32,
        threshold: u32,
    }

    #[derive(serde::Deserialize)]
    struct CounterSettings {
        threshold: u32,
    }

    impl Game for Counter {
        fn config(&self) -> GameConfig {
            GameConfig {
                step_ms: 10.0,
                max_events: 2,
                ..GameConfig::default()
            }
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            ctx.grid.build();
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.steps += 1;
            for event in input.iter() {
                if let InputEvent::CellPick { .. } = event {
                    self.picks += 1;
                    ctx.emit_event(GameEvent::new(1.0, self.picks as f32, 0.0, 0.0));
                    ctx.emit_sound(SoundEvent(3));
                }
            }
        }

        fn load_settings(&mut self, json: &str, _ctx: &mut EngineContext) -> Result<(), serde_json::Error> {
            let settings: CounterSettings = serde_json::from_str(json)?;
            self.threshold = settings.threshold;
            Ok(())
        }
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut runner = GameRunner::new(Counter::default());
        runner.tick(100.0);
        assert_eq!(runner.game().steps, 0);
    }

    #[test]
    fn fixed_steps_follow_frame_time() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        runner.tick(25.0);
        assert_eq!(runner.game().steps, 2);
        runner.tick(5.0);
        assert_eq!(runner.game().steps, 3);
        assert_eq!(runner.context().elapsed_ms(), 30.0);
    }

    #[test]
    fn input_is_seen_by_one_step_only() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        runner.push_input(InputEvent::CellPick { row: 0, col: 0 });
        runner.tick(40.0);
        assert_eq!(runner.game().picks, 1);
        assert_eq!(runner.game_events_len(), 1);
        assert_eq!(runner.sound_events_len(), 1);

        runner.tick(10.0);
        assert_eq!(runner.game_events_len(), 0);
    }

    #[test]
    fn input_waits_for_a_step() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        runner.push_input(InputEvent::CellPick { row: 0, col: 0 });
        runner.tick(4.0);
        assert_eq!(runner.game().picks, 0);
        runner.tick(6.0);
        assert_eq!(runner.game().picks, 1);
    }

    #[test]
    fn events_are_clamped_to_capacity() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        for _ in 0..5 {
            runner.push_input(InputEvent::CellPick { row: 0, col: 0 });
        }
        runner.tick(10.0);
        assert_eq!(runner.game_events_len(), 2);
    }

    #[test]
    fn cells_are_published_on_init() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        assert_eq!(runner.cell_count(), 9);
        assert_eq!((runner.grid_rows(), runner.grid_cols()), (3, 3));
    }

    #[test]
    fn bad_settings_are_rejected() {
        let mut runner = GameRunner::new(Counter::default());
        runner.init();
        runner.load_settings("{ not json");
        assert_eq!(runner.game().threshold, 0);
        runner.load_settings(r#"{ "threshold": 7 }"#);
        assert_eq!(runner.game().threshold, 7);
    }
}
