use glam::Vec2;
use mnemo_engine::*;

use crate::score::Score;
use crate::sequence::{Sequence, SequenceEngine, SequenceSignal, Signature};
use crate::settings::MemorySettings;

const WORLD_WIDTH: f32 = 800.0;
const WORLD_HEIGHT: f32 = 600.0;
const DEFAULT_SEED: u64 = 42;

// Game event kinds (Rust → page)
pub const EVENT_SCORE: f32 = 1.0;
pub const EVENT_MESSAGE: f32 = 2.0;

// Message codes, carried in `a` of an EVENT_MESSAGE
pub const MSG_READY: f32 = 0.0;
pub const MSG_WATCH: f32 = 1.0;
pub const MSG_YOUR_TURN: f32 = 2.0;
pub const MSG_CORRECT: f32 = 3.0;
pub const MSG_WRONG: f32 = 4.0;
pub const MSG_LEVEL_UP: f32 = 5.0;

// Sound events
pub const SOUND_REVEAL: SoundEvent = SoundEvent(1);
pub const SOUND_PICK: SoundEvent = SoundEvent(2);
pub const SOUND_CORRECT: SoundEvent = SoundEvent(3);
pub const SOUND_WRONG: SoundEvent = SoundEvent(4);
pub const SOUND_LEVEL_UP: SoundEvent = SoundEvent(5);

// Custom event kinds (page → Rust)
pub const CUSTOM_NEW_GAME: u32 = 1;

// Key codes
pub const KEY_NEW_GAME: u32 = 78; // N

/// Round state machine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    Selecting,
    Revealing,
    Concealing,
    AwaitingInput,
    Evaluating,
    Scoring,
}

/// Simon-says on a grid: watch the cells light up, then click them back in order.
pub struct MemoryGame {
    settings: MemorySettings,
    engine: SequenceEngine,
    score: Score,
    phase: RoundPhase,
    /// Length of the next sequence; grows by one per level.
    remember_count: u32,
    sequence: Sequence,
    signature: Signature,
    player: Vec<CellId>,
    rng: Rng,
    seed: u64,
}

impl MemoryGame {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_settings(MemorySettings::default(), seed)
    }

    pub fn with_settings(settings: MemorySettings, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        Self {
            engine: SequenceEngine::new(settings.interval_ms, rng.next_u64()),
            score: Score::new(settings.level_cap()),
            phase: RoundPhase::Idle,
            remember_count: settings.start_count,
            sequence: Vec::new(),
            signature: Vec::new(),
            player: Vec::new(),
            seed: rng.next_u64(),
            rng,
            settings,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn remember_count(&self) -> u32 {
        self.remember_count
    }

    pub fn score(&self) -> i32 {
        self.score.value()
    }

    pub fn sequence(&self) -> &[CellId] {
        &self.sequence
    }

    pub fn signature(&self) -> &[Colour] {
        &self.signature
    }

    pub fn player(&self) -> &[CellId] {
        &self.player
    }

    pub fn settings(&self) -> &MemorySettings {
        &self.settings
    }

    fn set_phase(&mut self, phase: RoundPhase) {
        log::debug!("phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn message(ctx: &mut EngineContext, code: f32, detail: f32) {
        ctx.emit_event(GameEvent::new(EVENT_MESSAGE, code, detail, 0.0));
    }

    /// Largest square side, at most `count`, whose cells fit in `max_cells`.
    fn start_side(count: u32, max_cells: usize) -> u32 {
        let mut side = count.max(1);
        while side > 1 && Grid::cell_count_for(side, side) > max_cells {
            side -= 1;
        }
        side
    }

    /// Reset score, difficulty and grid, then launch the first round.
    fn new_game(&mut self, ctx: &mut EngineContext) {
        let start = Self::start_side(self.settings.start_count, ctx.max_cells());
        if start != self.settings.start_count {
            log::warn!(
                "start count {} does not fit {} cells, using {}",
                self.settings.start_count,
                ctx.max_cells(),
                start
            );
        }
        self.engine.reset();
        self.score = Score::new(self.settings.level_cap());
        self.remember_count = start;
        ctx.grid.resize(start, start);
        self.refresh(ctx);

        ctx.emit_event(GameEvent::new(EVENT_SCORE, 0.0, start as f32, 0.0));
        Self::message(ctx, MSG_READY, 0.0);
        log::info!("new game: {}x{} grid, remember {}", start, start, start);

        self.start_round(ctx);
    }

    /// Pick a fresh sequence and start showing it.
    fn start_round(&mut self, ctx: &mut EngineContext) {
        debug_assert!(!self.engine.is_busy(), "round started while the sequence is still playing");

        self.player.clear();
        self.set_phase(RoundPhase::Selecting);
        self.sequence = self.engine.select(&mut ctx.grid, self.remember_count as usize);
        self.signature = self.engine.reveal(&self.sequence);
        self.set_phase(RoundPhase::Revealing);

        Self::message(ctx, MSG_WATCH, self.remember_count as f32);
    }

    /// Forget the round and clear the board.
    fn refresh(&mut self, ctx: &mut EngineContext) {
        self.sequence.clear();
        self.signature.clear();
        self.player.clear();
        ctx.grid.refresh();
        self.set_phase(RoundPhase::Idle);
    }

    fn on_signal(&mut self, ctx: &mut EngineContext, signal: SequenceSignal) {
        match signal {
            SequenceSignal::Lit { .. } => ctx.emit_sound(SOUND_REVEAL),
            SequenceSignal::Revealed => {
                if self.phase == RoundPhase::Revealing {
                    self.engine.conceal(&self.sequence);
                    self.set_phase(RoundPhase::Concealing);
                }
            }
            SequenceSignal::Concealed => {
                if self.phase == RoundPhase::Concealing {
                    self.set_phase(RoundPhase::AwaitingInput);
                    Self::message(ctx, MSG_YOUR_TURN, self.remember_count as f32);
                }
            }
        }
    }

    /// A click on a grid cell. Only counts while waiting for the player.
    fn on_player_click(&mut self, ctx: &mut EngineContext, cell: CellId) {
        if self.phase != RoundPhase::AwaitingInput {
            log::debug!("click on {:?} ignored during {:?}", cell, self.phase);
            return;
        }

        self.player.push(cell);
        if let Some(&colour) = self.signature.get(self.player.len() - 1) {
            ctx.grid.set_tint(cell, Tint::Colour(colour));
        }
        ctx.emit_sound(SOUND_PICK);

        if self.player.len() >= self.sequence.len() {
            self.evaluate(ctx);
        }
    }

    fn evaluate(&mut self, ctx: &mut EngineContext) {
        self.set_phase(RoundPhase::Evaluating);

        let points = self.settings.score_step;
        if self.engine.compare(&self.sequence, &self.player) {
            self.score.increase_by(points);
            Self::message(ctx, MSG_CORRECT, 0.0);
            ctx.emit_sound(SOUND_CORRECT);
        } else {
            self.score.decrease_by(points);
            Self::message(ctx, MSG_WRONG, 0.0);
            ctx.emit_sound(SOUND_WRONG);
        }

        self.set_phase(RoundPhase::Scoring);
        self.on_score_changes(ctx);
    }

    /// Every score change ends the round: apply any level up, clear and go again.
    fn on_score_changes(&mut self, ctx: &mut EngineContext) {
        let changes = self.score.drain_changes();
        if changes.is_empty() {
            return;
        }

        for change in &changes {
            let levelled = change.level_cap && self.level_up(ctx);
            ctx.emit_event(GameEvent::new(
                EVENT_SCORE,
                change.score as f32,
                self.remember_count as f32,
                if levelled { 1.0 } else { 0.0 },
            ));
        }

        self.refresh(ctx);
        self.start_round(ctx);
    }

    /// Grow the grid and lengthen the sequence. Returns false, changing
    /// nothing, when the grown grid would not fit in the cell buffer.
    fn level_up(&mut self, ctx: &mut EngineContext) -> bool {
        let rows = ctx.grid.rows().saturating_add(self.settings.grow_rows);
        let cols = ctx.grid.cols().saturating_add(self.settings.grow_cols);
        if Grid::cell_count_for(rows, cols) > ctx.max_cells() {
            log::info!("{}x{} grid would exceed {} cells, difficulty kept", rows, cols, ctx.max_cells());
            return false;
        }
        ctx.grid.grow(self.settings.grow_rows, self.settings.grow_cols);

        let cells = ctx.grid.len();
        if (self.remember_count as usize) < cells {
            self.remember_count += 1;
        } else {
            log::warn!("grid of {} cells cannot hold a longer sequence", cells);
        }

        Self::message(ctx, MSG_LEVEL_UP, self.remember_count as f32);
        ctx.emit_sound(SOUND_LEVEL_UP);
        log::info!(
            "level up: {}x{} grid, remember {}",
            ctx.grid.rows(),
            ctx.grid.cols(),
            self.remember_count
        );
        true
    }
}

impl Default for MemoryGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for MemoryGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            grid_rows: self.settings.start_count,
            grid_cols: self.settings.start_count,
            seed: self.seed,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.new_game(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::Custom { kind, .. } if kind == CUSTOM_NEW_GAME => self.new_game(ctx),
                InputEvent::KeyDown { key_code } if key_code == KEY_NEW_GAME => self.new_game(ctx),
                InputEvent::PointerDown { x, y } => match ctx.cell_at_world(Vec2::new(x, y)) {
                    Some(cell) => self.on_player_click(ctx, cell),
                    None => log::debug!("pointer at ({}, {}) missed the grid", x, y),
                },
                InputEvent::CellPick { row, col } => match ctx.grid.cell_at(row, col) {
                    Some(cell) => self.on_player_click(ctx, cell),
                    None => log::debug!("pick ({}, {}) outside the grid", row, col),
                },
                _ => {}
            }
        }

        let signals = self.engine.tick(ctx.step_ms(), &mut ctx.grid);
        for signal in signals {
            self.on_signal(ctx, signal);
        }
    }

    /// New settings restart the game from scratch.
    fn load_settings(&mut self, json: &str, ctx: &mut EngineContext) -> Result<(), serde_json::Error> {
        let settings = MemorySettings::from_json(json)?;
        self.engine = SequenceEngine::new(settings.interval_ms, self.rng.next_u64());
        self.settings = settings;
        self.new_game(ctx);
        Ok(())
    }
}
