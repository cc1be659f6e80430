//! The "AI" side of a round: pick the cells, show them one by one, hide them.
//!
//! Reveal steps are independent timers at `index * interval`; hide steps all
//! share one flat `interval`. Each step carries its own position and the
//! sequence length, so "this was the last position" is decided by index and
//! fires exactly once even if steps complete out of order.

use mnemo_engine::{CellId, Colour, Grid, Palette, Tint, Timers};

/// Cells the player has to remember, in order. No duplicates.
pub type Sequence = Vec<CellId>;

/// One colour per sequence position.
pub type Signature = Vec<Colour>;

/// What the sequence engine needs from the grid.
pub trait Board {
    /// Number of distinct cells that `random_cell` can return.
    fn cell_count(&self) -> usize;
    fn random_cell(&mut self) -> CellId;
    fn paint(&mut self, cell: CellId, tint: Tint);
}

impl Board for Grid {
    fn cell_count(&self) -> usize {
        self.len()
    }

    fn random_cell(&mut self) -> CellId {
        Grid::random_cell(self)
    }

    fn paint(&mut self, cell: CellId, tint: Tint) {
        if !self.set_tint(cell, tint) {
            log::warn!("paint on unknown cell {:?}", cell);
        }
    }
}

/// Notifications produced by `SequenceEngine::tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSignal {
    /// Position `index` was just shown.
    Lit { index: usize },
    /// The last position has been shown.
    Revealed,
    /// The last position has been hidden again.
    Concealed,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Show { index: usize, len: usize, cell: CellId, colour: Colour },
    Hide { index: usize, len: usize, cell: CellId },
}

/// Guards a completion signal so it fires once per sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Latch {
    Idle,
    Scheduled,
    Fired,
}

#[derive(Debug, Clone)]
pub struct SequenceEngine {
    interval_ms: f32,
    palette: Palette,
    timers: Timers<Step>,
    reveal: Latch,
    conceal: Latch,
}

impl SequenceEngine {
    pub fn new(interval_ms: f32, seed: u64) -> Self {
        Self {
            interval_ms,
            palette: Palette::new(seed),
            timers: Timers::new(),
            reveal: Latch::Idle,
            conceal: Latch::Idle,
        }
    }

    /// Draw `count` distinct cells from the board, retrying on duplicates.
    ///
    /// The board must hold at least `count` distinct cells, otherwise this
    /// never returns.
    pub fn select<B: Board + ?Sized>(&self, board: &mut B, count: usize) -> Sequence {
        debug_assert!(
            board.cell_count() >= count,
            "cannot pick {} distinct cells from {}",
            count,
            board.cell_count()
        );

        let mut sequence = Vec::with_capacity(count);
        while sequence.len() < count {
            let cell = board.random_cell();
            if !sequence.contains(&cell) {
                sequence.push(cell);
            }
        }
        sequence
    }

    /// Pick a colour per position and schedule position `i` to light up after
    /// `i * interval`. `Revealed` follows the last position.
    pub fn reveal(&mut self, sequence: &[CellId]) -> Signature {
        let signature = self.palette.random_colours(sequence.len());
        let len = sequence.len();

        self.reveal = if len == 0 { Latch::Idle } else { Latch::Scheduled };
        self.conceal = Latch::Idle;

        for (index, (&cell, &colour)) in sequence.iter().zip(&signature).enumerate() {
            self.timers.after(
                index as f32 * self.interval_ms,
                Step::Show { index, len, cell, colour },
            );
        }
        signature
    }

    /// Schedule every position to clear after one flat interval.
    /// `Concealed` follows the last position. A second call for the same
    /// sequence is ignored.
    pub fn conceal(&mut self, sequence: &[CellId]) {
        if self.conceal != Latch::Idle {
            log::debug!("conceal already scheduled for this sequence");
            return;
        }
        let len = sequence.len();
        if len == 0 {
            return;
        }
        self.conceal = Latch::Scheduled;

        for (index, &cell) in sequence.iter().enumerate() {
            self.timers.after(self.interval_ms, Step::Hide { index, len, cell });
        }
    }

    /// Positionwise identity comparison.
    pub fn compare(&self, sequence: &[CellId], player: &[CellId]) -> bool {
        sequence.len() == player.len() && sequence.iter().zip(player).all(|(a, b)| a == b)
    }

    /// Advance the timers, paint due steps onto the board and report what happened.
    pub fn tick<B: Board + ?Sized>(&mut self, dt_ms: f32, board: &mut B) -> Vec<SequenceSignal> {
        let mut signals = Vec::new();

        for step in self.timers.advance(dt_ms) {
            match step {
                Step::Show { index, len, cell, colour } => {
                    board.paint(cell, Tint::Colour(colour));
                    signals.push(SequenceSignal::Lit { index });
                    if index + 1 == len && self.reveal == Latch::Scheduled {
                        self.reveal = Latch::Fired;
                        signals.push(SequenceSignal::Revealed);
                    }
                }
                Step::Hide { index, len, cell } => {
                    board.paint(cell, Tint::Neutral);
                    if index + 1 == len && self.conceal == Latch::Scheduled {
                        self.conceal = Latch::Fired;
                        signals.push(SequenceSignal::Concealed);
                    }
                }
            }
        }
        signals
    }

    /// Whether reveal or conceal steps are still pending.
    pub fn is_busy(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Drop pending steps and forget the current sequence (new game).
    pub fn reset(&mut self) {
        self.timers.clear();
        self.reveal = Latch::Idle;
        self.conceal = Latch::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, VecDeque};

    const INTERVAL: f32 = 750.0;

    /// Board that hands out a fixed draw order and records paints.
    struct ScriptedBoard {
        cells: usize,
        draws: VecDeque<u32>,
        draws_taken: usize,
        tints: HashMap<CellId, Tint>,
    }

    impl ScriptedBoard {
        fn new(cells: usize, draws: &[u32]) -> Self {
            Self {
                cells,
                draws: draws.iter().copied().collect(),
                draws_taken: 0,
                tints: HashMap::new(),
            }
        }

        fn tint(&self, cell: CellId) -> Tint {
            self.tints.get(&cell).copied().unwrap_or_default()
        }
    }

    impl Board for ScriptedBoard {
        fn cell_count(&self) -> usize {
            self.cells
        }

        fn random_cell(&mut self) -> CellId {
            self.draws_taken += 1;
            CellId(self.draws.pop_front().expect("script ran out of draws"))
        }

        fn paint(&mut self, cell: CellId, tint: Tint) {
            self.tints.insert(cell, tint);
        }
    }

    fn built_grid(rows: u32, cols: u32, seed: u64) -> Grid {
        let mut grid = Grid::new(rows, cols, seed);
        grid.build();
        grid
    }

    #[test]
    fn select_returns_distinct_cells_from_the_grid() {
        let engine = SequenceEngine::new(INTERVAL, 1);
        for seed in 1..20 {
            for (side, count) in [(3, 3), (3, 9), (5, 4), (7, 12)] {
                let mut grid = built_grid(side, side, seed);
                let sequence = engine.select(&mut grid, count);
                assert_eq!(sequence.len(), count);
                for (i, cell) in sequence.iter().enumerate() {
                    assert!(grid.coords(*cell).is_some(), "{:?} not in grid", cell);
                    assert!(!sequence[i + 1..].contains(cell), "duplicate {:?}", cell);
                }
            }
        }
    }

    #[test]
    fn select_retries_on_duplicates() {
        let engine = SequenceEngine::new(INTERVAL, 1);
        let mut board = ScriptedBoard::new(9, &[4, 4, 1, 4, 1, 7]);
        let sequence = engine.select(&mut board, 3);
        assert_eq!(sequence, vec![CellId(4), CellId(1), CellId(7)]);
        assert_eq!(board.draws_taken, 6);
    }

    #[test]
    fn compare_is_reflexive_and_order_sensitive() {
        let engine = SequenceEngine::new(INTERVAL, 1);
        let seq = vec![CellId(0), CellId(5), CellId(2)];
        assert!(engine.compare(&seq, &seq.clone()));
        assert!(!engine.compare(&seq, &[CellId(0), CellId(2), CellId(5)]));
        assert!(!engine.compare(&seq, &[CellId(5), CellId(0), CellId(2)]));
        assert!(!engine.compare(&seq, &[CellId(0), CellId(5)]));
    }

    #[test]
    fn reveal_lights_one_position_per_interval() {
        let mut engine = SequenceEngine::new(INTERVAL, 3);
        let mut board = ScriptedBoard::new(9, &[]);
        let seq = vec![CellId(2), CellId(6), CellId(8)];
        let signature = engine.reveal(&seq);
        assert_eq!(signature.len(), seq.len());

        // First position shows immediately
        assert_eq!(engine.tick(0.0, &mut board), vec![SequenceSignal::Lit { index: 0 }]);
        assert_eq!(board.tint(CellId(2)), Tint::Colour(signature[0]));
        assert_eq!(board.tint(CellId(6)), Tint::Neutral);

        assert!(engine.tick(INTERVAL - 1.0, &mut board).is_empty());
        assert_eq!(engine.tick(1.0, &mut board), vec![SequenceSignal::Lit { index: 1 }]);
        assert_eq!(
            engine.tick(INTERVAL, &mut board),
            vec![SequenceSignal::Lit { index: 2 }, SequenceSignal::Revealed]
        );
        assert_eq!(board.tint(CellId(8)), Tint::Colour(signature[2]));
        assert!(!engine.is_busy());
    }

    #[test]
    fn revealed_fires_once_even_when_steps_land_together() {
        let mut engine = SequenceEngine::new(INTERVAL, 3);
        let mut board = ScriptedBoard::new(9, &[]);
        engine.reveal(&[CellId(0), CellId(1), CellId(2), CellId(3)]);

        let signals = engine.tick(10_000.0, &mut board);
        let revealed = signals.iter().filter(|s| **s == SequenceSignal::Revealed).count();
        assert_eq!(revealed, 1);
        assert_eq!(signals.last(), Some(&SequenceSignal::Revealed));
    }

    #[test]
    fn single_cell_reveals_immediately() {
        let mut engine = SequenceEngine::new(INTERVAL, 3);
        let mut board = ScriptedBoard::new(1, &[]);
        engine.reveal(&[CellId(0)]);
        assert_eq!(
            engine.tick(0.0, &mut board),
            vec![SequenceSignal::Lit { index: 0 }, SequenceSignal::Revealed]
        );
    }

    #[test]
    fn reveal_then_conceal_restores_neutral() {
        let mut engine = SequenceEngine::new(INTERVAL, 5);
        let mut grid = built_grid(4, 4, 11);
        let seq = engine.select(&mut grid, 5);
        engine.reveal(&seq);
        engine.tick(4.0 * INTERVAL, &mut grid);
        assert_eq!(grid.lit_count(), 5);

        engine.conceal(&seq);
        assert!(engine.tick(INTERVAL - 1.0, &mut grid).is_empty());
        assert_eq!(grid.lit_count(), 5);

        assert_eq!(engine.tick(1.0, &mut grid), vec![SequenceSignal::Concealed]);
        assert_eq!(grid.lit_count(), 0);
        for cell in &seq {
            assert_eq!(grid.tint(*cell), Some(Tint::Neutral));
        }
    }

    #[test]
    fn conceal_twice_signals_once() {
        let mut engine = SequenceEngine::new(INTERVAL, 5);
        let mut board = ScriptedBoard::new(9, &[]);
        let seq = vec![CellId(1), CellId(2), CellId(3)];
        engine.reveal(&seq);
        engine.tick(2.0 * INTERVAL, &mut board);

        engine.conceal(&seq);
        engine.conceal(&seq);
        let signals = engine.tick(INTERVAL, &mut board);
        assert_eq!(signals, vec![SequenceSignal::Concealed]);

        engine.conceal(&seq);
        assert!(engine.tick(INTERVAL, &mut board).is_empty());
    }

    #[test]
    fn reset_drops_pending_steps() {
        let mut engine = SequenceEngine::new(INTERVAL, 5);
        let mut board = ScriptedBoard::new(9, &[]);
        engine.reveal(&[CellId(1), CellId(2)]);
        assert!(engine.is_busy());
        engine.reset();
        assert!(!engine.is_busy());
        assert!(engine.tick(10.0 * INTERVAL, &mut board).is_empty());
    }
}
