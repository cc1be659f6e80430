use serde::Deserialize;

/// Tunables for the memory game.
/// Loaded from JSON at runtime; every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    /// Cells to remember in the first round; also the starting grid side.
    pub start_count: u32,
    /// Delay between two reveals, and before the sequence hides again (ms).
    pub interval_ms: f32,
    /// Rows added to the grid on every level up.
    pub grow_rows: u32,
    /// Columns added to the grid on every level up.
    pub grow_cols: u32,
    /// Score multiple that counts as a new level. Defaults to `start_count`.
    pub level_cap: Option<u32>,
    /// Points gained or lost per round.
    pub score_step: u32,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            start_count: 3,
            interval_ms: 750.0,
            grow_rows: 2,
            grow_cols: 2,
            level_cap: None,
            score_step: 1,
        }
    }
}

impl MemorySettings {
    /// Largest starting side: a 32x32 grid fills the default 1024-cell buffer.
    pub const MAX_START_COUNT: u32 = 32;

    /// Parse settings from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Effective level cap (never zero).
    pub fn level_cap(&self) -> u32 {
        self.level_cap.unwrap_or(self.start_count).max(1)
    }

    /// Clamp values the game cannot run with.
    fn sanitized(mut self) -> Self {
        self.start_count = self.start_count.clamp(1, Self::MAX_START_COUNT);
        self.score_step = self.score_step.max(1);
        if !self.interval_ms.is_finite() || self.interval_ms < 0.0 {
            self.interval_ms = Self::default().interval_ms;
        }
        self
    }
}
