/// Score notification: emitted once for every change, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChanged {
    pub score: i32,
    /// The change climbed into a higher level (a multiple of the cap).
    pub level_cap: bool,
}

/// Running score with level thresholds.
///
/// A level is `score / cap`. The level flag is raised whenever a change moves
/// the score into a higher level than it was in before the change, so
/// dropping below a multiple and climbing back flags again. Scores of zero
/// or below never flag.
#[derive(Debug, Clone)]
pub struct Score {
    value: i32,
    cap: u32,
    changes: Vec<ScoreChanged>,
}

impl Score {
    pub const DEFAULT_SCORE: i32 = 0;

    pub fn new(cap: u32) -> Self {
        Self::with_value(Self::DEFAULT_SCORE, cap)
    }

    pub fn with_value(value: i32, cap: u32) -> Self {
        Self {
            value,
            cap: cap.max(1),
            changes: Vec::new(),
        }
    }

    pub fn increase(&mut self) {
        self.increase_by(1);
    }

    pub fn increase_by(&mut self, points: u32) {
        let before = self.level();
        self.value = self.value.saturating_add(points as i32);
        self.notify(before);
    }

    pub fn decrease(&mut self) {
        self.decrease_by(1);
    }

    pub fn decrease_by(&mut self, points: u32) {
        let before = self.level();
        self.value = self.value.saturating_sub(points as i32);
        self.notify(before);
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn level(&self) -> i32 {
        self.value.div_euclid(self.cap as i32)
    }

    /// Take every pending notification, oldest first.
    pub fn drain_changes(&mut self) -> Vec<ScoreChanged> {
        std::mem::take(&mut self.changes)
    }

    fn notify(&mut self, level_before: i32) {
        let level_cap = self.value > 0 && self.level() > level_before;
        self.changes.push(ScoreChanged {
            score: self.value,
            level_cap,
        });
    }
}
