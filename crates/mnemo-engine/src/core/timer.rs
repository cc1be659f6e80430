// core/timer.rs
//
// One-shot deferred scheduling on the engine clock.
// A timer carries a typed payload instead of a closure; the owner gets the
// payloads back from `advance` and dispatches them itself, so no timer ever
// needs a borrow of game state.
//
// Usage:
//   let mut timers = Timers::new();
//   timers.after(750.0, Step::Hide(3));
//   for step in timers.advance(dt_ms) { ... }

#[derive(Debug, Clone)]
struct Pending<T> {
    /// Scheduling order, breaks deadline ties.
    seq: u64,
    due_ms: f64,
    payload: T,
}

/// Queue of one-shot timers driven by `advance`.
#[derive(Debug, Clone)]
pub struct Timers<T> {
    now_ms: f64,
    pending: Vec<Pending<T>>,
    next_seq: u64,
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedule `payload` to come due `delay_ms` from now.
    /// Negative delays are treated as zero.
    pub fn after(&mut self, delay_ms: f32, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            seq,
            due_ms: self.now_ms + delay_ms.max(0.0) as f64,
            payload,
        });
    }

    /// Advance the clock and return every payload that came due,
    /// ordered by deadline (ties keep scheduling order).
    pub fn advance(&mut self, dt_ms: f32) -> Vec<T> {
        if dt_ms > 0.0 {
            self.now_ms += dt_ms as f64;
        }
        let now = self.now_ms;
        let (mut due, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due_ms <= now);
        self.pending = keep;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.payload).collect()
    }

    /// Number of timers still pending.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending timer. The clock keeps running.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}
