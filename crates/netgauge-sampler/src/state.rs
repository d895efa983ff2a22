/// Mutable state carried from one tick to the next.
///
/// `accumulator` and `tick_count` always reset together; `last_sample`
/// only ever moves forward to the newest reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopState {
    last_sample: u64,
    accumulator: i64,
    tick_count: u32,
}

impl LoopState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_sample(&self) -> u64 {
        self.last_sample
    }

    pub fn accumulator(&self) -> i64 {
        self.accumulator
    }

    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    /// Fold one scaled value into the current cycle.
    pub fn record(&mut self, scaled: i64) {
        self.accumulator = self.accumulator.saturating_add(scaled);
        self.tick_count += 1;
    }

    /// Start a new publish cycle.
    pub fn reset_cycle(&mut self) {
        self.accumulator = 0;
        self.tick_count = 0;
    }

    pub fn set_last_sample(&mut self, sample: u64) {
        self.last_sample = sample;
    }
}
