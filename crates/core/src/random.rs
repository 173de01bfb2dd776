use std::collections::VecDeque;

use rand::Rng;

/// Source of uniform integer draws. Every range is half-open: `[low, high)`.
pub trait RandomSource: Send {
    fn range(&mut self, low: i32, high: i32) -> i32;
}

impl<R: Rng + Send> RandomSource for R {
    fn range(&mut self, low: i32, high: i32) -> i32 {
        self.gen_range(low..high)
    }
}

/// Replays a fixed list of draws, in order.
///
/// Each value is pinned into the requested range. Once the script runs out
/// every draw returns the range's lower bound.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandom {
    values: VecDeque<i32>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self { values: values.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn range(&mut self, low: i32, high: i32) -> i32 {
        match self.values.pop_front() {
            Some(v) => v.clamp(low, high - 1),
            None => low,
        }
    }
}
