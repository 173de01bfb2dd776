use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

/// Largest accepted `jitter_px`.
pub const MAX_JITTER_PX: i32 = 10_000;

/// Macro tuning, read from `wander.json`. Missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MacroConfig {
    /// Delay between the end of one cycle and the start of the next.
    pub interval_ms: u64,
    /// Step count range, `[min_steps, max_steps)`.
    pub min_steps: u32,
    pub max_steps: u32,
    /// Per-axis jitter, `[-jitter_px, jitter_px]`.
    pub jitter_px: i32,
    /// Inter-step delay range in ms, `[min, max)`.
    pub min_step_delay_ms: u32,
    pub max_step_delay_ms: u32,
    /// Let an in-flight cycle run to its click after a stop request.
    pub finish_cycle_on_stop: bool,
    /// Fixed seed for reproducible paths.
    pub seed: Option<u64>,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            min_steps: 50,
            max_steps: 150,
            jitter_px: 10,
            min_step_delay_ms: 10,
            max_step_delay_ms: 30,
            finish_cycle_on_stop: true,
            seed: None,
        }
    }
}

impl MacroConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.interval_ms > 0, "interval_ms must be positive");
        ensure!(self.min_steps > 0, "min_steps must be positive");
        ensure!(
            self.min_steps < self.max_steps,
            "step range [{}, {}) is empty",
            self.min_steps,
            self.max_steps
        );
        ensure!(self.max_steps <= i32::MAX as u32, "max_steps is too large");
        ensure!(self.jitter_px >= 0, "jitter_px must not be negative");
        ensure!(self.jitter_px <= MAX_JITTER_PX, "jitter_px must be at most {}", MAX_JITTER_PX);
        ensure!(
            self.min_step_delay_ms < self.max_step_delay_ms,
            "step delay range [{}, {}) is empty",
            self.min_step_delay_ms,
            self.max_step_delay_ms
        );
        ensure!(self.max_step_delay_ms <= i32::MAX as u32, "max_step_delay_ms is too large");
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
