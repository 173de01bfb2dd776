//! Human-like pointer paths.
//!
//! A cycle reads the live pointer position and screen size, picks a random
//! target, then walks towards it in `step_count + 1` jittered, clamped moves
//! with a short random pause after each. It finishes with one exact move to
//! the target and a single click.
//!
//! Random draws happen in a fixed order so a scripted or seeded source
//! replays the same path: target x, target y, step count, then for every
//! step jitter x, jitter y, delay.

use std::time::Duration;

use thiserror::Error;

use crate::geometry::{clamp_to, lerp};
use crate::logger;
use crate::platform::Pointer;
use crate::random::RandomSource;
use crate::settings::MacroConfig;
use crate::sleep::{CancelToken, Sleeper};
use crate::types::*;

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("invalid screen bounds {width}x{height}")]
    InvalidBounds { width: i32, height: i32 },
    #[error("{op} failed: {message}")]
    Capability { op: &'static str, message: String },
    #[error("cancelled after {moves} moves")]
    Cancelled { moves: u32 },
}

fn capability(op: &'static str, e: anyhow::Error) -> CycleError {
    CycleError::Capability { op, message: format!("{:#}", e) }
}

/// Shape of the generated paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTuning {
    pub min_steps: u32,
    pub max_steps: u32,
    pub jitter_px: i32,
    pub min_step_delay_ms: u32,
    pub max_step_delay_ms: u32,
}

impl Default for PathTuning {
    fn default() -> Self {
        Self::from(&MacroConfig::default())
    }
}

impl From<&MacroConfig> for PathTuning {
    fn from(c: &MacroConfig) -> Self {
        Self {
            min_steps: c.min_steps,
            max_steps: c.max_steps,
            jitter_px: c.jitter_px,
            min_step_delay_ms: c.min_step_delay_ms,
            max_step_delay_ms: c.max_step_delay_ms,
        }
    }
}

/// Outcome of a completed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub plan: PathPlan,
    /// Move requests issued, including the final exact move.
    pub moves: u32,
    /// Move requests the pointer rejected.
    pub failed_moves: u32,
    /// Where the click landed, `None` if the pointer rejected it.
    pub clicked_at: Option<Point>,
}

pub struct PathSynthesizer {
    tuning: PathTuning,
}

impl PathSynthesizer {
    pub fn new(tuning: PathTuning) -> Self {
        Self { tuning }
    }

    /// Pick a target inside `bounds` and a step count.
    pub fn plan(
        &self,
        start: Point,
        bounds: ScreenBounds,
        rng: &mut dyn RandomSource,
    ) -> Result<PathPlan, CycleError> {
        if !bounds.is_valid() {
            return Err(CycleError::InvalidBounds { width: bounds.width, height: bounds.height });
        }
        let target = Point::new(rng.range(0, bounds.width), rng.range(0, bounds.height));
        let step_count = rng.range(self.tuning.min_steps as i32, self.tuning.max_steps as i32) as u32;
        Ok(PathPlan { start, target, step_count })
    }

    /// Jittered, clamped position for step `i` of `plan`, `0 <= i <= step_count`.
    pub fn waypoint(
        &self,
        plan: &PathPlan,
        i: u32,
        bounds: ScreenBounds,
        rng: &mut dyn RandomSource,
    ) -> Point {
        let progress = i as f64 / plan.step_count as f64;
        let base = lerp(plan.start, plan.target, progress);
        let j = self.tuning.jitter_px;
        let dx = rng.range(-j, j.saturating_add(1));
        let dy = rng.range(-j, j.saturating_add(1));
        clamp_to(bounds, base.x.saturating_add(dx), base.y.saturating_add(dy))
    }

    pub fn step_delay(&self, rng: &mut dyn RandomSource) -> Duration {
        let ms = rng.range(self.tuning.min_step_delay_ms as i32, self.tuning.max_step_delay_ms as i32);
        Duration::from_millis(ms as u64)
    }

    /// Play one full cycle against `pointer`.
    ///
    /// `cancel` is checked before every move; a cancelled cycle never clicks.
    /// Rejected moves and clicks are logged and skipped.
    pub fn run_cycle(
        &self,
        pointer: &mut dyn Pointer,
        rng: &mut dyn RandomSource,
        sleeper: &dyn Sleeper,
        cancel: &CancelToken,
    ) -> Result<CycleReport, CycleError> {
        let bounds = pointer.screen_bounds().map_err(|e| capability("screen_bounds", e))?;
        if !bounds.is_valid() {
            return Err(CycleError::InvalidBounds { width: bounds.width, height: bounds.height });
        }
        let start = pointer.position().map_err(|e| capability("position", e))?;
        let plan = self.plan(start, bounds, rng)?;
        logger::info_p(
            "path",
            &format!("{} -> {} in {} steps on {}", plan.start, plan.target, plan.step_count, bounds),
        );

        let mut report = CycleReport { plan, moves: 0, failed_moves: 0, clicked_at: None };

        for i in 0..=plan.step_count {
            checkpoint(cancel, &report)?;
            let p = self.waypoint(&plan, i, bounds, rng);
            issue_move(pointer, p, &mut report);
            sleeper.sleep(self.step_delay(rng));
        }

        checkpoint(cancel, &report)?;
        issue_move(pointer, plan.target, &mut report);

        let at = match pointer.position() {
            Ok(p) => p,
            Err(e) => {
                logger::warn_p("path", &format!("position re-read failed, clicking at target: {:#}", e));
                plan.target
            }
        };
        match pointer.click(at) {
            Ok(()) => report.clicked_at = Some(at),
            Err(e) => logger::warn_p("path", &format!("click at {} failed: {:#}", at, e)),
        }

        Ok(report)
    }
}

fn checkpoint(cancel: &CancelToken, report: &CycleReport) -> Result<(), CycleError> {
    if cancel.is_cancelled() {
        logger::info_p("path", &format!("cancelled after {} moves", report.moves));
        return Err(CycleError::Cancelled { moves: report.moves });
    }
    Ok(())
}

fn issue_move(pointer: &mut dyn Pointer, p: Point, report: &mut CycleReport) {
    report.moves += 1;
    if let Err(e) = pointer.move_to(p) {
        report.failed_moves += 1;
        logger::warn_p("path", &format!("move to {} failed: {:#}", p, e));
    }
}
