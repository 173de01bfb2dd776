use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::logger;
use crate::path::{CycleError, PathSynthesizer, PathTuning};
use crate::platform::Pointer;
use crate::random::RandomSource;
use crate::settings::MacroConfig;
use crate::sleep::{CancelToken, Sleeper};
use crate::types::*;

/// State shared between the host and the worker thread.
struct Shared {
    state: Mutex<MacroState>,
    cycles: AtomicU64,
    cancel: CancelToken,
    finish_cycle_on_stop: bool,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, MacroState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flip to `Stopped`, cancelling the in-flight cycle when configured to.
    fn stopped(&self, state: &mut MacroState) {
        *state = MacroState::Stopped;
        if !self.finish_cycle_on_stop {
            self.cancel.cancel();
        }
    }
}

/// Cloneable host-side handle: the toggle entry point and the status line.
#[derive(Clone)]
pub struct MacroHandle {
    shared: Arc<Shared>,
    cmd_tx: mpsc::Sender<Command>,
}

impl MacroHandle {
    /// Flip Running/Stopped and (de)arm the periodic trigger.
    pub fn toggle(&self) -> MacroState {
        let next = {
            let mut state = self.shared.state();
            match state.toggled() {
                MacroState::Running => *state = MacroState::Running,
                MacroState::Stopped => self.shared.stopped(&mut state),
            }
            *state
        };
        self.cmd_tx.send(Command::Toggle).ok();
        logger::info_p("sched", &next.status().to_lowercase());
        next
    }

    /// Toggle only if currently stopped.
    pub fn start(&self) -> MacroState {
        match self.state() {
            MacroState::Stopped => self.toggle(),
            running => running,
        }
    }

    /// Toggle only if currently running.
    pub fn stop(&self) -> MacroState {
        match self.state() {
            MacroState::Running => self.toggle(),
            stopped => stopped,
        }
    }

    pub fn state(&self) -> MacroState {
        *self.shared.state()
    }

    pub fn status(&self) -> &'static str {
        self.state().status()
    }

    /// Cycles that ran to completion since spawn.
    pub fn cycles(&self) -> u64 {
        self.shared.cycles.load(Ordering::Acquire)
    }
}

/// Owns the worker thread that runs one cycle per tick.
///
/// Ticks are fixed-delay: the next one is armed only after the previous
/// cycle's click has been issued, so cycles never overlap.
pub struct MacroScheduler {
    handle: MacroHandle,
    worker: Option<JoinHandle<()>>,
}

impl MacroScheduler {
    /// Spawn the worker in the `Stopped` state.
    pub fn spawn(
        config: &MacroConfig,
        pointer: Box<dyn Pointer>,
        random: Box<dyn RandomSource>,
        sleeper: Box<dyn Sleeper>,
    ) -> Result<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(MacroState::Stopped),
            cycles: AtomicU64::new(0),
            cancel: CancelToken::new(),
            finish_cycle_on_stop: config.finish_cycle_on_stop,
        });
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        let worker = Worker {
            shared: Arc::clone(&shared),
            synth: PathSynthesizer::new(PathTuning::from(config)),
            interval: config.interval(),
            pointer,
            random,
            sleeper,
        };
        let join = thread::Builder::new()
            .name("wander-sched".into())
            .spawn(move || worker.run(cmd_rx))
            .context("failed to spawn scheduler thread")?;

        logger::info_p("sched", &format!("armed with {}ms interval", config.interval_ms));
        Ok(Self { handle: MacroHandle { shared, cmd_tx }, worker: Some(join) })
    }

    pub fn handle(&self) -> MacroHandle {
        self.handle.clone()
    }

    pub fn toggle(&self) -> MacroState {
        self.handle.toggle()
    }

    pub fn state(&self) -> MacroState {
        self.handle.state()
    }

    /// Stop for good. Waits for an in-flight cycle, so no pointer calls
    /// happen once this returns.
    pub fn teardown(&mut self) {
        let Some(worker) = self.worker.take() else { return };
        {
            let shared = &self.handle.shared;
            let mut state = shared.state();
            shared.stopped(&mut state);
        }
        self.handle.cmd_tx.send(Command::Quit).ok();
        if worker.join().is_err() {
            logger::error_p("sched", "worker thread panicked");
        }
        logger::info_p("sched", "torn down");
    }
}

impl Drop for MacroScheduler {
    fn drop(&mut self) {
        self.teardown();
    }
}

struct Worker {
    shared: Arc<Shared>,
    synth: PathSynthesizer,
    interval: Duration,
    pointer: Box<dyn Pointer>,
    random: Box<dyn RandomSource>,
    sleeper: Box<dyn Sleeper>,
}

impl Worker {
    fn run(mut self, cmd_rx: mpsc::Receiver<Command>) {
        let mut next_tick: Option<Instant> = None;

        loop {
            let received = match next_tick {
                None => cmd_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                Some(at) => cmd_rx.recv_timeout(at.saturating_duration_since(Instant::now())),
            };

            match received {
                Ok(Command::Toggle) => next_tick = self.rearm(),
                Ok(Command::Quit) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    self.shared.cancel.reset();
                    if *self.shared.state() == MacroState::Running {
                        self.tick();
                    }
                    next_tick = self.rearm();
                }
            }
        }
    }

    /// Deadline for the next tick, if still running.
    fn rearm(&self) -> Option<Instant> {
        (*self.shared.state() == MacroState::Running).then(|| Instant::now() + self.interval)
    }

    fn tick(&mut self) {
        let result = self.synth.run_cycle(
            self.pointer.as_mut(),
            self.random.as_mut(),
            self.sleeper.as_ref(),
            &self.shared.cancel,
        );
        match result {
            Ok(report) => {
                let n = self.shared.cycles.fetch_add(1, Ordering::AcqRel) + 1;
                let click = match report.clicked_at {
                    Some(p) => format!("clicked {}", p),
                    None => "click failed".to_string(),
                };
                logger::info_p(
                    "sched",
                    &format!("cycle {} done: {} moves ({} failed), {}", n, report.moves, report.failed_moves, click),
                );
            }
            Err(CycleError::Cancelled { moves }) => {
                logger::info_p("sched", &format!("cycle stopped after {} moves", moves));
            }
            Err(e) => logger::warn_p("sched", &format!("cycle aborted: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::stub::StubPointer;
    use crate::sleep::NoSleep;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(interval_ms: u64) -> MacroConfig {
        MacroConfig { interval_ms, ..Default::default() }
    }

    fn spawn(interval_ms: u64) -> (MacroScheduler, crate::platform::stub::PointerLog) {
        let stub = StubPointer::new();
        let log = stub.log();
        let sched = MacroScheduler::spawn(
            &config(interval_ms),
            Box::new(stub),
            Box::new(StdRng::seed_from_u64(11)),
            Box::new(NoSleep),
        )
        .unwrap();
        (sched, log)
    }

    fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn starts_stopped() {
        let (sched, log) = spawn(10);
        assert_eq!(sched.state(), MacroState::Stopped);
        assert_eq!(sched.handle().status(), "Macro stopped");
        thread::sleep(Duration::from_millis(40));
        assert!(log.is_empty());
    }

    #[test]
    fn toggle_flips_state_and_status() {
        let (sched, _log) = spawn(60_000);
        let handle = sched.handle();
        assert_eq!(handle.toggle(), MacroState::Running);
        assert_eq!(handle.status(), "Macro running");
        assert_eq!(sched.toggle(), MacroState::Stopped);
        assert_eq!(handle.status(), "Macro stopped");
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let (sched, _log) = spawn(60_000);
        let handle = sched.handle();
        assert_eq!(handle.start(), MacroState::Running);
        assert_eq!(handle.start(), MacroState::Running);
        assert_eq!(handle.stop(), MacroState::Stopped);
        assert_eq!(handle.stop(), MacroState::Stopped);
    }

    #[test]
    fn no_cycle_runs_before_first_interval() {
        let (sched, log) = spawn(60_000);
        sched.toggle();
        thread::sleep(Duration::from_millis(50));
        assert!(log.is_empty());
        assert_eq!(sched.handle().cycles(), 0);
    }

    #[test]
    fn running_scheduler_completes_cycles() {
        let (sched, log) = spawn(5);
        sched.toggle();
        assert!(wait_for(|| sched.handle().cycles() >= 2));
        assert!(log.clicks().len() >= 2);
    }

    #[test]
    fn double_toggle_arms_nothing() {
        let (sched, log) = spawn(10);
        sched.toggle();
        sched.toggle();
        assert_eq!(sched.state(), MacroState::Stopped);
        thread::sleep(Duration::from_millis(60));
        assert!(log.is_empty());
    }

    #[test]
    fn teardown_is_final() {
        let (mut sched, log) = spawn(5);
        let handle = sched.handle();
        sched.toggle();
        assert!(wait_for(|| handle.cycles() >= 1));
        sched.teardown();
        assert_eq!(handle.state(), MacroState::Stopped);
        let seen = log.len();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(log.len(), seen);
        // a second teardown is a no-op
        sched.teardown();
    }

    #[test]
    fn handle_toggle_after_teardown_is_harmless() {
        let (mut sched, log) = spawn(5);
        let handle = sched.handle();
        sched.teardown();
        handle.toggle();
        thread::sleep(Duration::from_millis(30));
        assert!(log.is_empty());
    }
}
