//! End-to-end scenarios: the real scheduler thread against a recording pointer.
//!
//! Run with `cargo run -p wander-test --bin test-macro`.

use std::thread;
use std::time::{Duration, Instant};

use libtest_mimic::{Arguments, Failed, Trial};
use rand::rngs::StdRng;
use rand::SeedableRng;

use wander_core::path::{PathSynthesizer, PathTuning};
use wander_core::platform::stub::{PointerEvent, StubPointer};
use wander_core::random::{RandomSource, ScriptedRandom};
use wander_core::scheduler::MacroScheduler;
use wander_core::settings::MacroConfig;
use wander_core::sleep::{CancelToken, NoSleep, ThreadSleeper};
use wander_core::types::{MacroState, Point, ScreenBounds};

fn main() {
    let args = Arguments::from_args();
    let tests = vec![
        Trial::test("centered_hundred_step_cycle", centered_hundred_step_cycle),
        Trial::test("slow_cycles_never_overlap", slow_cycles_never_overlap),
        Trial::test("stop_lets_cycle_finish", stop_lets_cycle_finish),
        Trial::test("stop_cancels_cycle_when_configured", stop_cancels_cycle_when_configured),
        Trial::test("teardown_silences_pointer", teardown_silences_pointer),
        Trial::test("double_toggle_stays_idle", double_toggle_stays_idle),
        Trial::test("invalid_bounds_skip_cycles", invalid_bounds_skip_cycles),
        Trial::test("seeded_cycles_replay", seeded_cycles_replay),
    ];
    libtest_mimic::run(&args, tests).exit();
}

fn check(cond: bool, msg: impl Into<String>) -> Result<(), Failed> {
    if cond {
        return Ok(());
    }
    let msg: String = msg.into();
    Err(msg.into())
}

fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

/// Config with short timings so scenarios finish quickly.
fn quick(interval_ms: u64, min_delay: u32, max_delay: u32) -> MacroConfig {
    MacroConfig {
        interval_ms,
        min_step_delay_ms: min_delay,
        max_step_delay_ms: max_delay,
        ..Default::default()
    }
}

/// Split a pointer log into per-cycle chunks, each ending with its click.
fn cycles(events: &[PointerEvent]) -> Vec<&[PointerEvent]> {
    events
        .split_inclusive(|e| matches!(e, PointerEvent::Click(_)))
        .filter(|c| matches!(c.last(), Some(PointerEvent::Click(_))))
        .collect()
}

fn centered_hundred_step_cycle() -> Result<(), Failed> {
    let stub = StubPointer::new().with_bounds(ScreenBounds::new(1920, 1080)).at(Point::new(0, 0));
    let log = stub.log();
    let mut sched = MacroScheduler::spawn(
        &quick(5, 10, 30),
        Box::new(stub),
        Box::new(ScriptedRandom::new([960, 540, 100])),
        Box::new(NoSleep),
    )?;
    let handle = sched.handle();
    handle.toggle();
    check(wait_for(Duration::from_secs(5), || handle.cycles() >= 1), "no cycle completed")?;
    sched.teardown();

    let events = log.events();
    let first = cycles(&events)[0];
    let moves: Vec<Point> = first
        .iter()
        .filter_map(|e| match e {
            PointerEvent::Move(p) => Some(*p),
            PointerEvent::Click(_) => None,
        })
        .collect();
    // 101 jittered moves for i = 0..=100 (the last one still jittered),
    // followed by one exact move onto the target: 102 move calls
    check(moves.len() == 102, format!("expected 102 moves, got {}", moves.len()))?;
    check(moves[101] == Point::new(960, 540), format!("final move {}", moves[101]))?;
    check(
        first.last() == Some(&PointerEvent::Click(Point::new(960, 540))),
        "click not at target",
    )?;
    check(first.iter().filter(|e| matches!(e, PointerEvent::Click(_))).count() == 1, "more than one click")
}

fn slow_cycles_never_overlap() -> Result<(), Failed> {
    // each cycle sleeps at least 51 x 1ms, well past the 2ms interval
    let stub = StubPointer::new();
    let log = stub.log();
    let mut sched = MacroScheduler::spawn(
        &quick(2, 1, 3),
        Box::new(stub),
        Box::new(StdRng::seed_from_u64(8)),
        Box::new(ThreadSleeper),
    )?;
    let handle = sched.handle();
    handle.toggle();
    check(wait_for(Duration::from_secs(10), || handle.cycles() >= 3), "fewer than 3 cycles")?;
    sched.teardown();

    let events = log.events();
    let done = cycles(&events);
    check(done.len() >= 3, format!("only {} complete cycles", done.len()))?;
    for (n, cycle) in done.iter().enumerate() {
        let (click, moves) = cycle.split_last().ok_or("empty cycle")?;
        let PointerEvent::Click(at) = click else { return Err("cycle without click".into()) };
        check(
            (52..=151).contains(&moves.len()),
            format!("cycle {} has {} moves", n, moves.len()),
        )?;
        check(
            moves.iter().all(|e| matches!(e, PointerEvent::Move(_))),
            format!("cycle {} interleaves clicks", n),
        )?;
        check(moves.last() == Some(&PointerEvent::Move(*at)), format!("cycle {} clicked off target", n))?;
    }
    Ok(())
}

fn stop_lets_cycle_finish() -> Result<(), Failed> {
    let stub = StubPointer::new();
    let log = stub.log();
    let mut sched = MacroScheduler::spawn(
        &quick(1, 2, 4),
        Box::new(stub),
        Box::new(StdRng::seed_from_u64(21)),
        Box::new(ThreadSleeper),
    )?;
    let handle = sched.handle();
    handle.toggle();
    check(wait_for(Duration::from_secs(5), || !log.is_empty()), "cycle never started")?;
    handle.toggle();
    check(handle.state() == MacroState::Stopped, "toggle did not stop")?;

    check(wait_for(Duration::from_secs(5), || handle.cycles() == 1), "in-flight cycle did not finish")?;
    thread::sleep(Duration::from_millis(50));
    sched.teardown();

    check(log.clicks().len() == 1, format!("expected one click, got {}", log.clicks().len()))?;
    check(
        matches!(log.events().last(), Some(PointerEvent::Click(_))),
        "pointer moved after the final click",
    )
}

fn stop_cancels_cycle_when_configured() -> Result<(), Failed> {
    let stub = StubPointer::new();
    let log = stub.log();
    let config = MacroConfig { finish_cycle_on_stop: false, ..quick(1, 2, 4) };
    let mut sched = MacroScheduler::spawn(
        &config,
        Box::new(stub),
        Box::new(StdRng::seed_from_u64(22)),
        Box::new(ThreadSleeper),
    )?;
    let handle = sched.handle();
    handle.toggle();
    check(wait_for(Duration::from_secs(5), || !log.is_empty()), "cycle never started")?;
    handle.toggle();

    // at most one more step completes after the request
    thread::sleep(Duration::from_millis(50));
    let settled = log.len();
    thread::sleep(Duration::from_millis(50));
    sched.teardown();

    check(log.len() == settled, "moves continued after cancellation")?;
    check(log.clicks().is_empty(), "cancelled cycle clicked")?;
    check(handle.cycles() == 0, "cancelled cycle counted as complete")
}

fn teardown_silences_pointer() -> Result<(), Failed> {
    let stub = StubPointer::new();
    let log = stub.log();
    let mut sched = MacroScheduler::spawn(
        &quick(5, 10, 30),
        Box::new(stub),
        Box::new(StdRng::seed_from_u64(3)),
        Box::new(NoSleep),
    )?;
    let handle = sched.handle();
    handle.toggle();
    check(wait_for(Duration::from_secs(5), || handle.cycles() >= 1), "no cycle completed")?;
    sched.teardown();
    check(handle.state() == MacroState::Stopped, "teardown left macro running")?;

    let seen = log.len();
    // several intervals after teardown
    thread::sleep(Duration::from_millis(40));
    check(log.len() == seen, "pointer used after teardown")
}

fn double_toggle_stays_idle() -> Result<(), Failed> {
    let stub = StubPointer::new();
    let log = stub.log();
    let sched = MacroScheduler::spawn(
        &quick(5, 10, 30),
        Box::new(stub),
        Box::new(StdRng::seed_from_u64(4)),
        Box::new(NoSleep),
    )?;
    sched.toggle();
    sched.toggle();
    thread::sleep(Duration::from_millis(40));
    check(sched.state() == MacroState::Stopped, "not stopped")?;
    check(log.is_empty(), "pointer moved while stopped")
}

fn invalid_bounds_skip_cycles() -> Result<(), Failed> {
    let stub = StubPointer::new().with_bounds(ScreenBounds::new(0, 0));
    let log = stub.log();
    let sched = MacroScheduler::spawn(
        &quick(2, 10, 30),
        Box::new(stub),
        Box::new(StdRng::seed_from_u64(5)),
        Box::new(NoSleep),
    )?;
    sched.toggle();
    thread::sleep(Duration::from_millis(30));
    check(sched.state() == MacroState::Running, "aborted cycle changed state")?;
    check(log.is_empty(), "degenerate screen produced pointer calls")?;
    check(sched.handle().cycles() == 0, "aborted cycle counted")
}

fn seeded_cycles_replay() -> Result<(), Failed> {
    let run = |seed: u64| -> Result<Vec<PointerEvent>, Failed> {
        let synth = PathSynthesizer::new(PathTuning::default());
        let mut rng: Box<dyn RandomSource> = Box::new(StdRng::seed_from_u64(seed));
        let mut stub = StubPointer::new().at(Point::new(300, 200));
        let log = stub.log();
        for _ in 0..3 {
            synth.run_cycle(&mut stub, rng.as_mut(), &NoSleep, &CancelToken::new())?;
        }
        Ok(log.events())
    };
    let a = run(77)?;
    check(a == run(77)?, "same seed produced different paths")?;
    check(a != run(78)?, "different seeds produced identical paths")
}
