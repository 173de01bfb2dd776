use std::io;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};

use anyhow::Result;
use crossterm::{
    execute,
    event::{EnableMouseCapture, DisableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{Terminal, backend::CrosstermBackend};

use wander_core::logger;
use wander_core::platform::{create_platform, hotkey};
use wander_core::random::RandomSource;
use wander_core::scheduler::MacroScheduler;
use wander_core::settings::MacroConfig;
use wander_core::sleep::ThreadSleeper;

fn main() -> Result<()> {
    let force_stub = std::env::args().any(|a| a == "--stub");

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    logger::init(&cwd.join("logs"));

    let (log_tx, log_rx) = mpsc::channel::<String>();
    logger::set_tui_sender(log_tx);

    let config = match MacroConfig::load(&cwd.join("wander.json")) {
        Ok(c) => c,
        Err(e) => {
            logger::warn(&format!("{:#}, using defaults", e));
            MacroConfig::default()
        }
    };

    let random: Box<dyn RandomSource> = match config.seed {
        Some(seed) => {
            logger::info(&format!("replaying paths from seed {}", seed));
            Box::new(StdRng::seed_from_u64(seed))
        }
        None => Box::new(StdRng::from_entropy()),
    };

    let mut scheduler = MacroScheduler::spawn(
        &config,
        create_platform(force_stub),
        random,
        Box::new(ThreadSleeper),
    )?;
    logger::info("wander started");

    let hotkey_flag = Arc::new(AtomicBool::new(false));
    hotkey::start_hotkey_listener(Arc::clone(&hotkey_flag));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = wander_tui::App::new(scheduler.handle(), log_rx);
    let result = wander_tui::event::run(&mut terminal, &mut app, hotkey_flag);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    // Joins the worker; no pointer calls after this.
    scheduler.teardown();

    result
}
