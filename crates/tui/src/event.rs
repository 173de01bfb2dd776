use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use wander_core::platform::hotkey;

use crate::App;
use crate::ui;

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    hotkey_flag: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    loop {
        if app.should_quit {
            return Ok(());
        }

        if hotkey::take_press(&hotkey_flag) {
            app.toggle_macro();
        }

        app.drain_logs();

        terminal.draw(|f| ui::draw(f, app))?;

        // 100ms poll keeps the hotkey and status line responsive
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
                KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char(' ') => {
                    app.toggle_macro();
                }
                KeyCode::Char('l') | KeyCode::Char('L') => app.toggle_log(),
                _ => {}
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => app.scroll_log_up(3),
                MouseEventKind::ScrollDown => app.scroll_log_down(3),
                _ => {}
            },
            _ => {}
        }
    }
}
