use std::sync::mpsc;

use wander_core::scheduler::MacroHandle;
use wander_core::types::MacroState;

pub struct App {
    pub handle: MacroHandle,
    pub log_visible: bool,
    pub log_messages: Vec<String>,
    pub log_scroll: usize, // scroll offset from bottom (0 = latest)
    pub log_rx: mpsc::Receiver<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(handle: MacroHandle, log_rx: mpsc::Receiver<String>) -> Self {
        Self {
            handle,
            log_visible: true,
            log_messages: Vec::new(),
            log_scroll: 0,
            log_rx,
            should_quit: false,
        }
    }

    pub fn drain_logs(&mut self) {
        while let Ok(msg) = self.log_rx.try_recv() {
            self.log_messages.push(msg);
        }
    }

    pub fn scroll_log_up(&mut self, n: usize) {
        self.log_scroll = self.log_scroll.saturating_add(n);
    }

    pub fn scroll_log_down(&mut self, n: usize) {
        self.log_scroll = self.log_scroll.saturating_sub(n);
    }

    pub fn toggle_macro(&mut self) -> MacroState {
        self.handle.toggle()
    }

    pub fn toggle_log(&mut self) {
        self.log_visible = !self.log_visible;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
