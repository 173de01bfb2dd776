use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{bail, Result};

use crate::types::*;
use crate::logger;
use super::Pointer;

/// One call that reached the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Move(Point),
    Click(Point),
}

/// Shared record of every successful move and click, in order.
#[derive(Debug, Clone, Default)]
pub struct PointerLog(Arc<Mutex<Vec<PointerEvent>>>);

impl PointerLog {
    fn push(&self, ev: PointerEvent) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(ev);
    }

    pub fn events(&self) -> Vec<PointerEvent> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn moves(&self) -> Vec<Point> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PointerEvent::Move(p) => Some(p),
                PointerEvent::Click(_) => None,
            })
            .collect()
    }

    pub fn clicks(&self) -> Vec<Point> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PointerEvent::Click(p) => Some(p),
                PointerEvent::Move(_) => None,
            })
            .collect()
    }
}

/// In-memory pointer on a virtual screen. Backs `--stub` and the tests.
pub struct StubPointer {
    bounds: ScreenBounds,
    pos: Point,
    log: PointerLog,
    reject_moves: bool,
    reject_clicks: bool,
}

impl StubPointer {
    pub fn new() -> Self {
        Self {
            bounds: ScreenBounds::new(1920, 1080),
            pos: Point::new(960, 540),
            log: PointerLog::default(),
            reject_moves: false,
            reject_clicks: false,
        }
    }

    pub fn with_bounds(mut self, bounds: ScreenBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn at(mut self, pos: Point) -> Self {
        self.pos = pos;
        self
    }

    /// Fail every move, leaving the pointer where it is.
    pub fn rejecting_moves(mut self) -> Self {
        self.reject_moves = true;
        self
    }

    pub fn rejecting_clicks(mut self) -> Self {
        self.reject_clicks = true;
        self
    }

    pub fn log(&self) -> PointerLog {
        self.log.clone()
    }
}

impl Default for StubPointer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pointer for StubPointer {
    fn screen_bounds(&self) -> Result<ScreenBounds> {
        Ok(self.bounds)
    }

    fn position(&self) -> Result<Point> {
        Ok(self.pos)
    }

    fn move_to(&mut self, p: Point) -> Result<()> {
        if self.reject_moves {
            bail!("stub rejected move to {}", p);
        }
        self.pos = p;
        self.log.push(PointerEvent::Move(p));
        Ok(())
    }

    fn click(&mut self, p: Point) -> Result<()> {
        if self.reject_clicks {
            bail!("stub rejected click at {}", p);
        }
        logger::info_p("stub", &format!("click {}", p));
        self.log.push(PointerEvent::Click(p));
        Ok(())
    }
}
