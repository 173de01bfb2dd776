pub mod stub;
pub mod hotkey;

#[cfg(target_os = "macos")]
pub mod darwin;

#[cfg(target_os = "windows")]
pub mod win;

use anyhow::Result;

use crate::types::*;
use crate::logger;

/// Pointer control and primary screen metrics.
///
/// Implementations talk to the OS; failures surface as errors and the
/// caller decides whether they matter.
pub trait Pointer: Send {
    fn screen_bounds(&self) -> Result<ScreenBounds>;
    fn position(&self) -> Result<Point>;
    /// Absolute move.
    fn move_to(&mut self, p: Point) -> Result<()>;
    /// Left button down immediately followed by up at `p`.
    fn click(&mut self, p: Point) -> Result<()>;
}

/// Create the pointer backend appropriate for the current OS.
pub fn create_platform(force_stub: bool) -> Box<dyn Pointer> {
    logger::register_prefix("path", logger::COLOR_BLUE);
    logger::register_prefix("sched", logger::COLOR_GREEN);
    if force_stub {
        logger::register_prefix("stub", logger::COLOR_GRAY);
        return Box::new(stub::StubPointer::new());
    }
    #[cfg(target_os = "macos")]
    {
        logger::register_prefix("darwin", logger::COLOR_GRAY);
        return Box::new(darwin::DarwinPointer::new());
    }
    #[cfg(target_os = "windows")]
    {
        logger::register_prefix("win", logger::COLOR_GRAY);
        return Box::new(win::WinPointer);
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        logger::register_prefix("stub", logger::COLOR_GRAY);
        logger::warn_p("stub", "no native pointer backend for this OS, using stub");
        return Box::new(stub::StubPointer::new());
    }
}
