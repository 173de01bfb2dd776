use std::fmt;

/// Integer screen coordinate (primary display, origin top-left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Primary display dimensions, queried fresh every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBounds {
    pub width: i32,
    pub height: i32,
}

impl ScreenBounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn contains(&self, p: Point) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }
}

impl fmt::Display for ScreenBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Run state of one macro instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MacroState {
    #[default]
    Stopped,
    Running,
}

impl MacroState {
    /// The state a toggle moves to.
    pub fn toggled(self) -> Self {
        match self {
            MacroState::Stopped => MacroState::Running,
            MacroState::Running => MacroState::Stopped,
        }
    }

    /// Status line shown by the host.
    pub fn status(self) -> &'static str {
        match self {
            MacroState::Running => "Macro running",
            MacroState::Stopped => "Macro stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_involution() {
        assert_eq!(MacroState::default().toggled(), MacroState::Running);
        assert_eq!(MacroState::Running.toggled(), MacroState::Stopped);
        assert_eq!(MacroState::Stopped.toggled().toggled(), MacroState::Stopped);
    }
}

/// One movement cycle. Built per tick and dropped once the click is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPlan {
    pub start: Point,
    pub target: Point,
    pub step_count: u32,
}

/// Command from the host to the scheduler worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Quit,
}
