use anyhow::{bail, Context, Result};
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEINPUT, MOUSE_EVENT_FLAGS,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SetCursorPos, SM_CXSCREEN, SM_CYSCREEN,
};

use crate::types::*;
use super::Pointer;

/// Pointer backed by the Win32 cursor and `SendInput`.
pub struct WinPointer;

fn mouse_input(flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

impl Pointer for WinPointer {
    fn screen_bounds(&self) -> Result<ScreenBounds> {
        let (w, h) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        Ok(ScreenBounds::new(w, h))
    }

    fn position(&self) -> Result<Point> {
        let mut pt = POINT::default();
        unsafe { GetCursorPos(&mut pt) }.context("GetCursorPos")?;
        Ok(Point::new(pt.x, pt.y))
    }

    fn move_to(&mut self, p: Point) -> Result<()> {
        unsafe { SetCursorPos(p.x, p.y) }.with_context(|| format!("SetCursorPos{}", p))?;
        Ok(())
    }

    fn click(&mut self, p: Point) -> Result<()> {
        // SendInput clicks wherever the cursor is; the caller has already moved it to `p`.
        let inputs = [mouse_input(MOUSEEVENTF_LEFTDOWN), mouse_input(MOUSEEVENTF_LEFTUP)];
        let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent as usize != inputs.len() {
            bail!("SendInput delivered {} of {} events at {}", sent, inputs.len(), p);
        }
        Ok(())
    }
}
