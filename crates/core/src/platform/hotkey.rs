use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::logger;

/// Human-readable name of the global toggle chord on this OS.
#[cfg(target_os = "macos")]
pub const TOGGLE_HOTKEY: Option<&str> = Some("Cmd+Shift+K");
#[cfg(target_os = "windows")]
pub const TOGGLE_HOTKEY: Option<&str> = Some("Ctrl+Shift+K");
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const TOGGLE_HOTKEY: Option<&str> = None;

/// Listen for Cmd+Shift+K on a background thread and set `flag` on each press.
/// The host polls and clears the flag.
#[cfg(target_os = "macos")]
pub fn start_hotkey_listener(flag: Arc<AtomicBool>) {
    use core_foundation::runloop::{kCFRunLoopCommonModes, CFRunLoop};
    use core_graphics::event::{
        CGEvent, CGEventFlags, CGEventTap, CGEventTapLocation, CGEventTapOptions,
        CGEventTapPlacement, CGEventType, EventField,
    };

    const KEYCODE_K: i64 = 40;

    fn is_toggle_chord(event: &CGEvent) -> bool {
        let flags = event.get_flags();
        let keycode = event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE);
        keycode == KEYCODE_K
            && flags.contains(CGEventFlags::CGEventFlagCommand)
            && flags.contains(CGEventFlags::CGEventFlagShift)
            && !flags.contains(CGEventFlags::CGEventFlagAlternate)
            && !flags.contains(CGEventFlags::CGEventFlagControl)
    }

    let spawned = std::thread::Builder::new()
        .name("wander-hotkey".into())
        .spawn(move || {
            let tap = CGEventTap::new(
                CGEventTapLocation::HID,
                CGEventTapPlacement::HeadInsertEventTap,
                CGEventTapOptions::ListenOnly,
                vec![CGEventType::KeyDown],
                |_proxy, event_type, event| {
                    if matches!(event_type, CGEventType::KeyDown) && is_toggle_chord(event) {
                        flag.store(true, Ordering::Release);
                    }
                    None
                },
            );
            let Ok(tap) = tap else {
                logger::error(
                    "failed to create event tap for global hotkey, \
                     grant Accessibility permission to your terminal",
                );
                return;
            };
            let Ok(source) = tap.mach_port.create_runloop_source(0) else {
                logger::error("failed to attach hotkey event tap to the run loop");
                return;
            };

            let run_loop = CFRunLoop::get_current();
            unsafe { run_loop.add_source(&source, kCFRunLoopCommonModes) };
            tap.enable();
            logger::info("global hotkey Cmd+Shift+K registered");
            CFRunLoop::run_current(); // blocks forever
        });

    if let Err(e) = spawned {
        logger::error(&format!("failed to spawn hotkey thread: {}", e));
    }
}

/// Listen for Ctrl+Shift+K on a background thread and set `flag` on each press.
/// The host polls and clears the flag.
#[cfg(target_os = "windows")]
pub fn start_hotkey_listener(flag: Arc<AtomicBool>) {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, MOD_CONTROL, MOD_NOREPEAT, MOD_SHIFT, VK_K,
    };
    use windows::Win32::UI::WindowsAndMessaging::{GetMessageW, MSG, WM_HOTKEY};

    const HOTKEY_ID: i32 = 1;

    let spawned = std::thread::Builder::new()
        .name("wander-hotkey".into())
        .spawn(move || unsafe {
            // Thread-bound hotkey: WM_HOTKEY is posted to this thread's queue.
            if let Err(e) = RegisterHotKey(
                HWND::default(),
                HOTKEY_ID,
                MOD_CONTROL | MOD_SHIFT | MOD_NOREPEAT,
                VK_K.0 as u32,
            ) {
                logger::error(&format!(
                    "failed to register global hotkey Ctrl+Shift+K: {}",
                    e
                ));
                return;
            }

            logger::info("global hotkey Ctrl+Shift+K registered");

            let mut msg = MSG::default();
            // 0 on WM_QUIT, -1 on error
            while GetMessageW(&mut msg, HWND::default(), 0, 0).0 > 0 {
                if msg.message == WM_HOTKEY && msg.wParam.0 == HOTKEY_ID as usize {
                    flag.store(true, Ordering::Release);
                }
            }
        });

    if let Err(e) = spawned {
        logger::error(&format!("failed to spawn hotkey thread: {}", e));
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub fn start_hotkey_listener(_flag: Arc<AtomicBool>) {
    logger::info("global hotkey not supported on this platform, use the TUI keys");
}

/// Consume a pending hotkey press.
pub fn take_press(flag: &AtomicBool) -> bool {
    flag.swap(false, Ordering::AcqRel)
}
