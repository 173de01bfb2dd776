use anyhow::{anyhow, Result};
use core_graphics::display::CGDisplay;
use core_graphics::event::{CGEvent, CGEventTapLocation, CGEventType, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;

use crate::types::*;
use super::Pointer;

/// Pointer backed by Quartz events posted at the HID tap.
pub struct DarwinPointer;

impl DarwinPointer {
    pub fn new() -> Self {
        DarwinPointer
    }
}

fn event_source() -> Result<CGEventSource> {
    CGEventSource::new(CGEventSourceStateID::HIDSystemState)
        .map_err(|_| anyhow!("failed to create CGEventSource"))
}

fn post_mouse(source: CGEventSource, kind: CGEventType, p: Point) -> Result<()> {
    let point = CGPoint::new(p.x as f64, p.y as f64);
    let event = CGEvent::new_mouse_event(source, kind, point, CGMouseButton::Left)
        .map_err(|_| anyhow!("failed to create mouse event at {}", p))?;
    event.post(CGEventTapLocation::HID);
    Ok(())
}

impl Pointer for DarwinPointer {
    fn screen_bounds(&self) -> Result<ScreenBounds> {
        // Global event coordinates are in points, not pixels.
        let bounds = CGDisplay::main().bounds();
        Ok(ScreenBounds::new(bounds.size.width as i32, bounds.size.height as i32))
    }

    fn position(&self) -> Result<Point> {
        let event = CGEvent::new(event_source()?)
            .map_err(|_| anyhow!("failed to create CGEvent"))?;
        let loc = event.location();
        Ok(Point::new(loc.x as i32, loc.y as i32))
    }

    fn move_to(&mut self, p: Point) -> Result<()> {
        post_mouse(event_source()?, CGEventType::MouseMoved, p)
    }

    fn click(&mut self, p: Point) -> Result<()> {
        let source = event_source()?;
        post_mouse(source.clone(), CGEventType::LeftMouseDown, p)?;
        post_mouse(source, CGEventType::LeftMouseUp, p)
    }
}
