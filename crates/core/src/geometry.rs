use crate::types::{Point, ScreenBounds};

/// Clamp a coordinate pair into `[0, width-1] x [0, height-1]`.
///
/// `bounds` must be valid; callers reject degenerate bounds before planning.
pub fn clamp_to(bounds: ScreenBounds, x: i32, y: i32) -> Point {
    Point {
        x: x.clamp(0, bounds.width - 1),
        y: y.clamp(0, bounds.height - 1),
    }
}

/// Linear interpolation between two points, truncated toward zero.
pub fn lerp(start: Point, target: Point, progress: f64) -> Point {
    let x = start.x as f64 + (target.x - start.x) as f64 * progress;
    let y = start.y as f64 + (target.y - start.y) as f64 * progress;
    Point { x: x as i32, y: y as i32 }
}
