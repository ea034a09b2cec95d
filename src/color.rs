//! Task color assignment.
//!
//! A task's color is its configured color when valid, otherwise a palette
//! color chosen by the task's position. The result depends only on the
//! arguments; callers that render often can memoize it.

use crate::config::{is_hex_color, TaskConfig};
use once_cell::sync::Lazy;

/// Number of distinct palette colors before hues repeat.
pub const PALETTE_SIZE: usize = 24;

/// Golden angle in degrees; consecutive hues land far apart on the wheel.
const GOLDEN_ANGLE: f64 = 137.507_764;

static PALETTE: Lazy<Vec<String>> = Lazy::new(|| {
    (0..PALETTE_SIZE)
        .map(|i| {
            let hue = (i as f64 * GOLDEN_ANGLE) % 360.0;
            let (r, g, b) = hsv_to_rgb(hue, 0.65, 0.9);
            format!("#{r:02x}{g:02x}{b:02x}")
        })
        .collect()
});

/// Color for `tasks[index]`, or `None` if `index` is out of range.
#[must_use]
pub fn task_color(tasks: &[TaskConfig], index: usize) -> Option<String> {
    let task = tasks.get(index)?;
    match &task.color {
        Some(color) if is_hex_color(color) => Some(color.to_ascii_lowercase()),
        Some(color) => {
            log::warn!(
                "task '{}' has invalid color '{}', using palette",
                task.value,
                color
            );
            Some(palette_color(index).to_string())
        }
        None => Some(palette_color(index).to_string()),
    }
}

/// Colors for every task, in order.
#[must_use]
pub fn task_colors(tasks: &[TaskConfig]) -> Vec<String> {
    (0..tasks.len()).filter_map(|i| task_color(tasks, i)).collect()
}

/// Palette color for a position (wraps after [`PALETTE_SIZE`]).
#[must_use]
pub fn palette_color(index: usize) -> &'static str {
    &PALETTE[index % PALETTE_SIZE]
}

/// HSV (hue in degrees, saturation and value in `[0, 1]`) to 8-bit RGB.
fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> (u8, u8, u8) {
    let c = value * saturation;
    let h = (hue % 360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = value - c;
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}
