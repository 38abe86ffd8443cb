use std::time::Duration;

/// Nominal simulation step. Physics is per tick, not per second.
pub const TICK: Duration = Duration::from_millis(16);

/// Tuning constants, all derived from the screen size at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub width: f32,
    pub height: f32,
    pub bird_size: f32,
    pub bird_x: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub pipe_width: f32,
    pub gap: f32,
    /// Half-open range for the bottom edge of the upper pipe.
    pub gap_top_min: i32,
    pub gap_top_max: i32,
    pub scroll_speed: f32,
    /// A new pair spawns once the newest pair's left edge drops below this.
    pub spawn_threshold: f32,
}

impl Config {
    pub fn for_screen(width: f32, height: f32) -> Self {
        let h = height as i32;
        Self {
            width,
            height,
            bird_size: width.min(height) / 20.0,
            bird_x: width / 4.0,
            gravity: height / 600.0,
            jump_velocity: -height / 75.0,
            pipe_width: width / 37.0,
            gap: (h / 7) as f32,
            gap_top_min: h / 5,
            gap_top_max: h / 2,
            scroll_speed: width / 120.0,
            spawn_threshold: width - width / 3.0,
        }
    }
}
