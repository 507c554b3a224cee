//! Geometry and color primitives shared by the sheet and its hosts
//!
//! Coordinates are logical units with y growing downward, the way touch
//! screens report them.

/// A point in logical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A simple rectangle (panel frames, screen bounds)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Same size, moved so its vertical center sits at `center_y`
    pub fn with_center_y(&self, center_y: f64) -> Self {
        Self {
            y: center_y - self.height / 2.0,
            ..*self
        }
    }

    /// Zero-sized frames come from hosts that have not laid out yet
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width &&
        p.y >= self.y && p.y < self.y + self.height
    }
}

/// Color in RGBA format (0.0 - 1.0)
pub type Color = [f32; 4];

/// Default sheet colors
pub mod colors {
    use super::Color;

    pub const SCRIM: Color = [0.0, 0.0, 0.0, 0.6];          // Dimmed black
    pub const PANEL: Color = [1.0, 1.0, 1.0, 1.0];          // White
}

/// Easing functions for animations
pub mod easing {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum Easing {
        Linear,
        #[default]
        EaseInOut,
        EaseOut,
    }

    impl Easing {
        pub fn apply(&self, t: f64) -> f64 {
            let t = t.clamp(0.0, 1.0);
            match self {
                Easing::Linear => t,
                Easing::EaseInOut => ease_in_out_cubic(t),
                Easing::EaseOut => ease_out_cubic(t),
            }
        }
    }

    /// Ease out cubic - starts fast, slows down
    pub fn ease_out_cubic(t: f64) -> f64 {
        1.0 - (1.0 - t).powi(3)
    }

    /// Ease in out cubic - smooth start and end
    pub fn ease_in_out_cubic(t: f64) -> f64 {
        if t < 0.5 {
            4.0 * t * t * t
        } else {
            1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
        }
    }
}

/// Linear interpolation
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Clamp a value between min and max
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}
