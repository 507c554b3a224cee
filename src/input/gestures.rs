//! Gesture recognition for a presented sheet
//!
//! One touch is tracked at a time. A touch that lands on the panel becomes a
//! pan and produces [`DragEvent`]s; a touch that lands on the scrim is a
//! potential tap. Extra fingers are ignored until the tracked one lifts.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::primitives::{Point, Rect};
use crate::sheet::DragEvent;

/// Which surface a touch landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Panel,
    Scrim,
}

/// Panel and scrim never overlap: anything outside the panel is scrim
pub fn hit_region(panel: Rect, pos: Point) -> HitRegion {
    if panel.contains(pos) {
        HitRegion::Panel
    } else {
        HitRegion::Scrim
    }
}

/// Recognized input for a sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetGesture {
    Drag(DragEvent),
    ScrimTap { position: Point },
}

/// Configuration for gesture recognition
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Maximum time for a tap
    pub tap_duration: Duration,

    /// Maximum travel for a tap, in logical units
    pub tap_slop: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_duration: Duration::from_millis(200),
            tap_slop: 10.0,
        }
    }
}

/// Touch point tracking
#[derive(Debug, Clone)]
pub struct TouchPoint {
    pub id: i32,
    pub start_pos: Point,
    pub current_pos: Point,
    pub start_time: Instant,
    pub last_time: Instant,
    /// Vertical velocity over the last motion interval, units/s
    pub velocity_y: f64,
}

impl TouchPoint {
    pub fn new(id: i32, pos: Point, time: Instant) -> Self {
        Self {
            id,
            start_pos: pos,
            current_pos: pos,
            start_time: time,
            last_time: time,
            velocity_y: 0.0,
        }
    }

    pub fn update(&mut self, pos: Point, time: Instant) {
        let dt = time.saturating_duration_since(self.last_time).as_secs_f64();

        if dt > 0.001 {
            self.velocity_y = (pos.y - self.current_pos.y) / dt;
        }

        self.current_pos = pos;
        self.last_time = time;
    }

    pub fn distance(&self) -> f64 {
        self.start_pos.distance_to(self.current_pos)
    }
}

#[derive(Debug, Clone)]
enum Tracking {
    Pan {
        point: TouchPoint,
        /// Vertical movement not yet handed to the sheet
        translation: f64,
    },
    PotentialTap {
        point: TouchPoint,
    },
}

/// Turns raw touch samples into sheet gestures
#[derive(Debug, Default)]
pub struct SheetGestureRecognizer {
    pub config: GestureConfig,
    tracking: Option<Tracking>,
}

impl SheetGestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self { config, tracking: None }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.is_some()
    }

    /// Handle touch down; `panel` is the panel's current frame
    pub fn touch_down(&mut self, id: i32, pos: Point, time: Instant, panel: Rect) {
        if self.tracking.is_some() {
            debug!(id, "ignoring extra touch");
            return;
        }

        let point = TouchPoint::new(id, pos, time);
        self.tracking = Some(match hit_region(panel, pos) {
            HitRegion::Panel => Tracking::Pan { point, translation: 0.0 },
            HitRegion::Scrim => Tracking::PotentialTap { point },
        });
    }

    /// Handle touch motion
    pub fn touch_motion(&mut self, id: i32, pos: Point, time: Instant) -> Option<SheetGesture> {
        match self.tracking.as_mut()? {
            Tracking::Pan { point, translation } if point.id == id => {
                let dy = pos.y - point.current_pos.y;
                point.update(pos, time);
                *translation += dy;

                // Consumed exactly once
                let delta = std::mem::take(translation);
                Some(SheetGesture::Drag(DragEvent::Changed {
                    translation: delta,
                    position: pos,
                }))
            }
            Tracking::PotentialTap { point } if point.id == id => {
                point.update(pos, time);
                None
            }
            _ => None,
        }
    }

    /// Handle touch up
    pub fn touch_up(&mut self, id: i32, time: Instant) -> Option<SheetGesture> {
        let tracked_id = match self.tracking.as_ref()? {
            Tracking::Pan { point, .. } | Tracking::PotentialTap { point } => point.id,
        };
        if tracked_id != id {
            return None;
        }

        match self.tracking.take()? {
            Tracking::Pan { point, .. } => {
                // A finger that rested before lifting has no velocity left
                let idle = time.saturating_duration_since(point.last_time);
                let velocity = if idle > Duration::from_millis(100) { 0.0 } else { point.velocity_y };
                Some(SheetGesture::Drag(DragEvent::Ended {
                    velocity,
                    position: point.current_pos,
                }))
            }
            Tracking::PotentialTap { point } => {
                let duration = time.saturating_duration_since(point.start_time);
                if duration < self.config.tap_duration && point.distance() < self.config.tap_slop {
                    Some(SheetGesture::ScrimTap { position: point.start_pos })
                } else {
                    None
                }
            }
        }
    }

    /// Handle touch cancel. A cancelled pan ends at rest so the sheet can settle.
    pub fn touch_cancel(&mut self) -> Option<SheetGesture> {
        match self.tracking.take()? {
            Tracking::Pan { point, .. } => Some(SheetGesture::Drag(DragEvent::Ended {
                velocity: 0.0,
                position: point.current_pos,
            })),
            Tracking::PotentialTap { .. } => None,
        }
    }
}
