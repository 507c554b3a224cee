//! The seam between the sheet and whatever draws it
//!
//! The sheet never owns views, timers or threads. It talks to its host
//! through [`SheetHost`], passed in on every call, and the host reports back
//! (animation completions, deferred tasks, gestures) by calling into the
//! sheet on the UI thread.

use std::time::Duration;

use crate::primitives::{Color, Rect};

/// Identifies one animation started by a sheet.
///
/// Tickets carry the generation of the sheet that issued them, so a
/// completion delivered after teardown (or to the wrong instance) is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationTicket {
    pub generation: u64,
    pub seq: u64,
}

/// Properties an animation moves, each to its target value
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationTargets {
    /// Vertical center of the content panel
    pub panel_center_y: Option<f64>,
    /// Opacity of the scrim
    pub scrim_alpha: Option<f64>,
}

impl AnimationTargets {
    pub fn panel(center_y: f64) -> Self {
        Self { panel_center_y: Some(center_y), scrim_alpha: None }
    }

    pub fn scrim(alpha: f64) -> Self {
        Self { panel_center_y: None, scrim_alpha: Some(alpha) }
    }

    pub fn both(center_y: f64, alpha: f64) -> Self {
        Self { panel_center_y: Some(center_y), scrim_alpha: Some(alpha) }
    }
}

/// Work the sheet defers to the next turn of the host's UI loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetTask {
    Present,
    Dismiss,
}

/// Capabilities the host provides to a sheet
pub trait SheetHost {
    /// Opaque child the host can place inside the panel
    type Content;

    /// Current panel frame; zero-sized before the first layout pass
    fn panel_frame(&self) -> Rect;

    /// Screen height, used to resolve relative panel heights
    fn screen_height(&self) -> f64;

    /// Move the panel immediately, without animation
    fn set_panel_center_y(&mut self, center_y: f64);

    /// Pin the panel to a fixed height
    fn set_panel_height(&mut self, height: f64);

    fn set_panel_color(&mut self, color: Color);

    /// Round the panel's top-left and top-right corners
    fn set_panel_top_corner_radius(&mut self, radius: f64);

    fn attach_content(&mut self, content: Self::Content);

    fn set_scrim_color(&mut self, color: Color);

    /// Set scrim opacity immediately, without animation
    fn set_scrim_alpha(&mut self, alpha: f64);

    /// Start animating to `targets`. The host must later call
    /// `Sheet::animation_finished` with the same ticket once it settles.
    fn animate(&mut self, ticket: AnimationTicket, duration: Duration, targets: AnimationTargets);

    /// Run `task` through `Sheet::run_task` on a later turn of the UI loop
    fn schedule(&mut self, task: SheetTask);

    /// The sheet has finished dismissing; remove it. Called once.
    fn sheet_dismissed(&mut self);
}
