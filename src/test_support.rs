//! Synchronous host for unit tests
//!
//! Records everything the sheet asks for. Scheduled tasks and animations
//! only run when the test drains them, so tests control the interleaving.

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::{SheetAppearance, SheetConfig};
use crate::host::{AnimationTargets, AnimationTicket, SheetHost, SheetTask};
use crate::primitives::{Color, Rect};
use crate::sheet::Sheet;

pub struct RecordingHost {
    pub frame: Rect,
    pub screen_height: f64,
    pub scrim_alpha: f64,
    pub scrim_color: Color,
    pub panel_color: Color,
    pub panel_height: Option<f64>,
    pub corner_radius: Option<f64>,
    pub content: Vec<String>,
    /// Immediate (non-animated) panel moves
    pub panel_jumps: Vec<f64>,
    /// Every animation ever started
    pub animations: Vec<(AnimationTicket, Duration, AnimationTargets)>,
    in_flight: VecDeque<(AnimationTicket, AnimationTargets)>,
    tasks: VecDeque<SheetTask>,
    pub dismissed: usize,
}

impl RecordingHost {
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            screen_height: frame.bottom(),
            scrim_alpha: 0.0,
            scrim_color: [0.0; 4],
            panel_color: [0.0; 4],
            panel_height: None,
            corner_radius: None,
            content: Vec::new(),
            panel_jumps: Vec::new(),
            animations: Vec::new(),
            in_flight: VecDeque::new(),
            tasks: VecDeque::new(),
            dismissed: 0,
        }
    }

    /// A default sheet that has finished its entry animation
    pub fn presented(frame: Rect) -> (Sheet, Self) {
        Self::presented_with(SheetConfig::default(), frame)
    }

    pub fn presented_with(appearance: impl SheetAppearance + 'static, frame: Rect) -> (Sheet, Self) {
        let mut host = Self::new(frame);
        let mut sheet = Sheet::new(appearance);
        sheet.load(&mut host);
        sheet.appear(&mut host);
        sheet.layout_changed(&mut host);
        host.run_tasks(&mut sheet);
        host.finish_animations(&mut sheet);
        (sheet, host)
    }

    /// Run queued tasks in order; returns how many ran
    pub fn run_tasks(&mut self, sheet: &mut Sheet) -> usize {
        let mut ran = 0;
        while let Some(task) = self.tasks.pop_front() {
            sheet.run_task(task, self);
            ran += 1;
        }
        ran
    }

    /// Settle every running animation, oldest first
    pub fn finish_animations(&mut self, sheet: &mut Sheet) {
        while let Some((ticket, targets)) = self.in_flight.pop_front() {
            if let Some(center_y) = targets.panel_center_y {
                self.frame = self.frame.with_center_y(center_y);
            }
            if let Some(alpha) = targets.scrim_alpha {
                self.scrim_alpha = alpha;
            }
            sheet.animation_finished(ticket, self);
        }
    }
}

impl SheetHost for RecordingHost {
    type Content = String;

    fn panel_frame(&self) -> Rect {
        self.frame
    }

    fn screen_height(&self) -> f64 {
        self.screen_height
    }

    fn set_panel_center_y(&mut self, center_y: f64) {
        self.panel_jumps.push(center_y);
        self.frame = self.frame.with_center_y(center_y);
    }

    fn set_panel_height(&mut self, height: f64) {
        self.panel_height = Some(height);
    }

    fn set_panel_color(&mut self, color: Color) {
        self.panel_color = color;
    }

    fn set_panel_top_corner_radius(&mut self, radius: f64) {
        self.corner_radius = Some(radius);
    }

    fn attach_content(&mut self, content: String) {
        self.content.push(content);
    }

    fn set_scrim_color(&mut self, color: Color) {
        self.scrim_color = color;
    }

    fn set_scrim_alpha(&mut self, alpha: f64) {
        self.scrim_alpha = alpha;
    }

    fn animate(&mut self, ticket: AnimationTicket, duration: Duration, targets: AnimationTargets) {
        self.animations.push((ticket, duration, targets));
        self.in_flight.push_back((ticket, targets));
    }

    fn schedule(&mut self, task: SheetTask) {
        self.tasks.push_back(task);
    }

    fn sheet_dismissed(&mut self) {
        self.dismissed += 1;
    }
}
