//! Bottom sheet presentation lifecycle
//!
//! A [`Sheet`] is one presentation of the panel: it slides up over a scrim,
//! follows the finger while dragged (see [`drag`]), and slides back down when
//! dismissed by a scrim tap or a committed drag.
//!
//! ```text
//! Presenting -> Idle <-> Dragging -> Dismissing -> Dismissed
//!                  \________________/
//!                     scrim tap
//! ```

pub mod drag;

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::config::SheetAppearance;
use crate::host::{AnimationTargets, AnimationTicket, SheetHost, SheetTask};

pub use drag::{scrim_alpha_for, should_dismiss, DragEvent};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Lifecycle state of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetState {
    /// Waiting for layout or sliding up
    Presenting,
    /// Open and at rest (or settling back to rest)
    Idle,
    /// Following an active drag
    Dragging,
    /// Sliding down; cannot be interrupted
    Dismissing,
    /// Torn down; every further input is ignored
    Dismissed,
}

/// Transition whose completion moves the state machine forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Present(AnimationTicket),
    Dismiss(AnimationTicket),
}

/// One presentation of a bottom sheet
pub struct Sheet {
    appearance: Box<dyn SheetAppearance>,
    state: SheetState,
    generation: u64,
    next_seq: u64,
    /// Panel center when fully open; captured once after layout
    resting_offset: Option<f64>,
    /// Panel center (model value; the host animates toward it)
    current_offset: f64,
    scrim_alpha: f64,
    panel_height: f64,
    present_scheduled: bool,
    awaiting_layout: bool,
    pending: Option<Pending>,
}

impl Sheet {
    pub fn new(appearance: impl SheetAppearance + 'static) -> Self {
        Self {
            appearance: Box::new(appearance),
            state: SheetState::Presenting,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            next_seq: 0,
            resting_offset: None,
            current_offset: 0.0,
            scrim_alpha: 0.0,
            panel_height: 0.0,
            present_scheduled: false,
            awaiting_layout: false,
            pending: None,
        }
    }

    pub fn state(&self) -> SheetState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn resting_offset(&self) -> Option<f64> {
        self.resting_offset
    }

    pub fn current_offset(&self) -> f64 {
        self.current_offset
    }

    pub fn scrim_alpha(&self) -> f64 {
        self.scrim_alpha
    }

    pub fn panel_height(&self) -> f64 {
        self.panel_height
    }

    pub fn appearance(&self) -> &dyn SheetAppearance {
        self.appearance.as_ref()
    }

    /// False once the sheet has been torn down
    pub fn is_alive(&self) -> bool {
        self.state != SheetState::Dismissed
    }

    /// Apply colors and the fixed height, if any. Call once, before `appear`.
    pub fn load<H: SheetHost>(&mut self, host: &mut H) {
        host.set_scrim_color(self.appearance.scrim_color());
        host.set_scrim_alpha(1.0);
        host.set_panel_color(self.appearance.panel_color());

        if let Some(height) = self.appearance.height(host.screen_height()) {
            host.set_panel_height(height);
        }
    }

    /// Hand the host the panel's content
    pub fn embed<H: SheetHost>(&mut self, host: &mut H, content: H::Content) {
        if !self.is_alive() {
            return;
        }
        host.attach_content(content);
    }

    /// The sheet is about to become visible; present on the next UI turn
    pub fn appear<H: SheetHost>(&mut self, host: &mut H) {
        if self.state != SheetState::Presenting || self.resting_offset.is_some() {
            return;
        }
        if !self.present_scheduled {
            self.present_scheduled = true;
            host.schedule(SheetTask::Present);
        }
    }

    /// Called by the host after every layout pass
    pub fn layout_changed<H: SheetHost>(&mut self, host: &mut H) {
        if !self.is_alive() {
            return;
        }
        host.set_panel_top_corner_radius(self.appearance.corner_radius());

        if self.awaiting_layout && !host.panel_frame().is_degenerate() {
            self.awaiting_layout = false;
            self.present_scheduled = true;
            host.schedule(SheetTask::Present);
        }
    }

    /// Run a task previously handed to `SheetHost::schedule`
    pub fn run_task<H: SheetHost>(&mut self, task: SheetTask, host: &mut H) {
        match task {
            SheetTask::Present => {
                self.present_scheduled = false;
                self.present(host);
            }
            SheetTask::Dismiss => self.dismiss(host),
        }
    }

    /// Capture the resting position and slide the panel up from below it
    pub fn present<H: SheetHost>(&mut self, host: &mut H) {
        if self.state != SheetState::Presenting || self.resting_offset.is_some() {
            debug!(state = ?self.state, "present ignored");
            return;
        }

        let frame = host.panel_frame();
        if frame.is_degenerate() {
            debug!("panel not laid out yet, deferring present");
            self.awaiting_layout = true;
            return;
        }

        let resting = frame.center_y();
        self.resting_offset = Some(resting);
        self.panel_height = frame.height;

        host.set_panel_center_y(resting + self.panel_height);
        host.set_scrim_alpha(1.0);
        self.scrim_alpha = 1.0;

        self.current_offset = resting;
        let ticket = self.next_ticket();
        host.animate(ticket, self.appearance.transition_duration(), AnimationTargets::panel(resting));
        self.pending = Some(Pending::Present(ticket));

        info!(resting, height = self.panel_height, "sheet presenting");
    }

    /// Slide the panel off screen and fade the scrim, then tear down
    pub fn dismiss<H: SheetHost>(&mut self, host: &mut H) {
        match self.state {
            SheetState::Dismissing | SheetState::Dismissed => {
                debug!(state = ?self.state, "dismiss already in flight");
                return;
            }
            _ => {}
        }

        let Some(resting) = self.resting_offset else {
            // Never shown, nothing to animate
            info!("sheet dismissed before presenting");
            self.teardown(host);
            return;
        };

        self.state = SheetState::Dismissing;
        self.current_offset = resting + self.panel_height;
        self.scrim_alpha = 0.0;

        let ticket = self.next_ticket();
        host.animate(
            ticket,
            self.appearance.transition_duration(),
            AnimationTargets::both(self.current_offset, 0.0),
        );
        self.pending = Some(Pending::Dismiss(ticket));

        info!("sheet dismissing");
    }

    /// The scrim was tapped (taps on the panel never reach here)
    pub fn scrim_tapped<H: SheetHost>(&mut self, host: &mut H) {
        match self.state {
            SheetState::Dismissing | SheetState::Dismissed => {
                debug!(state = ?self.state, "scrim tap ignored");
            }
            _ => host.schedule(SheetTask::Dismiss),
        }
    }

    /// The host finished an animation this sheet started
    pub fn animation_finished<H: SheetHost>(&mut self, ticket: AnimationTicket, host: &mut H) {
        if ticket.generation != self.generation || !self.is_alive() {
            debug!(?ticket, "stale animation completion");
            return;
        }

        match self.pending {
            Some(Pending::Present(t)) if t == ticket => {
                self.pending = None;
                if self.state == SheetState::Presenting {
                    self.state = SheetState::Idle;
                    info!("sheet presented");
                }
            }
            Some(Pending::Dismiss(t)) if t == ticket => {
                self.pending = None;
                self.teardown(host);
            }
            _ => {}
        }
    }

    fn teardown<H: SheetHost>(&mut self, host: &mut H) {
        self.state = SheetState::Dismissed;
        self.pending = None;
        info!("sheet dismissed");
        host.sheet_dismissed();
    }

    fn next_ticket(&mut self) -> AnimationTicket {
        self.next_seq += 1;
        AnimationTicket {
            generation: self.generation,
            seq: self.next_seq,
        }
    }
}
