//! Drag-to-dismiss
//!
//! While a drag is active the panel follows the finger downward (never above
//! its resting position) and the scrim fades in proportion to the distance
//! travelled. On release the sheet either commits to dismissing or springs
//! back to rest.

use tracing::{debug, info};

use super::{Sheet, SheetState};
use crate::host::{AnimationTargets, SheetHost};
use crate::primitives::{clamp, Point};

/// Drag updates for the content panel, in delivery order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// Finger moved. `translation` is the vertical movement since the
    /// previous `Changed` (already consumed from the recognizer).
    Changed { translation: f64, position: Point },
    /// Finger lifted. `velocity` is vertical, positive downward.
    Ended { velocity: f64, position: Point },
}

/// Scrim opacity for a panel centered at `offset`.
///
/// Fully opaque at rest, fading linearly to clear once the panel has moved
/// down by `resting` units.
pub fn scrim_alpha_for(offset: f64, resting: f64) -> f64 {
    if resting <= 0.0 {
        return if offset <= resting { 1.0 } else { 0.0 };
    }
    let ratio = (offset - resting) / resting;
    clamp(1.0 - ratio, 0.0, 1.0)
}

/// Whether a released drag dismisses the sheet.
///
/// Either a downward flick faster than `threshold`, or a panel whose top edge
/// has reached the resting center line. Ties on velocity restore.
pub fn should_dismiss(velocity: f64, panel_top: f64, resting_center: f64, threshold: f64) -> bool {
    velocity > threshold || panel_top >= resting_center
}

impl Sheet {
    /// Feed one drag event from the panel's pan recognizer
    pub fn handle_drag<H: SheetHost>(&mut self, event: DragEvent, host: &mut H) {
        match event {
            DragEvent::Changed { translation, .. } => self.drag_changed(translation, host),
            DragEvent::Ended { velocity, .. } => self.drag_ended(velocity, host),
        }
    }

    fn drag_changed<H: SheetHost>(&mut self, dy: f64, host: &mut H) {
        let resting = match (self.state, self.resting_offset) {
            (SheetState::Idle | SheetState::Dragging, Some(resting)) => resting,
            _ => {
                debug!(state = ?self.state, "drag update ignored");
                return;
            }
        };

        if self.state == SheetState::Idle {
            self.state = SheetState::Dragging;
            debug!("drag started");
        }

        let candidate = self.current_offset + dy;
        if candidate < resting {
            return;
        }

        self.current_offset = candidate;
        host.set_panel_center_y(candidate);

        self.scrim_alpha = scrim_alpha_for(candidate, resting);
        let ticket = self.next_ticket();
        host.animate(
            ticket,
            self.appearance.transition_duration(),
            AnimationTargets::scrim(self.scrim_alpha),
        );
    }

    fn drag_ended<H: SheetHost>(&mut self, velocity: f64, host: &mut H) {
        let resting = match (self.state, self.resting_offset) {
            (SheetState::Dragging, Some(resting)) => resting,
            _ => {
                debug!(state = ?self.state, "drag end ignored");
                return;
            }
        };

        let panel_top = self.current_offset - self.panel_height / 2.0;
        let threshold = self.appearance.dismiss_velocity_threshold();

        if should_dismiss(velocity, panel_top, resting, threshold) {
            info!(velocity, panel_top, "drag committed to dismiss");
            self.dismiss(host);
        } else {
            debug!(velocity, panel_top, "drag released, restoring");
            self.state = SheetState::Idle;
            self.restore(host);
        }
    }

    /// Settle back at rest with the scrim fully visible
    fn restore<H: SheetHost>(&mut self, host: &mut H) {
        let Some(resting) = self.resting_offset else {
            return;
        };
        self.current_offset = resting;
        self.scrim_alpha = 1.0;

        let ticket = self.next_ticket();
        host.animate(
            ticket,
            self.appearance.transition_duration(),
            AnimationTargets::both(resting, 1.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetConfig;
    use crate::primitives::Rect;
    use crate::test_support::RecordingHost;

    /// Panel 500 tall centered at 500 on a 750 screen
    fn frame() -> Rect {
        Rect::new(0.0, 250.0, 360.0, 500.0)
    }

    fn changed(dy: f64) -> DragEvent {
        DragEvent::Changed { translation: dy, position: Point::new(180.0, 400.0) }
    }

    fn ended(velocity: f64) -> DragEvent {
        DragEvent::Ended { velocity, position: Point::new(180.0, 400.0) }
    }

    #[test]
    fn test_alpha_formula() {
        assert_eq!(scrim_alpha_for(500.0, 500.0), 1.0);
        assert_eq!(scrim_alpha_for(750.0, 500.0), 0.5);
        assert_eq!(scrim_alpha_for(1000.0, 500.0), 0.0);
        assert_eq!(scrim_alpha_for(1100.0, 500.0), 0.0);
        assert_eq!(scrim_alpha_for(400.0, 500.0), 1.0);
        // Degenerate resting position never yields NaN
        assert_eq!(scrim_alpha_for(10.0, 0.0), 0.0);
        assert_eq!(scrim_alpha_for(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_dismiss_decision() {
        assert!(should_dismiss(600.0, 260.0, 500.0, 500.0));
        assert!(!should_dismiss(500.0, 260.0, 500.0, 500.0));
        assert!(should_dismiss(0.0, 500.0, 500.0, 500.0));
        assert!(!should_dismiss(0.0, 499.9, 500.0, 500.0));
        assert!(!should_dismiss(-2000.0, 250.0, 500.0, 500.0));
    }

    #[test]
    fn test_drag_follows_finger_and_fades_scrim() {
        let (mut sheet, mut host) = RecordingHost::presented(frame());

        sheet.handle_drag(changed(100.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Dragging);
        assert_eq!(sheet.current_offset(), 600.0);
        assert_eq!(host.frame.center_y(), 600.0);
        assert!((sheet.scrim_alpha() - 0.8).abs() < 1e-9);

        let (_, duration, targets) = *host.animations.last().unwrap();
        assert_eq!(duration, std::time::Duration::from_millis(300));
        assert_eq!(targets.panel_center_y, None);
        assert!((targets.scrim_alpha.unwrap() - 0.8).abs() < 1e-9);

        sheet.handle_drag(changed(150.0), &mut host);
        assert_eq!(sheet.current_offset(), 750.0);
        assert!((sheet.scrim_alpha() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_upward_drag_is_clamped() {
        let (mut sheet, mut host) = RecordingHost::presented(frame());

        for _ in 0..5 {
            sheet.handle_drag(changed(-40.0), &mut host);
            assert!(sheet.current_offset() >= 500.0);
        }
        assert_eq!(sheet.current_offset(), 500.0);
        assert_eq!(sheet.scrim_alpha(), 1.0);

        // Down then further up than the way down: the overshooting update is dropped whole
        sheet.handle_drag(changed(30.0), &mut host);
        sheet.handle_drag(changed(-50.0), &mut host);
        assert_eq!(sheet.current_offset(), 530.0);
        sheet.handle_drag(changed(-30.0), &mut host);
        assert_eq!(sheet.current_offset(), 500.0);
    }

    #[test]
    fn test_alpha_tracks_every_committed_offset() {
        let (mut sheet, mut host) = RecordingHost::presented(frame());
        let deltas = [12.0, -3.0, 250.0, -600.0, 80.0, 400.0, 300.0, -20.0];

        for dy in deltas {
            sheet.handle_drag(changed(dy), &mut host);
            let alpha = sheet.scrim_alpha();
            assert!((0.0..=1.0).contains(&alpha));
            assert!((alpha - scrim_alpha_for(sheet.current_offset(), 500.0)).abs() < 1e-9);
            assert!(sheet.current_offset() >= 500.0);
        }
    }

    #[test]
    fn test_slow_long_drag_dismisses() {
        let (mut sheet, mut host) = RecordingHost::presented(frame());

        sheet.handle_drag(changed(600.0), &mut host);
        assert_eq!(sheet.current_offset(), 1100.0);
        assert_eq!(sheet.scrim_alpha(), 0.0);

        sheet.handle_drag(ended(0.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Dismissing);

        host.finish_animations(&mut sheet);
        assert_eq!(sheet.state(), SheetState::Dismissed);
        assert_eq!(host.dismissed, 1);
    }

    #[test]
    fn test_top_edge_at_resting_center_dismisses() {
        let (mut sheet, mut host) = RecordingHost::presented(frame());

        // Top edge = 750 - 250 = 500, exactly the resting center
        sheet.handle_drag(changed(250.0), &mut host);
        sheet.handle_drag(ended(0.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Dismissing);
    }

    #[test]
    fn test_fast_flick_dismisses() {
        let (mut sheet, mut host) = RecordingHost::presented(frame());

        sheet.handle_drag(changed(10.0), &mut host);
        sheet.handle_drag(ended(600.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Dismissing);

        host.finish_animations(&mut sheet);
        assert_eq!(host.dismissed, 1);
        assert_eq!(host.frame.center_y(), 1000.0);
        assert_eq!(host.scrim_alpha, 0.0);
    }

    #[test]
    fn test_slow_short_drag_restores() {
        let (mut sheet, mut host) = RecordingHost::presented(frame());

        sheet.handle_drag(changed(10.0), &mut host);
        sheet.handle_drag(ended(100.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Idle);
        // Restore starts right away, nothing is left queued
        assert_eq!(host.run_tasks(&mut sheet), 0);
        let (_, _, targets) = *host.animations.last().unwrap();
        assert_eq!(targets, AnimationTargets::both(500.0, 1.0));

        host.finish_animations(&mut sheet);
        assert_eq!(sheet.current_offset(), 500.0);
        assert_eq!(host.frame.center_y(), 500.0);
        assert_eq!(sheet.scrim_alpha(), 1.0);
        assert_eq!(host.scrim_alpha, 1.0);
        assert_eq!(host.dismissed, 0);
    }

    #[test]
    fn test_threshold_velocity_restores() {
        let (mut sheet, mut host) = RecordingHost::presented(frame());

        sheet.handle_drag(changed(10.0), &mut host);
        sheet.handle_drag(ended(500.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Idle);
    }

    #[test]
    fn test_zero_drag_round_trips() {
        let (mut sheet, mut host) = RecordingHost::presented(frame());

        sheet.handle_drag(changed(0.0), &mut host);
        sheet.handle_drag(ended(0.0), &mut host);
        host.finish_animations(&mut sheet);

        assert_eq!(sheet.state(), SheetState::Idle);
        assert_eq!(sheet.current_offset(), 500.0);
        assert_eq!(sheet.scrim_alpha(), 1.0);
    }

    #[test]
    fn test_custom_threshold() {
        let config = SheetConfig { dismiss_velocity_threshold: 1200.0, ..SheetConfig::default() };
        let (mut sheet, mut host) = RecordingHost::presented_with(config, frame());

        sheet.handle_drag(changed(10.0), &mut host);
        sheet.handle_drag(ended(900.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Idle);
    }

    #[test]
    fn test_out_of_sequence_events_ignored() {
        let (mut sheet, mut host) = RecordingHost::presented(frame());
        let animations = host.animations.len();

        // End without a preceding change
        sheet.handle_drag(ended(5000.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Idle);
        assert_eq!(host.animations.len(), animations);

        // Updates after the dismiss committed
        sheet.handle_drag(changed(10.0), &mut host);
        sheet.handle_drag(ended(900.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Dismissing);
        let offset = sheet.current_offset();

        sheet.handle_drag(changed(50.0), &mut host);
        sheet.handle_drag(ended(900.0), &mut host);
        assert_eq!(sheet.current_offset(), offset);

        host.finish_animations(&mut sheet);
        sheet.handle_drag(changed(50.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Dismissed);
        assert_eq!(host.dismissed, 1);
    }

    #[test]
    fn test_drag_ignored_while_presenting() {
        let mut host = RecordingHost::new(frame());
        let mut sheet = Sheet::new(SheetConfig::default());
        sheet.appear(&mut host);
        host.run_tasks(&mut sheet);

        sheet.handle_drag(changed(100.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Presenting);
        assert_eq!(sheet.current_offset(), 500.0);
    }

    #[test]
    fn test_drag_again_after_restore() {
        let (mut sheet, mut host) = RecordingHost::presented(frame());

        sheet.handle_drag(changed(40.0), &mut host);
        sheet.handle_drag(ended(0.0), &mut host);
        host.finish_animations(&mut sheet);

        sheet.handle_drag(changed(300.0), &mut host);
        assert_eq!(sheet.current_offset(), 800.0);
        sheet.handle_drag(ended(0.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Dismissing);
    }
}
