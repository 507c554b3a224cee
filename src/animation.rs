//! Tween-based animation driver
//!
//! Hosts without an animation system of their own can use [`TweenAnimator`]
//! to implement `SheetHost::animate`: start a tween per animated property,
//! call [`TweenAnimator::tick`] once per frame, and hand the returned tickets
//! back to the sheet.

use std::time::{Duration, Instant};

use crate::host::{AnimationTargets, AnimationTicket};
use crate::primitives::easing::Easing;
use crate::primitives::lerp;

/// Properties of a sheet that animate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    PanelCenterY,
    ScrimAlpha,
}

/// Rendered values of the animated properties
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimatedProps {
    pub panel_center_y: f64,
    pub scrim_alpha: f64,
}

impl AnimatedProps {
    fn get(&self, property: Property) -> f64 {
        match property {
            Property::PanelCenterY => self.panel_center_y,
            Property::ScrimAlpha => self.scrim_alpha,
        }
    }

    fn set(&mut self, property: Property, value: f64) {
        match property {
            Property::PanelCenterY => self.panel_center_y = value,
            Property::ScrimAlpha => self.scrim_alpha = value,
        }
    }
}

/// A single value moving from `from` to `to`
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    pub property: Property,
    pub from: f64,
    pub to: f64,
    pub start: Instant,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    /// Progress in [0, 1]
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        lerp(self.from, self.to, self.easing.apply(self.progress(now)))
    }
}

#[derive(Debug)]
struct Running {
    ticket: AnimationTicket,
    ends_at: Instant,
    tweens: Vec<Tween>,
}

/// Drives sheet animations frame by frame
#[derive(Debug, Default)]
pub struct TweenAnimator {
    easing: Easing,
    running: Vec<Running>,
}

impl TweenAnimator {
    pub fn new(easing: Easing) -> Self {
        Self { easing, running: Vec::new() }
    }

    pub fn is_animating(&self) -> bool {
        !self.running.is_empty()
    }

    /// Start animating from the currently rendered `props` to `targets`.
    ///
    /// A newer animation takes over any property an older one was moving;
    /// the older one still completes on schedule.
    pub fn start(
        &mut self,
        ticket: AnimationTicket,
        duration: Duration,
        targets: AnimationTargets,
        props: &AnimatedProps,
        now: Instant,
    ) {
        let mut tweens = Vec::with_capacity(2);
        let wanted = [
            (Property::PanelCenterY, targets.panel_center_y),
            (Property::ScrimAlpha, targets.scrim_alpha),
        ];
        for (property, target) in wanted {
            let Some(to) = target else { continue };
            self.interrupt(property);
            tweens.push(Tween {
                property,
                from: props.get(property),
                to,
                start: now,
                duration,
                easing: self.easing,
            });
        }

        self.running.push(Running {
            ticket,
            ends_at: now + duration,
            tweens,
        });
    }

    /// Stop moving `property`, e.g. because the host set it directly
    pub fn interrupt(&mut self, property: Property) {
        for running in &mut self.running {
            running.tweens.retain(|t| t.property != property);
        }
    }

    /// Advance to `now`, writing current values into `props`.
    /// Returns the tickets of animations that settled, in start order.
    pub fn tick(&mut self, now: Instant, props: &mut AnimatedProps) -> Vec<AnimationTicket> {
        for running in &self.running {
            for tween in &running.tweens {
                props.set(tween.property, tween.value_at(now));
            }
        }

        let mut finished = Vec::new();
        self.running.retain(|running| {
            if now >= running.ends_at {
                finished.push(running.ticket);
                false
            } else {
                true
            }
        });
        finished
    }
}
