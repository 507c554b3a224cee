//! Draggable modal bottom sheet
//!
//! The sheet slides up over a dimming scrim, follows the finger when dragged
//! down, and either snaps back or slides away on release depending on how
//! fast and how far it was dragged. A scrim tap dismisses it too.
//!
//! Drawing, layout and timing belong to the host, which implements
//! [`SheetHost`] and feeds the sheet input, animation completions and
//! deferred tasks on its UI thread.

pub mod animation;
pub mod config;
pub mod error;
pub mod host;
pub mod input;
pub mod primitives;
pub mod sheet;

#[cfg(test)]
mod test_support;

pub use config::{FlatSheet, HalfScreenSheet, SheetAppearance, SheetConfig};
pub use error::{Error, Result};
pub use host::{AnimationTargets, AnimationTicket, SheetHost, SheetTask};
pub use input::{hit_region, HitRegion, SheetGesture, SheetGestureRecognizer};
pub use sheet::{scrim_alpha_for, should_dismiss, DragEvent, Sheet, SheetState};
