//! Input handling - touch samples to sheet gestures
//!
//! This module provides:
//! - Single-finger pan tracking on the content panel
//! - Tap recognition on the scrim
//! - Routing of touches to the panel or the scrim

mod gestures;

pub use gestures::*;
