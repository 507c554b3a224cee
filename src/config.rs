//! Per-sheet configuration
//!
//! Every knob has a default, so an empty TOML file (or no file at all) yields
//! the stock sheet. Sheet variants that only tweak a couple of knobs implement
//! [`SheetAppearance`] and let the rest fall through to the defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::primitives::{colors, Color};

pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(300);
pub const DEFAULT_DISMISS_VELOCITY_THRESHOLD: f64 = 500.0;
pub const DEFAULT_CORNER_RADIUS: f64 = 16.0;

/// Knobs a concrete sheet can customize
pub trait SheetAppearance {
    /// Present / dismiss / restore transition duration
    fn transition_duration(&self) -> Duration {
        DEFAULT_TRANSITION_DURATION
    }

    /// Downward release velocity (units/s) above which a drag dismisses
    fn dismiss_velocity_threshold(&self) -> f64 {
        DEFAULT_DISMISS_VELOCITY_THRESHOLD
    }

    /// Radius of the panel's top-left and top-right corners
    fn corner_radius(&self) -> f64 {
        DEFAULT_CORNER_RADIUS
    }

    /// Fixed panel height for a screen of the given height.
    /// `None` leaves sizing to the host's intrinsic layout.
    fn height(&self, _screen_height: f64) -> Option<f64> {
        None
    }

    fn scrim_color(&self) -> Color {
        colors::SCRIM
    }

    fn panel_color(&self) -> Color {
        colors::PANEL
    }
}

/// Sheet configuration, loadable from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Transition duration in seconds
    pub transition_duration: f64,
    /// Dismiss velocity threshold in units per second
    pub dismiss_velocity_threshold: f64,
    pub corner_radius: f64,
    /// Fixed panel height; wins over `height_fraction`
    pub height: Option<f64>,
    /// Panel height as a fraction of the screen height (0.5 = half screen)
    pub height_fraction: Option<f64>,
    pub scrim_color: Color,
    pub panel_color: Color,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            transition_duration: DEFAULT_TRANSITION_DURATION.as_secs_f64(),
            dismiss_velocity_threshold: DEFAULT_DISMISS_VELOCITY_THRESHOLD,
            corner_radius: DEFAULT_CORNER_RADIUS,
            height: None,
            height_fraction: None,
            scrim_color: colors::SCRIM,
            panel_color: colors::PANEL,
        }
    }
}

impl SheetConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents, path)?;
        tracing::info!("Loaded sheet config from {:?}", path);
        Ok(config)
    }

    /// Load config from file, or return default if missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default sheet config: {}", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.transition_duration.is_finite() || self.transition_duration < 0.0 {
            return Err(Error::InvalidConfig {
                field: "transition_duration",
                reason: format!("must be a non-negative number of seconds, got {}", self.transition_duration),
            });
        }
        if !self.dismiss_velocity_threshold.is_finite() || self.dismiss_velocity_threshold < 0.0 {
            return Err(Error::InvalidConfig {
                field: "dismiss_velocity_threshold",
                reason: format!("must be a non-negative speed, got {}", self.dismiss_velocity_threshold),
            });
        }
        if !(self.corner_radius >= 0.0) {
            return Err(Error::InvalidConfig {
                field: "corner_radius",
                reason: format!("must not be negative, got {}", self.corner_radius),
            });
        }
        if let Some(height) = self.height {
            if !(height > 0.0) {
                return Err(Error::InvalidConfig {
                    field: "height",
                    reason: format!("must be positive, got {}", height),
                });
            }
        }
        if let Some(fraction) = self.height_fraction {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(Error::InvalidConfig {
                    field: "height_fraction",
                    reason: format!("must be in (0, 1], got {}", fraction),
                });
            }
        }
        Ok(())
    }
}

impl SheetAppearance for SheetConfig {
    fn transition_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.transition_duration).unwrap_or(DEFAULT_TRANSITION_DURATION)
    }

    fn dismiss_velocity_threshold(&self) -> f64 {
        self.dismiss_velocity_threshold
    }

    fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    fn height(&self, screen_height: f64) -> Option<f64> {
        self.height.or_else(|| self.height_fraction.map(|f| screen_height * f))
    }

    fn scrim_color(&self) -> Color {
        self.scrim_color
    }

    fn panel_color(&self) -> Color {
        self.panel_color
    }
}

/// Sheet that always takes the bottom half of the screen
#[derive(Debug, Clone, Default)]
pub struct HalfScreenSheet {
    pub base: SheetConfig,
}

impl SheetAppearance for HalfScreenSheet {
    fn transition_duration(&self) -> Duration {
        self.base.transition_duration()
    }

    fn dismiss_velocity_threshold(&self) -> f64 {
        self.base.dismiss_velocity_threshold
    }

    fn corner_radius(&self) -> f64 {
        self.base.corner_radius
    }

    fn height(&self, screen_height: f64) -> Option<f64> {
        Some(screen_height / 2.0)
    }

    fn scrim_color(&self) -> Color {
        self.base.scrim_color
    }

    fn panel_color(&self) -> Color {
        self.base.panel_color
    }
}

/// Sheet with square corners (list-style content)
#[derive(Debug, Clone, Default)]
pub struct FlatSheet {
    pub base: SheetConfig,
}

impl SheetAppearance for FlatSheet {
    fn transition_duration(&self) -> Duration {
        self.base.transition_duration()
    }

    fn dismiss_velocity_threshold(&self) -> f64 {
        self.base.dismiss_velocity_threshold
    }

    fn corner_radius(&self) -> f64 {
        0.0
    }

    fn height(&self, screen_height: f64) -> Option<f64> {
        self.base.height(screen_height)
    }

    fn scrim_color(&self) -> Color {
        self.base.scrim_color
    }

    fn panel_color(&self) -> Color {
        self.base.panel_color
    }
}
