//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::adjust::MAX_BLUR_KERNEL;
use crate::edge::{DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD, MIN_THRESHOLD};
use crate::history::DEFAULT_MAX_HISTORY;
use crate::types::ConfigError;

/// Default kernel for a `blur` command given without a value.
pub const DEFAULT_BLUR_KERNEL: u32 = 5;

/// Configuration for an [`EditController`](crate::EditController).
///
/// Every field has a default, so a partial JSON document such as
/// `{"max_history": 50}` deserializes to a complete config.
///
/// # Invariants
///
/// Checked by [`validate`](Self::validate) when a controller is built:
/// `max_history >= 1`, both edge thresholds finite and at least
/// [`MIN_THRESHOLD`], `edge_low <= edge_high`, and `blur_kernel` odd in
/// `1..=`[`MAX_BLUR_KERNEL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Number of snapshots the history retains.
    pub max_history: usize,

    /// Canny low hysteresis threshold used by edge detection.
    pub edge_low: f32,

    /// Canny high hysteresis threshold used by edge detection.
    pub edge_high: f32,

    /// Blur kernel applied when the shell's `blur` command has no value.
    pub blur_kernel: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            edge_low: DEFAULT_LOW_THRESHOLD,
            edge_high: DEFAULT_HIGH_THRESHOLD,
            blur_kernel: DEFAULT_BLUR_KERNEL,
        }
    }
}

impl EditorConfig {
    /// Check the config invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroHistoryCapacity`] for `max_history == 0`
    /// and [`ConfigError::Invalid`] for any other violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if !self.edge_low.is_finite() || !self.edge_high.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "edge thresholds must be finite, got {} and {}",
                self.edge_low, self.edge_high,
            )));
        }
        if self.edge_low < MIN_THRESHOLD || self.edge_high < MIN_THRESHOLD {
            return Err(ConfigError::Invalid(format!(
                "edge thresholds must be at least {MIN_THRESHOLD}, got {} and {}",
                self.edge_low, self.edge_high,
            )));
        }
        if self.edge_low > self.edge_high {
            return Err(ConfigError::Invalid(format!(
                "edge_low ({}) must not exceed edge_high ({})",
                self.edge_low, self.edge_high,
            )));
        }
        if self.blur_kernel % 2 == 0 || self.blur_kernel > MAX_BLUR_KERNEL {
            return Err(ConfigError::Invalid(format!(
                "blur_kernel must be odd and at most {MAX_BLUR_KERNEL}, got {}",
                self.blur_kernel,
            )));
        }
        Ok(())
    }
}
