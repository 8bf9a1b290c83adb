//! Non-destructive continuous adjustments.
//!
//! Slider-driven parameters (blur, brightness, contrast) never edit
//! history. Every preview is recomputed from the anchor snapshot with
//! the same fixed order (blur, then brightness, then contrast), so the
//! preview depends only on the final parameter values and never on the
//! order or number of slider moves that produced them.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::history::HistoryStore;
use crate::types::{ConfigError, RgbaImage, Snapshot};

/// Largest accepted blur kernel.
pub const MAX_BLUR_KERNEL: u32 = 51;

/// Accepted brightness offsets.
pub const BRIGHTNESS_RANGE: RangeInclusive<i32> = -100..=100;

/// Accepted contrast offsets.
pub const CONTRAST_RANGE: RangeInclusive<i32> = -100..=100;

/// A continuous adjustment control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    /// Gaussian blur kernel size (odd, `1` = no blur).
    BlurRadius,
    /// Offset added to the HSV value channel.
    Brightness,
    /// Contrast offset, mapped to a channel gain.
    Contrast,
}

impl Parameter {
    /// Every parameter, in application order.
    pub const ALL: [Self; 3] = [Self::BlurRadius, Self::Brightness, Self::Contrast];

    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BlurRadius => "blur_radius",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
        }
    }
}

impl FromStr for Parameter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blur" | "blur_radius" | "blur-radius" => Ok(Self::BlurRadius),
            "brightness" => Ok(Self::Brightness),
            "contrast" => Ok(Self::Contrast),
            _ => Err(ConfigError::UnknownParameter(s.to_string())),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current values of every continuous parameter.
///
/// Values stored here are always normalized (see
/// [`Adjustments::set`]); the defaults are the neutral values for which
/// the corresponding primitive is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    /// Odd blur kernel size, `1..=`[`MAX_BLUR_KERNEL`].
    pub blur_radius: u32,
    /// Brightness offset in [`BRIGHTNESS_RANGE`].
    pub brightness: i32,
    /// Contrast offset in [`CONTRAST_RANGE`].
    pub contrast: i32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            blur_radius: 1,
            brightness: 0,
            contrast: 0,
        }
    }
}

impl Adjustments {
    /// Whether every parameter is at its neutral default.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Current value of `parameter`.
    #[must_use]
    pub fn get(&self, parameter: Parameter) -> i64 {
        match parameter {
            Parameter::BlurRadius => i64::from(self.blur_radius),
            Parameter::Brightness => i64::from(self.brightness),
            Parameter::Contrast => i64::from(self.contrast),
        }
    }

    /// Store a normalized `value` for `parameter` and return it.
    ///
    /// Brightness and contrast are clamped into their ranges. Blur
    /// below 1 means no blur, even kernels are promoted to the next odd
    /// size, and the result is capped at [`MAX_BLUR_KERNEL`].
    pub fn set(&mut self, parameter: Parameter, value: i64) -> i64 {
        match parameter {
            Parameter::BlurRadius => {
                let kernel = crate::blur::normalize_kernel(value).min(MAX_BLUR_KERNEL);
                self.blur_radius = kernel;
            }
            Parameter::Brightness => self.brightness = clamp_to(value, &BRIGHTNESS_RANGE),
            Parameter::Contrast => self.contrast = clamp_to(value, &CONTRAST_RANGE),
        }
        self.get(parameter)
    }

    /// Apply the non-neutral adjustments to `image` in the fixed order
    /// blur, brightness, contrast.
    #[must_use = "returns the adjusted image"]
    pub fn apply(&self, image: &RgbaImage) -> RgbaImage {
        let mut out = if self.blur_radius > 1 {
            crate::blur::blur(image, self.blur_radius)
        } else {
            image.clone()
        };
        if self.brightness != 0 {
            out = crate::tone::adjust_brightness(&out, self.brightness);
        }
        if self.contrast != 0 {
            out = crate::tone::adjust_contrast(&out, self.contrast);
        }
        out
    }
}

fn clamp_to(value: i64, range: &RangeInclusive<i32>) -> i32 {
    let clamped = value.clamp(i64::from(*range.start()), i64::from(*range.end()));
    i32::try_from(clamped).unwrap_or(0)
}

/// The most recent rendering and the values it was rendered with.
#[derive(Debug, Clone)]
struct Preview {
    adjustments: Adjustments,
    snapshot: Snapshot,
}

/// Holds slider values and renders previews from an anchor snapshot.
///
/// The anchor is a read-only handle to a snapshot owned by the
/// [`HistoryStore`]; the pipeline never commits on its own except
/// through [`commit_and_reset`](Self::commit_and_reset).
#[derive(Debug, Clone, Default)]
pub struct AdjustmentPipeline {
    anchor: Option<Snapshot>,
    adjustments: Adjustments,
    preview: Option<Preview>,
}

impl AdjustmentPipeline {
    /// A pipeline with default parameters anchored at `anchor`.
    #[must_use]
    pub fn anchored_at(anchor: Option<Snapshot>) -> Self {
        Self {
            anchor,
            ..Self::default()
        }
    }

    /// The snapshot previews are computed from.
    #[must_use]
    pub const fn anchor(&self) -> Option<&Snapshot> {
        self.anchor.as_ref()
    }

    /// Current parameter values.
    #[must_use]
    pub const fn parameters(&self) -> &Adjustments {
        &self.adjustments
    }

    /// The most recently computed preview, if any.
    ///
    /// This can lag behind [`parameters`](Self::parameters) until the
    /// next [`recompute`](Self::recompute).
    #[must_use]
    pub fn preview(&self) -> Option<&Snapshot> {
        self.preview.as_ref().map(|p| &p.snapshot)
    }

    /// Whether the preview reflects the current parameter values.
    #[must_use]
    pub fn is_preview_current(&self) -> bool {
        self.preview
            .as_ref()
            .is_some_and(|p| p.adjustments == self.adjustments)
    }

    /// Set `parameter` and return the normalized value actually stored.
    pub fn set_parameter(&mut self, parameter: Parameter, value: i64) -> i64 {
        let effective = self.adjustments.set(parameter, value);
        if effective != value {
            debug!(%parameter, requested = value, effective, "adjusted parameter value");
        }
        effective
    }

    /// Set a parameter by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownParameter`] for an unrecognized
    /// name; parameters are left unchanged.
    pub fn set_named(&mut self, name: &str, value: i64) -> Result<i64, ConfigError> {
        let parameter = name.parse::<Parameter>().inspect_err(|e| warn!(%e, "rejected parameter"))?;
        Ok(self.set_parameter(parameter, value))
    }

    /// Render a preview from the anchor with the current parameters.
    ///
    /// Without an anchor this is a no-op and leaves the preview unset.
    pub fn recompute(&mut self) -> Option<&Snapshot> {
        let anchor = self.anchor.as_ref()?;
        let snapshot = if self.adjustments.is_neutral() {
            anchor.clone()
        } else {
            Snapshot::new(self.adjustments.apply(anchor.as_image()))
        };
        debug!(adjustments = ?self.adjustments, "recomputed preview");
        self.preview = Some(Preview {
            adjustments: self.adjustments,
            snapshot,
        });
        self.preview()
    }

    /// Restore default parameters and drop the preview. The anchor is
    /// kept.
    pub fn reset_parameters(&mut self) {
        self.adjustments = Adjustments::default();
        self.preview = None;
    }

    /// Restore default parameters, drop the preview, and repoint the
    /// anchor.
    pub fn reset(&mut self, anchor: Option<Snapshot>) {
        self.reset_parameters();
        self.anchor = anchor;
    }

    /// Commit `snapshot` to `store`, then reset to defaults anchored at
    /// the store's new current snapshot.
    pub fn commit_and_reset(&mut self, store: &mut HistoryStore, snapshot: Snapshot) {
        store.commit(snapshot);
        self.reset(store.current().cloned());
    }

    /// Commit the preview for the current parameters and reset.
    ///
    /// Returns `false` without touching `store` when there is no anchor
    /// or every parameter is neutral (the result would equal the anchor).
    pub fn commit_preview(&mut self, store: &mut HistoryStore) -> bool {
        if self.adjustments.is_neutral() || self.anchor.is_none() {
            return false;
        }
        if !self.is_preview_current() {
            self.recompute();
        }
        let Some(preview) = self.preview.take() else {
            return false;
        };
        self.commit_and_reset(store, preview.snapshot);
        true
    }
}
