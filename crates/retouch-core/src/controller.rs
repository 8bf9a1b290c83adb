//! Coordination between user actions, the history, and the adjustment
//! pipeline.
//!
//! Continuous actions (slider moves) only touch the
//! [`AdjustmentPipeline`]. Discrete actions run a primitive on the
//! current snapshot and commit the result, which also resets the
//! sliders and re-anchors the pipeline. Undo, redo, and reset move
//! through the [`HistoryStore`] and re-anchor on success.

use std::fmt;

use tracing::{info, warn};

use crate::adjust::{AdjustmentPipeline, Adjustments, Parameter};
use crate::config::EditorConfig;
use crate::history::HistoryStore;
use crate::transform::{FlipAxis, Rotation};
use crate::types::{EditError, ImageInfo, Snapshot};

/// A one-shot edit that commits a new snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscreteAction {
    /// Convert to grayscale.
    Grayscale,
    /// Replace the image with its Canny edge map. `None` uses the
    /// configured thresholds.
    EdgeDetect {
        /// `(low, high)` hysteresis thresholds.
        thresholds: Option<(f32, f32)>,
    },
    /// Rotate clockwise.
    Rotate(Rotation),
    /// Mirror along an axis.
    Flip(FlipAxis),
    /// Scale by a percentage of the current size.
    Resize {
        /// Scale factor in percent; must be positive and finite.
        percent: f64,
    },
    /// Apply the 3x3 sharpening kernel.
    Sharpen,
    /// Commit the current slider values.
    ApplyAdjustments,
}

impl fmt::Display for DiscreteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grayscale => f.write_str("grayscale"),
            Self::EdgeDetect { thresholds: None } => f.write_str("edge detect"),
            Self::EdgeDetect {
                thresholds: Some((low, high)),
            } => write!(f, "edge detect ({low}, {high})"),
            Self::Rotate(rotation) => write!(f, "rotate {rotation}"),
            Self::Flip(axis) => write!(f, "flip {axis}"),
            Self::Resize { percent } => write!(f, "resize {percent}%"),
            Self::Sharpen => f.write_str("sharpen"),
            Self::ApplyAdjustments => f.write_str("apply adjustments"),
        }
    }
}

/// Owns the editing state for one image.
///
/// Every method is synchronous and every mutation is atomic: a method
/// that returns an error leaves history and sliders as they were.
#[derive(Debug, Clone)]
pub struct EditController {
    config: EditorConfig,
    history: HistoryStore,
    pipeline: AdjustmentPipeline,
}

impl EditController {
    /// Build a controller with nothing loaded.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Config`] if `config` fails
    /// [`EditorConfig::validate`].
    pub fn new(config: EditorConfig) -> Result<Self, EditError> {
        config.validate()?;
        let history = HistoryStore::new(config.max_history)?;
        Ok(Self {
            config,
            history,
            pipeline: AdjustmentPipeline::default(),
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Read-only view of the history.
    #[must_use]
    pub const fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Current slider values.
    #[must_use]
    pub const fn adjustments(&self) -> &Adjustments {
        self.pipeline.parameters()
    }

    /// Whether an image is loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        !self.history.is_empty()
    }

    /// Replace everything with a freshly loaded image. The image
    /// becomes the only snapshot in history.
    pub fn open(&mut self, snapshot: Snapshot) {
        self.history.clear();
        info!(dimensions = %snapshot.dimensions(), "opened image");
        self.pipeline.commit_and_reset(&mut self.history, snapshot);
    }

    /// Drop the loaded image and all history.
    pub fn close(&mut self) {
        self.history.clear();
        self.pipeline.reset(None);
        info!("closed image");
    }

    /// Move a slider and render a new preview. Returns the stored
    /// (normalized) value.
    pub fn set_adjustment(&mut self, parameter: Parameter, value: i64) -> i64 {
        let effective = self.pipeline.set_parameter(parameter, value);
        self.pipeline.recompute();
        effective
    }

    /// Move a slider by name.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Config`] for an unknown parameter name.
    pub fn set_adjustment_named(&mut self, name: &str, value: i64) -> Result<i64, EditError> {
        let parameter = name.parse::<Parameter>().inspect_err(|e| warn!(%e, "rejected parameter"))?;
        Ok(self.set_adjustment(parameter, value))
    }

    /// Return every slider to its default and drop the preview.
    pub fn reset_adjustments(&mut self) {
        self.pipeline.reset_parameters();
        info!("adjustments reset");
    }

    /// Run `action` on the current snapshot and commit the result.
    ///
    /// Returns the new current snapshot, or `Ok(None)` when nothing is
    /// loaded or when [`DiscreteAction::ApplyAdjustments`] is requested
    /// with every slider at its default. Pending slider values are
    /// discarded by every action except `ApplyAdjustments`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Domain`] when a resize percentage is out of
    /// range. History and sliders are untouched in that case.
    pub fn apply(&mut self, action: DiscreteAction) -> Result<Option<&Snapshot>, EditError> {
        let Some(current) = self.history.current() else {
            info!(%action, "nothing loaded");
            return Ok(None);
        };
        let image = current.as_image();

        let result = match action {
            DiscreteAction::ApplyAdjustments => return Ok(self.apply_adjustments()),
            DiscreteAction::Grayscale => crate::grayscale::grayscale(image),
            DiscreteAction::EdgeDetect { thresholds } => {
                let (low, high) =
                    thresholds.unwrap_or((self.config.edge_low, self.config.edge_high));
                crate::edge::edge_detect(image, low, high)
            }
            DiscreteAction::Rotate(rotation) => crate::transform::rotate(image, rotation),
            DiscreteAction::Flip(axis) => crate::transform::flip(image, axis),
            DiscreteAction::Resize { percent } => crate::transform::resize(image, percent)
                .inspect_err(|e| warn!(%e, "rejected resize"))?,
            DiscreteAction::Sharpen => crate::transform::sharpen(image),
        };

        self.pipeline
            .commit_and_reset(&mut self.history, Snapshot::new(result));
        info!(%action, cursor = ?self.history.cursor(), "committed");
        Ok(self.history.current())
    }

    /// Commit the preview for the current slider values.
    ///
    /// `None` when nothing is loaded or every slider is at its default;
    /// nothing is committed in either case.
    pub fn apply_adjustments(&mut self) -> Option<&Snapshot> {
        let adjustments = *self.pipeline.parameters();
        if !self.pipeline.commit_preview(&mut self.history) {
            info!("no adjustments to apply");
            return None;
        }
        info!(?adjustments, cursor = ?self.history.cursor(), "applied adjustments");
        self.history.current()
    }

    /// Step back one snapshot. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        self.history.undo()?;
        self.pipeline.reset(self.history.current().cloned());
        info!(cursor = ?self.history.cursor(), "undo");
        self.history.current()
    }

    /// Step forward one snapshot. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        self.history.redo()?;
        self.pipeline.reset(self.history.current().cloned());
        info!(cursor = ?self.history.cursor(), "redo");
        self.history.current()
    }

    /// Commit a copy of the oldest retained snapshot as the new current
    /// state. The reset can itself be undone. `None` when nothing is
    /// loaded.
    pub fn reset_to_original(&mut self) -> Option<&Snapshot> {
        let original = Snapshot::new(self.history.first()?.to_image());
        self.pipeline.commit_and_reset(&mut self.history, original);
        info!(cursor = ?self.history.cursor(), "reset to original");
        self.history.current()
    }

    /// The committed current snapshot.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.history.current()
    }

    /// The pending preview when sliders are moved, else
    /// [`current`](Self::current).
    #[must_use]
    pub fn displayed(&self) -> Option<&Snapshot> {
        self.pipeline.preview().or_else(|| self.history.current())
    }

    /// Whether there are uncommitted slider changes.
    #[must_use]
    pub fn has_pending_adjustments(&self) -> bool {
        !self.pipeline.parameters().is_neutral()
    }

    /// See [`HistoryStore::can_undo`].
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// See [`HistoryStore::can_redo`].
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Shape of the current snapshot.
    #[must_use]
    pub fn info(&self) -> Option<ImageInfo> {
        self.history.current().map(Snapshot::info)
    }
}
