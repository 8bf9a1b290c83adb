//! retouch-core: Editing-state model for an interactive raster editor (sans-IO).
//!
//! Two kinds of edits are kept apart:
//!
//! - **Discrete actions** (grayscale, edge detection, rotate, flip,
//!   resize, sharpen, "apply") run once on the current image and commit
//!   a new [`Snapshot`] to a bounded, linear [`HistoryStore`].
//! - **Continuous adjustments** (blur, brightness, contrast) only render
//!   previews. The [`AdjustmentPipeline`] recomputes every preview from
//!   its anchor snapshot, so slider moves never compound.
//!
//! [`EditController`] owns both and is the single entry point for a UI.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! RGBA buffers. Loading and saving files lives in `retouch-io`.

pub mod adjust;
pub mod blur;
pub mod config;
pub mod controller;
pub mod edge;
pub mod grayscale;
pub mod history;
pub mod tone;
pub mod transform;
pub mod types;

pub use adjust::{AdjustmentPipeline, Adjustments, Parameter};
pub use config::EditorConfig;
pub use controller::{DiscreteAction, EditController};
pub use history::HistoryStore;
pub use transform::{FlipAxis, Rotation};
pub use types::{
    ConfigError, Dimensions, DomainError, EditError, ImageInfo, RgbaImage, Snapshot,
};
