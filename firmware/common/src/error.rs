//! Error types.
//!
//! Only [`SurfaceError`] is fatal: without a surface there is nothing to
//! render into. Record and asset errors are recovered where they occur and
//! show up in [`RenderMetrics`](crate::metrics::RenderMetrics) and the log.

use thiserror::Error;

/// A departure or disruption record that cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("departure lies in the past ({0} min)")]
    NegativeMinutes(i64),
}

/// A display asset that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("icon strip is empty")]
    Empty,
    #[error("frame width must be non-zero")]
    ZeroFrameWidth,
    #[error("icon strip length {len} is not a whole number of {frame_width}x{frame_width} RGB565 frames")]
    Misaligned { len: usize, frame_width: u32 },
    #[error("frame width {frame_width} is too large for an RGB565 frame")]
    TooLarge { frame_width: u32 },
}

/// The presentation surface failed.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to draw to display: {0}")]
    Draw(String),
    #[error("failed to present frame: {0}")]
    Present(String),
}

impl SurfaceError {
    /// Wrap a `DrawTarget` error, which is only guaranteed to be `Debug`.
    pub fn draw(err: impl core::fmt::Debug) -> Self { Self::Draw(format!("{err:?}")) }
}
