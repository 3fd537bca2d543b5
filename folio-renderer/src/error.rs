//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering or exporting a layout.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The SVG intermediate could not be produced or parsed.
    #[error("SVG error: {0}")]
    Svg(String),

    /// Rasterization failed.
    #[error("Rasterization failed: {0}")]
    Raster(String),

    /// Encoding the output format failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Export settings are out of range.
    #[error("Invalid export configuration: {0}")]
    InvalidConfig(String),
}
