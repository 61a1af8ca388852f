//! Error types for the `habitat-world` crate.

/// Errors that can occur while building a world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The world rectangle has a non-positive or non-finite side.
    #[error("invalid world dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
}
