use thiserror::Error;

/// Errors surfaced by the viewer.
///
/// Geometry and gesture handling never fail; bad numeric input is wrapped or
/// clamped instead. Only configuration that cannot be normalized and terminal
/// I/O end up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid zoom bounds [{min}, {max}]: expected finite values with 0 < min <= max")]
    InvalidZoomBounds { min: f64, max: f64 },

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
