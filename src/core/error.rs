use thiserror::Error;

/// Failures the showroom core can report.
///
/// None of these are fatal: asset failures keep the loading overlay up,
/// audio graph failures are retried with a fresh media element, and
/// degenerate inputs are rejected before they reach the simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShowroomError {
    #[error("failed to load {asset}: {reason}")]
    AssetLoad { asset: String, reason: String },
    #[error("audio analysis graph unavailable: {0}")]
    AudioGraph(String),
    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),
}

impl ShowroomError {
    pub fn asset(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AssetLoad {
            asset: asset.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller should rebuild its media element and try again.
    pub fn needs_fresh_source(&self) -> bool {
        matches!(self, Self::AudioGraph(_))
    }
}

pub type Result<T> = std::result::Result<T, ShowroomError>;
