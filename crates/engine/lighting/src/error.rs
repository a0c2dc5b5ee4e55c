//! Error types for the lighting crate

use thiserror::Error;

/// Result type alias for lighting operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building lighting configuration
///
/// Ticks themselves never fail: degenerate input data resolves to defined
/// fallback values. Only configuration construction can be rejected.
#[derive(Debug, Error)]
pub enum Error {
    /// A fixture state record is missing required fields
    #[error("Invalid state for fixture {fixture_id}: {reason}")]
    InvalidState {
        /// Fixture the record belongs to
        fixture_id: String,
        /// What is wrong with the record
        reason: String,
    },

    /// The same fixture id appears twice in the fixture list
    #[error("Duplicate fixture ID: {0}")]
    DuplicateFixture(String),

    /// A tuning option is outside its valid range
    #[error("Invalid option {name}: {reason}")]
    InvalidOption {
        /// Option name as it appears in configuration
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}
