//! Error types for blossom_matching

use thiserror::Error;

/// Result type alias using the crate's error
pub type Result<T> = std::result::Result<T, MatchingError>;

/// Errors detected while validating the input edge list.
///
/// All of these are raised before any algorithmic work starts. Once an edge list
/// has been accepted the matching engine always terminates with a valid matching.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchingError {
    /// The edge at `index` is not a `(vertex, vertex, weight)` triple
    #[error("Malformed edge at index {index}: {reason}")]
    MalformedInput {
        /// Position of the offending edge in the input
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// A vertex id is negative, non-integral or too large
    #[error("Invalid vertex {value} in edge at index {index}")]
    InvalidVertex {
        /// Position of the offending edge in the input
        index: usize,
        /// The rejected value, as given
        value: f64,
    },

    /// A weight is non-numeric or not finite
    #[error("Invalid weight {value} in edge at index {index}")]
    InvalidWeight {
        /// Position of the offending edge in the input
        index: usize,
        /// The rejected value, or NaN if it could not be converted at all
        value: f64,
    },
}

/// A broken optimality certificate.
///
/// Only produced when the final dual solution is checked; any of these means
/// the engine itself is defective, not that the input was bad.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimalityViolation {
    #[error("vertex {vertex} has negative dual {dual}")]
    NegativeVertexDual { vertex: usize, dual: f64 },

    #[error("blossom {blossom} has negative dual {dual}")]
    NegativeBlossomDual { blossom: usize, dual: f64 },

    #[error("edge {edge} has negative slack {slack}")]
    NegativeSlack { edge: usize, slack: f64 },

    #[error("matched edge {edge} has non-zero slack {slack}")]
    MatchedEdgeNotTight { edge: usize, slack: f64 },

    #[error("edge {edge} is matched on one side only")]
    AsymmetricMate { edge: usize },

    #[error("exposed vertex {vertex} has non-zero dual {dual}")]
    ExposedVertexDual { vertex: usize, dual: f64 },

    #[error("blossom {blossom} has positive dual but is not full")]
    BlossomNotFull { blossom: usize },
}
