//! Error types for the search core.
//!
//! The core is total almost everywhere: the parser, the scorer, and link
//! generation cannot fail. The two ways a caller can see an error are
//! malformed pagination input and an unavailable corpus provider. Anything
//! else is an internal invariant violation, which is a bug and is caught by
//! debug assertions rather than an error channel.

use serde::{Deserialize, Serialize};

/// Errors surfaced by the search form and the search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SearchError {
    // ==================== Validation ====================
    /// A request parameter failed validation.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: String,
        /// Description of the validation failure.
        reason: String,
    },

    // ==================== System ====================
    /// The corpus provider could not produce a snapshot.
    #[error("corpus unavailable: {reason}")]
    CorpusUnavailable {
        /// Provider-supplied failure details.
        reason: String,
    },
}

impl SearchError {
    pub(crate) fn invalid_parameter(name: &str, reason: &str) -> SearchError {
        SearchError::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
