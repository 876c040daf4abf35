//! Error types for time range resolution.

/// Errors that can occur when resolving relative range expressions such as
/// `now-6h` into absolute instants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeRangeError {
    /// The expression does not follow the `now[(+|-)<n><unit>]*` grammar.
    #[error("Invalid relative time expression {expression:?}: {reason}")]
    InvalidExpression {
        /// The expression as given
        expression: String,
        /// Why it was rejected
        reason: String,
    },

    /// The expression asks for rounding to a unit boundary (e.g. `now/d`).
    #[error("Rounding is not supported in relative time expression {expression:?}")]
    UnsupportedRounding {
        /// The expression as given
        expression: String,
    },

    /// The resolved instant does not fit in the supported date range.
    #[error("Relative time expression {expression:?} resolves outside the supported range")]
    OutOfRange {
        /// The expression as given
        expression: String,
    },
}

impl TimeRangeError {
    /// Create an `InvalidExpression` error with a reason.
    pub fn invalid_expression(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        TimeRangeError::InvalidExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}
