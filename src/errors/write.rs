//! Error types for cache writes.

/// Reasons a response batch is discarded instead of cached.
///
/// A write either stores every frame of the response or nothing at all. These
/// errors never reach the query caller as failures; they are logged for operators
/// and surfaced through [`WriteOutcome::Discarded`](crate::WriteOutcome::Discarded).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheWriteError {
    /// A response frame carries no ref id, so it cannot be paired with a target.
    #[error("Response frame {frame_name:?} has no ref id")]
    MissingRefId {
        /// Name of the offending frame, if it has one
        frame_name: Option<String>,
    },

    /// A response frame's ref id matches none of the request targets.
    #[error("Response frame ref id {ref_id:?} has no corresponding request target")]
    UnmatchedFrame {
        /// The ref id found on the frame
        ref_id: String,
    },
}

impl CacheWriteError {
    /// Create a `MissingRefId` error for a frame name.
    pub fn missing_ref_id(frame_name: Option<&str>) -> Self {
        CacheWriteError::MissingRefId {
            frame_name: frame_name.map(str::to_owned),
        }
    }

    /// Create an `UnmatchedFrame` error for a ref id.
    pub fn unmatched_frame(ref_id: impl Into<String>) -> Self {
        CacheWriteError::UnmatchedFrame {
            ref_id: ref_id.into(),
        }
    }
}
