//! Error types for frame trimming.

/// Errors raised while trimming cached frames to a time window.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrimError {
    /// A time-series frame has fields but none of them is a time column.
    ///
    /// Every time-series frame is expected to carry a time column; a frame without
    /// one cannot be aligned to a window and the cached entry is not reused.
    #[error("Frame {frame_name:?} (ref id {ref_id:?}) has no time field")]
    MissingTimeField {
        /// Name of the frame
        frame_name: Option<String>,
        /// Ref id of the frame
        ref_id: Option<String>,
    },
}

impl TrimError {
    /// Create a `MissingTimeField` error for a frame.
    pub fn missing_time_field(frame_name: Option<&str>, ref_id: Option<&str>) -> Self {
        TrimError::MissingTimeField {
            frame_name: frame_name.map(str::to_owned),
            ref_id: ref_id.map(str::to_owned),
        }
    }
}
