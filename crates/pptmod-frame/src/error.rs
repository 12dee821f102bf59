/// Errors that can occur while decoding a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer holds fewer bytes than a complete frame.
    #[error("truncated frame ({actual} bytes, need {required})")]
    TruncatedFrame { actual: usize, required: usize },
}

/// Errors raised while building or loading a field table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table has no fields.
    #[error("field table is empty")]
    Empty,

    /// A field starts on an odd byte offset.
    #[error("field {name} has odd offset {offset} (words start on even bytes)")]
    UnalignedOffset { name: String, offset: usize },

    /// A field's word does not fit inside the frame.
    #[error("field {name} at offset {offset} does not fit in a {frame_len}-byte frame")]
    OffsetOutOfBounds {
        name: String,
        offset: usize,
        frame_len: usize,
    },

    /// Two fields share a name.
    #[error("duplicate field name: {0}")]
    DuplicateName(String),

    /// The table document could not be read.
    #[error("failed to read field table: {0}")]
    Io(#[from] std::io::Error),

    /// The table document is not valid JSON or has the wrong shape.
    #[cfg(feature = "serde")]
    #[error("invalid field table document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors returned by [`FrameReader`](crate::FrameReader).
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// An I/O error occurred while reading the stream.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended on a frame boundary.
    #[error("stream closed")]
    Closed,

    /// The stream ended in the middle of a frame.
    #[error("stream closed mid-frame ({buffered} bytes buffered)")]
    Truncated { buffered: usize },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
