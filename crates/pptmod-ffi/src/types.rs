#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PptResult {
    Ok = 0,
    InvalidArgument = 1,
    TruncatedFrame = 2,
    OutputTooSmall = 3,
    Internal = 99,
}

#[allow(dead_code)]
pub const PPT_OK: PptResult = PptResult::Ok;
#[allow(dead_code)]
pub const PPT_ERR_INVALID_ARGUMENT: PptResult = PptResult::InvalidArgument;
#[allow(dead_code)]
pub const PPT_ERR_TRUNCATED_FRAME: PptResult = PptResult::TruncatedFrame;
#[allow(dead_code)]
pub const PPT_ERR_OUTPUT_TOO_SMALL: PptResult = PptResult::OutputTooSmall;
#[allow(dead_code)]
pub const PPT_ERR_INTERNAL: PptResult = PptResult::Internal;

/// Bytes in one modulator frame.
pub const PPT_FRAME_LEN: usize = pptmod_frame::FRAME_LEN;
