//! Decoder for PPT modulator telemetry frames.
//!
//! The modulator reports its state as a fixed 86-byte frame of little-endian
//! words. This crate re-exports the decoder and ships the `pptmod` CLI
//! (behind the `cli` feature) for inspecting captured frames.
//!
//! # Crate Structure
//!
//! - [`frame`]: field table, frame decoding, observers and the frame reader
//!
//! ```
//! let mut buf = [0u8; pptmod::frame::FRAME_LEN];
//! buf[0] = 0x64;
//! let decoded = pptmod::frame::decode(&buf).unwrap();
//! assert_eq!(decoded.get("HeaterVoltage1"), Some(10.0));
//! ```

/// Re-export frame types.
pub mod frame {
    pub use pptmod_frame::*;
}

pub use pptmod_frame::{decode, DecodeError, DecodedFrame, FieldTable, FrameDecoder};
