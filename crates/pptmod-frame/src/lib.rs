//! Field-table decoder for PPT modulator telemetry frames.
//!
//! The modulator answers every poll with a fixed 86-byte frame made of 43
//! little-endian 16-bit words. This crate turns such a buffer into named,
//! scaled measurements:
//! - [`FieldTable`] is the register map: name, byte offset and scale per field
//! - [`decode`] / [`FrameDecoder`] extract and scale every field at once
//! - [`DecodeObserver`] lets callers trace decoded values without touching the decoder
//! - [`FrameReader`] cuts whole frames out of a byte stream
//!
//! Decoding is pure: no I/O, no state, no logging.

pub mod codec;
pub mod error;
pub mod observer;
pub mod reader;
pub mod table;

pub use codec::{decode, read_word, DecodedFrame, FrameDecoder, Measurement, FRAME_LEN, WORD_COUNT};
pub use error::{DecodeError, ReadError, Result, TableError};
pub use observer::{DecodeObserver, TracingObserver};
pub use reader::FrameReader;
pub use table::{FieldSpec, FieldTable, Scale, MODULATOR_FIELDS};
