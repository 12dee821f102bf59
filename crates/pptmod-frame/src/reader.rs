use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};

use crate::codec::FRAME_LEN;
use crate::error::ReadError;

const INITIAL_BUFFER_CAPACITY: usize = 4 * FRAME_LEN;
const READ_CHUNK_SIZE: usize = 1024;

/// Cuts consecutive fixed-size frames out of any `Read` stream.
///
/// Handles partial reads internally; callers always get whole frames.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    frames_read: u64,
}

impl<T: Read> FrameReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            frames_read: 0,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(ReadError::Closed)` at end of stream, or
    /// `Err(ReadError::Truncated)` once if the stream stops mid-frame.
    pub fn read_frame(&mut self) -> Result<Bytes, ReadError> {
        loop {
            if self.buf.len() >= FRAME_LEN {
                let frame = self.buf.split_to(FRAME_LEN).freeze();
                self.frames_read += 1;
                tracing::trace!(frame = self.frames_read, buffered = self.buf.len(), "frame read");
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ReadError::Io(err)),
            };

            if read == 0 {
                if self.buf.is_empty() {
                    return Err(ReadError::Closed);
                }
                let buffered = self.buf.len();
                self.buf.clear();
                tracing::debug!(buffered, "stream ended mid-frame");
                return Err(ReadError::Truncated { buffered });
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Number of frames returned so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> std::fmt::Debug for FrameReader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameReader")
            .field("buffered", &self.buf.len())
            .field("frames_read", &self.frames_read)
            .finish_non_exhaustive()
    }
}
