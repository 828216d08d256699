//! Low-level reader for binary VDF streams.

use crate::encoding::decode_lossless;
use crate::error::Result;
use std::io::{self, BufRead, Seek};

/// Forward-only reader that counts every byte it consumes or skips.
///
/// The count starts at zero when the cursor is created, so wrapping a freshly opened file makes
/// [`BinaryCursor::position`] equal to the file offset.
pub struct BinaryCursor<R> {
    inner: R,
    position: u64,
}

impl<R: BufRead> BinaryCursor<R> {
    #[must_use]
    /// Wraps a buffered reader.
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    #[must_use]
    /// Bytes consumed or skipped so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    #[must_use]
    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads exactly `N` raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an `UnexpectedEof` I/O error if the stream ends first.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        self.position += N as u64;
        Ok(buf)
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns an `UnexpectedEof` I/O error at end of stream.
    pub fn read_u8(&mut self) -> Result<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Reads a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns an `UnexpectedEof` I/O error if fewer than four bytes remain.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `u64`.
    ///
    /// # Errors
    ///
    /// Returns an `UnexpectedEof` I/O error if fewer than eight bytes remain.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Reads a NUL-terminated string and consumes the terminator.
    ///
    /// Buffered bytes are scanned for the NUL; when the buffer runs out first, its contents are
    /// kept and the buffer is refilled, so strings longer than the buffer and terminators that
    /// land exactly on a refill boundary are both handled.
    ///
    /// # Errors
    ///
    /// Returns an `UnexpectedEof` I/O error if the stream ends before a NUL.
    pub fn read_cstring(&mut self) -> Result<String> {
        let mut acc = Vec::new();
        loop {
            let buf = self.inner.fill_buf()?;
            if buf.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream ended inside a string",
                )
                .into());
            }
            if let Some(nul) = memchr::memchr(0, buf) {
                acc.extend_from_slice(&buf[..nul]);
                self.consume(nul + 1);
                return Ok(decode_lossless(acc));
            }
            let len = buf.len();
            acc.extend_from_slice(buf);
            self.consume(len);
        }
    }

    fn consume(&mut self, amount: usize) {
        self.inner.consume(amount);
        self.position += amount as u64;
    }
}

impl<R: BufRead + Seek> BinaryCursor<R> {
    /// Moves forward `len` bytes without reading them.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the underlying seek fails.
    pub fn skip(&mut self, len: u64) -> Result<()> {
        let offset = i64::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "skip length overflows"))?;
        self.inner.seek_relative(offset)?;
        self.position += len;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/cursor.rs"]
mod tests;
