//! Record Codec
//!
//! Encodes and decodes single records against the fixed binary layout
//! described in the module docs. Encoding and decoding are symmetric: any
//! stream produced by `RecordWriter` decodes back to the same records.

use std::io::{self, Read, Write};

use bytes::{BufMut, BytesMut};

use crate::error::{Result, StrataError};

use super::{Record, TOMBSTONE_LEN};

// =============================================================================
// Writer
// =============================================================================

/// Appends encoded records to an output stream
pub struct RecordWriter<W: Write> {
    inner: W,
}

impl<W: Write> RecordWriter<W> {
    /// Wrap an output stream
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Encode and append one record, returning the number of bytes written.
    ///
    /// The record is encoded in full before anything hits the stream, so a
    /// failed write never leaves a half-encoded frame behind the writer's
    /// back: whatever `write_all` reports as written is all there is.
    pub fn write(&mut self, record: &Record) -> Result<u64> {
        let mut buf = BytesMut::with_capacity(record.encoded_len() as usize);

        // put_i32 is big-endian, matching the on-disk layout
        buf.put_i32(record.key().len() as i32);
        buf.put_slice(record.key());

        match record.value_bytes() {
            Some(value) => {
                buf.put_i32(value.len() as i32);
                buf.put_slice(value);
            }
            None => buf.put_i32(TOMBSTONE_LEN),
        }

        self.inner.write_all(&buf)?;
        self.inner.flush()?;

        Ok(buf.len() as u64)
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> W {
        self.inner
    }
}

// =============================================================================
// Reader
// =============================================================================

/// Decodes records sequentially from an input stream
pub struct RecordReader<R: Read> {
    inner: R,
}

impl<R: Read> RecordReader<R> {
    /// Wrap an input stream
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Decode the next record.
    ///
    /// Returns:
    /// - `Ok(Some(record))` — a value record or a tombstone
    /// - `Ok(None)` — clean end of stream, no further bytes remain
    /// - `Err(Io)` with `ErrorKind::UnexpectedEof` — the stream ended in the
    ///   middle of a record (e.g. the file was cut mid-write); callers at the
    ///   recovery layer stop consuming at this point
    /// - `Err(Corruption)` — a length no record could legally carry
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let mut len_buf = [0u8; 4];
        if !self.fill_or_eof(&mut len_buf)? {
            return Ok(None);
        }

        let key_len = i32::from_be_bytes(len_buf);
        if key_len < 0 {
            return Err(StrataError::Corruption(format!(
                "record carries negative key length {}",
                key_len
            )));
        }

        let mut key = vec![0u8; key_len as usize];
        self.inner.read_exact(&mut key)?;

        self.inner.read_exact(&mut len_buf)?;
        let value_len = i32::from_be_bytes(len_buf);

        if value_len == TOMBSTONE_LEN {
            return Ok(Some(Record::Tombstone { key }));
        }
        if value_len < 0 {
            return Err(StrataError::Corruption(format!(
                "record carries invalid value length {}",
                value_len
            )));
        }

        let mut value = vec![0u8; value_len as usize];
        self.inner.read_exact(&mut value)?;

        Ok(Some(Record::Value { key, value }))
    }

    /// Fill `buf` completely, unless the stream is already exhausted.
    ///
    /// `Ok(false)` means the stream ended cleanly before the first byte.
    /// Ending after the first byte is an `UnexpectedEof`, same as
    /// `read_exact` reports for a partial fill.
    fn fill_or_eof(&mut self, buf: &mut [u8]) -> Result<bool> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(false),
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "stream ended inside a record frame",
                    )
                    .into())
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(true)
    }
}
