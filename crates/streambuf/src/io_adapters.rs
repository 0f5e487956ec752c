// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Standard I/O trait implementations, so generic `std::io` code can drive a [`StreamBuffer`].
//!
//! The inherent methods of the same name take precedence in method call syntax. Use the trait
//! methods via generic code or fully qualified syntax, e.g. `io::Read::read(&mut buffer, ..)`.

use std::io::{self, BufRead, Read, Seek, SeekFrom, Write};

use crate::{Error, StreamBuffer};

impl Read for StreamBuffer<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(StreamBuffer::read(self, buf)?)
    }
}

impl BufRead for StreamBuffer<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.ensure_live()?;
        Ok(self.unread())
    }

    fn consume(&mut self, amount: usize) {
        let amount = amount.min(self.remaining());
        self.advance_unread(amount);
    }
}

impl Write for StreamBuffer<'_> {
    /// Writes all of `buf` or nothing at all.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        StreamBuffer::write(self, buf)?;
        Ok(buf.len())
    }

    #[cfg_attr(test, mutants::skip)] // Nothing to flush, the data is already in the buffer.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for StreamBuffer<'_> {
    /// Moves the cursor. [`SeekFrom::End`] is relative to the end of data, not to capacity.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => usize::try_from(offset).ok(),
            SeekFrom::End(delta) => offset_from(self.len(), delta),
            SeekFrom::Current(delta) => offset_from(self.position()?, delta),
        };

        let Some(target) = target else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek to a negative or overflowing position",
            ));
        };

        // Checked here rather than left to `set_position()`, which treats `usize::MAX` as
        // the end-of-data marker.
        if target > self.capacity() {
            return Err(Error::OutOfRange {
                requested: target,
                limit: self.capacity(),
            }
            .into());
        }

        self.set_position(target)?;

        u64::try_from(target).map_err(io::Error::other)
    }
}

fn offset_from(base: usize, delta: i64) -> Option<usize> {
    isize::try_from(delta).ok().and_then(|delta| base.checked_add_signed(delta))
}
