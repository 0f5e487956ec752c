// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io;

use thiserror::Error;

/// An error returned by a [`StreamBuffer`][crate::StreamBuffer] operation.
///
/// A failed operation never leaves the buffer partially mutated: capacity, end of data and
/// position are exactly as they were before the call.
///
/// # Thread safety
///
/// This type is thread-safe.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A required argument was missing or a combination of sizes was not valid.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The buffer has not been initialized.
    #[error("the buffer has not been initialized")]
    InvalidState,

    /// A position or length was beyond the bound that applies to it.
    #[error("offset {requested} is out of range, the limit is {limit}")]
    OutOfRange {
        /// The offset the caller asked for.
        requested: usize,
        /// The largest offset that would have been accepted.
        limit: usize,
    },

    /// A write needed more capacity than the buffer is allowed to have.
    ///
    /// `max` is the capacity of a fixed-size buffer or the configured maximum size of a
    /// growable one.
    #[error("buffer is full: {requested} bytes of capacity are needed but the limit is {max}")]
    BufferFull {
        /// The capacity the write needed.
        requested: usize,
        /// The capacity the buffer may not exceed.
        max: usize,
    },

    /// The backing storage could not be allocated.
    #[error("failed to allocate {requested} bytes of backing storage")]
    AllocationFailed {
        /// The capacity that was being allocated.
        requested: usize,
    },

    /// A fixed-width value could not be read because too few valid bytes remain after the cursor.
    #[error("end of stream: {needed} bytes are needed but only {available} remain")]
    EndOfStream {
        /// Bytes the value occupies.
        needed: usize,
        /// Valid bytes remaining after the cursor.
        available: usize,
    },
}

/// A specialized `Result` for use with [`StreamBuffer`][crate::StreamBuffer] operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a buffer error as a standard I/O error.
///
/// This is used when the buffer is driven through the standard I/O traits.
impl From<Error> for io::Error {
    fn from(value: Error) -> Self {
        let kind = match value {
            Error::InvalidArgument(_) | Error::OutOfRange { .. } => io::ErrorKind::InvalidInput,
            Error::BufferFull { .. } => io::ErrorKind::StorageFull,
            Error::AllocationFailed { .. } => io::ErrorKind::OutOfMemory,
            Error::EndOfStream { .. } => io::ErrorKind::UnexpectedEof,
            Error::InvalidState => io::ErrorKind::Other,
        };

        Self::new(kind, value)
    }
}
