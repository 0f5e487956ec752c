// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! A growable byte buffer that doubles as a sequential read/write stream with an explicit cursor.
//!
//! [`StreamBuffer`] is the I/O unit beneath binary protocol encoders and decoders: they write and
//! read values through it instead of touching memory directly. It keeps one contiguous region of
//! storage and three offsets into it:
//!
//! * **capacity** - how large the storage is.
//! * **length**, also called the end of data - how much of the storage holds valid data.
//! * **position**, the cursor - where the next read or write happens.
//!
//! Writes copy bytes in at the cursor, growing the storage if needed and moving the end of data
//! forward. Reads copy bytes out at the cursor and never go past the end of data.
//!
//! ```
//! use streambuf::{GrowthPolicy, StreamBuffer, position};
//!
//! // Grow in steps of 256 bytes, up to 64 KB.
//! let policy = GrowthPolicy::growable(256).with_max_size(64 * 1024);
//! let mut buffer = StreamBuffer::new(policy);
//!
//! // Encode a tiny message: a type tag, a length prefix and a payload.
//! buffer.write_byte(7)?;
//! buffer.write_num_le(5_u32)?;
//! buffer.write(b"hello")?;
//!
//! // Decode it again from the start.
//! buffer.set_position(position::START)?;
//!
//! assert_eq!(buffer.read_byte()?, 7);
//! let len = buffer.read_num_le::<u32>()?;
//! let mut payload = vec![0; len as usize];
//! assert_eq!(buffer.read(&mut payload)?, 5);
//! assert_eq!(payload, b"hello");
//!
//! // Reading at the end of data is not an error, it just yields nothing.
//! assert_eq!(buffer.read(&mut [0; 8])?, 0);
//! # Ok::<(), streambuf::Error>(())
//! ```
//!
//! # Growth
//!
//! A [`GrowthPolicy`] decides what happens when a write does not fit:
//!
//! * With a block size of zero, the buffer is fixed-size and the write fails with
//!   [`Error::BufferFull`].
//! * Otherwise capacity grows by the smallest number of whole blocks that fits the write,
//!   capped at the maximum size if one is set. If even the maximum size is not enough, the
//!   write fails with [`Error::BufferFull`].
//!
//! Failed writes are all-or-nothing: the buffer is left exactly as it was.
//!
//! # Storage ownership
//!
//! A buffer either owns its storage or borrows it from the caller, see [`Storage`]:
//!
//! ```
//! use streambuf::{GrowthPolicy, StreamBuffer};
//!
//! let mut memory = [0_u8; 16];
//!
//! {
//!     let mut buffer = StreamBuffer::borrowed(&mut memory, GrowthPolicy::fixed())?;
//!     buffer.set_empty()?;
//!     buffer.write(b"abc")?;
//! }
//!
//! // The buffer is gone but the memory, and what was written into it, remains.
//! assert_eq!(&memory[..3], b"abc");
//! # Ok::<(), streambuf::Error>(())
//! ```
//!
//! # Interoperability
//!
//! `StreamBuffer` implements [`std::io::Read`], [`std::io::BufRead`], [`std::io::Write`] and
//! [`std::io::Seek`]. With the `bytes-compat` feature it also implements `bytes::Buf` over the
//! unread valid data. With the `serde` feature, [`GrowthPolicy`] can be loaded from configuration.

mod buffer;
#[cfg(feature = "bytes-compat")]
mod bytes_compat;
mod error;
mod io_adapters;
mod policy;
mod storage;
mod typed;

pub use buffer::StreamBuffer;
pub use error::{Error, Result};
pub use policy::GrowthPolicy;
pub use storage::Storage;

/// Named cursor positions accepted by [`StreamBuffer::set_position()`].
pub mod position {
    /// The start of the buffer.
    pub const START: usize = 0;

    /// The end of data. The cursor moves to wherever the end of data is at the time of the call.
    pub const END: usize = usize::MAX;
}
