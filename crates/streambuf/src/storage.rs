// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Debug, Formatter};

use tracing::{Level, event};

use crate::{Error, Result};

/// The memory region behind a [`StreamBuffer`][crate::StreamBuffer].
///
/// Ownership is decided once, when the storage is handed to the buffer, and never transferred
/// implicitly afterwards:
///
/// * [`Storage::Owned`] is released when the buffer is dropped, deleted or cleared.
/// * [`Storage::Borrowed`] belongs to the caller. The buffer never frees it and never changes
///   its size. The caller regains full access once the buffer is gone.
///
/// If a buffer over borrowed storage is allowed to grow, growth copies the contents into a new
/// region allocated by the buffer. The buffer owns that region from then on and stops
/// touching the caller's memory, which keeps whatever was written into it before the growth.
pub enum Storage<'a> {
    /// Storage allocated by (or given away to) the buffer.
    Owned(Vec<u8>),

    /// Storage that stays with the caller.
    Borrowed(&'a mut [u8]),
}

impl Storage<'_> {
    /// Storage with no capacity.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Owned(Vec::new())
    }

    /// Allocates `capacity` bytes of zeroed storage owned by the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if the memory cannot be allocated.
    pub fn allocate(capacity: usize) -> Result<Self> {
        let mut data = Vec::new();
        reserve_exact(&mut data, capacity)?;
        data.resize(capacity, 0);

        Ok(Self::Owned(data))
    }

    /// Whether the buffer is responsible for releasing this storage.
    #[must_use]
    pub const fn owns_storage(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Size of the region in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the region has no capacity at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        match self {
            Self::Owned(data) => data.as_slice(),
            Self::Borrowed(data) => &data[..],
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Self::Owned(data) => data.as_mut_slice(),
            Self::Borrowed(data) => &mut data[..],
        }
    }

    /// Grows the region to exactly `new_capacity` bytes, preserving all existing contents.
    ///
    /// Either the region has the new size afterwards or it is unchanged.
    pub(crate) fn grow(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(new_capacity >= self.len());

        match self {
            Self::Owned(data) => {
                reserve_exact(data, new_capacity - data.len())?;
                data.resize(new_capacity, 0);
            }
            Self::Borrowed(borrowed) => {
                let mut data = Vec::new();
                reserve_exact(&mut data, new_capacity)?;
                data.extend_from_slice(&borrowed[..]);
                data.resize(new_capacity, 0);

                event!(
                    Level::DEBUG,
                    borrowed_len = borrowed.len(),
                    new_capacity,
                    "borrowed storage outgrown, continuing in owned storage"
                );

                *self = Self::Owned(data);
            }
        }

        Ok(())
    }

    /// Converts the first `len` bytes of the region into an owned vector.
    pub(crate) fn into_vec(self, len: usize) -> Vec<u8> {
        match self {
            Self::Owned(mut data) => {
                data.truncate(len);
                data
            }
            Self::Borrowed(data) => data[..len].to_vec(),
        }
    }
}

fn reserve_exact(data: &mut Vec<u8>, additional: usize) -> Result<()> {
    data.try_reserve_exact(additional).map_err(|e| {
        event!(Level::DEBUG, additional, error = %e, "failed to allocate buffer storage");

        Error::AllocationFailed {
            requested: data.len().saturating_add(additional),
        }
    })
}

impl Default for Storage<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<u8>> for Storage<'_> {
    fn from(value: Vec<u8>) -> Self {
        Self::Owned(value)
    }
}

impl<'a> From<&'a mut [u8]> for Storage<'a> {
    fn from(value: &'a mut [u8]) -> Self {
        Self::Borrowed(value)
    }
}

impl Debug for Storage<'_> {
    #[cfg_attr(test, mutants::skip)] // We have no API contract here.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("owned", &self.owns_storage())
            .field("len", &self.len())
            .finish()
    }
}
