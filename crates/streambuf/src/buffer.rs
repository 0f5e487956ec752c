// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use tracing::{Level, event};

use crate::{Error, GrowthPolicy, Result, Storage, position};

/// A contiguous byte buffer that is read and written as a stream through a cursor.
///
/// The buffer tracks three offsets into its storage:
///
/// * **capacity** - the size of the backing storage.
/// * **length** (end of data) - one past the last valid byte. Reads never go beyond it.
/// * **position** (the cursor) - where the next read or write happens.
///
/// `length <= capacity` and `position <= capacity` hold at all times. The cursor may sit
/// beyond `length`, in which case reads report end of data and a write extends `length`.
///
/// Writes that do not fit grow the storage as permitted by the [`GrowthPolicy`]. A failed
/// operation leaves all three offsets and the stored bytes as they were.
///
/// # Example
///
/// ```
/// use streambuf::{GrowthPolicy, StreamBuffer, position};
///
/// let mut buffer = StreamBuffer::new(GrowthPolicy::growable(16));
///
/// buffer.write(b"Hello, ")?;
/// buffer.write(b"world!")?;
/// assert_eq!(buffer.data()?, b"Hello, world!");
///
/// buffer.set_position(position::START)?;
///
/// let mut hello = [0_u8; 5];
/// assert_eq!(buffer.read(&mut hello)?, 5);
/// assert_eq!(&hello, b"Hello");
/// # Ok::<(), streambuf::Error>(())
/// ```
///
/// # Ownership of storage
///
/// A buffer either owns its storage or borrows it from the caller, see [`Storage`]. Borrowed
/// storage ties the buffer to the lifetime of the caller's memory, which the buffer never frees.
///
/// # Thread safety
///
/// The buffer has no internal synchronization. It is `Send` and `Sync`, and every mutation goes
/// through `&mut self`, so sharing it between threads requires the caller to provide exclusive
/// access (e.g. via a `Mutex`).
#[derive(Debug)]
pub struct StreamBuffer<'a> {
    storage: Storage<'a>,
    length: usize,
    position: usize,
    policy: GrowthPolicy,
    state: State,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    // Allocated but never initialized. Nothing may be done with it except initialize it.
    Uninitialized,
    Live,
}

impl<'a> StreamBuffer<'a> {
    /// Creates an empty buffer with no capacity, which allocates storage on the first write.
    ///
    /// With a fixed-size policy the result can never hold any data, as there is nothing to grow.
    #[must_use]
    pub fn new(policy: GrowthPolicy) -> Self {
        Self {
            storage: Storage::empty(),
            length: 0,
            position: 0,
            policy,
            state: State::Live,
        }
    }

    /// Creates a buffer over the provided storage.
    ///
    /// All of the storage is treated as valid data: `len()` equals the size of the storage and
    /// the cursor is at the start. Call [`set_end_of_data()`][Self::set_end_of_data] or
    /// [`set_empty()`][Self::set_empty] to treat the storage as free space instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the policy has a maximum size that is smaller than
    /// the storage.
    pub fn create(storage: impl Into<Storage<'a>>, policy: GrowthPolicy) -> Result<Self> {
        let mut buffer = Self::uninitialized();
        buffer.initialize(storage, policy)?;
        Ok(buffer)
    }

    /// Creates a buffer that allocates `capacity` bytes of storage up front.
    ///
    /// Unlike [`create()`][Self::create], the fresh storage contains no valid data yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `capacity` exceeds the maximum size of the policy
    /// and [`Error::AllocationFailed`] if the storage cannot be allocated.
    pub fn with_capacity(capacity: usize, policy: GrowthPolicy) -> Result<Self> {
        if !policy.admits(capacity) {
            return Err(Error::InvalidArgument("initial capacity exceeds the maximum size"));
        }

        let mut buffer = Self::create(Storage::allocate(capacity)?, policy)?;
        buffer.length = 0;
        Ok(buffer)
    }

    /// Creates a buffer that takes ownership of `data`, treating all of it as valid data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the policy has a maximum size that is smaller than
    /// `data`.
    pub fn from_vec(data: Vec<u8>, policy: GrowthPolicy) -> Result<Self> {
        Self::create(Storage::Owned(data), policy)
    }

    /// Creates a buffer over memory that remains owned by the caller, treating all of it as
    /// valid data.
    ///
    /// The memory is never freed or resized by the buffer. If the policy lets the buffer grow
    /// beyond it, the buffer continues in storage of its own.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the policy has a maximum size that is smaller than
    /// `data`.
    pub fn borrowed(data: &'a mut [u8], policy: GrowthPolicy) -> Result<Self> {
        Self::create(Storage::Borrowed(data), policy)
    }

    /// Creates a buffer record that has not been initialized yet.
    ///
    /// Every operation on it fails with [`Error::InvalidState`] until
    /// [`initialize()`][Self::initialize] succeeds.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self {
            storage: Storage::empty(),
            length: 0,
            position: 0,
            policy: GrowthPolicy::fixed(),
            state: State::Uninitialized,
        }
    }

    /// (Re)initializes the buffer over the provided storage, as [`create()`][Self::create] does.
    ///
    /// Any storage the buffer held before is released if owned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the policy has a maximum size that is smaller than
    /// the storage. The buffer is unchanged in that case.
    pub fn initialize(&mut self, storage: impl Into<Storage<'a>>, policy: GrowthPolicy) -> Result<()> {
        let storage = storage.into();

        if !policy.admits(storage.len()) {
            event!(
                Level::TRACE,
                data_size = storage.len(),
                max_size = policy.max_size(),
                "rejected storage larger than the maximum size"
            );
            return Err(Error::InvalidArgument("data size exceeds the maximum size"));
        }

        self.length = storage.len();
        self.position = 0;
        self.storage = storage;
        self.policy = policy;
        self.state = State::Live;

        Ok(())
    }

    /// Destroys the buffer held in `slot`, leaving `None` behind.
    ///
    /// Owned storage is released. Borrowed storage is returned untouched to the caller. An
    /// empty slot is left as it is.
    ///
    /// Dropping the buffer has the same effect; this exists for code that keeps buffers in
    /// optional slots and must not use one after it is destroyed.
    pub fn delete(slot: &mut Option<Self>) {
        if let Some(buffer) = slot.take() {
            event!(
                Level::TRACE,
                capacity = buffer.capacity(),
                owned = buffer.owns_storage(),
                "deleting buffer"
            );
        }
    }

    /// Releases owned storage and resets the buffer to zero capacity with a fixed-size policy.
    ///
    /// The buffer remains initialized and may be reinitialized with
    /// [`initialize()`][Self::initialize].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the buffer has not been initialized.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_live()?;

        self.storage = Storage::empty();
        self.length = 0;
        self.position = 0;
        self.policy = GrowthPolicy::fixed();

        Ok(())
    }

    /// Consumes the buffer and returns its valid data.
    ///
    /// Owned storage is reused without copying. Borrowed storage is copied, as it belongs to
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the buffer has not been initialized.
    pub fn into_vec(self) -> Result<Vec<u8>> {
        self.ensure_live()?;

        Ok(self.storage.into_vec(self.length))
    }

    /// Whether the buffer has been initialized.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state == State::Live
    }

    /// Whether the buffer is responsible for releasing its storage.
    #[must_use]
    pub const fn owns_storage(&self) -> bool {
        self.storage.owns_storage()
    }

    /// The growth policy of the buffer.
    #[must_use]
    pub const fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Size of the backing storage in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of valid bytes in the buffer, i.e. the end of data.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Whether the buffer contains no valid data, regardless of the cursor.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of valid bytes after the cursor.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.length.saturating_sub(self.position)
    }

    /// The cursor, i.e. the offset of the next byte to read or write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the buffer has not been initialized.
    pub fn position(&self) -> Result<usize> {
        self.ensure_live()?;

        Ok(self.position)
    }

    /// Moves the cursor.
    ///
    /// [`position::START`] moves it to the start of the buffer and [`position::END`] to the end
    /// of data. Any other value is used as is, and may be beyond the end of data as long as it
    /// is within capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the position is beyond capacity and
    /// [`Error::InvalidState`] if the buffer has not been initialized.
    pub fn set_position(&mut self, offset: usize) -> Result<()> {
        self.ensure_live()?;

        let offset = if offset == position::END { self.length } else { offset };

        if offset > self.capacity() {
            event!(
                Level::TRACE,
                offset,
                capacity = self.capacity(),
                "rejected cursor beyond capacity"
            );
            return Err(Error::OutOfRange {
                requested: offset,
                limit: self.capacity(),
            });
        }

        self.position = offset;
        Ok(())
    }

    /// Moves the end of data, without moving the cursor.
    ///
    /// Shrinking it hides data from subsequent reads. Growing it exposes whatever the storage
    /// contains in that range as valid data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `length` is beyond capacity and
    /// [`Error::InvalidState`] if the buffer has not been initialized.
    pub fn set_end_of_data(&mut self, length: usize) -> Result<()> {
        self.ensure_live()?;

        if length > self.capacity() {
            return Err(Error::OutOfRange {
                requested: length,
                limit: self.capacity(),
            });
        }

        self.length = length;
        Ok(())
    }

    /// Discards all data: both the end of data and the cursor return to the start.
    ///
    /// Storage and capacity are kept, ready to be written again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the buffer has not been initialized.
    pub fn set_empty(&mut self) -> Result<()> {
        self.ensure_live()?;

        self.length = 0;
        self.position = 0;
        Ok(())
    }

    /// The valid data of the buffer, from the start up to the end of data.
    ///
    /// The slice borrows the buffer, so it cannot outlive the buffer or be held across a
    /// write that may relocate the storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the buffer has not been initialized.
    pub fn data(&self) -> Result<&[u8]> {
        self.ensure_live()?;

        Ok(&self.storage.as_slice()[..self.length])
    }

    /// Copies `src` into the buffer at the cursor and advances the cursor past it.
    ///
    /// Storage grows first if the bytes do not fit in the current capacity. The end of data
    /// moves forward if the write ends beyond it. Writing an empty slice does nothing.
    ///
    /// The write is all-or-nothing: if it fails, nothing is written and the buffer is unchanged.
    ///
    /// # Errors
    ///
    /// * [`Error::BufferFull`] if the bytes do not fit and the policy does not allow enough growth.
    /// * [`Error::AllocationFailed`] if the grown storage cannot be allocated.
    /// * [`Error::InvalidState`] if the buffer has not been initialized.
    pub fn write(&mut self, src: &[u8]) -> Result<()> {
        self.ensure_live()?;

        if src.is_empty() {
            return Ok(());
        }

        let end = self.position.saturating_add(src.len());
        self.ensure_capacity(end)?;

        self.storage.as_mut_slice()[self.position..end].copy_from_slice(src);

        self.position = end;
        self.length = self.length.max(end);

        Ok(())
    }

    /// Copies bytes from the cursor into `dst` and advances the cursor past them.
    ///
    /// Copies as many bytes as fit into `dst` or remain before the end of data, whichever is
    /// fewer, and returns that count. A count of zero with a non-empty `dst` means the cursor
    /// is at or beyond the end of data, which is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the buffer has not been initialized.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        self.ensure_live()?;

        let count = dst.len().min(self.remaining());
        let end = self.position + count;

        dst[..count].copy_from_slice(&self.storage.as_slice()[self.position..end]);
        self.position = end;

        Ok(count)
    }

    /// Advances the cursor by `count` bytes without copying them anywhere.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if fewer than `count` valid bytes remain after the cursor.
    /// The cursor does not move in that case. Returns [`Error::InvalidState`] if the buffer has
    /// not been initialized.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.ensure_live()?;

        if count > self.remaining() {
            event!(
                Level::TRACE,
                count,
                remaining = self.remaining(),
                "rejected skip beyond end of data"
            );
            return Err(Error::OutOfRange {
                requested: self.position.saturating_add(count),
                limit: self.length,
            });
        }

        self.position += count;
        Ok(())
    }

    /// The valid bytes after the cursor.
    pub(crate) fn unread(&self) -> &[u8] {
        let start = self.position.min(self.length);
        &self.storage.as_slice()[start..self.length]
    }

    /// Moves the cursor forward over unread bytes already checked to exist.
    pub(crate) fn advance_unread(&mut self, count: usize) {
        debug_assert!(count <= self.remaining());
        self.position += count;
    }

    fn ensure_capacity(&mut self, needed: usize) -> Result<()> {
        let capacity = self.capacity();

        if needed <= capacity {
            return Ok(());
        }

        let target = self.policy.grow_target(capacity, needed).inspect_err(|e| {
            event!(Level::TRACE, needed, capacity, error = %e, "rejected write that does not fit");
        })?;

        self.storage.grow(target)?;

        event!(Level::DEBUG, old_capacity = capacity, new_capacity = target, "buffer storage grown");

        Ok(())
    }

    pub(crate) fn ensure_live(&self) -> Result<()> {
        match self.state {
            State::Live => Ok(()),
            State::Uninitialized => Err(Error::InvalidState),
        }
    }
}
