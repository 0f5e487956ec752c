// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Fixed-width value helpers for encoders and decoders, layered over `write()` and `read()`.

use num_traits::{FromBytes, ToBytes};

use crate::{Error, Result, StreamBuffer};

impl StreamBuffer<'_> {
    /// Writes a single byte at the cursor.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`write()`][Self::write].
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        self.write(&[value])
    }

    /// Writes a number of type `T` in little-endian representation at the cursor.
    ///
    /// # Example
    ///
    /// ```
    /// use streambuf::{GrowthPolicy, StreamBuffer};
    ///
    /// let mut buffer = StreamBuffer::new(GrowthPolicy::growable(64));
    ///
    /// buffer.write_num_le(0x1234_u16)?;
    /// buffer.write_num_be(0x1234_u16)?;
    ///
    /// assert_eq!(buffer.data()?, &[0x34, 0x12, 0x12, 0x34]);
    /// # Ok::<(), streambuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`write()`][Self::write]. Nothing is written on failure.
    pub fn write_num_le<T: ToBytes>(&mut self, value: T) -> Result<()> {
        self.write(value.to_le_bytes().as_ref())
    }

    /// Writes a number of type `T` in big-endian representation at the cursor.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`write()`][Self::write]. Nothing is written on failure.
    pub fn write_num_be<T: ToBytes>(&mut self, value: T) -> Result<()> {
        self.write(value.to_be_bytes().as_ref())
    }

    /// Writes a number of type `T` in native-endian representation at the cursor.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`write()`][Self::write]. Nothing is written on failure.
    pub fn write_num_ne<T: ToBytes>(&mut self, value: T) -> Result<()> {
        self.write(value.to_ne_bytes().as_ref())
    }

    /// Reads a single byte at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndOfStream`] if no valid byte remains after the cursor and
    /// [`Error::InvalidState`] if the buffer has not been initialized.
    pub fn read_byte(&mut self) -> Result<u8> {
        let [byte] = self.read_exact_array::<1>()?;
        Ok(byte)
    }

    /// Reads a number of type `T` in little-endian representation at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndOfStream`] if fewer than `size_of::<T>()` valid bytes remain after
    /// the cursor, in which case the cursor does not move. Returns [`Error::InvalidState`] if
    /// the buffer has not been initialized.
    pub fn read_num_le<T: FromBytes>(&mut self) -> Result<T>
    where
        T::Bytes: Sized + Default,
    {
        let bytes = self.read_num_bytes::<T>()?;
        Ok(T::from_le_bytes(&bytes))
    }

    /// Reads a number of type `T` in big-endian representation at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndOfStream`] if fewer than `size_of::<T>()` valid bytes remain after
    /// the cursor, in which case the cursor does not move. Returns [`Error::InvalidState`] if
    /// the buffer has not been initialized.
    pub fn read_num_be<T: FromBytes>(&mut self) -> Result<T>
    where
        T::Bytes: Sized + Default,
    {
        let bytes = self.read_num_bytes::<T>()?;
        Ok(T::from_be_bytes(&bytes))
    }

    /// Reads a number of type `T` in native-endian representation at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndOfStream`] if fewer than `size_of::<T>()` valid bytes remain after
    /// the cursor, in which case the cursor does not move. Returns [`Error::InvalidState`] if
    /// the buffer has not been initialized.
    pub fn read_num_ne<T: FromBytes>(&mut self) -> Result<T>
    where
        T::Bytes: Sized + Default,
    {
        let bytes = self.read_num_bytes::<T>()?;
        Ok(T::from_ne_bytes(&bytes))
    }

    fn read_num_bytes<T: FromBytes>(&mut self) -> Result<T::Bytes>
    where
        T::Bytes: Sized + Default,
    {
        let mut bytes = <T::Bytes as Default>::default();
        self.read_exact_into(bytes.as_mut())?;
        Ok(bytes)
    }

    fn read_exact_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0_u8; N];
        self.read_exact_into(&mut bytes)?;
        Ok(bytes)
    }

    fn read_exact_into(&mut self, dst: &mut [u8]) -> Result<()> {
        self.ensure_live()?;

        let available = self.remaining();
        if available < dst.len() {
            return Err(Error::EndOfStream {
                needed: dst.len(),
                available,
            });
        }

        let read = self.read(dst)?;
        debug_assert_eq!(read, dst.len());

        Ok(())
    }
}
