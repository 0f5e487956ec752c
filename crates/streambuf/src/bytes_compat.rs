// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Compatibility with types from the `bytes` package.

use bytes::Buf;

use crate::StreamBuffer;

/// Exposes the valid bytes after the cursor. Consuming them advances the cursor.
impl Buf for StreamBuffer<'_> {
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    #[inline]
    fn remaining(&self) -> usize {
        StreamBuffer::remaining(self)
    }

    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    #[inline]
    fn chunk(&self) -> &[u8] {
        self.unread()
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= StreamBuffer::remaining(self),
            "cannot advance past the end of data"
        );

        self.advance_unread(cnt);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::GrowthPolicy;

    #[test]
    fn buf_compat() {
        let mut buffer = StreamBuffer::new(GrowthPolicy::growable(8));
        buffer.write_num_be(0xCAFE_u16).unwrap();
        buffer.write(b"tail").unwrap();
        buffer.set_position(0).unwrap();

        assert_eq!(Buf::remaining(&buffer), 6);
        assert_eq!(buffer.get_u16(), 0xCAFE);
        assert_eq!(buffer.chunk(), b"tail");

        let tail = buffer.copy_to_bytes(4);
        assert_eq!(&tail[..], b"tail");
        assert_eq!(Buf::remaining(&buffer), 0);
        assert_eq!(buffer.position().unwrap(), 6);
    }

    #[test]
    fn chunk_stops_at_end_of_data() {
        let mut buffer = StreamBuffer::from_vec(b"abcdef".to_vec(), GrowthPolicy::fixed()).unwrap();
        buffer.set_end_of_data(4).unwrap();

        assert_eq!(buffer.chunk(), b"abcd");
    }

    #[test]
    #[should_panic]
    fn advance_past_end_panics() {
        let mut buffer = StreamBuffer::from_vec(b"ab".to_vec(), GrowthPolicy::fixed()).unwrap();

        Buf::advance(&mut buffer, 3);
    }
}
