// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! End-to-end behavior of `StreamBuffer` as seen by an encoder/decoder pair.

use streambuf::{Error, GrowthPolicy, StreamBuffer, position};

/// Capacity, end of data and cursor, captured for before/after comparisons.
fn snapshot(buffer: &StreamBuffer<'_>) -> (usize, usize, usize) {
    (buffer.capacity(), buffer.len(), buffer.position().unwrap())
}

#[test]
fn written_bytes_read_back_in_order() {
    let chunks: [&[u8]; 5] = [b"a", b"", b"bcd", b"efghijklmnop", b"q"];
    let mut buffer = StreamBuffer::new(GrowthPolicy::growable(3).with_max_size(64));

    let mut expected = Vec::new();
    for chunk in chunks {
        let before = buffer.position().unwrap();

        buffer.write(chunk).unwrap();
        expected.extend_from_slice(chunk);

        let after = buffer.position().unwrap();
        assert_eq!(after, before + chunk.len());
        assert!(buffer.len() >= after);
        assert_eq!(buffer.data().unwrap(), expected.as_slice());
    }

    buffer.set_position(position::START).unwrap();

    let mut actual = Vec::new();
    let mut scratch = [0_u8; 4];
    loop {
        let count = buffer.read(&mut scratch).unwrap();
        if count == 0 {
            break;
        }
        actual.extend_from_slice(&scratch[..count]);
    }

    assert_eq!(actual, expected);
}

#[test]
fn growth_in_blocks_up_to_max_size() {
    let mut buffer = StreamBuffer::new(GrowthPolicy::growable(4).with_max_size(10));
    assert_eq!(snapshot(&buffer), (0, 0, 0));

    buffer.write(&[1, 2, 3]).unwrap();
    assert_eq!(snapshot(&buffer), (4, 3, 3));

    buffer.write(&[4, 5, 6]).unwrap();
    assert_eq!(snapshot(&buffer), (8, 6, 6));

    // 6 + 5 = 11 bytes would be needed but the buffer may never exceed 10.
    let before = snapshot(&buffer);
    assert_eq!(
        buffer.write(&[7, 8, 9, 10, 11]),
        Err(Error::BufferFull { requested: 11, max: 10 })
    );
    assert_eq!(snapshot(&buffer), before);
    assert_eq!(buffer.data().unwrap(), &[1, 2, 3, 4, 5, 6]);

    // A write that fits within the ceiling is capped at it rather than rounded up to a block.
    buffer.write(&[7, 8, 9, 10]).unwrap();
    assert_eq!(snapshot(&buffer), (10, 10, 10));
}

#[test]
fn fixed_buffer_never_truncates() {
    let mut buffer = StreamBuffer::with_capacity(8, GrowthPolicy::fixed()).unwrap();
    buffer.write(b"12345").unwrap();

    let before = snapshot(&buffer);
    assert_eq!(
        buffer.write(b"6789"),
        Err(Error::BufferFull { requested: 9, max: 8 })
    );
    assert_eq!(snapshot(&buffer), before);
    assert_eq!(buffer.data().unwrap(), b"12345");
}

#[test]
fn set_empty_then_reuse_from_start() {
    let mut buffer = StreamBuffer::new(GrowthPolicy::growable(16));
    buffer.write(b"first message").unwrap();

    buffer.set_empty().unwrap();
    assert!(buffer.is_empty());
    assert_eq!(buffer.capacity(), 16);

    buffer.write(b"second").unwrap();
    buffer.set_position(position::START).unwrap();

    let mut out = [0_u8; 16];
    let count = buffer.read(&mut out).unwrap();
    assert_eq!(&out[..count], b"second");
}

#[test]
fn borrowed_memory_survives_deletion() {
    let mut memory = *b"0123456789";

    {
        let mut slot = Some(StreamBuffer::borrowed(&mut memory, GrowthPolicy::fixed()).unwrap());

        let buffer = slot.as_mut().unwrap();
        assert!(!buffer.owns_storage());
        assert_eq!(buffer.data().unwrap(), b"0123456789");

        buffer.skip(2).unwrap();
        buffer.write(b"ab").unwrap();

        StreamBuffer::delete(&mut slot);
        assert!(slot.is_none());
    }

    // Still ours, with the write that went into it.
    assert_eq!(&memory, b"01ab456789");
}

#[test]
fn borrowed_memory_is_left_behind_on_growth() {
    let mut memory = *b"abcd";

    let grown = {
        let mut buffer = StreamBuffer::borrowed(&mut memory, GrowthPolicy::growable(4)).unwrap();
        buffer.set_position(position::END).unwrap();

        buffer.write(b"efgh").unwrap();

        assert!(buffer.owns_storage());
        assert_eq!(buffer.capacity(), 8);
        buffer.into_vec().unwrap()
    };

    assert_eq!(grown, b"abcdefgh");
    assert_eq!(&memory, b"abcd");
}

#[test]
fn borrowed_memory_respects_max_size() {
    let mut memory = [0_u8; 8];

    let result = StreamBuffer::borrowed(&mut memory, GrowthPolicy::growable(4).with_max_size(4));

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn end_sentinel_tracks_end_of_data() {
    let mut buffer = StreamBuffer::with_capacity(32, GrowthPolicy::fixed()).unwrap();
    buffer.write(b"header").unwrap();

    // Come back later to patch the header, then continue appending at the end.
    buffer.set_position(position::START).unwrap();
    buffer.write(b"HEADER").unwrap();
    buffer.set_position(position::END).unwrap();
    buffer.write(b"+body").unwrap();

    assert_eq!(buffer.data().unwrap(), b"HEADER+body");
}

#[test]
fn decoder_skips_unknown_fields() {
    let mut buffer = StreamBuffer::new(GrowthPolicy::growable(32));

    // Each field: u8 tag, u16 length, payload.
    for (tag, payload) in [(1_u8, &b"known"[..]), (9, &b"ignored"[..]), (2, &b"also known"[..])] {
        buffer.write_byte(tag).unwrap();
        buffer.write_num_be(u16::try_from(payload.len()).unwrap()).unwrap();
        buffer.write(payload).unwrap();
    }

    buffer.set_position(position::START).unwrap();

    let mut known = Vec::new();
    while buffer.remaining() > 0 {
        let tag = buffer.read_byte().unwrap();
        let len = usize::from(buffer.read_num_be::<u16>().unwrap());

        if tag == 9 {
            buffer.skip(len).unwrap();
            continue;
        }

        let mut payload = vec![0; len];
        assert_eq!(buffer.read(&mut payload).unwrap(), len);
        known.push(payload);
    }

    assert_eq!(known, [b"known".to_vec(), b"also known".to_vec()]);
    assert_eq!(buffer.skip(1), Err(Error::OutOfRange { requested: 32, limit: 31 }));
}

#[test]
fn clear_then_reinitialize() {
    let mut buffer = StreamBuffer::from_vec(b"old".to_vec(), GrowthPolicy::growable(8)).unwrap();

    buffer.clear().unwrap();
    assert_eq!(snapshot(&buffer), (0, 0, 0));
    assert_eq!(buffer.write(b"x"), Err(Error::BufferFull { requested: 1, max: 0 }));

    buffer.initialize(Vec::<u8>::new(), GrowthPolicy::growable(8)).unwrap();
    buffer.write(b"new").unwrap();
    assert_eq!(buffer.data().unwrap(), b"new");
}
