// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Basics of working with `StreamBuffer`.
//!
//! 1. We encode a message into a growable buffer.
//! 2. We hand the encoded bytes to a "transport" without copying them.
//! 3. We decode the message from a buffer wrapped around the received bytes.

use streambuf::{GrowthPolicy, StreamBuffer};

const MESSAGE_TYPE_HELLO: u8 = 1;

fn main() -> streambuf::Result<()> {
    let encoded = produce_message("Hello, stream!")?;
    println!("Encoded message is {} bytes long.", encoded.len());

    consume_message(encoded)?;
    Ok(())
}

fn produce_message(text: &str) -> streambuf::Result<Vec<u8>> {
    // Grow in small steps so we can see growth happen, but never beyond 1 KB.
    let mut buffer = StreamBuffer::new(GrowthPolicy::growable(8).with_max_size(1024));

    buffer.write_byte(MESSAGE_TYPE_HELLO)?;

    let len = u32::try_from(text.len()).map_err(|_e| streambuf::Error::InvalidArgument("text too long"))?;
    buffer.write_num_be(len)?;
    buffer.write(text.as_bytes())?;

    println!(
        "Wrote {} bytes, storage grew to {} bytes of capacity.",
        buffer.len(),
        buffer.capacity()
    );

    buffer.into_vec()
}

fn consume_message(mut received: Vec<u8>) -> streambuf::Result<()> {
    // The received bytes stay ours; the buffer only borrows them for decoding.
    let mut buffer = StreamBuffer::borrowed(&mut received, GrowthPolicy::fixed())?;

    let message_type = buffer.read_byte()?;
    let len = usize::try_from(buffer.read_num_be::<u32>()?)
        .map_err(|_e| streambuf::Error::InvalidArgument("text too long"))?;

    let mut text = vec![0; len];
    let read = buffer.read(&mut text)?;

    println!(
        "Received message of type {message_type} with {read} bytes of text: {}",
        String::from_utf8_lossy(&text)
    );

    Ok(())
}
