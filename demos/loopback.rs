//! Loopback example: encode frames on one thread, decode them on another

use std::sync::mpsc;
use std::thread;

use rclib::{Configuration, Frame, Resolution, UidGenerator, decode_channel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("rclib loopback example");
    println!("======================\n");

    let uids = UidGenerator::new();
    let config = Configuration::new(8, Resolution::Steps1024)?.with_routing(2, &[0x10])?;

    let (byte_tx, byte_rx) = mpsc::channel();
    let (frame_tx, frame_rx) = mpsc::channel();
    let decoder = thread::spawn(move || decode_channel(byte_rx, frame_tx));

    for step in 0..4u16 {
        let channels: Vec<u16> = (0..8).map(|axis| (axis * 128 + step * 16) % 1024).collect();
        let frame = Frame::new(uids.header(0x01), config.clone(), channels)?;
        let encoded = frame.encode();
        println!("sent uid={} as {} bytes: {encoded:02x?}", frame.uid(), encoded.len());

        for byte in encoded {
            byte_tx.send(byte)?;
        }
    }
    drop(byte_tx);

    for frame in frame_rx {
        println!(
            "received uid={} routing={} channels={:?}",
            frame.uid(),
            frame.config().routing_length(),
            frame.channels()
        );
    }

    let stats = decoder.join().map_err(|_| "decoder thread panicked")?;
    println!(
        "\n{} frames decoded from {} bytes, {} dropped",
        stats.frames_decoded,
        stats.bytes_received,
        stats.frames_dropped()
    );

    Ok(())
}
