use rclib::{Configuration, Error, Frame, FrameDecoder, Header, Resolution};

struct Vector {
    input: &'static [u8],
    header: Header,
    channel_count: u16,
    resolution: Resolution,
    routing_length: u8,
    channels: &'static [u16],
}

const VECTORS: &[Vector] = &[
    Vector {
        input: &[
            0xc9, 0x01, 0x00, 0x1d, 0x01, 0x08, 0x30, 0x00, 0x01, 0x05, 0x18, 0x70, 0x00, 0x02,
            0x4b, 0x93,
        ],
        header: Header::new(1, 0),
        channel_count: 8,
        resolution: Resolution::Steps1024,
        routing_length: 0,
        channels: &[1, 2, 3, 4, 5, 6, 7, 8],
    },
    // Padding bits in the last data byte are set and must be ignored
    Vector {
        input: &[0xc9, 0x01, 0x00, 0x12, 0x81, 0xb1, 0xec, 0x6f, 0xa0, 0x93],
        header: Header::new(1, 0),
        channel_count: 4,
        resolution: Resolution::Steps128,
        routing_length: 0,
        channels: &[1, 99, 50, 127],
    },
    Vector {
        input: &[
            0xc9, 0x01, 0x00, 0x16, 0x01, 0x18, 0x83, 0x0c, 0xfe, 0x60, 0x1f, 0x93,
        ],
        header: Header::new(1, 0),
        channel_count: 4,
        resolution: Resolution::Steps2048,
        routing_length: 0,
        channels: &[1, 99, 50, 127],
    },
    Vector {
        input: &[0xc9, 0x03, 0x00, 0x92, 0x03, 0x81, 0xb1, 0xec, 0x8f, 0xc1, 0x93],
        header: Header::new(3, 0),
        channel_count: 4,
        resolution: Resolution::Steps128,
        routing_length: 3,
        channels: &[1, 99, 50, 127],
    },
    Vector {
        input: &[
            0xc9, 0x00, 0x00, 0x17, 0xff, 0x4f, 0x06, 0x00, 0xf2, 0xff, 0xac, 0x93,
        ],
        header: Header::new(0, 0),
        channel_count: 4,
        resolution: Resolution::Steps4096,
        routing_length: 0,
        channels: &[4095, 100, 512, 4095],
    },
];

fn expected_frame(vector: &Vector) -> Frame {
    let config = Configuration::new(vector.channel_count, vector.resolution)
        .unwrap()
        .with_routing(vector.routing_length, &[])
        .unwrap();
    Frame::new(vector.header, config, vector.channels.to_vec()).unwrap()
}

#[test]
fn reference_vectors_decode() {
    for vector in VECTORS {
        let mut decoder = FrameDecoder::new();
        let mut complete = false;
        for (position, &byte) in vector.input.iter().enumerate() {
            complete = decoder.decode(byte).unwrap_or_else(|err| {
                panic!("error {err} at byte {position} of {:02x?}", vector.input)
            });
            if complete {
                assert_eq!(position, vector.input.len() - 1);
                break;
            }
        }

        assert!(complete, "vector {:02x?} did not complete", vector.input);
        assert_eq!(decoder.frame(), &expected_frame(vector));
    }
}

#[test]
fn reference_vector_encodes_exactly() {
    let vector = &VECTORS[4];
    assert_eq!(expected_frame(vector).encode(), vector.input);
}

#[test]
fn reencoded_vectors_decode_identically() {
    for vector in VECTORS {
        let frame = expected_frame(vector);
        let mut decoder = FrameDecoder::new();
        let decoded = frame
            .encode()
            .into_iter()
            .find_map(|byte| decoder.push(byte).unwrap());
        assert_eq!(decoded, Some(frame));
    }
}

#[test]
fn every_single_bit_flip_in_data_is_detected() {
    let vector = &VECTORS[0];
    // start, uid, tid, config | data | checksum, end
    for offset in 4..vector.input.len() - 2 {
        for bit in 0..8 {
            let mut corrupted = vector.input.to_vec();
            corrupted[offset] ^= 1 << bit;

            let mut decoder = FrameDecoder::new();
            let outcome = corrupted
                .iter()
                .map(|&byte| decoder.decode(byte))
                .find(|result| !matches!(result, Ok(false)));
            assert!(
                matches!(outcome, Some(Err(Error::ChecksumMismatch { .. }))),
                "flip of bit {bit} at offset {offset} went undetected"
            );
        }
    }
}
