use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rclib::{Configuration, Frame, FrameDecoder, Header, Resolution};

fn frame(channel_count: u16, resolution: Resolution) -> Frame {
    let config = Configuration::new(channel_count, resolution).unwrap();
    let max = resolution.max_value();
    let channels: Vec<u16> = (0..channel_count).map(|i| i.wrapping_mul(37) & max).collect();
    Frame::new(Header::new(1, 1), config, channels).unwrap()
}

fn decode(decoder: &mut FrameDecoder, bytes: &[u8]) -> Option<Frame> {
    bytes.iter().find_map(|&byte| decoder.push(byte).unwrap())
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    // Typical RC link: 8 channels at 1024 steps
    let small = frame(8, Resolution::Steps1024);
    group.throughput(Throughput::Bytes(small.encoded_len() as u64));
    group.bench_function("encode_8ch", |b| {
        b.iter(|| {
            black_box(small.encode());
        });
    });

    // Largest frame: 256 channels at 4096 steps
    let large = frame(256, Resolution::Steps4096);
    group.throughput(Throughput::Bytes(large.encoded_len() as u64));
    group.bench_function("encode_256ch", |b| {
        b.iter(|| {
            black_box(large.encode());
        });
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let small = frame(8, Resolution::Steps1024).encode();
    group.throughput(Throughput::Bytes(small.len() as u64));
    group.bench_function("decode_8ch", |b| {
        let mut decoder = FrameDecoder::new();
        b.iter(|| {
            black_box(decode(&mut decoder, &small).unwrap());
        });
    });

    let large = frame(256, Resolution::Steps4096).encode();
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("decode_256ch", |b| {
        let mut decoder = FrameDecoder::new();
        b.iter(|| {
            black_box(decode(&mut decoder, &large).unwrap());
        });
    });

    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let msg = frame(16, Resolution::Steps2048);
    group.throughput(Throughput::Bytes(msg.encoded_len() as u64));
    group.bench_function("roundtrip_16ch", |b| {
        let mut decoder = FrameDecoder::new();
        b.iter(|| {
            let encoded = msg.encode();
            black_box(decode(&mut decoder, &encoded).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_roundtrip);
criterion_main!(benches);
