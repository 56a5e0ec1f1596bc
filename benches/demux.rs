//! Benchmarks for the per-buffer demux path
//!
//! Measures header parsing plus payload copies at common frame sizes.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mltshm_proto::{
    split, AudioFormat, Caps, CombinedBuffer, DemuxSettings, Demuxer, FlowStatus, Header, ImageFormat,
    MediaBuffer, OutputChannel,
};

/// Channel that discards everything.
struct Discard;

impl OutputChannel for Discard {
    fn announce(&self, _caps: &Caps) {}

    fn push(&self, unit: MediaBuffer) -> FlowStatus {
        black_box(unit);
        FlowStatus::Ok
    }
}

fn frame(width: u32, height: u32) -> (Header, CombinedBuffer) {
    let image_size = width * height * 2;
    let audio_size = 1920 * 2 * 2;
    let header = Header {
        frame: 0,
        frame_rate_num: 25,
        frame_rate_den: 1,
        image_size,
        image_format: ImageFormat::Yuv422,
        width,
        height,
        audio_size,
        audio_format: AudioFormat::S16,
        frequency: 48000,
        channels: 2,
        samples: 1920,
    };
    let mut data = header.to_bytes().to_vec();
    data.resize(data.len() + (image_size + audio_size) as usize, 0x5a);
    (header, CombinedBuffer::new(Bytes::from(data)))
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");

    for (name, width, height) in [("sd", 720, 576), ("hd", 1280, 720), ("fhd", 1920, 1080)] {
        let (header, buffer) = frame(width, height);
        group.throughput(Throughput::Bytes(buffer.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &buffer, |b, buffer| {
            b.iter(|| split(black_box(&header), black_box(buffer)).unwrap())
        });
    }

    group.finish();
}

fn bench_process(c: &mut Criterion) {
    let (_, buffer) = frame(1920, 1080);
    let demuxer = Demuxer::new(DemuxSettings::default());

    c.bench_function("process_fhd", |b| {
        b.iter(|| demuxer.process(black_box(&buffer), &Discard, &Discard).unwrap())
    });
}

criterion_group!(benches, bench_split, bench_process);
criterion_main!(benches);
