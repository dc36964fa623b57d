use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use idxfile::channel::{spawn_record_channel, ChannelConfig};
use idxfile::{Element, ElementType, IdxReader, IdxWriter};
use std::io::Cursor;

/// Build an in-memory file of `count` records of `len` elements
fn generate_file<T: Element>(count: u32, len: u32, value: T) -> Vec<u8> {
    let mut writer = IdxWriter::new(Vec::new(), T::ELEMENT_TYPE, vec![count, len]).unwrap();
    let record = vec![value; len as usize];
    for _ in 0..count {
        writer.write(&record).unwrap();
    }
    writer.finish_into_inner().unwrap().0
}

fn bench_typed_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_read");

    for element_type in [ElementType::U8, ElementType::I32, ElementType::F32, ElementType::F64] {
        let bytes = match element_type {
            ElementType::U8 => generate_file(1_000, 784, 7u8),
            ElementType::I32 => generate_file(1_000, 784, -7i32),
            ElementType::F32 => generate_file(1_000, 784, 0.5f32),
            _ => generate_file(1_000, 784, 0.25f64),
        };
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(element_type),
            &bytes,
            |b, bytes| {
                b.iter(|| {
                    let mut reader = IdxReader::open(Cursor::new(bytes.as_slice())).unwrap();
                    let mut total = 0usize;
                    while !reader.is_exhausted() {
                        total += match element_type {
                            ElementType::U8 => reader.read_u8().unwrap().len(),
                            ElementType::I32 => reader.read_i32().unwrap().len(),
                            ElementType::F32 => reader.read_f32().unwrap().len(),
                            _ => reader.read_f64().unwrap().len(),
                        };
                    }
                    black_box(total)
                });
            },
        );
    }

    group.finish();
}

fn bench_raw_reads(c: &mut Criterion) {
    let bytes = generate_file(10_000, 784, 1u8);
    let mut group = c.benchmark_group("raw_read");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("mnist_like", |b| {
        b.iter(|| {
            let mut reader = IdxReader::open(Cursor::new(bytes.as_slice())).unwrap();
            let count = reader.raw_records().filter(|r| r.is_ok()).count();
            black_box(count)
        });
    });

    group.finish();
}

fn bench_channel(c: &mut Criterion) {
    let bytes = generate_file(10_000, 784, 1u8);
    let mut group = c.benchmark_group("record_channel");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    for capacity in [1usize, 16, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let reader = IdxReader::open(Cursor::new(bytes.clone())).unwrap();
                    let channel =
                        spawn_record_channel::<_, u8>(reader, ChannelConfig { capacity }).unwrap();
                    black_box(channel.filter(|r| r.is_ok()).count())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_typed_reads, bench_raw_reads, bench_channel);
criterion_main!(benches);
