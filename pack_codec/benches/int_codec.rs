use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pack_codec::{CodecOptions, Endian, Integer, integer};

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("integer_encode");
    for bytes in [4usize, 8, 16, 64] {
        let value = Integer::from(u64::MAX) * Integer::from(u64::MAX);
        let options = CodecOptions::new().with_bytes(bytes).with_endian(Endian::Little);
        group.bench_with_input(BenchmarkId::from_parameter(bytes), &bytes, |b, _| {
            b.iter(|| integer::encode(black_box(&value), black_box(&options)))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("integer_decode");
    for bytes in [4usize, 8, 16, 64] {
        let raw = vec![0xA5u8; bytes];
        group.bench_with_input(BenchmarkId::from_parameter(bytes), &raw, |b, raw| {
            b.iter(|| integer::decode_with(black_box(raw), Endian::Big, true))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
