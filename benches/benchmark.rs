// Copyright 2025 crcfold Project Authors. Licensed under MIT or Apache-2.0.

use criterion::*;
use rand::{thread_rng, RngCore};

fn bench_crc32(c: &mut Criterion) {
    let mut group = c.benchmark_group("CRC32");
    let mut rng = thread_rng();

    for &size in &[8, 12, 16] {
        let mut buf = vec![0u8; 3 << size];
        rng.fill_bytes(&mut buf);

        group.throughput(Throughput::Bytes(3 << size));
        group.bench_with_input(BenchmarkId::new("crc/crc32", size), &buf, |b, buf| {
            let checker = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);
            b.iter(|| {
                let mut digest = checker.digest();
                digest.update(&buf[..(1 << size)]);
                digest.update(&buf[(1 << size)..(2 << size)]);
                digest.update(&buf[(2 << size)..]);
                digest.finalize()
            })
        });
        group.bench_with_input(BenchmarkId::new("crcfold/crc32", size), &buf, |b, buf| {
            b.iter(|| {
                let mut crc = crcfold::crc32(&buf[..(1 << size)], 0);
                crc = crcfold::crc32(&buf[(1 << size)..(2 << size)], crc);
                crcfold::crc32(&buf[(2 << size)..], crc)
            })
        });
        group.bench_with_input(BenchmarkId::new("crcfold/crc32c", size), &buf, |b, buf| {
            b.iter(|| {
                let mut crc = crcfold::crc32c(&buf[..(1 << size)], 0);
                crc = crcfold::crc32c(&buf[(1 << size)..(2 << size)], crc);
                crcfold::crc32c(&buf[(2 << size)..], crc)
            })
        });
    }
    group.finish();
}

fn bench_crc64(c: &mut Criterion) {
    let mut group = c.benchmark_group("CRC64");
    let mut rng = thread_rng();

    for &size in &[8, 12, 16] {
        let mut buf = vec![0u8; 3 << size];
        rng.fill_bytes(&mut buf);

        group.throughput(Throughput::Bytes(3 << size));
        group.bench_with_input(BenchmarkId::new("crc/crc64_xz", size), &buf, |b, buf| {
            let checker = crc::Crc::<u64>::new(&crc::CRC_64_XZ);
            b.iter(|| {
                let mut digest = checker.digest();
                digest.update(&buf[..(1 << size)]);
                digest.update(&buf[(1 << size)..(2 << size)]);
                digest.update(&buf[(2 << size)..]);
                digest.finalize()
            })
        });
        group.bench_with_input(BenchmarkId::new("crcfold/crc64_xz", size), &buf, |b, buf| {
            b.iter(|| {
                let mut crc = crcfold::crc64_xz(&buf[..(1 << size)], 0);
                crc = crcfold::crc64_xz(&buf[(1 << size)..(2 << size)], crc);
                crcfold::crc64_xz(&buf[(2 << size)..], crc)
            })
        });
        group.bench_with_input(
            BenchmarkId::new("crcfold/crc64_nvme", size),
            &buf,
            |b, buf| {
                b.iter(|| {
                    let mut crc = crcfold::crc64_nvme(&buf[..(1 << size)], 0);
                    crc = crcfold::crc64_nvme(&buf[(1 << size)..(2 << size)], crc);
                    crcfold::crc64_nvme(&buf[(2 << size)..], crc)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_crc32, bench_crc64);
criterion_main!(benches);
