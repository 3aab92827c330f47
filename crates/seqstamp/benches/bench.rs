use chrono::{DateTime, Utc};
use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use seqstamp::{
    Clock, CompactReadExt, CompactWriteExt, ENCODED_LEN, IdGenerator, MonotonicTimestamp,
    SystemClock, ThreadRandom, TimestampGenerator, TimestampSequencer, UniqueIdGenerator,
};
use std::{
    io::Cursor,
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

#[derive(Clone, Copy)]
struct FixedMockTime {
    secs: i64,
}

impl Clock for FixedMockTime {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.secs, 0).unwrap_or_default()
    }
}

// Number of values generated per benchmark iteration (split across threads
// for multi-threaded runs).
const TOTAL_IDS: usize = 4096;

/// Benchmarks a timestamp generator on a single thread.
fn bench_timestamps<G>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: TimestampGenerator,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    if let Ok(ts) = generator.next_now() {
                        black_box(ts);
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks an ID generator on a single thread.
fn bench_ids<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
    next: impl Fn(&G),
) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    next(&generator);
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one generator shared across threads.
fn bench_contended<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn() -> G,
    next: impl Fn(&G) + Sync,
) where
    G: Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{}/threads/{}", TOTAL_IDS, thread_count),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let generator = Arc::new(generator_fn());
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let generator = Arc::clone(&generator);
                                let barrier = Arc::clone(&barrier);
                                let next = &next;
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        next(&generator);
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

fn next_timestamp<G: TimestampGenerator>(generator: &G) {
    if let Ok(ts) = generator.next_now() {
        black_box(ts);
    }
}

// --- MOCK CLOCK (every call after the first bumps the uniquifier) ---

fn benchmark_mock_sequential_sequencer(c: &mut Criterion) {
    bench_timestamps(c, "mock/sequential/sequencer", || {
        TimestampSequencer::new(FixedMockTime { secs: 1 })
    });
}

fn benchmark_mock_contended_sequencer(c: &mut Criterion) {
    bench_contended(
        c,
        "mock/contended/sequencer",
        || TimestampSequencer::new(FixedMockTime { secs: 1 }),
        next_timestamp,
    );
}

// --- SYSTEM CLOCK ---

fn benchmark_system_sequential_sequencer(c: &mut Criterion) {
    bench_timestamps(c, "system/sequential/sequencer", || {
        TimestampSequencer::new(SystemClock)
    });
}

fn benchmark_system_contended_sequencer(c: &mut Criterion) {
    bench_contended(
        c,
        "system/contended/sequencer",
        || TimestampSequencer::new(SystemClock),
        next_timestamp,
    );
}

// --- UNIQUE IDS ---

fn benchmark_sequential_next_long(c: &mut Criterion) {
    bench_ids(c, "ids/sequential/next_long", UniqueIdGenerator::<ThreadRandom>::default, |g| {
        black_box(g.next_long());
    });
}

fn benchmark_sequential_fill_next_utf8(c: &mut Criterion) {
    bench_ids(c, "ids/sequential/fill_next_utf8", UniqueIdGenerator::<ThreadRandom>::default, |g| {
        let mut buf = [0_u8; ENCODED_LEN];
        if g.fill_next_utf8(&mut buf).is_ok() {
            black_box(buf);
        }
    });
}

fn benchmark_sequential_next_string(c: &mut Criterion) {
    bench_ids(c, "ids/sequential/next_string", UniqueIdGenerator::<ThreadRandom>::default, |g| {
        black_box(IdGenerator::next_string(g));
    });
}

fn benchmark_contended_next_long(c: &mut Criterion) {
    bench_contended(c, "ids/contended/next_long", UniqueIdGenerator::<ThreadRandom>::default, |g| {
        black_box(g.next_long());
    });
}

// --- COMPACT CODEC ---

fn benchmark_compact_timestamp(c: &mut Criterion) {
    let ts = MonotonicTimestamp::new(Utc::now(), 7);
    let mut group = c.benchmark_group("compact/timestamp");
    group.throughput(Throughput::Elements(1));

    group.bench_function("write_to", |b| {
        let mut buf = Vec::with_capacity(32);
        b.iter(|| {
            buf.clear();
            if ts.write_to(&mut buf).is_ok() {
                black_box(&buf);
            }
        });
    });

    let mut encoded = Vec::new();
    if ts.write_to(&mut encoded).is_ok() {
        group.bench_function("read_from", |b| {
            b.iter(|| black_box(MonotonicTimestamp::read_from(&mut Cursor::new(&encoded))));
        });
    }

    group.bench_function("small_i64", |b| {
        let mut buf = Vec::with_capacity(16);
        b.iter(|| {
            buf.clear();
            if buf.write_small(black_box(-1_234_567_i64)).is_ok() {
                black_box(Cursor::new(&buf).read_small::<i64>().ok());
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    // Mock clock
    benchmark_mock_sequential_sequencer,
    benchmark_mock_contended_sequencer,
    // System clock
    benchmark_system_sequential_sequencer,
    benchmark_system_contended_sequencer,
    // Unique ids
    benchmark_sequential_next_long,
    benchmark_sequential_fill_next_utf8,
    benchmark_sequential_next_string,
    benchmark_contended_next_long,
    // Codec
    benchmark_compact_timestamp,
);
criterion_main!(benches);
