//! Symbol mapper benchmarks
//!
//! Run with: cargo bench -p symmap-fpga --bench mapper_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use symmap_fpga::logging::{init_logging, LogConfig};
use symmap_fpga::{mapper, MapperConfig, Scheme};

fn bench_table_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_lookup");

    for scheme in Scheme::ALL {
        group.throughput(Throughput::Elements(scheme.order() as u64));
        group.bench_with_input(BenchmarkId::new("map_bits", scheme.name()), &scheme, |b, &scheme| {
            b.iter(|| {
                for bits in 0..scheme.order() as u32 {
                    black_box(mapper::map_bits(scheme, black_box(bits)).pack());
                }
            })
        });
    }

    group.finish();
}

fn bench_register_sequence(c: &mut Criterion) {
    // Poll timeouts only, unless RUST_LOG says otherwise
    init_logging(&LogConfig::default());

    let mut group = c.benchmark_group("register_sequence");

    for latency in [1u32, 2, 5] {
        let config = MapperConfig::default().latency(latency);
        let mut driver = symmap_fpga::simulated(config).unwrap();
        let bits: Vec<bool> = (0..1024).map(|i| (i * 7) % 3 == 0).collect();

        group.throughput(Throughput::Elements((bits.len() / 4) as u64));
        group.bench_with_input(BenchmarkId::new("qam16_map_bits", latency), &bits, |b, bits| {
            b.iter(|| {
                driver.reset().unwrap();
                black_box(driver.map_bits(Scheme::Qam16, bits).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_table_lookup, bench_register_sequence);
criterion_main!(benches);
