//! 가용성 분류 벤치마크
//!
//! 백엔드 수에 따른 `classify()`와 `total_cost()` 성능을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use webassess_architecture::{
    ComputingResource, DatabaseResource, DistributedEngine, MachineShape, ServerlessPlatform,
    ServerlessService, VirtualMachine, classify, total_cost,
};

const REGIONS: [&str; 4] = ["us-central1", "europe-west1", "asia-northeast1", "us-east4"];

fn create_apps(count: usize) -> Vec<ComputingResource> {
    (0..count)
        .map(|i| {
            let region = REGIONS[i % REGIONS.len()];
            if i % 5 == 4 {
                ComputingResource::Serverless(ServerlessService {
                    id: format!("run-{i}"),
                    platform: ServerlessPlatform::CloudRun,
                    region: region.to_owned(),
                    cost: 12.5,
                })
            } else {
                ComputingResource::VirtualMachine(VirtualMachine {
                    id: format!("vm-{i}"),
                    region: region.to_owned(),
                    zone: format!("{region}-{}", ['a', 'b', 'c'][i % 3]),
                    shape: MachineShape {
                        cpus: 4,
                        memory_mib: 16384,
                        shared_core: false,
                    },
                    cost: 148.6,
                })
            }
        })
        .collect()
}

fn create_db() -> DatabaseResource {
    DatabaseResource::Distributed(DistributedEngine {
        id: "projects/bench/instances/orders".to_owned(),
        config: "projects/bench/instanceConfigs/nam3".to_owned(),
        processing_units: 1000,
        cost: 657.0,
    })
}

fn bench_classify(c: &mut Criterion) {
    let db = create_db();
    let mut group = c.benchmark_group("classify");

    for count in [1usize, 10, 100, 1000] {
        let apps = create_apps(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &apps, |b, apps| {
            b.iter(|| classify(black_box(apps), black_box(&db)));
        });
    }

    group.finish();
}

fn bench_total_cost(c: &mut Criterion) {
    let db = create_db();
    let apps = create_apps(1000);

    c.bench_function("total_cost_1000", |b| {
        b.iter(|| total_cost(black_box(&apps), black_box(&db)));
    });
}

criterion_group!(benches, bench_classify, bench_total_cost);
criterion_main!(benches);
