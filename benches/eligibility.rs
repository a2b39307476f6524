//! Benchmark for the pure eligibility stages
//!
//! Sized after a busy account: thousands of file systems per region.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::BTreeSet;
use storage_onboarding::domain::ports::{
    EfsFileSystem, FsxFileSystem, FsxFileSystemType, StorageVirtualMachine, Volume,
};
use storage_onboarding::onboarding::{
    join_ontap_resources, select_efs_candidates, select_fsx_candidates,
};

fn efs_inventory(n: usize) -> Vec<EfsFileSystem> {
    (0..n)
        .map(|i| EfsFileSystem {
            file_system_id: format!("fs-{:08x}", i),
            life_cycle_state: Some(if i % 7 == 0 { "creating" } else { "available" }.into()),
            name: None,
        })
        .collect()
}

fn fsx_inventory(n: usize) -> Vec<FsxFileSystem> {
    (0..n)
        .map(|i| FsxFileSystem {
            file_system_id: format!("fs-{:08x}", i),
            file_system_type: if i % 2 == 0 {
                FsxFileSystemType::Lustre
            } else {
                FsxFileSystemType::Ontap
            },
            lifecycle: Some("AVAILABLE".into()),
            vpc_id: Some(if i % 5 == 0 { "vpc-other" } else { "vpc-1" }.into()),
            storage_capacity: Some(1200),
        })
        .collect()
}

fn excluded(n: usize) -> BTreeSet<String> {
    (0..n).step_by(10).map(|i| format!("fs-{:08x}", i)).collect()
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("eligibility_selection");

    for size in [100usize, 1_000, 10_000] {
        let efs = efs_inventory(size);
        let fsx = fsx_inventory(size);
        let excluded = excluded(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("efs", size), &size, |b, _| {
            b.iter(|| select_efs_candidates(black_box(&efs), black_box(&excluded)).len());
        });

        group.bench_with_input(BenchmarkId::new("fsx", size), &size, |b, _| {
            b.iter(|| {
                select_fsx_candidates(black_box(&fsx), black_box(&excluded), "vpc-1")
                    .ontap
                    .len()
            });
        });
    }

    group.finish();
}

fn bench_ontap_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("ontap_join");

    for size in [100usize, 1_000] {
        let ids: Vec<String> = (0..size).map(|i| format!("fs-{:08x}", i)).collect();
        let svms: Vec<StorageVirtualMachine> = ids
            .iter()
            .map(|id| StorageVirtualMachine {
                file_system_id: id.clone(),
                storage_virtual_machine_id: Some(format!("svm-{}", id)),
                name: None,
                lifecycle: Some("CREATED".into()),
            })
            .collect();
        let volumes: Vec<Volume> = ids
            .iter()
            .flat_map(|id| {
                (0..4).map(move |v| Volume {
                    file_system_id: id.clone(),
                    volume_id: Some(format!("fsvol-{}-{}", id, v)),
                    name: None,
                    lifecycle: Some("CREATED".into()),
                    volume_type: Some("ONTAP".into()),
                })
            })
            .collect();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                join_ontap_resources(black_box(&ids), svms.clone(), volumes.clone()).len()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_selection, bench_ontap_join);
criterion_main!(benches);
