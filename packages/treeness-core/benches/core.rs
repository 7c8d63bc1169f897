use std::env;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use treeness_core::{Forest, Hierarchical, NodeId, Search};
use treeness_test_support::OrgUnit;

const CI_SIZES: &[usize] = &[100, 1_000];
const LOCAL_SIZES: &[usize] = &[10, 100, 1_000, 2_000];

fn is_ci() -> bool {
    env::var("CI").map(|v| v == "true").unwrap_or(false)
}

fn sizes() -> &'static [usize] {
    if is_ci() {
        CI_SIZES
    } else {
        LOCAL_SIZES
    }
}

fn unit(i: usize) -> OrgUnit {
    OrgUnit::new(&format!("n{i}"), &format!("Node {i}"))
}

/// Every node directly under one root.
fn wide(count: usize) -> (Forest<OrgUnit>, NodeId<OrgUnit>) {
    let mut forest = Forest::new();
    let root = forest.insert(unit(0));
    for i in 1..count {
        let child = forest.insert(unit(i));
        forest
            .add_child(root, child)
            .unwrap_or_else(|e| panic!("wide attach {i}: {e}"));
    }
    (forest, root)
}

/// Complete binary tree in breadth-first insertion order.
fn binary(count: usize) -> (Forest<OrgUnit>, NodeId<OrgUnit>) {
    let mut forest = Forest::new();
    let nodes: Vec<_> = (0..count).map(|i| forest.insert(unit(i))).collect();
    for i in 1..count {
        forest
            .set_parent(nodes[i], nodes[(i - 1) / 2])
            .unwrap_or_else(|e| panic!("binary attach {i}: {e}"));
    }
    (forest, nodes[0])
}

fn bench_attach(c: &mut Criterion) {
    let mut group = c.benchmark_group("attach");
    for &count in sizes() {
        group.bench_with_input(BenchmarkId::new("wide", count), &count, |b, &count| {
            b.iter(|| black_box(wide(count)))
        });
        group.bench_with_input(BenchmarkId::new("binary", count), &count, |b, &count| {
            b.iter(|| black_box(binary(count)))
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    for &count in sizes() {
        let (mut forest, root) = binary(count);
        let stray = forest.insert(unit(count));

        group.bench_with_input(BenchmarkId::new("as_node_list", count), &root, |b, &root| {
            b.iter(|| black_box(forest.as_node_list(root).unwrap()))
        });
        group.bench_with_input(
            BenchmarkId::new("contains_child_miss", count),
            &root,
            |b, &root| b.iter(|| black_box(forest.contains_child(root, stray, Search::recursive()))),
        );
        group.bench_with_input(
            BenchmarkId::new("map_by_property", count),
            &root,
            |b, &root| b.iter(|| black_box(forest.as_node_map_by_property(root, "id").unwrap())),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_attach, bench_queries);
criterion_main!(benches);
