use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use knvectis::{
    depth_signal, object_traverser, Engine, Forest, Handle, Hunter, Node, ObjectKind, ObjectRef,
    RelationshipType, TraversalConfig, TraversalMode,
};

/// Tree with `branches` branches, each holding `leaves` leaves; every leaf
/// links to the first leaf of the next branch.
fn synthetic_forest(branches: usize, leaves: usize) -> (Arc<Forest>, Handle) {
    let mut forest = Forest::new();
    let root = forest.create(ObjectKind::Tree, "root").expect("root");
    let mut firsts = Vec::with_capacity(branches);
    let mut all = Vec::with_capacity(branches * leaves);
    for b in 0..branches {
        let branch = forest
            .add(root, ObjectKind::Branch, format!("branch-{b}"))
            .expect("branch");
        for l in 0..leaves {
            let leaf = forest
                .add(branch, ObjectKind::Leaf, format!("leaf-{b}-{l}"))
                .expect("leaf");
            if l == 0 {
                firsts.push(leaf);
            }
            all.push((b, leaf));
        }
    }
    for (b, leaf) in all {
        let target = firsts[(b + 1) % branches];
        if target != leaf {
            forest
                .link(leaf, target, RelationshipType::References)
                .expect("link");
        }
    }
    (forest.share(), root)
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");
    let traverser = object_traverser(TraversalConfig::default()).expect("traverser");

    for &(branches, leaves) in &[(10, 10), (50, 40), (100, 100)] {
        let (forest, root) = synthetic_forest(branches, leaves);
        let start = ObjectRef::new(&forest, root).expect("root");
        let nodes = 1 + branches + branches * leaves;
        group.throughput(Throughput::Elements(nodes as u64));

        for mode in [
            TraversalMode::Forward,
            TraversalMode::Custom {
                children: true,
                parent: true,
                lateral: true,
            },
        ] {
            group.bench_with_input(BenchmarkId::new(mode.label(), nodes), &start, |b, start| {
                b.iter(|| {
                    let visited = traverser
                        .traverse(black_box(start.clone()), mode)
                        .expect("traverse")
                        .count();
                    black_box(visited)
                })
            });
        }
    }

    group.finish();
}

fn bench_hunt(c: &mut Criterion) {
    let mut group = c.benchmark_group("hunt");
    let (forest, root) = synthetic_forest(50, 40);
    let start = ObjectRef::new(&forest, root).expect("root");

    let engine = Engine::new(object_traverser(TraversalConfig::default()).expect("traverser"))
        .hunter(
            Hunter::new("leaves", |node: &ObjectRef| node.is_leaf())
                .with_scorer(|node: &ObjectRef| node.name().len() as f64)
                .on_match(depth_signal),
        )
        .hunter(Hunter::new("first-leaves", |node: &ObjectRef| {
            node.name().ends_with("-0")
        }));

    group.bench_function("collect_all", |b| {
        b.iter(|| {
            let found = engine
                .collect(black_box(start.clone()), TraversalMode::Forward)
                .expect("hunt");
            black_box(found.len())
        })
    });

    group.bench_function("first_match", |b| {
        b.iter(|| {
            let first = engine
                .run(black_box(start.clone()), TraversalMode::Forward)
                .expect("hunt")
                .next();
            black_box(first.is_some())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_traversal, bench_hunt);
criterion_main!(benches);
