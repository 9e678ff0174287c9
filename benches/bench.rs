use std::collections::VecDeque;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bstree::Tree;

/// Emits `0..len` midpoint-first, so inserting in the returned order builds
/// a tree of minimal height. Insertion order is the only balancing the tree
/// gets.
fn balanced_order(len: usize) -> Vec<i32> {
    let mut values = Vec::with_capacity(len);
    let mut ranges = VecDeque::from([0..len]);
    while let Some(range) = ranges.pop_front() {
        if range.is_empty() {
            continue;
        }
        let mid = range.start + (range.end - range.start) / 2;
        values.push(mid as i32);
        ranges.push_back(range.start..mid);
        ranges.push_back(mid + 1..range.end);
    }

    values
}

/// Helper to bench a function on the tree.
/// It creates a group for the given name and closure and runs tests for
/// various tree sizes before finishing the group.
fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&mut Tree<i32>, i32)) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11, 15] {
        let num_nodes = 2usize.pow(num_levels as u32) - 1;
        let largest_element_in_tree = 2usize.pow(num_levels as u32) - 2;

        let tree: Tree<i32> = balanced_order(num_nodes).into_iter().collect();
        let id = BenchmarkId::from_parameter(largest_element_in_tree);

        group.bench_function(id, |b| {
            b.iter_custom(|iters| {
                let mut time = std::time::Duration::ZERO;
                for _ in 0..iters {
                    let mut tree = black_box(tree.clone());
                    let instant = std::time::Instant::now();
                    f(&mut tree, black_box(largest_element_in_tree as i32));
                    let elapsed = instant.elapsed();
                    time += elapsed;
                }
                time
            })
        });
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "find", |tree, i| {
        let _value = black_box(tree.find(&i).value().ok().copied());
    });
    bench_helper(c, "remove", |tree, i| {
        tree.find_mut(&i).remove_current().ok();
    });

    bench_helper(c, "insert", |tree, i| {
        tree.insert(i + 1);
    });

    bench_helper(c, "find-miss", |tree, i| {
        let _value = black_box(tree.find(&(i + 1)).value().ok().copied());
    });
    bench_helper(c, "remove-miss", |tree, i| {
        tree.find_mut(&(i + 1)).remove_current().ok();
    });

    bench_helper(c, "iterate", |tree, _i| {
        let _count = black_box(tree.iter().count());
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
