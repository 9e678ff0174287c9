use bstree::{Error, Tree};

use std::collections::VecDeque;

use crate::Op;

/// Applies a set of operations to a tree and a sorted vector.
/// This way we can ensure that, after a random smattering of inserts and
/// removals, the two hold the same multiset.
fn do_ops<T>(ops: &[Op<T>], tree: &mut Tree<T>, model: &mut Vec<T>)
where
    T: Ord + Clone + std::fmt::Debug,
{
    for op in ops {
        match op {
            Op::Insert(value) => {
                tree.insert(value.clone());
                // Ties go after their equals, same as the tree.
                let at = model.partition_point(|m| m <= value);
                model.insert(at, value.clone());
            }
            Op::Remove(value) => {
                let removed = tree.find_mut(value).remove_current().ok();
                let expected = model
                    .iter()
                    .position(|m| m == value)
                    .map(|at| model.remove(at));
                assert_eq!(removed, expected);
            }
        }
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut model = Vec::new();

    do_ops(&ops, &mut tree, &mut model);
    tree.iter().copied().collect::<Vec<_>>() == model
}

#[quickcheck]
fn iteration_is_always_sorted(xs: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();

    let mut expected = xs;
    expected.sort_unstable();
    tree.iter().copied().collect::<Vec<_>>() == expected
}

#[quickcheck]
fn reverse_iteration_matches_forward(xs: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();

    let forward: Vec<i8> = tree.iter().copied().collect();
    let mut backward: Vec<i8> = tree.iter().rev().copied().collect();
    backward.reverse();
    forward == backward
}

#[quickcheck]
fn len_counts_duplicates(xs: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();

    tree.len() == xs.len() && tree.is_empty() == xs.is_empty()
}

#[quickcheck]
fn contains_agrees_with_the_input(xs: Vec<i8>, needles: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();

    xs.iter().all(|x| tree.contains(x))
        && needles.iter().all(|n| tree.contains(n) == xs.contains(n))
}

#[quickcheck]
fn find_lands_on_an_equal_value(xs: Vec<i8>, needle: i8) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();

    let cursor = tree.find(&needle);
    if xs.contains(&needle) {
        cursor.value() == Ok(&needle)
    } else {
        cursor.is_end()
    }
}

#[quickcheck]
fn any_interleaving_of_the_two_ends_agrees_with_a_deque(xs: Vec<i8>, from_back: Vec<bool>) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();

    let mut expected = xs;
    expected.sort_unstable();
    let mut model: VecDeque<i8> = expected.into_iter().collect();

    let mut iter = tree.iter();
    for take_back in from_back {
        let (got, want) = if take_back {
            (iter.next_back().copied(), model.pop_back())
        } else {
            (iter.next().copied(), model.pop_front())
        };
        if got != want {
            return false;
        }
    }

    iter.copied().collect::<Vec<_>>() == Vec::from(model)
}

#[quickcheck]
fn removal_leaves_the_cursor_at_the_next_value(xs: Vec<i8>, at: usize) -> bool {
    if xs.is_empty() {
        return true;
    }
    let at = at % xs.len();
    let mut tree: Tree<i8> = xs.iter().copied().collect();

    let mut expected = xs;
    expected.sort_unstable();

    // Walk to the `at`-th value in order and remove it there.
    let mut cursor = tree.first_mut();
    for _ in 0..at {
        cursor.move_next();
    }
    if cursor.remove_current() != Ok(expected[at]) {
        return false;
    }
    let at_successor = cursor.value().ok().copied();
    drop(cursor);

    expected.remove(at);
    at_successor == expected.get(at).copied()
        && tree.iter().copied().collect::<Vec<_>>() == expected
}

#[quickcheck]
fn draining_from_the_front_sorts(xs: Vec<i8>) -> bool {
    let mut tree: Tree<i8> = xs.iter().copied().collect();

    let mut drained = Vec::new();
    let mut cursor = tree.first_mut();
    loop {
        match cursor.remove_current() {
            Ok(value) => drained.push(value),
            Err(Error::RemoveAtEnd) => break,
            Err(_) => return false,
        }
    }
    drop(cursor);

    let mut expected = xs;
    expected.sort_unstable();
    drained == expected && tree.is_empty()
}

#[quickcheck]
fn clone_is_detached_from_the_source(xs: Vec<i8>) -> bool {
    let source: Tree<i8> = xs.iter().copied().collect();
    let mut copy = source.clone();

    let mut cursor = copy.first_mut();
    while cursor.remove_current().is_ok() {}
    drop(cursor);

    let mut expected = xs;
    expected.sort_unstable();
    copy.is_empty() && source.iter().copied().collect::<Vec<_>>() == expected
}
