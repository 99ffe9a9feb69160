//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations against a numeric
//! oracle and verify that the tree invariants, the heap order and the
//! comparison bound always hold.

use comparison_heap::rank::rank_bound;
use comparison_heap::{persist, ComparisonHeap, CountingOracle, Node, Tree};
use proptest::prelude::*;

/// Smaller numbers have higher priority.
fn numeric(a: &str, b: &str) -> bool {
    a.parse::<u32>().unwrap() < b.parse::<u32>().unwrap()
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u32),
    Delete(usize),
    Move(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u32..1000).prop_map(Op::Insert),
        1 => (0usize..64).prop_map(Op::Delete),
        1 => (0usize..64).prop_map(Op::Move),
    ]
}

fn build(values: &[u32]) -> Tree {
    let mut tree = Tree::new();
    for value in values {
        tree = tree.insert(&value.to_string(), &mut numeric).0;
    }
    tree
}

/// Every child ranks no higher than its parent.
fn heap_ordered(node: &Node) -> bool {
    [node.left(), node.right()].into_iter().flatten().all(|child| {
        !numeric(child.key(), node.key()) && heap_ordered(child)
    })
}

fn sorted_keys(tree: &Tree) -> Vec<u32> {
    let mut keys: Vec<u32> = tree.keys().map(|key| key.parse().unwrap()).collect();
    keys.sort_unstable();
    keys
}

proptest! {
    #[test]
    fn test_invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut heap = ComparisonHeap::new(numeric);
        let mut model: Vec<u32> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(value) => {
                    let key = value.to_string();
                    let index = heap.insert(&key);
                    prop_assert_eq!(heap.get(index), Some(key.as_str()));
                    model.push(value);
                }
                Op::Delete(index) => match heap.delete(index) {
                    Ok(key) => {
                        let value: u32 = key.parse().unwrap();
                        let pos = model.iter().position(|&v| v == value).unwrap();
                        model.swap_remove(pos);
                    }
                    Err(_) => prop_assert!(index >= model.len()),
                },
                Op::Move(index) => match heap.move_item(index) {
                    Ok((key, new_index)) => {
                        prop_assert_eq!(heap.get(new_index), Some(key.as_str()));
                    }
                    Err(_) => prop_assert!(index >= model.len()),
                },
            }

            prop_assert!(heap.tree().check_invariants().is_ok());
            prop_assert_eq!(heap.len(), model.len());
            if let Some(root) = heap.tree().root() {
                prop_assert!(heap_ordered(root));
            }
            model.sort_unstable();
            prop_assert_eq!(sorted_keys(heap.tree()), model.clone());
        }
    }

    #[test]
    fn test_top_is_minimum(values in prop::collection::vec(0u32..1000, 1..100)) {
        let tree = build(&values);
        let min = values.iter().min().unwrap().to_string();
        prop_assert_eq!(tree.peek(), Some(min.as_str()));
    }

    #[test]
    fn test_preorder_round_trip(values in prop::collection::vec(0u32..1000, 0..100)) {
        let tree = build(&values);
        let tokens: Vec<String> = tree.to_preorder().map(str::to_owned).collect();
        prop_assert_eq!(tokens.iter().filter(|t| t.is_empty()).count(), tree.len() + 1);

        let rebuilt = Tree::from_preorder(&tokens).unwrap();
        prop_assert_eq!(&rebuilt, &tree);
        let sizes = |t: &Tree| t.nodes().map(Node::size).collect::<Vec<_>>();
        prop_assert_eq!(sizes(&rebuilt), sizes(&tree));
    }

    #[test]
    fn test_rename_to_same_key_is_identity(
        values in prop::collection::vec(0u32..1000, 1..100),
        index in any::<prop::sample::Index>(),
    ) {
        let tree = build(&values);
        let index = index.index(tree.len());
        let key = tree.get(index).unwrap().to_owned();

        let renamed = tree.rename(index, &key).unwrap();
        prop_assert_eq!(&renamed, &tree);
        prop_assert!(renamed.check_invariants().is_ok());
    }

    #[test]
    fn test_valid_index_iff_delete_succeeds(
        values in prop::collection::vec(0u32..1000, 0..50),
        index in 0usize..60,
    ) {
        let tree = build(&values);
        let deleted = tree.delete(index, &mut numeric);
        prop_assert_eq!(tree.is_valid_index(index), deleted.is_ok());
        prop_assert_eq!(tree.is_valid_index(index), tree.get(index).is_some());
    }

    #[test]
    fn test_merge_comparison_bound(
        left in prop::collection::vec(0u32..1000, 1..300),
        right in prop::collection::vec(0u32..1000, 1..300),
    ) {
        let x = build(&left);
        let y = build(&right);
        let mut oracle = CountingOracle::new(numeric);
        let merged = x.merge(&y, &mut oracle);

        let spines = x.root().map_or(0, Node::rank) as usize + y.root().map_or(0, Node::rank) as usize;
        prop_assert!(oracle.calls() < spines);
        prop_assert!(oracle.calls() <= 2 * rank_bound(merged.len()) as usize);
        prop_assert_eq!(merged.len(), left.len() + right.len());
        prop_assert!(merged.check_invariants().is_ok());
    }

    #[test]
    fn test_insert_comparison_bound(values in prop::collection::vec(0u32..1000, 1..300)) {
        let mut heap = ComparisonHeap::new(CountingOracle::new(numeric));
        for value in values {
            let bound = rank_bound(heap.len()) as usize + 1;
            heap.oracle_mut().reset();
            heap.insert(&value.to_string());
            prop_assert!(heap.oracle().calls() <= bound);
        }
    }

    #[test]
    fn test_saved_heap_reloads_with_any_key_text(
        keys in prop::collection::vec("[a-z \r\n]{0,8}", 1..40),
        renames in prop::collection::vec((0usize..40, "[a-z\r\n]{0,8}"), 0..10),
    ) {
        let mut heap = ComparisonHeap::new(|a: &str, b: &str| a < b);
        for key in &keys {
            heap.insert(key);
        }
        for (index, key) in &renames {
            let _ = heap.rename(*index, key);
        }
        prop_assert!(heap.tree().keys().all(|key| !key.is_empty() && !key.contains(['\n', '\r'])));

        let mut buf = Vec::new();
        persist::write_tree(heap.tree(), &mut buf).unwrap();
        let loaded = persist::read_tree(buf.as_slice()).unwrap();
        prop_assert_eq!(&loaded, heap.tree());
    }
}
