//! Worked scenarios for the comparison heap
//!
//! Each test drives the public API the way a front-end would and checks the
//! resulting pre-order keys, with a scripted oracle standing in for the user.

use comparison_heap::{ComparisonHeap, CountingOracle, HeapError, Tree};

fn keys<O: comparison_heap::Oracle>(heap: &ComparisonHeap<O>) -> Vec<&str> {
    heap.tree().keys().collect()
}

#[test]
fn test_insert_two_items() {
    let mut heap = ComparisonHeap::new(|x: &str, _: &str| x == "A");
    assert_eq!(heap.insert("A"), 0);
    assert_eq!(heap.insert("B"), 1);

    assert_eq!(keys(&heap), ["A", "B"]);
    assert_eq!(heap.tree().root().map(|root| root.size()), Some(2));
}

#[test]
fn test_delete_second_item() {
    let mut heap = ComparisonHeap::new(|x: &str, _: &str| x == "A");
    heap.insert("A");
    heap.insert("B");

    assert_eq!(heap.delete(1), Ok("B".to_string()));
    assert_eq!(keys(&heap), ["A"]);
}

#[test]
fn test_move_to_top() {
    let tree = Tree::from_preorder(["A", "B", "", "", "C", "", ""]).unwrap();
    let mut heap = ComparisonHeap::with_tree(tree, |x: &str, _: &str| x == "C");

    assert_eq!(heap.move_item(2), Ok(("C".to_string(), 0)));
    assert_eq!(keys(&heap), ["C", "A", "B"]);
    assert!(heap.tree().check_invariants().is_ok());
}

#[test]
fn test_rename_root() {
    let mut heap = ComparisonHeap::new(CountingOracle::new(|x: &str, _: &str| x == "A"));
    heap.insert("A");
    heap.insert("B");
    let before = heap.snapshot();
    heap.oracle_mut().reset();

    heap.rename(0, "A2").unwrap();

    assert_eq!(keys(&heap), ["A2", "B"]);
    assert_eq!(heap.oracle().calls(), 0);

    let shape = |tree: &Tree| -> Vec<(u8, usize)> {
        tree.nodes().map(|node| (node.rank(), node.size())).collect()
    };
    assert_eq!(shape(heap.tree()), shape(&before));
}

#[test]
fn test_empty_heap_operations_are_rejected() {
    let mut heap = ComparisonHeap::new(|_: &str, _: &str| true);
    let err = HeapError::IndexOutOfRange { index: 0, len: 0 };

    assert_eq!(heap.delete(0), Err(err));
    assert_eq!(heap.move_item(0), Err(err));
    assert_eq!(heap.rename(0, "x"), Err(err));
    assert!(heap.is_empty());
}

#[test]
fn test_top_item_stays_at_index_zero() {
    // The user always prefers whichever item was added most recently.
    let mut heap = ComparisonHeap::new(|_: &str, _: &str| true);
    for key in ["one", "two", "three", "four"] {
        assert_eq!(heap.insert(key), 0);
        assert_eq!(heap.get(0), Some(key));
    }
}

#[test]
fn test_load_edit_save_round_trip() {
    let text = "write report\ncall bank\nrenew passport\n\n\n\nwater plants\n\n\n";
    let tree = comparison_heap::persist::read_tree(text.as_bytes()).unwrap();
    let mut heap = ComparisonHeap::with_tree(tree, |a: &str, b: &str| a < b);

    assert_eq!(
        heap.rows().iter().map(ToString::to_string).collect::<Vec<_>>(),
        ["0╚╦write report", "1 ╠╦call bank", "2 ║╚═renew passport", "3 ╚═water plants"]
    );

    heap.rename(3, "water the plants").unwrap();
    let mut saved = Vec::new();
    comparison_heap::persist::write_tree(heap.tree(), &mut saved).unwrap();
    assert_eq!(
        String::from_utf8(saved).unwrap(),
        "write report\ncall bank\nrenew passport\n\n\n\nwater the plants\n\n\n"
    );
}
