use arbitrary::{unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

use std::collections::BTreeSet;

use super::*;
use crate::Error;

#[test]
fn test_rbt_small() {
    let mut index: Index<String> = Index::new("test_rbt_small");
    for key in ["b", "a", "c"].iter() {
        assert_eq!(index.insert(key.to_string()), Insert::Inserted);
    }

    let keys: Vec<&String> = index.iter().collect();
    assert_eq!(keys, vec!["a", "b", "c"]);

    let root = index.as_root().unwrap();
    assert_eq!(root.as_key(), "b");
    assert_eq!(root.is_black(), true);
    assert_eq!(root.as_left().map(|n| n.is_red()), Some(true));
    assert_eq!(root.as_right().map(|n| n.is_red()), Some(true));

    index.validate().unwrap();
}

#[test]
fn test_rbt_ascending_small() {
    let mut index: Index<String> = Index::new("test_rbt_ascending_small");
    for key in ["1", "2", "3", "4", "5", "6", "7"].iter() {
        assert_eq!(index.insert(key.to_string()), Insert::Inserted);
    }

    assert!(index.to_height() <= 4, "height {}", index.to_height());
    assert_eq!(count_red_red(index.as_root()), 0);
    assert_eq!(index.len(), 7);
    index.validate().unwrap();
}

#[test]
fn test_rbt_duplicate() {
    let mut index: Index<String> = Index::new("test_rbt_duplicate");
    assert_eq!(index.insert("x".to_string()), Insert::Inserted);
    assert_eq!(index.insert("x".to_string()), Insert::AlreadyExists);
    assert_eq!(size(index.as_root()), 1);
    assert_eq!(index.len(), 1);
    assert_eq!(Insert::Inserted.is_inserted(), true);
    assert_eq!(Insert::AlreadyExists.is_inserted(), false);
    index.validate().unwrap();
}

#[test]
fn test_rbt_empty() {
    let index: Index<String> = Index::new("test_rbt_empty");
    assert_eq!(index.get("anything"), None);
    assert_eq!(index.contains("anything"), false);
    assert_eq!(index.is_empty(), true);
    assert_eq!(index.as_root().is_none(), true);
    assert_eq!(index.to_height(), 0);
    assert_eq!(index.to_black_height(), 0);
    assert_eq!(size(index.as_root()), 0);
    assert_eq!(index.iter().next(), None);

    let stats = index.validate().unwrap();
    assert_eq!(stats.n_count, 0);
    assert_eq!(stats.height, 0);
    assert_eq!(stats.blacks, 0);
}

#[test]
fn test_rbt_search() {
    let seed: u64 = random();
    println!("test_rbt_search seed:{}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: Index<u64> = Index::new("test_rbt_search");
    let mut keys = BTreeSet::new();
    while keys.len() < 1000 {
        let key = rng.gen::<u64>();
        let res = index.insert(key);
        assert_eq!(res.is_inserted(), keys.insert(key), "key {}", key);
    }

    for key in keys.iter() {
        assert_eq!(index.get(key), Some(key));
    }

    let mut n_missing = 0;
    while n_missing < 1000 {
        let key = rng.gen::<u64>();
        if !keys.contains(&key) {
            assert_eq!(index.get(&key), None, "key {}", key);
            n_missing += 1;
        }
    }

    index.validate().unwrap();
}

#[test]
fn test_rbt_borrowed_search() {
    let mut index: Index<String> = Index::new("test_rbt_borrowed_search");
    for word in "the quick brown fox jumps over the lazy dog".split(' ') {
        index.insert(word.to_string());
    }
    assert_eq!(index.len(), 8);
    assert_eq!(index.get("fox").map(|s| s.as_str()), Some("fox"));
    assert_eq!(index.contains("lazy"), true);
    assert_eq!(index.contains("cat"), false);
}

#[test]
fn test_rbt_ascending() {
    let mut index: Index<u32> = Index::new("test_rbt_ascending");
    let mut btset = BTreeSet::new();
    for key in 0..2000_u32 {
        assert_eq!(index.insert(key), Insert::Inserted);
        btset.insert(key);
        check_invariants(&index, &btset);
    }
}

#[test]
fn test_rbt_descending() {
    let mut index: Index<u32> = Index::new("test_rbt_descending");
    let mut btset = BTreeSet::new();
    for key in (0..2000_u32).rev() {
        assert_eq!(index.insert(key), Insert::Inserted);
        btset.insert(key);
        check_invariants(&index, &btset);
    }
}

#[test]
fn test_rbt_zigzag() {
    let mut index: Index<i32> = Index::new("test_rbt_zigzag");
    let mut btset = BTreeSet::new();
    for i in 0..1000_i32 {
        let key = if i % 2 == 0 { i } else { -i };
        index.insert(key);
        btset.insert(key);
        check_invariants(&index, &btset);
    }
}

#[test]
fn test_rbt_random() {
    let seed: u64 = random();
    println!("test_rbt_random seed:{}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    // narrow key space to exercise duplicates.
    let mut index: Index<u16> = Index::new("test_rbt_random");
    let mut btset = BTreeSet::new();
    let (mut n_ins, mut n_dups) = (0, 0);
    for _ in 0..3000 {
        let key = rng.gen::<u16>() % 2048;
        match index.insert(key) {
            Insert::Inserted => {
                assert!(btset.insert(key));
                n_ins += 1;
            }
            Insert::AlreadyExists => {
                assert!(btset.contains(&key));
                n_dups += 1;
            }
        }
        check_invariants(&index, &btset);
    }
    println!("test_rbt_random n_ins:{} n_dups:{}", n_ins, n_dups);
    assert_eq!(index.len(), n_ins);
}

#[test]
fn test_rbt_arbitrary() {
    let seed: u64 = random();
    println!("test_rbt_arbitrary seed:{}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    for _ in 0..20 {
        let bytes: Vec<u8> = (0..4096).map(|_| rng.gen::<u8>()).collect();
        let mut uns = Unstructured::new(&bytes);
        let keys: Vec<String> = Arbitrary::arbitrary(&mut uns).unwrap();

        let mut index: Index<String> = Index::new("test_rbt_arbitrary");
        let mut btset = BTreeSet::new();
        for key in keys.into_iter() {
            let res = index.insert(key.clone());
            assert_eq!(res.is_inserted(), btset.insert(key));
        }
        check_invariants(&index, &btset);
    }
}

#[test]
fn test_rbt_restartable_iter() {
    let mut index: Index<u8> = Index::new("test_rbt_restartable_iter");
    for key in [5_u8, 3, 9, 1, 7].iter() {
        index.insert(*key);
    }

    let first: Vec<u8> = index.iter().cloned().collect();
    let mut iter = index.iter();
    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.next(), Some(&3));
    let second: Vec<u8> = (&index).into_iter().cloned().collect();
    assert_eq!(first, vec![1, 3, 5, 7, 9]);
    assert_eq!(first, second);
}

#[test]
fn test_rbt_subtree_queries() {
    let mut index: Index<u32> = Index::new("test_rbt_subtree_queries");
    for key in 1..=7_u32 {
        index.insert(key);
    }
    // 2B(1B, 4R(3B, 6B(5R, 7R)))
    let root = index.as_root().unwrap();
    assert_eq!(*root.as_key(), 2);

    let left = root.as_left();
    assert_eq!(height(left), 1);
    assert_eq!(size(left), 1);
    assert_eq!(black_height(left), 1);

    let right = root.as_right();
    assert_eq!(right.map(|n| *n.as_key()), Some(4));
    assert_eq!(right.map(|n| n.is_red()), Some(true));
    assert_eq!(height(right), 3);
    assert_eq!(size(right), 5);
    assert_eq!(black_height(right), 1);

    assert_eq!(height(Some(root)), 4);
    assert_eq!(size(Some(root)), 7);
    assert_eq!(black_height(Some(root)), 2);
    assert_eq!(*right.unwrap().as_parent().unwrap().as_key(), 2);
}

#[test]
fn test_rbt_pretty_print() {
    let mut index: Index<String> = Index::new("test_rbt_pretty_print");

    let mut out: Vec<u8> = vec![];
    index.pretty_print(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Tree is empty\n");

    for key in ["b", "a", "c", "d"].iter() {
        index.insert(key.to_string());
    }
    let mut out: Vec<u8> = vec![];
    index.pretty_print(&mut out).unwrap();
    let refs = concat!(
        "R----b(BLACK)\n",
        "   L----a(BLACK)\n",
        "   R----c(BLACK)\n",
        "      R----d(RED)\n",
    );
    assert_eq!(String::from_utf8(out).unwrap(), refs);
}

#[test]
fn test_rbt_rotate() {
    let mut index: Index<u32> = Index::new("test_rbt_rotate");
    for key in [4_u32, 2, 6, 1, 3, 5, 7].iter() {
        index.insert(*key);
    }
    let before: Vec<u32> = index.iter().cloned().collect();

    let root = index.root.unwrap();
    rotate_left(&mut index.nodes, &mut index.root, root);
    assert_eq!(index.as_root().map(|n| *n.as_key()), Some(6));
    assert_eq!(index.iter().cloned().collect::<Vec<u32>>(), before);
    check_links(&index);

    let root = index.root.unwrap();
    rotate_right(&mut index.nodes, &mut index.root, root);
    assert_eq!(index.as_root().map(|n| *n.as_key()), Some(4));
    assert_eq!(index.iter().cloned().collect::<Vec<u32>>(), before);
    check_links(&index);

    // rotate a non-root pivot, its parent slot must be re-pointed.
    let two = index.nodes.iter().position(|n| n.key == 2).unwrap();
    rotate_right(&mut index.nodes, &mut index.root, two);
    let root = index.as_root().unwrap();
    assert_eq!(root.as_left().map(|n| *n.as_key()), Some(1));
    assert_eq!(index.iter().cloned().collect::<Vec<u32>>(), before);
    check_links(&index);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic]
fn test_rbt_rotate_missing_child() {
    let mut index: Index<u32> = Index::new("test_rbt_rotate_missing_child");
    index.insert(1);
    let root = index.root.unwrap();
    rotate_left(&mut index.nodes, &mut index.root, root);
}

#[test]
fn test_rbt_validate_corrupt() {
    let mut index: Index<u32> = Index::new("test_rbt_validate_corrupt");
    for key in 0..16_u32 {
        index.insert(key);
    }
    index.validate().unwrap();

    let mut bad = index.clone();
    let root = bad.root.unwrap();
    bad.nodes[root].set_red();
    assert!(matches!(bad.validate(), Err(Error::Fatal(_, _))));

    // any black non-root node turned red unbalances its parent.
    let mut bad = index.clone();
    let off = bad.nodes.iter().position(|n| n.is_black() && n.parent.is_some());
    bad.nodes[off.unwrap()].set_red();
    assert!(bad.validate().is_err());

    let mut bad = index.clone();
    let root = bad.root.unwrap();
    bad.nodes[root].key = 1000;
    assert!(bad.validate().is_err());

    let mut bad = index.clone();
    let root = bad.root.unwrap();
    let child = bad.nodes[root].left.unwrap();
    bad.nodes[child].parent = None;
    assert!(bad.validate().is_err());
}

#[test]
fn test_rbt_stats() {
    let mut index: Index<u64> = Index::new("test_rbt_stats");
    for key in 0..1000_u64 {
        index.insert(key);
    }

    let stats = index.to_stats();
    assert_eq!(stats.name, "test_rbt_stats");
    assert_eq!(stats.n_count, 1000);
    assert_eq!(stats.height, index.to_height());
    assert_eq!(stats.blacks, index.to_black_height());
    assert_eq!(stats.depths.is_none(), true);

    let stats = index.validate().unwrap();
    let depths = stats.depths.as_ref().unwrap();
    // n nodes have n+1 absent children.
    assert_eq!(depths.to_samples(), 1001);
    assert_eq!(depths.to_max(), stats.height);
    assert!(depths.to_min() >= stats.blacks);
    assert_eq!(depths.is_balanced(), true);
    println!("{}", stats);
}

fn check_invariants<K>(index: &Index<K>, btset: &BTreeSet<K>)
where
    K: Ord + Clone + fmt::Debug,
{
    index.validate().unwrap();
    check_links(index);

    let keys: Vec<&K> = index.iter().collect();
    let refs: Vec<&K> = btset.iter().collect();
    assert_eq!(keys, refs);

    let n = index.len();
    assert_eq!(n, btset.len());
    assert_eq!(size(index.as_root()), n);

    let max_height = 2.0 * ((n + 1) as f64).log2();
    assert!((index.to_height() as f64) <= max_height, "n:{}", n);

    assert_eq!(count_red_red(index.as_root()), 0);

    // leftmost sampling must agree with every other path, for every node.
    let mut stack: Vec<NodeRef<K>> = index.as_root().into_iter().collect();
    while let Some(node) = stack.pop() {
        let mut blacks = vec![];
        path_blacks(Some(node), 0, &mut blacks);
        let bh = black_height(Some(node));
        assert!(blacks.iter().all(|b| *b == bh), "{:?} {:?}", bh, blacks);
        stack.extend(node.as_left());
        stack.extend(node.as_right());
    }
}

fn path_blacks<K>(node: Option<NodeRef<K>>, acc: usize, out: &mut Vec<usize>) {
    match node {
        Some(node) => {
            let acc = acc + if node.is_black() { 1 } else { 0 };
            path_blacks(node.as_left(), acc, out);
            path_blacks(node.as_right(), acc, out);
        }
        None => out.push(acc),
    }
}

fn count_red_red<K>(node: Option<NodeRef<K>>) -> usize {
    match node {
        Some(node) => {
            let child_red = |c: Option<NodeRef<K>>| c.map_or(false, |c| c.is_red());
            let n = match node.is_red() {
                true if child_red(node.as_left()) || child_red(node.as_right()) => 1,
                _ => 0,
            };
            n + count_red_red(node.as_left()) + count_red_red(node.as_right())
        }
        None => 0,
    }
}

fn check_links<K>(index: &Index<K>) {
    if let Some(root) = index.root {
        assert_eq!(index.nodes[root].parent, None);
    }
    for (id, node) in index.nodes.iter().enumerate() {
        for child in [node.left, node.right].iter().filter_map(|c| *c) {
            assert_eq!(index.nodes[child].parent, Some(id));
        }
        if let Some(parent) = node.parent {
            let p = &index.nodes[parent];
            let n = [p.left, p.right].iter().filter(|c| **c == Some(id)).count();
            assert_eq!(n, 1);
        }
    }
}
