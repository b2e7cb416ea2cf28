use super::*;
use crate::arena::NodeId;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Check BST order, AVL balance and stored heights for every reachable node.
/// Returns the number of reachable nodes.
fn validate_tree<T: Ord + std::fmt::Debug>(t: &SearchTree<T>) -> usize {
    fn check<T: Ord + std::fmt::Debug>(
        t: &SearchTree<T>,
        id: NodeId,
        lower: Option<&T>,
        upper: Option<&T>,
        reachable: &mut usize,
    ) -> i16 {
        *reachable += 1;
        let node = t.nodes.get(id);
        if let Some(lower) = lower {
            assert!(lower < &node.value, "{:?} not above {:?}", node.value, lower);
        }
        if let Some(upper) = upper {
            assert!(&node.value < upper, "{:?} not below {:?}", node.value, upper);
        }

        let lh = node
            .left
            .map_or(-1, |l| check(t, l, lower, Some(&node.value), reachable));
        let rh = node
            .right
            .map_or(-1, |r| check(t, r, Some(&node.value), upper, reachable));
        assert!(
            (lh - rh).abs() <= 1,
            "unbalanced at {:?}: left {lh}, right {rh}",
            node.value
        );

        let h = lh.max(rh) + 1;
        assert_eq!(
            i16::from(node.height),
            h,
            "stored height must match children at {:?}",
            node.value
        );
        h
    }

    let mut reachable = 0;
    if let Some(root) = t.root {
        check(t, root, None, None, &mut reachable);
    }
    reachable
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "0i32..64")] i32),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "0i32..64")] i32),
    #[proptest(weight = 2)]
    Has(#[proptest(strategy = "0i32..64")] i32),
}

fn inorder(t: &SearchTree<i32>) -> Vec<i32> {
    let mut out = Vec::new();
    t.inorder_traversal(&mut out);
    out
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_multiset(ops in prop::collection::vec(any::<Op>(), 0..=500)) {
        let mut t: SearchTree<i32> = SearchTree::new();
        let mut m: BTreeMap<i32, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    let was_new = !m.contains_key(&v);
                    let nodes_before = t.active_nodes();
                    t.insert(v);
                    *m.entry(v).or_default() += 1;
                    prop_assert_eq!(t.active_nodes(), nodes_before + usize::from(was_new));
                    validate_tree(&t);
                }
                Op::Remove(v) => {
                    let height_before = t.height().ok();
                    let preorder_before = {
                        let mut out = Vec::new();
                        t.preorder_traversal(&mut out);
                        out
                    };
                    let expected = match m.get_mut(&v) {
                        Some(c) if *c > 0 => {
                            *c -= 1;
                            true
                        }
                        _ => false,
                    };
                    prop_assert_eq!(t.remove(&v), expected);
                    prop_assert_eq!(t.height().ok(), height_before);
                    if !expected {
                        let mut after = Vec::new();
                        t.preorder_traversal(&mut after);
                        prop_assert_eq!(after, preorder_before);
                    }
                }
                Op::Has(v) => {
                    let c = m.get(&v).copied().unwrap_or(0);
                    prop_assert_eq!(t.has(&v), c > 0);
                    prop_assert_eq!(t.count(&v), c);
                }
            }

            prop_assert_eq!(t.len(), m.values().map(|&c| c as usize).sum::<usize>());
        }

        prop_assert_eq!(validate_tree(&t), m.len());
        prop_assert_eq!(t.active_nodes(), m.len());
        let expected: Vec<i32> = m.iter().filter(|(_, &c)| c > 0).map(|(&v, _)| v).collect();
        prop_assert_eq!(inorder(&t), expected);
    }

    #[test]
    fn prop_inorder_independent_of_insert_order(
        mut values in prop::collection::vec(-100i32..100, 0..=200),
        seed in any::<u64>(),
    ) {
        use rand::rngs::StdRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let a: SearchTree<i32> = values.iter().copied().collect();
        values.shuffle(&mut StdRng::seed_from_u64(seed));
        let b: SearchTree<i32> = values.iter().copied().collect();

        validate_tree(&a);
        validate_tree(&b);
        prop_assert_eq!(a.len(), b.len());
        prop_assert_eq!(inorder(&a), inorder(&b));
        for v in -100..100 {
            prop_assert_eq!(a.has(&v), b.has(&v));
            prop_assert_eq!(a.count(&v), b.count(&v));
        }

        let out = inorder(&a);
        prop_assert!(out.windows(2).all(|w| w[0] < w[1]), "in-order must be strictly ascending");
    }

    #[test]
    fn prop_pre_and_post_order_parents(values in prop::collection::vec(0i32..1000, 1..=200)) {
        let t: SearchTree<i32> = values.iter().copied().collect();

        let mut pre = Vec::new();
        t.preorder_traversal(&mut pre);
        let mut post = Vec::new();
        t.postorder_traversal(&mut post);

        let pos = |order: &[i32], v: i32| order.iter().position(|&x| x == v);
        let mut stack: Vec<NodeId> = t.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = t.nodes.get(id);
            for child in [node.left, node.right].into_iter().flatten() {
                let child_value = t.nodes.get(child).value;
                prop_assert!(pos(&pre, node.value) < pos(&pre, child_value));
                prop_assert!(pos(&post, node.value) > pos(&post, child_value));
                stack.push(child);
            }
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let values = [1, 5, 3, 8, 7, 9, 2];
    let mut sorted = values.to_vec();
    sorted.sort();

    for_each_permutation(&values, |perm| {
        let t: SearchTree<i32> = perm.into_iter().collect();
        assert_eq!(validate_tree(&t), values.len());
        // Seven nodes always fit in an AVL tree of height 2 or 3.
        let h = t.height().unwrap();
        assert!((2..=3).contains(&h), "height {h}");
        assert_eq!(inorder(&t), sorted);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let values = [1, 5, 3, 8, 7, 9, 2];
    let base: SearchTree<i32> = values.iter().copied().collect();
    let base_height = base.height().unwrap();

    for_each_permutation(&values, |perm| {
        let mut t = base.clone();
        let mut left = values.len();
        for v in perm {
            assert!(t.remove(&v));
            assert!(!t.has(&v));
            left -= 1;
            assert_eq!(t.len(), left);
            assert_eq!(t.height().unwrap(), base_height);
        }
        assert!(t.is_empty());
        assert!(inorder(&t).is_empty());
        assert_eq!(validate_tree(&t), values.len());
    });
}
