//! Extreme stress tests that really push the heaps to their limits
//!
//! These tests perform large numbers of operations in various patterns
//! to catch edge cases and verify correctness under load.

use priority_heaps::binary::BinaryHeap;
use priority_heaps::binomial::BinomialHeap;
use priority_heaps::compare::KeyComparator;
use priority_heaps::mutable_binary::MutableBinaryHeap;
use priority_heaps::mutable_binomial::MutableBinomialHeap;
use priority_heaps::{MutablePriorityQueue, PriorityQueue};
use std::cell::RefCell;
use std::cmp::Reverse;
use std::rc::Rc;

/// Test massive numbers of pushes and pops
fn test_massive_operations<H: PriorityQueue<i32> + Default>() {
    let mut heap = H::default();

    for i in 0..10_000 {
        heap.push(i).unwrap();
    }
    assert_eq!(heap.len(), 10_000);

    for i in (0..10_000).rev() {
        assert_eq!(heap.pop(), Ok(i));
    }
    assert!(heap.is_empty());
}

/// Test alternating push and pop
fn test_alternating_ops<H: PriorityQueue<i32> + Default>() {
    let mut heap = H::default();

    // two in, one out: the newest pair always holds the maximum
    for i in 0..2_000 {
        heap.push(i * 2).unwrap();
        heap.push(i * 2 + 1).unwrap();
        assert_eq!(heap.pop(), Ok(i * 2 + 1));
    }
    assert_eq!(heap.len(), 2_000);

    for i in (0..2_000).rev() {
        assert_eq!(heap.pop(), Ok(i * 2));
    }
}

/// Test fill and drain repeatedly on the same heap
fn test_refill_cycles<H: PriorityQueue<i32> + Default>() {
    let mut heap = H::default();

    for cycle in 0..20 {
        let n = 50 + cycle * 13;
        for i in 0..n {
            heap.push((i * 7919) % n).unwrap();
        }
        for i in (0..n).rev() {
            assert_eq!(heap.pop(), Ok(i));
        }
        assert!(heap.is_empty());
    }
}

/// Test repeated priority churn against a cost table
fn test_priority_churn<H, F>(make: F)
where
    H: MutablePriorityQueue<usize>,
    F: FnOnce(Rc<RefCell<Vec<i64>>>) -> H,
{
    let n = 1_000;
    let costs = Rc::new(RefCell::new((0..n as i64).collect::<Vec<_>>()));
    let mut heap = make(Rc::clone(&costs));
    for i in 0..n {
        heap.push(i).unwrap();
    }

    // deterministic pseudo-random walk over both directions
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    for _ in 0..20_000 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let i = (state % n as u64) as usize;
        let delta = (state >> 32) as i64 % 500 - 250;
        costs.borrow_mut()[i] += delta;
        heap.update(&i).unwrap();
    }

    let mut last = i64::MIN;
    let mut popped = 0;
    while let Ok(i) = heap.pop() {
        let cost = costs.borrow()[i];
        assert!(cost >= last, "pop order broke at {}: {} < {}", i, cost, last);
        last = cost;
        popped += 1;
    }
    assert_eq!(popped, n);
}

fn cheapest_first(costs: Rc<RefCell<Vec<i64>>>) -> impl Fn(&usize) -> Reverse<i64> {
    move |i: &usize| Reverse(costs.borrow()[*i])
}

#[test]
fn test_massive_operations_all() {
    test_massive_operations::<BinaryHeap<i32>>();
    test_massive_operations::<MutableBinaryHeap<i32>>();
    test_massive_operations::<BinomialHeap<i32>>();
    test_massive_operations::<MutableBinomialHeap<i32>>();
}

#[test]
fn test_alternating_ops_all() {
    test_alternating_ops::<BinaryHeap<i32>>();
    test_alternating_ops::<MutableBinaryHeap<i32>>();
    test_alternating_ops::<BinomialHeap<i32>>();
    test_alternating_ops::<MutableBinomialHeap<i32>>();
}

#[test]
fn test_refill_cycles_all() {
    test_refill_cycles::<BinaryHeap<i32>>();
    test_refill_cycles::<MutableBinaryHeap<i32>>();
    test_refill_cycles::<BinomialHeap<i32>>();
    test_refill_cycles::<MutableBinomialHeap<i32>>();
}

#[test]
fn test_mutable_binary_priority_churn() {
    test_priority_churn(|costs| {
        MutableBinaryHeap::with_comparator(KeyComparator(cheapest_first(costs)))
    });
}

#[test]
fn test_mutable_binomial_priority_churn() {
    test_priority_churn(|costs| {
        MutableBinomialHeap::with_comparator(KeyComparator(cheapest_first(costs)))
    });
}

#[test]
fn test_many_binomial_merges() {
    let mut total = BinomialHeap::new_min();
    let mut expected = 0;
    for round in 0..200 {
        let mut part: BinomialHeap<i32, _> = BinomialHeap::new_min();
        for i in 0..(round % 17) {
            part.push(round * 100 + i);
            expected += 1;
        }
        total.merge(&mut part);
        assert!(part.is_empty());
        assert!(total.verify_structure());
    }
    assert_eq!(total.len(), expected);

    let sorted = total.into_sorted_vec();
    assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
}
