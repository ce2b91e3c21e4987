//! Mutable Binomial Heap implementation
//!
//! A [`BinomialHeap`] that also records, for every enqueued value, the arena
//! node holding it. An enqueued value whose priority changed is repaired by
//! exchanging values along tree edges, never by cutting or relinking nodes,
//! so the forest shape is untouched by an adjustment.
//!
//! # Algorithm Overview
//!
//! - **up_heap** (`increase`): while the node precedes its parent, exchange
//!   the two values and continue from the parent.
//! - **down_heap** (`decrease`): while some child precedes the node, exchange
//!   with the child that precedes all of its siblings and continue from it.
//!   Every child of the node is compared, not only the leftmost one, since a
//!   lower-order sibling may hold the better value.
//! - **update**: up_heap, then down_heap if the value did not move.
//!
//! Both walks go through a single `exchange` primitive that swaps the values
//! of two nodes and re-points both index entries. Node keys themselves only
//! change when `merge` relocates one heap's nodes into the other's arena,
//! and the index is re-pointed for every relocated node.
//!
//! # Time Complexity
//!
//! | Operation                          | Complexity        |
//! |------------------------------------|-------------------|
//! | `push`                             | O(log n)          |
//! | `pop`                              | O(log n)          |
//! | `top`                              | O(log n)          |
//! | `increase`                         | O(log n)          |
//! | `decrease` / `update`              | O(log² n)         |
//! | `merge`                            | O(log n + m)      |
//!
//! (m = size of the smaller heap; `decrease` compares every child on its way
//! down, up to log n of them per level.)
//!
//! # Example
//!
//! ```rust
//! use priority_heaps::mutable_binomial::MutableBinomialHeap;
//! use priority_heaps::compare::KeyComparator;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let costs: Rc<[Cell<u32>; 3]> = Rc::new([Cell::new(4), Cell::new(9), Cell::new(6)]);
//! let view = Rc::clone(&costs);
//! let mut heap = MutableBinomialHeap::with_comparator(KeyComparator(move |i: &usize| {
//!     std::cmp::Reverse(view[*i].get())
//! }));
//! for i in 0..3 {
//!     heap.push(i).unwrap();
//! }
//! assert_eq!(heap.top(), Ok(&0));
//!
//! costs[1].set(1);
//! heap.increase(&1).unwrap();
//! assert_eq!(heap.pop(), Ok(1));
//! ```

use crate::binomial::BinomialHeap;
use crate::binomial_tree::{self, NodeKey};
use crate::compare::{precedes, Compare, MaxComparator, MinComparator};
use crate::traits::{HeapError, MergeableHeap, MutablePriorityQueue, PriorityQueue};
use rustc_hash::FxBuildHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::mem;

/// Binomial heap with a node index supporting in-place priority changes
///
/// - `T`: the stored value, also its own index key
/// - `C`: the comparator, [`MaxComparator`] by default (greatest value on top)
/// - `H`: the hasher of the node index, [`FxBuildHasher`] by default
pub struct MutableBinomialHeap<T, C = MaxComparator, H = FxBuildHasher> {
    heap: BinomialHeap<T, C>,
    /// `heap.arena[index[v]].value == v` for every enqueued `v`
    index: HashMap<T, NodeKey, H>,
}

impl<T: Ord + Clone + Hash + Eq> MutableBinomialHeap<T> {
    /// Creates an empty max-heap
    pub fn new() -> Self {
        Self::with_hasher(MaxComparator, FxBuildHasher)
    }
}

impl<T: Ord + Clone + Hash + Eq> MutableBinomialHeap<T, MinComparator> {
    /// Creates an empty min-heap
    pub fn new_min() -> Self {
        Self::with_hasher(MinComparator, FxBuildHasher)
    }
}

impl<T: Clone + Hash + Eq, C: Compare<T>> MutableBinomialHeap<T, C> {
    /// Creates an empty heap ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_hasher(cmp, FxBuildHasher)
    }
}

impl<T, C, H> MutableBinomialHeap<T, C, H>
where
    T: Clone + Hash + Eq,
    C: Compare<T>,
    H: BuildHasher,
{
    /// Creates an empty heap with an explicit comparator and index hasher
    pub fn with_hasher(cmp: C, hasher: H) -> Self {
        Self {
            heap: BinomialHeap::with_comparator(cmp),
            index: HashMap::with_hasher(hasher),
        }
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The comparator ordering this heap
    pub fn comparator(&self) -> &C {
        self.heap.comparator()
    }

    /// Number of trees in the forest
    pub fn tree_count(&self) -> usize {
        self.heap.tree_count()
    }

    /// Returns true if `value` is enqueued
    pub fn contains(&self, value: &T) -> bool {
        self.index.contains_key(value)
    }

    /// Inserts a value
    ///
    /// # Errors
    /// [`HeapError::DuplicateValue`] if an equal value is already enqueued.
    pub fn push(&mut self, value: T) -> Result<(), HeapError> {
        if self.index.contains_key(&value) {
            return Err(HeapError::DuplicateValue);
        }
        let key_value = value.clone();
        let key = self.heap.push_node(value);
        self.index.insert(key_value, key);
        Ok(())
    }

    /// Returns the top value
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements.
    pub fn top(&self) -> Result<&T, HeapError> {
        self.heap.top()
    }

    /// Removes and returns the top value
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements.
    pub fn pop(&mut self) -> Result<T, HeapError> {
        let value = self.heap.pop()?;
        self.index.remove(&value);
        Ok(value)
    }

    /// Moves every element of `other` into this heap, leaving `other` empty
    ///
    /// # Errors
    /// [`HeapError::DuplicateValue`] if the heaps share a value; neither heap
    /// is modified in that case.
    pub fn merge(&mut self, other: &mut Self) -> Result<(), HeapError> {
        let (smaller, larger) = if self.index.len() <= other.index.len() {
            (&self.index, &other.index)
        } else {
            (&other.index, &self.index)
        };
        if smaller.keys().any(|value| larger.contains_key(value)) {
            return Err(HeapError::DuplicateValue);
        }

        // drain the smaller index into the larger one
        if self.index.len() < other.index.len() {
            mem::swap(&mut self.index, &mut other.index);
        }
        self.index.extend(other.index.drain());
        let index = &mut self.index;
        self.heap.absorb(&mut other.heap, |key, value| {
            index.insert(value.clone(), key);
        });
        Ok(())
    }

    /// Restores heap order after `value`'s priority changed in either direction
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if the value is not enqueued.
    pub fn update(&mut self, value: &T) -> Result<(), HeapError> {
        let key = self.locate(value)?;
        if self.up_heap(key) == key {
            self.down_heap(key);
        }
        Ok(())
    }

    /// Restores heap order after `value` moved toward the top
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if the value is not enqueued.
    /// [`HeapError::MisdirectedAdjustment`] if the value did not move up and
    /// one of its children now precedes it. The value is moved down before
    /// returning, so the heap is valid either way.
    pub fn increase(&mut self, value: &T) -> Result<(), HeapError> {
        let key = self.locate(value)?;
        if self.up_heap(key) == key && self.best_child(key).is_some() {
            log::debug!("increase rejected: node fell below a child");
            self.down_heap(key);
            return Err(HeapError::MisdirectedAdjustment);
        }
        Ok(())
    }

    /// Restores heap order after `value` moved away from the top
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if the value is not enqueued.
    /// [`HeapError::MisdirectedAdjustment`] if the value now precedes its
    /// parent. The value is moved up before returning, so the heap is valid
    /// either way.
    pub fn decrease(&mut self, value: &T) -> Result<(), HeapError> {
        let key = self.locate(value)?;
        let arena = &self.heap.arena;
        if let Some(parent) = arena[key].parent {
            if precedes(&self.heap.cmp, &arena[key].value, &arena[parent].value) {
                log::debug!("decrease rejected: node rose above its parent");
                self.up_heap(key);
                return Err(HeapError::MisdirectedAdjustment);
            }
        }
        self.down_heap(key);
        Ok(())
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.heap.clear();
        self.index.clear();
    }

    /// Iterates over the elements in arena order (not sorted)
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.heap.iter()
    }

    /// Consumes the heap, returning the elements in pop order
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Ok(value) = self.pop() {
            sorted.push(value);
        }
        sorted
    }

    /// Checks the heap property over every parent/child pair
    pub fn verify_heap_property(&self) -> bool {
        self.heap.verify_heap_property()
    }

    /// Checks the forest shape, see [`BinomialHeap::verify_structure`]
    pub fn verify_structure(&self) -> bool {
        self.heap.verify_structure()
    }

    /// Checks that every indexed value is stored in the node it is indexed at
    pub fn verify_index(&self) -> bool {
        self.index.len() == self.heap.len()
            && self.index.iter().all(|(value, &key)| {
                self.heap
                    .arena
                    .get(key)
                    .map_or(false, |node| node.value == *value)
            })
    }

    fn locate(&self, value: &T) -> Result<NodeKey, HeapError> {
        self.index.get(value).copied().ok_or(HeapError::NotFound)
    }

    /// Swaps the values of two nodes and re-points both index entries
    ///
    /// This is the only place a value changes nodes.
    fn exchange(&mut self, a: NodeKey, b: NodeKey) {
        let arena = &mut self.heap.arena;
        if let Some([x, y]) = arena.get_disjoint_mut([a, b]) {
            mem::swap(&mut x.value, &mut y.value);
        }
        if let Some(slot) = self.index.get_mut(&arena[a].value) {
            *slot = a;
        }
        if let Some(slot) = self.index.get_mut(&arena[b].value) {
            *slot = b;
        }
    }

    /// The child of `key` that precedes it and all of its siblings, if any
    fn best_child(&self, key: NodeKey) -> Option<NodeKey> {
        let arena = &self.heap.arena;
        let cmp = &self.heap.cmp;
        binomial_tree::children(arena, key).fold(None, |best: Option<NodeKey>, child| {
            let incumbent = best.unwrap_or(key);
            if precedes(cmp, &arena[child].value, &arena[incumbent].value) {
                Some(child)
            } else {
                best
            }
        })
    }

    /// Returns the node the value ended up in
    fn up_heap(&mut self, mut key: NodeKey) -> NodeKey {
        while let Some(parent) = self.heap.arena[key].parent {
            let arena = &self.heap.arena;
            if !precedes(&self.heap.cmp, &arena[key].value, &arena[parent].value) {
                break;
            }
            self.exchange(key, parent);
            key = parent;
        }
        key
    }

    /// Returns the node the value ended up in
    fn down_heap(&mut self, mut key: NodeKey) -> NodeKey {
        while let Some(child) = self.best_child(key) {
            self.exchange(key, child);
            key = child;
        }
        key
    }
}

impl<T, C, H> PriorityQueue<T> for MutableBinomialHeap<T, C, H>
where
    T: Clone + Hash + Eq,
    C: Compare<T>,
    H: BuildHasher,
{
    fn len(&self) -> usize {
        self.heap.len()
    }

    fn push(&mut self, value: T) -> Result<(), HeapError> {
        MutableBinomialHeap::push(self, value)
    }

    fn top(&self) -> Result<&T, HeapError> {
        MutableBinomialHeap::top(self)
    }

    fn pop(&mut self) -> Result<T, HeapError> {
        MutableBinomialHeap::pop(self)
    }

    fn clear(&mut self) {
        MutableBinomialHeap::clear(self)
    }
}

impl<T, C, H> MutablePriorityQueue<T> for MutableBinomialHeap<T, C, H>
where
    T: Clone + Hash + Eq,
    C: Compare<T>,
    H: BuildHasher,
{
    fn contains(&self, value: &T) -> bool {
        MutableBinomialHeap::contains(self, value)
    }

    fn update(&mut self, value: &T) -> Result<(), HeapError> {
        MutableBinomialHeap::update(self, value)
    }

    fn increase(&mut self, value: &T) -> Result<(), HeapError> {
        MutableBinomialHeap::increase(self, value)
    }

    fn decrease(&mut self, value: &T) -> Result<(), HeapError> {
        MutableBinomialHeap::decrease(self, value)
    }
}

impl<T, C, H> MergeableHeap<T> for MutableBinomialHeap<T, C, H>
where
    T: Clone + Hash + Eq,
    C: Compare<T>,
    H: BuildHasher,
{
    fn merge(&mut self, other: &mut Self) -> Result<(), HeapError> {
        MutableBinomialHeap::merge(self, other)
    }
}

impl<T, C, H> Default for MutableBinomialHeap<T, C, H>
where
    T: Clone + Hash + Eq,
    C: Compare<T> + Default,
    H: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(C::default(), H::default())
    }
}

impl<T: fmt::Debug, C: Compare<T>, H> fmt::Debug for MutableBinomialHeap<T, C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableBinomialHeap")
            .field("heap", &self.heap)
            .field("indexed", &self.index.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::KeyComparator;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Costs = Rc<RefCell<Vec<i32>>>;

    /// Min-heap over indices into a shared cost table
    fn cost_heap(
        costs: &Costs,
    ) -> MutableBinomialHeap<usize, KeyComparator<impl Fn(&usize) -> std::cmp::Reverse<i32>>> {
        let view = Rc::clone(costs);
        MutableBinomialHeap::with_comparator(KeyComparator(move |i: &usize| {
            std::cmp::Reverse(view.borrow()[*i])
        }))
    }

    #[test]
    fn test_push_pop_order() {
        let mut heap = MutableBinomialHeap::new_min();
        for v in [5, 1, 4, 2, 3] {
            heap.push(v).unwrap();
        }
        assert_eq!(heap.len(), 5);
        assert!(heap.verify_index());
        assert_eq!(heap.into_sorted_vec(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_increase_bubbles_to_root() {
        let costs: Costs = Rc::new(RefCell::new((0..16).map(|i| 100 + i).collect()));
        let mut heap = cost_heap(&costs);
        for i in 0..16 {
            heap.push(i).unwrap();
        }
        assert_eq!(heap.tree_count(), 1);

        costs.borrow_mut()[15] = 0;
        heap.increase(&15).unwrap();
        assert_eq!(heap.top(), Ok(&15));
        assert!(heap.verify_heap_property());
        assert!(heap.verify_index());
    }

    #[test]
    fn test_decrease_compares_every_child() {
        let costs: Costs = Rc::new(RefCell::new((0..8).collect()));
        let mut heap = cost_heap(&costs);
        for i in 0..8 {
            heap.push(i).unwrap();
        }
        assert_eq!(heap.top(), Ok(&0));

        // sink the root below everything
        costs.borrow_mut()[0] = 1000;
        heap.decrease(&0).unwrap();
        assert!(heap.verify_heap_property());
        assert!(heap.verify_structure());
        assert!(heap.verify_index());
        assert_eq!(heap.into_sorted_vec(), vec![1, 2, 3, 4, 5, 6, 7, 0]);
    }

    #[test]
    fn test_misdirected_adjustments_are_rejected() {
        let costs: Costs = Rc::new(RefCell::new((0..4).collect()));
        let mut heap = cost_heap(&costs);
        for i in 0..4 {
            heap.push(i).unwrap();
        }

        // the root sank: increase is the wrong call
        costs.borrow_mut()[0] = 50;
        assert_eq!(heap.increase(&0), Err(HeapError::MisdirectedAdjustment));
        assert!(heap.verify_heap_property());
        assert!(heap.verify_index());
        assert_eq!(heap.top(), Ok(&1));

        // a leaf rose above everything: decrease is the wrong call
        costs.borrow_mut()[3] = -1;
        assert_eq!(heap.decrease(&3), Err(HeapError::MisdirectedAdjustment));
        assert!(heap.verify_heap_property());
        assert!(heap.verify_index());
        assert_eq!(heap.top(), Ok(&3));
        assert_eq!(heap.into_sorted_vec(), vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_rejected_decrease_leaves_valid_heap() {
        let costs: Costs = Rc::new(RefCell::new((0..4).collect()));
        let mut heap = cost_heap(&costs);
        for i in 0..4 {
            heap.push(i).unwrap();
        }

        costs.borrow_mut()[3] = -1;
        assert_eq!(heap.decrease(&3), Err(HeapError::MisdirectedAdjustment));
        assert!(heap.verify_heap_property());
        assert!(heap.verify_structure());
        assert_eq!(heap.top(), Ok(&3));
        assert_eq!(heap.into_sorted_vec(), vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut heap = MutableBinomialHeap::new();
        for v in 0..11 {
            heap.push(v).unwrap();
        }
        for v in 0..11 {
            heap.update(&v).unwrap();
        }
        assert_eq!(heap.top(), Ok(&10));
        assert_eq!(heap.len(), 11);
        assert_eq!(heap.into_sorted_vec(), (0..11).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_merge_repoints_index() {
        let mut a = MutableBinomialHeap::new_min();
        let mut b = MutableBinomialHeap::new_min();
        for v in [1, 2, 3] {
            a.push(v).unwrap();
        }
        for v in [4, 5, 6, 7, 8] {
            b.push(v).unwrap();
        }

        a.merge(&mut b).unwrap();
        assert_eq!(a.len(), 8);
        assert!(b.is_empty());
        assert!(!b.contains(&4));
        assert!(a.contains(&4));
        assert!(a.verify_index());
        assert!(a.verify_structure());
        assert_eq!(a.top(), Ok(&1));
    }

    #[test]
    fn test_merge_small_into_large_drains_small_index() {
        let mut small = MutableBinomialHeap::new_min();
        let mut large = MutableBinomialHeap::new_min();
        small.push(0).unwrap();
        for v in 1..2000 {
            large.push(v).unwrap();
        }

        small.merge(&mut large).unwrap();
        assert_eq!(small.len(), 2000);
        assert!(large.is_empty());
        // the large index moved over whole; only the one-entry map was drained
        assert!(large.index.capacity() < 2000);
        assert!(small.verify_index());
        assert!(small.verify_structure());
        assert_eq!(small.into_sorted_vec(), (0..2000).collect::<Vec<_>>());
    }

    #[test]
    fn test_merge_rejects_shared_values_either_side() {
        let mut small = MutableBinomialHeap::new();
        let mut large = MutableBinomialHeap::new();
        small.push(7).unwrap();
        for v in 0..50 {
            large.push(v).unwrap();
        }

        assert_eq!(small.merge(&mut large), Err(HeapError::DuplicateValue));
        assert_eq!(large.merge(&mut small), Err(HeapError::DuplicateValue));
        assert_eq!(small.len(), 1);
        assert_eq!(large.len(), 50);
        assert!(small.verify_index());
        assert!(large.verify_index());
    }

    #[test]
    fn test_merge_rejects_shared_values() {
        let mut a = MutableBinomialHeap::new();
        let mut b = MutableBinomialHeap::new();
        a.push(1).unwrap();
        b.push(1).unwrap();
        b.push(2).unwrap();

        assert_eq!(a.merge(&mut b), Err(HeapError::DuplicateValue));
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_errors() {
        let mut heap: MutableBinomialHeap<i32> = MutableBinomialHeap::new();
        assert_eq!(heap.top(), Err(HeapError::EmptyHeap));
        assert_eq!(heap.pop(), Err(HeapError::EmptyHeap));
        assert_eq!(heap.update(&1), Err(HeapError::NotFound));
        assert_eq!(heap.increase(&1), Err(HeapError::NotFound));
        assert_eq!(heap.decrease(&1), Err(HeapError::NotFound));
        heap.push(1).unwrap();
        assert_eq!(heap.push(1), Err(HeapError::DuplicateValue));
    }
}
