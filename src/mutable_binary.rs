//! Mutable Binary Heap implementation
//!
//! A [`BinaryHeap`](crate::binary::BinaryHeap) that also records, for every
//! enqueued value, the slot it currently occupies. With that position index
//! an enqueued value whose priority changed can be re-sifted in O(log n)
//! without a remove/reinsert.
//!
//! # Algorithm Overview
//!
//! The heap keeps a `value -> slot` map alongside the slot sequence. Every
//! movement of a value between slots goes through a single `exchange`
//! primitive that swaps the two slots and re-records both positions, so the
//! index can never drift from the sequence. Push, pop, sift-up and sift-down
//! are the binary heap algorithms written on top of `exchange`.
//!
//! Values are their own keys: `T` must be `Clone + Hash + Eq`, and one clone
//! of each value lives in the index. The priority of a value is whatever the
//! comparator observes, typically a table the caller owns.
//!
//! # Time Complexity
//!
//! | Operation                          | Complexity |
//! |------------------------------------|------------|
//! | `push`                             | O(log n)   |
//! | `pop`                              | O(log n)   |
//! | `top`                              | O(1)       |
//! | `update` / `increase` / `decrease` | O(log n)   |
//! | `remove` / `replace`               | O(log n)   |
//!
//! # Example
//!
//! ```rust
//! use priority_heaps::mutable_binary::MutableBinaryHeap;
//! use priority_heaps::compare::MinComparator;
//!
//! // (distance, node) pairs; the least distance is on top
//! let mut heap = MutableBinaryHeap::with_comparator(MinComparator);
//! heap.push((7, 'a')).unwrap();
//! heap.push((3, 'b')).unwrap();
//!
//! // relax 'a' to distance 1
//! heap.replace(&(7, 'a'), (1, 'a')).unwrap();
//! assert_eq!(heap.top(), Ok(&(1, 'a')));
//! ```

use crate::binary::{left, parent, right, slots_are_heap_ordered};
use crate::compare::{precedes, Compare, MaxComparator, MinComparator};
use crate::sequence::Sequence;
use crate::traits::{HeapError, MutablePriorityQueue, PriorityQueue};
use rustc_hash::FxBuildHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::mem;

/// Binary heap with a position index supporting in-place priority changes
///
/// - `T`: the stored value, also its own index key
/// - `C`: the comparator, [`MaxComparator`] by default (greatest value on top)
/// - `S`: the backing sequence, `Vec<T>` by default
/// - `H`: the hasher of the position index, [`FxBuildHasher`] by default
pub struct MutableBinaryHeap<T, C = MaxComparator, S = Vec<T>, H = FxBuildHasher> {
    data: S,
    /// `index[data[i]] == i` for every live slot
    index: HashMap<T, usize, H>,
    cmp: C,
}

impl<T: Ord + Clone + Hash + Eq> MutableBinaryHeap<T> {
    /// Creates an empty max-heap
    pub fn new() -> Self {
        Self::with_hasher(MaxComparator, FxBuildHasher)
    }
}

impl<T: Ord + Clone + Hash + Eq> MutableBinaryHeap<T, MinComparator> {
    /// Creates an empty min-heap
    pub fn new_min() -> Self {
        Self::with_hasher(MinComparator, FxBuildHasher)
    }
}

impl<T: Clone + Hash + Eq, C: Compare<T>> MutableBinaryHeap<T, C> {
    /// Creates an empty heap ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_hasher(cmp, FxBuildHasher)
    }
}

impl<T, C, S, H> MutableBinaryHeap<T, C, S, H>
where
    T: Clone + Hash + Eq,
    C: Compare<T>,
    S: Sequence<T>,
    H: BuildHasher,
{
    /// Creates an empty heap with an explicit comparator and index hasher
    pub fn with_hasher(cmp: C, hasher: H) -> Self {
        Self {
            data: S::new_sequence(),
            index: HashMap::with_hasher(hasher),
            cmp,
        }
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The comparator ordering this heap
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns true if `value` is enqueued
    pub fn contains(&self, value: &T) -> bool {
        self.index.contains_key(value)
    }

    /// The slot `value` currently occupies
    pub fn position_of(&self, value: &T) -> Option<usize> {
        self.index.get(value).copied()
    }

    /// Inserts a value
    ///
    /// # Errors
    /// [`HeapError::DuplicateValue`] if an equal value is already enqueued.
    pub fn push(&mut self, value: T) -> Result<(), HeapError> {
        if self.index.contains_key(&value) {
            return Err(HeapError::DuplicateValue);
        }

        let last = self.data.len();
        self.index.insert(value.clone(), last);
        self.data.push(value);
        self.sift_up(last);
        Ok(())
    }

    /// Returns the top value
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements.
    pub fn top(&self) -> Result<&T, HeapError> {
        self.data.as_slice().first().ok_or(HeapError::EmptyHeap)
    }

    /// Removes and returns the top value
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements.
    pub fn pop(&mut self) -> Result<T, HeapError> {
        if self.data.is_empty() {
            return Err(HeapError::EmptyHeap);
        }
        self.take_slot(0)
    }

    /// Removes an arbitrary enqueued value
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if the value is not enqueued.
    pub fn remove(&mut self, value: &T) -> Result<T, HeapError> {
        let pos = self.locate(value)?;
        self.take_slot(pos)
    }

    /// Restores heap order after `value`'s priority changed in either direction
    ///
    /// Sifts up first; only if the value did not move does it sift down. A
    /// single perturbed value cannot violate the heap property in both
    /// directions at once, so at most one of the two has an effect.
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if the value is not enqueued.
    pub fn update(&mut self, value: &T) -> Result<(), HeapError> {
        let pos = self.locate(value)?;
        self.restore(pos);
        Ok(())
    }

    /// Restores heap order after `value` moved toward the top
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if the value is not enqueued.
    /// [`HeapError::MisdirectedAdjustment`] if the value did not move up and
    /// one of its children now precedes it. The value is sifted down before
    /// returning, so the heap is valid either way.
    pub fn increase(&mut self, value: &T) -> Result<(), HeapError> {
        let pos = self.locate(value)?;
        if self.sift_up(pos) == pos && self.best_child(pos).is_some() {
            log::debug!("increase rejected: slot {} fell below a child", pos);
            self.sift_down(pos);
            return Err(HeapError::MisdirectedAdjustment);
        }
        Ok(())
    }

    /// Restores heap order after `value` moved away from the top
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if the value is not enqueued.
    /// [`HeapError::MisdirectedAdjustment`] if the value now precedes its
    /// parent. The value is sifted up before returning, so the heap is valid
    /// either way.
    pub fn decrease(&mut self, value: &T) -> Result<(), HeapError> {
        let pos = self.locate(value)?;
        if pos > 0 {
            let slots = self.data.as_slice();
            if precedes(&self.cmp, &slots[pos], &slots[parent(pos)]) {
                log::debug!("decrease rejected: slot {} rose above its parent", pos);
                self.sift_up(pos);
                return Err(HeapError::MisdirectedAdjustment);
            }
        }
        self.sift_down(pos);
        Ok(())
    }

    /// Swaps an enqueued value for a new one in place and restores heap order
    ///
    /// Returns the value that was replaced.
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if `old` is not enqueued,
    /// [`HeapError::DuplicateValue`] if a value equal to `new` is enqueued
    /// under a different slot.
    pub fn replace(&mut self, old: &T, new: T) -> Result<T, HeapError> {
        let pos = self.locate(old)?;
        if let Some(&other) = self.index.get(&new) {
            if other != pos {
                return Err(HeapError::DuplicateValue);
            }
        }

        self.index.remove(old);
        self.index.insert(new.clone(), pos);
        let previous = mem::replace(&mut self.data.as_mut_slice()[pos], new);
        self.restore(pos);
        Ok(previous)
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.data.clear();
        self.index.clear();
    }

    /// Iterates over the elements in storage order (not sorted)
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.as_slice().iter()
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
        slots_are_heap_ordered(self.data.as_slice(), &self.cmp)
    }

    /// Checks that every live slot is recorded in the index at its own position
    pub fn verify_index(&self) -> bool {
        self.index.len() == self.data.len()
            && self
                .data
                .as_slice()
                .iter()
                .enumerate()
                .all(|(i, value)| self.index.get(value) == Some(&i))
    }

    fn locate(&self, value: &T) -> Result<usize, HeapError> {
        self.index.get(value).copied().ok_or(HeapError::NotFound)
    }

    /// Swaps two slots and re-records both positions
    ///
    /// This is the only place two live slots change places.
    fn exchange(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let slots = self.data.as_mut_slice();
        slots.swap(i, j);
        if let Some(pos) = self.index.get_mut(&slots[i]) {
            *pos = i;
        }
        if let Some(pos) = self.index.get_mut(&slots[j]) {
            *pos = j;
        }
    }

    /// Moves the value at `pos` to the back, detaches it and repairs the hole
    fn take_slot(&mut self, pos: usize) -> Result<T, HeapError> {
        let last = self.data.len() - 1;
        self.exchange(pos, last);
        let value = self.data.pop().ok_or(HeapError::EmptyHeap)?;
        self.index.remove(&value);

        if pos < self.data.len() {
            self.restore(pos);
        }
        Ok(value)
    }

    fn restore(&mut self, pos: usize) {
        if self.sift_up(pos) == pos {
            self.sift_down(pos);
        }
    }

    /// The child of `pos` that precedes it and every other child, if any
    fn best_child(&self, pos: usize) -> Option<usize> {
        let slots = self.data.as_slice();
        let mut best = pos;
        for child in [left(pos), right(pos)] {
            if child < slots.len() && precedes(&self.cmp, &slots[child], &slots[best]) {
                best = child;
            }
        }
        (best != pos).then_some(best)
    }

    /// Returns the slot the value ended up in
    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let up = parent(pos);
            let slots = self.data.as_slice();
            if !precedes(&self.cmp, &slots[pos], &slots[up]) {
                break;
            }
            self.exchange(pos, up);
            pos = up;
        }
        pos
    }

    /// Returns the slot the value ended up in
    fn sift_down(&mut self, mut pos: usize) -> usize {
        while let Some(child) = self.best_child(pos) {
            self.exchange(pos, child);
            pos = child;
        }
        pos
    }
}

impl<T, C, S, H> PriorityQueue<T> for MutableBinaryHeap<T, C, S, H>
where
    T: Clone + Hash + Eq,
    C: Compare<T>,
    S: Sequence<T>,
    H: BuildHasher,
{
    fn len(&self) -> usize {
        self.len()
    }

    fn push(&mut self, value: T) -> Result<(), HeapError> {
        MutableBinaryHeap::push(self, value)
    }

    fn top(&self) -> Result<&T, HeapError> {
        MutableBinaryHeap::top(self)
    }

    fn pop(&mut self) -> Result<T, HeapError> {
        MutableBinaryHeap::pop(self)
    }

    fn clear(&mut self) {
        MutableBinaryHeap::clear(self)
    }
}

impl<T, C, S, H> MutablePriorityQueue<T> for MutableBinaryHeap<T, C, S, H>
where
    T: Clone + Hash + Eq,
    C: Compare<T>,
    S: Sequence<T>,
    H: BuildHasher,
{
    fn contains(&self, value: &T) -> bool {
        MutableBinaryHeap::contains(self, value)
    }

    fn update(&mut self, value: &T) -> Result<(), HeapError> {
        MutableBinaryHeap::update(self, value)
    }

    fn increase(&mut self, value: &T) -> Result<(), HeapError> {
        MutableBinaryHeap::increase(self, value)
    }

    fn decrease(&mut self, value: &T) -> Result<(), HeapError> {
        MutableBinaryHeap::decrease(self, value)
    }
}

impl<T, C, S, H> Default for MutableBinaryHeap<T, C, S, H>
where
    T: Clone + Hash + Eq,
    C: Compare<T> + Default,
    S: Sequence<T>,
    H: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(C::default(), H::default())
    }
}

impl<T: fmt::Debug, C, S: Sequence<T>, H> fmt::Debug for MutableBinaryHeap<T, C, S, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::KeyComparator;
    use std::cell::RefCell;
    use std::collections::HashMap as StdHashMap;
    use std::rc::Rc;

    type Priorities = Rc<RefCell<StdHashMap<char, i32>>>;

    fn keyed_heap(
        priorities: &Priorities,
    ) -> MutableBinaryHeap<char, KeyComparator<impl Fn(&char) -> i32>> {
        let lookup = Rc::clone(priorities);
        MutableBinaryHeap::with_comparator(KeyComparator(move |c: &char| lookup.borrow()[c]))
    }

    #[test]
    fn test_decrease_after_external_change() {
        let priorities: Priorities =
            Rc::new(RefCell::new(StdHashMap::from([('a', 5), ('b', 3), ('c', 9)])));
        let mut heap = keyed_heap(&priorities);

        heap.push('a').unwrap();
        heap.push('b').unwrap();
        heap.push('c').unwrap();
        assert_eq!(heap.top(), Ok(&'c'));

        priorities.borrow_mut().insert('c', 1);
        heap.decrease(&'c').unwrap();

        assert_eq!(heap.top(), Ok(&'a'));
        assert!(heap.verify_heap_property());
        assert!(heap.verify_index());
        assert_eq!(heap.into_sorted_vec(), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_increase_after_external_change() {
        let priorities: Priorities =
            Rc::new(RefCell::new(StdHashMap::from([('a', 5), ('b', 3), ('c', 9)])));
        let mut heap = keyed_heap(&priorities);
        for c in ['a', 'b', 'c'] {
            heap.push(c).unwrap();
        }

        priorities.borrow_mut().insert('b', 20);
        heap.increase(&'b').unwrap();
        assert_eq!(heap.top(), Ok(&'b'));
        assert!(heap.verify_index());
    }

    #[test]
    fn test_misdirected_adjustments_are_rejected() {
        let priorities: Priorities =
            Rc::new(RefCell::new(StdHashMap::from([('a', 5), ('b', 3), ('c', 9)])));
        let mut heap = keyed_heap(&priorities);
        for c in ['a', 'b', 'c'] {
            heap.push(c).unwrap();
        }

        // 'c' is on top and sank: increase is the wrong call
        priorities.borrow_mut().insert('c', 0);
        assert_eq!(heap.increase(&'c'), Err(HeapError::MisdirectedAdjustment));
        assert!(heap.verify_heap_property());
        assert!(heap.verify_index());
        assert_eq!(heap.top(), Ok(&'a'));

        // 'b' rose above 'a': decrease is the wrong call
        priorities.borrow_mut().insert('b', 50);
        assert_eq!(heap.decrease(&'b'), Err(HeapError::MisdirectedAdjustment));
        assert!(heap.verify_heap_property());
        assert!(heap.verify_index());
        assert_eq!(heap.into_sorted_vec(), vec!['b', 'a', 'c']);
    }

    #[test]
    fn test_rejected_increase_leaves_valid_heap() {
        let costs = Rc::new(RefCell::new(vec![5, 3, 9]));
        let view = Rc::clone(&costs);
        let mut heap = MutableBinaryHeap::with_comparator(KeyComparator(move |i: &usize| {
            view.borrow()[*i]
        }));
        for i in 0..3 {
            heap.push(i).unwrap();
        }
        assert_eq!(heap.top(), Ok(&2));

        costs.borrow_mut()[2] = 0;
        assert_eq!(heap.increase(&2), Err(HeapError::MisdirectedAdjustment));
        assert!(heap.verify_heap_property());
        assert_eq!(heap.top(), Ok(&0));
        assert_eq!(heap.into_sorted_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut heap = MutableBinaryHeap::new();
        for v in [4, 8, 1, 9, 3] {
            heap.push(v).unwrap();
        }
        let before: Vec<i32> = heap.iter().copied().collect();
        for v in [4, 8, 1, 9, 3] {
            heap.update(&v).unwrap();
        }
        let after: Vec<i32> = heap.iter().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_not_found_and_duplicates() {
        let mut heap = MutableBinaryHeap::new();
        heap.push(1).unwrap();
        assert_eq!(heap.push(1), Err(HeapError::DuplicateValue));
        assert_eq!(heap.update(&2), Err(HeapError::NotFound));
        assert_eq!(heap.increase(&2), Err(HeapError::NotFound));
        assert_eq!(heap.decrease(&2), Err(HeapError::NotFound));
        assert_eq!(heap.remove(&2), Err(HeapError::NotFound));
    }

    #[test]
    fn test_empty_heap() {
        let mut heap: MutableBinaryHeap<i32> = MutableBinaryHeap::new();
        assert_eq!(heap.top(), Err(HeapError::EmptyHeap));
        assert_eq!(heap.pop(), Err(HeapError::EmptyHeap));
    }

    #[test]
    fn test_remove_arbitrary() {
        let mut heap = MutableBinaryHeap::new_min();
        for v in 0..20 {
            heap.push(v).unwrap();
        }
        for v in (0..20).filter(|v| v % 3 == 0) {
            assert_eq!(heap.remove(&v), Ok(v));
            assert!(!heap.contains(&v));
            assert!(heap.verify_heap_property());
            assert!(heap.verify_index());
        }
        let expected: Vec<i32> = (0..20).filter(|v| v % 3 != 0).collect();
        assert_eq!(heap.into_sorted_vec(), expected);
    }

    #[test]
    fn test_replace() {
        let mut heap = MutableBinaryHeap::new_min();
        heap.push((10, 'x')).unwrap();
        heap.push((5, 'y')).unwrap();
        heap.push((7, 'z')).unwrap();

        assert_eq!(heap.replace(&(10, 'x'), (1, 'x')), Ok((10, 'x')));
        assert_eq!(heap.top(), Ok(&(1, 'x')));
        assert_eq!(heap.position_of(&(1, 'x')), Some(0));
        assert!(!heap.contains(&(10, 'x')));

        assert_eq!(
            heap.replace(&(1, 'x'), (5, 'y')),
            Err(HeapError::DuplicateValue)
        );
        assert!(heap.verify_index());
    }

    #[test]
    fn test_clear() {
        let mut heap = MutableBinaryHeap::new();
        heap.push("a").unwrap();
        heap.clear();
        assert!(heap.is_empty());
        assert!(!heap.contains(&"a"));
        heap.push("a").unwrap();
        assert_eq!(heap.len(), 1);
    }
}
