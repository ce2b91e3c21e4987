//! Binomial Heap implementation
//!
//! A binomial heap is a forest of binomial trees with:
//! - O(log n) push (O(1) amortized over a run of pushes)
//! - O(log n) pop
//! - O(log n) merge of two forests
//! - O(log n) top (a scan of the roots)
//!
//! # Algorithm Overview
//!
//! A binomial heap maintains a collection of binomial trees
//! (see [`crate::binomial_tree`]), where:
//! - Each tree satisfies the heap property
//! - At most one tree of each order (0, 1, 2, ..., log n)
//! - This is analogous to binary representation of n: slot `i` is populated
//!   exactly when bit `i` of `len` is set
//!
//! **Key Operations**:
//! - **Merge**: ripple-carry addition over the two forests
//! - **Push**: merge a one-node forest into the heap
//! - **Pop**: find the best root, explode its tree into a forest of its
//!   children, merge that forest back in
//!
//! # Example
//!
//! ```rust
//! use priority_heaps::binomial::BinomialHeap;
//!
//! let mut a = BinomialHeap::new_min();
//! let mut b = BinomialHeap::new_min();
//! a.extend([1, 2, 3]);
//! b.extend([4, 5]);
//!
//! a.merge(&mut b);
//! assert_eq!(a.len(), 5);
//! assert!(b.is_empty());
//! assert_eq!(a.top(), Ok(&1));
//! ```

use crate::binomial_tree::{self, Arena, Node, NodeKey};
use crate::compare::{precedes, Compare, MaxComparator, MinComparator};
use crate::traits::{HeapError, MergeableHeap, PriorityQueue};
use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;
use std::mem;

/// Binomial Heap
///
/// - `T`: the stored value
/// - `C`: the comparator, [`MaxComparator`] by default (greatest value on top)
#[derive(Clone)]
pub struct BinomialHeap<T, C = MaxComparator> {
    /// Owns every node of every tree
    pub(crate) arena: Arena<T>,
    /// Roots indexed by order. Each slot holds at most one tree.
    pub(crate) trees: Vec<Option<NodeKey>>,
    len: usize,
    pub(crate) cmp: C,
}

impl<T: Ord> BinomialHeap<T> {
    /// Creates an empty max-heap
    pub fn new() -> Self {
        Self::with_comparator(MaxComparator)
    }
}

impl<T: Ord> BinomialHeap<T, MinComparator> {
    /// Creates an empty min-heap
    pub fn new_min() -> Self {
        Self::with_comparator(MinComparator)
    }
}

impl<T, C: Compare<T>> BinomialHeap<T, C> {
    /// Creates an empty heap ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            arena: Arena::with_key(),
            trees: Vec::new(),
            len: 0,
            cmp,
        }
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The comparator ordering this heap
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Number of trees in the forest (populated order slots)
    ///
    /// Never more than ⌊log₂(len)⌋ + 1.
    pub fn tree_count(&self) -> usize {
        self.trees.iter().flatten().count()
    }

    /// Inserts a value
    ///
    /// **Time Complexity**: O(log n) worst-case, O(1) amortized
    ///
    /// Merging a one-node forest is a binary counter increment: the carry
    /// only ripples as far as the lowest empty slot.
    pub fn push(&mut self, value: T) {
        self.push_node(value);
    }

    /// Inserts a value and returns the key of the node that holds it
    pub(crate) fn push_node(&mut self, value: T) -> NodeKey {
        let key = self.arena.insert(Node::new(value));
        self.merge_forest(vec![Some(key)]);
        self.len += 1;
        key
    }

    /// Returns the top value
    ///
    /// **Time Complexity**: O(log n), a scan of the roots
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements.
    pub fn top(&self) -> Result<&T, HeapError> {
        let order = self.best_root().ok_or(HeapError::EmptyHeap)?;
        self.trees[order]
            .map(|key| &self.arena[key].value)
            .ok_or(HeapError::EmptyHeap)
    }

    /// Removes and returns the top value
    ///
    /// **Time Complexity**: O(log n)
    ///
    /// **Algorithm**:
    /// 1. Scan the roots for the best one (empty slots never win)
    /// 2. Detach its tree from the forest
    /// 3. Explode the tree: a Bₖ root's children are B_{k-1}, ..., B₀ trees,
    ///    which reversed form a forest indexed by order
    /// 4. Merge that forest back into the heap
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no elements.
    pub fn pop(&mut self) -> Result<T, HeapError> {
        let order = self.best_root().ok_or(HeapError::EmptyHeap)?;
        let root = self.trees[order].take().ok_or(HeapError::EmptyHeap)?;

        let children = binomial_tree::explode(&mut self.arena, root);
        let node = self.arena.remove(root).ok_or(HeapError::EmptyHeap)?;
        log::trace!("popped root of order {}", order);

        self.merge_forest(children);
        self.len -= 1;

        debug_assert_eq!(
            self.arena.len(),
            self.len,
            "Length mismatch after pop: arena holds {} nodes but len is {}",
            self.arena.len(),
            self.len
        );

        Ok(node.value)
    }

    /// Moves every element of `other` into this heap, leaving `other` empty
    ///
    /// **Time Complexity**: O(log n) for the forest merge, plus O(m) to move
    /// the nodes of the smaller heap into the larger heap's arena.
    ///
    /// Both heaps must order their values the same way; this heap's
    /// comparator is kept.
    pub fn merge(&mut self, other: &mut Self) {
        self.absorb(other, |_, _| {});
    }

    /// Merges `other` in, reporting the new key of every node that changed arenas
    pub(crate) fn absorb(&mut self, other: &mut Self, on_move: impl FnMut(NodeKey, &T)) {
        if other.is_empty() {
            return;
        }

        let mut incoming = mem::take(&mut other.trees);
        // relocate whichever side has fewer nodes
        if self.arena.len() < other.arena.len() {
            mem::swap(&mut self.arena, &mut other.arena);
            mem::swap(&mut self.trees, &mut incoming);
        }
        binomial_tree::transplant(&mut other.arena, &mut self.arena, &mut incoming, on_move);

        self.merge_forest(incoming);
        self.len += other.len;
        other.len = 0;
    }

    /// Combines `incoming` into the forest, exactly like binary addition with carry
    ///
    /// **Algorithm**:
    /// 1. Extend both forests with empty slots up to the larger order
    /// 2. For each order from low to high, collect up to three addends: the
    ///    carry, this forest's tree, the incoming tree
    /// 3. Resolve by count:
    ///    - 0: slot empty, no carry
    ///    - 1: slot holds it, no carry
    ///    - 2: slot empty, carry = link of the two
    ///    - 3: slot holds one, carry = link of the other two
    /// 4. A carry left after the last order becomes a new highest tree
    ///
    /// **Invariant**: After merge, at most one tree of each order.
    fn merge_forest(&mut self, mut incoming: Vec<Option<NodeKey>>) {
        let orders = self.trees.len().max(incoming.len());
        self.trees.resize(orders, None);
        incoming.resize(orders, None);

        let mut carry: Option<NodeKey> = None;
        let mut links = 0;

        for (order, theirs) in incoming.into_iter().enumerate() {
            let addends: SmallVec<[NodeKey; 3]> = [carry.take(), self.trees[order].take(), theirs]
                .into_iter()
                .flatten()
                .collect();

            match *addends.as_slice() {
                [] => {}
                [tree] => self.trees[order] = Some(tree),
                [l, r] => {
                    carry = Some(binomial_tree::link(&mut self.arena, l, r, &self.cmp));
                    links += 1;
                }
                [keep, l, r] => {
                    self.trees[order] = Some(keep);
                    carry = Some(binomial_tree::link(&mut self.arena, l, r, &self.cmp));
                    links += 1;
                }
                _ => unreachable!("at most three addends per order"),
            }
        }

        if carry.is_some() {
            self.trees.push(carry);
        }
        while let Some(None) = self.trees.last() {
            self.trees.pop();
        }

        log::trace!(
            "forest merge: {} links, {} trees over {} orders",
            links,
            self.tree_count(),
            self.trees.len()
        );
    }

    /// Order of the root that precedes every other root
    fn best_root(&self) -> Option<usize> {
        let mut best: Option<(usize, NodeKey)> = None;
        for (order, slot) in self.trees.iter().enumerate() {
            let Some(key) = *slot else { continue };
            match best {
                Some((_, incumbent))
                    if !precedes(&self.cmp, &self.arena[key].value, &self.arena[incumbent].value) => {}
                _ => best = Some((order, key)),
            }
        }
        best.map(|(order, _)| order)
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.arena.clear();
        self.trees.clear();
        self.len = 0;
    }

    /// Iterates over the elements in arena order (not sorted)
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.arena.values().map(|node| &node.value)
    }

    /// Consumes the heap, returning the elements in pop order
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len);
        while let Ok(value) = self.pop() {
            sorted.push(value);
        }
        sorted
    }

    /// Checks the heap property over every parent/child pair
    pub fn verify_heap_property(&self) -> bool {
        self.arena.values().all(|node| {
            node.parent
                .map_or(true, |p| !precedes(&self.cmp, &node.value, &self.arena[p].value))
        })
    }

    /// Checks the forest shape
    ///
    /// Slot `i` must hold a root of order `i` with no parent whose tree has
    /// exactly 2ⁱ well-formed nodes, and the trees must account for every
    /// node in the arena.
    pub fn verify_structure(&self) -> bool {
        let mut total = 0;
        for (order, slot) in self.trees.iter().enumerate() {
            let Some(root) = *slot else { continue };
            let node = &self.arena[root];
            if usize::from(node.order) != order || node.parent.is_some() || node.sibling.is_some() {
                return false;
            }
            match binomial_tree::verify_subtree(&self.arena, root, &self.cmp) {
                Some(count) => total += count,
                None => return false,
            }
        }
        total == self.len && self.arena.len() == self.len
    }
}

impl<T, C: Compare<T>> PriorityQueue<T> for BinomialHeap<T, C> {
    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, value: T) -> Result<(), HeapError> {
        BinomialHeap::push(self, value);
        Ok(())
    }

    fn top(&self) -> Result<&T, HeapError> {
        BinomialHeap::top(self)
    }

    fn pop(&mut self) -> Result<T, HeapError> {
        BinomialHeap::pop(self)
    }

    fn clear(&mut self) {
        BinomialHeap::clear(self)
    }
}

impl<T, C: Compare<T>> MergeableHeap<T> for BinomialHeap<T, C> {
    fn merge(&mut self, other: &mut Self) -> Result<(), HeapError> {
        BinomialHeap::merge(self, other);
        Ok(())
    }
}

impl<T, C: Compare<T> + Default> Default for BinomialHeap<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: fmt::Debug, C: Compare<T>> fmt::Debug for BinomialHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinomialHeap")
            .field("len", &self.len)
            .field("trees", &self.tree_count())
            .field("values", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<T, C: Compare<T>> Extend<T> for BinomialHeap<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for BinomialHeap<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::default();
        heap.extend(iter);
        heap
    }
}
