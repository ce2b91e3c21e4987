//! Binomial trees stored in a node arena
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees
//! - Bₖ has exactly 2ᵏ nodes, and its root has children of orders
//!   k-1, k-2, ..., 0 (in that sibling order)
//!
//! Nodes use the classic child/sibling representation: each node knows its
//! leftmost child and its right sibling, plus a parent back-link used when a
//! value has to travel toward the root. Nodes live in a [`SlotMap`] arena and
//! refer to each other by [`NodeKey`]; a missing parent, child or sibling is
//! `None`.
//!
//! Every tree in this module satisfies the heap property under the
//! comparator passed to [`link`]: a node never precedes its parent.

use crate::compare::{precedes, Compare};
use crate::order::{checked_increment, tree_size, Order};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena key of a binomial tree node
    pub struct NodeKey;
}

/// Arena node
///
/// **Memory Model**: the arena owns every node; `parent`, `child` and
/// `sibling` are plain keys into the same arena.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    /// None if root
    pub(crate) parent: Option<NodeKey>,
    /// Leftmost child, the one of highest order. None if leaf
    pub(crate) child: Option<NodeKey>,
    /// Next sibling in parent's child list, one order lower. None if last child
    pub(crate) sibling: Option<NodeKey>,
    /// Number of children. A Bₖ root has order k
    pub(crate) order: Order,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            parent: None,
            child: None,
            sibling: None,
            order: 0,
        }
    }
}

pub(crate) type Arena<T> = SlotMap<NodeKey, Node<T>>;

/// Iterates over the children of `key`, highest order first
pub(crate) fn children<T>(arena: &Arena<T>, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
    std::iter::successors(arena[key].child, move |&child| arena[child].sibling)
}

/// Links two binomial trees of the same order into one tree of order+1
///
/// **Time Complexity**: O(1)
///
/// The root that does not precede the other becomes the new leftmost child
/// of the winning root. Ties keep `l` on top. This is the only place two
/// trees are ordered against each other.
pub(crate) fn link<T, C: Compare<T>>(
    arena: &mut Arena<T>,
    l: NodeKey,
    r: NodeKey,
    cmp: &C,
) -> NodeKey {
    debug_assert_eq!(arena[l].order, arena[r].order, "link: orders differ");

    let (root, child) = if precedes(cmp, &arena[r].value, &arena[l].value) {
        (r, l)
    } else {
        (l, r)
    };

    let first = arena[root].child;
    {
        let child_node = &mut arena[child];
        child_node.parent = Some(root);
        child_node.sibling = first;
    }

    let root_node = &mut arena[root];
    root_node.child = Some(child);
    root_node.order = checked_increment(root_node.order);
    root
}

/// Detaches the children of `root` and returns them as a forest
///
/// A Bₖ root has children of orders k-1, ..., 0 in sibling order; the
/// returned forest holds them reversed, so slot `i` is the child of order `i`.
/// Each child loses its parent and sibling links. `root` is left childless.
pub(crate) fn explode<T>(arena: &mut Arena<T>, root: NodeKey) -> Vec<Option<NodeKey>> {
    let mut forest = Vec::with_capacity(usize::from(arena[root].order));
    let mut current = arena[root].child.take();
    arena[root].order = 0;

    while let Some(key) = current {
        let node = &mut arena[key];
        current = node.sibling.take();
        node.parent = None;
        forest.push(Some(key));
    }

    forest.reverse();
    debug_assert!(forest
        .iter()
        .enumerate()
        .all(|(order, slot)| slot.map_or(false, |key| usize::from(arena[key].order) == order)));
    forest
}

/// Number of nodes in the subtree rooted at `root`
#[cfg(test)]
pub(crate) fn subtree_len<T>(arena: &Arena<T>, root: NodeKey) -> usize {
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(key) = stack.pop() {
        count += 1;
        stack.extend(children(arena, key));
    }
    count
}

/// Checks the subtree rooted at `key` and returns its node count
///
/// Returns `None` if a child's order, parent link or priority is out of
/// place, or if the subtree does not hold exactly 2ᵏ nodes.
pub(crate) fn verify_subtree<T, C: Compare<T>>(
    arena: &Arena<T>,
    key: NodeKey,
    cmp: &C,
) -> Option<usize> {
    let node = &arena[key];
    let mut expected = node.order;
    let mut count = 1;

    for child in children(arena, key) {
        let child_node = &arena[child];
        expected = expected.checked_sub(1)?;
        if child_node.order != expected
            || child_node.parent != Some(key)
            || precedes(cmp, &child_node.value, &node.value)
        {
            return None;
        }
        count += verify_subtree(arena, child, cmp)?;
    }

    (expected == 0 && Some(count) == tree_size(node.order)).then_some(count)
}

/// Moves every node of `from` into `into`
///
/// Links are rewritten to the new keys, `roots` (keys into `from`) are
/// re-pointed in place, and `on_move` is told the new key of every value.
/// `from` is left empty.
///
/// **Time Complexity**: O(m) for m moved nodes
pub(crate) fn transplant<T>(
    from: &mut Arena<T>,
    into: &mut Arena<T>,
    roots: &mut [Option<NodeKey>],
    mut on_move: impl FnMut(NodeKey, &T),
) {
    let mut remap: FxHashMap<NodeKey, NodeKey> = FxHashMap::default();
    remap.reserve(from.len());

    let mut moved = Vec::with_capacity(from.len());
    for (old, node) in from.drain() {
        let new = into.insert(node);
        remap.insert(old, new);
        moved.push(new);
    }

    let relink = |key: Option<NodeKey>| key.map(|k| remap[&k]);
    for &key in &moved {
        let node = &mut into[key];
        node.parent = relink(node.parent);
        node.child = relink(node.child);
        node.sibling = relink(node.sibling);
        on_move(key, &node.value);
    }

    for root in roots.iter_mut() {
        *root = relink(*root);
    }

    log::trace!("transplanted {} binomial nodes", moved.len());
}
