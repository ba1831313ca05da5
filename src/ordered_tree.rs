//! An intrusive, height-balanced (AVL) ordered tree.
//!
//! Records live in caller-owned [`Storage`] and embed a [`TreeNode`]; the tree
//! only rewires the links inside those nodes. It never allocates, copies or
//! drops a record.

use alloc::vec::Vec;
use core::cmp::Ordering::{self, Equal, Greater, Less};

use crate::{Error, Handle, Storage};

mod balance;
mod iter;
mod navigate;
mod node;

pub use iter::Iter;
pub use navigate::Direction;
pub use node::{Side, TreeEntry, TreeNode};

use node::{entry, entry_mut, first_post_order, links, links_mut};

/// Extracts the key of a record. The key may live anywhere the record can
/// reach.
pub type KeyFn<T, K> = for<'a> fn(&'a T) -> &'a K;

/// Orders two keys.
pub type CompareFn<K> = fn(&K, &K) -> Ordering;

/// Called once per node by [`OrderedTree::free`] with the tree's context.
pub type DestroyFn<T, C> = fn(Handle, &mut T, &mut C);

/// An intrusive AVL tree over records in caller-owned storage.
///
/// Keys are unique under the comparator. Every node satisfies the search-tree
/// order, `|height(left) - height(right)| <= 1`, and a cached height equal to
/// one plus the taller child's height. Insert, remove, lookup and the
/// navigation queries are O(log n) and allocation-free.
///
/// # Examples
///
/// ```
/// use intrusive_order::{OrderedTree, TreeEntry, TreeNode};
///
/// #[derive(Default)]
/// struct Order {
///     node: TreeNode,
///     price: u32,
/// }
///
/// impl TreeEntry for Order {
///     fn tree_node(&self) -> &TreeNode { &self.node }
///     fn tree_node_mut(&mut self) -> &mut TreeNode { &mut self.node }
/// }
///
/// fn price(order: &Order) -> &u32 {
///     &order.price
/// }
///
/// let mut book: Vec<Order> = [105, 99, 101]
///     .into_iter()
///     .map(|price| Order { price, ..Order::default() })
///     .collect();
/// let mut tree = OrderedTree::by_key(price);
///
/// for handle in (0..book.len()).map(intrusive_order::Handle::from_index) {
///     tree.insert(&mut book, handle).unwrap();
/// }
///
/// let best = tree.min(&book).unwrap();
/// assert_eq!(tree.key(&book, best), Some(&99));
/// let above = tree.successor(&book, &100).unwrap();
/// assert_eq!(tree.key(&book, above), Some(&101));
/// ```
pub struct OrderedTree<T, K: ?Sized, C = ()> {
    root: Option<Handle>,
    len: usize,
    key_of: KeyFn<T, K>,
    compare: CompareFn<K>,
    destroy: Option<DestroyFn<T, C>>,
    context: C,
}

impl<T, K: ?Sized> OrderedTree<T, K> {
    /// Creates an empty tree that orders records by `compare` applied to the
    /// keys `key_of` extracts.
    #[must_use]
    pub const fn new(key_of: KeyFn<T, K>, compare: CompareFn<K>) -> Self {
        Self {
            root: None,
            len: 0,
            key_of,
            compare,
            destroy: None,
            context: (),
        }
    }

    /// Creates an empty tree ordered by the keys' [`Ord`] implementation.
    #[must_use]
    pub fn by_key(key_of: KeyFn<T, K>) -> Self
    where
        K: Ord,
    {
        Self::new(key_of, K::cmp)
    }
}

impl<T, K: ?Sized, C> OrderedTree<T, K, C> {
    /// Creates an empty tree whose [`free`](Self::free) hands every node to
    /// `destroy` together with `context`.
    #[must_use]
    pub const fn with_destructor(
        key_of: KeyFn<T, K>,
        compare: CompareFn<K>,
        destroy: DestroyFn<T, C>,
        context: C,
    ) -> Self {
        Self {
            root: None,
            len: 0,
            key_of,
            compare,
            destroy: Some(destroy),
            context,
        }
    }

    /// Returns the number of nodes in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the root node, or `None` if the tree is empty.
    #[must_use]
    pub const fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns the destructor context.
    pub const fn context(&self) -> &C {
        &self.context
    }

    /// Returns the destructor context mutably.
    pub const fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Consumes the tree and returns its destructor context.
    ///
    /// Nodes still attached keep their links; call [`free`](Self::free) first
    /// to detach them.
    pub fn into_context(self) -> C {
        self.context
    }
}

impl<T: TreeEntry, K: ?Sized, C> OrderedTree<T, K, C> {
    /// Returns the key of the record behind `handle`.
    pub fn key<'s, S>(&self, storage: &'s S, handle: Handle) -> Option<&'s K>
    where
        T: 's,
        S: Storage<T> + ?Sized,
    {
        storage.get(handle).map(self.key_of)
    }

    /// Returns the child of `handle` on `side`.
    pub fn child<S>(&self, storage: &S, handle: Handle, side: Side) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        storage.get(handle)?.tree_node().child(side)
    }

    /// Returns the parent of `handle`, or `None` for the root.
    pub fn parent<S>(&self, storage: &S, handle: Handle) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        storage.get(handle)?.tree_node().parent()
    }

    /// Returns the cached height of the subtree at `handle`; 0 for `None`.
    pub fn subtree_height<S>(&self, storage: &S, handle: Option<Handle>) -> u32
    where
        S: Storage<T> + ?Sized,
    {
        handle
            .and_then(|handle| storage.get(handle))
            .map_or(0, |record| record.tree_node().height())
    }

    /// Returns `true` if `handle` is attached to this tree.
    ///
    /// # Complexity
    ///
    /// O(log n): walks parent links to the root.
    pub fn contains<S>(&self, storage: &S, handle: Handle) -> bool
    where
        S: Storage<T> + ?Sized,
    {
        let Some(root) = self.root else {
            return false;
        };
        let Some(mut record) = storage.get(handle) else {
            return false;
        };

        // A member sits at most `height(root) - 1` links below the root.
        let mut current = handle;
        for _ in 0..links(storage, root).height {
            let Some(parent) = record.tree_node().parent() else {
                return current == root;
            };
            let Some(up) = storage.get(parent) else {
                return false;
            };
            current = parent;
            record = up;
        }
        false
    }

    /// Returns the node whose key equals `key`.
    pub fn lookup<S>(&self, storage: &S, key: &K) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let record = entry(storage, handle);
            current = match (self.compare)(key, (self.key_of)(record)) {
                Less => record.tree_node().child(Side::Left),
                Greater => record.tree_node().child(Side::Right),
                Equal => return Some(handle),
            };
        }
        None
    }

    /// Attaches the detached node `handle` and returns it.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `handle` is not in `storage`, or its
    ///   node is not detached.
    /// - [`Error::DuplicateKey`] if a node with an equal key is present. The
    ///   existing node is left untouched.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert<S>(&mut self, storage: &mut S, handle: Handle) -> Result<Handle, Error>
    where
        S: Storage<T> + ?Sized,
    {
        let record = storage.get(handle).ok_or_else(|| rejected("insert", Error::InvalidArgument))?;
        if !record.tree_node().is_detached() {
            return Err(rejected("insert", Error::InvalidArgument));
        }

        let key = (self.key_of)(record);
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(up) = current {
            let record = entry(storage, up);
            side = match (self.compare)(key, (self.key_of)(record)) {
                Less => Side::Left,
                Greater => Side::Right,
                Equal => return Err(rejected("insert", Error::DuplicateKey)),
            };
            parent = Some(up);
            current = record.tree_node().child(side);
        }

        *links_mut(storage, handle) = TreeNode {
            children: [None, None],
            parent,
            height: 1,
        };
        match parent {
            None => self.root = Some(handle),
            Some(parent) => links_mut(storage, parent).set_child(side, Some(handle)),
        }
        self.len += 1;
        self.rebalance_upward(storage, parent);

        #[cfg(feature = "tracing")]
        tracing::trace!(handle = handle.to_index(), len = self.len, "ordered_tree: insert");

        Ok(handle)
    }

    /// Detaches `handle` from the tree.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `handle` is not in `storage`.
    /// - [`Error::NotFound`] if `handle` is not attached to this tree.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<S>(&mut self, storage: &mut S, handle: Handle) -> Result<(), Error>
    where
        S: Storage<T> + ?Sized,
    {
        if storage.get(handle).is_none() {
            return Err(rejected("remove", Error::InvalidArgument));
        }
        if !self.contains(storage, handle) {
            return Err(rejected("remove", Error::NotFound));
        }
        self.unlink(storage, handle);
        Ok(())
    }

    /// Detaches the node whose key equals `key` and returns it.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if no node has an equal key.
    pub fn remove_by_key<S>(&mut self, storage: &mut S, key: &K) -> Result<Handle, Error>
    where
        S: Storage<T> + ?Sized,
    {
        let handle = self
            .lookup(storage, key)
            .ok_or_else(|| rejected("remove_by_key", Error::NotFound))?;
        self.unlink(storage, handle);
        Ok(handle)
    }

    fn unlink<S>(&mut self, storage: &mut S, handle: Handle)
    where
        S: Storage<T> + ?Sized,
    {
        let node = links(storage, handle);
        let start = match (node.child(Side::Left), node.child(Side::Right)) {
            (Some(_), Some(right)) => {
                // The in-order successor has no left child: splice it out, then
                // move it into `handle`'s position.
                let successor = node::extreme(storage, right, Side::Left);
                let successor_node = links(storage, successor);
                self.replace_child(
                    storage,
                    successor_node.parent,
                    successor,
                    successor_node.child(Side::Right),
                );

                let node = links(storage, handle);
                *links_mut(storage, successor) = node;
                for child in node.children.into_iter().flatten() {
                    links_mut(storage, child).parent = Some(successor);
                }
                self.replace_child(storage, node.parent, handle, Some(successor));

                if successor_node.parent == Some(handle) {
                    Some(successor)
                } else {
                    successor_node.parent
                }
            }
            (child, None) | (None, child) => {
                self.replace_child(storage, node.parent, handle, child);
                node.parent
            }
        };

        *links_mut(storage, handle) = TreeNode::new();
        self.len -= 1;
        self.rebalance_upward(storage, start);

        #[cfg(feature = "tracing")]
        tracing::trace!(handle = handle.to_index(), len = self.len, "ordered_tree: remove");
    }

    /// Writes every handle in ascending key order into `out` and returns how
    /// many were written.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `out` is shorter than [`len`](Self::len).
    pub fn to_ordered_array<S>(&self, storage: &S, out: &mut [Handle]) -> Result<usize, Error>
    where
        S: Storage<T> + ?Sized,
    {
        if out.len() < self.len {
            return Err(rejected("to_ordered_array", Error::InvalidArgument));
        }
        for (slot, (handle, _)) in out.iter_mut().zip(self.iter(storage)) {
            *slot = handle;
        }
        Ok(self.len)
    }

    /// Collects every handle in ascending key order.
    pub fn to_vec<S>(&self, storage: &S) -> Vec<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        self.iter(storage).map(|(handle, _)| handle).collect()
    }

    /// Returns an iterator over `(handle, record)` pairs in ascending key order.
    pub fn iter<'a, S>(&self, storage: &'a S) -> Iter<'a, T, S>
    where
        S: Storage<T> + ?Sized,
    {
        Iter::new(storage, self.root, self.len)
    }

    /// Detaches every node, post-order, handing each one to the destructor
    /// (if any) after its links are cleared. The tree is empty afterwards.
    ///
    /// Records themselves are never dropped; the destructor decides what
    /// tearing a node down means.
    ///
    /// # Complexity
    ///
    /// O(n) time, O(1) extra space.
    pub fn free<S>(&mut self, storage: &mut S)
    where
        S: Storage<T> + ?Sized,
    {
        let Some(root) = self.root.take() else {
            return;
        };
        self.len = 0;

        let mut current = Some(first_post_order(storage, root));
        while let Some(handle) = current {
            current = match links(storage, handle).parent {
                None => None,
                Some(parent) => match links(storage, parent).child(Side::Right) {
                    Some(right) if right != handle => Some(first_post_order(storage, right)),
                    _ => Some(parent),
                },
            };

            *links_mut(storage, handle) = TreeNode::new();
            if let Some(destroy) = self.destroy {
                destroy(handle, entry_mut(storage, handle), &mut self.context);
            }
        }
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn rejected(operation: &'static str, error: Error) -> Error {
    #[cfg(feature = "tracing")]
    tracing::debug!(operation, %error, "ordered_tree: rejected");
    error
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use core::ops::Bound::{Excluded, Included, Unbounded};
    use proptest::prelude::*;

    #[derive(Clone, Debug, Default)]
    struct Record {
        node: TreeNode,
        value: i32,
    }

    impl TreeEntry for Record {
        fn tree_node(&self) -> &TreeNode {
            &self.node
        }

        fn tree_node_mut(&mut self) -> &mut TreeNode {
            &mut self.node
        }
    }

    fn value_of(record: &Record) -> &i32 {
        &record.value
    }

    fn records(values: impl IntoIterator<Item = i32>) -> Vec<Record> {
        values
            .into_iter()
            .map(|value| Record {
                node: TreeNode::new(),
                value,
            })
            .collect()
    }

    impl<T: TreeEntry, K: ?Sized + Ord, C> OrderedTree<T, K, C> {
        /// Checks search order, balance, cached heights, parent links and the
        /// node count. Panics with a descriptive message on the first breach.
        pub(crate) fn validate_invariants<S: Storage<T> + ?Sized>(&self, storage: &S) {
            fn check<T: TreeEntry, K: ?Sized + Ord, C, S: Storage<T> + ?Sized>(
                tree: &OrderedTree<T, K, C>,
                storage: &S,
                handle: Option<Handle>,
                parent: Option<Handle>,
                low: Option<&K>,
                high: Option<&K>,
                count: &mut usize,
            ) -> u32 {
                let Some(handle) = handle else {
                    return 0;
                };
                *count += 1;
                let node = links(storage, handle);
                let key = tree.key(storage, handle).unwrap();
                assert_eq!(node.parent, parent, "parent link of {handle:?}");
                if let Some(low) = low {
                    assert!(low < key, "order violated at {handle:?}");
                }
                if let Some(high) = high {
                    assert!(key < high, "order violated at {handle:?}");
                }
                let left = check(tree, storage, node.child(Side::Left), Some(handle), low, Some(key), count);
                let right = check(tree, storage, node.child(Side::Right), Some(handle), Some(key), high, count);
                assert!(left.abs_diff(right) <= 1, "unbalanced at {handle:?}: {left} vs {right}");
                assert_eq!(node.height, 1 + left.max(right), "cached height of {handle:?}");
                node.height
            }

            let mut count = 0;
            check(self, storage, self.root, None, None, None, &mut count);
            assert_eq!(count, self.len, "node count");
        }
    }

    #[test]
    fn rotations_keep_three_sequential_keys_balanced() {
        let mut storage = records([1, 2, 3]);
        let mut tree: OrderedTree<Record, i32> = OrderedTree::by_key(value_of);
        for index in 0..3 {
            tree.insert(&mut storage, Handle::from_index(index)).unwrap();
            tree.validate_invariants(&storage);
        }

        let root = tree.root().unwrap();
        assert_eq!(tree.key(&storage, root), Some(&2));
        assert_eq!(tree.subtree_height(&storage, Some(root)), 2);
        assert_eq!(tree.child(&storage, root, Side::Left), Some(Handle::from_index(0)));
        assert_eq!(tree.child(&storage, root, Side::Right), Some(Handle::from_index(2)));
    }

    #[test]
    fn zig_zag_insert_uses_double_rotation() {
        let mut storage = records([30, 10, 20]);
        let mut tree: OrderedTree<Record, i32> = OrderedTree::by_key(value_of);
        for index in 0..3 {
            tree.insert(&mut storage, Handle::from_index(index)).unwrap();
        }
        tree.validate_invariants(&storage);
        assert_eq!(tree.root(), Some(Handle::from_index(2)));
    }

    #[test]
    fn removing_two_child_node_promotes_successor() {
        let mut storage = records([50, 30, 70, 20, 40, 60, 80, 65]);
        let mut tree: OrderedTree<Record, i32> = OrderedTree::by_key(value_of);
        for index in 0..storage.len() {
            tree.insert(&mut storage, Handle::from_index(index)).unwrap();
        }

        tree.remove(&mut storage, Handle::from_index(0)).unwrap();
        tree.validate_invariants(&storage);
        assert_eq!(tree.key(&storage, tree.root().unwrap()), Some(&60));
        assert!(storage[0].node.is_detached());
    }

    #[test]
    fn single_root_cannot_be_inserted_twice() {
        let mut storage = records([7]);
        let mut tree: OrderedTree<Record, i32> = OrderedTree::by_key(value_of);
        let handle = Handle::from_index(0);
        tree.insert(&mut storage, handle).unwrap();
        assert_eq!(tree.insert(&mut storage, handle), Err(Error::InvalidArgument));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn free_visits_children_before_parents() {
        fn record_order(handle: Handle, _: &mut Record, seen: &mut Vec<Handle>) {
            seen.push(handle);
        }

        let mut storage = records(0..31);
        let mut tree: OrderedTree<Record, i32, Vec<Handle>> =
            OrderedTree::with_destructor(value_of, i32::cmp, record_order, Vec::new());
        for index in 0..storage.len() {
            tree.insert(&mut storage, Handle::from_index(index)).unwrap();
        }

        let mut parents = vec![None; storage.len()];
        for index in 0..storage.len() {
            parents[index] = storage[index].node.parent();
        }

        tree.free(&mut storage);
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);

        let seen = tree.into_context();
        assert_eq!(seen.len(), storage.len());
        let position = |handle: Handle| seen.iter().position(|&h| h == handle).unwrap();
        for (index, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                assert!(position(Handle::from_index(index)) < position(*parent));
            }
        }
        assert!(storage.iter().all(|record| record.node.is_detached()));
    }

    // ─── Randomized operations checked against BTreeMap ─────────────────────

    const KEYS: usize = 128;

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32, bool),
        RemoveByKey(i32),
        Remove(i32, bool),
        Probe(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let key = 0..KEYS as i32;
        prop_oneof![
            5 => (key.clone(), any::<bool>()).prop_map(|(k, twin)| Op::Insert(k, twin)),
            2 => key.clone().prop_map(Op::RemoveByKey),
            2 => (key.clone(), any::<bool>()).prop_map(|(k, twin)| Op::Remove(k, twin)),
            2 => (-1..=KEYS as i32).prop_map(Op::Probe),
        ]
    }

    // Index `k` and its twin `KEYS + k` both carry key `k`.
    fn handle_for(key: i32, twin: bool) -> Handle {
        Handle::from_index(key as usize + if twin { KEYS } else { 0 })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn tree_matches_btreemap(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut storage = records((0..KEYS as i32).chain(0..KEYS as i32));
            let mut tree: OrderedTree<Record, i32> = OrderedTree::by_key(value_of);
            let mut model: BTreeMap<i32, Handle> = BTreeMap::new();

            for op in &ops {
                match *op {
                    Op::Insert(key, twin) => {
                        let handle = handle_for(key, twin);
                        let expected = match model.get(&key) {
                            Some(&present) if present == handle => Err(Error::InvalidArgument),
                            Some(_) => Err(Error::DuplicateKey),
                            None => {
                                model.insert(key, handle);
                                Ok(handle)
                            }
                        };
                        prop_assert_eq!(tree.insert(&mut storage, handle), expected);
                    }
                    Op::RemoveByKey(key) => {
                        let expected = model.remove(&key).ok_or(Error::NotFound);
                        prop_assert_eq!(tree.remove_by_key(&mut storage, &key), expected);
                    }
                    Op::Remove(key, twin) => {
                        let handle = handle_for(key, twin);
                        let expected = if model.get(&key) == Some(&handle) {
                            model.remove(&key);
                            Ok(())
                        } else {
                            Err(Error::NotFound)
                        };
                        prop_assert_eq!(tree.remove(&mut storage, handle), expected);
                    }
                    Op::Probe(key) => {
                        let next = model.range((Excluded(key), Unbounded)).next().map(|(_, &h)| h);
                        let prev = model.range(..key).next_back().map(|(_, &h)| h);
                        let at_least = model.range(key..).next().map(|(_, &h)| h);
                        let at_most = model.range((Unbounded, Included(key))).next_back().map(|(_, &h)| h);
                        prop_assert_eq!(tree.successor(&storage, &key), next);
                        prop_assert_eq!(tree.predecessor(&storage, &key), prev);
                        prop_assert_eq!(tree.min_equal_or_greater(&storage, &key), at_least);
                        prop_assert_eq!(tree.max_equal_or_less(&storage, &key), at_most);
                        prop_assert_eq!(tree.lookup(&storage, &key), model.get(&key).copied());
                    }
                }

                tree.validate_invariants(&storage);
                prop_assert_eq!(tree.len(), model.len());
                prop_assert_eq!(tree.to_vec(&storage), model.values().copied().collect::<Vec<_>>());
                for index in 0..storage.len() {
                    let handle = Handle::from_index(index);
                    let attached = model.get(&storage[index].value) == Some(&handle);
                    prop_assert_eq!(tree.contains(&storage, handle), attached);
                    if !attached {
                        prop_assert!(storage[index].node.is_detached());
                    }
                }
            }
        }
    }
}
