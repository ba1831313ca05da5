use core::cmp::Ordering::{Equal, Less};
use core::ops::ControlFlow;

use super::OrderedTree;
use super::node::{Side, TreeEntry, entry, extreme, step};
use crate::{Handle, Storage};

/// The order in which [`OrderedTree::walk`] visits nodes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Smallest key first.
    #[default]
    Ascending,
    /// Greatest key first.
    Descending,
}

impl Direction {
    const fn forward(self) -> Side {
        match self {
            Direction::Ascending => Side::Right,
            Direction::Descending => Side::Left,
        }
    }
}

impl<T: TreeEntry, K: ?Sized, C> OrderedTree<T, K, C> {
    /// Returns the node with the smallest key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn min<S>(&self, storage: &S) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        self.root.map(|root| extreme(storage, root, Side::Left))
    }

    /// Returns the node with the greatest key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn max<S>(&self, storage: &S) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        self.root.map(|root| extreme(storage, root, Side::Right))
    }

    /// Returns the node with the smallest key strictly greater than `key`,
    /// whether or not `key` itself is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use intrusive_order::{Handle, OrderedTree, TreeEntry, TreeNode};
    ///
    /// #[derive(Default)]
    /// struct Item { node: TreeNode, key: i32 }
    ///
    /// impl TreeEntry for Item {
    ///     fn tree_node(&self) -> &TreeNode { &self.node }
    ///     fn tree_node_mut(&mut self) -> &mut TreeNode { &mut self.node }
    /// }
    ///
    /// fn key(item: &Item) -> &i32 { &item.key }
    ///
    /// let mut items: Vec<Item> = [10, 20, 30].into_iter().map(|key| Item { key, ..Item::default() }).collect();
    /// let mut tree = OrderedTree::by_key(key);
    /// for index in 0..items.len() {
    ///     tree.insert(&mut items, Handle::from_index(index)).unwrap();
    /// }
    ///
    /// assert_eq!(tree.successor(&items, &20), Some(Handle::from_index(2)));
    /// assert_eq!(tree.successor(&items, &15), Some(Handle::from_index(1)));
    /// assert_eq!(tree.successor(&items, &30), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn successor<S>(&self, storage: &S, key: &K) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        self.bound(storage, key, Side::Right, false)
    }

    /// Returns the node with the greatest key strictly less than `key`,
    /// whether or not `key` itself is present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn predecessor<S>(&self, storage: &S, key: &K) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        self.bound(storage, key, Side::Left, false)
    }

    /// Like [`successor`](Self::successor), but returns the node with key
    /// equal to `key` when there is one.
    pub fn min_equal_or_greater<S>(&self, storage: &S, key: &K) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        self.bound(storage, key, Side::Right, true)
    }

    /// Like [`predecessor`](Self::predecessor), but returns the node with key
    /// equal to `key` when there is one.
    pub fn max_equal_or_less<S>(&self, storage: &S, key: &K) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        self.bound(storage, key, Side::Left, true)
    }

    /// Single descent that remembers the closest node seen on the `toward`
    /// side of `key`.
    fn bound<S>(&self, storage: &S, key: &K, toward: Side, inclusive: bool) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(handle) = current {
            let record = entry(storage, handle);
            let ordering = (self.compare)(key, (self.key_of)(record));
            // `Less` now means the node lies on the `toward` side of `key`.
            let ordering = match toward {
                Side::Right => ordering,
                Side::Left => ordering.reverse(),
            };
            current = match ordering {
                Equal if inclusive => return Some(handle),
                Less => {
                    best = Some(handle);
                    record.tree_node().child(toward.opposite())
                }
                _ => record.tree_node().child(toward),
            };
        }
        best
    }

    /// Returns the in-order successor of the attached node `handle`.
    ///
    /// # Complexity
    ///
    /// O(log n) worst case, O(1) amortised over a full traversal.
    pub fn next<S>(&self, storage: &S, handle: Handle) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        storage.get(handle)?;
        step(storage, handle, Side::Right)
    }

    /// Returns the in-order predecessor of the attached node `handle`.
    pub fn prev<S>(&self, storage: &S, handle: Handle) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        storage.get(handle)?;
        step(storage, handle, Side::Left)
    }

    /// Visits every node in `direction` order until `visit` breaks.
    ///
    /// Returns the break value, or `Continue` once every node was visited.
    /// The traversal follows parent links, so it uses neither recursion nor
    /// an auxiliary stack.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::ops::ControlFlow;
    /// use intrusive_order::{Direction, Handle, OrderedTree, TreeEntry, TreeNode};
    ///
    /// #[derive(Default)]
    /// struct Item { node: TreeNode, key: i32 }
    ///
    /// impl TreeEntry for Item {
    ///     fn tree_node(&self) -> &TreeNode { &self.node }
    ///     fn tree_node_mut(&mut self) -> &mut TreeNode { &mut self.node }
    /// }
    ///
    /// fn key(item: &Item) -> &i32 { &item.key }
    ///
    /// let mut items: Vec<Item> = [3, 1, 2].into_iter().map(|key| Item { key, ..Item::default() }).collect();
    /// let mut tree = OrderedTree::by_key(key);
    /// for index in 0..items.len() {
    ///     tree.insert(&mut items, Handle::from_index(index)).unwrap();
    /// }
    ///
    /// let mut seen = Vec::new();
    /// let flow = tree.walk(&items, Direction::Descending, |_, item| {
    ///     seen.push(item.key);
    ///     if seen.len() == 2 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    /// });
    /// assert_eq!(flow, ControlFlow::Break(()));
    /// assert_eq!(seen, [3, 2]);
    /// ```
    pub fn walk<S, B, F>(&self, storage: &S, direction: Direction, mut visit: F) -> ControlFlow<B>
    where
        S: Storage<T> + ?Sized,
        F: FnMut(Handle, &T) -> ControlFlow<B>,
    {
        let forward = direction.forward();
        let mut current = self.root.map(|root| extreme(storage, root, forward.opposite()));
        while let Some(handle) = current {
            visit(handle, entry(storage, handle))?;
            current = step(storage, handle, forward);
        }
        ControlFlow::Continue(())
    }
}
