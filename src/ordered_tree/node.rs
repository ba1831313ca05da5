use crate::{Handle, Storage};

/// Which child of a [`TreeNode`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    /// The child holding smaller keys.
    Left = 0,
    /// The child holding greater keys.
    Right = 1,
}

impl Side {
    /// Returns the other side.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// The links an [`OrderedTree`](super::OrderedTree) threads through a record.
///
/// A record embeds one `TreeNode` per tree it can belong to and exposes it
/// through [`TreeEntry`]. A default (all links empty, height zero) node is
/// detached; insertion attaches it and removal detaches it again. A node that
/// is not detached cannot be inserted.
///
/// # Examples
///
/// ```
/// use intrusive_order::{Side, TreeNode};
///
/// let node = TreeNode::new();
/// assert!(node.is_detached());
/// assert_eq!(node.child(Side::Left), None);
/// assert_eq!(node.height(), 0);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TreeNode {
    pub(super) children: [Option<Handle>; 2],
    pub(super) parent: Option<Handle>,
    // Leaf = 1; an absent child counts as 0.
    pub(super) height: u32,
}

impl TreeNode {
    /// Creates a detached node.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            children: [None, None],
            parent: None,
            height: 0,
        }
    }

    /// Returns the child on `side`.
    #[inline]
    #[must_use]
    pub const fn child(&self, side: Side) -> Option<Handle> {
        self.children[side as usize]
    }

    /// Returns the parent, or `None` for the root and for detached nodes.
    #[inline]
    #[must_use]
    pub const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    /// Returns the cached height of the subtree rooted here.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns `true` if the node belongs to no tree.
    ///
    /// An attached node always has a height of at least 1, so the root of a
    /// single-node tree is told apart from a detached node by its height.
    #[inline]
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.height == 0 && self.children[0].is_none() && self.children[1].is_none() && self.parent.is_none()
    }

    #[inline]
    pub(super) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        self.children[side as usize] = child;
    }
}

/// A record that embeds a [`TreeNode`].
///
/// # Examples
///
/// ```
/// use intrusive_order::{TreeEntry, TreeNode};
///
/// struct Timer {
///     by_deadline: TreeNode,
///     deadline: u64,
/// }
///
/// impl TreeEntry for Timer {
///     fn tree_node(&self) -> &TreeNode {
///         &self.by_deadline
///     }
///
///     fn tree_node_mut(&mut self) -> &mut TreeNode {
///         &mut self.by_deadline
///     }
/// }
/// ```
pub trait TreeEntry {
    /// Returns the embedded node.
    fn tree_node(&self) -> &TreeNode;

    /// Returns the embedded node mutably.
    fn tree_node_mut(&mut self) -> &mut TreeNode;
}

#[inline]
pub(super) fn entry<T, S>(storage: &S, handle: Handle) -> &T
where
    S: Storage<T> + ?Sized,
{
    storage.get(handle).expect("`OrderedTree` - linked `handle` is missing from storage!")
}

#[inline]
pub(super) fn entry_mut<T, S>(storage: &mut S, handle: Handle) -> &mut T
where
    S: Storage<T> + ?Sized,
{
    storage.get_mut(handle).expect("`OrderedTree` - linked `handle` is missing from storage!")
}

#[inline]
pub(super) fn links<T, S>(storage: &S, handle: Handle) -> TreeNode
where
    T: TreeEntry,
    S: Storage<T> + ?Sized,
{
    *entry(storage, handle).tree_node()
}

#[inline]
pub(super) fn links_mut<'a, T, S>(storage: &'a mut S, handle: Handle) -> &'a mut TreeNode
where
    T: TreeEntry + 'a,
    S: Storage<T> + ?Sized,
{
    entry_mut(storage, handle).tree_node_mut()
}

#[inline]
pub(super) fn height_of<T, S>(storage: &S, handle: Option<Handle>) -> u32
where
    T: TreeEntry,
    S: Storage<T> + ?Sized,
{
    handle.map_or(0, |handle| links(storage, handle).height)
}

/// Follows `side` links from `handle` as far as they go.
pub(super) fn extreme<T, S>(storage: &S, mut handle: Handle, side: Side) -> Handle
where
    T: TreeEntry,
    S: Storage<T> + ?Sized,
{
    while let Some(child) = links(storage, handle).child(side) {
        handle = child;
    }
    handle
}

/// Returns the in-order neighbour of `handle`: the successor for
/// `Side::Right`, the predecessor for `Side::Left`.
pub(super) fn step<T, S>(storage: &S, handle: Handle, side: Side) -> Option<Handle>
where
    T: TreeEntry,
    S: Storage<T> + ?Sized,
{
    let node = links(storage, handle);
    if let Some(child) = node.child(side) {
        return Some(extreme(storage, child, side.opposite()));
    }

    // Climb until we leave a subtree from its `side.opposite()` edge.
    let mut current = handle;
    let mut parent = node.parent;
    while let Some(up) = parent {
        let up_node = links(storage, up);
        if up_node.child(side) != Some(current) {
            return Some(up);
        }
        current = up;
        parent = up_node.parent;
    }
    None
}

/// Returns the first node of a post-order traversal of the subtree at `handle`.
pub(super) fn first_post_order<T, S>(storage: &S, mut handle: Handle) -> Handle
where
    T: TreeEntry,
    S: Storage<T> + ?Sized,
{
    loop {
        let node = links(storage, handle);
        match (node.child(Side::Left), node.child(Side::Right)) {
            (Some(child), _) | (None, Some(child)) => handle = child,
            (None, None) => return handle,
        }
    }
}
