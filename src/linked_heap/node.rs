use super::path::Step;
use crate::{Handle, Storage};

/// Whether the top of a [`LinkedHeap`](super::LinkedHeap) is its minimum or
/// its maximum under the comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Discipline {
    /// Every node compares less than or equal to its children.
    #[default]
    Min,
    /// Every node compares greater than or equal to its children.
    Max,
}

/// The links a [`LinkedHeap`](super::LinkedHeap) threads through a record.
///
/// A default node is detached. Insertion attaches it, and deletion or
/// [`pop`](super::LinkedHeap::pop) detaches it again.
///
/// The sole entry of a heap carries no links, so it looks detached to every
/// other heap. A heap rejects re-inserting its own top, but inserting the sole
/// entry of one heap into another is a logic error the node cannot detect.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HeapNode {
    pub(super) left: Option<Handle>,
    pub(super) right: Option<Handle>,
    pub(super) parent: Option<Handle>,
}

impl HeapNode {
    /// Creates a detached node.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left: None,
            right: None,
            parent: None,
        }
    }

    /// Returns the left child.
    #[inline]
    #[must_use]
    pub const fn left(&self) -> Option<Handle> {
        self.left
    }

    /// Returns the right child.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> Option<Handle> {
        self.right
    }

    /// Returns the parent, or `None` for the top and for detached nodes.
    #[inline]
    #[must_use]
    pub const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    /// Returns `true` if all three links are empty.
    #[inline]
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.parent.is_none()
    }

    #[inline]
    pub(super) const fn child(&self, step: Step) -> Option<Handle> {
        match step {
            Step::Left => self.left,
            Step::Right => self.right,
        }
    }

    #[inline]
    pub(super) fn set_child(&mut self, step: Step, child: Option<Handle>) {
        match step {
            Step::Left => self.left = child,
            Step::Right => self.right = child,
        }
    }

    /// Which side `child` hangs on. Callers guarantee it is a child.
    #[inline]
    pub(super) fn side_of(&self, child: Handle) -> Step {
        if self.left == Some(child) {
            Step::Left
        } else {
            Step::Right
        }
    }
}

/// A record that embeds a [`HeapNode`].
///
/// # Examples
///
/// ```
/// use intrusive_order::{HeapEntry, HeapNode};
///
/// struct Job {
///     queued: HeapNode,
///     priority: u8,
/// }
///
/// impl HeapEntry for Job {
///     fn heap_node(&self) -> &HeapNode {
///         &self.queued
///     }
///
///     fn heap_node_mut(&mut self) -> &mut HeapNode {
///         &mut self.queued
///     }
/// }
/// ```
pub trait HeapEntry {
    /// Returns the embedded node.
    fn heap_node(&self) -> &HeapNode;

    /// Returns the embedded node mutably.
    fn heap_node_mut(&mut self) -> &mut HeapNode;
}

#[inline]
pub(super) fn entry<T, S>(storage: &S, handle: Handle) -> &T
where
    S: Storage<T> + ?Sized,
{
    storage.get(handle).expect("`LinkedHeap` - linked `handle` is missing from storage!")
}

#[inline]
pub(super) fn links<T, S>(storage: &S, handle: Handle) -> HeapNode
where
    T: HeapEntry,
    S: Storage<T> + ?Sized,
{
    *entry(storage, handle).heap_node()
}

#[inline]
pub(super) fn links_mut<'a, T, S>(storage: &'a mut S, handle: Handle) -> &'a mut HeapNode
where
    T: HeapEntry + 'a,
    S: Storage<T> + ?Sized,
{
    storage
        .get_mut(handle)
        .expect("`LinkedHeap` - linked `handle` is missing from storage!")
        .heap_node_mut()
}
