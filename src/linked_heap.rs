//! An intrusive binary heap built from linked nodes instead of an array.
//!
//! The shape is always a complete binary tree: slot `n` (1-based, row by row)
//! is reached from the top by the binary digits of `n` below its most
//! significant bit. Sifting swaps nodes structurally, so a [`Handle`] keeps
//! naming the same record for as long as it is queued.

use core::cmp::Ordering::{self, Less};

use crate::{Error, Handle, Storage};

mod node;
mod path;

pub use node::{Discipline, HeapEntry, HeapNode};

use node::{entry, links, links_mut};
use path::{SlotPath, Step};

/// Orders two records.
pub type HeapCompareFn<T> = fn(&T, &T) -> Ordering;

/// An intrusive min- or max-heap over records in caller-owned storage.
///
/// Insert, [`delete`](Self::delete), [`modify`](Self::modify) and
/// [`pop`](Self::pop) are O(log n) and allocation-free; [`top`](Self::top) is
/// O(1). Equal records may be queued together.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use intrusive_order::{Discipline, Handle, HeapEntry, HeapNode, LinkedHeap};
///
/// #[derive(Default)]
/// struct Timer {
///     node: HeapNode,
///     deadline: u64,
/// }
///
/// impl HeapEntry for Timer {
///     fn heap_node(&self) -> &HeapNode { &self.node }
///     fn heap_node_mut(&mut self) -> &mut HeapNode { &mut self.node }
/// }
///
/// fn by_deadline(a: &Timer, b: &Timer) -> Ordering {
///     a.deadline.cmp(&b.deadline)
/// }
///
/// let mut timers: Vec<Timer> = [30, 10, 20]
///     .into_iter()
///     .map(|deadline| Timer { deadline, ..Timer::default() })
///     .collect();
/// let mut heap = LinkedHeap::new(Discipline::Min, by_deadline);
/// for index in 0..timers.len() {
///     heap.insert(&mut timers, Handle::from_index(index)).unwrap();
/// }
///
/// // Push the earliest timer back and let the heap re-seat it.
/// let first = heap.top().unwrap();
/// timers[first.to_index()].deadline = 25;
/// heap.modify(&mut timers, first).unwrap();
///
/// let mut fired = Vec::new();
/// while let Some(handle) = heap.pop(&mut timers) {
///     fired.push(timers[handle.to_index()].deadline);
/// }
/// assert_eq!(fired, [20, 25, 30]);
/// ```
pub struct LinkedHeap<T> {
    discipline: Discipline,
    len: usize,
    compare: HeapCompareFn<T>,
    top: Option<Handle>,
}

impl<T> LinkedHeap<T> {
    /// Creates an empty heap of the given `discipline` ordered by `compare`.
    #[must_use]
    pub const fn new(discipline: Discipline, compare: HeapCompareFn<T>) -> Self {
        Self {
            discipline,
            len: 0,
            compare,
            top: None,
        }
    }

    /// Creates an empty heap ordered by the records' [`Ord`] implementation.
    #[must_use]
    pub fn by_ord(discipline: Discipline) -> Self
    where
        T: Ord,
    {
        Self::new(discipline, T::cmp)
    }

    /// Returns the number of queued nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the node at the top without removing it.
    #[must_use]
    pub const fn top(&self) -> Option<Handle> {
        self.top
    }

    /// Returns whether the top is the minimum or the maximum.
    #[must_use]
    pub const fn discipline(&self) -> Discipline {
        self.discipline
    }
}

impl<T: HeapEntry> LinkedHeap<T> {
    /// Returns `true` if `handle` is queued in this heap.
    ///
    /// # Complexity
    ///
    /// O(log n): walks parent links to the top.
    pub fn contains<S>(&self, storage: &S, handle: Handle) -> bool
    where
        S: Storage<T> + ?Sized,
    {
        let Some(top) = self.top else {
            return false;
        };
        let Some(mut record) = storage.get(handle) else {
            return false;
        };

        // The last row sits `ilog2(len)` links below the top.
        let mut current = handle;
        for _ in 0..=self.len.ilog2() {
            let Some(parent) = record.heap_node().parent() else {
                return current == top;
            };
            let Some(up) = storage.get(parent) else {
                return false;
            };
            current = parent;
            record = up;
        }
        false
    }

    /// Queues the detached node `handle`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `handle` is not in `storage`, or its node
    /// is not detached.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert<S>(&mut self, storage: &mut S, handle: Handle) -> Result<(), Error>
    where
        S: Storage<T> + ?Sized,
    {
        let record = storage.get(handle).ok_or_else(|| rejected("insert", Error::InvalidArgument))?;
        if !record.heap_node().is_detached() || self.top == Some(handle) {
            return Err(rejected("insert", Error::InvalidArgument));
        }

        let slot = self.len + 1;
        if self.top.is_none() {
            self.top = Some(handle);
        } else {
            let parent = self.slot(storage, slot / 2);
            links_mut(storage, parent).set_child(Step::entering(slot), Some(handle));
            links_mut(storage, handle).parent = Some(parent);
        }
        self.len = slot;
        self.sift_up(storage, handle);

        #[cfg(feature = "tracing")]
        tracing::trace!(handle = handle.to_index(), len = self.len, "linked_heap: insert");

        Ok(())
    }

    /// Removes `handle`, wherever it sits, and clears its links.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `handle` is not in `storage`.
    /// - [`Error::NotFound`] if `handle` is not queued in this heap.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn delete<S>(&mut self, storage: &mut S, handle: Handle) -> Result<(), Error>
    where
        S: Storage<T> + ?Sized,
    {
        if storage.get(handle).is_none() {
            return Err(rejected("delete", Error::InvalidArgument));
        }
        if !self.contains(storage, handle) {
            return Err(rejected("delete", Error::NotFound));
        }
        self.unlink(storage, handle);
        Ok(())
    }

    /// Restores heap order after the caller changed the ordering data of the
    /// queued node `handle`. A no-op when the order still holds.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `handle` is not in `storage`.
    /// - [`Error::NotFound`] if `handle` is not queued in this heap.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn modify<S>(&mut self, storage: &mut S, handle: Handle) -> Result<(), Error>
    where
        S: Storage<T> + ?Sized,
    {
        if storage.get(handle).is_none() {
            return Err(rejected("modify", Error::InvalidArgument));
        }
        if !self.contains(storage, handle) {
            return Err(rejected("modify", Error::NotFound));
        }
        self.sift_down(storage, handle);
        self.sift_up(storage, handle);

        #[cfg(feature = "tracing")]
        tracing::trace!(handle = handle.to_index(), "linked_heap: modify");

        Ok(())
    }

    /// Removes the node at the top and returns it with its links cleared.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop<S>(&mut self, storage: &mut S) -> Option<Handle>
    where
        S: Storage<T> + ?Sized,
    {
        let top = self.top?;
        self.unlink(storage, top);
        Some(top)
    }

    /// Detaches the node in the last slot and, unless that is `handle`
    /// itself, moves it into `handle`'s place before re-sifting it.
    fn unlink<S>(&mut self, storage: &mut S, handle: Handle)
    where
        S: Storage<T> + ?Sized,
    {
        let last = self.slot(storage, self.len);
        match links(storage, last).parent {
            None => self.top = None,
            Some(parent) => {
                let node = links_mut(storage, parent);
                let side = node.side_of(last);
                node.set_child(side, None);
            }
        }
        self.len -= 1;

        if last != handle {
            let node = links(storage, handle);
            *links_mut(storage, last) = node;
            for child in [node.left, node.right].into_iter().flatten() {
                links_mut(storage, child).parent = Some(last);
            }
            self.replace_child(storage, node.parent, handle, last);

            self.sift_down(storage, last);
            self.sift_up(storage, last);
        }
        *links_mut(storage, handle) = HeapNode::new();

        #[cfg(feature = "tracing")]
        tracing::trace!(handle = handle.to_index(), len = self.len, "linked_heap: delete");
    }

    /// Returns the node in `slot`, which must be occupied.
    fn slot<S>(&self, storage: &S, slot: usize) -> Handle
    where
        S: Storage<T> + ?Sized,
    {
        let top = self.top.expect("`LinkedHeap` - heap is empty!");
        SlotPath::new(slot).fold(top, |at, step| {
            links(storage, at)
                .child(step)
                .expect("`LinkedHeap` - heap shape is not complete!")
        })
    }

    fn replace_child<S>(&mut self, storage: &mut S, parent: Option<Handle>, old: Handle, new: Handle)
    where
        S: Storage<T> + ?Sized,
    {
        match parent {
            None => self.top = Some(new),
            Some(parent) => {
                let node = links_mut(storage, parent);
                let side = node.side_of(old);
                node.set_child(side, Some(new));
            }
        }
    }

    /// `true` if `a` belongs strictly above `b`.
    fn precedes<S>(&self, storage: &S, a: Handle, b: Handle) -> bool
    where
        S: Storage<T> + ?Sized,
    {
        let (a, b) = (entry(storage, a), entry(storage, b));
        let ordering = match self.discipline {
            Discipline::Min => (self.compare)(a, b),
            Discipline::Max => (self.compare)(b, a),
        };
        ordering == Less
    }

    fn sift_up<S>(&mut self, storage: &mut S, handle: Handle)
    where
        S: Storage<T> + ?Sized,
    {
        while let Some(parent) = links(storage, handle).parent {
            if !self.precedes(storage, handle, parent) {
                break;
            }
            self.swap_with_parent(storage, parent, handle);
        }
    }

    fn sift_down<S>(&mut self, storage: &mut S, handle: Handle)
    where
        S: Storage<T> + ?Sized,
    {
        loop {
            let node = links(storage, handle);
            let mut first = handle;
            for child in [node.left, node.right].into_iter().flatten() {
                if self.precedes(storage, child, first) {
                    first = child;
                }
            }
            if first == handle {
                break;
            }
            self.swap_with_parent(storage, handle, first);
        }
    }

    /// Exchanges the positions of `parent` and its direct `child` by rewiring
    /// links. Both records stay where they are in storage.
    fn swap_with_parent<S>(&mut self, storage: &mut S, parent: Handle, child: Handle)
    where
        S: Storage<T> + ?Sized,
    {
        let upper = links(storage, parent);
        let lower = links(storage, child);
        let side = upper.side_of(child);
        let sibling = upper.child(side.other());

        {
            let node = links_mut(storage, child);
            node.parent = upper.parent;
            node.set_child(side, Some(parent));
            node.set_child(side.other(), sibling);
        }
        *links_mut(storage, parent) = HeapNode {
            left: lower.left,
            right: lower.right,
            parent: Some(child),
        };

        if let Some(sibling) = sibling {
            links_mut(storage, sibling).parent = Some(child);
        }
        for grandchild in [lower.left, lower.right].into_iter().flatten() {
            links_mut(storage, grandchild).parent = Some(parent);
        }
        self.replace_child(storage, upper.parent, parent, child);
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn rejected(operation: &'static str, error: Error) -> Error {
    #[cfg(feature = "tracing")]
    tracing::debug!(operation, %error, "linked_heap: rejected");
    error
}
