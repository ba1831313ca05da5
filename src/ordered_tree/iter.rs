use core::iter::FusedIterator;
use core::marker::PhantomData;

use super::node::{Side, TreeEntry, entry, extreme, step};
use crate::{Handle, Storage};

/// An iterator over the nodes of an [`OrderedTree`](super::OrderedTree) in
/// ascending key order.
///
/// This `struct` is created by [`OrderedTree::iter`](super::OrderedTree::iter).
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T, S: ?Sized> {
    storage: &'a S,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T, S> Iter<'a, T, S>
where
    T: TreeEntry,
    S: Storage<T> + ?Sized,
{
    pub(super) fn new(storage: &'a S, root: Option<Handle>, len: usize) -> Self {
        Self {
            storage,
            front: root.map(|root| extreme(storage, root, Side::Left)),
            back: root.map(|root| extreme(storage, root, Side::Right)),
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T, S> Iterator for Iter<'a, T, S>
where
    T: TreeEntry + 'a,
    S: Storage<T> + ?Sized,
{
    type Item = (Handle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = step(self.storage, handle, Side::Right);
        Some((handle, entry(self.storage, handle)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, S> DoubleEndedIterator for Iter<'a, T, S>
where
    T: TreeEntry + 'a,
    S: Storage<T> + ?Sized,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = step(self.storage, handle, Side::Left);
        Some((handle, entry(self.storage, handle)))
    }
}

impl<'a, T, S> ExactSizeIterator for Iter<'a, T, S>
where
    T: TreeEntry + 'a,
    S: Storage<T> + ?Sized,
{
}

impl<'a, T, S> FusedIterator for Iter<'a, T, S>
where
    T: TreeEntry + 'a,
    S: Storage<T> + ?Sized,
{
}
