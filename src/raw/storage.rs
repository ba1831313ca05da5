use alloc::vec::Vec;

use super::arena::Arena;
use super::handle::Handle;

/// Caller-owned record storage addressed by [`Handle`].
///
/// [`OrderedTree`](crate::OrderedTree) and [`LinkedHeap`](crate::LinkedHeap)
/// never own records. Every operation borrows the storage holding them and
/// rewires the links embedded in those records.
///
/// All operations on one tree or heap must use the same storage instance.
/// Passing a different one is a logic error: results are unspecified but
/// memory-safe.
///
/// # Examples
///
/// ```
/// use intrusive_order::{Handle, Storage};
///
/// let records = vec![10, 20, 30];
/// assert_eq!(records.get(Handle::from_index(1)), Some(&20));
/// assert_eq!(records.get(Handle::from_index(3)), None);
/// ```
pub trait Storage<T> {
    /// Returns the record behind `handle`, if present.
    fn get(&self, handle: Handle) -> Option<&T>;

    /// Returns the record behind `handle` mutably, if present.
    fn get_mut(&mut self, handle: Handle) -> Option<&mut T>;
}

impl<T> Storage<T> for [T] {
    #[inline]
    fn get(&self, handle: Handle) -> Option<&T> {
        <[T]>::get(self, handle.to_index())
    }

    #[inline]
    fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        <[T]>::get_mut(self, handle.to_index())
    }
}

impl<T, const N: usize> Storage<T> for [T; N] {
    #[inline]
    fn get(&self, handle: Handle) -> Option<&T> {
        self.as_slice().get(handle.to_index())
    }

    #[inline]
    fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.as_mut_slice().get_mut(handle.to_index())
    }
}

impl<T> Storage<T> for Vec<T> {
    #[inline]
    fn get(&self, handle: Handle) -> Option<&T> {
        self.as_slice().get(handle.to_index())
    }

    #[inline]
    fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.as_mut_slice().get_mut(handle.to_index())
    }
}

impl<T> Storage<T> for Arena<T> {
    #[inline]
    fn get(&self, handle: Handle) -> Option<&T> {
        Arena::get(self, handle)
    }

    #[inline]
    fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        Arena::get_mut(self, handle)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;

    fn read<S: Storage<u32> + ?Sized>(storage: &S, index: usize) -> Option<u32> {
        storage.get(Handle::from_index(index)).copied()
    }

    #[test]
    fn every_backend_resolves_handles() {
        let array = [1u32, 2, 3];
        let vector = vec![1u32, 2, 3];
        let mut arena = Arena::new();
        for value in 1u32..=3 {
            arena.alloc(value);
        }

        for index in 0..3 {
            let expected = Some(u32::try_from(index).unwrap() + 1);
            assert_eq!(read(&array, index), expected);
            assert_eq!(read(&array[..], index), expected);
            assert_eq!(read(&vector, index), expected);
            assert_eq!(read(&arena, index), expected);
        }
        assert_eq!(read(&array, 3), None);
        assert_eq!(read(&vector, 3), None);
        assert_eq!(read(&arena, 3), None);
    }

    #[test]
    fn get_mut_writes_through() {
        let mut vector = vec![0u32; 4];
        *Storage::get_mut(&mut vector, Handle::from_index(2)).unwrap() = 9;
        assert_eq!(vector, [0, 0, 9, 0]);
    }
}
