use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage with stable handles and free-slot reuse.
///
/// An `Arena` is one way to hold the records that embed tree or heap nodes.
/// Handles stay valid until the slot is taken, and freed slots are recycled by
/// later allocations. Any other [`Storage`](crate::Storage) (a slice, an array,
/// a `Vec`) works just as well when records never come and go.
///
/// # Examples
///
/// ```
/// use intrusive_order::Arena;
///
/// let mut arena = Arena::new();
/// let a = arena.alloc("a");
/// let b = arena.alloc("b");
/// assert_eq!(arena.take(a), Some("a"));
///
/// // The freed slot is reused.
/// let c = arena.alloc("c");
/// assert_eq!(c, a);
/// assert_eq!(arena.get(b), Some(&"b"));
/// assert_eq!(arena.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Creates an empty arena with room for at least `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Returns the number of slots the arena can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Returns the number of occupied slots.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    /// Returns `true` if no slot is occupied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores `element` and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds [`Handle::MAX`] + 1 slots.
    pub fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            // Reuse a free slot/handle.
            self.slots[h.to_index()] = Some(element);
            h
        } else {
            assert!(
                self.slots.len() <= Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX + 1
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    /// Returns the element behind `handle`, if the slot is occupied.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.to_index()).and_then(Option::as_ref)
    }

    /// Returns the element behind `handle` mutably, if the slot is occupied.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots.get_mut(handle.to_index()).and_then(Option::as_mut)
    }

    /// Removes the element behind `handle` and recycles its slot.
    ///
    /// Returns `None` if the slot is already vacant. The caller must detach
    /// the element from every tree and heap before taking it.
    pub fn take(&mut self, handle: Handle) -> Option<T> {
        let element = self.slots.get_mut(handle.to_index())?.take()?;
        self.free.push(handle);
        Some(element)
    }

    /// Drops the element behind `handle` and recycles its slot.
    ///
    /// Returns `false` if the slot is already vacant.
    pub fn free(&mut self, handle: Handle) -> bool {
        self.take(handle).is_some()
    }

    /// Drops every element and invalidates all handles.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn arena_capacity() {
        let arena: Arena<u32> = Arena::with_capacity(10);
        assert_eq!(arena.capacity(), 10);
    }

    #[test]
    fn vacant_slots_are_reported() {
        let mut arena = Arena::new();
        let handle = arena.alloc(5u32);
        assert_eq!(arena.take(handle), Some(5));
        assert_eq!(arena.take(handle), None);
        assert!(!arena.free(handle));
        assert_eq!(arena.get(handle), None);
        assert_eq!(arena.get(Handle::from_index(42)), None);
    }

    proptest! {
        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.alloc(value);
                        model.push((handle, value));
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        *arena.get_mut(handle).unwrap() = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        let value1 = arena.take(handle);
                        let (_, value2) = model.swap_remove(index);
                        prop_assert_eq!(value1, Some(value2));
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());
                prop_assert_eq!(arena.is_empty(), model.is_empty());

                for &(handle, value) in &model {
                    prop_assert_eq!(arena.get(handle), Some(&value));
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        GetMut(usize, u32),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            5 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }
}
