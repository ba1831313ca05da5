use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// A stable reference to a record in caller-owned [`Storage`](crate::Storage).
///
/// Handles play the role of node pointers: tree and heap links are stored as
/// `Option<Handle>`, which is the same size as a `Handle` thanks to the
/// non-zero niche. A handle for position `i` of a slice or `Vec` is
/// `Handle::from_index(i)`; [`Arena`](crate::Arena) hands them out directly.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Handle(NonZero<RawHandle>);

impl Handle {
    /// The largest index a handle can refer to.
    pub const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// Creates a handle for the record at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` exceeds [`Handle::MAX`].
    ///
    /// # Examples
    ///
    /// ```
    /// use intrusive_order::Handle;
    ///
    /// let handle = Handle::from_index(7);
    /// assert_eq!(handle.to_index(), 7);
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // `index + 1` is non-zero and fits in `RawHandle`.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    /// Creates a handle for the record at `index`, or `None` if `index`
    /// exceeds [`Handle::MAX`].
    #[inline]
    #[must_use]
    pub const fn try_from_index(index: usize) -> Option<Self> {
        if index <= Self::MAX {
            Some(Self::from_index(index))
        } else {
            None
        }
    }

    /// Returns the storage index this handle refers to.
    #[inline]
    #[must_use]
    pub const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
