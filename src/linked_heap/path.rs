use core::iter::FusedIterator;

/// One edge on the way down from the top of a heap.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Step {
    Left,
    Right,
}

impl Step {
    /// The edge that enters slot `slot` (at least 2) from its parent.
    pub(super) const fn entering(slot: usize) -> Self {
        if slot & 1 == 1 { Step::Right } else { Step::Left }
    }

    pub(super) const fn other(self) -> Self {
        match self {
            Step::Left => Step::Right,
            Step::Right => Step::Left,
        }
    }
}

/// The edges from the top to slot `slot` (1-based, row by row, left to right)
/// of a complete binary tree.
///
/// They are the binary digits of `slot` below its most significant bit, read
/// from high to low: 0 descends left, 1 descends right.
#[derive(Clone, Debug)]
pub(super) struct SlotPath {
    slot: usize,
    remaining: u32,
}

impl SlotPath {
    pub(super) const fn new(slot: usize) -> Self {
        assert!(slot > 0, "`SlotPath::new()` - slots are numbered from 1!");
        Self {
            slot,
            remaining: slot.ilog2(),
        }
    }
}

impl Iterator for SlotPath {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(if (self.slot >> self.remaining) & 1 == 1 {
            Step::Right
        } else {
            Step::Left
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for SlotPath {}

impl FusedIterator for SlotPath {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    #[test]
    fn top_slot_has_empty_path() {
        assert_eq!(SlotPath::new(1).count(), 0);
    }

    #[test]
    fn paths_follow_row_order() {
        use Step::{Left, Right};

        assert_eq!(SlotPath::new(2).collect::<Vec<_>>(), [Left]);
        assert_eq!(SlotPath::new(3).collect::<Vec<_>>(), [Right]);
        assert_eq!(SlotPath::new(6).collect::<Vec<_>>(), [Right, Left]);
        assert_eq!(SlotPath::new(13).collect::<Vec<_>>(), [Right, Left, Right]);
    }

    #[test]
    #[should_panic(expected = "`SlotPath::new()` - slots are numbered from 1!")]
    fn slot_zero_is_rejected() {
        let _ = SlotPath::new(0);
    }

    proptest! {
        // Following the path from slot 1 with `2i` / `2i + 1` lands on the slot.
        #[test]
        fn path_reaches_slot(slot in 1usize..1_000_000) {
            let path = SlotPath::new(slot);
            prop_assert_eq!(path.len(), slot.ilog2() as usize);
            let reached = path.fold(1usize, |at, step| match step {
                Step::Left => 2 * at,
                Step::Right => 2 * at + 1,
            });
            prop_assert_eq!(reached, slot);
        }
    }
}
