use super::OrderedTree;
use super::node::{Side, TreeEntry, height_of, links, links_mut};
use crate::{Handle, Storage};

impl<T: TreeEntry, K: ?Sized, C> OrderedTree<T, K, C> {
    /// Points `parent`'s link to `old` (or the root) at `new`, and `new`'s
    /// parent link at `parent`.
    pub(super) fn replace_child<S>(&mut self, storage: &mut S, parent: Option<Handle>, old: Handle, new: Option<Handle>)
    where
        S: Storage<T> + ?Sized,
    {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = links_mut(storage, parent);
                let side = if node.child(Side::Left) == Some(old) {
                    Side::Left
                } else {
                    Side::Right
                };
                node.set_child(side, new);
            }
        }
        if let Some(new) = new {
            links_mut(storage, new).parent = parent;
        }
    }

    /// Walks from `current` to the root, refreshing cached heights and rotating
    /// every subtree whose balance factor reached ±2.
    pub(super) fn rebalance_upward<S>(&mut self, storage: &mut S, mut current: Option<Handle>)
    where
        S: Storage<T> + ?Sized,
    {
        while let Some(handle) = current {
            let top = self.rebalance(storage, handle);
            current = links(storage, top).parent;
        }
    }

    /// Restores the balance of the subtree at `handle` and returns its new top.
    fn rebalance<S>(&mut self, storage: &mut S, handle: Handle) -> Handle
    where
        S: Storage<T> + ?Sized,
    {
        update_height(storage, handle);

        let node = links(storage, handle);
        let left = height_of(storage, node.child(Side::Left));
        let right = height_of(storage, node.child(Side::Right));
        let heavy = if left > right + 1 {
            Side::Left
        } else if right > left + 1 {
            Side::Right
        } else {
            return handle;
        };

        let Some(child) = node.child(heavy) else {
            return handle;
        };
        let child_node = links(storage, child);
        if height_of(storage, child_node.child(heavy.opposite())) > height_of(storage, child_node.child(heavy)) {
            // Inner grandchild is taller: straighten the zig-zag first.
            self.rotate(storage, child, heavy);
        }
        self.rotate(storage, handle, heavy.opposite())
    }

    /// Moves `handle` down toward `side`; its child on the other side takes its
    /// place. Returns the risen child.
    fn rotate<S>(&mut self, storage: &mut S, handle: Handle, side: Side) -> Handle
    where
        S: Storage<T> + ?Sized,
    {
        let rising_side = side.opposite();
        let node = links(storage, handle);
        let Some(riser) = node.child(rising_side) else {
            return handle;
        };
        let inner = links(storage, riser).child(side);

        links_mut(storage, handle).set_child(rising_side, inner);
        if let Some(inner) = inner {
            links_mut(storage, inner).parent = Some(handle);
        }
        links_mut(storage, riser).set_child(side, Some(handle));
        self.replace_child(storage, node.parent, handle, Some(riser));
        links_mut(storage, handle).parent = Some(riser);

        update_height(storage, handle);
        update_height(storage, riser);

        #[cfg(feature = "tracing")]
        tracing::trace!(from = handle.to_index(), to = riser.to_index(), ?side, "ordered_tree: rotate");

        riser
    }
}

fn update_height<T, S>(storage: &mut S, handle: Handle)
where
    T: TreeEntry,
    S: Storage<T> + ?Sized,
{
    let node = links(storage, handle);
    let height = 1 + height_of(storage, node.child(Side::Left)).max(height_of(storage, node.child(Side::Right)));
    links_mut(storage, handle).height = height;
}
