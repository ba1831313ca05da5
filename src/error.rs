use thiserror::Error;

/// Errors returned by [`OrderedTree`](crate::OrderedTree) and
/// [`LinkedHeap`](crate::LinkedHeap).
///
/// A failed operation leaves the structure exactly as it was.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// A handle is missing from storage, a node that should be detached still
    /// carries links, or an output buffer is too small.
    #[error("invalid argument")]
    InvalidArgument,
    /// The tree already holds a node with an equal key.
    #[error("a node with an equal key is already present")]
    DuplicateKey,
    /// The key or node is not present, or the structure is empty.
    #[error("not found")]
    NotFound,
}
