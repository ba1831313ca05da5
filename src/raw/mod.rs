mod arena;
mod handle;
mod storage;

pub use arena::Arena;
pub use handle::Handle;
pub use storage::Storage;
