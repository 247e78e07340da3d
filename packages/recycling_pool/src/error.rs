use thiserror::Error;

/// Errors that can occur when acquiring items from a recycling pool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Every slot in the pool is in use and the pool has no factory to create another item.
    ///
    /// Register more items via [`insert_free()`][crate::RecyclingPool::insert_free], release
    /// items that are no longer needed or configure a factory when building the pool.
    #[error("no free slot is available and the pool has no factory to create one ({in_use} items in use)")]
    Exhausted {
        /// How many items were in use when the acquisition failed.
        in_use: usize,
    },
}

/// A specialized `Result` type for recycling pool operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
