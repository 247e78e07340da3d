use std::any::type_name;
use std::fmt;

use crate::{Factory, OnRelease, RecyclingPool, ReleaseHook, SharedRecyclingPool};

/// Builder for creating an instance of [`RecyclingPool`] or [`SharedRecyclingPool`].
///
/// You only need to use this builder if you want to customize the pool configuration.
/// [`RecyclingPool::new()`][1] creates a pool without a factory and [`RecyclingPool::with_factory()`][2]
/// covers the most common configuration with a factory.
///
/// # Examples
///
/// ```
/// use recycling_pool::RecyclingPool;
///
/// let pool = RecyclingPool::builder()
///     .factory(|| vec![0_u8; 64])
///     .on_release(|buffer: &mut Vec<u8>| buffer.fill(0))
///     .prewarm(4)
///     .build();
///
/// assert_eq!(pool.len(), 4);
/// assert_eq!(pool.free_count(), 4);
/// ```
///
/// [1]: RecyclingPool::new
/// [2]: RecyclingPool::with_factory
#[must_use]
pub struct RecyclingPoolBuilder<T> {
    factory: Option<Factory<T>>,
    on_release: Option<OnRelease<T>>,
    capacity: usize,
    prewarm: usize,
}

impl<T> fmt::Debug for RecyclingPoolBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecyclingPoolBuilder")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("has_factory", &self.factory.is_some())
            .field("has_on_release", &self.on_release.is_some())
            .field("capacity", &self.capacity)
            .field("prewarm", &self.prewarm)
            .finish()
    }
}

impl<T> RecyclingPoolBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            factory: None,
            on_release: None,
            capacity: 0,
            prewarm: 0,
        }
    }

    /// Sets the function used to create a new item when an acquisition finds no free slot.
    ///
    /// Without a factory, the pool only ever contains the items registered through
    /// [`insert()`][RecyclingPool::insert] and [`insert_free()`][RecyclingPool::insert_free].
    ///
    /// # Examples
    ///
    /// ```
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::builder().factory(String::new).build();
    ///
    /// let key = pool.acquire().unwrap();
    /// assert_eq!(pool.get(key), "");
    /// ```
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: FnMut() -> T + Send + 'static,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Sets a teardown callback that the pool calls on an item every time it is released.
    ///
    /// This replaces any teardown previously configured via [`release_hook()`][Self::release_hook].
    ///
    /// # Examples
    ///
    /// ```
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::builder()
    ///     .factory(Vec::<u32>::new)
    ///     .on_release(|items: &mut Vec<u32>| items.clear())
    ///     .build();
    ///
    /// let key = pool.acquire().unwrap();
    /// pool.get_mut(key).push(42);
    ///
    /// pool.release(key);
    /// assert!(pool.get(key).is_empty());
    /// ```
    pub fn on_release<F>(mut self, on_release: F) -> Self
    where
        F: FnMut(&mut T) + Send + 'static,
    {
        self.on_release = Some(Box::new(on_release));
        self
    }

    /// Uses the item type's [`ReleaseHook`] implementation as the teardown callback.
    ///
    /// This replaces any teardown previously configured via [`on_release()`][Self::on_release].
    pub fn release_hook(self) -> Self
    where
        T: ReleaseHook + 'static,
    {
        self.on_release(T::on_release)
    }

    /// Reserves storage for at least `capacity` slots up front.
    ///
    /// This does not create any items, it only avoids reallocating the slot list while the pool
    /// grows to that size.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Creates `count` items through the factory when the pool is built and registers them as
    /// free, so the first acquisitions do not need to call the factory.
    ///
    /// The factory is called in order and the items are registered in the order they were
    /// created.
    pub fn prewarm(mut self, count: usize) -> Self {
        self.prewarm = count;
        self
    }

    /// Builds a single-threaded pool with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if a pre-warm count is set without a factory.
    ///
    /// # Examples
    ///
    /// ```
    /// use recycling_pool::RecyclingPool;
    ///
    /// let pool = RecyclingPool::<u32>::builder().build();
    /// assert!(pool.is_empty());
    /// ```
    #[must_use]
    pub fn build(self) -> RecyclingPool<T> {
        RecyclingPool::new_inner(self.factory, self.on_release, self.capacity, self.prewarm)
    }

    /// Builds a thread-safe pool with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if a pre-warm count is set without a factory.
    ///
    /// # Examples
    ///
    /// ```
    /// use recycling_pool::RecyclingPool;
    ///
    /// let pool = RecyclingPool::builder().factory(|| 0_u64).build_shared();
    ///
    /// let key = pool.acquire().unwrap();
    /// assert_eq!(pool.with(key, |value| *value), 0);
    /// ```
    #[must_use]
    pub fn build_shared(self) -> SharedRecyclingPool<T> {
        SharedRecyclingPool::from(self.build())
    }
}
