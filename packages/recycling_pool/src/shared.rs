use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Key, RecyclingPool, RecyclingPoolBuilder};

/// A thread-safe handle to a [`RecyclingPool`].
///
/// This type acts as a cloneable handle to a shared pool instance. All clones refer to the same
/// pool, which stays alive as long as at least one handle exists.
///
/// Every operation takes a single lock around the whole pool, so scanning for a free slot and
/// marking it as in use happens atomically: two threads acquiring at the same time never
/// receive the same slot.
///
/// Items are accessed through closures ([`with()`][1], [`with_mut()`][2]) that run while the
/// lock is held. The factory and teardown callbacks also run while the lock is held, so none of
/// these closures may call back into the same pool.
///
/// # Example
///
/// ```rust
/// use std::thread;
///
/// use recycling_pool::SharedRecyclingPool;
///
/// let pool = SharedRecyclingPool::with_factory(|| 0_u64);
///
/// let pool_clone = pool.clone();
/// let handle = thread::spawn(move || {
///     let key = pool_clone.acquire().unwrap();
///     pool_clone.with_mut(key, |value| *value = 42);
///     key
/// });
///
/// let key = handle.join().unwrap();
/// assert_eq!(pool.with(key, |value| *value), 42);
/// ```
///
/// [1]: Self::with
/// [2]: Self::with_mut
#[derive(Debug)]
pub struct SharedRecyclingPool<T> {
    inner: Arc<Mutex<RecyclingPool<T>>>,
}

impl<T> Clone for SharedRecyclingPool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> From<RecyclingPool<T>> for SharedRecyclingPool<T> {
    /// Wraps an existing pool so it can be shared between threads.
    fn from(pool: RecyclingPool<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }
}

impl<T> SharedRecyclingPool<T> {
    /// Creates a new empty shared pool without a factory.
    #[must_use]
    pub fn new() -> Self {
        Self::from(RecyclingPool::new())
    }

    /// Creates a new empty shared pool that calls `factory` whenever an acquisition finds no
    /// free slot.
    #[must_use]
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: FnMut() -> T + Send + 'static,
    {
        Self::from(RecyclingPool::with_factory(factory))
    }

    /// Starts building a new pool. Finish with
    /// [`build_shared()`][RecyclingPoolBuilder::build_shared].
    pub fn builder() -> RecyclingPoolBuilder<T> {
        RecyclingPoolBuilder::new()
    }

    /// The number of slots in the pool, free and in use.
    ///
    /// This operation may block if another thread is currently accessing the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the pool has no slots at all.
    ///
    /// This operation may block if another thread is currently accessing the pool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// The number of slots that are currently handed out.
    #[must_use]
    pub fn in_use_count(&self) -> usize {
        self.inner.lock().in_use_count()
    }

    /// The number of slots that can be acquired without calling the factory.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.inner.lock().free_count()
    }

    /// Registers an item and marks it as in use. See [`RecyclingPool::insert()`].
    pub fn insert(&self, value: T) -> Key {
        self.inner.lock().insert(value)
    }

    /// Registers an item and marks it as free. See [`RecyclingPool::insert_free()`].
    pub fn insert_free(&self, value: T) -> Key {
        self.inner.lock().insert_free(value)
    }

    /// Hands out the first free item in the pool, creating a new one if there is none.
    ///
    /// See [`RecyclingPool::acquire()`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Exhausted`][crate::Error::Exhausted] if every slot is in use and the
    /// pool has no factory.
    pub fn acquire(&self) -> crate::Result<Key> {
        self.inner.lock().acquire()
    }

    /// Runs `f` with a shared reference to the item in a slot and returns its result.
    ///
    /// # Panics
    ///
    /// Panics if the key was not issued by this pool.
    pub fn with<R>(&self, key: Key, f: impl FnOnce(&T) -> R) -> R {
        f(self.inner.lock().get(key))
    }

    /// Runs `f` with an exclusive reference to the item in a slot and returns its result.
    ///
    /// # Panics
    ///
    /// Panics if the key was not issued by this pool.
    pub fn with_mut<R>(&self, key: Key, f: impl FnOnce(&mut T) -> R) -> R {
        f(self.inner.lock().get_mut(key))
    }

    /// Whether the slot identified by `key` is free.
    ///
    /// # Panics
    ///
    /// Panics if the key was not issued by this pool.
    #[must_use]
    pub fn is_free(&self, key: Key) -> bool {
        self.inner.lock().is_free(key)
    }

    /// Returns clones of the items that are currently in use, in slot order.
    #[must_use]
    pub fn in_use_cloned(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner
            .lock()
            .in_use()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Returns the keys of the slots that are currently in use, in slot order.
    #[must_use]
    pub fn in_use_keys(&self) -> Vec<Key> {
        self.inner.lock().in_use_keys()
    }

    /// Returns an item to the pool. See [`RecyclingPool::release()`].
    ///
    /// # Panics
    ///
    /// Panics if the key was not issued by this pool.
    pub fn release(&self, key: Key) -> bool {
        self.inner.lock().release(key)
    }

    /// Returns the first in-use item equal to `item` to the pool.
    /// See [`RecyclingPool::release_item()`].
    pub fn release_item(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.inner.lock().release_item(item)
    }

    /// Returns every in-use item matching `predicate` to the pool.
    /// See [`RecyclingPool::release_where()`].
    pub fn release_where<P>(&self, predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        self.inner.lock().release_where(predicate)
    }

    /// Returns every in-use item to the pool. See [`RecyclingPool::release_all()`].
    pub fn release_all(&self) -> usize {
        self.inner.lock().release_all()
    }

    /// Finds the first in-use slot whose item equals `item`. See [`RecyclingPool::find()`].
    #[must_use]
    pub fn find(&self, item: &T) -> Option<Key>
    where
        T: PartialEq,
    {
        self.inner.lock().find(item)
    }

    /// Finds the first slot, free or in use, whose item matches `predicate`.
    /// See [`RecyclingPool::find_where()`].
    pub fn find_where<P>(&self, predicate: P) -> Option<Key>
    where
        P: FnMut(&T) -> bool,
    {
        self.inner.lock().find_where(predicate)
    }
}

impl<T> Default for SharedRecyclingPool<T> {
    fn default() -> Self {
        Self::new()
    }
}
