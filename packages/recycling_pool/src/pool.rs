use std::any::type_name;
use std::fmt;

use tracing::{debug, trace};

use crate::{Error, Factory, OnRelease, RecyclingPoolBuilder, Slot};

const ERR_FOREIGN_KEY: &str = "key was not issued by this pool";

/// An object pool that hands out reusable items of a single type.
///
/// Every item in the pool lives in a slot that is either *free* (available for acquisition) or
/// *in use* (handed out to a caller). Items are never removed from the pool: releasing an item
/// only marks its slot as free again, so the next acquisition can reuse it instead of creating
/// a new item.
///
/// There are two ways to put items into the pool:
///
/// * [`insert()`][1] and [`insert_free()`][2] register an item you constructed yourself, either
///   as in use or as free.
/// * [`acquire()`][3] calls the pool's factory when no free slot exists. The factory is
///   configured via [`with_factory()`][4] or the [builder][5].
///
/// Items are addressed by the [`Key`] returned when they are registered or acquired. Lookups by
/// value ([`find()`][6], [`release_item()`][7]) use the item's [`PartialEq`] implementation.
///
/// # Ordering
///
/// Slots are kept in the order they were registered and every scan proceeds from the front, so
/// the first matching slot always wins. For a given history of operations, the pool makes the
/// same choices every time.
///
/// # Teardown
///
/// A pool may be configured with a teardown callback that runs every time an item is released,
/// either an explicit closure via [`RecyclingPoolBuilder::on_release()`] or the item type's
/// [`ReleaseHook`][crate::ReleaseHook] implementation via [`RecyclingPoolBuilder::release_hook()`].
///
/// # Thread safety
///
/// The pool requires `&mut self` for every mutation and is not internally synchronized. It can
/// be moved between threads if `T: Send`. Use [`SharedRecyclingPool`][crate::SharedRecyclingPool]
/// to share one pool between threads.
///
/// # Example
///
/// ```rust
/// use recycling_pool::RecyclingPool;
///
/// let mut pool = RecyclingPool::with_factory(|| String::with_capacity(32));
///
/// let first = pool.acquire().unwrap();
/// pool.get_mut(first).push_str("Hello");
///
/// pool.release(first);
///
/// // The released slot is reused instead of creating a new item.
/// let second = pool.acquire().unwrap();
/// assert_eq!(first, second);
/// assert_eq!(pool.len(), 1);
/// ```
///
/// [1]: Self::insert
/// [2]: Self::insert_free
/// [3]: Self::acquire
/// [4]: Self::with_factory
/// [5]: Self::builder
/// [6]: Self::find
/// [7]: Self::release_item
pub struct RecyclingPool<T> {
    /// Slots in registration order. Slots are only ever appended.
    slots: Vec<Slot<T>>,

    factory: Option<Factory<T>>,
    on_release: Option<OnRelease<T>>,
}

/// A key that identifies a slot in a [`RecyclingPool`].
///
/// Keys are returned by [`RecyclingPool::acquire()`], [`RecyclingPool::insert()`] and related
/// methods. Since slots are never removed from a pool, a key stays valid for the entire lifetime
/// of the pool that issued it, whether the slot is currently free or in use.
///
/// Using a key with a pool other than the one that issued it may address an unrelated item or
/// panic.
///
/// # Example
///
/// ```rust
/// use recycling_pool::RecyclingPool;
///
/// let mut pool = RecyclingPool::with_factory(|| 0_u32);
///
/// let key = pool.acquire().unwrap();
/// *pool.get_mut(key) = 42;
///
/// // Keys can be copied and stored.
/// let stored = key;
/// pool.release(key);
///
/// // The item is still there, only its slot is free.
/// assert_eq!(*pool.get(stored), 42);
/// assert!(pool.is_free(stored));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Key {
    index: usize,
}

impl<T> RecyclingPool<T> {
    /// # Panics
    ///
    /// Panics if `prewarm` is non-zero but there is no factory.
    pub(crate) fn new_inner(
        factory: Option<Factory<T>>,
        on_release: Option<OnRelease<T>>,
        capacity: usize,
        prewarm: usize,
    ) -> Self {
        assert!(
            prewarm == 0 || factory.is_some(),
            "a RecyclingPool can only be pre-warmed if it has a factory"
        );

        let mut pool = Self {
            slots: Vec::with_capacity(capacity.max(prewarm)),
            factory,
            on_release,
        };

        if let Some(factory) = pool.factory.as_mut() {
            for _ in 0..prewarm {
                pool.slots.push(Slot::new(factory(), true));
            }

            if prewarm > 0 {
                debug!(
                    item_type = type_name::<T>(),
                    prewarm, "pre-warmed recycling pool"
                );
            }
        }

        pool
    }

    /// Creates a new empty [`RecyclingPool`] without a factory.
    ///
    /// Such a pool only ever contains items registered via [`insert()`][1] or
    /// [`insert_free()`][2]. Once all of them are in use, [`acquire()`][3] fails.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::<u32>::new();
    /// assert!(pool.acquire().is_err());
    ///
    /// pool.insert_free(5);
    /// let key = pool.acquire().unwrap();
    /// assert_eq!(*pool.get(key), 5);
    /// ```
    ///
    /// [1]: Self::insert
    /// [2]: Self::insert_free
    /// [3]: Self::acquire
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new empty [`RecyclingPool`] that calls `factory` whenever an acquisition finds
    /// no free slot.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::with_factory(Vec::<u8>::new);
    /// assert!(pool.is_empty());
    ///
    /// let key = pool.acquire().unwrap();
    /// assert_eq!(pool.len(), 1);
    /// assert!(pool.get(key).is_empty());
    /// ```
    #[must_use]
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: FnMut() -> T + Send + 'static,
    {
        Self::builder().factory(factory).build()
    }

    /// Starts building a new [`RecyclingPool`].
    ///
    /// Use this when you want to configure a teardown callback, pre-warm the pool or reserve
    /// capacity up front.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let pool = RecyclingPool::builder()
    ///     .factory(|| [0.0_f32; 3])
    ///     .prewarm(8)
    ///     .build();
    ///
    /// assert_eq!(pool.len(), 8);
    /// assert_eq!(pool.in_use_count(), 0);
    /// ```
    pub fn builder() -> RecyclingPoolBuilder<T> {
        RecyclingPoolBuilder::new()
    }

    /// The number of slots in the pool, free and in use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool has no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The number of slots that are currently handed out.
    #[must_use]
    pub fn in_use_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_in_use()).count()
    }

    /// The number of slots that can be acquired without calling the factory.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_free()).count()
    }

    /// Whether the pool can create new items when it runs out of free slots.
    #[must_use]
    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    /// The number of slots the pool can hold without reallocating its slot list.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Reserves room in the slot list for at least `additional` more slots.
    ///
    /// This does not create any items.
    #[cfg_attr(test, mutants::skip)] // Only affects allocation behavior, not observable results.
    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    /// Registers an item constructed by the caller and marks it as in use.
    ///
    /// The pool does not check whether an equal item is already registered. Inserting the same
    /// value twice creates two independent slots.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::new();
    /// let key = pool.insert("enemy");
    ///
    /// assert!(!pool.is_free(key));
    /// assert_eq!(pool.in_use(), vec![&"enemy"]);
    /// ```
    pub fn insert(&mut self, value: T) -> Key {
        self.push_slot(value, false)
    }

    /// Registers an item constructed by the caller and marks it as free, making it available
    /// to the next acquisition.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::new();
    /// let key = pool.insert_free("enemy");
    ///
    /// assert!(pool.is_free(key));
    /// assert_eq!(pool.acquire().unwrap(), key);
    /// ```
    pub fn insert_free(&mut self, value: T) -> Key {
        self.push_slot(value, true)
    }

    /// Hands out the first free item in the pool, creating a new one if there is none.
    ///
    /// The slots are scanned in registration order and the first free slot is marked as in
    /// use. If every slot is in use, the factory creates a new item which is registered as in
    /// use in a new slot at the end of the pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Exhausted`] if every slot is in use and the pool has no factory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::with_factory(|| 0_u8);
    ///
    /// let a = pool.acquire().unwrap();
    /// let b = pool.acquire().unwrap();
    /// assert_ne!(a, b);
    /// assert_eq!(pool.len(), 2);
    ///
    /// pool.release(a);
    /// assert_eq!(pool.acquire().unwrap(), a);
    /// assert_eq!(pool.len(), 2);
    /// ```
    pub fn acquire(&mut self) -> crate::Result<Key> {
        if let Some(index) = self.slots.iter().position(Slot::is_free) {
            self.slots
                .get_mut(index)
                .expect("position() only returns indexes of existing slots")
                .set_free(false);

            trace!(index, "acquired free slot");
            return Ok(Key { index });
        }

        let Some(factory) = self.factory.as_mut() else {
            return Err(Error::Exhausted {
                in_use: self.slots.len(),
            });
        };

        let item = factory();
        let key = self.push_slot(item, false);

        debug!(
            item_type = type_name::<T>(),
            slot_count = self.slots.len(),
            "factory created a new pooled item"
        );

        Ok(key)
    }

    /// Hands out an item like [`acquire()`][Self::acquire] and also returns an exclusive
    /// reference to it, so it can be prepared for use without a separate lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Exhausted`] if every slot is in use and the pool has no factory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::with_factory(|| (0_i32, 0_i32));
    ///
    /// let (key, position) = pool.acquire_mut().unwrap();
    /// *position = (10, 20);
    ///
    /// assert_eq!(*pool.get(key), (10, 20));
    /// ```
    pub fn acquire_mut(&mut self) -> crate::Result<(Key, &mut T)> {
        let key = self.acquire()?;
        Ok((key, self.get_mut(key)))
    }

    /// Gets a shared reference to the item in a slot, whether it is free or in use.
    ///
    /// # Panics
    ///
    /// Panics if the key was not issued by this pool.
    #[must_use]
    pub fn get(&self, key: Key) -> &T {
        self.slots
            .get(key.index)
            .map(Slot::item)
            .expect(ERR_FOREIGN_KEY)
    }

    /// Gets an exclusive reference to the item in a slot, whether it is free or in use.
    ///
    /// # Panics
    ///
    /// Panics if the key was not issued by this pool.
    #[must_use]
    pub fn get_mut(&mut self, key: Key) -> &mut T {
        self.slots
            .get_mut(key.index)
            .map(Slot::item_mut)
            .expect(ERR_FOREIGN_KEY)
    }

    /// Whether the slot identified by `key` is free.
    ///
    /// # Panics
    ///
    /// Panics if the key was not issued by this pool.
    #[must_use]
    pub fn is_free(&self, key: Key) -> bool {
        self.slots
            .get(key.index)
            .map(Slot::is_free)
            .expect(ERR_FOREIGN_KEY)
    }

    /// Returns the items that are currently in use, in slot order.
    ///
    /// The result is a snapshot; later changes to the pool do not affect it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::new();
    /// pool.insert(1);
    /// pool.insert_free(2);
    /// pool.insert(3);
    ///
    /// assert_eq!(pool.in_use(), vec![&1, &3]);
    /// ```
    #[must_use]
    pub fn in_use(&self) -> Vec<&T> {
        self.slots
            .iter()
            .filter(|slot| slot.is_in_use())
            .map(Slot::item)
            .collect()
    }

    /// Returns the keys of the slots that are currently in use, in slot order.
    #[must_use]
    pub fn in_use_keys(&self) -> Vec<Key> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_in_use())
            .map(|(index, _)| Key { index })
            .collect()
    }

    /// Iterates over every slot in the pool, free and in use, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, &T)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (Key { index }, slot.item()))
    }

    /// Returns the item in a slot to the pool, marking the slot as free and running the
    /// teardown callback, if one is configured.
    ///
    /// Returns `false` without doing anything if the slot was already free.
    ///
    /// # Panics
    ///
    /// Panics if the key was not issued by this pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::with_factory(|| 0_u32);
    /// let key = pool.acquire().unwrap();
    ///
    /// assert!(pool.release(key));
    /// assert!(!pool.release(key));
    /// ```
    pub fn release(&mut self, key: Key) -> bool {
        let slot = self.slots.get_mut(key.index).expect(ERR_FOREIGN_KEY);

        if slot.is_free() {
            return false;
        }

        release_slot(slot, self.on_release.as_mut());

        trace!(index = key.index, "released slot");
        true
    }

    /// Returns the first in-use item that is equal to `item` to the pool.
    ///
    /// Free slots are not considered, so an item that has already been released is not
    /// released (and torn down) a second time. Returns whether a slot was released.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::new();
    /// let key = pool.insert("enemy");
    ///
    /// assert!(pool.release_item(&"enemy"));
    /// assert!(pool.is_free(key));
    ///
    /// assert!(!pool.release_item(&"enemy"));
    /// assert!(!pool.release_item(&"friend"));
    /// ```
    pub fn release_item(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        match self.find(item) {
            Some(key) => self.release(key),
            None => false,
        }
    }

    /// Returns every in-use item that matches `predicate` to the pool.
    ///
    /// Free slots are not offered to the predicate. Returns the number of released slots.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::new();
    /// for value in 1..=6 {
    ///     pool.insert(value);
    /// }
    ///
    /// assert_eq!(pool.release_where(|value| value % 2 == 0), 3);
    /// assert_eq!(pool.in_use(), vec![&1, &3, &5]);
    /// ```
    pub fn release_where<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let mut released: usize = 0;

        for slot in self.slots.iter_mut().filter(|slot| slot.is_in_use()) {
            if predicate(slot.item()) {
                release_slot(slot, self.on_release.as_mut());

                released = released
                    .checked_add(1)
                    .expect("cannot release more slots than the pool holds");
            }
        }

        trace!(released, "released matching slots");
        released
    }

    /// Returns every in-use item to the pool. Slots that are already free are left untouched.
    ///
    /// Returns the number of released slots.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::with_factory(|| 0_u32);
    /// for _ in 0..3 {
    ///     pool.acquire().unwrap();
    /// }
    ///
    /// assert_eq!(pool.release_all(), 3);
    /// assert!(pool.in_use().is_empty());
    /// assert_eq!(pool.len(), 3);
    /// ```
    pub fn release_all(&mut self) -> usize {
        self.release_where(|_| true)
    }

    /// Finds the first in-use slot whose item is equal to `item`.
    ///
    /// Free slots are not considered. Returns `None` if no in-use item matches.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::new();
    /// let used = pool.insert('a');
    /// pool.insert_free('b');
    ///
    /// assert_eq!(pool.find(&'a'), Some(used));
    /// assert_eq!(pool.find(&'b'), None);
    /// ```
    #[must_use]
    pub fn find(&self, item: &T) -> Option<Key>
    where
        T: PartialEq,
    {
        self.slots
            .iter()
            .position(|slot| slot.is_in_use() && slot.item() == item)
            .map(|index| Key { index })
    }

    /// Finds the first slot, free or in use, whose item matches `predicate`.
    ///
    /// Returns `None` if no item matches.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycling_pool::RecyclingPool;
    ///
    /// let mut pool = RecyclingPool::new();
    /// pool.insert(10);
    /// let free = pool.insert_free(20);
    ///
    /// assert_eq!(pool.find_where(|value| *value > 15), Some(free));
    /// assert_eq!(pool.find_where(|value| *value > 50), None);
    /// ```
    pub fn find_where<P>(&self, mut predicate: P) -> Option<Key>
    where
        P: FnMut(&T) -> bool,
    {
        self.slots
            .iter()
            .position(|slot| predicate(slot.item()))
            .map(|index| Key { index })
    }

    fn push_slot(&mut self, item: T, free: bool) -> Key {
        let index = self.slots.len();
        self.slots.push(Slot::new(item, free));
        Key { index }
    }
}

/// Marks the slot as free first, then lets the teardown callback see the item.
fn release_slot<T>(slot: &mut Slot<T>, on_release: Option<&mut OnRelease<T>>) {
    slot.set_free(true);

    if let Some(on_release) = on_release {
        on_release(slot.item_mut());
    }
}

impl<T> Default for RecyclingPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RecyclingPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecyclingPool")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("len", &self.len())
            .field("in_use", &self.in_use_count())
            .field("has_factory", &self.has_factory())
            .field("has_on_release", &self.on_release.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::indexing_slicing,
        reason = "we do not need to worry about these things when writing test code"
    )]

    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;
    use crate::ReleaseHook;

    assert_impl_all!(RecyclingPool<u32>: Send, fmt::Debug, Default);
    assert_not_impl_any!(RecyclingPool<u32>: Sync, Clone);
    assert_impl_all!(Key: Send, Sync, Copy, fmt::Debug);

    #[derive(Debug, PartialEq)]
    struct Widget {
        id: usize,
        visible: bool,
    }

    impl ReleaseHook for Widget {
        fn on_release(&mut self) {
            self.visible = false;
        }
    }

    fn widget_factory() -> impl FnMut() -> Widget + Send + 'static {
        let mut next_id = 0;

        move || {
            next_id += 1;
            Widget {
                id: next_id,
                visible: true,
            }
        }
    }

    fn counting_pool(releases: &Arc<AtomicUsize>) -> RecyclingPool<u32> {
        let releases = Arc::clone(releases);

        RecyclingPool::builder()
            .factory(|| 0)
            .on_release(move |_| {
                releases.fetch_add(1, Ordering::Relaxed);
            })
            .build()
    }

    #[test]
    fn smoke_test() {
        let mut pool = RecyclingPool::with_factory(widget_factory());

        assert_eq!(pool.len(), 0);
        assert!(pool.is_empty());
        assert!(pool.has_factory());

        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        let c = pool.acquire().unwrap();

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.in_use_count(), 3);
        assert_eq!(pool.free_count(), 0);

        assert_eq!(pool.get(a).id, 1);
        assert_eq!(pool.get(b).id, 2);
        assert_eq!(pool.get(c).id, 3);

        assert!(pool.release(b));

        let d = pool.acquire().unwrap();
        assert_eq!(d, b);
        assert_eq!(pool.get(d).id, 2);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn acquire_without_factory_is_exhausted() {
        let mut pool = RecyclingPool::<u32>::new();

        assert!(matches!(
            pool.acquire(),
            Err(Error::Exhausted { in_use: 0 })
        ));

        pool.insert(1);
        pool.insert_free(2);

        let key = pool.acquire().unwrap();
        assert_eq!(*pool.get(key), 2);

        assert!(matches!(
            pool.acquire(),
            Err(Error::Exhausted { in_use: 2 })
        ));

        // A failed acquisition does not change the pool.
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn acquire_picks_first_free_slot() {
        let mut pool = RecyclingPool::new();

        pool.insert(10);
        let second = pool.insert_free(20);
        let third = pool.insert_free(30);

        assert_eq!(pool.acquire().unwrap(), second);
        assert_eq!(pool.acquire().unwrap(), third);

        pool.release(third);
        pool.release(second);

        // Release order does not matter, the scan always starts at the front.
        assert_eq!(pool.acquire().unwrap(), second);
    }

    #[test]
    fn acquire_never_hands_out_used_slot() {
        let mut pool = RecyclingPool::with_factory(|| 0_u32);
        let mut live = HashSet::new();

        for round in 0..50_usize {
            let key = pool.acquire().unwrap();
            assert!(live.insert(key), "key {key:?} was handed out twice");

            if round % 3 == 0 {
                let victim = *live.iter().next().unwrap();
                live.remove(&victim);
                pool.release(victim);
            }
        }

        assert_eq!(pool.in_use_count(), live.len());
    }

    #[test]
    fn factory_is_only_called_when_needed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let mut pool = RecyclingPool::with_factory(move || {
            calls_clone.fetch_add(1, Ordering::Relaxed);
        });

        let key = pool.acquire().unwrap();
        pool.release(key);
        _ = pool.acquire().unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 1);

        _ = pool.acquire().unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn acquire_mut_gives_access_to_item() {
        let mut pool = RecyclingPool::with_factory(String::new);

        let (key, item) = pool.acquire_mut().unwrap();
        item.push_str("spark");

        assert_eq!(pool.get(key), "spark");
        assert!(!pool.is_free(key));
    }

    #[test]
    fn acquire_mut_without_factory_is_exhausted() {
        let mut pool = RecyclingPool::<String>::new();

        assert!(pool.acquire_mut().is_err());
    }

    #[test]
    fn insert_allows_duplicates() {
        let mut pool = RecyclingPool::new();

        let a = pool.insert(7);
        let b = pool.insert(7);

        assert_ne!(a, b);
        assert_eq!(pool.len(), 2);

        // Only the first in-use duplicate is released.
        assert!(pool.release_item(&7));
        assert!(pool.is_free(a));
        assert!(!pool.is_free(b));
    }

    #[test]
    fn in_use_after_acquisitions_and_releases() {
        let mut pool = RecyclingPool::with_factory(widget_factory());

        let keys = (0..5).map(|_| pool.acquire().unwrap()).collect::<Vec<_>>();

        pool.release(keys[1]);
        pool.release(keys[3]);

        let ids = pool.in_use().iter().map(|w| w.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3, 5]);
        assert_eq!(pool.in_use_keys(), vec![keys[0], keys[2], keys[4]]);
    }

    #[test]
    fn release_free_slot_is_noop() {
        let releases = Arc::new(AtomicUsize::new(0));
        let mut pool = counting_pool(&releases);

        let key = pool.insert_free(1);

        assert!(!pool.release(key));
        assert_eq!(releases.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn release_runs_teardown_once() {
        let releases = Arc::new(AtomicUsize::new(0));
        let mut pool = counting_pool(&releases);

        let key = pool.acquire().unwrap();

        assert!(pool.release(key));
        assert!(!pool.release(key));

        assert_eq!(releases.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn teardown_sees_slot_already_free() {
        let mut pool = RecyclingPool::builder()
            .factory(widget_factory())
            .release_hook()
            .build();

        let key = pool.acquire().unwrap();
        assert!(pool.get(key).visible);

        pool.release(key);
        assert!(!pool.get(key).visible);
        assert!(pool.is_free(key));
    }

    #[test]
    fn release_item_ignores_free_slots() {
        let releases = Arc::new(AtomicUsize::new(0));
        let mut pool = counting_pool(&releases);

        let free = pool.insert_free(5);
        let used = pool.insert(5);

        assert!(pool.release_item(&5));
        assert!(pool.is_free(free));
        assert!(pool.is_free(used));

        assert!(!pool.release_item(&5));
        assert_eq!(releases.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn release_item_without_match_is_noop() {
        let mut pool = RecyclingPool::new();
        let key = pool.insert(1);

        assert!(!pool.release_item(&2));
        assert!(!pool.is_free(key));
    }

    #[test]
    fn release_where_only_offers_in_use_items() {
        let releases = Arc::new(AtomicUsize::new(0));
        let mut pool = counting_pool(&releases);

        pool.insert(1);
        pool.insert_free(2);
        pool.insert(3);

        let seen = RefCell::new(Vec::new());
        let released = pool.release_where(|value| {
            seen.borrow_mut().push(*value);
            true
        });

        assert_eq!(released, 2);
        assert_eq!(seen.into_inner(), vec![1, 3]);
        assert_eq!(releases.load(Ordering::Relaxed), 2);
        assert_eq!(pool.free_count(), 3);
    }

    #[test]
    fn release_where_without_match_is_noop() {
        let mut pool = RecyclingPool::new();
        pool.insert(1);

        assert_eq!(pool.release_where(|value| *value > 1), 0);
        assert_eq!(pool.in_use_count(), 1);
    }

    #[test]
    fn release_all_leaves_free_slots_untouched() {
        let releases = Arc::new(AtomicUsize::new(0));
        let mut pool = counting_pool(&releases);

        pool.insert_free(0);
        _ = pool.acquire().unwrap();
        _ = pool.acquire().unwrap();

        assert_eq!(pool.release_all(), 2);
        assert!(pool.in_use().is_empty());
        assert_eq!(releases.load(Ordering::Relaxed), 2);

        assert_eq!(pool.release_all(), 0);
        assert_eq!(releases.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn find_only_matches_in_use_items() {
        let mut pool = RecyclingPool::new();

        let free = pool.insert_free("a");
        let used = pool.insert("a");

        assert_eq!(pool.find(&"a"), Some(used));

        pool.release(used);
        assert_eq!(pool.find(&"a"), None);

        _ = pool.acquire().unwrap();
        assert_eq!(pool.find(&"a"), Some(free));
    }

    #[test]
    fn find_on_empty_pool_is_none() {
        let pool = RecyclingPool::<u32>::new();

        // Both lookups fail soft, there is no panicking variant.
        assert_eq!(pool.find(&1), None);
        assert_eq!(pool.find_where(|_| true), None);
    }

    #[test]
    fn find_where_matches_free_items() {
        let mut pool = RecyclingPool::new();

        let free = pool.insert_free(1);
        let used = pool.insert(1);

        assert_eq!(pool.find_where(|value| *value == 1), Some(free));

        // The first slot wins regardless of whether it is free or in use.
        assert_eq!(pool.acquire().unwrap(), free);
        assert_eq!(pool.find_where(|value| *value == 1), Some(free));

        pool.release(free);
        assert_eq!(pool.find_where(|value| *value == 1), Some(free));
        assert!(!pool.is_free(used));
    }

    #[test]
    fn iter_visits_all_slots_in_order() {
        let mut pool = RecyclingPool::new();

        let a = pool.insert('x');
        let b = pool.insert_free('y');

        let all = pool.iter().collect::<Vec<_>>();
        assert_eq!(all, vec![(a, &'x'), (b, &'y')]);
    }

    #[test]
    fn reserve_grows_capacity_only() {
        let mut pool = RecyclingPool::<u32>::new();

        pool.reserve(10);

        assert!(pool.capacity() >= 10);
        assert!(pool.is_empty());
    }

    #[test]
    #[should_panic]
    fn get_with_foreign_key_panics() {
        let mut other = RecyclingPool::new();
        _ = other.insert(1);
        let key = other.insert(2);

        let mut pool = RecyclingPool::new();
        _ = pool.insert(1);

        _ = pool.get(key);
    }

    #[test]
    #[should_panic]
    fn release_with_foreign_key_panics() {
        let mut other = RecyclingPool::new();
        let key = other.insert(1);

        let mut pool = RecyclingPool::<u32>::new();
        pool.release(key);
    }

    #[test]
    fn debug_reports_state() {
        let mut pool = RecyclingPool::with_factory(|| 0_u16);
        _ = pool.acquire().unwrap();
        pool.insert_free(1);

        let debug = format!("{pool:?}");
        assert!(debug.contains("u16"));
        assert!(debug.contains("len: 2"));
        assert!(debug.contains("in_use: 1"));
        assert!(debug.contains("has_factory: true"));
    }

    #[test]
    fn in_refcell_works_fine() {
        let pool = RefCell::new(RecyclingPool::with_factory(|| 0_u32));

        let key = pool.borrow_mut().acquire().unwrap();
        *pool.borrow_mut().get_mut(key) = 99;

        assert!(pool.borrow_mut().release(key));
        assert_eq!(*pool.borrow().get(key), 99);
    }
}
