/// Teardown capability for items managed by a [`RecyclingPool`][crate::RecyclingPool].
///
/// When a pool is built with [`release_hook()`][crate::RecyclingPoolBuilder::release_hook],
/// it calls [`on_release()`][Self::on_release] every time an item is handed back to the pool.
/// This is the place to hide a sprite, stop a particle emitter or reset per-use state so the
/// item is ready for its next user.
///
/// Types that need no teardown simply do not implement this trait; the pool is then built
/// without a hook and releasing an item only marks its slot as free.
///
/// # Example
///
/// ```rust
/// use recycling_pool::{RecyclingPool, ReleaseHook};
///
/// #[derive(Default)]
/// struct Projectile {
///     visible: bool,
/// }
///
/// impl ReleaseHook for Projectile {
///     fn on_release(&mut self) {
///         self.visible = false;
///     }
/// }
///
/// let mut pool = RecyclingPool::builder()
///     .factory(Projectile::default)
///     .release_hook()
///     .build();
///
/// let key = pool.acquire().unwrap();
/// pool.get_mut(key).visible = true;
///
/// pool.release(key);
/// assert!(!pool.get(key).visible);
/// ```
pub trait ReleaseHook {
    /// Called after the item's slot has been marked free.
    fn on_release(&mut self);
}

/// Creates new items for a pool on demand.
pub(crate) type Factory<T> = Box<dyn FnMut() -> T + Send>;

/// Tears down an item when it is released back to a pool.
pub(crate) type OnRelease<T> = Box<dyn FnMut(&mut T) + Send>;
