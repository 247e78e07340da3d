//! An object pool that hands out reusable items of a single type.
//!
//! This crate provides [`RecyclingPool`], a pool for workloads that create and discard many
//! similar objects (projectiles, particles, UI widgets) and want to amortize that cost by
//! reusing them. Items are never removed from the pool; handing one back only marks its slot
//! as free so the next acquisition can reuse it.
//!
//! # Features
//!
//! - **Lazy growth**: A factory creates new items only when no free slot exists.
//! - **Manual registration**: Items constructed elsewhere can be added as in use or as free.
//! - **Deterministic reuse**: The first free slot in registration order is always picked.
//! - **Teardown on release**: An optional callback, or a [`ReleaseHook`] implementation on the
//!   item type, runs every time an item is handed back.
//! - **Lookups**: By key, by value (using [`PartialEq`]) or by predicate.
//! - **Thread-safe and single-threaded variants**: [`SharedRecyclingPool`] for multi-threaded
//!   use, [`RecyclingPool`] when the caller owns the pool.
//!
//! # Example
//!
//! ```rust
//! use recycling_pool::RecyclingPool;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Particle {
//!     x: f32,
//!     y: f32,
//! }
//!
//! let mut pool = RecyclingPool::with_factory(Particle::default);
//!
//! // Each acquisition creates a new particle while none are free.
//! let first = pool.acquire().unwrap();
//! let second = pool.acquire().unwrap();
//! pool.get_mut(second).x = 5.0;
//!
//! assert_eq!(pool.len(), 2);
//! assert_eq!(pool.in_use().len(), 2);
//!
//! // Handing a particle back makes its slot available again.
//! pool.release(first);
//! assert_eq!(pool.acquire().unwrap(), first);
//! assert_eq!(pool.len(), 2);
//!
//! // Items can also be looked up by value.
//! let moved = Particle { x: 5.0, y: 0.0 };
//! assert_eq!(pool.find(&moved), Some(second));
//! assert!(pool.release_item(&moved));
//! ```
//!
//! For use from multiple threads:
//!
//! ```rust
//! use recycling_pool::SharedRecyclingPool;
//!
//! let pool = SharedRecyclingPool::with_factory(|| vec![0_u8; 1024]);
//!
//! let key = pool.acquire().unwrap();
//! pool.with_mut(key, |buffer| buffer[0] = 1);
//! pool.release(key);
//! ```

mod builder;
mod error;
mod pool;
mod release_hook;
mod shared;
mod slot;

pub use builder::*;
pub use error::Error;
pub(crate) use error::Result;
pub use pool::{Key, RecyclingPool};
pub use release_hook::ReleaseHook;
pub(crate) use release_hook::{Factory, OnRelease};
pub use shared::SharedRecyclingPool;
pub(crate) use slot::Slot;
