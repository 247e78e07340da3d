//! Example that simulates a few frames of a game where projectiles are fired and expire.
//!
//! Expired projectiles go back to the pool and are reused for the next shots instead of
//! being allocated again.

use recycling_pool::{RecyclingPool, ReleaseHook};

#[derive(Debug, Default)]
struct Projectile {
    position: f32,
    speed: f32,
    active: bool,
}

impl ReleaseHook for Projectile {
    fn on_release(&mut self) {
        self.active = false;
    }
}

fn main() {
    println!("=== Recycling Pool Projectile Example ===");

    let mut pool = RecyclingPool::builder()
        .factory(Projectile::default)
        .release_hook()
        .prewarm(2)
        .build();

    for frame in 0..6_u8 {
        // Fire one projectile per frame.
        let (_, projectile) = pool.acquire_mut().expect("pool has a factory");
        projectile.position = 0.0;
        projectile.speed = f32::from(frame).mul_add(0.5, 1.0);
        projectile.active = true;

        // Move every active projectile.
        for key in pool.in_use_keys() {
            let projectile = pool.get_mut(key);
            projectile.position += projectile.speed;
        }

        // Projectiles that left the screen go back to the pool.
        let expired = pool.release_where(|p| p.position > 3.0);

        println!(
            "frame {frame}: {} in flight, {expired} expired, {} slots total",
            pool.in_use_count(),
            pool.len()
        );
    }

    println!("Projectile example completed successfully!");
}
