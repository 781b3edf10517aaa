//! Time update system.
//!
//! Updates the world's [`WorldTime`](crate::resources::worldtime::WorldTime)
//! once per frame, applying `time_scale` to the provided delta.
use crate::world::World;

/// Update elapsed and delta seconds on the world clock.
///
/// `dt` is expected to be the unscaled frame delta in seconds. The system
/// applies the current `time_scale` and writes both `elapsed` and `delta`.
pub fn update_world_time(world: &mut World, dt: f32) {
    let wt = world.time_mut();
    let scaled_dt = dt * wt.time_scale;
    wt.elapsed += f64::from(scaled_dt);
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}
