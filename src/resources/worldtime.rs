/// Simulation clock owned by the [`World`](crate::world::World).
///
/// `elapsed` is the scaled time in seconds since the simulation started and
/// `delta` the scaled duration of the current frame, also in seconds.
#[derive(Debug, Clone, Copy)]
pub struct WorldTime {
    pub elapsed: f64,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
