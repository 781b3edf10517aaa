//! Frame-driven sprite animation state.
//!
//! A [`SpriteAnimation`] advances by at most one frame per
//! [`progress`](SpriteAnimation::progress) call. Time left over when a frame
//! ends is dropped rather than carried into the next frame, so frame
//! durations behave as discrete ticks.

use crate::math::Bounds;
use crate::resources::assets::FrameData;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub region: Bounds,
    /// Seconds.
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimation {
    pub name: String,
    pub frames: Vec<AnimationFrame>,
    pub looped: bool,
    pub frame_number: usize,
    pub time_spent: f32,
    pub animation_speed: f32,
}

impl SpriteAnimation {
    pub fn new(name: impl Into<String>, frames: Vec<AnimationFrame>) -> Self {
        Self {
            name: name.into(),
            frames,
            looped: false,
            frame_number: 0,
            time_spent: 0.0,
            animation_speed: 1.0,
        }
    }

    /// Build from catalog frames, whose durations are in milliseconds.
    pub fn from_asset(name: impl Into<String>, frames: &[FrameData]) -> Self {
        Self::new(
            name,
            frames
                .iter()
                .map(|f| AnimationFrame {
                    region: f.region,
                    duration: f.duration / 1000.0,
                })
                .collect(),
        )
    }

    pub fn current_frame(&self) -> Option<&AnimationFrame> {
        self.frames.get(self.frame_number)
    }

    pub fn reset(&mut self) {
        self.frame_number = 0;
        self.time_spent = 0.0;
    }

    /// Sum of every frame's declared duration, in seconds.
    pub fn total_duration(&self) -> f32 {
        self.frames.iter().map(|f| f.duration).sum()
    }

    /// Accumulate `delta` seconds (scaled by `animation_speed`).
    ///
    /// Returns the frame to show, or `None` once a non-looping animation has
    /// run past its last frame. Either way the animation is back on frame 0
    /// after it wraps.
    pub fn progress(&mut self, delta: f32) -> Option<&AnimationFrame> {
        self.time_spent += delta * self.animation_speed;
        let duration = self.frames.get(self.frame_number)?.duration;
        if self.time_spent < duration {
            return self.frames.get(self.frame_number);
        }
        self.frame_number += 1;
        self.time_spent = 0.0;
        if self.frame_number >= self.frames.len() {
            self.frame_number = 0;
            if !self.looped {
                return None;
            }
        }
        self.frames.get(self.frame_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn frames(durations: &[f32]) -> Vec<AnimationFrame> {
        durations
            .iter()
            .enumerate()
            .map(|(i, d)| AnimationFrame {
                region: Bounds::new(i as f32 * 16.0, 0.0, 16.0, 16.0),
                duration: *d,
            })
            .collect()
    }

    #[test]
    fn sub_frame_time_does_not_advance_and_leftover_is_dropped() {
        let mut anim = SpriteAnimation::new("IDLE", frames(&[0.1, 0.05]));
        anim.progress(0.06);
        assert_eq!(anim.frame_number, 0);
        assert!((anim.time_spent - 0.06).abs() < EPSILON);
        let frame = anim.progress(0.06).copied();
        assert_eq!(anim.frame_number, 1);
        assert_eq!(anim.time_spent, 0.0);
        assert_eq!(frame.unwrap().region.x, 16.0);
    }

    #[test]
    fn large_delta_advances_a_single_frame() {
        let mut anim = SpriteAnimation::new("RUN", frames(&[0.1, 0.1, 0.1]));
        anim.looped = true;
        anim.progress(10.0);
        assert_eq!(anim.frame_number, 1);
    }

    #[test]
    fn looping_animation_wraps_to_first_frame() {
        let mut anim = SpriteAnimation::new("RUN", frames(&[0.1, 0.1]));
        anim.looped = true;
        anim.progress(0.1);
        let frame = anim.progress(0.1).copied();
        assert_eq!(anim.frame_number, 0);
        assert_eq!(frame.unwrap().region.x, 0.0);
    }

    #[test]
    fn non_looping_animation_finishes_once_then_restarts() {
        let mut anim = SpriteAnimation::new("ATTACK", frames(&[0.1, 0.1]));
        assert!(anim.progress(0.1).is_some());
        assert!(anim.progress(0.1).is_none());
        assert_eq!(anim.frame_number, 0);
        assert!(anim.progress(0.05).is_some());
        assert_eq!(anim.frame_number, 0);
    }

    #[test]
    fn animation_speed_scales_progress() {
        let mut anim = SpriteAnimation::new("WALK", frames(&[0.1, 0.1]));
        anim.animation_speed = 2.0;
        anim.progress(0.05);
        assert_eq!(anim.frame_number, 1);
    }

    #[test]
    fn catalog_durations_are_converted_to_seconds() {
        let data = [FrameData {
            region: Bounds::new(0.0, 0.0, 8.0, 8.0),
            duration: 250.0,
        }];
        let anim = SpriteAnimation::from_asset("IDLE", &data);
        assert!((anim.total_duration() - 0.25).abs() < EPSILON);
    }

    #[test]
    fn empty_animation_reports_finished() {
        let mut anim = SpriteAnimation::new("NONE", Vec::new());
        assert!(anim.progress(1.0).is_none());
    }
}
