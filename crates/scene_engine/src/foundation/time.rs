//! Frame timing
//!
//! The engine loop asks a [`Timer`] for one delta per frame. The delta either
//! comes from the wall clock, clamped so a stall (debugger break, window drag)
//! does not feed one huge step into every component, or is a fixed step for
//! deterministic runs.

use std::time::Instant;

/// Longest wall-clock step handed to the scene, in seconds
pub const MAX_WALL_CLOCK_STEP: f32 = 0.25;

/// Where frame deltas come from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStep {
    /// Measured between frames, clamped to [`MAX_WALL_CLOCK_STEP`]
    WallClock,
    /// Always this many seconds
    Fixed(f32),
}

impl FrameStep {
    /// Fixed step when `seconds` is given, wall clock otherwise
    pub fn from_config(seconds: Option<f32>) -> Self {
        seconds.map_or(Self::WallClock, Self::Fixed)
    }
}

/// Per-frame delta source and frame counter
#[derive(Debug)]
pub struct Timer {
    step: FrameStep,
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Timer {
    /// Timer that has not produced a frame yet
    pub fn new(step: FrameStep) -> Self {
        Self {
            step,
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Start a new frame and return its delta in seconds
    pub fn next_frame(&mut self) -> f32 {
        let now = Instant::now();
        let delta_time = match self.step {
            FrameStep::Fixed(step) => step,
            FrameStep::WallClock => {
                let measured = now.duration_since(self.last_frame).as_secs_f32();
                if measured > MAX_WALL_CLOCK_STEP {
                    log::debug!("Frame took {:.3}s, clamping step to {}s", measured, MAX_WALL_CLOCK_STEP);
                }
                measured.min(MAX_WALL_CLOCK_STEP)
            }
        };

        self.last_frame = now;
        self.delta_time = delta_time;
        self.total_time += delta_time;
        self.frame_count += 1;
        delta_time
    }

    /// How deltas are produced
    pub fn step(&self) -> FrameStep {
        self.step
    }

    /// Delta of the current frame
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Scene time: the sum of all deltas handed out
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Frames started so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Wall-clock milliseconds since the current frame started
    pub fn frame_elapsed_millis(&self) -> f32 {
        self.last_frame.elapsed().as_secs_f32() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(FrameStep::WallClock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_step() {
        let mut timer = Timer::new(FrameStep::Fixed(0.25));
        assert_eq!(timer.next_frame(), 0.25);
        timer.next_frame();

        assert_eq!(timer.frame_count(), 2);
        assert_eq!(timer.delta_time(), 0.25);
        assert_relative_eq!(timer.total_time(), 0.5);
    }

    #[test]
    fn test_wall_clock_is_clamped() {
        let mut timer = Timer::default();
        let delta = timer.next_frame();
        assert!((0.0..=MAX_WALL_CLOCK_STEP).contains(&delta));
    }

    #[test]
    fn test_step_from_config() {
        assert_eq!(FrameStep::from_config(None), FrameStep::WallClock);
        assert_eq!(FrameStep::from_config(Some(0.5)), FrameStep::Fixed(0.5));
    }
}
