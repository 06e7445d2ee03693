/// Game loop timing and control system
///
/// Splits wall-clock frame time into a variable-rate frame tick and a bounded
/// number of fixed-rate physics ticks. The character controller runs its
/// frame update once per frame and its physics update once per fixed step.
use std::time::{Duration, Instant};

/// Target physics/update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of physics steps per frame to prevent spiral of death
const MAX_PHYSICS_STEPS: u32 = 5;

/// Frame tick produced by the loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Variable frame delta in seconds
    pub delta: f32,
    /// Number of fixed physics steps to run after the frame update
    pub physics_steps: u32,
}

/// Game loop timing state
pub struct GameLoop {
    /// Accumulated time for fixed timestep updates
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Current frame number
    frame_count: u64,

    /// Total physics steps executed
    update_count: u64,
}

impl GameLoop {
    /// Create a new game loop
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Begin a new frame using wall-clock time
    pub fn begin_frame(&mut self) -> FrameTick {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Advance the loop by an explicit frame time
    pub fn advance(&mut self, frame_time: Duration) -> FrameTick {
        self.frame_count += 1;

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && steps < MAX_PHYSICS_STEPS {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            steps += 1;
        }

        // Drop the backlog once the step cap is hit
        if steps == MAX_PHYSICS_STEPS && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::warn!(
                "Physics fell behind by {:.1}ms, dropping backlog",
                self.accumulator.as_secs_f32() * 1000.0
            );
            self.accumulator = Duration::ZERO;
        }

        self.update_count += steps as u64;
        FrameTick {
            delta: frame_time.as_secs_f32(),
            physics_steps: steps,
        }
    }

    /// Get the fixed timestep for physics updates (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Get the interpolation alpha for smooth rendering between physics steps
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / FIXED_TIMESTEP
    }

    /// Get total number of frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of physics steps executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
