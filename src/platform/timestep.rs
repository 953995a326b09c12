//! Fixed-rate tick scheduling from variable frame deltas
//!
//! Display refresh rates are rarely exactly 60 Hz and requestAnimationFrame
//! timestamps jitter, so a bare accumulator drifts across the tick boundary
//! and a "60 Hz" display ends up running 0 or 2 ticks on some frames.
//! Deltas within `SNAP_TOLERANCE` of one tick are treated as exactly one tick,
//! and the leftover time starts half a tick in so remaining jitter of less
//! than half a tick either way never changes the count.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta accepted, in seconds
pub const MAX_FRAME_DT: f32 = 0.1;

/// Frame deltas this close to `SIM_DT` count as exactly one tick
pub const SNAP_TOLERANCE: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    accumulator: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self {
            accumulator: SIM_DT * 0.5,
        }
    }

    /// Forget any carried time, e.g. after the page was hidden
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed one frame delta in seconds; returns how many ticks to run now
    pub fn advance(&mut self, dt: f32) -> u32 {
        let mut dt = dt.clamp(0.0, MAX_FRAME_DT);
        if (dt - SIM_DT).abs() < SNAP_TOLERANCE {
            dt = SIM_DT;
        }
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        // Drop time we could not catch up on instead of carrying it over
        if ticks == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT * 0.5);
        }
        ticks
    }
}
