//! Obstacle generation
//!
//! Gap size and position are drawn from a seeded PCG stream, so a run can be
//! replayed from its seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::Obstacle;
use crate::consts::*;

/// Produces obstacles and remembers where the last one was placed.
///
/// The cursor is in fixed playfield coordinates. It is not scrolled along with
/// the obstacles, so follow-up spawns are placed relative to where the last
/// spawn happened, not to where that obstacle currently is.
#[derive(Debug, Clone)]
pub struct ObstacleGenerator {
    rng: Pcg32,
    cursor: f32,
}

impl ObstacleGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            cursor: 0.0,
        }
    }

    /// X of the most recent spawn
    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn set_cursor(&mut self, x: f32) {
        self.cursor = x;
    }

    /// Where the next automatic spawn goes
    pub fn next_spawn_x(&self) -> f32 {
        self.cursor + PIPE_SPAWN_DISTANCE
    }

    /// Whether the right edge of the playfield is at least one spawn distance
    /// past the cursor
    pub fn spacing_elapsed(&self) -> bool {
        CANVAS_WIDTH - self.cursor >= PIPE_SPAWN_DISTANCE
    }

    /// Create an obstacle at `x` and move the cursor there
    pub fn spawn(&mut self, x: f32) -> Obstacle {
        let gap = self
            .rng
            .random_range(MIN_PIPE_GAP as u32..=MAX_PIPE_GAP as u32) as f32;

        let min_top = MIN_SEGMENT_HEIGHT;
        // Floored so the range stays valid even for very large gaps
        let max_top = (CANVAS_HEIGHT - GROUND_HEIGHT - gap - MIN_SEGMENT_HEIGHT).max(min_top);
        let gap_top = self.rng.random_range(min_top as u32..=max_top as u32) as f32;

        self.cursor = x;

        Obstacle {
            x,
            gap_top,
            gap_size: gap,
            passed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spawn_moves_cursor() {
        let mut generator = ObstacleGenerator::new(42);
        let o = generator.spawn(500.0);
        assert_eq!(o.x, 500.0);
        assert!(!o.passed);
        assert_eq!(generator.cursor(), 500.0);
        assert_eq!(generator.next_spawn_x(), 720.0);
        assert!(!generator.spacing_elapsed());

        generator.set_cursor(180.0);
        assert!(generator.spacing_elapsed());
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let mut a = ObstacleGenerator::new(7);
        let mut b = ObstacleGenerator::new(7);
        for i in 0..20 {
            let x = 500.0 + i as f32 * PIPE_SPAWN_DISTANCE;
            assert_eq!(a.spawn(x), b.spawn(x));
        }
    }

    #[test]
    fn test_values_are_whole_units() {
        let mut generator = ObstacleGenerator::new(3);
        for _ in 0..50 {
            let o = generator.spawn(500.0);
            assert_eq!(o.gap_size.fract(), 0.0);
            assert_eq!(o.gap_top.fract(), 0.0);
        }
    }

    proptest! {
        #[test]
        fn prop_obstacles_are_playable(seed in any::<u64>(), x in 400.0f32..2000.0) {
            let mut generator = ObstacleGenerator::new(seed);
            for _ in 0..8 {
                let o = generator.spawn(x);
                prop_assert!(o.gap_size >= MIN_PIPE_GAP && o.gap_size <= MAX_PIPE_GAP);
                prop_assert!(o.gap_top >= MIN_SEGMENT_HEIGHT);
                prop_assert!(o.bottom_segment_height() >= MIN_SEGMENT_HEIGHT);
                prop_assert!(o.gap_bottom() <= CANVAS_HEIGHT - GROUND_HEIGHT);
            }
        }
    }
}
