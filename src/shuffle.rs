//! Shuffle animator: nine blocks on a 3x3 grid that swap cells, spin, and recolour
//! every cycle, with an idle pause between cycles.

use crate::easing::CubicBezier;
use crate::sampling::{derangement, next_color_index};
use crate::tween::{Animated, Segment, Vec2};
use rand::Rng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

pub const BLOCK_COUNT: usize = 9;
pub const PALETTE_LEN: usize = 7;

/// Side length of a block in layout units.
pub const BLOCK_SIZE: f32 = 14.0;

/// Cell offsets of the 3x3 grid, row-major from the top-left; y grows downward.
pub const GRID: [Vec2; BLOCK_COUNT] = [
    Vec2::new(-30.0, -30.0),
    Vec2::new(0.0, -30.0),
    Vec2::new(30.0, -30.0),
    Vec2::new(-30.0, 0.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(30.0, 0.0),
    Vec2::new(-30.0, 30.0),
    Vec2::new(0.0, 30.0),
    Vec2::new(30.0, 30.0),
];

/// Cycle timings. Rotation runs as two half-length phases of `movement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub movement: Duration,
    pub idle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            movement: Duration::from_millis(800),
            idle: Duration::from_millis(400),
        }
    }
}

impl Timing {
    pub fn period(&self) -> Duration {
        self.movement + self.idle
    }
}

/// What a block looks like at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSample {
    pub position: Vec2,
    /// Degrees.
    pub rotation: f32,
    /// Fractional palette index.
    pub color: f32,
}

#[derive(Debug, Clone)]
pub struct Block {
    /// Cell of the last applied derangement.
    pub grid_index: usize,
    color_index: usize,
    position: Animated<Vec2>,
    rotation: Animated<f32>,
    color: Animated<f32>,
}

impl Block {
    /// Blocks start stacked at the centre with colour 0; the first cycle fans them out.
    fn new(index: usize) -> Self {
        Self {
            grid_index: index,
            color_index: 0,
            position: Animated::new(Vec2::ZERO),
            rotation: Animated::new(0.0),
            color: Animated::new(0.0),
        }
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    pub fn sample(&self, now: Instant) -> BlockSample {
        BlockSample {
            position: self.position.sample(now),
            rotation: self.rotation.sample(now),
            color: self.color.sample(now),
        }
    }

    pub fn is_running(&self) -> bool {
        self.position.is_running() || self.rotation.is_running() || self.color.is_running()
    }

    /// Latest instant at which one of the three sub-animations finishes.
    #[cfg(test)]
    pub fn ends_at(&self) -> Option<Instant> {
        [
            self.position.ends_at(),
            self.rotation.ends_at(),
            self.color.ends_at(),
        ]
        .into_iter()
        .flatten()
        .max()
    }

    fn retarget(&mut self, cell: usize, color_index: usize, now: Instant, timing: &Timing) {
        let half = timing.movement / 2;
        self.grid_index = cell;
        self.color_index = color_index;
        self.rotation.set(0.0);
        self.position.animate(
            now,
            Segment::new(GRID[cell], timing.movement, CubicBezier::EASE),
        );
        self.rotation.sequence(
            now,
            vec![
                Segment::new(180.0, half, CubicBezier::FAST_OUT_SLOW_IN),
                Segment::new(360.0, timing.movement - half, CubicBezier::FAST_OUT_SLOW_IN),
            ],
        );
        self.color.animate(
            now,
            Segment::new(
                color_index as f32,
                timing.movement,
                CubicBezier::FAST_OUT_SLOW_IN,
            ),
        );
    }

    fn settle(&mut self, now: Instant) {
        self.position.settle(now);
        self.rotation.settle(now);
        self.color.settle(now);
    }

    fn stop(&mut self, now: Instant) {
        self.position.stop(now);
        self.rotation.stop(now);
        self.color.stop(now);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Sub-animations of the current cycle are in flight.
    Moving,
    /// All blocks arrived; next cycle starts at `until`.
    Idle { until: Instant },
    Cancelled,
}

/// Drives the blocks through an endless sequence of cycles. Advanced cooperatively by
/// [`ShuffleAnimator::tick`]; nothing happens between ticks.
#[derive(Debug)]
pub struct ShuffleAnimator<R = StdRng> {
    blocks: [Block; BLOCK_COUNT],
    rng: R,
    timing: Timing,
    state: CycleState,
    cycles: u64,
}

impl<R: Rng> ShuffleAnimator<R> {
    /// Create the blocks and start the first cycle at `now`, with no idle pause first.
    pub fn mount(rng: R, timing: Timing, now: Instant) -> Self {
        let mut animator = Self {
            blocks: std::array::from_fn(Block::new),
            rng,
            timing,
            state: CycleState::Moving,
            cycles: 0,
        };
        animator.start_cycle(now);
        animator
    }

    #[cfg(test)]
    pub fn blocks(&self) -> &[Block; BLOCK_COUNT] {
        &self.blocks
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Number of cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == CycleState::Cancelled
    }

    /// Current cell of every block; always a permutation of the grid.
    pub fn cells(&self) -> [usize; BLOCK_COUNT] {
        std::array::from_fn(|i| self.blocks[i].grid_index)
    }

    pub fn samples(&self, now: Instant) -> [BlockSample; BLOCK_COUNT] {
        std::array::from_fn(|i| self.blocks[i].sample(now))
    }

    /// Advance the cycle: commit finished sub-animations, then either arm the idle
    /// timer (once every block has arrived) or start the next cycle (once it fires).
    pub fn tick(&mut self, now: Instant) {
        match self.state {
            CycleState::Cancelled => {}
            CycleState::Moving => {
                let mut running = false;
                for block in &mut self.blocks {
                    block.settle(now);
                    running |= block.is_running();
                }
                if !running {
                    // Armed from when the join is observed: fixed period, no catch-up.
                    let until = now + self.timing.idle;
                    trace!(cycle = self.cycles, "blocks arrived, idling");
                    self.state = CycleState::Idle { until };
                }
            }
            CycleState::Idle { until } => {
                if now >= until {
                    self.start_cycle(now);
                }
            }
        }
    }

    /// Stop every block where it is and never schedule another cycle. Idempotent.
    pub fn cancel(&mut self, now: Instant) {
        if self.is_cancelled() {
            return;
        }
        for block in &mut self.blocks {
            block.stop(now);
        }
        self.state = CycleState::Cancelled;
        info!(cycles = self.cycles, "shuffle animator cancelled");
    }

    fn start_cycle(&mut self, now: Instant) {
        let p = derangement(&mut self.rng);
        for (block, &cell) in self.blocks.iter_mut().zip(p.iter()) {
            let color = next_color_index(&mut self.rng, block.color_index());
            block.retarget(cell, color, now, &self.timing);
        }
        self.cycles += 1;
        self.state = CycleState::Moving;
        debug!(cycle = self.cycles, derangement = ?p, "shuffle cycle started");
    }
}
