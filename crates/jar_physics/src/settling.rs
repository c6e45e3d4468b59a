//! Settling sweep for slow stars resting near the floor
//!
//! Rapier with persistent gravity and bouncy walls can leave stars in a
//! low-amplitude oscillation that never fully decays. The sweep hard-stops
//! slow, near-floor stars and snaps them to a consistent rest height. Stars
//! that are still falling or sit above the floor band are never touched.

use crate::body::BodyMotion;
use crate::config::SettlingConfig;
use glam::Vec2;

/// Outcome of settling one star
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Left alone
    Untouched,
    /// Motion zeroed, position kept
    Stopped,
    /// Motion zeroed and height snapped to the rest height
    Snapped,
}

impl SettleOutcome {
    /// Whether the star was modified
    pub fn is_settled(self) -> bool {
        self != Self::Untouched
    }
}

/// Settle a single star in place
pub fn settle(config: &SettlingConfig, motion: &mut BodyMotion) -> SettleOutcome {
    if motion.speed() >= config.speed_threshold || motion.position.y >= config.floor_band {
        return SettleOutcome::Untouched;
    }

    motion.velocity = Vec2::ZERO;
    motion.angular_velocity = 0.0;

    if motion.position.y > config.rest_y {
        motion.position.y = config.rest_y;
        SettleOutcome::Snapped
    } else {
        SettleOutcome::Stopped
    }
}

/// Counters from one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Stars visited
    pub visited: usize,
    /// Stars stopped in place
    pub stopped: usize,
    /// Stars stopped and snapped down
    pub snapped: usize,
}

impl SweepStats {
    /// Stars modified by the sweep
    pub fn settled(&self) -> usize {
        self.stopped + self.snapped
    }

    /// Count one outcome
    pub fn record(&mut self, outcome: SettleOutcome) {
        self.visited += 1;
        match outcome {
            SettleOutcome::Untouched => {}
            SettleOutcome::Stopped => self.stopped += 1,
            SettleOutcome::Snapped => self.snapped += 1,
        }
    }
}

/// Runs the settling rule over a set of stars
#[derive(Debug, Clone)]
pub struct SettlingMonitor {
    config: SettlingConfig,
    sweeps: u64,
}

impl SettlingMonitor {
    /// Create a new monitor
    pub fn new(config: SettlingConfig) -> Self {
        Self { config, sweeps: 0 }
    }

    /// Get the configuration
    pub fn config(&self) -> &SettlingConfig {
        &self.config
    }

    /// Apply the rule to every star
    pub fn sweep<'a>(&mut self, stars: impl IntoIterator<Item = &'a mut BodyMotion>) -> SweepStats {
        let mut stats = SweepStats::default();
        for motion in stars {
            stats.record(settle(&self.config, motion));
        }
        self.sweeps += 1;
        stats
    }

    /// Number of sweeps run so far
    pub fn sweep_count(&self) -> u64 {
        self.sweeps
    }
}
