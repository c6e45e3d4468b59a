//! Fixed-period timer driven by frame deltas

/// Accumulates frame time and fires once per elapsed period
#[derive(Debug, Clone)]
pub struct FixedTimer {
    period: f32,
    accumulated: f32,
    running: bool,
}

impl FixedTimer {
    /// Create a stopped timer
    pub fn new(period: f32) -> Self {
        Self {
            period,
            accumulated: 0.0,
            running: false,
        }
    }

    /// Start firing; accumulated time is discarded
    pub fn start(&mut self) {
        self.accumulated = 0.0;
        self.running = true;
    }

    /// Stop firing. Idempotent.
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulated = 0.0;
    }

    /// Whether the timer is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Timer period in seconds
    pub fn period(&self) -> f32 {
        self.period
    }

    /// Advance by `delta_time`, returning how many periods elapsed
    pub fn advance(&mut self, delta_time: f32) -> u32 {
        if !self.running || !delta_time.is_finite() || delta_time <= 0.0 {
            return 0;
        }

        self.accumulated += delta_time;
        let mut fired = 0;
        while self.accumulated >= self.period {
            self.accumulated -= self.period;
            fired += 1;
        }
        fired
    }
}
