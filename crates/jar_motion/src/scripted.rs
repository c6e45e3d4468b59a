//! Replay source that feeds prerecorded samples from a background thread

use crate::error::{MotionError, Result};
use crate::sample::MotionSample;
use crate::source::{MotionSender, MotionSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Nominal sensor rate
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_micros(16_667);

/// Motion source replaying a fixed list of samples
///
/// Useful for headless runs and tests. Once the list is exhausted the worker
/// exits and drops its sender, unless `looping` is set.
pub struct ScriptedMotionSource {
    samples: Arc<[MotionSample]>,
    interval: Duration,
    looping: bool,
    available: bool,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ScriptedMotionSource {
    /// Create a source that replays `samples` once at the nominal rate
    pub fn new(samples: Vec<MotionSample>) -> Self {
        Self {
            samples: samples.into(),
            interval: DEFAULT_SAMPLE_INTERVAL,
            looping: false,
            available: true,
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// A source whose sensor is missing
    pub fn unavailable() -> Self {
        let mut source = Self::new(Vec::new());
        source.available = false;
        source
    }

    /// Set delay between samples
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Restart from the first sample after the last one
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

impl MotionSource for ScriptedMotionSource {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&mut self, sender: MotionSender) -> Result<()> {
        if !self.available {
            return Err(MotionError::Unavailable("scripted source disabled".into()));
        }
        if self.worker.is_some() {
            return Err(MotionError::AlreadyStarted);
        }

        self.stop_flag.store(false, Ordering::Release);
        let samples = Arc::clone(&self.samples);
        let stop = Arc::clone(&self.stop_flag);
        let interval = self.interval;
        let looping = self.looping && !samples.is_empty();

        let worker = std::thread::Builder::new()
            .name("scripted-motion".into())
            .spawn(move || {
                'replay: loop {
                    for sample in samples.iter() {
                        if stop.load(Ordering::Acquire) || !sender.send(*sample) {
                            break 'replay;
                        }
                        if !interval.is_zero() {
                            std::thread::sleep(interval);
                        }
                    }
                    if !looping {
                        break;
                    }
                }
            })
            .map_err(|e| MotionError::Unavailable(e.to_string()))?;

        self.worker = Some(worker);
        Ok(())
    }

    fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Scripted motion worker panicked");
            }
        }
    }

    fn name(&self) -> &str {
        "scripted motion"
    }
}

impl Drop for ScriptedMotionSource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::MotionEvent;
    use crate::source::MotionSubscription;
    use std::time::Instant;

    fn collect_until_disconnected(sub: &mut MotionSubscription) -> Vec<MotionEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while !sub.is_disconnected() && Instant::now() < deadline {
            events.extend(sub.poll());
            std::thread::sleep(Duration::from_millis(1));
        }
        events
    }

    #[test]
    fn test_replays_all_samples_then_disconnects() {
        let samples: Vec<_> = (0..10)
            .map(|i| MotionSample::upright(0.0, -1.0, 0.0).at(i as f64 / 60.0))
            .collect();
        let source = ScriptedMotionSource::new(samples).with_interval(Duration::ZERO);
        let mut sub = MotionSubscription::start(Box::new(source)).unwrap();

        let events = collect_until_disconnected(&mut sub);
        let sample_count = events
            .iter()
            .filter(|e| matches!(e, MotionEvent::Sample(_)))
            .count();
        assert_eq!(sample_count, 10);
        assert!(matches!(events.last(), Some(MotionEvent::Unavailable(_))));
    }

    #[test]
    fn test_looping_source_stops_on_cancel() {
        let source = ScriptedMotionSource::new(vec![MotionSample::upright(0.2, -0.9, 0.0)])
            .with_interval(Duration::from_millis(1))
            .looping(true);
        let mut sub = MotionSubscription::start(Box::new(source)).unwrap();

        std::thread::sleep(Duration::from_millis(10));
        sub.cancel();
        assert!(!sub.is_active());
        assert!(sub.poll().is_empty());
    }

    #[test]
    fn test_unavailable_source() {
        let source = ScriptedMotionSource::unavailable();
        assert!(!source.is_available());
        assert!(MotionSubscription::start(Box::new(source)).is_err());
    }
}
