//! Motion sources and the subscription that owns them
//!
//! A source produces samples on its own thread or callback. It never touches
//! simulation state: every reading goes through a channel that the owner
//! drains on the simulation timeline.

use crate::error::{MotionError, Result};
use crate::sample::{MotionEvent, MotionSample};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Producer side handed to a source when it starts
#[derive(Debug, Clone)]
pub struct MotionSender {
    events: Sender<MotionEvent>,
    cancelled: Arc<AtomicBool>,
}

impl MotionSender {
    /// Deliver a sample. Returns `false` once the subscription is gone.
    pub fn send(&self, sample: MotionSample) -> bool {
        if self.is_cancelled() {
            return false;
        }
        self.events.send(MotionEvent::Sample(sample)).is_ok()
    }

    /// Report that the sensor stopped producing readings
    pub fn report_unavailable(&self, reason: impl Into<String>) -> bool {
        if self.is_cancelled() {
            return false;
        }
        self.events.send(MotionEvent::Unavailable(reason.into())).is_ok()
    }

    /// Whether the owning subscription has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Something that produces gravity samples at roughly 60 Hz
pub trait MotionSource: Send {
    /// Whether the sensor exists and is enabled
    fn is_available(&self) -> bool;

    /// Begin producing samples into `sender`
    fn start(&mut self, sender: MotionSender) -> Result<()>;

    /// Stop producing samples. Must be safe to call repeatedly.
    fn stop(&mut self);

    /// Human-readable name for logging
    fn name(&self) -> &str {
        "motion source"
    }
}

/// Owned handle to a running motion source
///
/// Dropping the subscription cancels it.
pub struct MotionSubscription {
    source: Box<dyn MotionSource>,
    receiver: Receiver<MotionEvent>,
    cancelled: Arc<AtomicBool>,
    active: bool,
    disconnected: bool,
}

impl MotionSubscription {
    /// Start `source` and take ownership of it
    pub fn start(mut source: Box<dyn MotionSource>) -> Result<Self> {
        if !source.is_available() {
            return Err(MotionError::Unavailable(format!(
                "{} reports no sensor",
                source.name()
            )));
        }

        let (tx, rx) = crossbeam_channel::unbounded();
        let cancelled = Arc::new(AtomicBool::new(false));
        source.start(MotionSender {
            events: tx,
            cancelled: Arc::clone(&cancelled),
        })?;

        log::info!("Started motion updates from {}", source.name());

        Ok(Self {
            source,
            receiver: rx,
            cancelled,
            active: true,
            disconnected: false,
        })
    }

    /// Drain every event queued since the last poll
    ///
    /// A source that hung up is reported once as `MotionEvent::Unavailable`.
    pub fn poll(&mut self) -> Vec<MotionEvent> {
        let mut events = Vec::new();
        if !self.active {
            return events;
        }

        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        self.disconnected = true;
                        events.push(MotionEvent::Unavailable(
                            MotionError::Disconnected.to_string(),
                        ));
                    }
                    break;
                }
            }
        }

        events
    }

    /// Stop the source. Idempotent.
    pub fn cancel(&mut self) {
        if !self.active {
            return;
        }
        self.cancelled.store(true, Ordering::Release);
        self.source.stop();
        self.active = false;
        log::info!("Stopped motion updates from {}", self.source.name());
    }

    /// Whether the source is still running
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the source hung up on its own
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl Drop for MotionSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for MotionSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionSubscription")
            .field("source", &self.source.name())
            .field("active", &self.active)
            .field("disconnected", &self.disconnected)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Source that pushes its samples synchronously in `start`
    struct BurstSource {
        samples: Vec<MotionSample>,
        available: bool,
        stops: Arc<AtomicUsize>,
        sender: Option<MotionSender>,
    }

    impl BurstSource {
        fn new(samples: Vec<MotionSample>, stops: Arc<AtomicUsize>) -> Self {
            Self {
                samples,
                available: true,
                stops,
                sender: None,
            }
        }
    }

    impl MotionSource for BurstSource {
        fn is_available(&self) -> bool {
            self.available
        }

        fn start(&mut self, sender: MotionSender) -> Result<()> {
            for sample in &self.samples {
                sender.send(*sample);
            }
            self.sender = Some(sender);
            Ok(())
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
            self.sender = None;
        }
    }

    #[test]
    fn test_poll_drains_samples_in_order() {
        let stops = Arc::new(AtomicUsize::new(0));
        let samples: Vec<_> = (0..3)
            .map(|i| MotionSample::upright(0.0, -1.0, 0.0).at(i as f64))
            .collect();
        let mut sub =
            MotionSubscription::start(Box::new(BurstSource::new(samples.clone(), stops))).unwrap();

        let events = sub.poll();
        assert_eq!(events.len(), 3);
        for (event, expected) in events.iter().zip(&samples) {
            assert_eq!(event, &MotionEvent::Sample(*expected));
        }
        assert!(sub.poll().is_empty());
    }

    #[test]
    fn test_unavailable_source_fails_to_start() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut source = BurstSource::new(Vec::new(), stops);
        source.available = false;

        let err = MotionSubscription::start(Box::new(source)).unwrap_err();
        assert!(matches!(err, MotionError::Unavailable(_)));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut sub =
            MotionSubscription::start(Box::new(BurstSource::new(Vec::new(), Arc::clone(&stops))))
                .unwrap();

        sub.cancel();
        sub.cancel();
        assert!(!sub.is_active());
        drop(sub);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_cancels() {
        let stops = Arc::new(AtomicUsize::new(0));
        let sub =
            MotionSubscription::start(Box::new(BurstSource::new(Vec::new(), Arc::clone(&stops))))
                .unwrap();
        drop(sub);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disconnect_reported_once() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut sub =
            MotionSubscription::start(Box::new(BurstSource::new(Vec::new(), stops))).unwrap();

        // Source drops its sender without being cancelled.
        sub.source.stop();

        let events = sub.poll();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], MotionEvent::Unavailable(_)));
        assert!(sub.is_disconnected());
        assert!(sub.poll().is_empty());
    }

    #[test]
    fn test_sender_refuses_after_cancel() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let cancelled = Arc::new(AtomicBool::new(false));
        let sender = MotionSender {
            events: tx,
            cancelled: Arc::clone(&cancelled),
        };

        assert!(sender.send(MotionSample::upright(0.0, -1.0, 0.0)));
        cancelled.store(true, Ordering::SeqCst);
        assert!(!sender.send(MotionSample::upright(0.0, -1.0, 0.0)));
        assert!(!sender.report_unavailable("gone"));
    }
}
