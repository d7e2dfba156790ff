//! Core event types and async event sources for the kiosk runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// All producers (input task, tick source) share one bounded mpsc channel sized by
// `EVENT_CHANNEL_CAP`. Producers await `send`, so a slow consumer applies backpressure instead of
// dropping pointer events. Send failures only happen once the consumer is gone and terminate the
// producer.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

// -------------------------------------------------------------------------------------------------
// Telemetry
// -------------------------------------------------------------------------------------------------
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static POINTER_EVENTS: AtomicU64 = AtomicU64::new(0);
pub static TICKS_EMITTED: AtomicU64 = AtomicU64::new(0);
// Async input task lifecycle
pub static ASYNC_INPUT_STARTS: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_SIGNAL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_CHANNEL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_STREAM: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_ERROR: AtomicU64 = AtomicU64::new(0);

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Input(InputEvent),
    /// Periodic refresh of text field cells.
    Tick,
    Shutdown,
}

/// Normalized input events, already in canvas units.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button press / touch.
    Pointer(PointerEvent),
    /// Canvas resize (columns, rows).
    Resize(u16, u16),
    /// User asked to leave (Ctrl-C, Esc).
    Interrupt,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// -------------------------------------------------------------------------------------------------
// Async Event Sources
// -------------------------------------------------------------------------------------------------
// Each source owns its task lifecycle and must stop promptly once `tx.send(..)` fails (consumer
// dropped). Sources that can outlive the surface they feed expose their own cancel handle.

/// Trait implemented by any async event producer.
pub trait AsyncEventSource: Send + 'static {
    /// Stable identifier used for logging.
    fn name(&self) -> &'static str;
    /// Consume self and spawn the background task. Implementors stop when
    /// the channel closes or on their own stop condition.
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Registry of event sources spawned together at startup.
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl Default for EventSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawn all registered sources, returning their JoinHandles. Each source receives its own
    /// clone of `tx`; during shutdown the caller drops its last `Sender` before awaiting the
    /// handles so the sources observe the closed channel.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.events", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

/// Stops a [`TickEventSource`]. Cloneable; cancelling twice is harmless.
#[derive(Debug, Clone, Default)]
pub struct TickCancel {
    notify: Arc<Notify>,
}

impl TickCancel {
    pub fn cancel(&self) {
        self.notify.notify_one();
    }
}

/// Periodic refresh source. Emits `Event::Tick` every `interval`, the
/// first one a full interval after spawning. Missed ticks are skipped
/// rather than bursted.
pub struct TickEventSource {
    interval: Duration,
    cancel: TickCancel,
}

impl TickEventSource {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancel: TickCancel::default(),
        }
    }

    pub fn cancel_handle(&self) -> TickCancel {
        self.cancel.clone()
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let dur = self.interval;
        let cancel = self.cancel.notify;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + dur, dur);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancel.notified() => {
                        tracing::debug!(target: "runtime.events", source = "tick", "tick_cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        if tx.send(Event::Tick).await.is_err() {
                            CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                            break;
                        }
                        TICKS_EMITTED.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        })
    }
}
