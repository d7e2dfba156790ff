//! Render scheduler.
//!
//! Producers report invalidation intents (`RenderDelta`) via `mark`; the
//! host loop calls `consume` once per frame and receives a single
//! [`Decision`]. Marks between two consumes never produce two paints.
//!
//! Merge semantics:
//! - Any `Full` in the queue makes the frame `Full`; queued `Fields` marks
//!   are absorbed (counted as suppressed).
//! - Several `Fields` marks collapse into one `Fields` frame (counted as
//!   collapsed).
//!
//! `effective` differs from `semantic` only when the scheduler has never
//! issued a `Full` frame: a fields refresh needs a projected layout to
//! paint into, so the first frame is always escalated.

use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use tracing::trace;

/// Render invalidation intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderDelta {
    /// Re-project the current layout and repaint every cell (layout change,
    /// resize, any action that reported dirty).
    Full,
    /// Repaint text field cells only from the geometry of the last full
    /// frame (periodic refresh).
    Fields,
}

/// Merged outcome of one `consume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub semantic: RenderDelta,
    pub effective: RenderDelta,
}

#[derive(Debug, Default)]
pub struct RenderDeltaMetrics {
    full: AtomicU64,
    fields: AtomicU64,
    collapsed_fields: AtomicU64,
    suppressed_fields: AtomicU64,
    escalated: AtomicU64,
    semantic_frames: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderDeltaMetricsSnapshot {
    pub full: u64,
    pub fields: u64,
    /// Extra `Fields` marks merged into an already pending `Fields` frame.
    pub collapsed_fields: u64,
    /// `Fields` marks absorbed by a `Full` in the same frame.
    pub suppressed_fields: u64,
    /// `Fields` decisions executed as `Full` because no full frame existed.
    pub escalated: u64,
    pub semantic_frames: u64,
}

impl RenderDeltaMetrics {
    pub fn snapshot(&self) -> RenderDeltaMetricsSnapshot {
        RenderDeltaMetricsSnapshot {
            full: self.full.load(Relaxed),
            fields: self.fields.load(Relaxed),
            collapsed_fields: self.collapsed_fields.load(Relaxed),
            suppressed_fields: self.suppressed_fields.load(Relaxed),
            escalated: self.escalated.load(Relaxed),
            semantic_frames: self.semantic_frames.load(Relaxed),
        }
    }

    fn incr_semantic(&self, delta: RenderDelta) {
        match delta {
            RenderDelta::Full => self.full.fetch_add(1, Relaxed),
            RenderDelta::Fields => self.fields.fetch_add(1, Relaxed),
        };
        self.semantic_frames.fetch_add(1, Relaxed);
    }
}

#[derive(Debug, Default)]
pub struct RenderScheduler {
    pending: Vec<RenderDelta>,
    has_full_frame: bool,
    metrics: RenderDeltaMetrics,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics_snapshot(&self) -> RenderDeltaMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Record a delta. Accumulates until `consume()`.
    pub fn mark(&mut self, delta: RenderDelta) {
        trace!(target: "render.scheduler", ?delta, "render_mark");
        self.pending.push(delta);
    }

    pub fn mark_full(&mut self) {
        self.mark(RenderDelta::Full);
    }

    pub fn mark_fields(&mut self) {
        self.mark(RenderDelta::Fields);
    }

    /// Collapse queued deltas into one decision, or `None` when nothing
    /// was marked since the last call.
    pub fn consume(&mut self) -> Option<Decision> {
        if self.pending.is_empty() {
            return None;
        }
        let semantic = self.collapse();
        self.pending.clear();
        self.metrics.incr_semantic(semantic);

        let effective = if semantic == RenderDelta::Fields && !self.has_full_frame {
            self.metrics.escalated.fetch_add(1, Relaxed);
            RenderDelta::Full
        } else {
            semantic
        };
        if effective == RenderDelta::Full {
            self.has_full_frame = true;
        }
        trace!(target: "render.scheduler", ?semantic, ?effective, "render_decision");
        Some(Decision {
            semantic,
            effective,
        })
    }

    fn collapse(&self) -> RenderDelta {
        let fields = self
            .pending
            .iter()
            .filter(|d| **d == RenderDelta::Fields)
            .count() as u64;
        if self.pending.contains(&RenderDelta::Full) {
            self.metrics.suppressed_fields.fetch_add(fields, Relaxed);
            return RenderDelta::Full;
        }
        self.metrics
            .collapsed_fields
            .fetch_add(fields.saturating_sub(1), Relaxed);
        RenderDelta::Fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queue_yields_nothing() {
        let mut s = RenderScheduler::new();
        assert!(s.consume().is_none());
        assert_eq!(s.metrics_snapshot(), RenderDeltaMetricsSnapshot::default());
    }

    #[test]
    fn full_overrides_fields() {
        let mut s = RenderScheduler::new();
        s.mark_fields();
        s.mark_full();
        s.mark_fields();
        let d = s.consume().unwrap();
        assert_eq!(d.semantic, RenderDelta::Full);
        assert_eq!(d.effective, RenderDelta::Full);
        assert_eq!(s.metrics_snapshot().suppressed_fields, 2);
        assert!(s.consume().is_none(), "second consume empty");
    }

    #[test]
    fn first_fields_frame_escalates_to_full() {
        let mut s = RenderScheduler::new();
        s.mark_fields();
        let d = s.consume().unwrap();
        assert_eq!(d.semantic, RenderDelta::Fields);
        assert_eq!(d.effective, RenderDelta::Full);

        s.mark_fields();
        let d = s.consume().unwrap();
        assert_eq!(d.effective, RenderDelta::Fields);
        assert_eq!(s.metrics_snapshot().escalated, 1);
    }

    #[test]
    fn repeated_ticks_collapse() {
        let mut s = RenderScheduler::new();
        s.mark_full();
        s.consume();
        for _ in 0..4 {
            s.mark_fields();
        }
        let d = s.consume().unwrap();
        assert_eq!(d, Decision {
            semantic: RenderDelta::Fields,
            effective: RenderDelta::Fields
        });
        let snap = s.metrics_snapshot();
        assert_eq!(snap.collapsed_fields, 3);
        assert_eq!(snap.full, 1);
        assert_eq!(snap.fields, 1);
        assert_eq!(snap.semantic_frames, 2);
    }
}
