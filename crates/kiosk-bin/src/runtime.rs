//! Event loop: pointer presses drive the engine, ticks refresh text
//! fields, the scheduler decides how much of the raster to repaint.

use anyhow::Result;
use core_actions::{Action, ActionObserver, KioskEngine};
use core_assets::IconResolver;
use core_events::{Event, InputEvent, TickCancel};
use core_model::LayoutSet;
use core_render::{Decision, FrameStyle, Point, RenderDelta, RenderScheduler};
use core_terminal::{Raster, TerminalCapabilities};
use core_text::DisplayWidth;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, trace, warn};

/// Everything startup resolved before the loop begins.
pub struct RuntimeParts {
    pub layouts: LayoutSet,
    pub icons: IconResolver<PathBuf>,
    pub style: FrameStyle,
    /// Canvas size in (columns, rows).
    pub size: (u16, u16),
    pub caps: TerminalCapabilities,
    pub quit_message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    ActionQuit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Interrupt => "interrupt",
            ShutdownReason::ActionQuit => "action_quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

#[inline]
fn log_render_decision(decision: &Decision) {
    debug!(
        target: "render.scheduler",
        semantic = ?decision.semantic,
        effective = ?decision.effective,
        "render_decision"
    );
}

/// Counts dispatched actions for the shutdown summary.
#[derive(Debug, Clone, Default)]
struct ActionTally {
    count: Arc<AtomicU64>,
}

impl ActionTally {
    fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl ActionObserver for ActionTally {
    fn on_action(&self, action: &Action) {
        self.count.fetch_add(1, Ordering::Relaxed);
        trace!(target: "runtime", action = action.wire_name(), "action_observed");
    }
}

enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

pub struct KioskRuntime<W: Write> {
    engine: KioskEngine,
    icons: IconResolver<PathBuf>,
    style: FrameStyle,
    raster: Raster,
    caps: TerminalCapabilities,
    out: W,
    scheduler: RenderScheduler,
    quit_message: String,
    actions: ActionTally,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<JoinHandle<()>>,
    tick_cancel: Option<TickCancel>,
    input_task: Option<JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
}

impl<W: Write> KioskRuntime<W> {
    pub fn new(
        parts: RuntimeParts,
        out: W,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
    ) -> Result<Self> {
        let RuntimeParts {
            layouts,
            icons,
            style,
            size: (width, height),
            caps,
            quit_message,
        } = parts;
        let mut engine = KioskEngine::new(layouts, f32::from(width), f32::from(height))?;
        let actions = ActionTally::default();
        engine.add_observer(Box::new(actions.clone()));
        Ok(Self {
            engine,
            icons,
            style,
            raster: Raster::new(width, height),
            caps,
            out,
            scheduler: RenderScheduler::new(),
            quit_message,
            actions,
            rx,
            tx: Some(tx),
            source_handles: Vec::new(),
            tick_cancel: None,
            input_task: None,
            input_shutdown: None,
        })
    }

    pub fn with_tasks(mut self, handles: Vec<JoinHandle<()>>, tick: Option<TickCancel>) -> Self {
        self.source_handles = handles;
        self.tick_cancel = tick;
        self
    }

    pub fn with_input(
        mut self,
        task: JoinHandle<()>,
        shutdown: core_input::AsyncInputShutdown,
    ) -> Self {
        self.input_task = Some(task);
        self.input_shutdown = Some(shutdown);
        self
    }

    pub async fn run(&mut self) -> Result<ShutdownReason> {
        self.scheduler.mark_full();
        self.render();

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let shutdown_reason = self.event_loop().instrument(loop_span).await;

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(shutdown_reason)
    }

    async fn event_loop(&mut self) -> ShutdownReason {
        while let Some(event) = self.rx.recv().await {
            let control = match &event {
                Event::Input(input) => self.handle_input_event(input),
                Event::Tick => {
                    self.scheduler.mark(RenderDelta::Fields);
                    LoopControl::Continue
                }
                Event::Shutdown => LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                },
            };
            match control {
                LoopControl::Break { reason } => return reason,
                LoopControl::Continue => self.render(),
            }
        }
        ShutdownReason::ChannelClosed
    }

    fn handle_input_event(&mut self, input: &InputEvent) -> LoopControl {
        match input {
            InputEvent::Pointer(p) => {
                let result = self.engine.click(Point::new(p.x, p.y));
                trace!(
                    target: "runtime",
                    x = p.x,
                    y = p.y,
                    dirty = result.dirty,
                    quit = result.quit,
                    "pointer"
                );
                if result.quit {
                    info!(
                        target: "runtime",
                        message_len = self.quit_message.len(),
                        "quit_requested"
                    );
                    return LoopControl::Break {
                        reason: ShutdownReason::ActionQuit,
                    };
                }
                if result.dirty {
                    self.scheduler.mark_full();
                }
                LoopControl::Continue
            }
            InputEvent::Resize(w, h) => {
                self.engine.resize(f32::from(*w), f32::from(*h));
                self.raster.resize(*w, *h);
                self.scheduler.mark_full();
                LoopControl::Continue
            }
            InputEvent::Interrupt => LoopControl::Break {
                reason: ShutdownReason::Interrupt,
            },
        }
    }

    fn render(&mut self) {
        let Some(decision) = self.scheduler.consume() else {
            return;
        };
        log_render_decision(&decision);
        match decision.effective {
            RenderDelta::Full => {
                self.raster.clear();
                let frame = self.engine.draw(&self.icons, &DisplayWidth, &self.style);
                debug!(
                    target: "render.engine",
                    layout = frame.layout.as_str(),
                    commands = frame.commands.len(),
                    "full_frame"
                );
                self.raster.paint(&frame.commands);
            }
            RenderDelta::Fields => {
                let commands = self.engine.redraw_fields(&DisplayWidth, &self.style);
                self.raster.paint(&commands);
            }
        }
        if let Err(e) = self.raster.flush(&mut self.out, self.caps) {
            error!(target: "render.engine", ?e, "flush_error");
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        if let Some(tick) = self.tick_cancel.take() {
            tick.cancel();
        }
        if let Some(tx) = self.tx.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "dropping_runtime_sender"
            );
            drop(tx);
        }

        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_stopped"
                ),
                Ok(Err(err)) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_cancelled"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "event_source_task_error"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_timeout"
                ),
            }
        }

        if let Some(shutdown) = self.input_shutdown.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_shutdown_signal"
            );
            shutdown.signal();
        }

        if let Some(handle) = self.input_task.take() {
            match handle.await {
                Ok(_) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_joined"
                ),
                Err(err) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_cancelled"
                ),
                Err(err) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "input_task_join_failed"
                ),
            }
        }

        info!(
            target: "runtime.shutdown",
            reason = reason.as_str(),
            actions = self.actions.count(),
            "session_summary"
        );
        log_shutdown_stage(reason, "complete");
    }

    #[cfg(test)]
    fn engine(&self) -> &KioskEngine {
        &self.engine
    }

    #[cfg(test)]
    fn raster(&self) -> &Raster {
        &self.raster
    }

    #[cfg(test)]
    fn render_metrics(&self) -> core_render::scheduler::RenderDeltaMetricsSnapshot {
        self.scheduler.metrics_snapshot()
    }
}
