use crate::map_event;
use core_events::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOP_CHANNEL, ASYNC_INPUT_STOP_ERROR, ASYNC_INPUT_STOP_SIGNAL,
    ASYNC_INPUT_STOP_STREAM, CHANNEL_SEND_FAILURES, Event, InputEvent, POINTER_EVENTS,
};
use crossterm::event::{Event as CEvent, EventStream};
use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{Instrument, info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Spawn a Tokio task reading `EventStream` until shutdown, stream end or
/// channel closure.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = spawn_stream_task(sender, EventStream::new(), listener);
    (handle, shutdown)
}

/// Run the reader for `stream` on its own task inside the
/// `input_async_task` span.
fn spawn_stream_task<S>(
    sender: Sender<Event>,
    stream: S,
    listener: ShutdownListener,
) -> task::JoinHandle<()>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    let span = tracing::debug_span!(target: "input.thread", "input_async_task");
    task::spawn(
        AsyncEventStreamTask::new(sender, stream, listener)
            .run()
            .instrument(span),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    Running,
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Running => "running",
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
    exit_reason: ExitReason,
    stream_error: Option<io::ErrorKind>,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
            exit_reason: ExitReason::Running,
            stream_error: None,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        ASYNC_INPUT_STARTS.fetch_add(1, Ordering::Relaxed);
        self.exit_reason = ExitReason::StreamEnded;
        loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => {
                    self.exit_reason = ExitReason::ShutdownSignal;
                    break;
                }
                result = self.stream.next() => result,
            };

            let Some(result) = maybe_result else {
                break;
            };

            match result {
                Ok(raw) => {
                    let Some(input) = map_event(&raw) else {
                        continue;
                    };
                    match &input {
                        InputEvent::Pointer(p) => {
                            trace!(target: "input.event", kind = "pointer", x = p.x, y = p.y);
                            POINTER_EVENTS.fetch_add(1, Ordering::Relaxed);
                        }
                        InputEvent::Resize(w, h) => {
                            trace!(target: "input.event", kind = "resize", w, h);
                        }
                        InputEvent::Interrupt => {
                            trace!(target: "input.event", kind = "interrupt");
                        }
                    }
                    if !self.send_event(Event::Input(input)).await {
                        break;
                    }
                }
                Err(err) => {
                    self.exit_reason = ExitReason::StreamError;
                    self.stream_error = Some(err.kind());
                    break;
                }
            }
        }

        let reason = match self.exit_reason {
            ExitReason::Running => ExitReason::StreamEnded,
            other => other,
        };

        match reason {
            ExitReason::ShutdownSignal => {
                ASYNC_INPUT_STOP_SIGNAL.fetch_add(1, Ordering::Relaxed);
            }
            ExitReason::ChannelClosed => {
                ASYNC_INPUT_STOP_CHANNEL.fetch_add(1, Ordering::Relaxed);
            }
            ExitReason::StreamEnded => {
                ASYNC_INPUT_STOP_STREAM.fetch_add(1, Ordering::Relaxed);
            }
            ExitReason::StreamError => {
                ASYNC_INPUT_STOP_ERROR.fetch_add(1, Ordering::Relaxed);
            }
            ExitReason::Running => {}
        }

        if reason == ExitReason::StreamError {
            warn!(target: "input.thread", error_kind = ?self.stream_error, "async_input_task_stream_error");
        }

        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }

    async fn send_event(&mut self, event: Event) -> bool {
        match self.sender.send(event).await {
            Ok(_) => true,
            Err(_) => {
                CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                if !matches!(self.exit_reason, ExitReason::ShutdownSignal) {
                    self.exit_reason = ExitReason::ChannelClosed;
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::PointerEvent;
    use crossterm::event::{
        KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyModifiers as CMods, MouseButton,
        MouseEvent as CMouseEvent, MouseEventKind,
    };
    use std::sync::Mutex;
    use tokio::sync::{Mutex as TokioMutex, mpsc};
    use tokio::time::{Duration, timeout};
    use tokio_stream::wrappers::UnboundedReceiverStream;
    use tracing::field::{Field, Visit};
    use tracing::{Metadata, Subscriber, subscriber::Interest};
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::Registry;

    static LOG_CAPTURE_GUARD: TokioMutex<()> = TokioMutex::const_new(());

    #[derive(Clone, Default)]
    struct LogCapture {
        events: Arc<Mutex<Vec<CapturedLog>>>,
    }

    #[derive(Clone, Debug)]
    struct CapturedLog {
        target: String,
        fields: Vec<(String, String)>,
    }

    #[derive(Default)]
    struct LogVisitor {
        fields: Vec<(String, String)>,
    }

    impl Visit for LogVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    impl<S> Layer<S> for LogCapture
    where
        S: Subscriber,
    {
        fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
            Interest::always()
        }

        fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
            metadata.target().starts_with("input.")
        }

        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = LogVisitor::default();
            event.record(&mut visitor);
            self.events.lock().unwrap().push(CapturedLog {
                target: event.metadata().target().to_string(),
                fields: visitor.fields,
            });
        }
    }

    async fn run_scenario(events: Vec<CEvent>) -> Vec<Event> {
        let (tx, mut rx) = mpsc::channel(64);
        let stream = tokio_stream::iter(events.into_iter().map(Ok));
        let (_shutdown, listener) = ShutdownListener::new_pair();
        AsyncEventStreamTask::new(tx, stream, listener).run().await;

        let mut outputs = Vec::new();
        while let Some(evt) = rx.recv().await {
            outputs.push(evt);
        }
        outputs
    }

    fn left_press(column: u16, row: u16) -> CEvent {
        CEvent::Mouse(CMouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: CMods::NONE,
        })
    }

    #[tokio::test]
    async fn forwards_only_interesting_events() {
        let base_pointer = POINTER_EVENTS.load(Ordering::Relaxed);
        let outputs = run_scenario(vec![
            CEvent::FocusGained,
            left_press(4, 2),
            CEvent::Key(CKeyEvent::new(CKeyCode::Char('x'), CMods::NONE)),
            CEvent::Resize(100, 30),
            CEvent::Key(CKeyEvent::new(CKeyCode::Char('c'), CMods::CONTROL)),
        ])
        .await;

        assert_eq!(
            outputs,
            vec![
                Event::Input(InputEvent::Pointer(PointerEvent::new(4.5, 2.5))),
                Event::Input(InputEvent::Resize(100, 30)),
                Event::Input(InputEvent::Interrupt),
            ]
        );
        assert!(POINTER_EVENTS.load(Ordering::Relaxed) > base_pointer);
    }

    #[tokio::test]
    async fn stream_error_stops_task() {
        let base_error = ASYNC_INPUT_STOP_ERROR.load(Ordering::Relaxed);
        let (tx, mut rx) = mpsc::channel(8);
        let stream = tokio_stream::iter(vec![
            Ok(left_press(0, 0)),
            Err(io::Error::other("tty gone")),
            Ok(left_press(1, 1)),
        ]);
        let (_shutdown, listener) = ShutdownListener::new_pair();
        AsyncEventStreamTask::new(tx, stream, listener).run().await;

        assert!(matches!(
            rx.recv().await,
            Some(Event::Input(InputEvent::Pointer(_)))
        ));
        assert!(rx.recv().await.is_none());
        assert!(ASYNC_INPUT_STOP_ERROR.load(Ordering::Relaxed) > base_error);
    }

    #[tokio::test]
    async fn logs_startup_and_shutdown_reason_on_signal() {
        let _log_guard = LOG_CAPTURE_GUARD.lock().await;
        let capture = LogCapture::default();
        let events_handle = capture.events.clone();
        let subscriber = Registry::default().with(capture.with_filter(LevelFilter::TRACE));
        let dispatch = tracing::Dispatch::new(subscriber);
        let _guard = tracing::dispatcher::set_default(&dispatch);

        let base_start = ASYNC_INPUT_STARTS.load(Ordering::Relaxed);
        let base_signal = ASYNC_INPUT_STOP_SIGNAL.load(Ordering::Relaxed);

        let (tx, rx) = mpsc::channel(1);
        let (event_tx, event_rx) = mpsc::unbounded_channel::<io::Result<CEvent>>();
        let stream = UnboundedReceiverStream::new(event_rx);
        let (shutdown, listener) = ShutdownListener::new_pair();

        let notifier = shutdown.clone();
        let signal_task = tokio::spawn(async move {
            tokio::task::yield_now().await;
            notifier.signal();
        });

        let _keep_alive = event_tx;
        AsyncEventStreamTask::new(tx, stream, listener).run().await;
        signal_task.await.unwrap();
        drop(rx);

        let logged = events_handle.lock().unwrap();
        let has_message = |msg: &str| {
            logged.iter().any(|entry| {
                entry.target == "input.thread"
                    && entry
                        .fields
                        .iter()
                        .any(|(k, v)| k == "message" && v == msg)
            })
        };
        assert!(has_message("async_input_task_started"), "{:?}", *logged);
        assert!(has_message("async_input_task_stopped"), "{:?}", *logged);

        let reason = logged
            .iter()
            .flat_map(|entry| entry.fields.iter())
            .find(|(k, _)| k == "reason")
            .map(|(_, v)| v.trim_matches('"').to_string())
            .unwrap_or_default();
        assert_eq!(reason, "shutdown_signal");

        assert!(ASYNC_INPUT_STARTS.load(Ordering::Relaxed) > base_start);
        assert!(ASYNC_INPUT_STOP_SIGNAL.load(Ordering::Relaxed) > base_signal);
    }

    #[derive(Clone, Default)]
    struct SpanCapture {
        events: Arc<Mutex<Vec<(String, Option<String>)>>>,
    }

    impl<S> Layer<S> for SpanCapture
    where
        S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
            Interest::always()
        }

        fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
            let mut visitor = LogVisitor::default();
            event.record(&mut visitor);
            let message = visitor
                .fields
                .into_iter()
                .find(|(k, _)| k == "message")
                .map(|(_, v)| v)
                .unwrap_or_default();
            let span = ctx.event_span(event).map(|s| s.name().to_string());
            self.events.lock().unwrap().push((message, span));
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn spawned_task_logs_inside_its_span() {
        let _log_guard = LOG_CAPTURE_GUARD.lock().await;
        let capture = SpanCapture::default();
        let events_handle = capture.events.clone();
        let dispatch = tracing::Dispatch::new(Registry::default().with(capture));
        let _guard = tracing::dispatcher::set_default(&dispatch);

        let (tx, mut rx) = mpsc::channel(8);
        let stream = tokio_stream::iter(vec![Ok(left_press(2, 3))]);
        let (_shutdown, listener) = ShutdownListener::new_pair();
        spawn_stream_task(tx, stream, listener).await.unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(Event::Input(InputEvent::Pointer(_)))
        ));
        // Work on the loop's own task runs outside the reader's span.
        tracing::info!(target: "input.thread", "after_join");

        let logged = events_handle.lock().unwrap();
        let span_of = |msg: &str| {
            logged
                .iter()
                .find(|(m, _)| m == msg)
                .map(|(_, span)| span.clone())
        };
        assert_eq!(
            span_of("async_input_task_started"),
            Some(Some("input_async_task".to_string()))
        );
        assert_eq!(
            span_of("async_input_task_stopped"),
            Some(Some("input_async_task".to_string()))
        );
        assert_eq!(span_of("after_join"), Some(None));
    }

    #[tokio::test]
    async fn channel_closed_increments_telemetry() {
        let base_channel = ASYNC_INPUT_STOP_CHANNEL.load(Ordering::Relaxed);

        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let stream = tokio_stream::iter(vec![Ok(CEvent::Resize(10, 10))]);
        let (_shutdown, listener) = ShutdownListener::new_pair();

        AsyncEventStreamTask::new(tx, stream, listener).run().await;

        assert!(
            ASYNC_INPUT_STOP_CHANNEL.load(Ordering::Relaxed) > base_channel,
            "channel closed counter did not advance"
        );
    }

    #[tokio::test]
    async fn shutdown_signal_exits_immediately() {
        let (tx, mut rx) = mpsc::channel(1);
        let (event_tx, event_rx) = mpsc::unbounded_channel::<io::Result<CEvent>>();
        let stream = UnboundedReceiverStream::new(event_rx);
        let (shutdown, listener) = ShutdownListener::new_pair();

        let task = tokio::spawn(async move {
            let _keep_alive = event_tx;
            AsyncEventStreamTask::new(tx, stream, listener).run().await;
        });

        shutdown.signal();

        timeout(Duration::from_millis(50), task)
            .await
            .expect("shutdown should resolve promptly")
            .expect("task join failed");

        assert!(rx.recv().await.is_none());
    }
}
