//! Engine level scenarios: draw, click, dispatch and refresh the way a
//! host drives them.

use core_actions::{ActionObserver, DispatchResult, KioskEngine};
use core_assets::IconResolver;
use core_model::{Action, CellSpec, LayoutDocument, LayoutSet, parse_layout};
use core_render::{DrawCommand, FrameStyle, Point};
use core_text::CharCount;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

const MAIN: &str = r#"{
    "name": "main",
    "rows": 2,
    "cols": 2,
    "buttons": [
        { "row": 0, "col": 0, "span": 2, "type": "text", "id": "log", "text": "Welcome" },
        { "row": 1, "col": 0, "text": "Hello", "action": "append_text", "target": "log", "message": "hello" },
        { "row": 1, "col": 1, "text": "Next", "icon": "next.png", "action": "next_layout" }
    ]
}"#;

const SCENARIO: &str = r#"{
    "name": "scenario",
    "rows": 1,
    "cols": 3,
    "buttons": [
        { "row": 0, "col": 0, "text": "Back", "action": "prev_layout" },
        { "row": 0, "col": 1, "text": "Lost", "action": "goto_layout", "target": "nowhere" },
        { "row": 0, "col": 2, "text": "Bye", "action": "quit" }
    ]
}"#;

fn engine() -> KioskEngine {
    let set = LayoutSet::new(vec![parse_layout(MAIN).unwrap(), parse_layout(SCENARIO).unwrap()])
        .unwrap();
    KioskEngine::new(set, 100.0, 100.0).unwrap()
}

fn no_icons() -> IconResolver<()> {
    IconResolver::new()
}

fn append(message: &str) -> Action {
    Action::AppendText {
        target: "log".into(),
        message: message.into(),
    }
}

#[test]
fn seeding_then_append_then_eviction() {
    let mut e = engine();
    e.draw(&no_icons(), &CharCount, &FrameStyle::default());
    assert_eq!(e.store().get("log"), vec!["Welcome"]);

    assert!(e.dispatch(&append("hello")).unwrap().dirty);
    assert_eq!(e.store().get("log"), vec!["Welcome", "hello"]);

    for i in 1..=16 {
        e.dispatch(&append(&format!("m{i}"))).unwrap();
    }
    let log = e.store().get("log");
    assert_eq!(log.len(), 15);
    assert_eq!(log[0], "m2");
    assert_eq!(log[14], "m16");
}

#[test]
fn redraw_does_not_reseed_after_update() {
    let mut e = engine();
    e.draw(&no_icons(), &CharCount, &FrameStyle::default());
    e.dispatch(&Action::UpdateText {
        target: "log".into(),
        message: "fresh".into(),
    })
    .unwrap();
    e.draw(&no_icons(), &CharCount, &FrameStyle::default());
    assert_eq!(e.store().get("log"), vec!["fresh"]);
}

#[test]
fn click_routes_through_hit_test() {
    let mut e = engine();
    e.draw(&no_icons(), &CharCount, &FrameStyle::default());

    // Bottom-left is the Hello button.
    assert_eq!(e.click(Point::new(25.0, 75.0)), DispatchResult::dirty());
    assert_eq!(e.store().get("log"), vec!["Welcome", "hello"]);

    // The text field is not interactive.
    assert_eq!(e.click(Point::new(50.0, 25.0)), DispatchResult::clean());
    // Outside the canvas.
    assert_eq!(e.click(Point::new(150.0, 25.0)), DispatchResult::clean());

    // Next moves to `scenario`; geometry is stale until the next draw.
    assert!(e.click(Point::new(75.0, 75.0)).dirty);
    assert_eq!(e.current_layout().name(), "scenario");
    assert_eq!(e.placed().len(), 3);
    assert!(e.placed()[0].spec.is_text_field());

    let frame = e.draw(&no_icons(), &CharCount, &FrameStyle::default());
    assert_eq!(frame.layout, "scenario");
    assert_eq!(frame.cells.len(), 3);
    assert!(!e.placed()[0].spec.is_text_field());
}

struct Recorder(Arc<Mutex<Vec<&'static str>>>);

impl ActionObserver for Recorder {
    fn on_action(&self, action: &Action) {
        self.0.lock().unwrap().push(action.wire_name());
    }
}

#[test]
fn observers_see_clicked_actions_only() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut e = engine();
    e.add_observer(Box::new(Recorder(seen.clone())));
    e.draw(&no_icons(), &CharCount, &FrameStyle::default());

    e.click(Point::new(25.0, 75.0));
    // Text fields and misses never reach the dispatcher.
    e.click(Point::new(50.0, 25.0));
    e.click(Point::new(150.0, 25.0));
    e.click(Point::new(75.0, 75.0));

    assert_eq!(*seen.lock().unwrap(), vec!["append_text", "next_layout"]);
}

#[test]
fn quit_click_reports_quit_and_keeps_state() {
    let mut e = engine();
    e.dispatch(&Action::NextLayout).unwrap();
    e.draw(&no_icons(), &CharCount, &FrameStyle::default());
    let r = e.click(Point::new(90.0, 50.0));
    assert!(r.quit);
    assert_eq!(e.current_layout().name(), "scenario");
}

#[test]
fn cyclic_navigation_returns_home() {
    let mut e = engine();
    for _ in 0..e.state().navigator.len() {
        e.dispatch(&Action::NextLayout).unwrap();
    }
    assert_eq!(e.current_layout().name(), "main");
    for _ in 0..e.state().navigator.len() {
        e.dispatch(&Action::PrevLayout).unwrap();
    }
    assert_eq!(e.current_layout().name(), "main");
}

#[test]
fn resize_reprojects_on_next_draw() {
    let mut e = engine();
    e.draw(&no_icons(), &CharCount, &FrameStyle::default());
    assert_eq!(e.placed()[0].rect.w, 100.0);
    e.resize(80.0, 24.0);
    assert_eq!(e.canvas_size(), (80.0, 24.0));
    e.draw(&no_icons(), &CharCount, &FrameStyle::default());
    assert_eq!(e.placed()[0].rect.w, 80.0);
    assert_eq!(e.placed()[2].rect.y, 12.0);
}

#[test]
fn field_refresh_is_idempotent_and_tracks_store() {
    let mut e = engine();
    let style = FrameStyle::terminal();
    e.resize(40.0, 20.0);
    e.draw(&no_icons(), &CharCount, &style);

    let first = e.redraw_fields(&CharCount, &style);
    assert_eq!(first, e.redraw_fields(&CharCount, &style));
    assert!(first.iter().all(|c| match c {
        DrawCommand::FillRect { rect, .. } | DrawCommand::StrokeRect { rect, .. } =>
            *rect == e.placed()[0].rect,
        _ => true,
    }));

    e.dispatch(&append("hello")).unwrap();
    let texts: Vec<String> = e
        .redraw_fields(&CharCount, &style)
        .into_iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["Welcome", "hello"]);
}

#[test]
fn icon_drawn_only_when_resolved() {
    let mut e = engine();
    let frame = e.draw(&no_icons(), &CharCount, &FrameStyle::default());
    assert!(!frame.commands.iter().any(|c| matches!(c, DrawCommand::Icon { .. })));

    let mut icons = IconResolver::new();
    icons.insert("next.png", ());
    let frame = e.draw(&icons, &CharCount, &FrameStyle::default());
    let icon_rects: Vec<_> = frame
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Icon { name, rect } => Some((name.as_str(), *rect)),
            _ => None,
        })
        .collect();
    assert_eq!(icon_rects.len(), 1);
    assert_eq!(icon_rects[0].0, "next.png");
}

#[test]
fn empty_layout_set_is_rejected() {
    let err = KioskEngine::new(LayoutSet::new(Vec::new()).unwrap(), 10.0, 10.0).unwrap_err();
    assert_eq!(err, core_state::StateError::EmptyLayoutSet);
}

#[test]
fn text_field_with_no_label_seeds_empty_line() {
    let doc = LayoutDocument::new("m", 1, 1, vec![CellSpec::text_field(0, 0, "f")]).unwrap();
    let mut e = KioskEngine::new(LayoutSet::new(vec![doc]).unwrap(), 10.0, 10.0).unwrap();
    e.draw(&no_icons(), &CharCount, &FrameStyle::terminal());
    assert_eq!(e.store().get("f"), vec![""]);
}

#[derive(Clone)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

#[test]
fn unknown_goto_click_warns_and_is_clean() {
    let mut e = engine();
    e.dispatch(&Action::NextLayout).unwrap();
    e.draw(&no_icons(), &CharCount, &FrameStyle::default());

    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(BufferWriter {
            inner: buffer.clone(),
        })
        .finish();

    let result = with_default(subscriber, || e.click(Point::new(50.0, 50.0)));
    assert_eq!(result, DispatchResult::clean());
    assert_eq!(e.current_layout().name(), "scenario");

    let log = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    assert!(log.contains("WARN actions.dispatch:"), "{log}");
    assert!(log.contains("action_failed"));
    assert!(log.contains("goto_unknown_layout"));
}
