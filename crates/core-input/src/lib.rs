//! Async input service: terminal events → kiosk input events.
//!
//! Only three things matter to a kiosk: a primary press (pointer), a
//! resize, and a way out. Everything else the terminal reports is dropped
//! here so the event loop never sees it.

mod async_service;
pub use async_service::AsyncInputShutdown;

use async_service::spawn_async_event_task;

use core_events::{Event, InputEvent, PointerEvent};
use crossterm::event::{
    Event as CEvent, KeyCode as CKeyCode, KeyEventKind as CKind, KeyModifiers as CMods,
    MouseButton as CButton, MouseEventKind as CMouseKind,
};
use tokio::task::JoinHandle;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}

/// Translate one terminal event. `None` means "not interesting".
///
/// A left press at cell `(column, row)` becomes a pointer at the cell
/// centre, so it lands inside whichever projected rectangle covers that
/// cell rather than on a shared edge.
pub fn map_event(event: &CEvent) -> Option<InputEvent> {
    match event {
        CEvent::Mouse(m) if m.kind == CMouseKind::Down(CButton::Left) => Some(
            InputEvent::Pointer(PointerEvent::new(
                f32::from(m.column) + 0.5,
                f32::from(m.row) + 0.5,
            )),
        ),
        CEvent::Resize(w, h) => Some(InputEvent::Resize(*w, *h)),
        CEvent::Key(k) if k.kind == CKind::Press => {
            let ctrl_c =
                matches!(k.code, CKeyCode::Char('c')) && k.modifiers.contains(CMods::CONTROL);
            (ctrl_c || k.code == CKeyCode::Esc).then_some(InputEvent::Interrupt)
        }
        _ => None,
    }
}
