//! Dispatcher applying `Action` to mutable kiosk state.
//!
//! Split by concern:
//! * `layout` - navigator transitions (next / prev / goto)
//! * `text`   - text value store mutation (update / append)
//!
//! `Quit` is handled inline: it mutates nothing and only raises the `quit`
//! flag so the host can confirm and wind down.
//!
//! Every handler validates before mutating. An `Err` therefore means the
//! state is exactly what it was before the call.

use crate::{Action, ActionObserver};
use core_state::{KioskState, StateError};
use tracing::debug;

mod layout;
mod text;

/// Outcome of dispatching a single `Action`.
///
/// `dirty` asks the host to re-project and repaint; the dispatcher itself
/// never renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: false,
            quit: true,
        }
    }
}

/// Apply `action` to `state`.
///
/// Errors are recoverable (`UnknownLayout`) and leave `state` untouched.
pub fn dispatch(
    action: &Action,
    state: &mut KioskState,
    observers: &[Box<dyn ActionObserver>],
) -> Result<DispatchResult, StateError> {
    for obs in observers {
        obs.on_action(action);
    }
    debug!(target: "actions.dispatch", %action, "dispatch");

    match action {
        Action::NextLayout => Ok(layout::handle_next(&mut state.navigator)),
        Action::PrevLayout => Ok(layout::handle_prev(&mut state.navigator)),
        Action::GotoLayout { target } => layout::handle_goto(&mut state.navigator, target),
        Action::UpdateText { target, message } => {
            Ok(text::handle_update(&mut state.store, target, message))
        }
        Action::AppendText { target, message } => {
            Ok(text::handle_append(&mut state.store, target, message))
        }
        Action::Quit => Ok(DispatchResult::quit()),
    }
}
