//! Navigator transitions.

use super::DispatchResult;
use core_state::{LayoutNavigator, StateError};
use tracing::trace;

pub(crate) fn handle_next(nav: &mut LayoutNavigator) -> DispatchResult {
    let now = nav.next();
    trace!(target: "actions.dispatch", op = "next_layout", layout = now, "navigate");
    DispatchResult::dirty()
}

pub(crate) fn handle_prev(nav: &mut LayoutNavigator) -> DispatchResult {
    let now = nav.prev();
    trace!(target: "actions.dispatch", op = "prev_layout", layout = now, "navigate");
    DispatchResult::dirty()
}

pub(crate) fn handle_goto(
    nav: &mut LayoutNavigator,
    target: &str,
) -> Result<DispatchResult, StateError> {
    let now = nav.goto(target)?;
    trace!(target: "actions.dispatch", op = "goto_layout", layout = now, "navigate");
    Ok(DispatchResult::dirty())
}
