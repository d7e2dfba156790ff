//! Interaction dispatcher and the engine facade hosts drive.
//!
//! - `hit`: point → first placed cell containing it.
//! - `dispatcher`: applies an [`Action`] to [`KioskState`] and reports
//!   whether a re-projection is needed. It never renders.
//! - `engine`: [`KioskEngine`] ties state, canvas size and the last
//!   projected geometry together so a host only forwards pointer events
//!   and asks for frames.
//!
//! [`KioskState`]: core_state::KioskState

mod dispatcher;
mod engine;
mod hit;

pub use core_model::Action;
pub use dispatcher::{DispatchResult, dispatch};
pub use engine::KioskEngine;
pub use hit::hit_test;

/// Hook notified before every dispatched action.
pub trait ActionObserver: Send + Sync {
    fn on_action(&self, action: &Action);
}
