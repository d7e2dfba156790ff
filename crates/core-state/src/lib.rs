//! Mutable kiosk state: the layout navigator and the text value store.
//!
//! `KioskState` is the single owner of everything actions mutate. It is
//! constructed once at startup and passed by `&mut` to the dispatcher;
//! there is no ambient global state. Everything here is single-threaded;
//! a multi-threaded host must put the whole `KioskState` behind one mutex
//! because dispatch and the periodic redraw both touch it.
//!
//! Error policy: every fallible operation validates before mutating, so an
//! `Err` always leaves the previous state intact.

mod nav;
mod store;

pub use nav::LayoutNavigator;
pub use store::{BoundedHistory, TEXT_HISTORY_MAX, TextValueStore};

use core_model::LayoutSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// `goto_layout` named a layout that was never loaded. Recoverable.
    #[error("unknown layout `{0}`")]
    UnknownLayout(String),
    /// No layouts to navigate. Fatal at construction.
    #[error("no layouts loaded")]
    EmptyLayoutSet,
}

#[derive(Debug, Clone)]
pub struct KioskState {
    pub navigator: LayoutNavigator,
    pub store: TextValueStore,
}

impl KioskState {
    pub fn new(layouts: LayoutSet) -> Result<Self, StateError> {
        Ok(Self {
            navigator: LayoutNavigator::new(layouts)?,
            store: TextValueStore::new(),
        })
    }
}
