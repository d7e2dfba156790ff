//! Icon lookup for button rendering.
//!
//! Loading is out of band: the host supplies an async loader per icon name,
//! [`preload_icons`] runs them concurrently and keeps whatever succeeded.
//! Failures are logged and simply absent from the resolver, which callers
//! observe as `resolve(name) == None` and render the label-only layout.
//! The resolver itself never blocks and never loads anything.

use futures::future::join_all;
use std::collections::HashMap;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// Icon could not be loaded. Recovered by omitting the glyph.
    #[error("icon `{name}` unavailable: {reason}")]
    MissingIcon { name: String, reason: String },
}

impl AssetError {
    pub fn missing(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::MissingIcon {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Name → loaded image handle. `H` is whatever the painting surface needs.
#[derive(Debug, Clone)]
pub struct IconResolver<H> {
    icons: HashMap<String, H>,
}

impl<H> Default for IconResolver<H> {
    fn default() -> Self {
        Self {
            icons: HashMap::new(),
        }
    }
}

impl<H> IconResolver<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, handle: H) {
        self.icons.insert(name.into(), handle);
    }

    /// Handle for `name`, or `None` if it was never loaded or failed.
    pub fn resolve(&self, name: &str) -> Option<&H> {
        self.icons.get(name)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl<H> FromIterator<(String, H)> for IconResolver<H> {
    fn from_iter<I: IntoIterator<Item = (String, H)>>(iter: I) -> Self {
        Self {
            icons: iter.into_iter().collect(),
        }
    }
}

/// Per-icon outcome of a preload pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadReport {
    pub loaded: usize,
    pub failed: Vec<String>,
}

/// Run `load` for every name concurrently and collect the successes.
///
/// Never fails as a whole: individual failures are logged at `warn` and
/// listed in the report.
pub async fn preload_icons<H, I, F, Fut>(names: I, load: F) -> (IconResolver<H>, PreloadReport)
where
    I: IntoIterator<Item = String>,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<H, AssetError>>,
{
    let pending = names.into_iter().map(|name| {
        let fut = load(name.clone());
        async move { (name, fut.await) }
    });
    let outcomes = join_all(pending).await;

    let mut resolver = IconResolver::new();
    let mut report = PreloadReport::default();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(handle) => {
                debug!(target: "assets.icons", icon = name.as_str(), "icon_loaded");
                resolver.insert(name, handle);
                report.loaded += 1;
            }
            Err(err) => {
                warn!(target: "assets.icons", icon = name.as_str(), %err, "icon_load_failed");
                report.failed.push(name);
            }
        }
    }
    info!(
        target: "assets.icons",
        loaded = report.loaded,
        failed = report.failed.len(),
        "icon_preload_complete"
    );
    (resolver, report)
}
