//! Startup loading: layout documents from disk, icons from the icon dir.

use anyhow::{Context, Result};
use core_assets::{AssetError, IconResolver, preload_icons as preload};
use core_model::{LayoutSet, parse_layout};
use std::path::PathBuf;
use tracing::{debug, info};

/// Read and validate every document in order. Any failure is fatal and
/// names the offending file.
pub fn load_layouts(paths: &[PathBuf]) -> Result<LayoutSet> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading layout {}", path.display()))?;
        let doc =
            parse_layout(&json).with_context(|| format!("loading layout {}", path.display()))?;
        debug!(
            target: "model.layout",
            file = %path.display(),
            name = doc.name(),
            cells = doc.cells().len(),
            "layout_read_ok"
        );
        documents.push(doc);
    }
    let set = LayoutSet::new(documents).context("validating layout set")?;
    info!(target: "model.layout", layouts = set.len(), "layouts_loaded");
    Ok(set)
}

/// Terminal icons are never decoded; a readable regular file counts as
/// loaded and its path is the handle.
async fn locate_icon(dir: PathBuf, name: String) -> Result<PathBuf, AssetError> {
    let path = dir.join(&name);
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Ok(path),
        Ok(_) => Err(AssetError::missing(name, "not a regular file")),
        Err(err) => Err(AssetError::missing(name, err)),
    }
}

pub async fn preload_icons(dir: PathBuf, layouts: &LayoutSet) -> IconResolver<PathBuf> {
    let (resolver, report) =
        preload(layouts.icon_names(), |name| locate_icon(dir.clone(), name)).await;
    if !report.failed.is_empty() {
        debug!(target: "assets.icons", dir = %dir.display(), missing = ?report.failed, "icons_omitted");
    }
    resolver
}
