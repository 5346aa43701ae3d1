//! Load source from disk, save source to disk.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::consts::DEFAULT_SAVE_NAME;
use crate::session::Session;

/// Replace the session's source with the contents of `path`.
/// Returns the number of bytes loaded.
pub async fn load_into(session: &Session, path: &Path) -> Result<usize> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let len = text.len();
    session.set_code(text);
    info!(path = %path.display(), bytes = len, "loaded source");
    Ok(len)
}

/// Write the persisted source to `name`, or to [`DEFAULT_SAVE_NAME`] when
/// `name` is blank. Returns the path written.
pub async fn save_from(session: &Session, name: &str) -> Result<PathBuf> {
    let path = save_path(name);
    let code = session.saved_code();
    tokio::fs::write(&path, code.as_bytes())
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = code.len(), "saved source");
    Ok(path)
}

fn save_path(name: &str) -> PathBuf {
    let name = name.trim();
    if name.is_empty() {
        PathBuf::from(DEFAULT_SAVE_NAME)
    } else {
        PathBuf::from(name)
    }
}
