use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::{fs, path::Path};

pub mod cache;
pub mod recents;

pub use cache::{CACHE_TTL_MILLIS, CacheEntry, SessionCache};
pub use recents::{MAX_RECENT_SEARCHES, RecentSearches};

/// Read a JSON record from `path`. A missing, unreadable, or malformed
/// file is a miss; malformed files are logged and removed.
fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to read store file");
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "discarding malformed store file");
            let _ = fs::remove_file(path);
            None
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create store directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string(value).context("Failed to serialize store record")?;

    fs::write(path, json)
        .with_context(|| format!("Failed to write store file: {}", path.display()))?;

    Ok(())
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
