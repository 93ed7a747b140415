//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Subdirectories of the upload root that receive image files.
pub const UPLOAD_SUBDIRS: [&str; 2] = ["thumbnails", "galleries"];

/// Ensure the upload tree and the data directory exist.
pub async fn ensure_env(upload_root: &str, data_dir: &str) -> anyhow::Result<()> {
    for sub in UPLOAD_SUBDIRS {
        let dir = format!("{upload_root}/{sub}");
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {dir}: {e}"))?;
    }
    if tokio::fs::metadata(data_dir).await.is_err() {
        warn!(%data_dir, "data directory missing; creating it");
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    Ok(())
}
