#![cfg(test)]
use std::path::PathBuf;

/// Unique path under the system temp dir; nothing is created on disk.
pub fn temp_data_file(prefix: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("{}_{}", prefix, uuid::Uuid::new_v4()))
        .join("feriados.json")
}

/// Best-effort removal of the directory created for a `temp_data_file` path.
pub async fn cleanup(path: &std::path::Path) {
    if let Some(dir) = path.parent() {
        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}
