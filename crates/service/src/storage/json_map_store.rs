use std::{
    hash::Hash,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::RwLock};
use tracing::{debug, info, warn};

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Keeps an insertion-ordered `IndexMap<K, V>` in memory and rewrites the whole
/// file on every mutation. Writes go to a sibling temp file that is synced and
/// then renamed over the target, so a crash leaves either the old or the new
/// document on disk, never a torn one.
///
/// Mutations are serialized: the write lock is held across mutate + persist,
/// and the live map is only replaced once the file write succeeded.
pub struct JsonMapStore<K, V> {
    inner: RwLock<IndexMap<K, V>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + Serialize + DeserializeOwned + Clone + Send + Sync,
    V: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Load the store from a path. Creates the file with an empty map if missing;
    /// refuses to start from a file it cannot parse.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }

        let map: IndexMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
                warn!(path = %file_path.display(), "store file is empty; starting with an empty map");
                IndexMap::new()
            }
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("cannot parse {}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty: IndexMap<K, V> = IndexMap::new();
                write_atomic(&file_path, &empty).await?;
                info!(path = %file_path.display(), "store file created");
                empty
            }
            Err(e) => {
                return Err(ServiceError::Storage(format!("cannot read {}: {e}", file_path.display())))
            }
        };

        debug!(path = %file_path.display(), entries = map.len(), "store loaded");
        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    /// Path used for both loading and persisting.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Run a read-only closure against a consistent snapshot.
    pub async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&IndexMap<K, V>) -> R,
    {
        let map = self.inner.read().await;
        f(&map)
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.read(|m| m.get(key).cloned()).await
    }

    /// Apply a mutation and persist the result.
    ///
    /// The closure works on a copy; an `Err` from it, or a failed write, leaves
    /// both memory and file untouched.
    pub async fn update_map<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut IndexMap<K, V>) -> Result<R, ServiceError>,
    {
        let mut guard = self.inner.write().await;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        write_atomic(&self.file_path, &next).await?;
        *guard = next;
        Ok(out)
    }
}

/// Serialize with a 4-space indent, keeping non-ASCII text verbatim.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

async fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), ServiceError> {
    let data = to_pretty_json(value).map_err(ServiceError::storage)?;
    let tmp = temp_path(path);

    let result: std::io::Result<()> = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, path).await
    }
    .await;

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp).await;
        return Err(ServiceError::Storage(format!("cannot write {}: {e}", path.display())));
    }
    // the new file is already in place; a failed directory sync only weakens durability
    if let Err(e) = sync_parent_dir(path).await {
        warn!(path = %path.display(), error = %e, "could not sync store directory after rename");
    }
    debug!(path = %path.display(), bytes = data.len(), "store persisted");
    Ok(())
}

/// fsync the directory holding `path` so the rename itself is durable.
async fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::File::open(dir).await?.sync_all().await
}
