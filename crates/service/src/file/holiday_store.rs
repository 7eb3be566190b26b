use std::sync::Arc;

use chrono::NaiveDate;
use models::holiday::{format_date, parse_date, year_key, Holiday, HolidayDirectory};
use tracing::info;

use crate::directory::HolidayStore;
use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

/// File-backed holiday directory.
/// Keeps a map of `year -> [holiday]` persisted as JSON at a single path.
pub struct FileHolidayStore {
    store: Arc<JsonMapStore<String, Vec<Holiday>>>,
}

impl FileHolidayStore {
    /// Load the directory from the given file path. Creates the file if missing.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, Vec<Holiday>>::new(path).await?;
        let years = store.read(|dir: &HolidayDirectory| dir.len()).await;
        info!(path = %store.path().display(), years, "holiday directory loaded");
        Ok(Arc::new(Self { store }))
    }
}

#[async_trait::async_trait]
impl HolidayStore for FileHolidayStore {
    async fn year(&self, anio: i64) -> Option<Vec<Holiday>> {
        self.store.get(&year_key(anio)).await
    }

    async fn holiday_on(&self, date: NaiveDate) -> Option<Holiday> {
        let fecha = format_date(date);
        self.store
            .read(|dir: &HolidayDirectory| dir.values().flatten().find(|h| h.fecha == fecha).cloned())
            .await
    }

    async fn add(&self, anio: i64, fecha: &str, nombre: &str) -> Result<Holiday, ServiceError> {
        parse_date(fecha)?;
        let key = year_key(anio);
        let holiday = Holiday::new(fecha, nombre);

        self.store
            .update_map(|dir: &mut HolidayDirectory| {
                let list = dir.entry(key).or_default();
                if list.iter().any(|h| h.fecha == fecha) {
                    return Err(ServiceError::Duplicate(fecha.to_string()));
                }
                list.push(holiday.clone());
                Ok(())
            })
            .await?;

        info!(event = "holiday_added", anio, fecha, nombre, "holiday added");
        Ok(holiday)
    }

    async fn remove(&self, anio: i64, fecha: &str) -> Result<Holiday, ServiceError> {
        let key = year_key(anio);

        let removed = self
            .store
            .update_map(|dir: &mut HolidayDirectory| {
                let list = dir
                    .get_mut(&key)
                    .filter(|l| !l.is_empty())
                    .ok_or_else(|| ServiceError::YearNotFound(key.clone()))?;
                let removed = list
                    .iter()
                    .find(|h| h.fecha == fecha)
                    .cloned()
                    .ok_or_else(|| ServiceError::HolidayNotFound(fecha.to_string()))?;
                list.retain(|h| h.fecha != fecha);
                // an emptied year goes away so add+remove leaves no trace
                if list.is_empty() {
                    dir.shift_remove(&key);
                }
                Ok(removed)
            })
            .await?;

        info!(event = "holiday_removed", anio, fecha, "holiday removed");
        Ok(removed)
    }

    async fn count(&self) -> usize {
        self.store.read(|dir: &HolidayDirectory| dir.values().map(Vec::len).sum()).await
    }
}
