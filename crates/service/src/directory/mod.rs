//! Holiday directory abstraction.
//!
//! Handlers talk to a `HolidayStore`; the file-backed implementation lives in
//! `crate::file::holiday_store`.

use async_trait::async_trait;
use chrono::NaiveDate;
use models::holiday::Holiday;

use crate::errors::ServiceError;

#[async_trait]
pub trait HolidayStore: Send + Sync {
    /// Holidays of a year in insertion order, `None` when the year is unknown.
    async fn year(&self, anio: i64) -> Option<Vec<Holiday>>;

    /// First stored holiday falling on `date`, scanning years in order.
    async fn holiday_on(&self, date: NaiveDate) -> Option<Holiday>;

    /// Validate and append a holiday to `anio`, then persist.
    async fn add(&self, anio: i64, fecha: &str, nombre: &str) -> Result<Holiday, ServiceError>;

    /// Remove the holiday on `fecha` from `anio`, then persist. Returns the removed entry.
    async fn remove(&self, anio: i64, fecha: &str) -> Result<Holiday, ServiceError>;

    /// Total number of stored holidays across all years.
    async fn count(&self) -> usize;
}
