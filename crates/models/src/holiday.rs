use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Canonical on-disk and on-wire date layout.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A non-trading day: `{"fecha": "YYYY-MM-DD", "nombre": "..."}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Holiday {
    pub fecha: String,
    pub nombre: String,
}

impl Holiday {
    pub fn new(fecha: impl Into<String>, nombre: impl Into<String>) -> Self {
        Self { fecha: fecha.into(), nombre: nombre.into() }
    }
}

/// Year key (`"2025"`) to that year's holidays, in file/insertion order.
pub type HolidayDirectory = IndexMap<String, Vec<Holiday>>;

/// Directory key for a year.
pub fn year_key(anio: i64) -> String {
    anio.to_string()
}

/// Year as written in a URL: an optional sign followed by digits.
///
/// `Ok(None)` means a well-formed integer too large for `i64`; the API never
/// stores such a year, so callers treat it as unknown.
pub fn parse_year(raw: &str) -> Result<Option<i64>, ModelError> {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModelError::InvalidYear(raw.to_string()));
    }
    Ok(raw.parse::<i64>().ok())
}

/// Strict `YYYY-MM-DD`: ten characters, zero padded, and a real calendar day.
pub fn parse_date(fecha: &str) -> Result<NaiveDate, ModelError> {
    let bytes = fecha.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
    if !shape_ok {
        return Err(ModelError::InvalidDate(fecha.to_string()));
    }
    NaiveDate::parse_from_str(fecha, DATE_FORMAT).map_err(|_| ModelError::InvalidDate(fecha.to_string()))
}

/// Render a date the way it is stored.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
