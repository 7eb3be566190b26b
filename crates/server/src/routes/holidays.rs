use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use models::holiday::{format_date, parse_year, Holiday};
use serde::{Deserialize, Serialize};
use service::errors::ServiceError;
use tracing::debug;
use utoipa::IntoParams;

use crate::errors::ApiError;
use crate::metrics;
use crate::state::ServerState;

pub const MSG_NO_DATA: &str = "No hay datos de feriados para este año";
pub const MSG_MISSING_PARAMS: &str = "Faltan parámetros: anio, fecha y nombre son obligatorios.";

/// Response of `GET /feriados/{anio}`. A missing year is still a 200.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum YearLookup {
    Found { anio: i64, feriados: Vec<Holiday> },
    Missing { error: &'static str },
}

#[derive(Debug, Serialize)]
pub struct TodayStatus {
    pub hoy: String,
    pub es_feriado: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub mensaje: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AddHolidayParams {
    pub anio: i64,
    /// `YYYY-MM-DD`
    pub fecha: String,
    pub nombre: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RemoveHolidayParams {
    pub anio: i64,
    pub fecha: String,
}

/// Query string wins; a JSON body with the same fields is the fallback.
fn params_from<T>(query: Option<Query<T>>, body: Option<Json<T>>) -> Result<T, ApiError> {
    query
        .map(|Query(q)| q)
        .or_else(|| body.map(|Json(b)| b))
        .ok_or_else(|| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, MSG_MISSING_PARAMS))
}

/// Holidays of one year
#[utoipa::path(
    get,
    path = "/feriados/{anio}",
    tag = "feriados",
    params(("anio" = i64, Path, description = "Year, e.g. 2025")),
    responses(
        (status = 200, description = "Holidays of the year, or an error payload when the year is unknown", body = crate::openapi::YearHolidaysDoc),
        (status = 400, description = "The path segment is not an integer")
    )
)]
pub async fn get_holidays(
    State(state): State<ServerState>,
    Path(raw): Path<String>,
) -> Result<Json<YearLookup>, ApiError> {
    let anio = parse_year(&raw).map_err(ServiceError::from)?;
    let found = match anio {
        Some(anio) => state.store.year(anio).await.map(|feriados| YearLookup::Found { anio, feriados }),
        None => None,
    };
    Ok(Json(found.unwrap_or_else(|| {
        debug!(anio = %raw, "no holidays stored for year");
        YearLookup::Missing { error: MSG_NO_DATA }
    })))
}

/// Whether today (server local date) is a stored holiday
#[utoipa::path(
    get,
    path = "/es_feriado_hoy",
    tag = "feriados",
    responses((status = 200, description = "Today's status", body = crate::openapi::TodayStatusDoc))
)]
pub async fn is_holiday_today(State(state): State<ServerState>) -> Json<TodayStatus> {
    let today = Local::now().date_naive();
    let hit = state.store.holiday_on(today).await;
    Json(TodayStatus {
        hoy: format_date(today),
        es_feriado: hit.is_some(),
        nombre: hit.map(|h| h.nombre),
    })
}

#[utoipa::path(
    post,
    path = "/feriados/agregar/",
    tag = "feriados",
    params(AddHolidayParams),
    responses(
        (status = 200, description = "Added", body = crate::openapi::MessageDoc),
        (status = 400, description = "Invalid date format or duplicate"),
        (status = 403, description = "Missing or invalid X-API-Key")
    ),
    security(("api_key" = []))
)]
pub async fn add_holiday(
    State(state): State<ServerState>,
    query: Option<Query<AddHolidayParams>>,
    body: Option<Json<AddHolidayParams>>,
) -> Result<Json<Message>, ApiError> {
    let p = params_from(query, body)?;
    let added = state.store.add(p.anio, &p.fecha, &p.nombre).await?;
    metrics::HOLIDAYS_ADDED_TOTAL.inc();
    metrics::set_holiday_count(state.store.count().await);
    Ok(Json(Message {
        mensaje: format!("Feriado '{}' agregado correctamente el {}.", added.nombre, added.fecha),
    }))
}

#[utoipa::path(
    delete,
    path = "/feriados/eliminar/",
    tag = "feriados",
    params(RemoveHolidayParams),
    responses(
        (status = 200, description = "Removed", body = crate::openapi::MessageDoc),
        (status = 404, description = "Year or holiday not found"),
        (status = 403, description = "Missing or invalid X-API-Key")
    ),
    security(("api_key" = []))
)]
pub async fn remove_holiday(
    State(state): State<ServerState>,
    query: Option<Query<RemoveHolidayParams>>,
    body: Option<Json<RemoveHolidayParams>>,
) -> Result<Json<Message>, ApiError> {
    let p = params_from(query, body)?;
    let removed = state.store.remove(p.anio, &p.fecha).await?;
    metrics::HOLIDAYS_REMOVED_TOTAL.inc();
    metrics::set_holiday_count(state.store.count().await);
    Ok(Json(Message {
        mensaje: format!("Feriado del {} eliminado correctamente.", removed.fecha),
    }))
}
