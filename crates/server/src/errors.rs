use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use tracing::error;

pub const MSG_FORBIDDEN: &str = "Acceso denegado: API Key inválida.";
pub const MSG_INVALID_DATE: &str = "Formato de fecha inválido. Usa YYYY-MM-DD.";
pub const MSG_INVALID_YEAR: &str = "Año inválido: debe ser un número entero.";
pub const MSG_DUPLICATE: &str = "El feriado ya existe.";
pub const MSG_YEAR_NOT_FOUND: &str = "No hay feriados para este año.";
pub const MSG_HOLIDAY_NOT_FOUND: &str = "El feriado no existe.";
pub const MSG_STORAGE: &str = "No se pudo guardar el archivo de feriados.";

/// Request-time error rendered as `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, MSG_FORBIDDEN)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"detail": self.detail}))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InvalidFormat(_) => Self::new(StatusCode::BAD_REQUEST, MSG_INVALID_DATE),
            ServiceError::InvalidYear(_) => Self::new(StatusCode::BAD_REQUEST, MSG_INVALID_YEAR),
            ServiceError::Duplicate(_) => Self::new(StatusCode::BAD_REQUEST, MSG_DUPLICATE),
            ServiceError::YearNotFound(_) => Self::new(StatusCode::NOT_FOUND, MSG_YEAR_NOT_FOUND),
            ServiceError::HolidayNotFound(_) => Self::new(StatusCode::NOT_FOUND, MSG_HOLIDAY_NOT_FOUND),
            ServiceError::Storage(msg) => {
                error!(error = %msg, "holiday directory persistence failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, MSG_STORAGE)
            }
        }
    }
}
