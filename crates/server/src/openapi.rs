use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct HolidayDoc { pub fecha: String, pub nombre: String }

#[derive(ToSchema)]
pub struct YearHolidaysDoc { pub anio: i64, pub feriados: Vec<HolidayDoc> }

#[derive(ToSchema)]
pub struct TodayStatusDoc { pub hoy: String, pub es_feriado: bool, pub nombre: Option<String> }

#[derive(ToSchema)]
pub struct MessageDoc { pub mensaje: String }

struct ApiKeyScheme;

impl Modify for ApiKeyScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(crate::auth::API_KEY_HEADER))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::holidays::get_holidays,
        crate::routes::holidays::is_holiday_today,
        crate::routes::holidays::add_holiday,
        crate::routes::holidays::remove_holiday,
    ),
    components(
        schemas(
            HealthResponse,
            HolidayDoc,
            YearHolidaysDoc,
            TodayStatusDoc,
            MessageDoc,
        )
    ),
    modifiers(&ApiKeyScheme),
    tags(
        (name = "health"),
        (name = "feriados")
    )
)]
pub struct ApiDoc;
