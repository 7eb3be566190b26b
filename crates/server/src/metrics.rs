use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder};

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "holiday_directory_requests_total",
        "Total HTTP requests handled"
    )
    .expect("register requests_total")
});

pub static HOLIDAYS_ADDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "holiday_directory_holidays_added_total",
        "Total holidays added"
    )
    .expect("register holidays_added_total")
});

pub static HOLIDAYS_REMOVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "holiday_directory_holidays_removed_total",
        "Total holidays removed"
    )
    .expect("register holidays_removed_total")
});

pub static AUTH_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "holiday_directory_auth_rejected_total",
        "Total mutating requests rejected for a missing or invalid API key"
    )
    .expect("register auth_rejected_total")
});

pub static HOLIDAYS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "holiday_directory_holidays",
        "Holidays currently stored across all years"
    )
    .expect("register holidays gauge")
});

/// Middleware counting every request.
pub async fn track_requests(req: Request, next: Next) -> Response {
    REQUESTS_TOTAL.inc();
    next.run(req).await
}

pub fn set_holiday_count(count: usize) {
    HOLIDAYS.set(i64::try_from(count).unwrap_or(i64::MAX));
}

/// Render the default registry in the Prometheus text format.
pub fn render() -> (StatusCode, String) {
    // touch lazies so every series shows up even before its first event
    Lazy::force(&REQUESTS_TOTAL);
    Lazy::force(&HOLIDAYS_ADDED_TOTAL);
    Lazy::force(&HOLIDAYS_REMOVED_TOTAL);
    Lazy::force(&AUTH_REJECTED_TOTAL);
    Lazy::force(&HOLIDAYS);

    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buf) {
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }
    (StatusCode::OK, String::from_utf8_lossy(&buf).into_owned())
}
