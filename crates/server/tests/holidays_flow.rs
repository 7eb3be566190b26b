use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Datelike, NaiveDate};
use serde_json::{json, Value};
use service::file::holiday_store::FileHolidayStore;
use tower::ServiceExt;
use uuid::Uuid;

use server::{startup, state::ServerState};

const KEY: &str = "test-api-key";

async fn build_app(tag: &str) -> anyhow::Result<(Router, PathBuf)> {
    let path = std::env::temp_dir()
        .join(format!("{tag}_{}", Uuid::new_v4()))
        .join("feriados.json");
    let store = FileHolidayStore::new(&path).await?;
    let state = ServerState::new(store, KEY);
    Ok((startup::build_app(state), path))
}

async fn cleanup(path: &PathBuf) {
    if let Some(dir) = path.parent() {
        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}

async fn send(app: &Router, method: &str, uri: &str, key: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(k) = key {
        req = req.header("X-API-Key", k);
    }
    let req = match body {
        Some(b) => req
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b)?))?,
        None => req.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    Ok((status, value))
}

fn add_uri(anio: i64, fecha: &str, nombre: &str) -> String {
    format!("/feriados/agregar/?anio={anio}&fecha={fecha}&nombre={nombre}")
}

fn remove_uri(anio: i64, fecha: &str) -> String {
    format!("/feriados/eliminar/?anio={anio}&fecha={fecha}")
}

#[tokio::test]
async fn navidad_scenario() -> anyhow::Result<()> {
    let (app, path) = build_app("flow_navidad").await?;

    let (status, body) = send(&app, "POST", &add_uri(2025, "2025-12-25", "Navidad"), Some(KEY), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "Feriado 'Navidad' agregado correctamente el 2025-12-25.");

    let (status, body) = send(&app, "GET", "/feriados/2025", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"anio": 2025, "feriados": [{"fecha": "2025-12-25", "nombre": "Navidad"}]}));

    let (status, body) = send(&app, "POST", &add_uri(2025, "2025-12-25", "Navidad"), Some(KEY), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "El feriado ya existe.");

    let (status, body) = send(&app, "DELETE", &remove_uri(2025, "2025-12-25"), Some(KEY), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "Feriado del 2025-12-25 eliminado correctamente.");

    let (status, body) = send(&app, "GET", "/feriados/2025", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "No hay datos de feriados para este año"}));

    let (status, _) = send(&app, "DELETE", &remove_uri(2025, "2025-12-25"), Some(KEY), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn unknown_year_is_200_with_error_payload() -> anyhow::Result<()> {
    let (app, path) = build_app("flow_unknown_year").await?;
    for year in ["1900", "2099", "-5", "99999999999", "-99999999999999999999"] {
        let (status, body) = send(&app, "GET", &format!("/feriados/{year}"), None, None).await?;
        assert_eq!(status, StatusCode::OK, "{year}");
        assert_eq!(body, json!({"error": "No hay datos de feriados para este año"}), "{year}");
    }

    // years beyond 32 bits are ordinary keys
    let (status, _) = send(&app, "POST", &add_uri(99_999_999_999, "2025-01-01", "Lejano"), Some(KEY), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/feriados/099999999999", None, None).await?;
    assert_eq!(body["anio"], 99_999_999_999i64);
    assert_eq!(body["feriados"][0]["nombre"], "Lejano");

    for bad in ["dos-mil", "2025.5"] {
        let (status, body) = send(&app, "GET", &format!("/feriados/{bad}"), None, None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
        assert_eq!(body["detail"], "Año inválido: debe ser un número entero.");
    }
    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn wrong_or_missing_key_is_forbidden_and_mutates_nothing() -> anyhow::Result<()> {
    let (app, path) = build_app("flow_forbidden").await?;
    send(&app, "POST", &add_uri(2025, "2025-01-01", "AnoNuevo"), Some(KEY), None).await?;
    let before = tokio::fs::read(&path).await?;

    for key in [None, Some("wrong"), Some("")] {
        let (status, body) = send(&app, "POST", &add_uri(2025, "2025-12-25", "Navidad"), key, None).await?;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"], "Acceso denegado: API Key inválida.");

        let (status, _) = send(&app, "DELETE", &remove_uri(2025, "2025-01-01"), key, None).await?;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    // auth is checked before parameters
    let (status, _) = send(&app, "POST", "/feriados/agregar/", None, None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = send(&app, "GET", "/feriados/2025", None, None).await?;
    assert_eq!(body["feriados"].as_array().map(Vec::len), Some(1));
    assert_eq!(tokio::fs::read(&path).await?, before);

    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn invalid_date_is_400_and_not_stored() -> anyhow::Result<()> {
    let (app, path) = build_app("flow_bad_date").await?;
    for fecha in ["25-12-2025", "2025-02-30", "hoy"] {
        let (status, body) = send(&app, "POST", &add_uri(2025, fecha, "X"), Some(KEY), None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{fecha}");
        assert_eq!(body["detail"], "Formato de fecha inválido. Usa YYYY-MM-DD.");
    }
    let (_, body) = send(&app, "GET", "/feriados/2025", None, None).await?;
    assert!(body.get("error").is_some());
    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn remove_distinguishes_missing_year_and_missing_date() -> anyhow::Result<()> {
    let (app, path) = build_app("flow_remove").await?;
    send(&app, "POST", &add_uri(2025, "2025-05-25", "Revolucion"), Some(KEY), None).await?;

    let (status, body) = send(&app, "DELETE", &remove_uri(2024, "2024-05-25"), Some(KEY), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No hay feriados para este año.");

    let (status, body) = send(&app, "DELETE", &remove_uri(2025, "2025-07-09"), Some(KEY), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "El feriado no existe.");

    let (_, body) = send(&app, "GET", "/feriados/2025", None, None).await?;
    assert_eq!(body["feriados"], json!([{"fecha": "2025-05-25", "nombre": "Revolucion"}]));

    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn json_body_is_accepted_when_query_is_absent() -> anyhow::Result<()> {
    let (app, path) = build_app("flow_body").await?;

    let payload = json!({"anio": 2025, "fecha": "2025-06-20", "nombre": "Paso a la Inmortalidad del General Manuel Belgrano"});
    let (status, _) = send(&app, "POST", "/feriados/agregar/", Some(KEY), Some(payload)).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/feriados/2025", None, None).await?;
    assert_eq!(body["feriados"][0]["nombre"], "Paso a la Inmortalidad del General Manuel Belgrano");

    let (status, _) = send(&app, "DELETE", "/feriados/eliminar/", Some(KEY), Some(json!({"anio": 2025, "fecha": "2025-06-20"}))).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/feriados/agregar/", Some(KEY), None).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn is_holiday_today_reflects_store() -> anyhow::Result<()> {
    let (app, path) = build_app("flow_today").await?;

    let (status, body) = send(&app, "GET", "/es_feriado_hoy", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["es_feriado"], false);
    assert!(body.get("nombre").is_none());

    // store the reported day and the next one so a date change between requests still matches
    let reported = body["hoy"].as_str().unwrap_or_default().to_string();
    let today = NaiveDate::parse_from_str(&reported, "%Y-%m-%d")?;
    let tomorrow = today.succ_opt().unwrap();
    for day in [today, tomorrow] {
        let fecha = day.format("%Y-%m-%d").to_string();
        let (status, _) = send(&app, "POST", &add_uri(day.year().into(), &fecha, "Feriado%20de%20prueba"), Some(KEY), None).await?;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&app, "GET", "/es_feriado_hoy", None, None).await?;
    assert_eq!(body["es_feriado"], true);
    assert_eq!(body["nombre"], "Feriado de prueba");
    let hoy = body["hoy"].as_str().unwrap_or_default();
    assert!(hoy == reported || hoy == tomorrow.format("%Y-%m-%d").to_string(), "{hoy}");

    cleanup(&path).await;
    Ok(())
}

#[tokio::test]
async fn storage_failure_is_500_and_keeps_previous_list() -> anyhow::Result<()> {
    let (app, path) = build_app("flow_storage_failure").await?;
    let (status, _) = send(&app, "POST", &add_uri(2025, "2025-01-01", "AnoNuevo"), Some(KEY), None).await?;
    assert_eq!(status, StatusCode::OK);
    let expected = json!({"anio": 2025, "feriados": [{"fecha": "2025-01-01", "nombre": "AnoNuevo"}]});

    // the data directory becomes a plain file, so no write can succeed
    let dir = path.parent().unwrap().to_path_buf();
    tokio::fs::remove_dir_all(&dir).await?;
    tokio::fs::write(&dir, b"x").await?;

    let (status, body) = send(&app, "POST", &add_uri(2025, "2025-12-25", "Navidad"), Some(KEY), None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"detail": "No se pudo guardar el archivo de feriados."}));
    let (_, body) = send(&app, "GET", "/feriados/2025", None, None).await?;
    assert_eq!(body, expected);

    let (status, body) = send(&app, "DELETE", &remove_uri(2025, "2025-01-01"), Some(KEY), None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"detail": "No se pudo guardar el archivo de feriados."}));
    let (_, body) = send(&app, "GET", "/feriados/2025", None, None).await?;
    assert_eq!(body, expected);

    tokio::fs::remove_file(&dir).await?;
    Ok(())
}

#[tokio::test]
async fn startup_creates_nested_data_directory() -> anyhow::Result<()> {
    let root = std::env::temp_dir().join(format!("flow_startup_{}", Uuid::new_v4()));
    let data_file = root.join("var").join("lib").join("feriados.json");
    let mut config = configs::from_toml_str("[auth]\napi_key = \"k\"\n")?;
    config.directory.data_file = data_file.clone();

    let state = startup::build_state(&config).await?;
    assert_eq!(state.store.count().await, 0);
    assert_eq!(tokio::fs::read_to_string(&data_file).await?, "{}");

    let _ = tokio::fs::remove_dir_all(&root).await;
    Ok(())
}

#[tokio::test]
async fn ops_endpoints_respond() -> anyhow::Result<()> {
    let (app, path) = build_app("flow_ops").await?;

    let (status, body) = send(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/feriados/{anio}").is_some());

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty())?)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = String::from_utf8(axum::body::to_bytes(resp.into_body(), usize::MAX).await?.to_vec())?;
    assert!(text.contains("holiday_directory_requests_total"));

    cleanup(&path).await;
    Ok(())
}
