use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{metrics, routes, state::ServerState};
use service::{directory::HolidayStore, file::holiday_store::FileHolidayStore};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the holiday file named in the config and wrap it in handler state.
/// The store creates the file, and any missing parent directories, on first start.
pub async fn build_state(config: &AppConfig) -> anyhow::Result<ServerState> {
    let store = FileHolidayStore::new(config.directory.data_file.clone()).await?;
    metrics::set_holiday_count(store.count().await);

    let store: Arc<dyn HolidayStore> = store;
    Ok(ServerState::new(store, config.auth.api_key.as_str()))
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Build the app and serve it until `shutdown` resolves.
pub async fn run<F>(config: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&config).await?;
    let app = build_app(state);

    let addr: SocketAddr = config.server.bind_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, data_file = %config.directory.data_file.display(), "holiday directory listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped accepting connections");
    Ok(())
}
