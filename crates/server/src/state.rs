use std::sync::Arc;

use service::directory::HolidayStore;

/// Shared handler state: the holiday directory and the configured API key.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn HolidayStore>,
    pub api_key: Arc<str>,
}

impl ServerState {
    pub fn new(store: Arc<dyn HolidayStore>, api_key: impl Into<Arc<str>>) -> Self {
        Self { store, api_key: api_key.into() }
    }
}
