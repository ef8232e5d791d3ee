use crate::core::AppConfig;

/// Shared server state. The relay holds no per-request state, only the
/// configuration carrying the provider credential.
pub struct AppState {
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}
