use std::sync::Arc;

use crate::{config::Config, store::Store};

/// Read-only-after-init handles shared by every request. The store client is
/// built once here and injected through axum state, never looked up globally.
pub struct AppState {
    pub config: Config,
    pub store: Store,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        let config = Config::load();
        let store = Store::new(&config.supabase_url, &config.supabase_key);

        Arc::new(Self { config, store })
    }
}
