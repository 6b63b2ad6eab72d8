use conoha_providers::{CloudProvider, Credentials};
use std::sync::Arc;

use crate::dispatcher::Dispatcher;

/// Shared, read-only for the life of the process.
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(credentials: Credentials, provider: Arc<dyn CloudProvider>) -> Arc<Self> {
        Arc::new(Self {
            dispatcher: Arc::new(Dispatcher::new(credentials, provider)),
        })
    }
}
