use std::sync::Arc;

use bcw_notify::Notifier;

use crate::provider::MetricsProvider;
use crate::store::ProfileStore;

/// Collaborators shared by every scheduled task.
#[derive(Clone)]
pub struct WorkerContext {
    pub store: Arc<dyn ProfileStore>,
    pub notifier: Arc<dyn Notifier>,
    pub provider: Arc<dyn MetricsProvider>,
}

impl WorkerContext {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        notifier: Arc<dyn Notifier>,
        provider: Arc<dyn MetricsProvider>,
    ) -> Self {
        Self {
            store,
            notifier,
            provider,
        }
    }
}

impl std::fmt::Debug for WorkerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerContext").finish_non_exhaustive()
    }
}
