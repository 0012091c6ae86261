use std::sync::Arc;

use formscan_core::RecordStore;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            inner: Arc::new(InnerState { store }),
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.inner.store.as_ref()
    }
}
