use crate::{api::SharedApi, session::SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub api: SharedApi,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(api: SharedApi, page_size: i64) -> Self {
        Self::with_sessions(api, SessionStore::new(page_size))
    }

    pub fn with_sessions(api: SharedApi, sessions: SessionStore) -> Self {
        Self { api, sessions }
    }
}
