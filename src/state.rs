use crate::{config::AuthSettings, db::KeyValueStore, store::RecordStore};

pub struct AppState<S> {
    pub store: RecordStore<S>,
    pub auth: AuthSettings,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(kv: S, auth: AuthSettings) -> Self {
        Self {
            store: RecordStore::new(kv),
            auth,
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            auth: self.auth.clone(),
        }
    }
}
