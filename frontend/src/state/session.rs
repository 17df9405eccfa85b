use std::sync::Arc;

use crate::{
    api::ApiError,
    utils::storage::{FileStorage, MemoryStorage, Storage},
};

/// Storage key holding the admin bearer token.
pub const TOKEN_KEY: &str = "admin_token";

/// Single source of truth for the admin auth token.
///
/// Cloning shares the underlying storage, so every holder observes the same
/// session. No expiry is tracked here; an expired token is discovered when
/// the backend answers 401.
#[derive(Clone, Debug)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn file_backed(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(FileStorage::new(path)))
    }

    pub fn token(&self) -> Option<String> {
        match self.storage.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(err) => {
                log::warn!("Failed to read session token: {}", err);
                None
            }
        }
    }

    pub fn set_token(&self, token: &str) -> Result<(), ApiError> {
        if token.trim().is_empty() {
            return Err(ApiError::validation("Received an empty access token"));
        }
        self.storage
            .set_item(TOKEN_KEY, token)
            .map_err(ApiError::Storage)
    }

    pub fn clear(&self) -> Result<(), ApiError> {
        self.storage.remove_item(TOKEN_KEY).map_err(ApiError::Storage)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}
