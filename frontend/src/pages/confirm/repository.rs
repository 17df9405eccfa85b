use std::sync::Arc;

use crate::api::{ApiClient, ApiError, MessageResponse};

#[derive(Clone, Debug)]
pub struct ConfirmRepository {
    client: Arc<ApiClient>,
}

impl ConfirmRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Arc::new(api),
        }
    }

    pub async fn confirm(&self, token: &str) -> Result<MessageResponse, ApiError> {
        self.client.confirm(token).await
    }
}
