use std::sync::Arc;

use crate::api::{ApiClient, ApiError, AppointmentCheck, MessageResponse};

#[derive(Clone, Debug)]
pub struct CancelRepository {
    client: Arc<ApiClient>,
}

impl CancelRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Arc::new(api),
        }
    }

    pub async fn check(&self, token: &str) -> Result<AppointmentCheck, ApiError> {
        self.client.check(token).await
    }

    pub async fn cancel(&self, token: &str) -> Result<MessageResponse, ApiError> {
        self.client.cancel(token).await
    }
}
