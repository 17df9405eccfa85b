use std::sync::Arc;

use crate::api::{ApiClient, ApiError, LoginRequest, LoginResponse};

#[derive(Clone, Debug)]
pub struct LoginRepository {
    client: Arc<ApiClient>,
}

impl LoginRepository {
    pub fn new(api: ApiClient) -> Self {
        Self {
            client: Arc::new(api),
        }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.client.login(request).await
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.client.logout()
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated()
    }
}
