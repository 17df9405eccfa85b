use validator::Validate;

use super::{
    client::ApiClient,
    types::{ApiError, LoginRequest, LoginResponse},
};

impl ApiClient {
    /// Exchanges admin credentials for a bearer token and stores it in the session.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        request.validate()?;
        let response = self
            .send(self.http_client().post(self.url("/auth/login")).json(request))
            .await?;
        let login: LoginResponse = Self::read_json(response).await?;
        self.session().set_token(&login.access_token)?;
        log::info!("Admin session started for {}", request.username);
        Ok(login)
    }

    /// Local-only: the backend keeps no server-side session.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session().clear()?;
        log::info!("Admin session cleared");
        Ok(())
    }
}
