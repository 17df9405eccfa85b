use super::{repository::LoginRepository, utils::LoginForm};
use crate::{
    api::{ApiClient, ApiError},
    state::notifications::Notifications,
};

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug)]
pub struct LoginViewModel {
    repository: LoginRepository,
    pub form: LoginForm,
    pub notifications: Notifications,
}

impl LoginViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            repository: LoginRepository::new(api),
            form: LoginForm::default(),
            notifications: Notifications::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.repository.is_authenticated()
    }

    /// On success the token is already in the session; the password field is
    /// cleared either way.
    pub async fn submit(&mut self) -> Result<(), ApiError> {
        let result = match self.form.to_request() {
            Ok(request) => self.repository.login(&request).await.map(|_| ()),
            Err(err) => Err(err),
        };
        self.form.password.clear();
        match result {
            Ok(()) => {
                self.notifications.success("Login successful!");
                Ok(())
            }
            // A 401 here means wrong credentials, not an expired session.
            Err(ApiError::Unauthorized) => {
                let err = ApiError::Rejected(INVALID_CREDENTIALS.into());
                self.notifications.error("Login failed", &err);
                Err(err)
            }
            Err(err) => {
                self.notifications.error("Login failed", &err);
                Err(err)
            }
        }
    }

    pub fn logout(&mut self) -> Result<(), ApiError> {
        self.repository.logout()?;
        self.notifications.info("Logged out");
        Ok(())
    }
}
