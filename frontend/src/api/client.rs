use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, RequestBuilder, Response, StatusCode,
};
use serde::de::DeserializeOwned;

use crate::{
    api::types::ApiError,
    config::{RuntimeConfig, DEFAULT_TIMEOUT_SECS},
    state::session::SessionStore,
};

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &RuntimeConfig, session: SessionStore) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: normalize_base(&config.api_base_url),
            session,
        })
    }

    pub fn new_with_base_url(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self::with_timeout(
            base_url,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session,
        )
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
        session: SessionStore,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                log::warn!("Falling back to default HTTP client: {}", err);
                Client::new()
            });
        Self {
            client,
            base_url: normalize_base(&base_url.into()),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let token = self.session.token().ok_or(ApiError::Unauthorized)?;
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::validation("Stored access token is not a valid header"))?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    fn handle_unauthorized_status(&self, status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED {
            log::info!("Backend rejected the admin session; clearing stored token");
            if let Err(err) = self.session.clear() {
                log::error!("Failed to clear session after 401: {}", err);
            }
        }
    }

    /// Sends the request, mapping transport failures onto `Network`/`Timeout`.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                log::warn!("Request timed out: {}", err);
                ApiError::Timeout
            } else {
                log::warn!("Request failed: {}", err);
                ApiError::Network(err.to_string())
            }
        })?;
        log::debug!("{} -> {}", response.url(), response.status());
        self.handle_unauthorized_status(response.status());
        Ok(response)
    }

    pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| {
                log::error!("Failed to parse response: {}", e);
                ApiError::Decode(e.to_string())
            });
        }
        Err(Self::read_error(response).await)
    }

    /// Like `read_json` for endpoints whose success body is ignored.
    pub(crate) async fn read_empty(response: Response) -> Result<(), ApiError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::read_error(response).await)
    }

    async fn read_error(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status, &body);
        match &error {
            ApiError::Server { .. } => log::error!("Server error {}: {}", status, body),
            _ => log::warn!("Request rejected ({}): {}", status, error),
        }
        error
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.http_client().get(self.url(path))).await?;
        Self::read_json(response).await
    }

    pub(crate) async fn admin_get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let headers = self.auth_headers()?;
        let response = self
            .send(self.http_client().get(self.url(path)).headers(headers))
            .await?;
        Self::read_json(response).await
    }
}

pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

fn normalize_base(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new_with_base_url("http://shop/api/", SessionStore::in_memory());
        assert_eq!(client.base_url(), "http://shop/api");
        assert_eq!(client.url("/barbers"), "http://shop/api/barbers");
    }

    #[test]
    fn auth_headers_require_a_token() {
        let session = SessionStore::in_memory();
        let client = ApiClient::new_with_base_url("http://shop/api", session.clone());
        assert_eq!(client.auth_headers().unwrap_err(), ApiError::Unauthorized);

        session.set_token("abc").unwrap();
        let headers = client.auth_headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
    }

    #[test]
    fn path_segments_are_encoded() {
        assert_eq!(encode_segment("abc-123_x.y"), "abc-123_x.y");
        assert_eq!(encode_segment("a/b c"), "a%2Fb%20c");
    }
}
