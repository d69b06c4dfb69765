use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use wattsync_api::models::{AllStatuses, Device, Id, SystemSettings};
use wattsync_api::restful::{AuthRequest, AuthResponse, ToggleRequest, UserResponse};

use crate::errors::ApiError;

/// REST collaborator surface the engine depends on. The engine is
/// generic over this trait so tests can script responses without a
/// server.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_devices(&self) -> Result<Vec<Device>, ApiError>;
    async fn fetch_statuses(&self) -> Result<AllStatuses, ApiError>;
    async fn fetch_settings(&self) -> Result<SystemSettings, ApiError>;
    async fn save_settings(&self, settings: &SystemSettings) -> Result<SystemSettings, ApiError>;
    async fn toggle_device(&self, device_id: Id, on: bool) -> Result<(), ApiError>;
}

pub struct ApiService {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        Self {
            http,
            base_url,
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Exchanges credentials for the bearer token used by every later
    /// request and by the push-topic subscription.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, "/api/auth/login")
            .json(&AuthRequest {
                email: email.into(),
                password: password.into(),
            })
            .send()
            .await?;

        let auth: AuthResponse = Self::decode(response).await?;
        self.token = Some(auth.token);
        Ok(())
    }

    /// Resolves the authenticated user, the source of the push-topic
    /// address.
    pub async fn current_user(&self) -> Result<UserResponse, ApiError> {
        let response = self.request(Method::GET, "/api/auth/me").send().await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl Backend for ApiService {
    async fn fetch_devices(&self) -> Result<Vec<Device>, ApiError> {
        let response = self.request(Method::GET, "/api/devices").send().await?;
        Self::decode(response).await
    }

    async fn fetch_statuses(&self) -> Result<AllStatuses, ApiError> {
        let response = self
            .request(Method::GET, "/api/devices/statuses")
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn fetch_settings(&self) -> Result<SystemSettings, ApiError> {
        let response = self.request(Method::GET, "/api/settings").send().await?;
        Self::decode(response).await
    }

    async fn save_settings(&self, settings: &SystemSettings) -> Result<SystemSettings, ApiError> {
        let response = self
            .request(Method::PUT, "/api/settings")
            .json(settings)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn toggle_device(&self, device_id: Id, on: bool) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, &format!("/api/devices/{device_id}/toggle"))
            .json(&ToggleRequest { on })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_auth_failures_map_to_unauthorized() {
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED).is_unauthorized());
        assert!(ApiError::from_status(StatusCode::FORBIDDEN).is_unauthorized());
        assert!(!ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR).is_unauthorized());
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let service = ApiService::new("http://localhost:8080/", Duration::from_secs(5));
        assert_eq!(service.base_url, "http://localhost:8080");
    }
}
