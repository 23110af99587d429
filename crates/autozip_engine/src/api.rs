use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};

use crate::{ApiError, FailureKind, PackReply, PackRequest, StatusReply};

/// Address of the packaging server when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// The three endpoints of the packaging server.
#[async_trait::async_trait]
pub trait PackApi: Send + Sync {
    /// Starts one packaging job writing into `output_path`.
    async fn pack(&self, output_path: &str) -> Result<PackReply, ApiError>;

    async fn status(&self) -> Result<StatusReply, ApiError>;

    /// Best effort; the reply body is ignored.
    async fn shutdown(&self) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestPackApi {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestPackApi {
    pub fn new(base_url: &str, settings: &ApiSettings) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }
        // Joining relative endpoints keeps any path prefix of the base.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl PackApi for ReqwestPackApi {
    async fn pack(&self, output_path: &str) -> Result<PackReply, ApiError> {
        let body = serde_json::to_vec(&PackRequest { output_path })
            .map_err(|err| ApiError::new(FailureKind::Malformed, err.to_string()))?;

        let response = self
            .client
            .post(self.endpoint("api/pack")?)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // The server reports refusals in the body, sometimes with an error status.
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        match serde_json::from_slice::<PackReply>(&bytes) {
            Ok(reply) => Ok(reply),
            Err(_) if !status.is_success() => Err(status_error(status)),
            Err(err) => Err(ApiError::new(FailureKind::Malformed, err.to_string())),
        }
    }

    async fn status(&self) -> Result<StatusReply, ApiError> {
        let response = self
            .client
            .get(self.endpoint("api/status")?)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::new(FailureKind::Malformed, err.to_string()))
    }

    async fn shutdown(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("api/shutdown")?)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        Ok(())
    }
}

fn status_error(status: StatusCode) -> ApiError {
    ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
