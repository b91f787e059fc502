use std::time::Duration;

use backoffice_logging::{bo_debug, bo_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use url::Url;

use crate::ApiError;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// API root, e.g. `https://api.example.org/api`. Paths are appended to it.
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            bearer_token: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// JSON REST access to the back-office API.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError>;

    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::Get, path, None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.request(Method::Post, path, body).await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.request(Method::Put, path, body).await
    }

    async fn delete(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.request(Method::Delete, path, body).await
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    http: reqwest::Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl ReqwestApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(settings.base_url.trim())
            .map_err(|err| ApiError::InvalidUrl(format!("{}: {err}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(settings.base_url));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        Ok(Self {
            http,
            base_url,
            bearer_token: settings.bearer_token.filter(|token| !token.trim().is_empty()),
        })
    }

    /// Appends `path` to the base URL segment by segment, percent-encoding each one.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        bo_debug!("{:?} {}", method, url);

        let mut builder = self
            .http
            .request(method.into(), url.clone())
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            let bytes =
                serde_json::to_vec(&body).map_err(|err| ApiError::Decode(err.to_string()))?;
            builder = builder.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let message = server_message(&bytes);
            bo_warn!(
                "{:?} {} failed with {}: {}",
                method,
                url,
                status,
                message.as_deref().unwrap_or("-")
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        decode_body(&bytes)
    }
}

fn decode_body(bytes: &[u8]) -> Result<Value, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

/// `message` or `error` from a JSON error body.
fn server_message(bytes: &[u8]) -> Option<String> {
    let body: Value = serde_json::from_slice(bytes).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    if err.is_decode() {
        return ApiError::Decode(err.to_string());
    }
    ApiError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_body_is_null() {
        assert_eq!(decode_body(b"").unwrap(), Value::Null);
        assert_eq!(decode_body(b" \n").unwrap(), Value::Null);
        assert!(matches!(decode_body(b"<html>"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn error_field_is_a_fallback() {
        assert_eq!(
            server_message(br#"{"error": "Unauthenticated."}"#).as_deref(),
            Some("Unauthenticated.")
        );
        assert_eq!(
            server_message(br#"{"message": "", "error": "Nope"}"#).as_deref(),
            Some("Nope")
        );
        assert_eq!(server_message(b"oops"), None);
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = ReqwestApiClient::new(ClientSettings {
            base_url: "http://localhost:8000/api/".to_string(),
            ..ClientSettings::default()
        })
        .unwrap();
        let url = client.endpoint("/admin/roles/r 1/restore").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/admin/roles/r%201/restore");
    }
}
