use std::collections::BTreeMap;

use bytes::Bytes;
use reqwest::{
    RequestBuilder,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
use serde::Serialize;

use crate::error::{ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "https://dev.lunchmoney.app";

const UA: &str = concat!("lunchmoney-rs/", env!("CARGO_PKG_VERSION"));

/// Authenticated HTTP access to the API.
///
/// Bodies are read fully into memory; the connection goes back to the pool
/// (or is dropped) on every return path.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    auth: HeaderValue,
}

impl Transport {
    pub fn new(http: reqwest::Client, base_url: &str, token: &str) -> Result<Self> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|err| ClientError::Config(format!("invalid base_url: {err}")))?;
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ClientError::Config("token is not a valid header value".to_string()))?;
        auth.set_sensitive(true);

        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub(crate) fn default_http() -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(UA)
            .build()
            .map_err(|err| ClientError::Config(format!("http client: {err}")))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET path?query`, returning the body of a 2xx response.
    pub async fn get(&self, op: &str, path: &str, query: &BTreeMap<String, String>) -> Result<Bytes> {
        tracing::debug!(op, path, params = query.len(), "GET");
        let req = self.http.get(self.url(path)).query(query);
        self.send(op, req).await
    }

    /// `PUT path` with a JSON body, returning the body of a 2xx response.
    pub async fn put<B: Serialize + ?Sized>(&self, op: &str, path: &str, body: &B) -> Result<Bytes> {
        let payload = serde_json::to_vec(body).map_err(|source| ClientError::Encode {
            op: op.to_string(),
            source,
        })?;
        tracing::debug!(op, path, bytes = payload.len(), "PUT");
        let req = self
            .http
            .put(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        self.send(op, req).await
    }

    async fn send(&self, op: &str, req: RequestBuilder) -> Result<Bytes> {
        let transport = |source| ClientError::Transport {
            op: op.to_string(),
            source,
        };

        let res = req
            .header(AUTHORIZATION, self.auth.clone())
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        let body = match res.bytes().await {
            Ok(body) => body,
            // The status is the useful part of a failed call; keep it.
            Err(err) if !status.is_success() => {
                tracing::debug!(op, %status, error = %err, "error body unreadable");
                Bytes::new()
            }
            Err(err) => return Err(transport(err)),
        };

        if !status.is_success() {
            tracing::debug!(op, %status, "request failed");
            return Err(ClientError::Status {
                op: op.to_string(),
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let transport =
            Transport::new(reqwest::Client::new(), "http://127.0.0.1:3000/", "token").unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:3000");
        assert_eq!(transport.url("/v1/crypto"), "http://127.0.0.1:3000/v1/crypto");
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(matches!(
            Transport::new(reqwest::Client::new(), "not a url", "token"),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            Transport::new(reqwest::Client::new(), "http://localhost", "bad\ntoken"),
            Err(ClientError::Config(_))
        ));
    }
}
