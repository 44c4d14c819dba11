//! Typed access to the API resources.
//!
//! Every resource method follows the same steps: validate the caller's input,
//! encode it, send one request, decode the body and validate what came back.
//! Errors carry the operation label, see [`ClientError`].
//!
//! Methods are plain `async fn`s. Dropping the returned future cancels the
//! in-flight request; wrap calls in `tokio::time::timeout` or `tokio::select!`
//! to bound them.

use std::collections::BTreeMap;

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{ClientError, Result},
    http::{DEFAULT_BASE_URL, Transport},
    query::encode_filter,
    validation::Validate,
};

mod categories;
mod crypto;
mod tags;
mod transactions;

/// Lunch Money API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Transport,
}

impl Client {
    /// Client for the public API authenticated with `token`.
    pub fn new(token: &str) -> Result<Self> {
        Self::builder().token(token).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Validates `input` before anything goes on the wire.
    fn check_input<T: Validate + ?Sized>(op: &str, input: &T) -> Result<()> {
        input.validate().map_err(|source| ClientError::InvalidRequest {
            op: op.to_string(),
            source,
        })
    }

    /// Validates and encodes optional filters into GET parameters.
    fn query<F: Validate + Serialize>(op: &str, filters: Option<&F>) -> Result<BTreeMap<String, String>> {
        let Some(filters) = filters else {
            return Ok(BTreeMap::new());
        };
        Self::check_input(op, filters)?;
        encode_filter(filters).map_err(|source| ClientError::Encode {
            op: op.to_string(),
            source,
        })
    }

    fn decode<T: DeserializeOwned + Validate>(op: &str, body: &[u8]) -> Result<T> {
        let value: T = serde_json::from_slice(body).map_err(|source| ClientError::Decode {
            op: op.to_string(),
            source,
        })?;
        value.validate().map_err(|source| ClientError::InvalidResponse {
            op: op.to_string(),
            source,
        })?;
        Ok(value)
    }

    async fn get<T: DeserializeOwned + Validate>(
        &self,
        op: &str,
        path: &str,
        query: &BTreeMap<String, String>,
    ) -> Result<T> {
        let body = self.transport.get(op, path, query).await?;
        Self::decode(op, &body)
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned + Validate>(
        &self,
        op: &str,
        path: &str,
        payload: &B,
    ) -> Result<T> {
        let body = self.transport.put(op, path, payload).await?;
        Self::decode(op, &body)
    }
}

#[derive(Default, Debug)]
pub struct ClientBuilder {
    token: String,
    base_url: Option<String>,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    pub fn token(mut self, token: &str) -> ClientBuilder {
        self.token = token.to_string();
        self
    }

    /// Overrides the API root (default `https://dev.lunchmoney.app`).
    pub fn base_url(mut self, base_url: &str) -> ClientBuilder {
        self.base_url = Some(base_url.to_string());
        self
    }

    /// Uses a preconfigured HTTP client (proxies, timeouts, TLS settings).
    pub fn http(mut self, http: reqwest::Client) -> ClientBuilder {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<Client> {
        if self.token.trim().is_empty() {
            return Err(ClientError::Config("missing API token".to_string()));
        }
        let http = match self.http {
            Some(http) => http,
            None => Transport::default_http()?,
        };
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let transport = Transport::new(http, base_url, &self.token)?;
        Ok(Client { transport })
    }
}
