use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde_json::Value;
use std::future::Future;
use thiserror::Error;
use tracing::debug;

/// HTTP verbs the transport knows how to issue.
// The search session only issues `Post`; the other verbs are part of the
// transport contract and covered by its tests.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  Get,
  Post,
  Put,
  Delete,
}

impl Method {
  /// Mutating methods carry a JSON body; everything else is sent bare.
  pub fn sends_json(self) -> bool {
    matches!(self, Method::Post | Method::Put)
  }

  fn as_reqwest(self) -> reqwest::Method {
    match self {
      Method::Get => reqwest::Method::GET,
      Method::Post => reqwest::Method::POST,
      Method::Put => reqwest::Method::PUT,
      Method::Delete => reqwest::Method::DELETE,
    }
  }
}

#[derive(Debug, Error)]
pub enum TransportError {
  #[error("backend answered with status {0}")]
  Status(u16),
  #[error("request failed: {0}")]
  Network(#[from] reqwest::Error),
  #[error("response body is not JSON: {0}")]
  Decode(#[from] serde_json::Error),
}

/// One request, one JSON answer. Implementations must not retry.
pub trait Transport: Clone + Send + Sync + 'static {
  fn request(
    &self,
    method: Method,
    url: &str,
    payload: Option<Value>,
  ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

/// reqwest-backed transport used against the real search backend.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
  client: Client,
}

impl HttpTransport {
  pub fn new() -> Self {
    Self::default()
  }
}

impl Transport for HttpTransport {
  async fn request(&self, method: Method, url: &str, payload: Option<Value>) -> Result<Value, TransportError> {
    let mut builder = self.client.request(method.as_reqwest(), url);
    if method.sends_json() {
      builder = builder.header(CONTENT_TYPE, "application/json");
      if let Some(payload) = payload {
        builder = builder.body(serde_json::to_vec(&payload)?);
      }
    }

    let response = builder.send().await?;
    let status = response.status();
    debug!(%status, url, "transport: response received");
    if status != StatusCode::OK {
      return Err(TransportError::Status(status.as_u16()));
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
  }
}
