use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SendError;

/// HTTP methods used by the appointments API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// Request handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// Sent as `application/json` when present
    pub body: Option<Value>,
}

/// Raw response of a [`Transport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one HTTP exchange.
///
/// Any status code, including 4xx/5xx, is a successful exchange.
/// [`SendError::Unreachable`] means no response arrived at all; once a status
/// line has been read, body failures are [`SendError::UnreadableBody`].
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, SendError>;
}

#[cfg(feature = "native")]
pub use native::ReqwestTransport;

#[cfg(feature = "native")]
mod native {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{ApiRequest, ApiResponse, Method, Transport};
    use crate::error::{SendError, TransportError};

    /// [`Transport`] backed by `reqwest`
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }

        pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            Ok(Self { client })
        }
    }

    #[async_trait(?Send)]
    impl Transport for ReqwestTransport {
        async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, SendError> {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
            };

            let mut builder = self.client.request(method, request.url.as_str());
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await.map_err(TransportError::from)?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|err| SendError::UnreadableBody {
                    status,
                    error: err.into(),
                })?;

            Ok(ApiResponse { status, body })
        }
    }
}
