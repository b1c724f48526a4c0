use async_trait::async_trait;
use client::{ApiRequest, ApiResponse, Method, SendError, Transport, TransportError};
use gloo_net::http::Request;

/// Browser `fetch` transport for the appointments client
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, SendError> {
        let url = request.url.as_str();
        let builder = match request.method {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
            Method::Put => Request::put(url),
            Method::Delete => Request::delete(url),
        };

        let sent = match &request.body {
            Some(body) => builder
                .json(body)
                .map_err(|e| TransportError::new(format!("Failed to serialize request: {}", e)))?
                .send()
                .await,
            None => builder.send().await,
        };
        let response = sent.map_err(|e| TransportError::new(format!("Request failed: {}", e)))?;

        let status = response.status();
        // the server has answered; a broken body must not reach the fallback
        let body = response
            .text()
            .await
            .map_err(|e| SendError::UnreadableBody {
                status,
                error: TransportError::new(format!("Failed to read response: {}", e)),
            })?;

        Ok(ApiResponse { status, body })
    }
}
