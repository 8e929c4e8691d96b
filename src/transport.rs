use async_trait::async_trait;
use http::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client as ReqwestClient;

use crate::{PreparedRequest, TransportResult};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Executes one HTTP round trip and returns the raw response body.
///
/// Implementations must not retry. Non-success status codes are not
/// failures: the remote API reports those inside its JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> TransportResult<String>;
}

#[async_trait]
impl Transport for ReqwestClient {
    async fn send(&self, request: PreparedRequest) -> TransportResult<String> {
        let (verb, url, body, headers) = request.into_parts();
        let mut builder = self.request(verb.to_method(), url).headers(headers);
        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
                .body(body);
        }
        let resp = builder.send().await?;
        tracing::debug!(status = resp.status().as_u16(), "response received");
        Ok(resp.text().await?)
    }
}
