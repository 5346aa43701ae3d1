use async_trait::async_trait;
use std::time::Duration;

use super::{ExecuteRequest, ServerReply, Transport, TransportError};

/// Posts requests to the execution service over HTTP.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: &ExecuteRequest<'_>) -> Result<ServerReply, TransportError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(classify_reqwest)?;

        let status = resp.status();
        let body = resp.text().await.map_err(classify_reqwest)?;

        if !status.is_success() {
            // Error bodies may still carry {"message": ...}; anything else is noise.
            let message = serde_json::from_str::<ServerReply>(&body)
                .ok()
                .and_then(|reply| reply.message);
            return Err(TransportError::Status {
                code: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

fn classify_reqwest(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
