use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::constants::MAX_BODY_PREFIX_BYTES;
use crate::error::{RelayError, TransportError};
use async_trait::async_trait;
use std::time::Duration;

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(user_agent: &str, connect_timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpGetResult, TransportError> {
        tracing::debug!("HTTP GET request to: {}", url.split('?').next().unwrap_or(url));
        let mut resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;
        let status = resp.status().as_u16();

        // Only the body prefix is reported, so stop reading once it is covered.
        let mut bytes = Vec::new();
        while bytes.len() < MAX_BODY_PREFIX_BYTES {
            match resp.chunk().await.map_err(TransportError::from_reqwest)? {
                Some(chunk) => bytes.extend_from_slice(&chunk),
                None => break,
            }
        }
        bytes.truncate(MAX_BODY_PREFIX_BYTES);
        tracing::debug!("HTTP response: status={}, read {} bytes", status, bytes.len());
        Ok(HttpGetResult { status, bytes })
    }
}
