use async_trait::async_trait;
use std::time::Duration;

use crate::error::TransportError;

/// Outbound transport: one GET with a bounded timeout.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpGetResult, TransportError>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    /// Leading bytes of the body. Transports may stop reading early.
    pub bytes: Vec<u8>,
}

/// Append-only sink for the postback log. Implementations never fail
/// visibly; a broken sink must not block delivery or the response.
pub trait LogSinkPort: Send + Sync {
    fn append(&self, line: &str);
}
