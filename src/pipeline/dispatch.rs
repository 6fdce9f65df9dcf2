//! Fires outbound events at the tracker, one GET per event, never retried.

use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::app::ports::HttpClientPort;
use crate::constants::MAX_BODY_PREFIX_CHARS;
use crate::domain::{DispatchResult, OutboundEvent};
use crate::metrics::RelayMetrics;

pub struct Dispatcher {
    http: Arc<dyn HttpClientPort>,
    base_url: Url,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            timeout,
        }
    }

    pub fn build_url(&self, event: &OutboundEvent) -> Url {
        build_url(&self.base_url, event)
    }

    /// Send one event. Transport failures are folded into the result.
    pub async fn dispatch(&self, event: &OutboundEvent) -> (Url, DispatchResult) {
        let url = self.build_url(event);
        let started = Instant::now();

        let result = match self.http.get(url.as_str(), self.timeout).await {
            Ok(resp) => {
                let body = String::from_utf8_lossy(&resp.bytes);
                DispatchResult {
                    succeeded: (200..400).contains(&resp.status),
                    status_code: resp.status,
                    response_body_prefix: truncate_chars(&body, MAX_BODY_PREFIX_CHARS),
                    error_detail: None,
                }
            }
            Err(err) => {
                tracing::warn!(
                    category = %event.category,
                    kind = err.kind.as_str(),
                    "Outbound postback failed: {}",
                    err.detail
                );
                DispatchResult {
                    succeeded: false,
                    status_code: err.kind.code(),
                    response_body_prefix: String::new(),
                    error_detail: Some(err.to_string()),
                }
            }
        };

        RelayMetrics::record_event_dispatched(result.succeeded, started.elapsed().as_secs_f64());
        (url, result)
    }
}

/// Append the event's parameters to `base`, form-urlencoded. Query
/// parameters already present on `base` are kept ahead of them.
pub fn build_url(base: &Url, event: &OutboundEvent) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().extend_pairs(event.query_pairs());
    url
}

pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::HttpGetResult;
    use crate::domain::{Category, LowValueMarker};
    use crate::error::{TransportError, TransportErrorKind};
    use async_trait::async_trait;

    struct StubHttp {
        response: Result<HttpGetResult, TransportError>,
        seen: std::sync::Mutex<Vec<(String, Duration)>>,
    }

    impl StubHttp {
        fn new(response: Result<HttpGetResult, TransportError>) -> Self {
            Self {
                response,
                seen: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpClientPort for StubHttp {
        async fn get(&self, url: &str, timeout: Duration) -> Result<HttpGetResult, TransportError> {
            self.seen.lock().unwrap().push((url.to_string(), timeout));
            self.response.clone()
        }
    }

    fn event() -> OutboundEvent {
        OutboundEvent {
            click_id: "ab c&d".to_string(),
            amount: 0.5,
            category: Category::LowValue,
            sub_tag: Some("x/y".to_string()),
            marker: Some(LowValueMarker {
                key: "sub11".to_string(),
                value: "low_value".to_string(),
            }),
        }
    }

    fn base() -> Url {
        Url::parse("https://tracker.example.com/postback").unwrap()
    }

    #[test]
    fn url_carries_encoded_unmasked_fields() {
        let url = build_url(&base(), &event());
        assert_eq!(
            url.as_str(),
            "https://tracker.example.com/postback?clickid=ab+c%26d&sum=0.5&type=LowValue&sub12=x%2Fy&sub11=low_value"
        );
    }

    #[test]
    fn url_keeps_existing_base_query() {
        let base = Url::parse("https://tracker.example.com/postback?token=t1").unwrap();
        let url = build_url(&base, &event());
        assert!(url.as_str().starts_with("https://tracker.example.com/postback?token=t1&clickid="));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 280), "short");
        assert_eq!(truncate_chars(&"x".repeat(300), 280).len(), 280);
    }

    #[tokio::test]
    async fn success_range_is_2xx_and_3xx() {
        for (status, ok) in [(200, true), (302, true), (399, true), (400, false), (500, false)] {
            let http = Arc::new(StubHttp::new(Ok(HttpGetResult {
                status,
                bytes: b"OK".to_vec(),
            })));
            let dispatcher = Dispatcher::new(http, base(), Duration::from_secs(6));
            let (_, result) = dispatcher.dispatch(&event()).await;
            assert_eq!(result.succeeded, ok, "status {}", status);
            assert_eq!(result.status_code, status);
            assert_eq!(result.response_body_prefix, "OK");
        }
    }

    #[tokio::test]
    async fn transport_failure_reports_code_and_detail() {
        let http = Arc::new(StubHttp::new(Err(TransportError::new(
            TransportErrorKind::Timeout,
            "operation timed out",
        ))));
        let dispatcher = Dispatcher::new(http.clone(), base(), Duration::from_secs(6));
        let (url, result) = dispatcher.dispatch(&event()).await;

        assert!(!result.succeeded);
        assert_eq!(result.status_code, 28);
        assert!(result.response_body_prefix.is_empty());
        assert_eq!(result.error_detail.as_deref(), Some("timeout error: operation timed out"));

        let seen = http.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], (url.to_string(), Duration::from_secs(6)));
    }

    #[tokio::test]
    async fn long_bodies_are_truncated() {
        let http = Arc::new(StubHttp::new(Ok(HttpGetResult {
            status: 200,
            bytes: "b".repeat(1000).into_bytes(),
        })));
        let dispatcher = Dispatcher::new(http, base(), Duration::from_secs(1));
        let (_, result) = dispatcher.dispatch(&event()).await;
        assert_eq!(result.response_body_prefix.chars().count(), MAX_BODY_PREFIX_CHARS);
    }
}
