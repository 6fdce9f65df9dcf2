#![allow(dead_code)]

use async_trait::async_trait;
use postback_relay::app::ports::{HttpClientPort, HttpGetResult, LogSinkPort};
use postback_relay::error::{TransportError, TransportErrorKind};
use postback_relay::{PostbackUseCase, RelayConfig};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE: &str = "https://tracker.example.com/postback";

/// Records every GET; calls whose 1-based position is in `fail_calls` time out.
#[derive(Default)]
pub struct RecordingHttp {
    pub calls: Mutex<Vec<String>>,
    pub fail_calls: HashSet<usize>,
}

impl RecordingHttp {
    pub fn failing(calls: &[usize]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_calls: calls.iter().copied().collect(),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClientPort for RecordingHttp {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<HttpGetResult, TransportError> {
        let position = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(url.to_string());
            calls.len()
        };
        if self.fail_calls.contains(&position) {
            return Err(TransportError::new(TransportErrorKind::Timeout, "operation timed out"));
        }
        Ok(HttpGetResult {
            status: 200,
            bytes: b"OK".to_vec(),
        })
    }
}

#[derive(Default)]
pub struct MemorySink {
    pub lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSinkPort for MemorySink {
    fn append(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

pub fn config() -> RelayConfig {
    let mut cfg = RelayConfig::default();
    cfg.relay.postback_base = BASE.to_string();
    cfg
}

pub fn use_case_with(
    cfg: &RelayConfig,
    http: Arc<RecordingHttp>,
    sink: Arc<dyn LogSinkPort>,
) -> PostbackUseCase {
    PostbackUseCase::new(cfg, http, sink).unwrap()
}
