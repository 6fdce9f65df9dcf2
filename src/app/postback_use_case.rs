use std::sync::Arc;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::app::ports::{HttpClientPort, LogSinkPort};
use crate::config::{MaskingConfig, RelayConfig};
use crate::constants::{CLICK_ID_ALIASES, INVALID_INPUT_BODY};
use crate::domain::{DispatchResult, OutboundEvent};
use crate::error::{Result, ValidationError};
use crate::infra::{FileLogSink, NoopLogSink, ReqwestHttp};
use crate::metrics::RelayMetrics;
use crate::pipeline::report::drop_line;
use crate::pipeline::{decide, normalize, Dispatcher, FiredLine, PostbackParams, RuleSet};

/// What one inbound postback produced.
#[derive(Debug, Clone)]
pub enum PostbackOutcome {
    Rejected(ValidationError),
    Fired {
        lines: Vec<String>,
        results: Vec<DispatchResult>,
    },
}

impl PostbackOutcome {
    /// Plain-text response body for the caller.
    pub fn body(&self) -> String {
        match self {
            PostbackOutcome::Rejected(_) => INVALID_INPUT_BODY.to_string(),
            PostbackOutcome::Fired { lines, .. } => {
                lines.iter().map(|l| format!("{}\n", l)).collect()
            }
        }
    }
}

/// Handles one inbound postback end to end. Holds no per-request state, so a
/// single instance is shared by every concurrent request.
pub struct PostbackUseCase {
    rules: RuleSet,
    masking: MaskingConfig,
    dispatcher: Dispatcher,
    sink: Arc<dyn LogSinkPort>,
}

impl PostbackUseCase {
    pub fn new(
        config: &RelayConfig,
        http: Arc<dyn HttpClientPort>,
        sink: Arc<dyn LogSinkPort>,
    ) -> Result<Self> {
        let dispatcher = Dispatcher::new(http, config.postback_url()?, config.timeout());
        Ok(Self {
            rules: RuleSet::from_config(config),
            masking: config.masking.clone(),
            dispatcher,
            sink,
        })
    }

    /// Wire the reqwest transport and the configured postback log.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let http = Arc::new(ReqwestHttp::new(&config.relay.user_agent, config.timeout())?);
        let sink: Arc<dyn LogSinkPort> = if config.log.enabled {
            Arc::new(FileLogSink::new(config.log_path()))
        } else {
            Arc::new(NoopLogSink)
        };
        Self::new(config, http, sink)
    }

    /// Normalize and decide without dispatching or logging.
    pub fn plan(
        &self,
        params: &PostbackParams,
    ) -> std::result::Result<Vec<(OutboundEvent, Url)>, ValidationError> {
        let record = normalize(params)?;
        Ok(decide(&record, &self.rules)
            .into_iter()
            .map(|event| {
                let url = self.dispatcher.build_url(&event);
                (event, url)
            })
            .collect())
    }

    pub async fn handle(&self, params: &PostbackParams) -> PostbackOutcome {
        let masked = self.masking.apply(params.first_non_empty(CLICK_ID_ALIASES));
        let span = tracing::info_span!("postback", request_id = %Uuid::new_v4(), clickid = %masked);
        self.process(params, &masked).instrument(span).await
    }

    async fn process(&self, params: &PostbackParams, masked: &str) -> PostbackOutcome {
        RelayMetrics::record_postback_received();

        let record = match normalize(params) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("Dropping postback: {}", err);
                RelayMetrics::record_postback_dropped();
                self.sink.append(&drop_line(masked, err.payout()));
                return PostbackOutcome::Rejected(err);
            }
        };

        let events = decide(&record, &self.rules);
        let total = events.len();
        let mut lines = Vec::with_capacity(total);
        let mut results = Vec::with_capacity(total);

        // One at a time, in branch order.
        for (i, event) in events.iter().enumerate() {
            let (url, result) = self.dispatcher.dispatch(event).await;
            let line = FiredLine {
                index: i + 1,
                total,
                masked_click_id: masked,
                event,
                url: &url,
                result: &result,
            }
            .render();

            tracing::info!(
                category = %event.category,
                code = result.status_code,
                ok = result.succeeded,
                "Fired {}/{}",
                i + 1,
                total
            );
            self.sink.append(&line);
            lines.push(line);
            results.push(result);
        }

        PostbackOutcome::Fired { lines, results }
    }
}
