//! Affiliate postback relay.
//!
//! One inbound conversion notification is normalized, expanded by a fixed
//! decision table into tracker events, and each event is fired as its own
//! GET request. Every attempt is reported back to the caller and appended to
//! the postback log.

pub mod app;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod infra;
pub mod logging;
pub mod masking;
pub mod metrics;
pub mod pipeline;
pub mod server;

pub use app::{PostbackOutcome, PostbackUseCase};
pub use config::RelayConfig;
pub use error::{RelayError, Result};
pub use pipeline::PostbackParams;
