pub mod http_client;
pub mod log_sink;

pub use http_client::ReqwestHttp;
pub use log_sink::{FileLogSink, NoopLogSink};
