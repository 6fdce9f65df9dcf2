//! Postback pipeline: normalize -> decide -> dispatch -> report.

pub mod dispatch;
pub mod normalize;
pub mod report;
pub mod rules;

pub use dispatch::Dispatcher;
pub use normalize::{normalize, PostbackParams};
pub use report::FiredLine;
pub use rules::{decide, RuleSet};
