//! Decision table expanding one inbound conversion into tracker events.
//!
//! Rows are evaluated top to bottom, first match wins:
//!
//! | Condition                         | Events, in order                                   |
//! |-----------------------------------|----------------------------------------------------|
//! | payout < threshold                | LowValue(payout, marker), InitiateCheckout(0)      |
//! | category = Purchase               | Purchase(payout), Lead(0), InitiateCheckout(0)     |
//! | category = Lead                   | Lead(payout), Purchase(0), InitiateCheckout(0)     |
//! | any other category                | category(payout)                                   |
//!
//! Event order is part of the contract: trackers infer funnel stage from it.

use crate::config::RelayConfig;
use crate::domain::{Category, InboundConversion, LowValueMarker, OutboundEvent};
use crate::pipeline::normalize::normalize_category;

/// Inputs the decision table depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub value_threshold: f64,
    pub low_value_marker: Option<LowValueMarker>,
}

impl RuleSet {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            value_threshold: config.relay.value_threshold,
            low_value_marker: config.low_value_marker(),
        }
    }
}

pub fn decide(record: &InboundConversion, rules: &RuleSet) -> Vec<OutboundEvent> {
    let sub_tag = record.sub_tag.clone().filter(|s| !s.is_empty());
    let event = |category: Category, amount: f64| OutboundEvent {
        click_id: record.click_id.clone(),
        amount,
        category,
        sub_tag: sub_tag.clone(),
        marker: None,
    };
    let payout = record.payout;

    if payout < rules.value_threshold {
        let mut low_value = event(Category::LowValue, payout);
        low_value.marker = rules.low_value_marker.clone();
        return vec![low_value, event(Category::InitiateCheckout, 0.0)];
    }

    match normalize_category(record.event_type_raw.as_deref()) {
        Category::Purchase => vec![
            event(Category::Purchase, payout),
            event(Category::Lead, 0.0),
            event(Category::InitiateCheckout, 0.0),
        ],
        Category::Lead => vec![
            event(Category::Lead, payout),
            event(Category::Purchase, 0.0),
            event(Category::InitiateCheckout, 0.0),
        ],
        other => vec![event(other, payout)],
    }
}
