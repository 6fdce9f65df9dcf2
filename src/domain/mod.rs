use serde::{Deserialize, Serialize};
use std::fmt;

/// Event category as reported to the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Lead,
    Purchase,
    InitiateCheckout,
    LowValue,
    /// Caller-supplied label passed through verbatim, already case-normalized.
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Lead => "Lead",
            Category::Purchase => "Purchase",
            Category::InitiateCheckout => "InitiateCheckout",
            Category::LowValue => "LowValue",
            Category::Other(label) => label,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical inbound conversion. Only built by the normalizer, which
/// guarantees a non-empty click id and a non-negative payout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundConversion {
    pub click_id: String,
    pub payout: f64,
    pub event_type_raw: Option<String>,
    pub sub_tag: Option<String>,
}

/// Extra key/value flagging an event as below the value threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowValueMarker {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEvent {
    pub click_id: String,
    pub amount: f64,
    pub category: Category,
    pub sub_tag: Option<String>,
    pub marker: Option<LowValueMarker>,
}

impl OutboundEvent {
    /// Query parameters sent downstream, in wire order.
    pub fn query_pairs(&self) -> Vec<(&str, String)> {
        use crate::constants::{PARAM_AMOUNT, PARAM_CATEGORY, PARAM_CLICK_ID, PARAM_SUB_TAG};

        let mut pairs = vec![
            (PARAM_CLICK_ID, self.click_id.clone()),
            (PARAM_AMOUNT, format_amount(self.amount)),
            (PARAM_CATEGORY, self.category.to_string()),
        ];
        if let Some(sub_tag) = self.sub_tag.as_deref().filter(|s| !s.is_empty()) {
            pairs.push((PARAM_SUB_TAG, sub_tag.to_string()));
        }
        if let Some(marker) = &self.marker {
            pairs.push((marker.key.as_str(), marker.value.clone()));
        }
        pairs
    }
}

/// Render an amount the way trackers expect it: no trailing `.0` on whole values.
pub fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}

/// Outcome of one outbound GET.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub succeeded: bool,
    /// HTTP status, or the transport error code when no response arrived.
    pub status_code: u16,
    pub response_body_prefix: String,
    pub error_detail: Option<String>,
}
