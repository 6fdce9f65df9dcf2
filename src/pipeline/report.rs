use url::Url;

use crate::domain::{format_amount, DispatchResult, OutboundEvent};

/// One dispatched event, as it appears in the postback log and the response body.
pub struct FiredLine<'a> {
    pub index: usize,
    pub total: usize,
    pub masked_click_id: &'a str,
    pub event: &'a OutboundEvent,
    pub url: &'a Url,
    pub result: &'a DispatchResult,
}

impl FiredLine<'_> {
    pub fn render(&self) -> String {
        let marker = self
            .event
            .marker
            .as_ref()
            .map(|m| format!(" {}={}", m.key, m.value))
            .unwrap_or_default();

        format!(
            "Fired[{}/{}]: clickid={} type={} sum={} sub12={}{} | URL={} | code={} ok={} body={}",
            self.index,
            self.total,
            self.masked_click_id,
            self.event.category,
            format_amount(self.event.amount),
            self.event.sub_tag.as_deref().unwrap_or("-"),
            marker,
            self.url,
            self.result.status_code,
            if self.result.succeeded { 1 } else { 0 },
            self.result.response_body_prefix,
        )
    }
}

/// Log line for a postback rejected before any rule ran.
pub fn drop_line(masked_click_id: &str, payout: f64) -> String {
    format!("DROP invalid data: clickid={} payout={}", masked_click_id, format_amount(payout))
}
