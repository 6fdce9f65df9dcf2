/// Inbound parameter aliases, in priority order. The first non-empty value wins.
pub const CLICK_ID_ALIASES: &[&str] = &["clickid", "cid", "s2"];
pub const PAYOUT_ALIASES: &[&str] = &["sum", "payout"];
pub const EVENT_TYPE_ALIASES: &[&str] = &["type", "et", "s3"];
pub const SUB_TAG_ALIASES: &[&str] = &["sub12", "s1"];

// Outbound query parameter names
pub const PARAM_CLICK_ID: &str = "clickid";
pub const PARAM_AMOUNT: &str = "sum";
pub const PARAM_CATEGORY: &str = "type";
pub const PARAM_SUB_TAG: &str = "sub12";

/// Outbound names a low-value marker key may not shadow.
pub const RESERVED_OUTBOUND_PARAMS: &[&str] =
    &[PARAM_CLICK_ID, PARAM_AMOUNT, PARAM_CATEGORY, PARAM_SUB_TAG];

/// Body returned to the caller when a postback is dropped.
pub const INVALID_INPUT_BODY: &str = "Invalid or missing data.";

/// Longest response body excerpt kept per dispatched event, in characters.
pub const MAX_BODY_PREFIX_CHARS: usize = 280;

/// Bytes read from a tracker response. Covers the character limit at four
/// bytes per UTF-8 character.
pub const MAX_BODY_PREFIX_BYTES: usize = MAX_BODY_PREFIX_CHARS * 4;

/// Timestamp prefix used by the postback log sink.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
