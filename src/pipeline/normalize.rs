//! Turns raw query/form parameters into an [`InboundConversion`].

use std::collections::HashMap;

use crate::constants::{CLICK_ID_ALIASES, EVENT_TYPE_ALIASES, PAYOUT_ALIASES, SUB_TAG_ALIASES};
use crate::domain::{Category, InboundConversion};
use crate::error::ValidationError;

/// Raw parameters of one inbound postback. For every alias the query string
/// is consulted before the form body.
#[derive(Debug, Clone, Default)]
pub struct PostbackParams {
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
}

impl PostbackParams {
    pub fn new(query: HashMap<String, String>, form: HashMap<String, String>) -> Self {
        Self { query, form }
    }

    /// Parse a raw `a=1&b=2` query string. Later duplicates overwrite earlier ones.
    pub fn from_query_string(raw: &str) -> Self {
        let query = url::form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();
        Self {
            query,
            form: HashMap::new(),
        }
    }

    /// First non-empty value across `aliases`, in priority order.
    pub fn first_non_empty(&self, aliases: &[&str]) -> Option<&str> {
        aliases.iter().find_map(|key| {
            [&self.query, &self.form]
                .into_iter()
                .filter_map(|source| source.get(*key))
                .map(String::as_str)
                .find(|v| !v.is_empty())
        })
    }
}

/// Resolve aliases, coerce the payout and validate the result.
pub fn normalize(params: &PostbackParams) -> Result<InboundConversion, ValidationError> {
    let click_id = params.first_non_empty(CLICK_ID_ALIASES);
    let payout = params.first_non_empty(PAYOUT_ALIASES).map(parse_amount).unwrap_or(0.0);

    let click_id = match click_id {
        Some(id) => id.to_string(),
        None => return Err(ValidationError::MissingClickId { payout }),
    };
    if payout < 0.0 {
        return Err(ValidationError::NegativePayout { payout });
    }

    Ok(InboundConversion {
        click_id,
        payout,
        event_type_raw: params.first_non_empty(EVENT_TYPE_ALIASES).map(str::to_string),
        sub_tag: params.first_non_empty(SUB_TAG_ALIASES).map(str::to_string),
    })
}

/// Lenient numeric parse: comma is accepted as decimal separator, anything
/// non-numeric (including `inf`/`NaN`) becomes `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    let candidate = raw.trim().replace(',', ".");
    let looks_numeric = candidate
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if candidate.is_empty() || !looks_numeric {
        return 0.0;
    }
    match candidate.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Map a caller-supplied type label onto a tracker category.
///
/// `lead` and `purchase` (any case) map to their canonical labels, anything
/// else is lowercased with the first letter capitalized, and a missing or
/// blank label means `Lead`.
pub fn normalize_category(raw: Option<&str>) -> Category {
    let lowered = raw.map(|r| r.trim().to_lowercase()).unwrap_or_default();
    match lowered.as_str() {
        "" | "lead" => Category::Lead,
        "purchase" => Category::Purchase,
        other => Category::Other(capitalize_first(other)),
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &[(&str, &str)], form: &[(&str, &str)]) -> PostbackParams {
        let to_map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>()
        };
        PostbackParams::new(to_map(query), to_map(form))
    }

    #[test]
    fn resolves_aliases_in_priority_order() {
        let p = params(&[("cid", "second"), ("s2", "third")], &[("clickid", "first")]);
        let conv = normalize(&p).unwrap();
        assert_eq!(conv.click_id, "first");
    }

    #[test]
    fn query_wins_over_form_for_same_key() {
        let p = params(&[("clickid", "from-query")], &[("clickid", "from-form")]);
        assert_eq!(normalize(&p).unwrap().click_id, "from-query");
    }

    #[test]
    fn empty_values_fall_through_to_next_alias() {
        let p = params(&[("clickid", ""), ("sum", ""), ("payout", "3,75")], &[("cid", "X9")]);
        let conv = normalize(&p).unwrap();
        assert_eq!(conv.click_id, "X9");
        assert_eq!(conv.payout, 3.75);
    }

    #[test]
    fn missing_click_id_is_rejected() {
        let p = params(&[("clickid", ""), ("sum", "5")], &[]);
        assert_eq!(normalize(&p), Err(ValidationError::MissingClickId { payout: 5.0 }));
    }

    #[test]
    fn rejection_carries_the_parsed_payout() {
        let p = params(&[("payout", "2,5")], &[]);
        assert_eq!(normalize(&p).unwrap_err().payout(), 2.5);
        let p = params(&[("clickid", "abc"), ("sum", "-0,5")], &[]);
        assert_eq!(normalize(&p).unwrap_err().payout(), -0.5);
    }

    #[test]
    fn negative_payout_is_rejected() {
        let p = params(&[("clickid", "abc"), ("sum", "-2")], &[]);
        assert_eq!(normalize(&p), Err(ValidationError::NegativePayout { payout: -2.0 }));
    }

    #[test]
    fn zero_and_absent_payout_are_valid() {
        let p = params(&[("clickid", "abc"), ("sum", "0")], &[]);
        assert_eq!(normalize(&p).unwrap().payout, 0.0);
        let p = params(&[("clickid", "abc")], &[]);
        assert_eq!(normalize(&p).unwrap().payout, 0.0);
    }

    #[test]
    fn passthrough_fields_use_their_aliases() {
        let p = params(&[("clickid", "abc"), ("s3", "Signup"), ("s1", "camp")], &[]);
        let conv = normalize(&p).unwrap();
        assert_eq!(conv.event_type_raw.as_deref(), Some("Signup"));
        assert_eq!(conv.sub_tag.as_deref(), Some("camp"));
    }

    #[test]
    fn parse_amount_is_lenient() {
        assert_eq!(parse_amount("12.50"), 12.5);
        assert_eq!(parse_amount("12,50"), 12.5);
        assert_eq!(parse_amount(" 7 "), 7.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("1,2,3"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount("-1.5"), -1.5);
    }

    #[test]
    fn category_normalization() {
        assert_eq!(normalize_category(None), Category::Lead);
        assert_eq!(normalize_category(Some("  ")), Category::Lead);
        assert_eq!(normalize_category(Some("LEAD")), Category::Lead);
        assert_eq!(normalize_category(Some(" purchase ")), Category::Purchase);
        assert_eq!(normalize_category(Some("SIGNUP")), Category::Other("Signup".to_string()));
        assert_eq!(normalize_category(Some("LowValue")), Category::Other("Lowvalue".to_string()));
    }

    #[test]
    fn from_query_string_decodes_values() {
        let p = PostbackParams::from_query_string("?clickid=a%2Bb&sub12=hello+world");
        assert_eq!(p.first_non_empty(&["clickid"]), Some("a+b"));
        assert_eq!(p.first_non_empty(&["sub12"]), Some("hello world"));
    }
}
