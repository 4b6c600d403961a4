//! Decoding of generative model output into decision records

use crate::error::{EtaError, Result};
use crate::models::DecisionRecord;

const FENCE: &str = "```";

/// Strip one surrounding code fence from model output
///
/// Trims whitespace, then removes at most one leading fence (with an
/// optional language tag such as `json`) and one trailing fence. Text
/// without a leading fence is returned trimmed. For payloads that carry
/// no fence of their own, a second pass is a no-op.
pub fn extract_json_payload(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let body = body.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let body = body.strip_suffix(FENCE).unwrap_or(body);
    body.trim()
}

/// Parse generated text into a decision record
pub fn parse_decision(text: &str) -> Result<DecisionRecord> {
    if text.trim().is_empty() {
        return Err(EtaError::EmptyModelResponse);
    }

    let payload = extract_json_payload(text);
    serde_json::from_str(payload).map_err(|e| EtaError::MalformedModelOutput {
        raw: text.to_string(),
        detail: e.to_string(),
    })
}
