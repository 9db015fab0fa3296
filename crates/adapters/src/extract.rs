// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Forgiving JSON extraction for worker output.

use serde_json::Value;

/// Parse a JSON object out of possibly prose-framed text.
///
/// Precedence: (1) the whole string parsed strictly; (2) the largest
/// `{...}` substring (first `{` to last `}`); (3) `None`. Non-object JSON
/// is rejected at every step.
pub fn extract_json_object(raw: &str) -> Option<Value> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = serde_json::from_str::<Value>(value) {
        return parsed.is_object().then_some(parsed);
    }

    let start = value.find('{')?;
    let end = value.rfind('}')?;
    if end <= start {
        return None;
    }
    let candidate = &value[start..=end];
    let parsed: Value = serde_json::from_str(candidate).ok()?;
    parsed.is_object().then_some(parsed)
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
