use fabassert_types::TransactionRecord;
use serde_json::Value;
use similar::TextDiff;

use crate::error::{AssertError, AssertResult};
use crate::modifiers::Modifiers;

/// The verb form a failing predicate reports: a plain check fails because
/// the record "does not" do something, a negated one because it "does".
pub(crate) fn does(negated: bool) -> &'static str {
    if negated {
        "does"
    } else {
        "does not"
    }
}

pub(crate) fn verdict(accepted: bool, failure: impl FnOnce() -> AssertError) -> AssertResult<()> {
    if accepted {
        Ok(())
    } else {
        Err(failure())
    }
}

/// `Transaction <id> does[ not] <what>`, with optional detail for plain checks.
pub(crate) fn transaction_failure(
    record: &TransactionRecord,
    modifiers: Modifiers,
    what: &str,
    detail: Option<String>,
) -> AssertError {
    let message = format!(
        "Transaction {} {} {what}",
        record.transaction_id(),
        does(modifiers.negate)
    );
    match detail {
        Some(detail) if !modifiers.negate => AssertError::failed_with(message, detail),
        _ => AssertError::failed(message),
    }
}

/// Printable form of a storage key; composite-key separators are escaped.
pub(crate) fn display_key(key: &str) -> String {
    key.escape_debug().to_string()
}

/// Line diff of the pretty-printed JSON of `expected` and `actual`.
pub(crate) fn json_diff(expected: &Value, actual: &Value) -> String {
    let pretty = |v: &Value| serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string());
    let (expected, actual) = (pretty(expected), pretty(actual));
    TextDiff::from_lines(&expected, &actual)
        .unified_diff()
        .header("expected", "actual")
        .to_string()
}
