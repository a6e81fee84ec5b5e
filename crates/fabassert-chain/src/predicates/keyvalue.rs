use fabassert_state::KeyValue;
use serde_json::Value;

use crate::chain::{Chain, Subject};
use crate::error::{AssertError, AssertResult};
use crate::message::{display_key, does, json_diff, verdict};
use crate::modifiers::Modifiers;

impl<S> Chain<S>
where
    S: Subject<Operand = KeyValue>,
{
    /// The stored value equals `expected`.
    ///
    /// Raw values compare as JSON strings, documents as JSON objects
    /// without their bookkeeping fields.
    pub fn value(self, expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        self.consumer(move |kv, m| check_value(kv, m, &expected))
    }
}

pub(crate) fn check_value(kv: &KeyValue, m: Modifiers, expected: &Value) -> AssertResult<()> {
    verdict(m.accepts(kv.value() == expected), || {
        let message = format!(
            "Value at {} {} equal expected value",
            display_key(kv.key()),
            does(m.negate)
        );
        if m.negate {
            AssertError::failed(message)
        } else {
            AssertError::failed_with(message, json_diff(expected, kv.value()))
        }
    })
}
