use fabassert_types::TransactionRecord;

use crate::chain::{Chain, Subject};
use crate::error::{AssertError, AssertResult};
use crate::message::{transaction_failure, verdict};
use crate::modifiers::Modifiers;

impl<S> Chain<S>
where
    S: Subject<Operand = TransactionRecord>,
{
    /// The transaction invoked `function` with exactly `parameters`.
    ///
    /// Negated, both the function and the parameters must differ.
    pub fn function_and_parameters<I, P>(self, function: &str, parameters: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let function = function.to_string();
        let parameters: Vec<String> = parameters.into_iter().map(Into::into).collect();
        self.consumer(move |record, m| {
            check_function(record, m, &function)?;
            check_parameters(record, m, &parameters)
        })
    }

    pub fn function(self, function: &str) -> Self {
        let function = function.to_string();
        self.consumer(move |record, m| check_function(record, m, &function))
    }

    pub fn parameters<I, P>(self, parameters: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let parameters: Vec<String> = parameters.into_iter().map(Into::into).collect();
        self.consumer(move |record, m| check_parameters(record, m, &parameters))
    }

    /// The response status is in `200..400`.
    pub fn successful(self) -> Self {
        self.consumer(check_successful)
    }

    /// The transaction emitted a chaincode event.
    pub fn event(self) -> Self {
        self.consumer(|record, m| {
            verdict(m.accepts(record.event().is_some()), || {
                transaction_failure(record, m, "emit event", None)
            })
        })
    }

    /// The transaction emitted an event with this name and data.
    pub fn emit(self, name: &str, data: &str) -> Self {
        let (name, data) = (name.to_string(), data.to_string());
        self.consumer(move |record, m| {
            let holds = record
                .event()
                .is_some_and(|event| event.name == name && event.data == data);
            verdict(m.accepts(holds), || {
                let actual = match record.event() {
                    Some(event) => format!("emitted {:?} with data {:?}", event.name, event.data),
                    None => "no event emitted".to_string(),
                };
                transaction_failure(
                    record,
                    m,
                    "emit event",
                    Some(format!("expected {name:?} with data {data:?}, {actual}")),
                )
            })
        })
    }

    /// The response carries a non-empty payload.
    pub fn payload(self) -> Self {
        self.consumer(|record, m| {
            verdict(m.accepts(record.has_payload()), || {
                transaction_failure(record, m, "have response payload", None)
            })
        })
    }

    /// The response carries a non-empty message.
    pub fn message(self) -> Self {
        self.consumer(|record, m| {
            verdict(m.accepts(record.has_message()), || {
                transaction_failure(record, m, "have response message", None)
            })
        })
    }

    pub fn exact_payload(self, payload: &str) -> Self {
        let payload = payload.to_string();
        self.consumer(move |record, m| {
            let actual = &record.response().payload;
            verdict(m.accepts(*actual == payload), || {
                transaction_failure(
                    record,
                    m,
                    "have given response payload",
                    Some(format!("expected {payload:?}, found {actual:?}")),
                )
            })
        })
    }

    pub fn exact_message(self, message: &str) -> Self {
        let message = message.to_string();
        self.consumer(move |record, m| {
            let actual = &record.response().message;
            verdict(m.accepts(*actual == message), || {
                transaction_failure(
                    record,
                    m,
                    "have given response message",
                    Some(format!("expected {message:?}, found {actual:?}")),
                )
            })
        })
    }
}

fn check_function(record: &TransactionRecord, m: Modifiers, expected: &str) -> AssertResult<()> {
    verdict(m.accepts(record.function_name() == expected), || {
        transaction_failure(
            record,
            m,
            "have function",
            Some(format!(
                "expected {expected:?}, found {:?}",
                record.function_name()
            )),
        )
    })
}

fn check_parameters(record: &TransactionRecord, m: Modifiers, expected: &[String]) -> AssertResult<()> {
    verdict(m.accepts(record.parameters() == expected), || {
        transaction_failure(
            record,
            m,
            "have parameters",
            Some(format!(
                "expected {expected:?}, found {:?}",
                record.parameters()
            )),
        )
    })
}

fn check_successful(record: &TransactionRecord, m: Modifiers) -> AssertResult<()> {
    verdict(m.accepts(record.is_successful()), || {
        let response = record.response();
        let message = format!(
            "Transaction {} is{} successful",
            record.transaction_id(),
            if m.negate { "" } else { " not" }
        );
        if m.negate {
            AssertError::failed(message)
        } else {
            AssertError::failed_with(
                message,
                format!("status {}: {}", response.status, response.message),
            )
        }
    })
}
