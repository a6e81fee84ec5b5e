use std::time::Duration;

/// Outcome of a failed assertion step.
///
/// `Display` is the human-readable assertion message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssertError {
    /// The transaction or key an existence check expected is absent.
    #[error("{0}")]
    NotFound(String),

    /// The predicate's condition does not hold.
    #[error("{message}{}", .detail.as_deref().map(|d| format!("\n{d}")).unwrap_or_default())]
    PredicateFailed {
        message: String,
        detail: Option<String>,
    },

    /// A producer never settled within the chain's wait bound.
    #[error("timed out after {0:?} waiting for a chained value")]
    Timeout(Duration),

    /// A producer earlier in the chain failed.
    #[error("dependency failed: {source}")]
    DependencyFailed { source: Box<AssertError> },

    /// A context-sensitive check ran without the modifier or producer it needs.
    #[error("{0}")]
    MissingContext(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The ledger or state database could not be reached.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl AssertError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::PredicateFailed {
            message: message.into(),
            detail: None,
        }
    }

    pub fn failed_with(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::PredicateFailed {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    pub fn dependency_failed(cause: AssertError) -> Self {
        Self::DependencyFailed {
            source: Box::new(cause),
        }
    }

    /// Errors that stop the rest of the chain from being evaluated.
    pub fn is_aborting(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Timeout(_)
                | Self::DependencyFailed { .. }
                | Self::MissingContext(_)
                | Self::Unavailable(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The innermost error behind any `DependencyFailed` wrappers.
    pub fn root_cause(&self) -> &AssertError {
        match self {
            Self::DependencyFailed { source } => source.root_cause(),
            other => other,
        }
    }
}

/// Result alias for assertion steps.
pub type AssertResult<T> = Result<T, AssertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_assertion_message() {
        let e = AssertError::failed("Transaction tx1 does not emit event");
        assert_eq!(e.to_string(), "Transaction tx1 does not emit event");

        let e = AssertError::failed_with("Value at k does not equal expected value", "-a\n+b");
        assert_eq!(e.to_string(), "Value at k does not equal expected value\n-a\n+b");
    }

    #[test]
    fn dependency_chain_exposes_root_cause() {
        let root = AssertError::NotFound("Transaction tx9 not found".into());
        let wrapped = AssertError::dependency_failed(AssertError::dependency_failed(root.clone()));
        assert_eq!(wrapped.root_cause(), &root);
        assert_eq!(
            wrapped.to_string(),
            "dependency failed: dependency failed: Transaction tx9 not found"
        );
    }

    #[test]
    fn predicate_failures_do_not_abort() {
        assert!(!AssertError::failed("x").is_aborting());
        assert!(!AssertError::InvalidArgument("x".into()).is_aborting());
        assert!(AssertError::Timeout(Duration::from_secs(1)).is_aborting());
        assert!(AssertError::MissingContext("x".into()).is_aborting());
    }
}
