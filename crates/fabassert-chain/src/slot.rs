//! Single-writer cell that carries a producer's result to its consumers.
//!
//! The flag only moves forward: `Unset` for chains with a direct subject,
//! `Pending` from the moment a producer is declared, then exactly one of
//! `Resolved` or `Failed`. [`SlotWriter`] is consumed by its write, so a
//! second terminal write cannot be expressed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::debug;

use crate::error::{AssertError, AssertResult};

#[derive(Debug)]
pub enum ChainFlag<T> {
    Unset,
    Pending,
    Resolved(Arc<T>),
    Failed(AssertError),
}

impl<T> ChainFlag<T> {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Failed(_))
    }
}

impl<T> Clone for ChainFlag<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Unset => Self::Unset,
            Self::Pending => Self::Pending,
            Self::Resolved(value) => Self::Resolved(Arc::clone(value)),
            Self::Failed(error) => Self::Failed(error.clone()),
        }
    }
}

/// Read side of a chain flag. Cheap to clone; every consumer holds one.
#[derive(Debug)]
pub struct ChainSlot<T> {
    rx: watch::Receiver<ChainFlag<T>>,
}

impl<T> Clone for ChainSlot<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

/// Write side of a pending chain flag.
#[derive(Debug)]
pub struct SlotWriter<T> {
    tx: watch::Sender<ChainFlag<T>>,
}

impl<T> SlotWriter<T> {
    pub fn resolve(self, value: Arc<T>) {
        self.tx.send_replace(ChainFlag::Resolved(value));
    }

    pub fn fail(self, error: AssertError) {
        debug!(error = %error, "chained producer failed");
        self.tx.send_replace(ChainFlag::Failed(error));
    }
}

impl<T> ChainSlot<T> {
    /// A slot no producer will ever write.
    pub fn unset() -> Self {
        let (_tx, rx) = watch::channel(ChainFlag::Unset);
        Self { rx }
    }

    /// A slot in `Pending`, together with its only writer.
    pub fn pending() -> (Self, SlotWriter<T>) {
        let (tx, rx) = watch::channel(ChainFlag::Pending);
        (Self { rx }, SlotWriter { tx })
    }

    /// Snapshot of the current flag.
    pub fn state(&self) -> ChainFlag<T> {
        self.rx.borrow().clone()
    }

    /// Wait until a pending producer settles, without taking its value.
    ///
    /// `Unset` returns at once. Otherwise fails like [`operand`](Self::operand).
    pub async fn settled(&self, max_wait: Duration) -> AssertResult<()> {
        if matches!(*self.rx.borrow(), ChainFlag::Unset) {
            return Ok(());
        }
        self.operand(None, max_wait).await.map(|_| ())
    }

    /// Resolve the operand a consumer step should check.
    ///
    /// `Unset` falls back to `subject`; `Pending` waits up to `max_wait`.
    /// A writer that disappears without settling is treated as a producer
    /// that never settles: the wait still runs to the full bound.
    pub async fn operand(
        &self,
        subject: Option<Arc<T>>,
        max_wait: Duration,
    ) -> AssertResult<Arc<T>> {
        let deadline = Instant::now() + max_wait;
        let mut rx = self.rx.clone();

        let current = rx.borrow_and_update().clone();
        let flag = match current {
            ChainFlag::Pending => {
                let waited = timeout_at(deadline, rx.wait_for(ChainFlag::is_settled))
                    .await
                    .map(|r| r.map(|flag| flag.clone()));
                match waited {
                    Ok(Ok(flag)) => flag,
                    Ok(Err(_closed)) => {
                        sleep_until(deadline).await;
                        return Err(AssertError::Timeout(max_wait));
                    }
                    Err(_elapsed) => return Err(AssertError::Timeout(max_wait)),
                }
            }
            settled => settled,
        };

        match flag {
            ChainFlag::Resolved(value) => Ok(value),
            ChainFlag::Failed(error) => Err(AssertError::dependency_failed(error)),
            ChainFlag::Unset => subject.ok_or_else(|| {
                AssertError::MissingContext("no value to check: declare a producer step first".into())
            }),
            ChainFlag::Pending => Err(AssertError::Timeout(max_wait)),
        }
    }
}
