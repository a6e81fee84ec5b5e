//! The fluent assertion chain.
//!
//! A [`Chain`] accumulates predicate steps without running them. Awaiting
//! the chain drives every step concurrently on the current task; consumers
//! that depend on a producer wait on the chain's [`ChainSlot`] rather than
//! on declaration order.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::sync::Arc;

use fabassert_ledger::Channel;
use fabassert_state::{Collection, KeyValue};
use fabassert_types::TransactionRecord;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tracing::{debug, warn};

use crate::config::ChainConfig;
use crate::error::{AssertError, AssertResult};
use crate::modifiers::Modifiers;
use crate::slot::ChainSlot;

/// Something an assertion chain can start from.
///
/// `Operand` is what consumer predicates check. Subjects that are their own
/// operand return it from [`Subject::operand`]; handles such as a channel
/// return `None` and need a producer step to select one.
pub trait Subject: Send + Sync + 'static {
    type Operand: Send + Sync + 'static;

    fn operand(subject: &Arc<Self>) -> Option<Arc<Self::Operand>>;
}

impl Subject for TransactionRecord {
    type Operand = TransactionRecord;

    fn operand(subject: &Arc<Self>) -> Option<Arc<Self::Operand>> {
        Some(Arc::clone(subject))
    }
}

impl Subject for KeyValue {
    type Operand = KeyValue;

    fn operand(subject: &Arc<Self>) -> Option<Arc<Self::Operand>> {
        Some(Arc::clone(subject))
    }
}

impl Subject for Channel {
    type Operand = TransactionRecord;

    fn operand(_subject: &Arc<Self>) -> Option<Arc<Self::Operand>> {
        None
    }
}

impl Subject for Collection {
    type Operand = KeyValue;

    fn operand(_subject: &Arc<Self>) -> Option<Arc<Self::Operand>> {
        None
    }
}

type Step = BoxFuture<'static, AssertResult<()>>;

/// An awaitable, chainable assertion over `S`.
#[must_use = "assertion chains do nothing unless awaited"]
pub struct Chain<S: Subject> {
    subject: Arc<S>,
    modifiers: Modifiers,
    slot: ChainSlot<S::Operand>,
    steps: Vec<Step>,
    config: ChainConfig,
}

impl<S: Subject> Chain<S> {
    pub fn new(subject: S, config: ChainConfig) -> Self {
        Self {
            subject: Arc::new(subject),
            modifiers: Modifiers::default(),
            slot: ChainSlot::unset(),
            steps: Vec::new(),
            config,
        }
    }

    pub fn subject(&self) -> &S {
        &self.subject
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Modifiers waiting for the next predicate.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Number of predicate steps declared so far.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    // -----------------------------------------------------------------------
    // Connectives
    // -----------------------------------------------------------------------

    /// Negate the next predicate.
    pub fn not(mut self) -> Self {
        self.modifiers = self.modifiers.negated();
        self
    }

    /// Turn the next containment check into an exact-set check.
    pub fn only(mut self) -> Self {
        self.modifiers = self.modifiers.exact();
        self
    }

    pub fn read(mut self) -> Self {
        self.modifiers = self.modifiers.reading();
        self
    }

    pub fn write(mut self) -> Self {
        self.modifiers = self.modifiers.writing();
        self
    }

    // -----------------------------------------------------------------------
    // Language chains
    // -----------------------------------------------------------------------

    pub fn to(self) -> Self {
        self
    }

    pub fn be(self) -> Self {
        self
    }

    pub fn been(self) -> Self {
        self
    }

    pub fn is(self) -> Self {
        self
    }

    pub fn that(self) -> Self {
        self
    }

    pub fn which(self) -> Self {
        self
    }

    pub fn and(self) -> Self {
        self
    }

    pub fn has(self) -> Self {
        self
    }

    pub fn have(self) -> Self {
        self
    }

    pub fn with(self) -> Self {
        self
    }

    pub fn at(self) -> Self {
        self
    }

    pub fn of(self) -> Self {
        self
    }

    pub fn same(self) -> Self {
        self
    }

    pub fn but(self) -> Self {
        self
    }

    pub fn does(self) -> Self {
        self
    }

    // -----------------------------------------------------------------------
    // Step construction
    // -----------------------------------------------------------------------

    fn take_modifiers(&mut self) -> Modifiers {
        std::mem::take(&mut self.modifiers)
    }

    /// Declare a step that checks the chain's operand.
    pub(crate) fn consumer<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S::Operand, Modifiers) -> AssertResult<()> + Send + 'static,
    {
        let modifiers = self.take_modifiers();
        let slot = self.slot.clone();
        let fallback = S::operand(&self.subject);
        let max_wait = self.config.max_wait;
        self.steps.push(
            async move {
                let operand = slot.operand(fallback, max_wait).await?;
                check(&*operand, modifiers)
            }
            .boxed(),
        );
        self
    }

    /// Declare a step that works on the subject directly.
    ///
    /// It does not read the slot's value, but a producer declared before it
    /// must settle first: a failed producer fails this step with
    /// `DependencyFailed` before `run` is called.
    pub(crate) fn standalone<F, Fut>(mut self, run: F) -> Self
    where
        F: FnOnce(Arc<S>, Modifiers) -> Fut + Send + 'static,
        Fut: Future<Output = AssertResult<()>> + Send + 'static,
    {
        let modifiers = self.take_modifiers();
        let slot = self.slot.clone();
        let subject = Arc::clone(&self.subject);
        let max_wait = self.config.max_wait;
        self.steps.push(
            async move {
                slot.settled(max_wait).await?;
                run(subject, modifiers).await
            }
            .boxed(),
        );
        self
    }

    /// Declare a step that selects a new operand for later consumers.
    ///
    /// The slot is `Pending` from this call on. When the step runs, `lookup`
    /// is awaited and the slot settled before the step's own outcome is
    /// returned. Negated, the step passes when the lookup reports `NotFound`
    /// and fails with `found` when it succeeds; either way the slot holds
    /// `Failed`, so later consumers never evaluate after a negated lookup.
    pub(crate) fn producer<F, Fut>(mut self, found: String, lookup: F) -> Self
    where
        F: FnOnce(Arc<S>) -> Fut,
        Fut: Future<Output = AssertResult<S::Operand>> + Send + 'static,
    {
        let modifiers = self.take_modifiers();
        let (slot, writer) = ChainSlot::pending();
        self.slot = slot;
        let lookup = lookup(Arc::clone(&self.subject));
        self.steps.push(
            async move {
                match lookup.await {
                    Ok(_) if modifiers.negate => {
                        let error = AssertError::failed(found);
                        writer.fail(error.clone());
                        Err(error)
                    }
                    Ok(value) => {
                        writer.resolve(Arc::new(value));
                        Ok(())
                    }
                    Err(error) => {
                        let outcome = if modifiers.negate && error.is_not_found() {
                            Ok(())
                        } else {
                            Err(error.clone())
                        };
                        writer.fail(error);
                        outcome
                    }
                }
            }
            .boxed(),
        );
        self
    }
}

impl<S: Subject> IntoFuture for Chain<S> {
    type Output = AssertResult<()>;
    type IntoFuture = BoxFuture<'static, AssertResult<()>>;

    fn into_future(self) -> Self::IntoFuture {
        run(self.steps).boxed()
    }
}

/// Drive all steps and report one failure.
///
/// Aborting failures outrank predicate failures; within a rank the
/// latest-declared step wins. After an aborting failure, steps that can
/// finish without waiting are collected and the rest are dropped.
async fn run(steps: Vec<Step>) -> AssertResult<()> {
    let total = steps.len();
    debug!(steps = total, "running assertion chain");

    let mut pending: FuturesUnordered<_> = steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| step.map(move |outcome| (index, outcome)))
        .collect();

    let mut failure: Option<(usize, AssertError)> = None;
    let mut record = |index: usize, error: AssertError| {
        debug!(step = index, error = %error, "assertion step failed");
        let replaces = match &failure {
            None => true,
            Some((latest, current)) => match (error.is_aborting(), current.is_aborting()) {
                (true, false) => true,
                (false, true) => false,
                _ => index > *latest,
            },
        };
        if replaces {
            failure = Some((index, error));
        }
    };

    let mut aborted = false;
    while let Some((index, outcome)) = pending.next().await {
        if let Err(error) = outcome {
            aborted = error.is_aborting();
            record(index, error);
            if aborted {
                break;
            }
        }
    }

    if aborted {
        while let Some(Some((index, outcome))) = pending.next().now_or_never() {
            if let Err(error) = outcome {
                record(index, error);
            }
        }
        warn!(dropped = pending.len(), "assertion chain aborted");
    }

    match failure {
        Some((_, error)) => Err(error),
        None => Ok(()),
    }
}

impl<S: Subject> fmt::Debug for Chain<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("modifiers", &self.modifiers)
            .field("steps", &self.steps.len())
            .field("config", &self.config)
            .finish()
    }
}
