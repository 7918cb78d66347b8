use std::sync::Arc;

use parking_lot::Mutex;

use crate::reactive::demand::{CloseReason, DeliverySlot, DemandLedger};

/// Lifecycle states of a subscription.
///
/// A subscription is Created by `subscribe`, becomes Active once
/// `on_subscribe` has been delivered, and ends in exactly one of the three
/// absorbing terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubscriptionState {
    Created,
    Active,
    Completed,
    Errored,
    Cancelled,
}

impl SubscriptionState {
    fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubscriptionState::Completed
                | SubscriptionState::Errored
                | SubscriptionState::Cancelled
        )
    }
}

/// The binding between one producer execution and one consumer.
///
/// A `Subscription` is handed to the consumer in `on_subscribe` and carries
/// the consumer's half of the protocol: granting demand with [`request`] and
/// ending the subscription with [`cancel`]. The producer's half (delivery
/// claims and terminal transitions) is crate-internal.
///
/// Handles are cheap to clone and safe to use from any thread; `request` may
/// race freely with in-progress deliveries.
///
/// [`request`]: Subscription::request
/// [`cancel`]: Subscription::cancel
///
/// # Examples
///
/// ```rust,ignore
/// impl Subscriber<Document> for Printer {
///     fn on_subscribe(&self, subscription: Subscription) {
///         subscription.request(100);
///     }
///     // ...
/// }
/// ```
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

struct SubscriptionInner {
    state: Mutex<SubscriptionState>,
    ledger: DemandLedger,
}

impl Subscription {
    pub(crate) fn new() -> Self {
        Subscription {
            inner: Arc::new(SubscriptionInner {
                state: Mutex::new(SubscriptionState::Created),
                ledger: DemandLedger::new(),
            }),
        }
    }

    /// Grants the producer permission to deliver `n` more items.
    ///
    /// Demand accumulates and saturates at
    /// [`UNBOUNDED_DEMAND`](crate::reactive::UNBOUNDED_DEMAND) instead of
    /// overflowing. Callable from any thread, any number of times,
    /// concurrently. After the subscription reaches a terminal state this is
    /// a no-op, as is `request(0)`.
    ///
    /// A producer suspended on exhausted demand resumes promptly after the
    /// call.
    pub fn request(&self, n: u64) {
        if n == 0 {
            log::warn!("request(0) ignored; demand must be positive");
            return;
        }
        {
            let state = self.inner.state.lock();
            if state.is_terminal() {
                log::debug!("request({}) after terminal state ignored", n);
                return;
            }
        }
        let outstanding = self.inner.ledger.grant(n);
        log::trace!("demand granted: +{} -> {}", n, outstanding);
    }

    /// Cancels the subscription.
    ///
    /// Idempotent. After the call returns no further signal is delivered to
    /// the consumer: the producer observes the cancellation at its next
    /// delivery attempt or suspension check and stops silently, without a
    /// terminal signal. An item already in flight may still be observed.
    pub fn cancel(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.is_terminal() {
                return;
            }
            *state = SubscriptionState::Cancelled;
        }
        self.inner.ledger.close(CloseReason::Cancelled);
        log::debug!("subscription cancelled");
    }

    /// Whether the consumer cancelled this subscription.
    pub fn is_cancelled(&self) -> bool {
        *self.inner.state.lock() == SubscriptionState::Cancelled
    }

    /// Whether the subscription has reached any terminal state.
    pub fn is_terminal(&self) -> bool {
        self.inner.state.lock().is_terminal()
    }

    /// Outstanding requested-but-undelivered item count.
    pub fn outstanding_demand(&self) -> u64 {
        self.inner.ledger.outstanding()
    }

    /// Marks `on_subscribe` as delivered.
    pub(crate) fn activate(&self) {
        let mut state = self.inner.state.lock();
        if *state == SubscriptionState::Created {
            *state = SubscriptionState::Active;
        }
    }

    /// Claims one delivery slot, suspending while demand is exhausted.
    pub(crate) fn claim_delivery(&self) -> DeliverySlot {
        self.inner.ledger.claim()
    }

    /// Attempts the transition into a terminal state.
    ///
    /// Returns true exactly once per subscription; the caller that wins the
    /// transition delivers the terminal signal, every later attempt is
    /// refused.
    pub(crate) fn try_finish(&self, terminal: SubscriptionState) -> bool {
        debug_assert!(terminal.is_terminal());
        {
            let mut state = self.inner.state.lock();
            if state.is_terminal() {
                return false;
            }
            *state = terminal;
        }
        self.inner.ledger.close(CloseReason::Finished);
        true
    }

    /// Timeout watchdog hook: closes the ledger so the producer observes the
    /// expiry at its next delivery attempt and fails the subscription.
    pub(crate) fn expire(&self) {
        {
            let state = self.inner.state.lock();
            if state.is_terminal() {
                return;
            }
        }
        log::debug!("operation timeout expired");
        self.inner.ledger.close(CloseReason::TimedOut);
    }
}
