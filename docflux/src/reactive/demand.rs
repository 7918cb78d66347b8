use parking_lot::{Condvar, Mutex};

/// Demand that never runs out: `request(UNBOUNDED_DEMAND)` effectively turns
/// backpressure off for a subscription.
pub const UNBOUNDED_DEMAND: u64 = u64::MAX;

/// Why a ledger stopped granting delivery slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseReason {
    /// The consumer cancelled the subscription.
    Cancelled,
    /// The operation timeout expired.
    TimedOut,
    /// The producer delivered its terminal signal.
    Finished,
}

/// The result of a delivery-slot claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeliverySlot {
    /// One unit of demand was consumed; the producer may deliver one item.
    Granted,
    /// The ledger is closed; no further deliveries.
    Closed(CloseReason),
    /// Internal accounting breach: a claim consumed demand that was not
    /// there. Fatal to the subscription.
    Violation,
}

struct LedgerState {
    outstanding: u64,
    closed: Option<CloseReason>,
}

/// Tracks outstanding requested-but-undelivered item count for one
/// subscription.
///
/// The ledger is the only state shared between the consumer side
/// (`request`/`cancel`, any thread) and the producer side (delivery claims,
/// the producer thread). Grants saturate at [`UNBOUNDED_DEMAND`] instead of
/// overflowing; claims block on a condition variable while demand is
/// exhausted, so a suspended producer consumes no CPU until the consumer
/// requests more or the subscription closes.
pub(crate) struct DemandLedger {
    state: Mutex<LedgerState>,
    readiness: Condvar,
}

impl DemandLedger {
    pub(crate) fn new() -> Self {
        DemandLedger {
            state: Mutex::new(LedgerState {
                outstanding: 0,
                closed: None,
            }),
            readiness: Condvar::new(),
        }
    }

    /// Adds demand, saturating at [`UNBOUNDED_DEMAND`], and wakes a suspended
    /// producer. Grants against a closed ledger are ignored.
    ///
    /// Returns the outstanding demand after the grant.
    pub(crate) fn grant(&self, n: u64) -> u64 {
        let mut state = self.state.lock();
        if state.closed.is_some() {
            return state.outstanding;
        }
        state.outstanding = state.outstanding.saturating_add(n);
        self.readiness.notify_all();
        state.outstanding
    }

    /// Closes the ledger and wakes a suspended producer. The first close
    /// reason wins; later closes are ignored.
    pub(crate) fn close(&self, reason: CloseReason) {
        let mut state = self.state.lock();
        if state.closed.is_none() {
            state.closed = Some(reason);
            self.readiness.notify_all();
        }
    }

    /// Claims one delivery slot, suspending the caller while no demand is
    /// outstanding. Exactly one unit of demand is consumed per granted slot.
    pub(crate) fn claim(&self) -> DeliverySlot {
        let mut state = self.state.lock();
        loop {
            if let Some(reason) = state.closed {
                return DeliverySlot::Closed(reason);
            }
            if state.outstanding > 0 {
                state.outstanding = match state.outstanding.checked_sub(1) {
                    Some(remaining) => remaining,
                    None => return DeliverySlot::Violation,
                };
                return DeliverySlot::Granted;
            }
            self.readiness.wait(&mut state);
        }
    }

    /// Current outstanding demand.
    pub(crate) fn outstanding(&self) -> u64 {
        self.state.lock().outstanding
    }

    /// Whether the ledger has been closed.
    pub(crate) fn is_closed(&self) -> bool {
        self.state.lock().closed.is_some()
    }
}
