use std::sync::Arc;

use crate::errors::{DocfluxError, ErrorKind};
use crate::reactive::demand::{CloseReason, DeliverySlot};
use crate::reactive::subscription::SubscriptionState;
use crate::reactive::{Subscriber, Subscription};

/// Serialized signal delivery for one subscription.
///
/// The emitter is driven exclusively from the producer thread, which is what
/// serializes all signals to a consumer: a signal is only ever issued after
/// the previous one has returned. Terminal signals go through the
/// subscription's one-shot terminal transition, so exactly one of
/// `on_complete`/`on_error` is ever delivered, and neither after a
/// cancellation.
pub(crate) struct SignalEmitter<T> {
    subscriber: Arc<dyn Subscriber<T>>,
    subscription: Subscription,
}

impl<T> SignalEmitter<T> {
    pub(crate) fn new(subscriber: Arc<dyn Subscriber<T>>, subscription: Subscription) -> Self {
        SignalEmitter {
            subscriber,
            subscription,
        }
    }

    /// Delivers one item, first claiming a delivery slot from the demand
    /// ledger. Suspends while demand is exhausted.
    ///
    /// Returns false when the subscription closed instead of granting a
    /// slot; the producer must stop emitting. A timeout expiry surfaces the
    /// terminal error here, a cancellation stops silently.
    pub(crate) fn emit(&self, item: T) -> bool {
        match self.subscription.claim_delivery() {
            DeliverySlot::Granted => {
                self.subscriber.on_next(item);
                true
            }
            DeliverySlot::Closed(CloseReason::TimedOut) => {
                self.fail(DocfluxError::new(
                    "Operation timed out before completion",
                    ErrorKind::Timeout,
                ));
                false
            }
            DeliverySlot::Closed(_) => false,
            DeliverySlot::Violation => {
                self.fail(DocfluxError::new(
                    "Item delivery attempted against zero outstanding demand",
                    ErrorKind::ProtocolViolation,
                ));
                false
            }
        }
    }

    /// Delivers the completion signal, if this subscription has not already
    /// terminated.
    pub(crate) fn complete(&self) {
        if self.subscription.try_finish(SubscriptionState::Completed) {
            self.subscriber.on_complete();
        }
    }

    /// Delivers the error signal, if this subscription has not already
    /// terminated. A failure that loses the terminal race is logged, never
    /// delivered.
    pub(crate) fn fail(&self, error: DocfluxError) {
        if self.subscription.try_finish(SubscriptionState::Errored) {
            self.subscriber.on_error(error);
        } else {
            log::debug!(
                "suppressing error after terminal signal: {} ({})",
                error,
                error.kind()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSubscriber {
        items: Mutex<Vec<i32>>,
        errors: Mutex<Vec<DocfluxError>>,
        completions: Mutex<u32>,
    }

    impl Subscriber<i32> for RecordingSubscriber {
        fn on_subscribe(&self, _subscription: Subscription) {}

        fn on_next(&self, item: i32) {
            self.items.lock().push(item);
        }

        fn on_error(&self, error: DocfluxError) {
            self.errors.lock().push(error);
        }

        fn on_complete(&self) {
            *self.completions.lock() += 1;
        }
    }

    fn emitter_with(
        subscription: &Subscription,
    ) -> (Arc<RecordingSubscriber>, SignalEmitter<i32>) {
        let subscriber = Arc::new(RecordingSubscriber::default());
        subscription.activate();
        let emitter = SignalEmitter::new(subscriber.clone(), subscription.clone());
        (subscriber, emitter)
    }

    #[test]
    fn test_emit_delivers_within_demand() {
        let subscription = Subscription::new();
        let (subscriber, emitter) = emitter_with(&subscription);
        subscription.request(2);

        assert!(emitter.emit(1));
        assert!(emitter.emit(2));
        assert_eq!(*subscriber.items.lock(), vec![1, 2]);
        assert_eq!(subscription.outstanding_demand(), 0);
    }

    #[test]
    fn test_emit_after_cancel_is_silent() {
        let subscription = Subscription::new();
        let (subscriber, emitter) = emitter_with(&subscription);
        subscription.request(5);
        subscription.cancel();

        assert!(!emitter.emit(1));
        assert!(subscriber.items.lock().is_empty());
        assert!(subscriber.errors.lock().is_empty());
        assert_eq!(*subscriber.completions.lock(), 0);
    }

    #[test]
    fn test_complete_delivers_exactly_once() {
        let subscription = Subscription::new();
        let (subscriber, emitter) = emitter_with(&subscription);

        emitter.complete();
        emitter.complete();
        assert_eq!(*subscriber.completions.lock(), 1);
    }

    #[test]
    fn test_error_after_complete_is_suppressed() {
        let subscription = Subscription::new();
        let (subscriber, emitter) = emitter_with(&subscription);

        emitter.complete();
        emitter.fail(DocfluxError::new("late", ErrorKind::InternalError));
        assert!(subscriber.errors.lock().is_empty());
        assert_eq!(*subscriber.completions.lock(), 1);
    }

    #[test]
    fn test_complete_after_error_is_suppressed() {
        let subscription = Subscription::new();
        let (subscriber, emitter) = emitter_with(&subscription);

        emitter.fail(DocfluxError::new("broken", ErrorKind::OperationFailure));
        emitter.complete();
        assert_eq!(subscriber.errors.lock().len(), 1);
        assert_eq!(*subscriber.completions.lock(), 0);
    }

    #[test]
    fn test_terminal_after_cancel_is_suppressed() {
        let subscription = Subscription::new();
        let (subscriber, emitter) = emitter_with(&subscription);
        subscription.cancel();

        emitter.complete();
        emitter.fail(DocfluxError::new("late", ErrorKind::InternalError));
        assert!(subscriber.errors.lock().is_empty());
        assert_eq!(*subscriber.completions.lock(), 0);
    }

    #[test]
    fn test_timeout_expiry_surfaces_as_error() {
        let subscription = Subscription::new();
        let (subscriber, emitter) = emitter_with(&subscription);
        subscription.expire();

        assert!(!emitter.emit(1));
        let errors = subscriber.errors.lock();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), &ErrorKind::Timeout);
        assert!(subscriber.items.lock().is_empty());
    }
}
