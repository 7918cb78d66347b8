use crate::errors::DocfluxError;
use crate::reactive::Subscription;

/// The consumer side of a subscription.
///
/// A subscriber receives exactly the following signal sequence from every
/// publisher it subscribes to:
///
/// 1. `on_subscribe`, exactly once and before anything else, carrying the
///    [`Subscription`] used to grant demand and cancel;
/// 2. zero or more `on_next` calls, one per item, never exceeding the demand
///    granted so far, each delivered strictly after the previous signal
///    returned;
/// 3. at most one terminal signal: `on_complete` when the producer exhausted
///    its supply, or `on_error` when the operation failed. A cancelled
///    subscription receives no terminal signal.
///
/// All four methods are required. Failure handling is part of the protocol
/// contract, not an optional nicety: a consumer must state what it does when
/// an operation fails.
///
/// Implementations must be thread-safe: signals arrive from the producer
/// thread, not the subscribing thread.
pub trait Subscriber<T>: Send + Sync {
    /// Called exactly once, before any other signal, with the subscription
    /// this consumer controls.
    fn on_subscribe(&self, subscription: Subscription);

    /// Called once per delivered item, within the granted demand.
    fn on_next(&self, item: T);

    /// Called at most once when the operation fails. No further signal
    /// follows.
    fn on_error(&self, error: DocfluxError);

    /// Called at most once when the producer exhausted its supply. No
    /// further signal follows.
    fn on_complete(&self);
}

/// Shared-ownership subscribers: a caller can keep a handle to the consumer
/// while the publisher drives a clone of it.
impl<T, S: Subscriber<T> + ?Sized> Subscriber<T> for std::sync::Arc<S> {
    fn on_subscribe(&self, subscription: Subscription) {
        (**self).on_subscribe(subscription);
    }

    fn on_next(&self, item: T) {
        (**self).on_next(item);
    }

    fn on_error(&self, error: DocfluxError) {
        (**self).on_error(error);
    }

    fn on_complete(&self) {
        (**self).on_complete();
    }
}

/// A closure-backed [`Subscriber`].
///
/// `FnSubscriber` wires three closures to the item, error and completion
/// signals, and grants a fixed amount of demand inside `on_subscribe`. All
/// three closures are required; pass [`UNBOUNDED_DEMAND`] as the demand to
/// turn backpressure off.
///
/// [`UNBOUNDED_DEMAND`]: crate::reactive::UNBOUNDED_DEMAND
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::reactive::FnSubscriber;
///
/// collection.insert_one(doc! { name: "mongodb" }).subscribe(FnSubscriber::new(
///     1,
///     |ack| println!("insert {}", ack),
///     |err| eprintln!("insert failed: {}", err),
///     || println!("complete"),
/// ));
/// ```
pub struct FnSubscriber<T> {
    initial_demand: u64,
    on_next: Box<dyn Fn(T) + Send + Sync>,
    on_error: Box<dyn Fn(DocfluxError) + Send + Sync>,
    on_complete: Box<dyn Fn() + Send + Sync>,
}

impl<T> FnSubscriber<T> {
    /// Creates a subscriber that requests `initial_demand` items on
    /// subscription and forwards signals to the given closures.
    pub fn new(
        initial_demand: u64,
        on_next: impl Fn(T) + Send + Sync + 'static,
        on_error: impl Fn(DocfluxError) + Send + Sync + 'static,
        on_complete: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        FnSubscriber {
            initial_demand,
            on_next: Box::new(on_next),
            on_error: Box::new(on_error),
            on_complete: Box::new(on_complete),
        }
    }
}

impl<T> Subscriber<T> for FnSubscriber<T>
where
    T: Send,
{
    fn on_subscribe(&self, subscription: Subscription) {
        if self.initial_demand > 0 {
            subscription.request(self.initial_demand);
        }
    }

    fn on_next(&self, item: T) {
        (self.on_next)(item);
    }

    fn on_error(&self, error: DocfluxError) {
        (self.on_error)(error);
    }

    fn on_complete(&self) {
        (self.on_complete)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_fn_subscriber_requests_initial_demand() {
        let subscriber: FnSubscriber<i32> = FnSubscriber::new(7, |_| {}, |_| {}, || {});
        let subscription = Subscription::new();
        subscriber.on_subscribe(subscription.clone());
        assert_eq!(subscription.outstanding_demand(), 7);
    }

    #[test]
    fn test_fn_subscriber_zero_demand_requests_nothing() {
        let subscriber: FnSubscriber<i32> = FnSubscriber::new(0, |_| {}, |_| {}, || {});
        let subscription = Subscription::new();
        subscriber.on_subscribe(subscription.clone());
        assert_eq!(subscription.outstanding_demand(), 0);
    }

    #[test]
    fn test_fn_subscriber_forwards_signals() {
        let items = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicBool::new(false));
        let items_clone = items.clone();
        let completed_clone = completed.clone();

        let subscriber = FnSubscriber::new(
            1,
            move |item: i32| {
                items_clone.fetch_add(item as usize, Ordering::Relaxed);
            },
            |_| {},
            move || completed_clone.store(true, Ordering::Relaxed),
        );

        subscriber.on_next(21);
        subscriber.on_next(21);
        subscriber.on_complete();
        assert_eq!(items.load(Ordering::Relaxed), 42);
        assert!(completed.load(Ordering::Relaxed));
    }
}
