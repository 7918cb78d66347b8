use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use docflux::collection::DocfluxCollection;
use docflux::doc;
use docflux::docflux::Docflux;
use docflux::errors::{DocfluxError, DocfluxResult};
use docflux::reactive::{Subscriber, Subscription};
use parking_lot::{Condvar, Mutex};

/// A fresh in-memory client plus helpers for seeding collections.
#[derive(Clone)]
pub struct TestContext {
    db: Docflux,
}

impl TestContext {
    pub fn db(&self) -> &Docflux {
        &self.db
    }

    /// Returns the named collection.
    pub fn collection(&self, name: &str) -> DocfluxCollection {
        self.db.collection(name).expect("collection must open")
    }

    /// Returns a collection seeded with documents `{i: 0}` .. `{i: count-1}`.
    pub fn seeded_collection(&self, name: &str, count: i32) -> DocfluxCollection {
        let collection = self.collection(name);
        let documents = (0..count).map(|i| doc! { i: i }).collect();
        let subscriber = CollectingSubscriber::subscribing(1);
        collection.insert_many(documents).subscribe(subscriber.clone());
        assert!(
            subscriber.await_terminal(Duration::from_secs(5)),
            "seeding {} documents into {} timed out",
            count,
            name
        );
        collection
    }
}

/// Creates a context backed by a fresh in-memory client.
pub fn create_test_context() -> DocfluxResult<TestContext> {
    let db = Docflux::builder().open()?;
    Ok(TestContext { db })
}

pub fn cleanup(ctx: TestContext) -> DocfluxResult<()> {
    ctx.db.close()
}

struct CollectedSignals<T> {
    subscription: Option<Subscription>,
    items: Vec<T>,
    error: Option<DocfluxError>,
    completions: u32,
    subscribe_count: u32,
    signals_after_terminal: u32,
}

impl<T> Default for CollectedSignals<T> {
    fn default() -> Self {
        CollectedSignals {
            subscription: None,
            items: Vec::new(),
            error: None,
            completions: 0,
            subscribe_count: 0,
            signals_after_terminal: 0,
        }
    }
}

impl<T> CollectedSignals<T> {
    fn is_terminal(&self) -> bool {
        self.completions > 0 || self.error.is_some()
    }
}

/// An instrumented subscriber that records the full signal sequence.
///
/// Besides collecting items and the terminal signal, it checks the protocol
/// invariants from the consumer's side: it flags overlapping signal
/// delivery and counts signals arriving after a terminal one. Tests create
/// it with [`CollectingSubscriber::subscribing`] and hand the `Arc` clone to
/// a publisher.
pub struct CollectingSubscriber<T> {
    initial_demand: u64,
    signals: Mutex<CollectedSignals<T>>,
    terminal: Condvar,
    in_signal: AtomicBool,
    overlap_detected: AtomicBool,
}

impl<T> CollectingSubscriber<T> {
    /// Creates a subscriber that requests `initial_demand` inside
    /// `on_subscribe`.
    pub fn subscribing(initial_demand: u64) -> Arc<Self> {
        Arc::new(CollectingSubscriber {
            initial_demand,
            signals: Mutex::new(CollectedSignals::default()),
            terminal: Condvar::new(),
            in_signal: AtomicBool::new(false),
            overlap_detected: AtomicBool::new(false),
        })
    }

    fn enter_signal(&self) {
        if self.in_signal.swap(true, Ordering::SeqCst) {
            self.overlap_detected.store(true, Ordering::SeqCst);
        }
    }

    fn leave_signal(&self) {
        self.in_signal.store(false, Ordering::SeqCst);
    }

    /// Blocks until a terminal signal arrives. Returns false on timeout.
    pub fn await_terminal(&self, timeout: Duration) -> bool {
        let mut signals = self.signals.lock();
        if signals.is_terminal() {
            return true;
        }
        !self
            .terminal
            .wait_while_for(&mut signals, |s| !s.is_terminal(), timeout)
            .timed_out()
    }

    /// Blocks until at least `count` items arrived. Returns false on
    /// timeout.
    pub fn await_items(&self, count: usize, timeout: Duration) -> bool {
        let mut signals = self.signals.lock();
        if signals.items.len() >= count {
            return true;
        }
        !self
            .terminal
            .wait_while_for(&mut signals, |s| s.items.len() < count, timeout)
            .timed_out()
    }

    /// Grants more demand on the recorded subscription.
    pub fn request_more(&self, n: u64) {
        let subscription = self.signals.lock().subscription.clone();
        subscription
            .expect("request_more before on_subscribe")
            .request(n);
    }

    /// Cancels the recorded subscription.
    pub fn cancel(&self) {
        let subscription = self.signals.lock().subscription.clone();
        subscription
            .expect("cancel before on_subscribe")
            .cancel();
    }

    /// The recorded subscription handle.
    pub fn subscription(&self) -> Subscription {
        self.signals
            .lock()
            .subscription
            .clone()
            .expect("subscription not yet delivered")
    }

    pub fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.signals.lock().items.clone()
    }

    pub fn item_count(&self) -> usize {
        self.signals.lock().items.len()
    }

    pub fn error(&self) -> Option<DocfluxError> {
        self.signals.lock().error.clone()
    }

    pub fn completions(&self) -> u32 {
        self.signals.lock().completions
    }

    pub fn subscribe_count(&self) -> u32 {
        self.signals.lock().subscribe_count
    }

    pub fn is_completed(&self) -> bool {
        self.signals.lock().completions > 0
    }

    pub fn is_errored(&self) -> bool {
        self.signals.lock().error.is_some()
    }

    /// Number of signals that arrived after a terminal signal. Must stay
    /// zero.
    pub fn signals_after_terminal(&self) -> u32 {
        self.signals.lock().signals_after_terminal
    }

    /// Whether two signals ever overlapped. Must stay false.
    pub fn overlap_detected(&self) -> bool {
        self.overlap_detected.load(Ordering::SeqCst)
    }
}

impl<T> Subscriber<T> for CollectingSubscriber<T>
where
    T: Send + Sync,
{
    fn on_subscribe(&self, subscription: Subscription) {
        self.enter_signal();
        {
            let mut signals = self.signals.lock();
            signals.subscribe_count += 1;
            signals.subscription = Some(subscription.clone());
        }
        if self.initial_demand > 0 {
            subscription.request(self.initial_demand);
        }
        self.leave_signal();
    }

    fn on_next(&self, item: T) {
        self.enter_signal();
        {
            let mut signals = self.signals.lock();
            if signals.is_terminal() {
                signals.signals_after_terminal += 1;
            }
            signals.items.push(item);
        }
        self.terminal.notify_all();
        self.leave_signal();
    }

    fn on_error(&self, error: DocfluxError) {
        self.enter_signal();
        {
            let mut signals = self.signals.lock();
            if signals.is_terminal() {
                signals.signals_after_terminal += 1;
            }
            signals.error = Some(error);
        }
        self.terminal.notify_all();
        self.leave_signal();
    }

    fn on_complete(&self) {
        self.enter_signal();
        {
            let mut signals = self.signals.lock();
            if signals.is_terminal() {
                signals.signals_after_terminal += 1;
            }
            signals.completions += 1;
        }
        self.terminal.notify_all();
        self.leave_signal();
    }
}
