//! The subscription protocol core.
//!
//! Every store operation in this crate is exposed as a cold publisher that
//! delivers its results through a demand-gated subscription:
//!
//! - a consumer implements [`Subscriber`] (or uses [`FnSubscriber`]) and
//!   subscribes to a publisher;
//! - the publisher constructs one [`Subscription`] per subscribe call,
//!   delivers `on_subscribe`, and spawns the operation's executor on a
//!   dedicated producer thread;
//! - the producer delivers an item only after claiming one unit of demand
//!   from the subscription's ledger, suspending (without polling) while the
//!   consumer has not requested anything;
//! - exactly one terminal signal ends the subscription (`on_complete` or
//!   `on_error`), and a cancelled subscription receives none.
//!
//! Signals to one consumer never overlap: `on_subscribe` is issued on the
//! subscribing thread before the producer starts, and everything after it is
//! issued sequentially from the producer thread.

mod demand;
mod emitter;
mod publisher;
mod subscriber;
mod subscription;

pub use demand::UNBOUNDED_DEMAND;
pub(crate) use emitter::SignalEmitter;
pub use publisher::{DocumentPublisher, OperationPublisher};
pub use subscriber::{FnSubscriber, Subscriber};
pub use subscription::Subscription;
