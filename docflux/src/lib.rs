//! # docflux - Reactive Streams Client for Document Stores
//!
//! docflux exposes the operation set of a document store (insert, find,
//! update, delete) through a request-driven streaming protocol: every
//! operation is a cold publisher, every consumer grants demand explicitly,
//! and a producer never delivers more items than the consumer has requested.
//!
//! ## Key Features
//!
//! - **Demand-gated delivery**: producers suspend, without polling, while
//!   consumer demand is exhausted
//! - **Strict signal ordering**: `on_subscribe`, then items, then exactly
//!   one terminal signal per subscription
//! - **Cooperative cancellation**: `cancel()` stops delivery at the next
//!   attempt, with no trailing signals
//! - **Rich Querying**: filter API with comparison, existence, pattern and
//!   logical operators; multi-key sorting; field projection
//! - **Pluggable Storage**: the store is a provider trait; an in-memory
//!   backend ships in-tree and is the default
//! - **Operation Timeouts**: an optional watchdog fails starved
//!   subscriptions instead of leaving them suspended forever
//! - **Clean API**: PIMPL pattern provides stable, encapsulated interface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docflux::docflux::Docflux;
//! use docflux::filter::field;
//! use docflux::reactive::FnSubscriber;
//! use docflux::doc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Docflux::builder().open()?;
//! let collection = db.collection("test")?;
//!
//! collection.insert_one(doc! { name: "mongodb", count: 1 }).subscribe(
//!     FnSubscriber::new(
//!         1,
//!         |ack| println!("insert {}", ack),
//!         |err| eprintln!("insert failed: {}", err),
//!         || println!("complete"),
//!     ),
//! );
//!
//! collection.find(field("count").gte(1)).subscribe(FnSubscriber::new(
//!     100,
//!     |doc| println!("got document {}", doc),
//!     |err| eprintln!("find failed: {}", err),
//!     || println!("complete"),
//! ));
//!
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents, collections, and operation descriptors
//! - [`common`] - Common types, traits, and utilities
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Query filters and filter providers
//! - [`reactive`] - The subscription protocol core
//! - [`store`] - Storage backend abstractions and the memory backend
//! - [`docflux`] - Client entry point
//! - [`docflux_builder`] - Client builder
//! - [`docflux_config`] - Client configuration

use once_cell::sync::Lazy;

use crate::collection::SnowflakeIdGenerator;
use crate::common::Scheduler;

pub mod collection;
pub mod common;
pub mod docflux;
pub mod docflux_builder;
pub mod docflux_config;
pub mod errors;
pub mod filter;
pub mod reactive;
pub mod store;

pub use common::{atomic, Atomic, ReadExecutor, Value, WriteExecutor};

pub(crate) static ID_GENERATOR: Lazy<SnowflakeIdGenerator> =
    Lazy::new(SnowflakeIdGenerator::new);

pub(crate) static SCHEDULER: Lazy<Scheduler> = Lazy::new(Scheduler::new);

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    colog::init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generator_initializes() {
        let first = ID_GENERATOR.next_id();
        let second = ID_GENERATOR.next_id();
        assert!(second > first);
    }

    #[test]
    fn test_scheduler_initializes() {
        let _scheduler = &*SCHEDULER;
    }
}
