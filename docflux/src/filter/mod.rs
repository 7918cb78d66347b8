//! Query filters for selecting documents from collections.
//!
//! This module provides the filtering API for querying documents. Filters can
//! be combined using logical operators and support comparison, existence and
//! pattern-matching operations.
//!
//! # Creating Filters
//!
//! Filters are created using the fluent API:
//! - `field("i").gt(50)` - comparison operators
//! - `field("name").eq("Alice")` - equality checks
//! - `exists("i")` - field presence
//! - `all()` - match all documents
//! - `field("i").gt(50).and(field("i").lte(53))` - logical AND
//!
//! # Examples
//!
//! ```rust,ignore
//! use docflux::filter::{all, and, exists, field};
//!
//! let range = field("i").gt(50).and(field("i").lte(53));
//! let any_i = exists("i");
//! let by_mail = field("email").regex(".*@example\\.com");
//!
//! let publisher = collection.find(range);
//! ```
//!
//! # Supported Operators
//!
//! - **Equality**: `eq`
//! - **Comparison**: `gt`, `gte`, `lt`, `lte`
//! - **Presence**: `exists`
//! - **Pattern**: `regex`
//! - **Logical**: `and`, `or`, `not`
//! - **Special**: `all` (match all)

mod filter;
mod fluent;

mod basic_filters;
mod logical_filters;
mod pattern_filters;
mod range_filters;

pub use basic_filters::*;
pub use filter::*;
pub use fluent::*;
pub use logical_filters::*;
pub(crate) use pattern_filters::*;
pub(crate) use range_filters::*;
