//! Query engine: filter specification and named aggregations
//!
//! Every operation here is a pure function of its inputs: the engine
//! never mutates the snapshot it reads, and concurrent callers can
//! share one snapshot without locking.

pub mod aggregate;
pub mod spec;

pub use aggregate::{daily_revenue, repeat_customer_stats, top_n, GroupTotal, RepeatCustomerStats};
pub use spec::{filter, FilterSpec, QueryError};
