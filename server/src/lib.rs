//! Marquee, a reporting backend for cinema ticket sales.
//!
//! The server loads five CSV relations into an immutable in-memory
//! snapshot, answers filter and aggregation queries against it, and
//! exposes the results over HTTP for the dashboard.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
