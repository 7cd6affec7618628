//! Gateway nodes: one module per operation plus the host catalog.
//!
//! Every node takes the shared [`ServiceContext`](crate::context::ServiceContext)
//! and a typed input, and returns a typed output or a
//! [`GatewayError`](crate::error::GatewayError). Nothing is retained
//! between calls.

pub mod browse;
pub mod catalog;
pub mod copy;
pub mod delete;
pub mod exec;
pub mod mkdir;
pub mod read;
pub mod write;
