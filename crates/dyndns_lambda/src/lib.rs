//! AWS-oriented adapters and handlers for dynamic DNS registration.
//!
//! This crate owns runtime integration details (the Lambda handler, the
//! pipeline runner, and the EC2/Route 53 adapter seams) on top of the event
//! contract and tag logic in `dyndns_core`.

pub mod adapters;
pub mod handlers;
