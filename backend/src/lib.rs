//! Backend library for the issue/answer workflow service.
//!
//! Users post issues, other users answer them, issue owners (or matching
//! company admins) accept answers and close issues, and accepted answers
//! award a fixed point reward. The crate's core is the transactional
//! workflow: every mutation runs as one snapshot-isolated document
//! transaction with optimistic conflict retry.

pub mod doc;
pub mod domain;
pub mod example_data;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
