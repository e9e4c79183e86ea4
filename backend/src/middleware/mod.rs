//! Actix middleware shared by every inbound HTTP route.

pub mod trace;

pub use trace::Trace;
