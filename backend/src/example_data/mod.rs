//! Example data seeded at startup for development environments.
//!
//! Signup, approval, and organization management belong to external
//! collaborators; during development this module stands in for them by
//! seeding a small set of organizations, user profiles, and issues, plus the
//! static tokens that resolve to the seeded subjects.

pub mod config;
mod seed;

pub use config::ExampleDataSettings;
pub use seed::{ExampleDataSeedOutcome, demo_tokens, seed_example_data};
