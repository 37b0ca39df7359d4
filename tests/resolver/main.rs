//! Conditional Update Integration Tests
//!
//! End-to-end behavior of partial updates guarded by an expected version,
//! through the public `Roster` facade.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test resolver
//! cargo test --test resolver concurrency::
//! ```

#[path = "../common/mod.rs"]
mod common;

mod concurrency;
mod conflicts;
mod fields;
mod logins;
mod properties;
mod retry;
