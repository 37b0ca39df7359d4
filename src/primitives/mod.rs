//! Primitive wrappers for the unified API.
//!
//! Each wrapper converts plain strings into validated identifiers, delegates
//! to the matching `roster-primitives` type, and converts errors to
//! [`crate::Error`].

mod logins;
mod records;

pub use logins::Logins;
pub use records::Records;
