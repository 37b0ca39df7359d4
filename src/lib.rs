//! # Roster
//!
//! Embedded versioned record store for check-in and attendance data.
//!
//! Every record carries a version. Updates are partial (only the fields
//! named change, `null` removes a field) and conditional: they apply only if
//! the record is still at the version the caller last read, and they advance
//! the version by exactly one. A stale update fails with a conflict and
//! changes nothing.
//!
//! ## Quick Start
//!
//! ```
//! use roster::prelude::*;
//!
//! let db = Roster::ephemeral()?;
//!
//! db.posts.create_json("p1", r#"{"title":"A","draft":true}"#)?;
//! let post = db.posts.update_json(r#"{"id":"p1","expectedVersion":1,"draft":null}"#)?;
//! assert!(post.get("draft").is_none());
//!
//! db.logins.record("alice")?;
//! assert_eq!(db.logins.recent()?.len(), 1);
//!
//! db.close()?;
//! # Ok::<(), roster::Error>(())
//! ```
//!
//! ## Primitives
//!
//! - [`Records`] - Versioned records with optimistic partial updates
//! - [`Logins`] - Append-only login history

#![warn(missing_docs)]

mod database;
mod error;
mod primitives;
mod types;

pub mod prelude;

// Re-export main entry points
pub use database::{DatabaseStats, Roster, RosterBuilder, POSTS_TABLE};
pub use error::{Error, Result};

// Re-export primitives
pub use primitives::{Logins, Records};

// Re-export types
pub use types::*;
