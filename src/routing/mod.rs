//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (ordered route table)
//!     → matcher.rs (exact / prefix conditions)
//!     → Return: Destination (translation API, page, or asset)
//! ```
//!
//! # Design Decisions
//! - Route table is built once and immutable at runtime
//! - First match wins; anything unmatched is an asset
//! - The decision is the same in dev and prod; only the asset source differs

pub mod matcher;
pub mod router;

pub use router::{Destination, Dispatcher};
