//! Language resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (path, Accept-Language)
//!     → resolver.rs (path prefix, root negotiation)
//!     → negotiate.rs (parse header, match supported languages)
//!     → Return: Redirect or resolved Language
//! ```
//!
//! # Design Decisions
//! - Closed language set; `en` is always the fallback
//! - Resolution is a pure function of (path, header)
//! - The resolved language is passed explicitly to the hydrator

pub mod language;
pub mod negotiate;
pub mod resolver;

pub use language::Language;
pub use resolver::{resolve, Resolution};
