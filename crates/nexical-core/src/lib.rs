#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core building blocks shared by the Nexical SDK crates.
//!
//! This crate holds the pieces of the SDK that do not touch the network:
//!
//! - **Query serialization** via [`query::build_query`], which flattens nested
//!   filter objects into `__`-delimited query parameters
//! - **JSON value helpers** in [`value`] that decide whether a value counts as
//!   present (truthiness) and how scalars are rendered into query strings
//!
//! # Examples
//!
//! ```rust
//! use nexical_core::prelude::*;
//! use serde_json::json;
//!
//! let query = build_query(&json!({
//!     "where": { "status": "active" },
//!     "limit": 10,
//! }))
//! .unwrap();
//!
//! assert_eq!(query, "?where__status=active&limit=10");
//! ```

pub mod query;
pub mod value;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use nexical_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::query::{QueryError, build_query, encode_query, flatten_query};
    pub use crate::value::{is_truthy, to_query_string};
}
