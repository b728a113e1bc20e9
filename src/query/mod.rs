//! Boolean tag queries
//!
//! A query is a `", "` separated list of terms. The terms are OR'd together:
//! an entry is selected when any term is satisfied.
//!
//! | Term form | Satisfied when |
//! |---|---|
//! | `a \|\| b`, `a OR b` | any sub-term is an exact tag |
//! | `a && b`, `a AND b` | every sub-term is an exact tag |
//! | `text` | some tag contains `text` (case-insensitive) |
//!
//! An empty query selects everything. Evaluation yields a set of ids; hiding
//! the rest is up to whoever renders the result.
//!
//! # Examples
//! ```
//! use curatr::query::Query;
//!
//! let query = Query::parse("1girl && solo, smil");
//! let tags = vec!["1girl".to_string(), "smiling".to_string()];
//! assert!(query.matches(&tags));
//! ```

mod evaluator;
mod parser;

pub use evaluator::evaluate;
pub use parser::{Query, Term};
