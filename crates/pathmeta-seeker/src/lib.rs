//! Seeker - query engine for path metadata records.
//!
//! A [`ResultSet`] holds records fetched from a store (string key/value maps,
//! usually carrying a `FilePath`) together with the provenance that produced
//! it. Every operation returns a new set:
//!
//! - **Predicates**: `<key> <operator> <value>` strings, combined with AND
//! - **Conditions**: comma-separated tokens matched against any value
//! - **Sorting**: stable multi-key sort in natural order
//! - **Combination**: `a + b` concatenates, `a | b` concatenates without
//!   duplicates
//!
//! # Quick Start
//!
//! ```rust
//! use pathmeta_seeker::{MetadataRecord, ResultSet};
//!
//! let set = ResultSet::fetched(
//!     "voice",
//!     vec![
//!         MetadataRecord::new().with("FilePath", "a/055-E.wav").with("age", "7"),
//!         MetadataRecord::new().with("FilePath", "a/056-E.wav").with("age", "10"),
//!         MetadataRecord::new().with("FilePath", "a/057-F.wav").with("age", "3"),
//!     ],
//!     "",
//! );
//!
//! let older = set.apply_predicates(&["age >= 7"]).unwrap();
//! assert_eq!(older.paths(), vec!["a/055-E.wav", "a/056-E.wav"]);
//! ```
//!
//! # Predicate Semantics
//!
//! | Operator | Operand | Matches when |
//! |----------|---------|--------------|
//! | `==`, `!=` | value | key present and values (un)equal |
//! | `>`, `>=`, `<`, `<=` | value | key present and natural order holds |
//! | `in`, `not in` | `[v1, v2]` | key present and value (not) listed |
//! | `is` | `None` | key absent |
//! | `is not` | `None` | key present |
//!
//! Values are compared as strings. Ordering operators use natural order, so
//! `"10" > "9"` and `"file10" > "file9"`.

mod error;
mod natural;
mod op;
mod ordering;
mod predicate;
mod provenance;
mod record;
mod result_set;

// Re-export public API
pub use error::{QueryError, Result};
pub use natural::natural_cmp;
pub use op::Op;
pub use ordering::{compare_records, Dir, OrderBy};
pub use predicate::{Operand, Predicate, NONE_MARKER};
pub use provenance::{Expr, Snapshot, Step};
pub use record::{FileEntry, MetadataRecord, FILE_PATH_KEY};
pub use result_set::ResultSet;
