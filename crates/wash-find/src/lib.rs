//! # wash-find
//!
//! Find entries in a resource tree with a `find(1)`-style expression. The
//! `-meta` primary compiles a compact command-line syntax into a
//! [`wash_rql`] query over each entry's metadata document.
//!
//! ```
//! use serde_json::json;
//! use wash_find::{MetaPrimary, Primary};
//! use wash_rql::{Entry, EntryPredicate};
//!
//! let tokens: Vec<String> = [".cpuOptions.coreCount", "+2"]
//!     .into_iter()
//!     .map(String::from)
//!     .collect();
//! let (predicate, rest) = MetaPrimary.parse(&tokens).unwrap();
//! assert!(rest.is_empty());
//!
//! let entry = Entry::new("i-1").with_meta(json!({"cpuOptions": {"coreCount": 4}}));
//! assert!(predicate.eval_entry(&entry));
//! ```

pub mod cli;
pub mod journal;
pub mod meta;
pub mod options;
pub mod primary;

pub use cli::{run, Cli};
pub use journal::{FileJournal, Journal};
pub use meta::MetaPrimary;
pub use options::{OptionFlags, Options};
pub use primary::Primary;
