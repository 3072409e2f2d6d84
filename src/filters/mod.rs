//! Filter rules
//!
//! Users select records with short text commands such as `stars 6.3`,
//! `!length 90` or `collection #1`. A leading `!` negates the filter.
//!
//! # Structure
//!
//! - [`Registry`]: fixed catalog of filter kinds, parses commands
//! - [`FilterInstance`]: a compiled filter, a predicate or an unresolved collection request
//! - [`FilterList`]: the ordered list of active filters
//!
//! # Examples
//!
//! ```
//! use mapsel::filters::{FilterContext, FilterList, Registry};
//!
//! let ctx = FilterContext::now();
//! let mut filters = FilterList::new();
//! filters.push(Registry::parse_command("stars 6.3", &ctx).unwrap()).unwrap();
//! filters.push(Registry::parse_command("!status graveyard", &ctx).unwrap()).unwrap();
//! assert_eq!(filters.len(), 2);
//!
//! assert!(Registry::parse_command("stars lots", &ctx).is_err());
//! ```

pub mod error;
pub mod instance;
pub mod list;
mod parse;
pub mod template;

pub use error::FilterError;
pub use instance::{Criterion, FilterContext, FilterInstance, GroupRequest, Predicate};
pub use list::FilterList;
pub use template::{FilterTemplate, InputKind, Registry};
