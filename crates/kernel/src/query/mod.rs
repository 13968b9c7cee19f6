//! Dynamic query composition, pagination, and aggregation.
//!
//! This is the search core: optional typed filters and a whitelisted sort
//! are composed into bounded, deterministic SQL; pagination metadata is
//! derived from a matching count query; grouped sums become
//! percentage-of-total statistics.

pub mod builder;
pub mod page;
pub mod sort;
pub mod stats;

pub use builder::SearchQuery;
pub use page::{Page, Pagination};
pub use sort::{SortDirection, SortSpec};
pub use stats::{GroupSum, StatRow, aggregate};
