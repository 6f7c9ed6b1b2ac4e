pub mod expander;
pub mod models;

pub use expander::QueryExpander;
pub use models::{ExpandedQuery, Query, QueryRoles, QueryWordRow};
