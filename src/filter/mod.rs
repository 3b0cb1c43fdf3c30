pub mod error;
pub mod listing_filter;
pub mod sql;
pub mod visibility;

pub use error::FilterError;
pub use listing_filter::{coerce_bool, ListParams, ListingFilter};
pub use sql::{SqlParam, SqlPredicate};
pub use visibility::Audience;
