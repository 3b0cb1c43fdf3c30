pub mod manager;
pub mod models;
pub mod pg_store;
pub mod store;

pub use pg_store::PgListingStore;
pub use store::{ListingStore, RoomQuery, StoreError};
