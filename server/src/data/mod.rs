//! Data storage layer
//!
//! - `sqlite` - Embedded catalog and widget store
//! - `filters` - Listing filter to SQL translation
//! - `listing` - Listing query passed between the storefront and the store
//! - `types` - Row and seed types shared by repositories and handlers
//! - `traits` - Repository traits the handlers depend on
//! - `error` - Unified data layer error

pub mod error;
pub mod filters;
pub mod listing;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use listing::{ListingQuery, QueryVar};
pub use sqlite::SqliteService;
pub use traits::{CatalogRepository, WidgetRepository};
