//! SQLite repositories
//!
//! Types (AttributeRow, TermRow, etc.) should be imported from `crate::data::types`.

pub mod attribute;
pub mod product;
pub mod term;
pub mod widget;

pub use attribute::{get_attribute, list_attributes, upsert_attribute};
pub use product::{assign_term, create_product, get_product, list_products};
pub use term::{get_term_by_name, list_product_terms, list_terms, upsert_term};
pub use widget::{create_widget, delete_widget, get_widget, list_widgets, update_widget};
