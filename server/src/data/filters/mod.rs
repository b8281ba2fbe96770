//! Listing filter SQL
//!
//! Translates a [`FilterExpression`](crate::domain::slider::FilterExpression)
//! into a WHERE fragment over the `products` table.
//!
//! ## Usage
//!
//! ```no_run
//! use numslider_server::data::filters::{FilterSql, SqlParams};
//! use numslider_server::domain::slider::FilterExpression;
//!
//! let expr = FilterExpression::and(vec![FilterExpression::terms("weight", vec![2, 3])]);
//! let mut params = SqlParams::default();
//! let sql = expr.to_sql(&mut params);
//! ```

mod builder;

pub use builder::{FilterSql, SqlParams};
