//! Domain logic for the storefront slider
//!
//! - `slider` - range extraction, bound resolution, filter compilation, and
//!   widget rendering

pub mod slider;
