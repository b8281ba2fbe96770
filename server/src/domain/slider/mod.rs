//! Numeric range slider
//!
//! - `numeric` - decimal and fraction parsing of term labels
//! - `range` - range and step extraction per attribute
//! - `bounds` - request bounds snapped to the step grid
//! - `params` - query parameters and bound key pairing
//! - `expression` - term filter tree and its merge rules
//! - `scope` - per-request attribute data shared by the stages below
//! - `compiler` - request bounds to listing filter
//! - `render` - widget markup
//! - `widget` - the capabilities the storefront drives

pub mod bounds;
pub mod compiler;
pub mod expression;
pub mod numeric;
pub mod params;
pub mod range;
pub mod render;
pub mod scope;
pub mod widget;

pub use bounds::{FilterBound, resolve_bounds};
pub use compiler::compile;
pub use expression::{FilterExpression, Relation, TermClause};
pub use numeric::parse_numeric;
pub use params::{KeyParsing, RequestParams, SliderKeys, SliderPair, max_value_key, min_value_key};
pub use range::{ExtremaTracking, Range, ScaleError, SliderScale, Step, derive_step, extract_range};
pub use render::asset_tags;
pub use scope::{AttributeScale, RequestScope};
pub use widget::{NumericSlider, RenderContext, SliderWidget, WidgetSettings};
