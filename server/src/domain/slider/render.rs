//! HTML for the slider widget
//!
//! The markup mirrors the storefront price filter: a GET form with two
//! hidden bound inputs, a submit button, a live `Value: from &mdash; to` label, and
//! a jQuery UI range slider wired to all four.

use crate::core::constants::{JQUERY_CDN_BASE, JQUERY_VERSION};
use crate::utils::html::escape;

use super::bounds::FilterBound;
use super::params::{RequestParams, max_value_key, min_value_key};
use super::range::SliderScale;

/// Everything needed to draw one slider
#[derive(Debug, Clone)]
pub struct SliderView<'a> {
    pub title: Option<&'a str>,
    pub attribute: &'a str,
    pub scale: &'a SliderScale,
    pub current: FilterBound,
    /// Form action: the listing path without pagination segments
    pub action: String,
    /// Query parameters carried over as hidden fields
    pub preserved: RequestParams,
}

/// DOM id of the slider form for an attribute
pub fn element_id(attribute: &str) -> String {
    format!("numslider_{}", attribute)
}

/// Render the widget fragment
pub fn render_slider(view: &SliderView<'_>) -> String {
    let id = element_id(view.attribute);
    let min_key = min_value_key(view.attribute);
    let max_key = max_value_key(view.attribute);
    let range = view.scale.range;
    let current = view.current;

    let mut html = String::new();
    html.push_str(r#"<section class="widget numslider-widget">"#);

    if let Some(title) = view.title.filter(|t| !t.is_empty()) {
        html.push_str(&format!(
            r#"<h2 class="widget-title">{}</h2>"#,
            escape(title)
        ));
    }

    html.push_str(&format!(
        r#"<form id="{id}" class="numslider widget_price_filter" method="get" action="{action}">
<div class="numslider_wrapper price_slider_wrapper">
<div class="numslider_range price_slider"></div>
<div class="numslider_amount">
<input type="hidden" class="numslider_min" id="{min_key}" name="{min_key}" value="{cur_min}" data-min="{min}" placeholder="Min value" />
<input type="hidden" class="numslider_max" id="{max_key}" name="{max_key}" value="{cur_max}" data-max="{max}" placeholder="Max value" />
<button type="submit" class="button">Filter</button>
<div class="numslider_label price_label">Value: <span class="from">{cur_min}</span> &mdash; <span class="to">{cur_max}</span></div>
"#,
        id = escape(&id),
        action = escape(&view.action),
        min_key = escape(&min_key),
        max_key = escape(&max_key),
        cur_min = current.min_value,
        cur_max = current.max_value,
        min = range.min(),
        max = range.max(),
    ));

    for (key, value) in view.preserved.iter() {
        html.push_str(&format!(
            r#"<input type="hidden" name="{}" value="{}" />
"#,
            escape(key),
            escape(value)
        ));
    }

    html.push_str("<div class=\"clear\"></div>\n</div>\n</div>\n</form>\n");
    html.push_str(&slider_script(&id, view.scale, current));
    html.push_str("</section>");
    html
}

fn slider_script(id: &str, scale: &SliderScale, current: FilterBound) -> String {
    format!(
        r#"<script>
(function($) {{
  $(function() {{
    var $form = $(document.getElementById({id}));
    var $amount = $form.find(".numslider_amount");
    $form.find(".numslider_range").slider({{
      range: true,
      animate: true,
      min: {min},
      max: {max},
      step: {step},
      values: [{cur_min}, {cur_max}],
      slide: function(event, ui) {{
        $amount.find(".numslider_min").val(ui.values[0]);
        $amount.find(".numslider_label .from").html(ui.values[0]);
        $amount.find(".numslider_max").val(ui.values[1]);
        $amount.find(".numslider_label .to").html(ui.values[1]);
      }}
    }});
  }});
}})(jQuery);
</script>
"#,
        id = js_string(id),
        min = scale.range.min(),
        max = scale.range.max(),
        step = scale.step,
        cur_min = current.min_value,
        cur_max = current.max_value,
    )
}

/// JSON string literal that cannot close the surrounding script element
fn js_string(text: &str) -> String {
    serde_json::Value::from(text)
        .to_string()
        .replace("</", "<\\/")
}

/// Stylesheet and script tags for jQuery and the jQuery UI slider
pub fn asset_tags(jquery_ui_version: &str) -> String {
    let version = escape(jquery_ui_version);
    format!(
        r#"<link rel="stylesheet" href="{base}/ui/{version}/themes/smoothness/jquery-ui.css" />
<script src="{base}/jquery-{jquery}.min.js"></script>
<script src="{base}/ui/{version}/jquery-ui.min.js"></script>
"#,
        base = JQUERY_CDN_BASE,
        jquery = JQUERY_VERSION,
        version = version,
    )
}
