//! Slider widget capabilities
//!
//! The storefront drives a widget through four capabilities: drawing the
//! admin settings form, normalizing submitted settings, contributing a
//! filter to the product listing, and rendering on listing pages.

use crate::core::constants::{DEFAULT_WIDGET_TITLE, PAGINATION_PARAMS};
use crate::data::listing::ListingQuery;
use crate::data::types::{AttributeRow, WidgetRow};
use crate::utils::html::{escape, strip_tags};
use crate::utils::url::strip_page_segment;

use super::bounds::resolve_bounds;
use super::compiler::compile;
use super::expression::FilterExpression;
use super::params::{max_value_key, min_value_key};
use super::render::{SliderView, render_slider};
use super::scope::RequestScope;

/// Persisted settings of one widget instance
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetSettings {
    pub title: String,
    pub attribute: String,
}

impl From<&WidgetRow> for WidgetSettings {
    fn from(row: &WidgetRow) -> Self {
        Self {
            title: row.title.clone(),
            attribute: row.attribute_name.clone(),
        }
    }
}

/// Page facts the host supplies when rendering
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub scope: &'a RequestScope,
    /// Shop index or attribute term archive
    pub is_listing_page: bool,
    /// Number of products the listing query returned on this page
    pub result_count: u64,
    /// Path of the current page, used as the form action
    pub path: &'a str,
}

pub trait SliderWidget: Send + Sync {
    /// Admin form for editing an instance; `None` for a new instance
    fn render_config_form(
        &self,
        instance: Option<&WidgetSettings>,
        attributes: &[AttributeRow],
    ) -> String;

    /// Settings to persist for a submitted form
    fn on_save(&self, submitted: WidgetSettings, old: Option<&WidgetSettings>) -> WidgetSettings;

    /// Filter for the product listing, or `None` to leave the query as is
    fn on_catalog_query(
        &self,
        scope: &RequestScope,
        query: &ListingQuery,
    ) -> Option<FilterExpression>;

    /// Widget markup, or `None` when the widget is hidden on this page
    fn render(&self, ctx: &RenderContext<'_>, instance: &WidgetSettings) -> Option<String>;
}

/// The numeric range slider
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericSlider;

impl SliderWidget for NumericSlider {
    fn render_config_form(
        &self,
        instance: Option<&WidgetSettings>,
        attributes: &[AttributeRow],
    ) -> String {
        let title = instance
            .map(|i| i.title.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_WIDGET_TITLE);
        let selected = instance
            .map(|i| i.attribute.as_str())
            .filter(|a| !a.is_empty())
            .or_else(|| attributes.first().map(|a| a.name.as_str()));

        let mut html = format!(
            r#"<p>
<label for="widget-title">Title:</label>
<input class="widefat" id="widget-title" name="title" type="text" value="{}" />
<label for="widget-attribute">Attribute:</label>
<select class="widefat" id="widget-attribute" name="attribute">
"#,
            escape(title)
        );
        for attribute in attributes {
            let is_selected = selected == Some(attribute.name.as_str());
            html.push_str(&format!(
                "<option{} value=\"{}\">{}</option>\n",
                if is_selected { " selected" } else { "" },
                escape(&attribute.name),
                escape(&attribute.label)
            ));
        }
        html.push_str("</select>\n</p>\n");
        html
    }

    fn on_save(&self, submitted: WidgetSettings, old: Option<&WidgetSettings>) -> WidgetSettings {
        let mut settings = old.cloned().unwrap_or_default();
        settings.title = strip_tags(&submitted.title);
        settings.attribute = submitted.attribute;
        settings
    }

    fn on_catalog_query(
        &self,
        scope: &RequestScope,
        query: &ListingQuery,
    ) -> Option<FilterExpression> {
        compile(scope, query.filter().cloned())
    }

    fn render(&self, ctx: &RenderContext<'_>, instance: &WidgetSettings) -> Option<String> {
        if !ctx.is_listing_page {
            return None;
        }

        let attribute = instance.attribute.as_str();
        let params = ctx.scope.params();
        if ctx.result_count == 0 && !params.has_bounds_for(attribute) {
            tracing::trace!(attribute, "Slider hidden: no results and no active bounds");
            return None;
        }

        let Some(scale) = ctx.scope.scale(attribute) else {
            tracing::trace!(attribute, "Slider hidden: attribute has no range");
            return None;
        };

        let min_key = min_value_key(attribute);
        let max_key = max_value_key(attribute);
        let current = resolve_bounds(scale, params.get(&min_key), params.get(&max_key));

        let mut excluded: Vec<&str> = vec![min_key.as_str(), max_key.as_str()];
        excluded.extend_from_slice(PAGINATION_PARAMS);

        let view = SliderView {
            title: Some(instance.title.as_str()),
            attribute,
            scale,
            current,
            action: strip_page_segment(ctx.path),
            preserved: params.without(&excluded),
        };
        Some(render_slider(&view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SliderConfig;
    use crate::data::types::TermRow;
    use crate::domain::slider::params::RequestParams;
    use crate::domain::slider::scope::AttributeScale;

    fn weight_scope(pairs: &[(&str, &str)]) -> RequestScope {
        let attribute = AttributeRow {
            id: 1,
            name: "weight".to_string(),
            label: "Weight".to_string(),
        };
        let terms = ["1", "5", "9"]
            .iter()
            .enumerate()
            .map(|(i, name)| TermRow {
                id: i as i64 + 1,
                attribute_id: 1,
                name: name.to_string(),
            })
            .collect();
        let config = SliderConfig::default();
        RequestScope::from_parts(
            RequestParams::from_pairs(pairs.iter().copied()),
            config,
            [AttributeScale::new(attribute, terms, &config)],
        )
    }

    fn settings(attribute: &str) -> WidgetSettings {
        WidgetSettings {
            title: "Weight".to_string(),
            attribute: attribute.to_string(),
        }
    }

    fn ctx<'a>(scope: &'a RequestScope, listing: bool, count: u64) -> RenderContext<'a> {
        RenderContext {
            scope,
            is_listing_page: listing,
            result_count: count,
            path: "/shop/page/2",
        }
    }

    #[test]
    fn test_render_on_listing_page() {
        let scope = weight_scope(&[("orderby", "price"), ("paged", "2")]);
        let html = NumericSlider.render(&ctx(&scope, true, 3), &settings("weight")).unwrap();

        assert!(html.contains(r#"action="/shop""#));
        assert!(html.contains(r#"name="weight_min_value" value="1" data-min="1""#));
        assert!(html.contains(r#"name="orderby" value="price""#));
        assert!(!html.contains(r#"name="paged""#));
    }

    #[test]
    fn test_render_hidden_off_listing_pages() {
        let scope = weight_scope(&[]);
        assert!(NumericSlider.render(&ctx(&scope, false, 3), &settings("weight")).is_none());
    }

    #[test]
    fn test_render_hidden_without_results_or_bounds() {
        let scope = weight_scope(&[]);
        assert!(NumericSlider.render(&ctx(&scope, true, 0), &settings("weight")).is_none());
    }

    #[test]
    fn test_render_shown_without_results_when_filtering() {
        // Either bound key counts as an active filter
        let scope = weight_scope(&[("weight_max_value", "2")]);
        let html = NumericSlider.render(&ctx(&scope, true, 0), &settings("weight")).unwrap();
        assert!(html.contains(r#"name="weight_max_value" value="2""#));
    }

    #[test]
    fn test_render_hidden_for_unknown_attribute() {
        let scope = weight_scope(&[]);
        assert!(NumericSlider.render(&ctx(&scope, true, 3), &settings("size")).is_none());
    }

    #[test]
    fn test_on_save_strips_tags() {
        let saved = NumericSlider.on_save(
            WidgetSettings {
                title: "<b>Net</b> weight".to_string(),
                attribute: "weight".to_string(),
            },
            Some(&settings("size")),
        );
        assert_eq!(saved.title, "Net weight");
        assert_eq!(saved.attribute, "weight");
    }

    #[test]
    fn test_config_form_defaults() {
        let attributes = vec![
            AttributeRow {
                id: 2,
                name: "size".to_string(),
                label: "Size".to_string(),
            },
            AttributeRow {
                id: 1,
                name: "weight".to_string(),
                label: "Weight".to_string(),
            },
        ];

        let html = NumericSlider.render_config_form(None, &attributes);
        assert!(html.contains(r#"value="New title""#));
        assert!(html.contains(r#"<option selected value="size">Size</option>"#));
        assert!(html.contains(r#"<option value="weight">Weight</option>"#));

        let html = NumericSlider.render_config_form(Some(&settings("weight")), &attributes);
        assert!(html.contains(r#"value="Weight""#));
        assert!(html.contains(r#"<option selected value="weight">Weight</option>"#));
    }

    #[test]
    fn test_on_catalog_query_merges_listing_filter() {
        let scope = weight_scope(&[("weight_min_value", "2"), ("weight_max_value", "8")]);
        let mut query = ListingQuery::new(1, 12);
        query.set_filter(FilterExpression::and(vec![FilterExpression::terms(
            "color",
            vec![7],
        )]));

        let expr = NumericSlider.on_catalog_query(&scope, &query).unwrap();
        assert_eq!(
            expr,
            FilterExpression::and(vec![
                FilterExpression::terms("color", vec![7]),
                FilterExpression::terms("weight", vec![2]),
            ])
        );
    }
}
