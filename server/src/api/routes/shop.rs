//! Storefront HTML routes
//!
//! Listing pages (shop index and attribute term archives) run the product
//! query through the slider widget and render every configured widget
//! instance in the sidebar. Product detail pages are not listing pages.

use std::sync::Arc;

use axum::Router;
use axum::extract::{OriginalUri, Path, State};
use axum::response::Html;
use axum::routing::get;
use serde::Deserialize;

use crate::api::extractors::RawParams;
use crate::api::layout;
use crate::api::types::ApiError;
use crate::core::config::{AssetsConfig, ShopConfig, SliderConfig};
use crate::core::constants::PAGINATION_PARAMS;
use crate::data::filters::{FilterSql, SqlParams};
use crate::data::listing::ListingQuery;
use crate::data::traits::{CatalogRepository, WidgetRepository};
use crate::data::types::{AttributeRow, ProductRow, TermRow, WidgetRow, is_valid_attribute_name};
use crate::domain::slider::{
    FilterExpression, RenderContext, RequestParams, RequestScope, SliderWidget, WidgetSettings,
};
use crate::utils::html::escape;
use crate::utils::url::strip_page_segment;

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct ShopState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub widgets: Arc<dyn WidgetRepository>,
    pub widget: Arc<dyn SliderWidget>,
    pub slider: SliderConfig,
    pub shop: ShopConfig,
    pub assets: AssetsConfig,
    /// Log the SQL of every compiled slider filter
    pub debug: bool,
}

// ============================================================================
// Path parameters
// ============================================================================

#[derive(Debug, Deserialize)]
struct PagePath {
    page: u32,
}

#[derive(Debug, Deserialize)]
struct TermPath {
    attribute: String,
    term: i64,
}

#[derive(Debug, Deserialize)]
struct TermPagePath {
    attribute: String,
    term: i64,
    page: u32,
}

#[derive(Debug, Deserialize)]
struct ProductPath {
    id: i64,
}

/// Attribute term selected by a taxonomy archive URL
struct Archive {
    attribute: AttributeRow,
    term: TermRow,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes(state: ShopState) -> Router<()> {
    let base = state.shop.base_path.clone();
    Router::new()
        .route(&base, get(shop_index))
        .route(&format!("{}/page/{{page}}", base), get(shop_index_page))
        .route(&format!("{}/{{attribute}}/{{term}}", base), get(term_archive))
        .route(
            &format!("{}/{{attribute}}/{{term}}/page/{{page}}", base),
            get(term_archive_page),
        )
        .route("/product/{id}", get(product_detail))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn shop_index(
    State(state): State<ShopState>,
    OriginalUri(uri): OriginalUri,
    RawParams(params): RawParams,
) -> Result<Html<String>, ApiError> {
    render_listing(&state, uri.path(), params, None, None).await
}

async fn shop_index_page(
    State(state): State<ShopState>,
    OriginalUri(uri): OriginalUri,
    Path(path): Path<PagePath>,
    RawParams(params): RawParams,
) -> Result<Html<String>, ApiError> {
    render_listing(&state, uri.path(), params, Some(path.page), None).await
}

async fn term_archive(
    State(state): State<ShopState>,
    OriginalUri(uri): OriginalUri,
    Path(path): Path<TermPath>,
    RawParams(params): RawParams,
) -> Result<Html<String>, ApiError> {
    let archive = load_archive(&state, &path.attribute, path.term).await?;
    render_listing(&state, uri.path(), params, None, Some(archive)).await
}

async fn term_archive_page(
    State(state): State<ShopState>,
    OriginalUri(uri): OriginalUri,
    Path(path): Path<TermPagePath>,
    RawParams(params): RawParams,
) -> Result<Html<String>, ApiError> {
    let archive = load_archive(&state, &path.attribute, path.term).await?;
    render_listing(&state, uri.path(), params, Some(path.page), Some(archive)).await
}

async fn product_detail(
    State(state): State<ShopState>,
    OriginalUri(uri): OriginalUri,
    Path(path): Path<ProductPath>,
    RawParams(params): RawParams,
) -> Result<Html<String>, ApiError> {
    let product = state
        .catalog
        .get_product(path.id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| {
            ApiError::not_found("PRODUCT_NOT_FOUND", format!("Product not found: {}", path.id))
        })?;
    let terms = state
        .catalog
        .list_product_terms(product.id)
        .await
        .map_err(ApiError::from_data)?;

    let scope = RequestScope::from_parts(params, state.slider, Vec::new());
    let ctx = RenderContext {
        scope: &scope,
        is_listing_page: false,
        result_count: 0,
        path: uri.path(),
    };
    let sidebar = render_widgets(&state, &ctx, &load_widgets(&state).await);

    let mut body = format!("<h1>{}</h1>\n<dl class=\"attributes\">\n", escape(&product.name));
    for term in &terms {
        body.push_str(&format!(
            "<dt>{}</dt><dd><a href=\"{}/{}/{}\">{}</a></dd>\n",
            escape(&term.attribute_label),
            state.shop.base_path,
            escape(&term.attribute_name),
            term.term_id,
            escape(&term.term_name)
        ));
    }
    body.push_str("</dl>\n");

    Ok(layout::page(
        &product.name,
        &state.assets.jquery_ui_version,
        &sidebar,
        &body,
    ))
}

// ============================================================================
// Listing pipeline
// ============================================================================

async fn load_archive(
    state: &ShopState,
    attribute_name: &str,
    term_id: i64,
) -> Result<Archive, ApiError> {
    let not_found = || {
        ApiError::not_found(
            "TERM_NOT_FOUND",
            format!("No term {} for attribute {}", term_id, attribute_name),
        )
    };
    if !is_valid_attribute_name(attribute_name) {
        return Err(not_found());
    }

    let attribute = state
        .catalog
        .get_attribute(attribute_name)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(not_found)?;
    let term = state
        .catalog
        .list_terms(attribute_name)
        .await
        .map_err(ApiError::from_data)?
        .into_iter()
        .find(|t| t.id == term_id)
        .ok_or_else(not_found)?;

    Ok(Archive { attribute, term })
}

/// Widget instances for the sidebar; a failed load hides the widget area
async fn load_widgets(state: &ShopState) -> Vec<WidgetRow> {
    match state.widgets.list_widgets().await {
        Ok(widgets) => widgets,
        Err(e) => {
            tracing::warn!(error = %e, transient = e.is_transient(), "Failed to load widgets");
            Vec::new()
        }
    }
}

fn render_widgets(state: &ShopState, ctx: &RenderContext<'_>, widgets: &[WidgetRow]) -> String {
    widgets
        .iter()
        .filter_map(|row| state.widget.render(ctx, &WidgetSettings::from(row)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Page number from the first pagination query parameter that parses
fn page_from_params(params: &RequestParams) -> Option<u32> {
    PAGINATION_PARAMS
        .iter()
        .find_map(|key| params.get(key).and_then(|v| v.parse::<u32>().ok()))
        .filter(|page| *page > 0)
}

async fn render_listing(
    state: &ShopState,
    path: &str,
    params: RequestParams,
    path_page: Option<u32>,
    archive: Option<Archive>,
) -> Result<Html<String>, ApiError> {
    let widgets = load_widgets(state).await;
    let widget_attributes: Vec<&str> = widgets.iter().map(|w| w.attribute_name.as_str()).collect();

    let scope = RequestScope::load(
        state.catalog.as_ref(),
        params,
        state.slider,
        &widget_attributes,
    )
    .await
    .map_err(ApiError::from_data)?;

    let page = path_page
        .or_else(|| page_from_params(scope.params()))
        .unwrap_or(1);
    let mut query = ListingQuery::new(page, state.shop.per_page);
    if let Some(archive) = &archive {
        query.set_filter(FilterExpression::and(vec![FilterExpression::terms(
            archive.attribute.name.clone(),
            vec![archive.term.id],
        )]));
    }
    if let Some(expr) = state.widget.on_catalog_query(&scope, &query) {
        tracing::debug!(clauses = expr.clauses().len(), "Slider filter applied");
        if state.debug {
            let mut sql_params = SqlParams::default();
            let sql = expr.to_sql(&mut sql_params);
            tracing::info!(%sql, params = ?sql_params.values, "Compiled slider filter");
        }
        query.set_filter(expr);
    }

    let (products, total) = state
        .catalog
        .list_products(&query)
        .await
        .map_err(ApiError::from_data)?;
    query.set_found(total);

    let ctx = RenderContext {
        scope: &scope,
        is_listing_page: true,
        result_count: products.len() as u64,
        path,
    };
    let sidebar = render_widgets(state, &ctx, &widgets);

    let title = match &archive {
        Some(archive) => format!("{}: {}", archive.attribute.label, archive.term.name),
        None => "Shop".to_string(),
    };
    let listing_path = strip_page_segment(path);
    let body = listing_body(&title, &products, &query, &listing_path, scope.params());

    Ok(layout::page(
        &title,
        &state.assets.jquery_ui_version,
        &sidebar,
        &body,
    ))
}

fn listing_body(
    title: &str,
    products: &[ProductRow],
    query: &ListingQuery,
    listing_path: &str,
    params: &RequestParams,
) -> String {
    let total = query.found().unwrap_or(0);
    let mut html = format!("<h1>{}</h1>\n", escape(title));

    if products.is_empty() {
        html.push_str(
            "<p class=\"no-products-found\">No products were found matching your selection.</p>\n",
        );
        return html;
    }

    html.push_str(&format!(
        "<p class=\"result-count\">Showing {} of {} results</p>\n<ul class=\"products\">\n",
        products.len(),
        total
    ));
    for product in products {
        html.push_str(&format!(
            "<li class=\"product\"><a href=\"/product/{}\">{}</a></li>\n",
            product.id,
            escape(&product.name)
        ));
    }
    html.push_str("</ul>\n");

    let per_page = u64::from(query.per_page());
    let pages = total.div_ceil(per_page);
    if pages > 1 {
        let query_string = carried_query(params);
        html.push_str("<nav class=\"pagination\">\n");
        for page in 1..=pages {
            let href = page_href(listing_path, page, &query_string);
            if page == u64::from(query.page()) {
                html.push_str(&format!("<span class=\"current\">{}</span>\n", page));
            } else {
                html.push_str(&format!("<a href=\"{}\">{}</a>\n", escape(&href), page));
            }
        }
        html.push_str("</nav>\n");
    }
    html
}

/// Query string for pagination links: everything except page selectors
fn carried_query(params: &RequestParams) -> String {
    let carried = params.without(PAGINATION_PARAMS);
    let pairs: Vec<(&str, &str)> = carried.iter().collect();
    serde_urlencoded::to_string(pairs).unwrap_or_default()
}

fn page_href(listing_path: &str, page: u64, query_string: &str) -> String {
    let mut href = if page > 1 {
        format!("{}/page/{}", listing_path, page)
    } else {
        listing_path.to_string()
    };
    if !query_string.is_empty() {
        href.push('?');
        href.push_str(query_string);
    }
    href
}
