//! Attribute and filter inspection API
//!
//! JSON views of what the slider computes for the current query string:
//! the per-attribute scale with resolved bounds, and the compiled listing
//! filter with its SQL rendering.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::{AttributePath, RawParams};
use crate::api::types::ApiError;
use crate::core::config::SliderConfig;
use crate::data::filters::{FilterSql, SqlParams};
use crate::data::traits::CatalogRepository;
use crate::data::types::AttributeRow;
use crate::domain::slider::{
    FilterExpression, RequestScope, compile, max_value_key, min_value_key, resolve_bounds,
};

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct AttributesApiState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub slider: SliderConfig,
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct AttributeDto {
    pub name: String,
    pub label: String,
    /// Taxonomy name (`pa_<name>`)
    pub taxonomy: String,
}

impl From<AttributeRow> for AttributeDto {
    fn from(row: AttributeRow) -> Self {
        Self {
            taxonomy: row.taxonomy(),
            name: row.name,
            label: row.label,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RangeDto {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub term_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BoundsDto {
    pub min_value: f64,
    pub max_value: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScaleResponse {
    pub attribute: String,
    /// Absent when the attribute's terms span no usable range
    pub range: Option<RangeDto>,
    /// Bounds resolved from the query string, absent without a range
    pub bounds: Option<BoundsDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FilterResponse {
    /// Compiled filter, absent when the query string selects no slider filter
    #[schema(value_type = Option<Object>)]
    pub filter: Option<FilterExpression>,
    /// WHERE fragment over `products`
    pub sql: Option<String>,
    /// Positional SQL parameters (term ids)
    pub params: Vec<i64>,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes(catalog: Arc<dyn CatalogRepository>, slider: SliderConfig) -> Router<()> {
    let state = AttributesApiState { catalog, slider };
    Router::new()
        .route("/attributes", get(list_attributes))
        .route("/attributes/{name}/scale", get(get_scale))
        .route("/filter", get(get_filter))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// List catalog attributes
#[utoipa::path(
    get,
    path = "/api/v1/attributes",
    tag = "attributes",
    responses(
        (status = 200, description = "All attributes", body = Vec<AttributeDto>)
    )
)]
pub async fn list_attributes(
    State(state): State<AttributesApiState>,
) -> Result<Json<Vec<AttributeDto>>, ApiError> {
    let rows = state
        .catalog
        .list_attributes()
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(rows.into_iter().map(AttributeDto::from).collect()))
}

/// Slider scale of an attribute and the bounds selected by the query string
#[utoipa::path(
    get,
    path = "/api/v1/attributes/{name}/scale",
    tag = "attributes",
    params(
        ("name" = String, Path, description = "Attribute name")
    ),
    responses(
        (status = 200, description = "Attribute scale", body = ScaleResponse),
        (status = 400, description = "Invalid attribute name"),
        (status = 404, description = "Attribute not found")
    )
)]
pub async fn get_scale(
    State(state): State<AttributesApiState>,
    path: AttributePath,
    RawParams(params): RawParams,
) -> Result<Json<ScaleResponse>, ApiError> {
    let name = path.name.as_str();
    let scope = RequestScope::load(state.catalog.as_ref(), params, state.slider, &[name])
        .await
        .map_err(ApiError::from_data)?;

    let entry = scope.attribute(name).ok_or_else(|| {
        ApiError::not_found("ATTRIBUTE_NOT_FOUND", format!("Attribute not found: {}", name))
    })?;

    let (range, bounds) = match &entry.scale {
        Some(scale) => {
            let bound = resolve_bounds(
                scale,
                scope.params().get(&min_value_key(name)),
                scope.params().get(&max_value_key(name)),
            );
            (
                Some(RangeDto {
                    min: scale.range.min(),
                    max: scale.range.max(),
                    step: scale.step.get(),
                    term_count: scale.term_count,
                }),
                Some(BoundsDto {
                    min_value: bound.min_value,
                    max_value: bound.max_value,
                }),
            )
        }
        None => (None, None),
    };

    Ok(Json(ScaleResponse {
        attribute: entry.attribute.name.clone(),
        range,
        bounds,
    }))
}

/// Filter compiled from the slider bounds in the query string
#[utoipa::path(
    get,
    path = "/api/v1/filter",
    tag = "filter",
    responses(
        (status = 200, description = "Compiled filter", body = FilterResponse)
    )
)]
pub async fn get_filter(
    State(state): State<AttributesApiState>,
    RawParams(params): RawParams,
) -> Result<Json<FilterResponse>, ApiError> {
    let scope = RequestScope::load(state.catalog.as_ref(), params, state.slider, &[])
        .await
        .map_err(ApiError::from_data)?;

    let filter = compile(&scope, None);
    let mut sql_params = SqlParams::default();
    let sql = filter.as_ref().map(|expr| expr.to_sql(&mut sql_params));

    Ok(Json(FilterResponse {
        filter,
        sql,
        params: sql_params.values,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::core::import::import_catalog;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::schema::SCHEMA;
    use crate::data::types::CatalogSeed;

    async fn router() -> Router<()> {
        let pool = sqlx::SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(SCHEMA).execute(&pool).await.unwrap();
        let database = Arc::new(SqliteService::from_pool(pool));
        let seed: CatalogSeed = serde_json::from_str(
            r#"{"attributes": [
                {"name": "weight", "terms": ["0", "10", "20", "30", "40", "50"]},
                {"name": "colour", "terms": ["red", "blue"]}
            ]}"#,
        )
        .unwrap();
        import_catalog(&database, &seed).await.unwrap();
        routes(Arc::new(database), SliderConfig::default())
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router()
            .await
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_list_attributes() {
        let (status, json) = get_json("/attributes").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"weight"));
        assert!(json[0]["taxonomy"].as_str().unwrap().starts_with("pa_"));
    }

    #[tokio::test]
    async fn test_scale_with_bounds() {
        let (status, json) = get_json("/attributes/weight/scale?weight_min_value=23").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["range"]["min"], 0.0);
        assert_eq!(json["range"]["max"], 50.0);
        assert_eq!(json["range"]["step"], 8.0);
        assert_eq!(json["bounds"]["min_value"], 16.0);
        assert_eq!(json["bounds"]["max_value"], 50.0);
    }

    #[tokio::test]
    async fn test_scale_without_range() {
        let (status, json) = get_json("/attributes/colour/scale").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["range"].is_null());
        assert!(json["bounds"].is_null());
    }

    #[tokio::test]
    async fn test_scale_unknown_attribute() {
        let (status, json) = get_json("/attributes/size/scale").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "ATTRIBUTE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_filter_compiles_bounds() {
        let (status, json) =
            get_json("/filter?weight_min_value=15&weight_max_value=35").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["filter"]["relation"], "AND");
        assert_eq!(json["filter"]["children"][0]["attribute"], "weight");
        assert!(json["sql"].as_str().unwrap().contains("product_terms"));
        // 15 snaps down to 8, 35 up to 40: terms 10, 20, 30, 40
        assert_eq!(json["params"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_filter_absent_without_keys() {
        let (status, json) = get_json("/filter?orderby=price").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["filter"].is_null());
        assert!(json["sql"].is_null());
    }
}
