//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::response::Redirect;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware;
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::admin::{self, AdminState};
use super::routes::shop::{self, ShopState};
use super::routes::{attributes, health};
use crate::core::CoreApp;
use crate::core::config::AppConfig;
use crate::core::constants::{API_PREFIX, DEFAULT_BODY_LIMIT};
use crate::data::SqliteService;
use crate::data::traits::{CatalogRepository, WidgetRepository};
use crate::domain::slider::{NumericSlider, SliderWidget};

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;

        // Clone shutdown before moving app
        let shutdown = app.shutdown.clone();

        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);
        let router = build_router(app.database.clone(), &app.config);

        let listener = TcpListener::bind(addr).await?;
        tracing::debug!(%addr, "Listening");
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Assemble storefront, admin and JSON API routes over one database
pub fn build_router(database: Arc<SqliteService>, config: &AppConfig) -> Router {
    let catalog: Arc<dyn CatalogRepository> = Arc::new(database.clone());
    let widgets: Arc<dyn WidgetRepository> = Arc::new(database);
    let widget: Arc<dyn SliderWidget> = Arc::new(NumericSlider);

    let shop_routes = shop::routes(ShopState {
        catalog: catalog.clone(),
        widgets: widgets.clone(),
        widget: widget.clone(),
        slider: config.slider,
        shop: config.shop.clone(),
        assets: config.assets.clone(),
        debug: config.debug,
    });

    let admin_routes = admin::routes(AdminState {
        catalog: catalog.clone(),
        widgets,
        widget,
        assets: config.assets.clone(),
    });

    let api_routes = Router::new()
        .merge(health::routes(catalog.clone()))
        .merge(attributes::routes(catalog, config.slider));

    let shop_home = config.shop.base_path.clone();
    Router::new()
        .route(
            "/",
            get(move || async move { Redirect::temporary(&shop_home) }),
        )
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .route("/api/docs/", get(swagger_ui_html))
        .nest(API_PREFIX, api_routes)
        .merge(shop_routes)
        .merge(admin_routes)
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}
