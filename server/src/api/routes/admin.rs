//! Widget administration routes
//!
//! Plain HTML forms for creating, editing and deleting slider widget
//! instances. Successful submissions redirect back to the widget list.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use serde::Deserialize;
use validator::Validate;

use crate::api::extractors::ValidatedForm;
use crate::api::layout;
use crate::api::types::ApiError;
use crate::core::config::AssetsConfig;
use crate::data::traits::{CatalogRepository, WidgetRepository};
use crate::data::types::WidgetRow;
use crate::domain::slider::{SliderWidget, WidgetSettings};
use crate::utils::html::escape;

const WIDGETS_PATH: &str = "/admin/widgets";

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct AdminState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub widgets: Arc<dyn WidgetRepository>,
    pub widget: Arc<dyn SliderWidget>,
    pub assets: AssetsConfig,
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Submitted widget settings form
#[derive(Debug, Deserialize, Validate)]
pub struct WidgetFormRequest {
    #[serde(default)]
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 64, message = "Attribute must be 1-64 characters"))]
    pub attribute: String,
}

impl From<WidgetFormRequest> for WidgetSettings {
    fn from(req: WidgetFormRequest) -> Self {
        Self {
            title: req.title,
            attribute: req.attribute,
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes(state: AdminState) -> Router<()> {
    Router::new()
        .route(WIDGETS_PATH, get(list_widgets).post(create_widget))
        .route("/admin/widgets/new", get(new_widget_form))
        .route("/admin/widgets/{id}", get(edit_widget_form).post(update_widget))
        .route("/admin/widgets/{id}/delete", post(delete_widget))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_widgets(State(state): State<AdminState>) -> Result<Html<String>, ApiError> {
    let widgets = state
        .widgets
        .list_widgets()
        .await
        .map_err(ApiError::from_data)?;

    let mut body = String::from("<h1>Widgets</h1>\n");
    body.push_str(&format!(
        "<p><a class=\"button\" href=\"{}/new\">Add widget</a></p>\n",
        WIDGETS_PATH
    ));
    if widgets.is_empty() {
        body.push_str("<p>No widgets configured.</p>\n");
    } else {
        body.push_str("<table class=\"widgets\">\n<tr><th>Title</th><th>Attribute</th><th></th></tr>\n");
        for widget in &widgets {
            body.push_str(&format!(
                r#"<tr><td><a href="{path}/{id}">{title}</a></td><td>{attribute}</td><td><form method="post" action="{path}/{id}/delete"><button type="submit">Delete</button></form></td></tr>
"#,
                path = WIDGETS_PATH,
                id = escape(&widget.id),
                title = escape(&widget.title),
                attribute = escape(&widget.attribute_name),
            ));
        }
        body.push_str("</table>\n");
    }

    Ok(layout::page("Widgets", &state.assets.jquery_ui_version, "", &body))
}

async fn new_widget_form(State(state): State<AdminState>) -> Result<Html<String>, ApiError> {
    settings_page(&state, "Add widget", WIDGETS_PATH, None).await
}

async fn edit_widget_form(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let row = find_widget(&state, &id).await?;
    let action = format!("{}/{}", WIDGETS_PATH, row.id);
    let settings = WidgetSettings::from(&row);
    settings_page(&state, "Edit widget", &action, Some(&settings)).await
}

async fn create_widget(
    State(state): State<AdminState>,
    ValidatedForm(req): ValidatedForm<WidgetFormRequest>,
) -> Result<Redirect, ApiError> {
    ensure_attribute(&state, &req.attribute).await?;
    let settings = state.widget.on_save(req.into(), None);

    let row = state
        .widgets
        .create_widget(&settings.title, &settings.attribute)
        .await
        .map_err(ApiError::from_data)?;
    tracing::debug!(id = %row.id, attribute = %row.attribute_name, "Widget created");

    Ok(Redirect::to(WIDGETS_PATH))
}

async fn update_widget(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    ValidatedForm(req): ValidatedForm<WidgetFormRequest>,
) -> Result<Redirect, ApiError> {
    let old = WidgetSettings::from(&find_widget(&state, &id).await?);
    ensure_attribute(&state, &req.attribute).await?;
    let settings = state.widget.on_save(req.into(), Some(&old));

    state
        .widgets
        .update_widget(&id, &settings.title, &settings.attribute)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| widget_not_found(&id))?;
    tracing::debug!(id = %id, "Widget updated");

    Ok(Redirect::to(WIDGETS_PATH))
}

async fn delete_widget(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    let deleted = state
        .widgets
        .delete_widget(&id)
        .await
        .map_err(ApiError::from_data)?;
    if !deleted {
        return Err(widget_not_found(&id));
    }
    tracing::debug!(id = %id, "Widget deleted");

    Ok(Redirect::to(WIDGETS_PATH))
}

// ============================================================================
// Helpers
// ============================================================================

fn widget_not_found(id: &str) -> ApiError {
    ApiError::not_found("WIDGET_NOT_FOUND", format!("Widget not found: {}", id))
}

async fn find_widget(state: &AdminState, id: &str) -> Result<WidgetRow, ApiError> {
    state
        .widgets
        .get_widget(id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| widget_not_found(id))
}

async fn ensure_attribute(state: &AdminState, name: &str) -> Result<(), ApiError> {
    let exists = state
        .catalog
        .get_attribute(name)
        .await
        .map_err(ApiError::from_data)?
        .is_some();
    if !exists {
        return Err(ApiError::bad_request(
            "UNKNOWN_ATTRIBUTE",
            format!("Unknown attribute: {}", name),
        ));
    }
    Ok(())
}

async fn settings_page(
    state: &AdminState,
    title: &str,
    action: &str,
    instance: Option<&WidgetSettings>,
) -> Result<Html<String>, ApiError> {
    let attributes = state
        .catalog
        .list_attributes()
        .await
        .map_err(ApiError::from_data)?;

    let body = format!(
        r#"<h1>{title}</h1>
<form method="post" action="{action}">
{fields}<button type="submit" class="button">Save</button>
</form>
<p><a href="{back}">Back to widgets</a></p>
"#,
        title = escape(title),
        action = escape(action),
        fields = state.widget.render_config_form(instance, &attributes),
        back = WIDGETS_PATH,
    );
    Ok(layout::page(title, &state.assets.jquery_ui_version, "", &body))
}
