//! Storefront page shell

use axum::response::Html;

use crate::core::constants::APP_NAME;
use crate::domain::slider::asset_tags;
use crate::utils::html::escape;

/// Wrap page content and sidebar widgets in a full HTML document
pub fn page(title: &str, jquery_ui_version: &str, sidebar: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} | {app}</title>
{assets}</head>
<body>
<main class="content">
{body}
</main>
<aside class="sidebar">
{sidebar}
</aside>
</body>
</html>"#,
        title = escape(title),
        app = APP_NAME,
        assets = asset_tags(jquery_ui_version),
        body = body,
        sidebar = sidebar,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_includes_assets_and_escaped_title() {
        let Html(html) = page("Bags & boxes", "1.13.2", "<p>side</p>", "<p>main</p>");
        assert!(html.contains("<title>Bags &amp; boxes | NumSlider</title>"));
        assert!(html.contains("/ui/1.13.2/jquery-ui.min.js"));
        assert!(html.contains("<p>side</p>"));
        assert!(html.contains("<p>main</p>"));
    }
}
