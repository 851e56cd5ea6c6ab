//! Documentation pages and informational endpoints.

use std::path::PathBuf;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION};
use axum::http::{Request, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::config::DocsConfig;
use crate::http::server::AppState;

/// Path the OpenAPI document is served from.
pub const OPENAPI_PATH: &str = "/openapi.json";

const SWAGGER_UI_DIST: &str = "https://unpkg.com/swagger-ui-dist@5";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    pub service: String,
}

#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub api: String,
    pub version: String,
    pub openapi: String,
}

fn spec_path(docs: &DocsConfig) -> PathBuf {
    PathBuf::from(&docs.content_root).join(&docs.spec_file)
}

/// `GET /openapi.json`
///
/// The file is streamed from disk on every request, so edits show up without
/// a restart.
pub async fn openapi_document(State(state): State<AppState>, request: Request<Body>) -> Response {
    let docs = &state.docs;
    let path = spec_path(docs);

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    match response.status() {
        StatusCode::NOT_FOUND => {
            tracing::debug!(path = %path.display(), "OpenAPI document missing");
            (StatusCode::NOT_FOUND, "OpenAPI spec not found").into_response()
        }
        status if status.is_server_error() => {
            tracing::error!(path = %path.display(), status = %status, "Failed to read OpenAPI document");
            (StatusCode::INTERNAL_SERVER_ERROR, "OpenAPI spec unreadable").into_response()
        }
        _ => (
            [
                (CONTENT_TYPE, "application/json".to_string()),
                (CACHE_CONTROL, format!("public, max-age={}", docs.cache_max_age_secs)),
            ],
            response,
        )
            .into_response(),
    }
}

/// `GET /`
pub async fn redirect_to_index() -> impl IntoResponse {
    (StatusCode::FOUND, [(LOCATION, "/index.html")])
}

/// `GET /index.html`: Swagger UI shell pointed at the OpenAPI document.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.docs.title))
}

fn render_index(title: &str) -> String {
    let title = escape_html(title);
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="{SWAGGER_UI_DIST}/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="{SWAGGER_UI_DIST}/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({{
      url: "{OPENAPI_PATH}",
      dom_id: "#swagger-ui",
      deepLinking: true,
      docExpansion: "list",
      defaultModelsExpandDepth: 2,
      defaultModelExpandDepth: 2,
      displayRequestDuration: true,
      displayOperationId: true,
      filter: true,
      showExtensions: true,
      showCommonExtensions: true,
      tryItOutEnabled: true,
      persistAuthorization: true,
      requestSnippetsEnabled: true,
      supportedSubmitMethods: ["get", "post", "put", "delete", "patch"],
      syntaxHighlight: {{ activated: true, theme: "monokai" }}
    }});
  </script>
</body>
</html>
"##
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        service: state.docs.title.clone(),
    })
}

/// `GET /version`
pub async fn version(State(state): State<AppState>) -> Json<VersionInfo> {
    Json(VersionInfo {
        api: state.docs.api_name.clone(),
        version: state.docs.api_version.clone(),
        openapi: state.docs.openapi_version.clone(),
    })
}
