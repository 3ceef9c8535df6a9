// src/presentation/http/controllers/callback.rs
use crate::application::dto::CallbackParams;
use crate::presentation::http::controllers::redirect_no_store;
use crate::presentation::http::error::status_for;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::warn;

/// `GET /oauth/callback` — the upstream provider's redirect target.
///
/// The recipient is a user agent mid-redirect, not a programmatic client,
/// so failures render a minimal HTML page instead of JSON and nothing is
/// forwarded to the client's redirect_uri on error.
pub async fn callback(
    Extension(state): Extension<HttpState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    if let Some(error) = params.error.as_deref() {
        warn!(error, "upstream provider reported an authorization error");
        let description = params
            .error_description
            .as_deref()
            .unwrap_or("Authorization failed");
        return failure_page(StatusCode::BAD_REQUEST, error, description);
    }

    match state
        .services
        .flow()
        .complete_callback(params.code.as_deref(), params.state.as_deref())
        .await
    {
        Ok(location) => redirect_no_store(&location),
        Err(err) => {
            warn!(error = %err, "callback handling failed");
            failure_page(status_for(&err), err.oauth_code(), &err.to_string())
        }
    }
}

fn failure_page(status: StatusCode, error: &str, description: &str) -> Response {
    let body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Authorization Error</title>
  <style>
    body {{
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      max-width: 600px;
      margin: 100px auto;
      padding: 20px;
      text-align: center;
    }}
    h1 {{ color: #e53e3e; }}
    p {{ color: #4a5568; margin: 20px 0; }}
    code {{
      background: #f7fafc;
      padding: 4px 8px;
      border-radius: 4px;
      font-size: 14px;
    }}
  </style>
</head>
<body>
  <h1>Authorization Failed</h1>
  <p>{description}</p>
  <p>Error code: <code>{error}</code></p>
  <p>Please close this window and try again.</p>
</body>
</html>
"#,
        description = escape_html(description),
        error = escape_html(error),
    );

    (status, Html(body)).into_response()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}
