//! Shared utilities and helper functions for web UI.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tera::Context;

use crate::api::RequestContext;
use crate::web_ui::templates;

/// Helper to render a template
pub fn render_template(name: &str, context: &Context) -> Response {
    render_template_with_status(name, context, StatusCode::OK)
}

/// Render a template with a non-200 status (e.g. a form re-rendered after an error)
pub fn render_template_with_status(name: &str, context: &Context, status: StatusCode) -> Response {
    match templates::render(name, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Helper to render an error page
pub fn render_error(ctx: &RequestContext, message: &str, status: StatusCode) -> Response {
    let mut context = page_context(ctx);
    context.insert("message", message);

    match templates::render("error.html", &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(_) => (status, message.to_string()).into_response(),
    }
}

/// Base context for a logged-in page: current user plus any pending flash message
pub fn page_context(ctx: &RequestContext) -> Context {
    let mut context = Context::new();
    context.insert("current_user", &ctx.user);
    if let Some(flash) = ctx.take_flash() {
        context.insert("flash", &flash);
    }
    context
}

/// Percent-encode a value for use as a single URL path segment or query value
pub fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("BATCH-2024-001"), "BATCH-2024-001");
        assert_eq!(encode_component("lot 7/a"), "lot%207%2Fa");
        assert_eq!(encode_component("é"), "%C3%A9");
    }
}
