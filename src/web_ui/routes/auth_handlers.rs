//! Authentication route handlers for login and logout.

use axum::{
    extract::{Form, Query, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use tera::Context;

use super::utils::render_template;
use crate::api::session::{clear_session_cookie, session_cookie, session_token_from_headers};
use crate::api::{AppState, SessionUser};
use crate::error::ServerError;

/// Login form data
#[derive(serde::Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login page (GET)
pub async fn login_page(Query(query): Query<HashMap<String, String>>) -> Response {
    let mut context = Context::new();
    if let Some(error) = query.get("error") {
        context.insert("error", error);
    }
    if let Some(msg) = query.get("message") {
        context.insert("message", msg);
    }
    render_template("login.html", &context)
}

/// Login submit (POST)
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth.authenticate(&form.username, &form.password).await {
        Ok(user) => {
            state.sessions.cleanup_expired();
            let token = state.sessions.create(SessionUser {
                user_id: user.id,
                username: user.username.clone(),
            });
            tracing::info!("User '{}' logged in", user.username);
            (
                AppendHeaders([(header::SET_COOKIE, session_cookie(&token))]),
                Redirect::to("/batches"),
            )
                .into_response()
        }
        Err(ServerError::AuthFailed) => {
            tracing::debug!("Failed login for '{}'", form.username);
            Redirect::to("/login?error=Invalid+username+or+password").into_response()
        }
        Err(e) => {
            tracing::error!("Login failed: {:?}", e);
            Redirect::to("/login?error=Login+is+temporarily+unavailable").into_response()
        }
    }
}

/// Logout (GET)
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token_from_headers(&headers) {
        state.sessions.destroy(&token);
    }
    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
        Redirect::to("/login?message=You+have+been+logged+out"),
    )
        .into_response()
}
