//! Spoilage inspection list. Details are fetched from `/spoilage/details`.

use axum::{http::StatusCode, response::Response};

use super::utils::{page_context, render_error, render_template};
use crate::api::RequestContext;

pub async fn spoilage_list(ctx: RequestContext) -> Response {
    let records = match ctx.inventory().list_spoilage(None).await {
        Ok(r) => r,
        Err(e) => return render_error(&ctx, &e.user_message(), StatusCode::INTERNAL_SERVER_ERROR),
    };

    let mut context = page_context(&ctx);
    context.insert("records", &records);
    render_template("spoilage.html", &context)
}
