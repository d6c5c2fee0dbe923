//! Batch list and batch detail pages.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use super::utils::{page_context, render_error, render_template};
use crate::api::{Flash, RequestContext};

/// Batch list
pub async fn batches_list(ctx: RequestContext) -> Response {
    let batches = match ctx.inventory().list_batches().await {
        Ok(b) => b,
        Err(e) => return render_error(&ctx, &e.user_message(), StatusCode::INTERNAL_SERVER_ERROR),
    };

    let mut context = page_context(&ctx);
    context.insert("batches", &batches);
    render_template("batches.html", &context)
}

/// Batch detail: crop facts, nutritional analyses and spoilage inspections
pub async fn batch_detail(ctx: RequestContext, Path(batch_id): Path<String>) -> Response {
    let inventory = ctx.inventory();

    let batch = match inventory.batch_with_crop(&batch_id).await {
        Ok(b) => b,
        Err(e) => {
            ctx.flash(Flash::error(e.user_message()));
            return Redirect::to("/batches").into_response();
        }
    };

    let analyses = match inventory.analyses_for_batch(&batch.batch_id).await {
        Ok(a) => a,
        Err(e) => return render_error(&ctx, &e.user_message(), StatusCode::INTERNAL_SERVER_ERROR),
    };
    let spoilage_records = match inventory.list_spoilage(Some(&batch.batch_id)).await {
        Ok(s) => s,
        Err(e) => return render_error(&ctx, &e.user_message(), StatusCode::INTERNAL_SERVER_ERROR),
    };

    let mut context = page_context(&ctx);
    context.insert("batch", &batch);
    context.insert("analyses", &analyses);
    context.insert("spoilage_records", &spoilage_records);
    render_template("batch.html", &context)
}
