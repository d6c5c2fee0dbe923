//! Spoilage detail lookup, returned as JSON for the spoilage pages' detail panel.

use axum::{extract::Query, Json};
use serde::Deserialize;

use super::RequestContext;
use crate::error::{Result, ServerError};
use crate::inventory::SpoilageDetail;

#[derive(Deserialize)]
pub struct SpoilageQuery {
    pub spoilage_id: Option<String>,
}

/// GET /spoilage/details?spoilage_id=...
pub async fn spoilage_details(
    ctx: RequestContext,
    Query(query): Query<SpoilageQuery>,
) -> Result<Json<SpoilageDetail>> {
    let spoilage_id = match query.spoilage_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => return Err(ServerError::InvalidRequest("Spoilage ID is required".to_string())),
    };

    Ok(Json(ctx.inventory().spoilage_detail(spoilage_id).await?))
}
