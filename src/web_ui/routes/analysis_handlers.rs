//! Nutritional analysis entry form.

use axum::{
    extract::{Form, Query},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use super::utils::{encode_component, page_context, render_template_with_status};
use crate::api::{Flash, RequestContext};
use crate::error::Result;
use crate::inventory::{BatchCrop, NewAnalysis};
use crate::normalize;

#[derive(serde::Deserialize)]
pub struct AnalysisQuery {
    pub batch_id: Option<String>,
}

/// Submitted form values, kept as text so they can be echoed back on error
#[derive(serde::Deserialize, serde::Serialize, Default)]
#[serde(default)]
pub struct AnalysisForm {
    pub calories: String,
    pub protein: String,
    pub vitamins: String,
    pub minerals: String,
    pub day: String,
    pub month: String,
    pub year: String,
}

impl AnalysisForm {
    fn parse(&self, batch_id: &str, created_by: i32) -> Result<NewAnalysis> {
        Ok(NewAnalysis {
            batch_id: batch_id.to_string(),
            calories: normalize::parse_f64("Calories", &self.calories)?,
            protein: normalize::parse_f64("Protein", &self.protein)?,
            vitamins: normalize::required("Vitamins", &self.vitamins)?,
            minerals: normalize::required("Minerals", &self.minerals)?,
            day: normalize::parse_i32("Day", &self.day)?,
            month: normalize::parse_i32("Month", &self.month)?,
            year: normalize::parse_i32("Year", &self.year)?,
            created_by: Some(created_by),
        })
    }
}

/// Resolve the batch named in the query string, or redirect to the batch list with an error
async fn load_batch(ctx: &RequestContext, query: &AnalysisQuery) -> std::result::Result<BatchCrop, Response> {
    let Some(batch_id) = normalize::clean_opt(query.batch_id.as_deref()) else {
        ctx.flash(Flash::error("No batch selected"));
        return Err(Redirect::to("/batches").into_response());
    };

    ctx.inventory().batch_with_crop(&batch_id).await.map_err(|e| {
        ctx.flash(Flash::error(e.user_message()));
        Redirect::to("/batches").into_response()
    })
}

fn render_form(
    ctx: &RequestContext,
    batch: &BatchCrop,
    form: &AnalysisForm,
    error: Option<&str>,
    status: StatusCode,
) -> Response {
    let mut context = page_context(ctx);
    context.insert("batch", batch);
    context.insert("form", form);
    if let Some(error) = error {
        context.insert("error", error);
    }
    render_template_with_status("analysis_form.html", &context, status)
}

/// Analysis form (GET)
pub async fn analysis_form(ctx: RequestContext, Query(query): Query<AnalysisQuery>) -> Response {
    let batch = match load_batch(&ctx, &query).await {
        Ok(b) => b,
        Err(redirect) => return redirect,
    };

    render_form(&ctx, &batch, &AnalysisForm::default(), None, StatusCode::OK)
}

/// Analysis submit (POST)
pub async fn analysis_submit(
    ctx: RequestContext,
    Query(query): Query<AnalysisQuery>,
    Form(form): Form<AnalysisForm>,
) -> Response {
    let batch = match load_batch(&ctx, &query).await {
        Ok(b) => b,
        Err(redirect) => return redirect,
    };

    let result = match form.parse(&batch.batch_id, ctx.user.user_id) {
        Ok(analysis) => ctx.inventory().add_nutritional_analysis(&ctx.ids, analysis).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => {
            ctx.flash(Flash::success("Nutritional analysis added"));
            Redirect::to(&format!("/batches/{}", encode_component(&batch.batch_id))).into_response()
        }
        Err(e) => {
            tracing::warn!("Rejected analysis for batch {}: {}", batch.batch_id, e);
            let status = e.status();
            render_form(&ctx, &batch, &form, Some(&e.user_message()), status)
        }
    }
}
