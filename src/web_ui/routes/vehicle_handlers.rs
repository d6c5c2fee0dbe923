//! Vehicle management page. Results are reported inline; nothing redirects.

use axum::{
    extract::{Form, Query},
    http::StatusCode,
    response::Response,
};

use super::utils::{page_context, render_error, render_template_with_status};
use crate::api::{Flash, RequestContext};
use crate::error::Result;
use crate::inventory::NewVehicle;
use crate::normalize;

#[derive(serde::Deserialize)]
pub struct VehiclesQuery {
    /// Vehicle to delete
    pub delete: Option<String>,
}

#[derive(serde::Deserialize, serde::Serialize, Default)]
#[serde(default)]
pub struct VehicleForm {
    pub vehicle_type: String,
    pub license_plate_number: String,
    pub capacity: String,
}

impl VehicleForm {
    fn parse(&self) -> Result<NewVehicle> {
        Ok(NewVehicle {
            vehicle_type: normalize::required("Vehicle type", &self.vehicle_type)?,
            license_plate_number: normalize::required("License plate", &self.license_plate_number)?
                .to_uppercase(),
            capacity: normalize::parse_f64("Capacity", &self.capacity)?,
        })
    }
}

async fn render_vehicles(
    ctx: &RequestContext,
    message: Option<Flash>,
    form: &VehicleForm,
    status: StatusCode,
) -> Response {
    let vehicles = match ctx.inventory().list_vehicles().await {
        Ok(v) => v,
        Err(e) => return render_error(ctx, &e.user_message(), StatusCode::INTERNAL_SERVER_ERROR),
    };

    let mut context = page_context(ctx);
    context.insert("vehicles", &vehicles);
    context.insert("form", form);
    if let Some(message) = message {
        context.insert("message", &message);
    }
    render_template_with_status("vehicles.html", &context, status)
}

/// Vehicle list (GET), with `?delete=ID` removing an unassigned vehicle
pub async fn vehicles_page(ctx: RequestContext, Query(query): Query<VehiclesQuery>) -> Response {
    let (message, status) = match normalize::clean_opt(query.delete.as_deref()) {
        Some(vehicle_id) => match ctx.inventory().delete_vehicle(&vehicle_id).await {
            Ok(()) => (Some(Flash::success("Vehicle deleted successfully")), StatusCode::OK),
            Err(e) => (Some(Flash::error(e.user_message())), e.status()),
        },
        None => (None, StatusCode::OK),
    };

    render_vehicles(&ctx, message, &VehicleForm::default(), status).await
}

/// Add vehicle (POST)
pub async fn add_vehicle(ctx: RequestContext, Form(form): Form<VehicleForm>) -> Response {
    let result = match form.parse() {
        Ok(vehicle) => ctx.inventory().add_vehicle(&ctx.ids, vehicle).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(vehicle) => {
            let message = Flash::success(format!(
                "Vehicle {} added successfully",
                vehicle.license_plate_number
            ));
            render_vehicles(&ctx, Some(message), &VehicleForm::default(), StatusCode::OK).await
        }
        Err(e) => {
            let status = e.status();
            render_vehicles(&ctx, Some(Flash::error(e.user_message())), &form, status).await
        }
    }
}
