use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::calculation::ContributionService;
use crate::model::city::CitySelection;
use crate::model::result::ContributionResult;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CalculateQuery {
    /// Falls back to the configured default city
    #[schema(example = "佛山")]
    pub city: Option<String>,

    /// Most recent year when omitted
    #[schema(example = 2024)]
    pub year: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct CalculateResponse {
    #[schema(example = true)]
    pub success: bool,

    #[schema(example = "Calculated contributions for 3 employees")]
    pub message: String,

    pub data: Vec<ContributionResult>,

    #[schema(example = "2024-02-01T08:00:00+00:00")]
    pub timestamp: String,
}

/// Run the contribution calculation and replace the stored result set
#[utoipa::path(
    post,
    path = "/api/calculate",
    params(CalculateQuery),
    responses(
        (status = 200, description = "Calculation finished", body = CalculateResponse),
        (status = 404, description = "No standard for the selected city", body = Object, example = json!({
            "success": false,
            "message": "No contribution standard configured for city 佛山"
        })),
        (status = 422, description = "No salary data, or the city standard is invalid", body = Object, example = json!({
            "success": false,
            "message": "No salary data found, upload salary records first"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Calculation"
)]
pub async fn calculate(
    service: web::Data<ContributionService>,
    query: web::Query<CalculateQuery>,
) -> actix_web::Result<impl Responder> {
    let query = query.into_inner();
    let default = service.default_selection();
    // a pinned default year only applies to the default city
    let selection = match query.city {
        Some(city) => CitySelection::new(city, query.year),
        None => CitySelection::new(default.city.clone(), query.year.or(default.year)),
    };

    let results = service.calculate_for(&selection).await.map_err(|e| {
        error!(error = %e, city = %selection.city, "Contribution calculation failed");
        e
    })?;

    Ok(HttpResponse::Ok().json(CalculateResponse {
        success: true,
        message: format!("Calculated contributions for {} employees", results.len()),
        data: results,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// Usage hint for clients hitting the endpoint with GET
#[utoipa::path(
    get,
    path = "/api/calculate",
    responses(
        (status = 200, description = "Usage hint", body = Object, example = json!({
            "message": "Use POST to run the calculation",
            "endpoint": "/api/calculate",
            "method": "POST"
        }))
    ),
    tag = "Calculation"
)]
pub async fn calculate_usage(req: actix_web::HttpRequest) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Use POST to run the calculation",
        "endpoint": req.path(),
        "method": "POST"
    }))
}
