use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::calculation::ContributionService;
use crate::model::city::{CityStandard, NewCityStandard};

#[derive(Serialize, ToSchema)]
pub struct CityListResponse {
    pub data: Vec<CityStandard>,
    #[schema(example = 2)]
    pub total: usize,
}

/// Upload city contribution standards
#[utoipa::path(
    post,
    path = "/api/cities",
    request_body = Vec<NewCityStandard>,
    responses(
        (status = 201, description = "City standards stored", body = CityListResponse),
        (status = 400, description = "A row failed validation", body = Object, example = json!({
            "success": false,
            "message": "Input validation failed: row 0: base_min 30000 is greater than base_max 26421"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "City"
)]
pub async fn upload_cities(
    service: web::Data<ContributionService>,
    payload: web::Json<Vec<NewCityStandard>>,
) -> actix_web::Result<impl Responder> {
    let data = service.import_cities(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(CityListResponse {
        total: data.len(),
        data,
    }))
}

/// List city standards, newest year first
#[utoipa::path(
    get,
    path = "/api/cities",
    responses(
        (status = 200, body = CityListResponse)
    ),
    tag = "City"
)]
pub async fn list_cities(
    service: web::Data<ContributionService>,
) -> actix_web::Result<impl Responder> {
    let data = service.cities().await?;

    Ok(HttpResponse::Ok().json(CityListResponse {
        total: data.len(),
        data,
    }))
}
