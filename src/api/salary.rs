use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::calculation::ContributionService;
use crate::model::salary::{NewSalaryRecord, SalaryRecord};

#[derive(Serialize, ToSchema)]
pub struct SalaryListResponse {
    pub data: Vec<SalaryRecord>,
    #[schema(example = 12)]
    pub total: usize,
}

/// Upload salary records (appended, never merged)
#[utoipa::path(
    post,
    path = "/api/salaries",
    request_body = Vec<NewSalaryRecord>,
    responses(
        (status = 201, description = "Salary records stored", body = SalaryListResponse),
        (status = 400, description = "A row failed validation", body = Object, example = json!({
            "success": false,
            "message": "Input validation failed: row 2: month must be YYYYMM or YYYY-MM, got '2024-13'"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Salary"
)]
pub async fn upload_salaries(
    service: web::Data<ContributionService>,
    payload: web::Json<Vec<NewSalaryRecord>>,
) -> actix_web::Result<impl Responder> {
    let data = service.import_salaries(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(SalaryListResponse {
        total: data.len(),
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/api/salaries",
    responses(
        (status = 200, body = SalaryListResponse)
    ),
    tag = "Salary"
)]
pub async fn list_salaries(
    service: web::Data<ContributionService>,
) -> actix_web::Result<impl Responder> {
    let data = service.salaries().await?;

    Ok(HttpResponse::Ok().json(SalaryListResponse {
        total: data.len(),
        data,
    }))
}
