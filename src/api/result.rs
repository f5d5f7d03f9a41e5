use actix_web::{HttpResponse, Responder, web};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::calculation::ContributionService;
use crate::calculation::service::fee_totals;
use crate::model::result::ContributionResult;

#[derive(Serialize, ToSchema)]
pub struct ResultListResponse {
    pub data: Vec<ContributionResult>,
    #[schema(example = 3)]
    pub total: usize,

    /// Sum of `company_fee` over the set
    #[schema(example = 3570.0, value_type = f64)]
    pub total_company_fee: Decimal,

    /// Mean `company_fee` per employee, 0 when the set is empty
    #[schema(example = 1190.0, value_type = f64)]
    pub average_company_fee: Decimal,
}

/// Current result set from the last successful calculation, with fee totals
#[utoipa::path(
    get,
    path = "/api/results",
    responses(
        (status = 200, body = ResultListResponse)
    ),
    tag = "Calculation"
)]
pub async fn list_results(
    service: web::Data<ContributionService>,
) -> actix_web::Result<impl Responder> {
    let data = service.results().await?;
    let totals = fee_totals(&data);

    Ok(HttpResponse::Ok().json(ResultListResponse {
        total: data.len(),
        total_company_fee: totals.total_company_fee,
        average_company_fee: totals.average_company_fee,
        data,
    }))
}
