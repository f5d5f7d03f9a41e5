use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One employee's computed contribution within a calculation run.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "run_id": "6f1c1f6e-3b7a-4a55-9d0e-3f5b6d2a9c10",
        "employee_name": "张三",
        "avg_salary": 8500.0,
        "contribution_base": 8500.0,
        "company_fee": 1190.0,
        "calculated_at": "2024-02-01T08:00:00Z"
    })
)]
pub struct ContributionResult {
    pub id: u64,

    /// Shared by every row written in the same run
    pub run_id: String,

    #[schema(example = "张三")]
    pub employee_name: String,

    #[schema(example = 8500.0, value_type = f64)]
    pub avg_salary: Decimal,

    #[schema(example = 8500.0, value_type = f64)]
    pub contribution_base: Decimal,

    #[schema(example = 1190.0, value_type = f64)]
    pub company_fee: Decimal,

    #[schema(value_type = String, format = DateTime)]
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContributionResult {
    pub employee_name: String,
    pub avg_salary: Decimal,
    pub contribution_base: Decimal,
    pub company_fee: Decimal,
}

impl From<&ContributionResult> for NewContributionResult {
    fn from(r: &ContributionResult) -> Self {
        Self {
            employee_name: r.employee_name.clone(),
            avg_salary: r.avg_salary,
            contribution_base: r.contribution_base,
            company_fee: r.company_fee,
        }
    }
}
