use crate::api::calculate::{CalculateQuery, CalculateResponse};
use crate::api::city::CityListResponse;
use crate::api::result::ResultListResponse;
use crate::api::salary::SalaryListResponse;
use crate::model::city::{CityStandard, NewCityStandard};
use crate::model::result::ContributionResult;
use crate::model::salary::{NewSalaryRecord, SalaryRecord};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Social Insurance Contribution API",
        version = "0.1.0",
        description = r#"
## Employer Social Insurance & Housing Fund Contributions

Computes what a company owes for each employee from uploaded monthly salary
records and a city's contribution standard.

### 🔹 Workflow
1. **Upload salaries**: monthly pay per employee (`POST /salaries`)
2. **Upload city standards**: contribution band and employer rate per city and year (`POST /cities`)
3. **Calculate** (`POST /calculate`): each employee's average salary is clamped into the
   city band and multiplied by the rate; the stored result set is replaced as a whole
4. **Read results** (`GET /results`)

### 📦 Response Format
- JSON-based RESTful responses
- Amounts are rounded half-up to 2 decimal places

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::calculate::calculate,
        crate::api::calculate::calculate_usage,

        crate::api::salary::upload_salaries,
        crate::api::salary::list_salaries,

        crate::api::city::upload_cities,
        crate::api::city::list_cities,

        crate::api::result::list_results
    ),
    components(
        schemas(
            CalculateQuery,
            CalculateResponse,
            ContributionResult,
            ResultListResponse,
            SalaryRecord,
            NewSalaryRecord,
            SalaryListResponse,
            CityStandard,
            NewCityStandard,
            CityListResponse
        )
    ),
    tags(
        (name = "Calculation", description = "Contribution calculation APIs"),
        (name = "Salary", description = "Salary record upload APIs"),
        (name = "City", description = "City contribution standard APIs"),
    )
)]
pub struct ApiDoc;
