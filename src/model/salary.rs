use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// Widths of the `salaries` columns.
pub const EMPLOYEE_ID_MAX_CHARS: usize = 64;
pub const EMPLOYEE_NAME_MAX_CHARS: usize = 128;

/// Largest value a `DECIMAL(14, 2)` column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Rejects amounts a `DECIMAL(14, 2)` column would round or overflow.
pub fn check_money(field: &str, value: Decimal) -> Result<()> {
    if value.normalize().scale() > 2 {
        return Err(Error::Validation(format!(
            "{} must have at most 2 decimal places, got {}",
            field, value
        )));
    }
    if value.abs() > MAX_AMOUNT {
        return Err(Error::Validation(format!(
            "{} must not exceed {}, got {}",
            field, MAX_AMOUNT, value
        )));
    }
    Ok(())
}

pub fn check_length(field: &str, value: &str, max_chars: usize) -> Result<()> {
    if value.chars().count() > max_chars {
        return Err(Error::Validation(format!(
            "{} must be at most {} characters",
            field, max_chars
        )));
    }
    Ok(())
}

/// One month of pay for one employee, as uploaded. Never mutated after insert.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "EMP-001",
        "employee_name": "张三",
        "month": "202401",
        "salary_amount": 8500.0,
        "created_at": "2024-02-01T08:00:00Z"
    })
)]
pub struct SalaryRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "张三")]
    pub employee_name: String,

    /// Year-month, `YYYYMM`
    #[schema(example = "202401")]
    pub month: String,

    #[schema(example = 8500.0, value_type = f64)]
    pub salary_amount: Decimal,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewSalaryRecord {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "张三")]
    pub employee_name: String,

    /// `YYYYMM`; `YYYY-MM` is accepted and normalised
    #[schema(example = "2024-01")]
    pub month: String,

    #[schema(example = 8500.0, value_type = f64)]
    pub salary_amount: Decimal,
}

impl NewSalaryRecord {
    /// Checks required fields and returns the record with its month in `YYYYMM` form.
    pub fn validated(mut self) -> Result<Self> {
        if self.employee_id.trim().is_empty() {
            return Err(Error::Validation("employee_id is required".into()));
        }
        if self.employee_name.trim().is_empty() {
            return Err(Error::Validation("employee_name is required".into()));
        }
        check_length("employee_id", &self.employee_id, EMPLOYEE_ID_MAX_CHARS)?;
        check_length("employee_name", &self.employee_name, EMPLOYEE_NAME_MAX_CHARS)?;
        if self.salary_amount < Decimal::ZERO {
            return Err(Error::Validation(format!(
                "salary_amount must not be negative, got {}",
                self.salary_amount
            )));
        }
        check_money("salary_amount", self.salary_amount)?;
        self.month = normalize_month(&self.month)?;
        Ok(self)
    }
}

/// `2024-1`, `2024-01` and `202401` all become `202401`.
pub fn normalize_month(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let invalid = || Error::Validation(format!("month must be YYYYMM or YYYY-MM, got '{}'", raw));

    let (year, month) = match raw.split_once('-') {
        Some((y, m)) => (y, m),
        None if raw.len() == 6 && raw.is_ascii() => raw.split_at(4),
        None => return Err(invalid()),
    };

    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    Ok(format!("{}{:02}", year, month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(month: &str, amount: Decimal) -> NewSalaryRecord {
        NewSalaryRecord {
            employee_id: "EMP-001".into(),
            employee_name: "张三".into(),
            month: month.into(),
            salary_amount: amount,
        }
    }

    #[test]
    fn test_normalize_month_accepts_dashed_and_compact_forms() {
        assert_eq!(normalize_month("202401").unwrap(), "202401");
        assert_eq!(normalize_month("2024-01").unwrap(), "202401");
        assert_eq!(normalize_month("2024-1").unwrap(), "202401");
        assert_eq!(normalize_month(" 2024-12 ").unwrap(), "202412");
    }

    #[test]
    fn test_normalize_month_rejects_garbage() {
        for raw in ["", "2024", "202413", "2024-00", "24-01", "abcd01", "2024-1x"] {
            assert!(normalize_month(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn test_validated_normalizes_month() {
        let rec = record("2024-3", dec!(1000)).validated().unwrap();
        assert_eq!(rec.month, "202403");
    }

    #[test]
    fn test_validated_rejects_negative_amount_and_blank_name() {
        assert!(matches!(
            record("202401", dec!(-1)).validated(),
            Err(Error::Validation(_))
        ));

        let mut blank = record("202401", dec!(1));
        blank.employee_name = "  ".into();
        assert!(blank.validated().is_err());

        assert!(record("202401", Decimal::ZERO).validated().is_ok());
    }

    #[test]
    fn test_validated_rejects_amounts_the_column_cannot_hold() {
        let err = record("202401", dec!(8500.555)).validated().unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("2 decimal places")));

        // trailing zeros are not extra precision
        assert!(record("202401", dec!(8500.500)).validated().is_ok());

        assert!(record("202401", MAX_AMOUNT).validated().is_ok());
        assert_eq!(MAX_AMOUNT, dec!(999999999999.99));
        assert!(record("202401", dec!(1000000000000)).validated().is_err());
    }

    #[test]
    fn test_validated_rejects_overlong_identifiers() {
        let mut long_name = record("202401", dec!(1));
        long_name.employee_name = "名".repeat(EMPLOYEE_NAME_MAX_CHARS + 1);
        assert!(matches!(long_name.validated(), Err(Error::Validation(_))));

        let mut max_name = record("202401", dec!(1));
        max_name.employee_name = "名".repeat(EMPLOYEE_NAME_MAX_CHARS);
        assert!(max_name.validated().is_ok());

        let mut long_id = record("202401", dec!(1));
        long_id.employee_id = "E".repeat(EMPLOYEE_ID_MAX_CHARS + 1);
        assert!(long_id.validated().is_err());
    }
}
