use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::model::salary::{check_length, check_money};

pub const CITY_NAME_MAX_CHARS: usize = 64;

/// Contribution band and employer rate a city sets for one year.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "city_name": "佛山",
        "year": 2024,
        "base_min": 4546.0,
        "base_max": 26421.0,
        "rate": 0.14,
        "created_at": "2024-01-05T08:00:00Z"
    })
)]
pub struct CityStandard {
    pub id: u64,

    #[schema(example = "佛山")]
    pub city_name: String,

    #[schema(example = 2024)]
    pub year: i32,

    #[schema(example = 4546.0, value_type = f64)]
    pub base_min: Decimal,

    #[schema(example = 26421.0, value_type = f64)]
    pub base_max: Decimal,

    /// Fraction in `[0, 1]`
    #[schema(example = 0.14, value_type = f64)]
    pub rate: Decimal,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewCityStandard {
    #[schema(example = "佛山")]
    pub city_name: String,

    #[schema(example = 2024)]
    pub year: i32,

    #[schema(example = 4546.0, value_type = f64)]
    pub base_min: Decimal,

    #[schema(example = 26421.0, value_type = f64)]
    pub base_max: Decimal,

    #[schema(example = 0.14, value_type = f64)]
    pub rate: Decimal,
}

impl NewCityStandard {
    pub fn validated(self) -> Result<Self> {
        if self.city_name.trim().is_empty() {
            return Err(Error::Validation("city_name is required".into()));
        }
        check_length("city_name", &self.city_name, CITY_NAME_MAX_CHARS)?;
        if !(1900..=9999).contains(&self.year) {
            return Err(Error::Validation(format!("year {} is out of range", self.year)));
        }
        if self.base_min < Decimal::ZERO {
            return Err(Error::Validation(format!(
                "base_min must not be negative, got {}",
                self.base_min
            )));
        }
        check_money("base_min", self.base_min)?;
        check_money("base_max", self.base_max)?;
        // rate column is DECIMAL(6, 4)
        if self.rate.normalize().scale() > 4 {
            return Err(Error::Validation(format!(
                "rate must have at most 4 decimal places, got {}",
                self.rate
            )));
        }
        validate_band(self.base_min, self.base_max, self.rate).map_err(|e| match e {
            Error::InvalidStandard(msg) => Error::Validation(msg),
            other => other,
        })?;
        Ok(self)
    }
}

/// `base_min <= base_max` and `0 <= rate <= 1`.
pub fn validate_band(base_min: Decimal, base_max: Decimal, rate: Decimal) -> Result<()> {
    if base_min > base_max {
        return Err(Error::band_inverted(base_min, base_max));
    }
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(Error::InvalidStandard(format!(
            "rate must be a fraction between 0 and 1, got {}",
            rate
        )));
    }
    Ok(())
}

/// Which standard a calculation run applies. `year: None` means the most recent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitySelection {
    pub city: String,
    pub year: Option<i32>,
}

impl CitySelection {
    pub fn new(city: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            city: city.into(),
            year,
        }
    }
}
