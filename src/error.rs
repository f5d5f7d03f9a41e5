use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the contribution core and its storage.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No salary data found, upload salary records first")]
    NoSalaryData,

    #[error("No contribution standard configured for city {city}{}", year_suffix(.year))]
    NoCityStandard { city: String, year: Option<i32> },

    #[error("Invalid contribution standard: {0}")]
    InvalidStandard(String),

    #[error("Input validation failed: {0}")]
    Validation(String),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Storage(StorageError::Query(err))
    }
}

fn year_suffix(year: &Option<i32>) -> String {
    year.map(|y| format!(" (year {})", y)).unwrap_or_default()
}

impl Error {
    pub fn band_inverted(base_min: Decimal, base_max: Decimal) -> Self {
        Error::InvalidStandard(format!(
            "base_min {} is greater than base_max {}",
            base_min, base_max
        ))
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NoSalaryData | Error::InvalidStandard(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NoCityStandard { .. } => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // cause is logged where it happened, never echoed to the client
            Error::Storage(_) => "Something went wrong, Contact with system admin".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": message,
            "error": message,
            "timestamp": Utc::now().to_rfc3339(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_codes_follow_error_kind() {
        assert_eq!(
            Error::NoSalaryData.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::NoCityStandard {
                city: "佛山".into(),
                year: None
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Validation("row 0".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::from(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_name_the_missing_standard() {
        let err = Error::NoCityStandard {
            city: "广州".into(),
            year: Some(2024),
        };
        assert_eq!(
            err.to_string(),
            "No contribution standard configured for city 广州 (year 2024)"
        );

        let err = Error::band_inverted(dec!(10000), dec!(5000));
        assert!(err.to_string().contains("10000"));
        assert!(matches!(err, Error::InvalidStandard(_)));
    }
}
