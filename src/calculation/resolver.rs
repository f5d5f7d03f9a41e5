use rust_decimal::Decimal;

use crate::error::Result;
use crate::model::city::validate_band;

/// Clamped contribution base and the employer fee owed on it, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub contribution_base: Decimal,
    pub company_fee: Decimal,
}

/// Clamps `avg_salary` into `[base_min, base_max]` and applies `rate`.
///
/// The band is checked before anything is computed: an inverted band or a
/// rate outside `[0, 1]` yields `Error::InvalidStandard`.
pub fn resolve(
    avg_salary: Decimal,
    base_min: Decimal,
    base_max: Decimal,
    rate: Decimal,
) -> Result<Contribution> {
    validate_band(base_min, base_max, rate)?;

    let contribution_base = contribution_base(avg_salary, base_min, base_max);
    Ok(Contribution {
        contribution_base,
        company_fee: company_fee(contribution_base, rate),
    })
}

/// Bounds are inclusive. Caller guarantees `base_min <= base_max`.
pub fn contribution_base(avg_salary: Decimal, base_min: Decimal, base_max: Decimal) -> Decimal {
    if avg_salary < base_min {
        base_min
    } else if avg_salary > base_max {
        base_max
    } else {
        avg_salary
    }
}

pub fn company_fee(contribution_base: Decimal, rate: Decimal) -> Decimal {
    contribution_base * rate
}
