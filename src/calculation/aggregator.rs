use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::model::salary::SalaryRecord;

/// Mean monthly salary per employee.
///
/// Records are grouped by `employee_name` exactly as uploaded; names that
/// differ only by whitespace or case land in separate groups.
pub fn average_salaries(salaries: &[SalaryRecord]) -> HashMap<String, Decimal> {
    let mut totals: HashMap<&str, (Decimal, u32)> = HashMap::new();

    for salary in salaries {
        let entry = totals
            .entry(salary.employee_name.as_str())
            .or_insert((Decimal::ZERO, 0));
        entry.0 += salary.salary_amount;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(name, (sum, count))| (name.to_string(), sum / Decimal::from(count)))
        .collect()
}
