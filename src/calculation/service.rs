use std::collections::HashMap;
use std::sync::Arc;

use futures::lock::Mutex;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, instrument, warn};

use crate::calculation::aggregator::average_salaries;
use crate::calculation::resolver::resolve;
use crate::error::{Error, Result};
use crate::model::city::{CitySelection, CityStandard, NewCityStandard, validate_band};
use crate::model::result::{ContributionResult, NewContributionResult};
use crate::model::salary::{NewSalaryRecord, SalaryRecord};
use crate::store::ContributionStore;

/// Runs contribution calculations against a store and guards ingestion.
pub struct ContributionService {
    store: Arc<dyn ContributionStore>,
    default_selection: CitySelection,
    // held for a whole run so two runs never interleave their writes
    run_guard: Mutex<()>,
}

impl ContributionService {
    pub fn new(store: Arc<dyn ContributionStore>, default_selection: CitySelection) -> Self {
        ContributionService {
            store,
            default_selection,
            run_guard: Mutex::new(()),
        }
    }

    pub fn default_selection(&self) -> &CitySelection {
        &self.default_selection
    }

    /// Recomputes every employee's contribution under the configured default
    /// city and replaces the stored result set.
    pub async fn calculate_all_contributions(&self) -> Result<Vec<ContributionResult>> {
        let selection = self.default_selection.clone();
        self.calculate_for(&selection).await
    }

    #[instrument(skip(self), fields(city = %selection.city, year = ?selection.year))]
    pub async fn calculate_for(&self, selection: &CitySelection) -> Result<Vec<ContributionResult>> {
        let _running = self.run_guard.lock().await;
        info!("Contribution calculation started");

        let salaries = self.store.fetch_all_salaries().await?;
        if salaries.is_empty() {
            warn!("No salary records, nothing to calculate");
            return Err(Error::NoSalaryData);
        }

        let averages = average_salaries(&salaries);

        let standard = self
            .store
            .fetch_city_standard(&selection.city, selection.year)
            .await?
            .ok_or_else(|| Error::NoCityStandard {
                city: selection.city.clone(),
                year: selection.year,
            })?;
        info!(
            standard_year = standard.year,
            base_min = %standard.base_min,
            base_max = %standard.base_max,
            rate = %standard.rate,
            "Using city standard"
        );

        let results = build_results(&averages, &standard)?;
        let saved = self.store.replace_results(results).await?;

        info!(
            records = salaries.len(),
            employees = saved.len(),
            "Contribution calculation finished"
        );
        Ok(saved)
    }

    pub async fn import_salaries(&self, rows: Vec<NewSalaryRecord>) -> Result<Vec<SalaryRecord>> {
        if rows.is_empty() {
            return Err(Error::Validation("no salary records provided".into()));
        }
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.validated().map_err(|e| at_row(i, e)))
            .collect::<Result<Vec<_>>>()?;

        let saved = self.store.insert_salaries(rows).await?;
        info!(count = saved.len(), "Salary records imported");
        Ok(saved)
    }

    pub async fn import_cities(&self, rows: Vec<NewCityStandard>) -> Result<Vec<CityStandard>> {
        if rows.is_empty() {
            return Err(Error::Validation("no city standards provided".into()));
        }
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.validated().map_err(|e| at_row(i, e)))
            .collect::<Result<Vec<_>>>()?;

        let saved = self.store.insert_cities(rows).await?;
        info!(count = saved.len(), "City standards imported");
        Ok(saved)
    }

    pub async fn salaries(&self) -> Result<Vec<SalaryRecord>> {
        self.store.fetch_all_salaries().await
    }

    pub async fn cities(&self) -> Result<Vec<CityStandard>> {
        self.store.fetch_cities().await
    }

    pub async fn results(&self) -> Result<Vec<ContributionResult>> {
        self.store.fetch_results().await
    }
}

/// Company-wide fee figures for one result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeTotals {
    pub total_company_fee: Decimal,
    pub average_company_fee: Decimal,
}

/// Sum and mean of `company_fee`, rounded to cents. Both are zero for an empty set.
pub fn fee_totals(results: &[ContributionResult]) -> FeeTotals {
    if results.is_empty() {
        return FeeTotals {
            total_company_fee: Decimal::ZERO,
            average_company_fee: Decimal::ZERO,
        };
    }

    let total: Decimal = results.iter().map(|r| r.company_fee).sum();
    FeeTotals {
        total_company_fee: round_money(total),
        average_company_fee: round_money(total / Decimal::from(results.len())),
    }
}

fn at_row(index: usize, err: Error) -> Error {
    match err {
        Error::Validation(msg) => Error::Validation(format!("row {}: {}", index, msg)),
        other => other,
    }
}

/// Round-half-up to cents.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies one standard to every employee average, sorted by employee name.
pub fn build_results(
    averages: &HashMap<String, Decimal>,
    standard: &CityStandard,
) -> Result<Vec<NewContributionResult>> {
    validate_band(standard.base_min, standard.base_max, standard.rate)?;

    let mut results = averages
        .iter()
        .map(|(name, avg)| {
            let c = resolve(*avg, standard.base_min, standard.base_max, standard.rate)?;
            Ok(NewContributionResult {
                employee_name: name.clone(),
                avg_salary: round_money(*avg),
                contribution_base: round_money(c.contribution_base),
                company_fee: round_money(c.company_fee),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    results.sort_by(|a, b| a.employee_name.cmp(&b.employee_name));
    Ok(results)
}
