use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::ContributionStore;
use crate::error::Result;
use crate::model::city::{CityStandard, NewCityStandard};
use crate::model::result::{ContributionResult, NewContributionResult};
use crate::model::salary::{NewSalaryRecord, SalaryRecord};

#[derive(Default)]
struct State {
    salaries: Vec<SalaryRecord>,
    cities: Vec<CityStandard>,
    results: Vec<ContributionResult>,
    next_id: u64,
    result_writes: usize,
    fail_writes: bool,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            return Err(sqlx::Error::PoolClosed.into());
        }
        Ok(())
    }

    fn materialize(&mut self, results: Vec<NewContributionResult>) -> Vec<ContributionResult> {
        let run_id = Uuid::new_v4().to_string();
        let calculated_at = Utc::now();
        results
            .into_iter()
            .map(|r| ContributionResult {
                id: self.next_id(),
                run_id: run_id.clone(),
                employee_name: r.employee_name,
                avg_salary: r.avg_salary,
                contribution_base: r.contribution_base,
                company_fee: r.company_fee,
                calculated_at,
            })
            .collect()
    }
}

/// Test double for `ContributionStore` with switchable write failures.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("memory store poisoned")
    }

    /// Number of successful result-table writes (clear, insert or replace).
    pub fn result_writes(&self) -> usize {
        self.state().result_writes
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    /// Stores a standard without validation, as a hand-edited table might hold.
    pub fn push_city_unchecked(
        &self,
        city_name: &str,
        year: i32,
        base_min: Decimal,
        base_max: Decimal,
        rate: Decimal,
    ) {
        let mut state = self.state();
        let id = state.next_id();
        state.cities.push(CityStandard {
            id,
            city_name: city_name.to_string(),
            year,
            base_min,
            base_max,
            rate,
            created_at: Utc::now(),
        });
    }
}

#[async_trait]
impl ContributionStore for InMemoryStore {
    async fn fetch_all_salaries(&self) -> Result<Vec<SalaryRecord>> {
        Ok(self.state().salaries.clone())
    }

    async fn fetch_city_standard(
        &self,
        city_name: &str,
        year: Option<i32>,
    ) -> Result<Option<CityStandard>> {
        let state = self.state();
        let standard = state
            .cities
            .iter()
            .filter(|c| c.city_name == city_name && year.is_none_or(|y| c.year == y))
            .max_by_key(|c| (c.year, c.id))
            .cloned();
        Ok(standard)
    }

    async fn fetch_cities(&self) -> Result<Vec<CityStandard>> {
        let mut cities = self.state().cities.clone();
        cities.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.city_name.cmp(&b.city_name)));
        Ok(cities)
    }

    async fn fetch_results(&self) -> Result<Vec<ContributionResult>> {
        Ok(self.state().results.clone())
    }

    async fn clear_results(&self) -> Result<()> {
        let mut state = self.state();
        state.check_writable()?;
        state.results.clear();
        state.result_writes += 1;
        Ok(())
    }

    async fn insert_results(
        &self,
        results: Vec<NewContributionResult>,
    ) -> Result<Vec<ContributionResult>> {
        let mut state = self.state();
        state.check_writable()?;
        let saved = state.materialize(results);
        state.results.extend(saved.iter().cloned());
        state.result_writes += 1;
        Ok(saved)
    }

    async fn replace_results(
        &self,
        results: Vec<NewContributionResult>,
    ) -> Result<Vec<ContributionResult>> {
        let mut state = self.state();
        state.check_writable()?;
        let saved = state.materialize(results);
        state.results = saved.clone();
        state.result_writes += 1;
        Ok(saved)
    }

    async fn insert_salaries(&self, salaries: Vec<NewSalaryRecord>) -> Result<Vec<SalaryRecord>> {
        let mut state = self.state();
        state.check_writable()?;
        let created_at = Utc::now();
        let saved: Vec<SalaryRecord> = salaries
            .into_iter()
            .map(|s| SalaryRecord {
                id: state.next_id(),
                employee_id: s.employee_id,
                employee_name: s.employee_name,
                month: s.month,
                salary_amount: s.salary_amount,
                created_at,
            })
            .collect();
        state.salaries.extend(saved.iter().cloned());
        Ok(saved)
    }

    async fn insert_cities(&self, cities: Vec<NewCityStandard>) -> Result<Vec<CityStandard>> {
        let mut state = self.state();
        state.check_writable()?;
        let created_at = Utc::now();
        let saved: Vec<CityStandard> = cities
            .into_iter()
            .map(|c| CityStandard {
                id: state.next_id(),
                city_name: c.city_name,
                year: c.year,
                base_min: c.base_min,
                base_max: c.base_max,
                rate: c.rate,
                created_at,
            })
            .collect();
        state.cities.extend(saved.iter().cloned());
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[actix_web::test]
    async fn test_latest_year_wins_when_year_is_unspecified() {
        let store = InMemoryStore::default();
        store.push_city_unchecked("佛山", 2023, dec!(4000), dec!(18000), dec!(0.15));
        store.push_city_unchecked("佛山", 2025, dec!(5500), dec!(22000), dec!(0.16));
        store.push_city_unchecked("佛山", 2024, dec!(5000), dec!(20000), dec!(0.16));

        let latest = store.fetch_city_standard("佛山", None).await.unwrap().unwrap();
        assert_eq!(latest.year, 2025);

        let pinned = store.fetch_city_standard("佛山", Some(2023)).await.unwrap().unwrap();
        assert_eq!(pinned.base_max, dec!(18000));

        assert!(store.fetch_city_standard("广州", None).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_clear_then_insert() {
        let store = InMemoryStore::default();
        let row = NewContributionResult {
            employee_name: "Alice".into(),
            avg_salary: dec!(1500),
            contribution_base: dec!(5000),
            company_fee: dec!(800),
        };

        store.insert_results(vec![row.clone()]).await.unwrap();
        store.insert_results(vec![row]).await.unwrap();
        assert_eq!(store.fetch_results().await.unwrap().len(), 2);

        store.clear_results().await.unwrap();
        assert!(store.fetch_results().await.unwrap().is_empty());
        assert_eq!(store.result_writes(), 3);
    }
}
