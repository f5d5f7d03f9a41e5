use async_trait::async_trait;

use crate::error::Result;
use crate::model::city::{CityStandard, NewCityStandard};
use crate::model::result::{ContributionResult, NewContributionResult};
use crate::model::salary::{NewSalaryRecord, SalaryRecord};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub use mysql::MySqlStore;

/// Data access the contribution core depends on.
#[async_trait]
pub trait ContributionStore: Send + Sync {
    async fn fetch_all_salaries(&self) -> Result<Vec<SalaryRecord>>;

    /// `year: None` selects the most recent year on file for the city.
    async fn fetch_city_standard(
        &self,
        city_name: &str,
        year: Option<i32>,
    ) -> Result<Option<CityStandard>>;

    /// Newest year first.
    async fn fetch_cities(&self) -> Result<Vec<CityStandard>>;

    async fn fetch_results(&self) -> Result<Vec<ContributionResult>>;

    async fn clear_results(&self) -> Result<()>;

    async fn insert_results(
        &self,
        results: Vec<NewContributionResult>,
    ) -> Result<Vec<ContributionResult>>;

    /// Swaps the whole result set for `results` in one step; on failure the
    /// previous set stays in place.
    async fn replace_results(
        &self,
        results: Vec<NewContributionResult>,
    ) -> Result<Vec<ContributionResult>>;

    async fn insert_salaries(&self, salaries: Vec<NewSalaryRecord>) -> Result<Vec<SalaryRecord>>;

    async fn insert_cities(&self, cities: Vec<NewCityStandard>) -> Result<Vec<CityStandard>>;
}
