use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlConnection, MySqlPool};
use tracing::{debug, error};
use uuid::Uuid;

use super::ContributionStore;
use crate::error::{Error, Result};
use crate::model::city::{CityStandard, NewCityStandard};
use crate::model::result::{ContributionResult, NewContributionResult};
use crate::model::salary::{NewSalaryRecord, SalaryRecord};
use crate::utils::db_utils::{INSERT_CHUNK_ROWS, SqlValue, build_bulk_insert, execute_insert};

const SALARY_COLUMNS: &str = "id, employee_id, employee_name, month, salary_amount, created_at";
const CITY_COLUMNS: &str = "id, city_name, year, base_min, base_max, rate, created_at";
const RESULT_COLUMNS: &str =
    "id, run_id, employee_name, avg_salary, contribution_base, company_fee, calculated_at";

/// `ContributionStore` backed by MySQL.
///
/// MySQL has no `RETURNING`, so every bulk insert tags its rows with a fresh
/// UUID (`batch_id` / `run_id`) and reads them back by it.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlStore { pool }
    }
}

/// Logs a failed store call with its cause before handing the error on.
fn log_failure(action: &'static str) -> impl FnOnce(Error) -> Error {
    move |e| {
        error!(error = %e, "Failed to {}", action);
        e
    }
}

async fn clear_results_on(conn: &mut MySqlConnection) -> Result<()> {
    let deleted = sqlx::query("DELETE FROM results")
        .execute(&mut *conn)
        .await?
        .rows_affected();
    debug!(deleted, "Cleared contribution results");
    Ok(())
}

async fn insert_results_on(
    conn: &mut MySqlConnection,
    results: Vec<NewContributionResult>,
) -> Result<Vec<ContributionResult>> {
    if results.is_empty() {
        return Ok(Vec::new());
    }

    let run_id = Uuid::new_v4().to_string();
    let calculated_at = Utc::now();

    for chunk in results.chunks(INSERT_CHUNK_ROWS) {
        let rows = chunk
            .iter()
            .map(|r| {
                vec![
                    SqlValue::String(run_id.clone()),
                    SqlValue::String(r.employee_name.clone()),
                    SqlValue::Decimal(r.avg_salary),
                    SqlValue::Decimal(r.contribution_base),
                    SqlValue::Decimal(r.company_fee),
                    SqlValue::DateTime(calculated_at),
                ]
            })
            .collect();
        let insert = build_bulk_insert(
            "results",
            &[
                "run_id",
                "employee_name",
                "avg_salary",
                "contribution_base",
                "company_fee",
                "calculated_at",
            ],
            rows,
        )?;
        execute_insert(&mut *conn, insert).await?;
    }

    let saved = sqlx::query_as::<_, ContributionResult>(&format!(
        "SELECT {} FROM results WHERE run_id = ? ORDER BY id",
        RESULT_COLUMNS
    ))
    .bind(&run_id)
    .fetch_all(&mut *conn)
    .await?;

    debug!(run_id = %run_id, count = saved.len(), "Inserted contribution results");
    Ok(saved)
}

impl MySqlStore {
    async fn swap_results(
        &self,
        results: Vec<NewContributionResult>,
    ) -> Result<Vec<ContributionResult>> {
        let mut tx = self.pool.begin().await?;

        clear_results_on(&mut tx).await?;
        let saved = insert_results_on(&mut tx, results).await?;

        // dropping an uncommitted transaction rolls it back
        tx.commit().await?;
        Ok(saved)
    }

    async fn save_salaries(&self, salaries: Vec<NewSalaryRecord>) -> Result<Vec<SalaryRecord>> {
        if salaries.is_empty() {
            return Ok(Vec::new());
        }

        let batch_id = Uuid::new_v4().to_string();
        let mut tx = self.pool.begin().await?;

        for chunk in salaries.chunks(INSERT_CHUNK_ROWS) {
            let rows = chunk
                .iter()
                .map(|s| {
                    vec![
                        SqlValue::String(batch_id.clone()),
                        SqlValue::String(s.employee_id.clone()),
                        SqlValue::String(s.employee_name.clone()),
                        SqlValue::String(s.month.clone()),
                        SqlValue::Decimal(s.salary_amount),
                    ]
                })
                .collect();
            let insert = build_bulk_insert(
                "salaries",
                &["batch_id", "employee_id", "employee_name", "month", "salary_amount"],
                rows,
            )?;
            execute_insert(&mut tx, insert).await?;
        }

        let saved = sqlx::query_as::<_, SalaryRecord>(&format!(
            "SELECT {} FROM salaries WHERE batch_id = ? ORDER BY id",
            SALARY_COLUMNS
        ))
        .bind(&batch_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn save_cities(&self, cities: Vec<NewCityStandard>) -> Result<Vec<CityStandard>> {
        if cities.is_empty() {
            return Ok(Vec::new());
        }

        let batch_id = Uuid::new_v4().to_string();
        let mut tx = self.pool.begin().await?;

        let rows = cities
            .iter()
            .map(|c| {
                vec![
                    SqlValue::String(batch_id.clone()),
                    SqlValue::String(c.city_name.clone()),
                    SqlValue::I32(c.year),
                    SqlValue::Decimal(c.base_min),
                    SqlValue::Decimal(c.base_max),
                    SqlValue::Decimal(c.rate),
                ]
            })
            .collect();
        let insert = build_bulk_insert(
            "cities",
            &["batch_id", "city_name", "year", "base_min", "base_max", "rate"],
            rows,
        )?;
        execute_insert(&mut tx, insert).await?;

        let saved = sqlx::query_as::<_, CityStandard>(&format!(
            "SELECT {} FROM cities WHERE batch_id = ? ORDER BY id",
            CITY_COLUMNS
        ))
        .bind(&batch_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(saved)
    }
}

#[async_trait]
impl ContributionStore for MySqlStore {
    async fn fetch_all_salaries(&self) -> Result<Vec<SalaryRecord>> {
        let salaries = sqlx::query_as::<_, SalaryRecord>(&format!(
            "SELECT {} FROM salaries ORDER BY id",
            SALARY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch salaries");
            e
        })?;
        Ok(salaries)
    }

    async fn fetch_city_standard(
        &self,
        city_name: &str,
        year: Option<i32>,
    ) -> Result<Option<CityStandard>> {
        let standard = match year {
            Some(year) => {
                sqlx::query_as::<_, CityStandard>(&format!(
                    "SELECT {} FROM cities WHERE city_name = ? AND year = ? ORDER BY id DESC LIMIT 1",
                    CITY_COLUMNS
                ))
                .bind(city_name)
                .bind(year)
                .fetch_optional(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, CityStandard>(&format!(
                    "SELECT {} FROM cities WHERE city_name = ? ORDER BY year DESC, id DESC LIMIT 1",
                    CITY_COLUMNS
                ))
                .bind(city_name)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(|e| {
            error!(error = %e, city_name, ?year, "Failed to fetch city standard");
            e
        })?;
        Ok(standard)
    }

    async fn fetch_cities(&self) -> Result<Vec<CityStandard>> {
        let cities = sqlx::query_as::<_, CityStandard>(&format!(
            "SELECT {} FROM cities ORDER BY year DESC, city_name",
            CITY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch city standards");
            e
        })?;
        Ok(cities)
    }

    async fn fetch_results(&self) -> Result<Vec<ContributionResult>> {
        let results = sqlx::query_as::<_, ContributionResult>(&format!(
            "SELECT {} FROM results ORDER BY calculated_at DESC, id",
            RESULT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch contribution results");
            e
        })?;
        Ok(results)
    }

    async fn clear_results(&self) -> Result<()> {
        let cleared = async {
            let mut conn = self.pool.acquire().await?;
            clear_results_on(&mut conn).await
        };
        cleared.await.map_err(log_failure("clear contribution results"))
    }

    async fn insert_results(
        &self,
        results: Vec<NewContributionResult>,
    ) -> Result<Vec<ContributionResult>> {
        let inserted = async {
            let mut conn = self.pool.acquire().await?;
            insert_results_on(&mut conn, results).await
        };
        inserted.await.map_err(log_failure("insert contribution results"))
    }

    async fn replace_results(
        &self,
        results: Vec<NewContributionResult>,
    ) -> Result<Vec<ContributionResult>> {
        self.swap_results(results)
            .await
            .map_err(log_failure("replace contribution results"))
    }

    async fn insert_salaries(&self, salaries: Vec<NewSalaryRecord>) -> Result<Vec<SalaryRecord>> {
        self.save_salaries(salaries)
            .await
            .map_err(log_failure("insert salaries"))
    }

    async fn insert_cities(&self, cities: Vec<NewCityStandard>) -> Result<Vec<CityStandard>> {
        self.save_cities(cities)
            .await
            .map_err(log_failure("insert city standards"))
    }
}
