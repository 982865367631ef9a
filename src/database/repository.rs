use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;
use tracing::{debug, warn};

use crate::database::models::Company;
use crate::filter::{FilterCriteria, FilterError, FilterWhere};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    InvalidFilter(#[from] FilterError),

    #[error("{0}")]
    NotFound(String),

    /// The mutation target disappeared between lookup and write
    #[error("{0}")]
    Conflict(String),

    #[error("expected exactly one row for company {id}, {affected} affected")]
    UnexpectedRowCount { id: i32, affected: u64 },

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

/// Reads and writes of company rows.
///
/// Update and delete succeed only when exactly one row was affected, so a row
/// removed concurrently after the caller looked it up surfaces as an error
/// instead of a silent no-op.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// All companies matching every criterion. An empty result is `NotFound`.
    async fn list(&self, criteria: &FilterCriteria) -> Result<Vec<Company>, RepositoryError>;

    async fn get(&self, id: i32) -> Result<Company, RepositoryError>;

    /// Insert the business attributes and return the company with its new id
    async fn create(&self, company: Company) -> Result<Company, RepositoryError>;

    /// Replace every business attribute of the row with `company.id`
    async fn update(&self, company: &Company) -> Result<(), RepositoryError>;

    async fn delete(&self, company: &Company) -> Result<(), RepositoryError>;

    /// Cheap round trip to the backing store
    async fn ping(&self) -> Result<(), RepositoryError>;
}

const SELECT_SQL: &str = "SELECT id, name, code, country, website, phone FROM company";

const SELECT_BY_ID_SQL: &str =
    "SELECT id, name, code, country, website, phone FROM company WHERE id = $1";

const INSERT_SQL: &str = "INSERT INTO company (name, code, country, website, phone) \
     VALUES ($1, $2, $3, $4, $5) RETURNING id";

const UPDATE_SQL: &str = "UPDATE company \
     SET name = $1, code = $2, country = $3, website = $4, phone = $5 \
     WHERE id = $6";

const DELETE_SQL: &str = "DELETE FROM company WHERE id = $1";

/// PostgreSQL-backed company store
#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn list(&self, criteria: &FilterCriteria) -> Result<Vec<Company>, RepositoryError> {
        let sql = FilterWhere::generate(SELECT_SQL, criteria)?;
        debug!("Listing companies: {} ({} params)", sql.query, sql.params.len());

        let mut q = sqlx::query_as::<_, Company>(&sql.query);
        for p in sql.params.iter() {
            q = q.bind(p.as_str());
        }
        let companies = q.fetch_all(&self.pool).await?;

        if companies.is_empty() {
            return Err(RepositoryError::NotFound("companies not found".to_string()));
        }
        Ok(companies)
    }

    async fn get(&self, id: i32) -> Result<Company, RepositoryError> {
        match sqlx::query_as::<_, Company>(SELECT_BY_ID_SQL)
            .bind(id)
            .fetch_one(&self.pool)
            .await
        {
            Ok(company) => Ok(company),
            Err(sqlx::Error::RowNotFound) => Err(RepositoryError::NotFound(format!(
                "company with id {} not found",
                id
            ))),
            Err(other) => Err(other.into()),
        }
    }

    async fn create(&self, company: Company) -> Result<Company, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query_scalar::<_, i32>(INSERT_SQL)
            .bind(company.name.as_deref())
            .bind(company.code.as_deref())
            .bind(company.country.as_deref())
            .bind(company.website.as_deref())
            .bind(company.phone.as_deref())
            .fetch_one(&mut *tx)
            .await
            .map_err(RepositoryError::from);

        let id = finish(tx, result).await?;
        debug!("Created company {}", id);
        Ok(company.with_id(id))
    }

    async fn update(&self, company: &Company) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(UPDATE_SQL)
            .bind(company.name.as_deref())
            .bind(company.code.as_deref())
            .bind(company.country.as_deref())
            .bind(company.website.as_deref())
            .bind(company.phone.as_deref())
            .bind(company.id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)
            .and_then(|done| expect_single_row(done.rows_affected(), company.id, "update"));

        finish(tx, result).await
    }

    async fn delete(&self, company: &Company) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(DELETE_SQL)
            .bind(company.id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)
            .and_then(|done| expect_single_row(done.rows_affected(), company.id, "delete"));

        finish(tx, result).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Commit on success, roll back on failure. The statement error wins over a
/// rollback error.
async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    result: Result<T, RepositoryError>,
) -> Result<T, RepositoryError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback failed after {}: {}", err, rollback_err);
            }
            Err(err)
        }
    }
}

pub(crate) fn expect_single_row(affected: u64, id: i32, action: &str) -> Result<(), RepositoryError> {
    match affected {
        1 => Ok(()),
        0 => Err(RepositoryError::Conflict(format!(
            "failed to {} company with id {}: no such row",
            action, id
        ))),
        affected => Err(RepositoryError::UnexpectedRowCount { id, affected }),
    }
}
