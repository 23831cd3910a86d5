use async_trait::async_trait;
use sqlx::{migrate::MigrateError, sqlite::SqlitePoolOptions, SqlitePool};
use thiserror::Error;

use acctsvc_core::account::Account;
use acctsvc_core::command::{AccountCommandRepository, RepositoryError};
use acctsvc_core::query::AccountQueryRepository;

/// Top-level database handle that owns the SQLite connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Establishes a new SQLite connection pool for the provided connection string.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(StorageError::Connect)?;

        apply_pragmas(&pool).await?;

        Ok(Self { pool })
    }

    /// Applies migrations located under `migrations/`.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(StorageError::Migration)?;
        Ok(())
    }

    /// Returns the write-side repository for accounts.
    pub fn account_commands(&self) -> SqlAccountCommandRepository {
        SqlAccountCommandRepository {
            pool: self.pool.clone(),
        }
    }

    /// Returns the read-side repository handle for accounts.
    pub fn account_queries(&self) -> SqlAccountQueryRepository {
        SqlAccountQueryRepository {
            pool: self.pool.clone(),
        }
    }

    /// Exposes the inner pool when lower level access is required.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn apply_pragmas(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::query("PRAGMA foreign_keys = ON;")
        .execute(pool)
        .await
        .map_err(StorageError::Pragma)?;

    sqlx::query("PRAGMA journal_mode = WAL;")
        .fetch_one(pool)
        .await
        .map_err(StorageError::Pragma)?;

    sqlx::query("PRAGMA synchronous = NORMAL;")
        .execute(pool)
        .await
        .map_err(StorageError::Pragma)?;

    sqlx::query("PRAGMA busy_timeout = 5000;")
        .execute(pool)
        .await
        .map_err(StorageError::Pragma)?;

    Ok(())
}

/// General storage level errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to sqlite: {0}")]
    Connect(sqlx::Error),
    #[error("failed to apply pragma: {0}")]
    Pragma(sqlx::Error),
    #[error("failed to run database migrations: {0}")]
    Migration(MigrateError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Relational implementation of the account command port.
///
/// One parameterized insert, no transaction wrapping, no retry. The
/// driver error is passed through wrapped; interpreting it is the
/// caller's business.
#[derive(Clone)]
pub struct SqlAccountCommandRepository {
    pool: SqlitePool,
}

#[async_trait]
impl AccountCommandRepository for SqlAccountCommandRepository {
    async fn create(&self, account: &Account) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO accounts (id, name, email, password, status) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(account.id())
        .bind(account.name())
        .bind(account.email())
        .bind(account.password())
        .bind(account.status().code())
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::backend)?;

        Ok(())
    }
}

/// Relational handle for the account query port.
///
/// The port has no operations yet; this type only keeps the read-side
/// seam concrete so a future read model has a home.
#[derive(Clone)]
pub struct SqlAccountQueryRepository {
    #[allow(dead_code)]
    pool: SqlitePool,
}

impl AccountQueryRepository for SqlAccountQueryRepository {}

#[cfg(test)]
mod tests {
    use super::*;
    use acctsvc_core::account::AccountStatus;
    use sqlx::Row;

    async fn setup_db() -> Database {
        let db = Database::connect("sqlite::memory:?cache=shared")
            .await
            .expect("connect");
        db.run_migrations().await.expect("migrations");
        db
    }

    fn account(id: &str) -> Account {
        Account::new(
            id.to_string(),
            "Ann".to_string(),
            "ann@x.com".to_string(),
            "secret".to_string(),
            AccountStatus::Activated,
            None,
        )
    }

    #[tokio::test]
    async fn migrations_apply() {
        let db = setup_db().await;

        let tables: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'accounts'",
        )
        .fetch_one(db.pool())
        .await
        .expect("fetch tables");
        assert_eq!(tables.0, 1);
    }

    #[tokio::test]
    async fn create_persists_all_entity_fields() {
        let db = setup_db().await;
        let repo = db.account_commands();

        repo.create(&account("acc-1")).await.expect("create");

        let row = sqlx::query("SELECT * FROM accounts WHERE id = ?")
            .bind("acc-1")
            .fetch_one(db.pool())
            .await
            .expect("row");

        assert_eq!(row.get::<String, _>("name"), "Ann");
        assert_eq!(row.get::<String, _>("email"), "ann@x.com");
        assert_eq!(row.get::<String, _>("password"), "secret");
        assert_eq!(row.get::<i64, _>("status"), 0);
        assert_eq!(row.get::<Option<String>, _>("created_at"), None);
    }

    #[tokio::test]
    async fn banned_status_is_stored_as_its_code() {
        let db = setup_db().await;
        let repo = db.account_commands();

        let banned = Account::new(
            "acc-2".to_string(),
            "Mallory".to_string(),
            "mallory@x.com".to_string(),
            "secret".to_string(),
            AccountStatus::Banned,
            None,
        );
        repo.create(&banned).await.expect("create");

        let row = sqlx::query("SELECT status FROM accounts WHERE id = ?")
            .bind("acc-2")
            .fetch_one(db.pool())
            .await
            .expect("row");
        assert_eq!(row.get::<i64, _>("status"), 1);
    }

    #[tokio::test]
    async fn distinct_ids_produce_distinct_rows() {
        let db = setup_db().await;
        let repo = db.account_commands();

        repo.create(&account("acc-3")).await.expect("first");
        repo.create(&account("acc-4")).await.expect("second");

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(db.pool())
            .await
            .expect("count");
        assert_eq!(count.0, 2);
    }

    #[tokio::test]
    async fn driver_error_is_wrapped_unchanged() {
        let db = setup_db().await;
        let repo = db.account_commands();
        db.pool().close().await;

        let err = repo.create(&account("acc-5")).await.unwrap_err();
        let RepositoryError::Backend(source) = err;
        assert!(source.to_string().contains("pool"));
    }
}
