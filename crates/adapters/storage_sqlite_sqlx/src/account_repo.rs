//! `SQLite` implementation of [`AccountRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use hearth_app::ports::AccountRepository;
use hearth_domain::account::Account;
use hearth_domain::error::HearthError;
use hearth_domain::id::AccountId;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Account);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Account> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let username: String = row.try_get("username")?;
        let email: String = row.try_get("email")?;
        let credential_hash: String = row.try_get("credential_hash")?;
        let created_at_str: String = row.try_get("created_at")?;

        let id = AccountId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(Account {
            id,
            username,
            email,
            credential_hash,
            created_at,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO accounts (id, username, email, credential_hash, created_at)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM accounts WHERE id = ?";
const SELECT_BY_USERNAME: &str = "SELECT * FROM accounts WHERE username = ?";
const SELECT_BY_EMAIL: &str = "SELECT * FROM accounts WHERE email = ?";

const UPDATE: &str = r"
    UPDATE accounts
    SET username = ?, email = ?, credential_hash = ?
    WHERE id = ?
";

const DELETE_BY_ID: &str = "DELETE FROM accounts WHERE id = ?";

/// `SQLite`-backed account repository.
pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AccountRepository for SqliteAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, HearthError> {
        sqlx::query(INSERT)
            .bind(account.id.to_string())
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.credential_hash)
            .bind(account.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(account)
    }

    async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, HearthError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, HearthError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USERNAME)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, HearthError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn update(&self, account: Account) -> Result<Account, HearthError> {
        sqlx::query(UPDATE)
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.credential_hash)
            .bind(account.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(account)
    }

    async fn delete(&self, id: AccountId) -> Result<(), HearthError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use hearth_domain::time::now;

    async fn setup() -> SqliteAccountRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteAccountRepository::new(db.pool().clone())
    }

    fn test_account(username: &str, email: &str) -> Account {
        Account::new(username, email, "hash-1", now()).unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_account_when_valid() {
        let repo = setup().await;
        let account = test_account("alice", "alice@example.com");
        let id = account.id;

        repo.create(account).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.email, "alice@example.com");
        assert_eq!(fetched.credential_hash, "hash-1");
    }

    #[tokio::test]
    async fn should_return_none_when_account_not_found() {
        let repo = setup().await;
        let result = repo.get_by_id(AccountId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_find_account_by_username() {
        let repo = setup().await;
        repo.create(test_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let found = repo.find_by_username("alice").await.unwrap();
        assert!(found.is_some());

        let not_found = repo.find_by_username("bob").await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn should_find_account_by_email() {
        let repo = setup().await;
        repo.create(test_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let found = repo.find_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn should_reject_duplicate_username_at_database_level() {
        let repo = setup().await;
        repo.create(test_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = repo.create(test_account("alice", "other@example.com")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn should_update_account_when_exists() {
        let repo = setup().await;
        let mut account = test_account("alice", "alice@example.com");
        let id = account.id;
        repo.create(account.clone()).await.unwrap();

        account.username = "alicia".to_string();
        account.credential_hash = "hash-2".to_string();
        repo.update(account).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "alicia");
        assert_eq!(fetched.credential_hash, "hash-2");
    }

    #[tokio::test]
    async fn should_delete_account_when_exists() {
        let repo = setup().await;
        let account = test_account("alice", "alice@example.com");
        let id = account.id;
        repo.create(account).await.unwrap();

        repo.delete(id).await.unwrap();

        assert!(repo.get_by_id(id).await.unwrap().is_none());
    }
}
