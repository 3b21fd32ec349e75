//! Account lifecycle — registration, profile updates, cascade delete.
//!
//! Credential hashing and session issuance live in an external auth layer;
//! this service stores and returns the opaque hash it is handed.

use hearth_domain::account::{self, Account};
use hearth_domain::error::{HearthError, NotFoundError, ValidationError};
use hearth_domain::id::AccountId;
use hearth_domain::time::{self, Timestamp};
use hearth_domain::usage::Subject;

use crate::ports::{AccountRepository, OverlayRepository, UsageLedger};

/// Optional profile fields for [`AccountService::update_profile`].
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    /// New username, unchanged when `None`.
    pub username: Option<String>,
    /// New email, unchanged when `None`.
    pub email: Option<String>,
}

/// Manages accounts and everything they own.
pub struct AccountService<A, O, L> {
    accounts: A,
    overlays: O,
    ledger: L,
}

impl<A, O, L> AccountService<A, O, L>
where
    A: AccountRepository + Send + Sync,
    O: OverlayRepository + Send + Sync,
    L: UsageLedger + Send + Sync,
{
    /// Wire the service to its repositories.
    pub fn new(accounts: A, overlays: O, ledger: L) -> Self {
        Self {
            accounts,
            overlays,
            ledger,
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Validation errors for a short username, empty email, or a username or
    /// email already in use; storage errors otherwise.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        credential_hash: &str,
    ) -> Result<Account, HearthError> {
        self.register_at(username, email, credential_hash, time::now())
            .await
    }

    /// [`register`](Self::register) with an explicit clock.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub async fn register_at(
        &self,
        username: &str,
        email: &str,
        credential_hash: &str,
        now: Timestamp,
    ) -> Result<Account, HearthError> {
        let account = Account::new(username, email, credential_hash, now)?;
        if self
            .accounts
            .find_by_username(&account.username)
            .await?
            .is_some()
        {
            return Err(ValidationError::UsernameTaken.into());
        }
        if self.accounts.find_by_email(&account.email).await?.is_some() {
            return Err(ValidationError::EmailTaken.into());
        }
        let created = self.accounts.create(account).await?;
        tracing::info!(account_id = %created.id, "account registered");
        Ok(created)
    }

    /// Fetch an account by id.
    ///
    /// # Errors
    ///
    /// [`NotFoundError`] when the id does not exist.
    pub async fn get(&self, id: AccountId) -> Result<Account, HearthError> {
        self.accounts
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    /// Change username and/or email, keeping both unique.
    ///
    /// # Errors
    ///
    /// [`NotFoundError`] for an unknown id; validation errors as in
    /// [`register`](Self::register).
    pub async fn update_profile(
        &self,
        id: AccountId,
        update: ProfileUpdate,
    ) -> Result<Account, HearthError> {
        let mut current = self.get(id).await?;

        if let Some(username) = update.username {
            let username = username.trim().to_string();
            account::validate_username(&username)?;
            if username != current.username
                && self.accounts.find_by_username(&username).await?.is_some()
            {
                return Err(ValidationError::UsernameTaken.into());
            }
            current.username = username;
        }

        if let Some(email) = update.email {
            let email = email.trim().to_lowercase();
            account::validate_email(&email)?;
            if email != current.email && self.accounts.find_by_email(&email).await?.is_some() {
                return Err(ValidationError::EmailTaken.into());
            }
            current.email = email;
        }

        self.accounts.update(current).await
    }

    /// Replace the stored credential hash.
    ///
    /// # Errors
    ///
    /// [`NotFoundError`] for an unknown id; storage errors otherwise.
    pub async fn update_credential(
        &self,
        id: AccountId,
        credential_hash: &str,
    ) -> Result<(), HearthError> {
        let mut current = self.get(id).await?;
        current.credential_hash = credential_hash.to_string();
        self.accounts.update(current).await?;
        Ok(())
    }

    /// Delete an account and everything it owns.
    ///
    /// Cascade order: overlay rows, both usage ledgers, then the account
    /// row. Not transactional; a failure mid-cascade leaves the account in
    /// place so the delete can be retried.
    ///
    /// # Errors
    ///
    /// [`NotFoundError`] for an unknown id; storage errors otherwise.
    pub async fn delete(&self, id: AccountId) -> Result<(), HearthError> {
        // existence check up front so an unknown id is a clean 404
        self.get(id).await?;
        self.overlays.delete_for_account(id).await?;
        self.ledger.delete_for_subject(Subject::Account(id)).await?;
        self.accounts.delete(id).await?;
        tracing::info!(account_id = %id, "account deleted");
        Ok(())
    }
}

fn not_found(id: AccountId) -> NotFoundError {
    NotFoundError {
        entity: "Account",
        id: id.to_string(),
    }
}
