//! Storage ports — repository traits for persistence.

use std::collections::HashMap;
use std::future::Future;

use chrono::NaiveDate;

use hearth_domain::account::Account;
use hearth_domain::device::StateMap;
use hearth_domain::error::HearthError;
use hearth_domain::id::AccountId;
use hearth_domain::time::Timestamp;
use hearth_domain::usage::{Metric, Subject};

/// Per-user desired-state patches, one row per (account, device).
///
/// An overlay represents the last state a user *requested*, independent of
/// what the physical device last reported. Rows are deleted only when the
/// owning account is deleted.
pub trait OverlayRepository {
    /// Fetch the overlay for one device, `None` if the user never commanded
    /// it.
    fn get(
        &self,
        account_id: AccountId,
        device_id: &str,
    ) -> impl Future<Output = Result<Option<StateMap>, HearthError>> + Send;

    /// Fetch all overlays for an account, keyed by device id.
    fn get_for_account(
        &self,
        account_id: AccountId,
    ) -> impl Future<Output = Result<HashMap<String, StateMap>, HearthError>> + Send;

    /// Insert or replace the overlay row for (account, device).
    fn upsert(
        &self,
        account_id: AccountId,
        device_id: &str,
        state: &StateMap,
        updated_at: Timestamp,
    ) -> impl Future<Output = Result<(), HearthError>> + Send;

    /// Remove every overlay row owned by an account.
    fn delete_for_account(
        &self,
        account_id: AccountId,
    ) -> impl Future<Output = Result<(), HearthError>> + Send;
}

/// Durable per-day accumulated on-time minutes, keyed (subject, date) with
/// one table per metric.
pub trait UsageLedger {
    /// Minutes recorded for a day, `0.0` when no row exists.
    fn minutes_for_day(
        &self,
        subject: Subject,
        metric: Metric,
        date: NaiveDate,
    ) -> impl Future<Output = Result<f64, HearthError>> + Send;

    /// Insert or replace the minutes for (subject, date).
    ///
    /// Each call is one atomic statement; callers own the read-modify-write
    /// cycle.
    fn set_minutes(
        &self,
        subject: Subject,
        metric: Metric,
        date: NaiveDate,
        minutes: f64,
    ) -> impl Future<Output = Result<(), HearthError>> + Send;

    /// Remove every ledger row (both metrics) owned by a subject.
    fn delete_for_subject(
        &self,
        subject: Subject,
    ) -> impl Future<Output = Result<(), HearthError>> + Send;
}

/// CRUD for accounts.
pub trait AccountRepository {
    /// Persist a new account.
    fn create(
        &self,
        account: Account,
    ) -> impl Future<Output = Result<Account, HearthError>> + Send;

    /// Look up by id.
    fn get_by_id(
        &self,
        id: AccountId,
    ) -> impl Future<Output = Result<Option<Account>, HearthError>> + Send;

    /// Look up by exact username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Account>, HearthError>> + Send;

    /// Look up by email (callers pass the lowercased form).
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Account>, HearthError>> + Send;

    /// Replace the stored account row.
    fn update(
        &self,
        account: Account,
    ) -> impl Future<Output = Result<Account, HearthError>> + Send;

    /// Delete the account row itself (overlay/ledger cascade is the
    /// service's responsibility).
    fn delete(&self, id: AccountId) -> impl Future<Output = Result<(), HearthError>> + Send;
}

impl<T: OverlayRepository + Send + Sync> OverlayRepository for std::sync::Arc<T> {
    fn get(
        &self,
        account_id: AccountId,
        device_id: &str,
    ) -> impl Future<Output = Result<Option<StateMap>, HearthError>> + Send {
        (**self).get(account_id, device_id)
    }

    fn get_for_account(
        &self,
        account_id: AccountId,
    ) -> impl Future<Output = Result<HashMap<String, StateMap>, HearthError>> + Send {
        (**self).get_for_account(account_id)
    }

    fn upsert(
        &self,
        account_id: AccountId,
        device_id: &str,
        state: &StateMap,
        updated_at: Timestamp,
    ) -> impl Future<Output = Result<(), HearthError>> + Send {
        (**self).upsert(account_id, device_id, state, updated_at)
    }

    fn delete_for_account(
        &self,
        account_id: AccountId,
    ) -> impl Future<Output = Result<(), HearthError>> + Send {
        (**self).delete_for_account(account_id)
    }
}

impl<T: UsageLedger + Send + Sync> UsageLedger for std::sync::Arc<T> {
    fn minutes_for_day(
        &self,
        subject: Subject,
        metric: Metric,
        date: NaiveDate,
    ) -> impl Future<Output = Result<f64, HearthError>> + Send {
        (**self).minutes_for_day(subject, metric, date)
    }

    fn set_minutes(
        &self,
        subject: Subject,
        metric: Metric,
        date: NaiveDate,
        minutes: f64,
    ) -> impl Future<Output = Result<(), HearthError>> + Send {
        (**self).set_minutes(subject, metric, date, minutes)
    }

    fn delete_for_subject(
        &self,
        subject: Subject,
    ) -> impl Future<Output = Result<(), HearthError>> + Send {
        (**self).delete_for_subject(subject)
    }
}

impl<T: AccountRepository + Send + Sync> AccountRepository for std::sync::Arc<T> {
    fn create(&self, account: Account) -> impl Future<Output = Result<Account, HearthError>> + Send {
        (**self).create(account)
    }

    fn get_by_id(
        &self,
        id: AccountId,
    ) -> impl Future<Output = Result<Option<Account>, HearthError>> + Send {
        (**self).get_by_id(id)
    }

    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Account>, HearthError>> + Send {
        (**self).find_by_username(username)
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Account>, HearthError>> + Send {
        (**self).find_by_email(email)
    }

    fn update(&self, account: Account) -> impl Future<Output = Result<Account, HearthError>> + Send {
        (**self).update(account)
    }

    fn delete(&self, id: AccountId) -> impl Future<Output = Result<(), HearthError>> + Send {
        (**self).delete(id)
    }
}
