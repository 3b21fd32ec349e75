//! `SQLite` implementation of [`UsageLedger`].
//!
//! One table per metric, keyed (subject, date). The subject column holds
//! either `global` or an account id, so device-level and per-user accounting
//! share the same durability.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use hearth_app::ports::UsageLedger;
use hearth_domain::error::HearthError;
use hearth_domain::time;
use hearth_domain::usage::{Metric, Subject};

use crate::error::StorageError;

fn table(metric: Metric) -> &'static str {
    match metric {
        Metric::Heating => "heating_minutes",
        Metric::HotWater => "hot_water_minutes",
    }
}

fn select_sql(metric: Metric) -> String {
    format!(
        "SELECT minutes FROM {} WHERE subject = ? AND date = ?",
        table(metric)
    )
}

fn upsert_sql(metric: Metric) -> String {
    format!(
        "INSERT INTO {} (subject, date, minutes) VALUES (?, ?, ?)
         ON CONFLICT (subject, date) DO UPDATE SET minutes = excluded.minutes",
        table(metric)
    )
}

fn delete_sql(metric: Metric) -> String {
    format!("DELETE FROM {} WHERE subject = ?", table(metric))
}

/// `SQLite`-backed usage ledger.
pub struct SqliteUsageLedger {
    pool: SqlitePool,
}

impl SqliteUsageLedger {
    /// Create a new ledger using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UsageLedger for SqliteUsageLedger {
    async fn minutes_for_day(
        &self,
        subject: Subject,
        metric: Metric,
        date: NaiveDate,
    ) -> Result<f64, HearthError> {
        let row: Option<(f64,)> = sqlx::query_as(&select_sql(metric))
            .bind(subject.to_string())
            .bind(time::date_key(date))
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map_or(0.0, |(minutes,)| minutes))
    }

    async fn set_minutes(
        &self,
        subject: Subject,
        metric: Metric,
        date: NaiveDate,
        minutes: f64,
    ) -> Result<(), HearthError> {
        sqlx::query(&upsert_sql(metric))
            .bind(subject.to_string())
            .bind(time::date_key(date))
            .bind(minutes)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn delete_for_subject(&self, subject: Subject) -> Result<(), HearthError> {
        for metric in [Metric::Heating, Metric::HotWater] {
            sqlx::query(&delete_sql(metric))
                .bind(subject.to_string())
                .execute(&self.pool)
                .await
                .map_err(StorageError::from)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use hearth_domain::id::AccountId;

    async fn setup() -> SqliteUsageLedger {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteUsageLedger::new(db.pool().clone())
    }

    fn day(text: &str) -> NaiveDate {
        text.parse().unwrap()
    }

    #[tokio::test]
    async fn should_return_zero_when_no_row_exists() {
        let ledger = setup().await;
        let minutes = ledger
            .minutes_for_day(Subject::Global, Metric::Heating, day("2026-08-26"))
            .await
            .unwrap();
        assert_eq!(minutes, 0.0);
    }

    #[tokio::test]
    async fn should_upsert_and_read_back_minutes() {
        let ledger = setup().await;
        let date = day("2026-08-26");

        ledger
            .set_minutes(Subject::Global, Metric::HotWater, date, 12.25)
            .await
            .unwrap();
        ledger
            .set_minutes(Subject::Global, Metric::HotWater, date, 14.5)
            .await
            .unwrap();

        let minutes = ledger
            .minutes_for_day(Subject::Global, Metric::HotWater, date)
            .await
            .unwrap();
        assert_eq!(minutes, 14.5);
    }

    #[tokio::test]
    async fn should_keep_metrics_in_separate_tables() {
        let ledger = setup().await;
        let date = day("2026-08-26");

        ledger
            .set_minutes(Subject::Global, Metric::Heating, date, 30.0)
            .await
            .unwrap();

        let hot_water = ledger
            .minutes_for_day(Subject::Global, Metric::HotWater, date)
            .await
            .unwrap();
        assert_eq!(hot_water, 0.0);
    }

    #[tokio::test]
    async fn should_keep_subjects_independent() {
        let ledger = setup().await;
        let date = day("2026-08-26");
        let user = Subject::Account(AccountId::new());

        ledger
            .set_minutes(Subject::Global, Metric::Heating, date, 30.0)
            .await
            .unwrap();
        ledger
            .set_minutes(user, Metric::Heating, date, 5.0)
            .await
            .unwrap();

        assert_eq!(
            ledger
                .minutes_for_day(user, Metric::Heating, date)
                .await
                .unwrap(),
            5.0
        );
        assert_eq!(
            ledger
                .minutes_for_day(Subject::Global, Metric::Heating, date)
                .await
                .unwrap(),
            30.0
        );
    }

    #[tokio::test]
    async fn should_delete_both_metrics_for_subject() {
        let ledger = setup().await;
        let date = day("2026-08-26");
        let user = Subject::Account(AccountId::new());

        ledger
            .set_minutes(user, Metric::Heating, date, 5.0)
            .await
            .unwrap();
        ledger
            .set_minutes(user, Metric::HotWater, date, 7.0)
            .await
            .unwrap();
        ledger
            .set_minutes(Subject::Global, Metric::Heating, date, 30.0)
            .await
            .unwrap();

        ledger.delete_for_subject(user).await.unwrap();

        assert_eq!(
            ledger
                .minutes_for_day(user, Metric::Heating, date)
                .await
                .unwrap(),
            0.0
        );
        assert_eq!(
            ledger
                .minutes_for_day(user, Metric::HotWater, date)
                .await
                .unwrap(),
            0.0
        );
        // global rows survive
        assert_eq!(
            ledger
                .minutes_for_day(Subject::Global, Metric::Heating, date)
                .await
                .unwrap(),
            30.0
        );
    }
}
