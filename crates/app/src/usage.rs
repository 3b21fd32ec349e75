//! Usage accumulator — on/off transition edges to day-bucketed minutes.
//!
//! Closed intervals go to the durable ledger; the currently accruing
//! interval lives only in the in-memory tracker map and is lost on restart
//! (deliberate simplicity tradeoff).

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use tokio::sync::Mutex;

use hearth_domain::error::HearthError;
use hearth_domain::time::{self, Timestamp};
use hearth_domain::usage::{Metric, OnOffTracker, Subject, UsageDay};

use crate::ports::UsageLedger;

/// How many calendar days a history query covers, today included.
pub const HISTORY_DAYS: u64 = 7;

/// Converts transition edges into ledger minutes and answers history
/// queries.
///
/// The tracker map is guarded by an async mutex held for the whole
/// transition (including the ledger read-modify-write), so two concurrent
/// transitions for the same pair cannot interleave and lose an interval.
pub struct UsageAccumulator<L> {
    ledger: L,
    trackers: Mutex<HashMap<(Subject, Metric), OnOffTracker>>,
}

impl<L: UsageLedger + Send + Sync> UsageAccumulator<L> {
    /// Create an accumulator writing closed intervals to `ledger`.
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            trackers: Mutex::new(HashMap::new()),
        }
    }

    /// Record an on/off transition for (subject, metric).
    ///
    /// If an interval is open (tracker on, clock started), the elapsed
    /// seconds are credited entirely to the calendar day in which this
    /// transition closes it — a midnight-spanning interval credits 100% to
    /// the closing day. The tracker is then reset unconditionally, so a
    /// redundant "on" truncates the open interval and restarts the clock
    /// (documented quirk of the original accounting, preserved).
    ///
    /// # Errors
    ///
    /// Propagates ledger failures; the tracker is still reset so the clock
    /// never runs away.
    pub async fn record_transition(
        &self,
        subject: Subject,
        metric: Metric,
        new_on: bool,
    ) -> Result<(), HearthError> {
        self.record_transition_at(subject, metric, new_on, time::now())
            .await
    }

    /// [`record_transition`](Self::record_transition) with an explicit
    /// clock.
    ///
    /// # Errors
    ///
    /// Propagates ledger failures.
    pub async fn record_transition_at(
        &self,
        subject: Subject,
        metric: Metric,
        new_on: bool,
        now: Timestamp,
    ) -> Result<(), HearthError> {
        let now_secs = now.timestamp();
        let mut trackers = self.trackers.lock().await;

        let open_seconds = trackers
            .get(&(subject, metric))
            .map_or(0.0, |t| t.open_seconds(now_secs));

        // reset first: even if the ledger write fails the interval is closed
        trackers.insert(
            (subject, metric),
            OnOffTracker {
                is_on: new_on,
                since_epoch_secs: now_secs,
            },
        );

        if open_seconds > 0.0 {
            let day = now.date_naive();
            let existing = self.ledger.minutes_for_day(subject, metric, day).await?;
            let total_seconds = existing * 60.0 + open_seconds;
            let minutes = (total_seconds / 60.0 * 100.0).round() / 100.0;
            self.ledger
                .set_minutes(subject, metric, day, minutes)
                .await?;
            tracing::debug!(
                %subject, %metric, %day, seconds = open_seconds,
                "closed interval credited"
            );
        }

        Ok(())
    }

    /// Seconds in the currently accruing interval, 0 if off.
    ///
    /// Read-only; never touches the ledger.
    pub async fn open_interval_seconds(&self, subject: Subject, metric: Metric) -> f64 {
        self.open_interval_seconds_at(subject, metric, time::now())
            .await
    }

    /// [`open_interval_seconds`](Self::open_interval_seconds) with an
    /// explicit clock.
    pub async fn open_interval_seconds_at(
        &self,
        subject: Subject,
        metric: Metric,
        now: Timestamp,
    ) -> f64 {
        self.trackers
            .lock()
            .await
            .get(&(subject, metric))
            .map_or(0.0, |t| t.open_seconds(now.timestamp()))
    }

    /// Minutes per day for the 7 calendar days ending today, oldest first.
    ///
    /// Days without a ledger row report 0; today additionally gets
    /// `live_extra_seconds / 60` before rounding to one decimal. Pure read,
    /// never mutates the ledger.
    ///
    /// # Errors
    ///
    /// Propagates ledger failures.
    pub async fn history(
        &self,
        subject: Subject,
        metric: Metric,
        live_extra_seconds: f64,
    ) -> Result<Vec<UsageDay>, HearthError> {
        self.history_at(subject, metric, live_extra_seconds, time::today())
            .await
    }

    /// [`history`](Self::history) with an explicit notion of today.
    ///
    /// # Errors
    ///
    /// Propagates ledger failures.
    pub async fn history_at(
        &self,
        subject: Subject,
        metric: Metric,
        live_extra_seconds: f64,
        today: NaiveDate,
    ) -> Result<Vec<UsageDay>, HearthError> {
        let mut out = Vec::with_capacity(HISTORY_DAYS as usize);
        for back in (0..HISTORY_DAYS).rev() {
            let date = today - Days::new(back);
            let mut minutes = self.ledger.minutes_for_day(subject, metric, date).await?;
            if back == 0 && live_extra_seconds > 0.0 {
                minutes += live_extra_seconds / 60.0;
            }
            out.push(UsageDay {
                date,
                minutes_on: (minutes * 10.0).round() / 10.0,
            });
        }
        Ok(out)
    }
}
