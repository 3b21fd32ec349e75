//! Usage accounting value types — metrics, subjects, day buckets, trackers.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::device::StateMap;
use crate::id::AccountId;

/// A device category whose on-time is accounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Central heating (thermostat devices, `heatingOn` field).
    Heating,
    /// Hot water (`on` field).
    HotWater,
}

impl Metric {
    /// Textual form used in topics, logs, and ledger table selection.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heating => "heating",
            Self::HotWater => "hot-water",
        }
    }

    /// The boolean state-map field carrying this metric's on/off flag.
    #[must_use]
    pub fn state_field(self) -> &'static str {
        match self {
            Self::Heating => "heatingOn",
            Self::HotWater => "on",
        }
    }

    /// The metric accounted for a device kind, if any.
    #[must_use]
    pub fn for_device_kind(kind: &str) -> Option<Self> {
        match kind {
            "thermostat" => Some(Self::Heating),
            "hot-water" => Some(Self::HotWater),
            _ => None,
        }
    }

    /// Derive the ON flag from reported telemetry.
    ///
    /// A missing field counts as ON; only an explicit `false` reads as off.
    /// Known quirk of the installed devices, kept as documented behavior.
    #[must_use]
    pub fn reported_on(self, state: &StateMap) -> bool {
        state.get(self.state_field()) != Some(&serde_json::Value::Bool(false))
    }

    /// Derive the ON flag from a user command patch.
    ///
    /// Returns `None` when the patch does not touch this metric's field, in
    /// which case no accounting transition happens. When the field is
    /// present, anything but an explicit `false` counts as ON.
    #[must_use]
    pub fn commanded_on(self, patch: &StateMap) -> Option<bool> {
        patch
            .get(self.state_field())
            .map(|value| value != &serde_json::Value::Bool(false))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whose ledger a transition is credited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    /// Device-level accounting shared by all users.
    Global,
    /// Per-user accounting for command-driven transitions.
    Account(AccountId),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Account(id) => id.fmt(f),
        }
    }
}

/// One day's accumulated on-time, as returned by history queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageDay {
    /// UTC calendar day (`YYYY-MM-DD` on the wire).
    pub date: NaiveDate,
    /// Minutes on, rounded to one decimal.
    pub minutes_on: f64,
}

/// In-memory open-interval bookkeeping for one (subject, metric) pair.
///
/// Transient by design: an interval open across a process restart is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnOffTracker {
    /// Whether the tracked device is currently on.
    pub is_on: bool,
    /// Epoch seconds at which the current interval opened.
    pub since_epoch_secs: i64,
}

impl OnOffTracker {
    /// Seconds elapsed in the currently accruing interval, 0 if off or the
    /// tracker never saw a transition.
    #[must_use]
    pub fn open_seconds(self, now_epoch_secs: i64) -> f64 {
        if self.is_on && self.since_epoch_secs > 0 {
            #[allow(clippy::cast_precision_loss)]
            {
                (now_epoch_secs - self.since_epoch_secs).max(0) as f64
            }
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(json: serde_json::Value) -> StateMap {
        match json {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn should_map_device_kinds_to_metrics() {
        assert_eq!(Metric::for_device_kind("thermostat"), Some(Metric::Heating));
        assert_eq!(Metric::for_device_kind("hot-water"), Some(Metric::HotWater));
        assert_eq!(Metric::for_device_kind("light"), None);
        assert_eq!(Metric::for_device_kind("unknown"), None);
    }

    #[test]
    fn should_count_missing_telemetry_field_as_on() {
        assert!(Metric::Heating.reported_on(&state(serde_json::json!({"temperature": 19}))));
        assert!(Metric::HotWater.reported_on(&state(serde_json::json!({"on": true}))));
        assert!(!Metric::HotWater.reported_on(&state(serde_json::json!({"on": false}))));
        // non-boolean values also count as on, only explicit false is off
        assert!(Metric::HotWater.reported_on(&state(serde_json::json!({"on": "maybe"}))));
    }

    #[test]
    fn should_skip_accounting_when_command_misses_field() {
        assert_eq!(
            Metric::Heating.commanded_on(&state(serde_json::json!({"setpoint": 21}))),
            None
        );
        assert_eq!(
            Metric::Heating.commanded_on(&state(serde_json::json!({"heatingOn": false}))),
            Some(false)
        );
        assert_eq!(
            Metric::HotWater.commanded_on(&state(serde_json::json!({"on": true}))),
            Some(true)
        );
    }

    #[test]
    fn should_display_subjects_as_ledger_keys() {
        assert_eq!(Subject::Global.to_string(), "global");
        let id = AccountId::new();
        assert_eq!(Subject::Account(id).to_string(), id.to_string());
    }

    #[test]
    fn should_report_zero_open_seconds_when_off() {
        let tracker = OnOffTracker {
            is_on: false,
            since_epoch_secs: 100,
        };
        assert_eq!(tracker.open_seconds(500), 0.0);
    }

    #[test]
    fn should_report_elapsed_open_seconds_when_on() {
        let tracker = OnOffTracker {
            is_on: true,
            since_epoch_secs: 100,
        };
        assert_eq!(tracker.open_seconds(160), 60.0);
    }

    #[test]
    fn should_clamp_negative_elapsed_to_zero() {
        let tracker = OnOffTracker {
            is_on: true,
            since_epoch_secs: 200,
        };
        assert_eq!(tracker.open_seconds(100), 0.0);
    }

    #[test]
    fn should_serialize_usage_day_with_wire_field_names() {
        let day = UsageDay {
            date: NaiveDate::from_ymd_opt(2026, 8, 26).unwrap(),
            minutes_on: 12.5,
        };
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["date"], "2026-08-26");
        assert_eq!(json["minutesOn"], 12.5);
    }
}
