use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::filter::FilteredView;
use crate::store::{TowerRecord, TowerStatus};

pub const DEFAULT_THRESHOLD_DAYS: u32 = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlertPolicy {
    pub reference_date: NaiveDate,
    pub threshold_days: u32,
}

impl AlertPolicy {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            threshold_days: DEFAULT_THRESHOLD_DAYS,
        }
    }

    pub fn with_threshold(mut self, threshold_days: u32) -> Self {
        self.threshold_days = threshold_days;
        self
    }

    /// Whole days since the last maintenance, `None` when the date could not be parsed.
    pub fn days_since(&self, record: &TowerRecord) -> Option<i64> {
        record
            .last_maint
            .date()
            .map(|d| (self.reference_date - d).num_days())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    Status {
        id: String,
        city: String,
        status: TowerStatus,
        last_maint: String,
    },
    Overdue {
        id: String,
        city: String,
        days_overdue: i64,
    },
}

impl Alert {
    pub fn tower_id(&self) -> &str {
        match self {
            Alert::Status { id, .. } | Alert::Overdue { id, .. } => id,
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::Status {
                id,
                city,
                status,
                last_maint,
            } => write!(
                f,
                "{id} in {city} is {status} (last maintenance {last_maint})."
            ),
            Alert::Overdue {
                id,
                city,
                days_overdue,
            } => {
                let unit = if *days_overdue == 1 { "day" } else { "days" };
                write!(
                    f,
                    "{id} in {city} is overdue for maintenance by {days_overdue} {unit}."
                )
            }
        }
    }
}

/// A non-Active record always yields a status alert and is never checked for age.
pub fn alert_for(record: &TowerRecord, policy: &AlertPolicy) -> Option<Alert> {
    if record.status != TowerStatus::Active {
        return Some(Alert::Status {
            id: record.id.clone(),
            city: record.city.clone(),
            status: record.status,
            last_maint: record.last_maint.raw().to_string(),
        });
    }
    let Some(days) = policy.days_since(record) else {
        tracing::debug!(id = %record.id, raw = record.last_maint.raw(), "unparseable maintenance date, skipping age check");
        return None;
    };
    let threshold = i64::from(policy.threshold_days);
    if days > threshold {
        return Some(Alert::Overdue {
            id: record.id.clone(),
            city: record.city.clone(),
            days_overdue: days - threshold,
        });
    }
    None
}

pub fn derive_alerts(view: &FilteredView<'_>, policy: &AlertPolicy) -> Vec<Alert> {
    view.iter().filter_map(|r| alert_for(r, policy)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::filter::{evaluate, FilterCriteria};
    use crate::store::{MaintenanceDate, TowerStore, TowerType};

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    fn active_serviced_on(date: &str) -> TowerRecord {
        TowerRecord {
            id: "TWR-100".to_string(),
            city: "Pune".to_string(),
            tower_type: TowerType::Rtt,
            antennas: 2,
            status: TowerStatus::Active,
            lat: 18.52,
            lng: 73.85,
            last_maint: MaintenanceDate::parse(date),
        }
    }

    fn days_before_reference(days: i64) -> String {
        (reference() - Duration::days(days))
            .format("%Y-%m-%d")
            .to_string()
    }

    #[test]
    fn under_maintenance_alerts_regardless_of_date() {
        let policy = AlertPolicy::new(reference());
        for date in ["2025-07-31", "2019-01-01", "not-a-date", "2030-01-01"] {
            let mut r = active_serviced_on(date);
            r.status = TowerStatus::UnderMaintenance;
            let alert = alert_for(&r, &policy).unwrap();
            assert!(matches!(alert, Alert::Status { .. }));
        }
    }

    #[test]
    fn exactly_at_threshold_is_not_overdue() {
        let policy = AlertPolicy::new(reference());
        let r = active_serviced_on(&days_before_reference(90));
        assert_eq!(alert_for(&r, &policy), None);
    }

    #[test]
    fn one_day_past_threshold_reports_one_day() {
        let policy = AlertPolicy::new(reference());
        let r = active_serviced_on(&days_before_reference(91));
        let alert = alert_for(&r, &policy).unwrap();
        assert_eq!(
            alert,
            Alert::Overdue {
                id: "TWR-100".to_string(),
                city: "Pune".to_string(),
                days_overdue: 1,
            }
        );
        assert_eq!(
            alert.to_string(),
            "TWR-100 in Pune is overdue for maintenance by 1 day."
        );
    }

    #[test]
    fn custom_threshold_is_honoured() {
        let policy = AlertPolicy::new(reference()).with_threshold(10);
        let r = active_serviced_on(&days_before_reference(15));
        assert!(matches!(
            alert_for(&r, &policy),
            Some(Alert::Overdue { days_overdue: 5, .. })
        ));
    }

    #[test]
    fn future_maintenance_date_is_not_overdue() {
        let policy = AlertPolicy::new(reference());
        let r = active_serviced_on("2026-01-01");
        assert_eq!(alert_for(&r, &policy), None);
    }

    #[test]
    fn invalid_date_skips_only_that_record() {
        let policy = AlertPolicy::new(reference());
        let broken = active_serviced_on("03/07/2025");
        let mut stale = active_serviced_on("2024-01-01");
        stale.id = "TWR-101".to_string();
        let store = TowerStore::from_records(vec![broken, stale]).unwrap();
        let view = evaluate(store.records(), &FilterCriteria::all());
        let alerts = derive_alerts(&view, &policy);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].tower_id(), "TWR-101");
    }

    #[test]
    fn status_alert_message_names_status_and_date() {
        let store = TowerStore::sample();
        let view = evaluate(store.records(), &FilterCriteria::all());
        let alerts = derive_alerts(&view, &AlertPolicy::new(reference()));
        let delhi = alerts.iter().find(|a| a.tower_id() == "TWR-002").unwrap();
        assert_eq!(
            delhi.to_string(),
            "TWR-002 in Delhi is Under Maintenance (last maintenance 2025-05-20)."
        );
    }
}
