use chrono::NaiveDate;

use crate::alerts::{Alert, AlertPolicy};
use crate::filter::FilterCriteria;
use crate::orchestrator::MemoryDashboard;
use crate::render::{ChartSlot, MarkerColor};
use crate::store::{TowerStatus, TowerStore};

fn policy() -> AlertPolicy {
    AlertPolicy::new(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap())
}

#[test]
fn full_store_scenario() {
    let store = TowerStore::sample();
    let mut dash = MemoryDashboard::in_memory(&store, policy());
    let cycle = dash.set_criteria(FilterCriteria::all());
    assert_eq!(cycle.total, 4);

    let snap = dash.snapshot();
    assert_eq!(snap.total_towers, 4);
    assert_eq!(snap.table.len(), 4);
    assert_eq!(snap.markers.len(), 4);

    let alerts = dash.summary().alerts();
    assert_eq!(alerts.len(), 2);
    assert!(matches!(
        &alerts[0],
        Alert::Status { city, status: TowerStatus::UnderMaintenance, .. } if city == "Delhi"
    ));
    assert!(matches!(
        &alerts[1],
        Alert::Status { city, status: TowerStatus::NonFunctional, .. } if city == "Chennai"
    ));

    let by_type = dash.charts().live(ChartSlot::TypeDistribution).unwrap();
    assert_eq!(by_type.labels, vec!["SST", "Monopole", "TPL"]);
    assert_eq!(by_type.values, vec![2, 1, 1]);
}

#[test]
fn active_only_scenario() {
    let store = TowerStore::sample();
    let mut dash = MemoryDashboard::in_memory(&store, policy());
    dash.set_status("Active").unwrap();

    let snap = dash.snapshot();
    assert_eq!(snap.total_towers, 2);
    let cities: Vec<&str> = snap.table.iter().map(|r| r.city.as_str()).collect();
    assert_eq!(cities, vec!["Mumbai", "Bangalore"]);
    // 29 and 47 days since service against a 90 day threshold.
    assert!(snap.alerts.is_empty());

    let late = AlertPolicy::new(NaiveDate::from_ymd_opt(2025, 9, 20).unwrap());
    let mut dash = MemoryDashboard::in_memory(&store, late);
    dash.set_status("Active").unwrap();
    let alerts = dash.summary().alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(
        alerts[0],
        Alert::Overdue {
            id: "TWR-003".to_string(),
            city: "Bangalore".to_string(),
            days_overdue: 7,
        }
    );
}

#[test]
fn single_region_scenario() {
    let store = TowerStore::sample();
    let mut dash = MemoryDashboard::in_memory(&store, policy());
    dash.set_region("Delhi");

    let snap = dash.snapshot();
    assert_eq!(snap.total_towers, 1);
    assert_eq!(snap.markers.len(), 1);
    assert_eq!(snap.markers[0].color, MarkerColor::Orange);
    assert_eq!(snap.markers[0].popup.id, "TWR-002");
}

#[test]
fn no_match_scenario() {
    let store = TowerStore::sample();
    let mut dash = MemoryDashboard::in_memory(&store, policy());
    dash.render();
    dash.set_region("Delhi");
    let cycle = dash.set_tower_type("Monopole").unwrap();
    assert_eq!(cycle.total, 0);

    let snap = dash.snapshot();
    assert_eq!(snap.total_towers, 0);
    assert!(snap.table.is_empty());
    assert!(snap.markers.is_empty());
    assert!(snap.alerts.is_empty());
    assert_eq!(snap.charts.len(), 2);
    assert!(snap.charts.iter().all(|c| c.labels.is_empty()));
    assert_eq!(dash.charts().live_count(), 2);
}

#[test]
fn every_consumer_sees_the_same_view() {
    let store = TowerStore::sample();
    let mut dash = MemoryDashboard::in_memory(&store, policy());
    dash.set_tower_type("SST").unwrap();

    let snap = dash.snapshot();
    let table_ids: Vec<&str> = snap.table.iter().map(|r| r.id.as_str()).collect();
    let marker_ids: Vec<&str> = snap.markers.iter().map(|m| m.popup.id.as_str()).collect();
    assert_eq!(table_ids, marker_ids);
    for chart in snap.charts.iter() {
        assert_eq!(chart.values.iter().sum::<usize>(), snap.total_towers);
    }
    assert!(snap
        .alerts
        .iter()
        .all(|a| table_ids.contains(&a.detail.tower_id())));
}
