use super::{MaintenanceDate, TowerRecord, TowerStatus, TowerType};

#[allow(clippy::too_many_arguments)]
fn tower(
    id: &str,
    city: &str,
    tower_type: TowerType,
    antennas: u32,
    status: TowerStatus,
    lat: f64,
    lng: f64,
    last_maint: &str,
) -> TowerRecord {
    TowerRecord {
        id: id.to_string(),
        city: city.to_string(),
        tower_type,
        antennas,
        status,
        lat,
        lng,
        last_maint: MaintenanceDate::parse(last_maint),
    }
}

/// Bundled inventory used when no dataset file is configured.
pub fn towers() -> Vec<TowerRecord> {
    vec![
        tower(
            "I-KA-MGDI-ENB-0018",
            "Mumbai",
            TowerType::Sst,
            8,
            TowerStatus::Active,
            19.0760,
            72.8777,
            "2025-07-03",
        ),
        tower(
            "TWR-002",
            "Delhi",
            TowerType::Sst,
            6,
            TowerStatus::UnderMaintenance,
            28.7041,
            77.1025,
            "2025-05-20",
        ),
        tower(
            "TWR-003",
            "Bangalore",
            TowerType::Monopole,
            5,
            TowerStatus::Active,
            12.9716,
            77.5946,
            "2025-06-15",
        ),
        tower(
            "TWR-004",
            "Chennai",
            TowerType::Tpl,
            4,
            TowerStatus::NonFunctional,
            13.0827,
            80.2707,
            "2025-04-10",
        ),
    ]
}
