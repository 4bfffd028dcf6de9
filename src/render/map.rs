use serde::Serialize;

use crate::filter::FilteredView;
use crate::store::{TowerRecord, TowerStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Orange,
    Red,
}

impl MarkerColor {
    pub fn for_status(status: TowerStatus) -> Self {
        match status {
            TowerStatus::Active => Self::Green,
            TowerStatus::UnderMaintenance => Self::Orange,
            _ => Self::Red,
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

/// Receives "view report" requests raised from a marker popup.
pub trait HealthReportHandler {
    fn request_report(&mut self, tower_id: &str);
}

/// The popup's report button, bound to one tower id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportAction {
    tower_id: String,
}

impl ReportAction {
    pub fn tower_id(&self) -> &str {
        &self.tower_id
    }

    pub fn invoke(&self, handler: &mut dyn HealthReportHandler) {
        handler.request_report(&self.tower_id);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MarkerPopup {
    pub id: String,
    pub city: String,
    #[serde(rename = "type")]
    pub tower_type: String,
    pub status: String,
    pub report: ReportAction,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    pub color: MarkerColor,
    pub popup: MarkerPopup,
}

impl Marker {
    /// `None` when the record's coordinates cannot be placed on a map.
    pub fn from_record(record: &TowerRecord) -> Option<Self> {
        let lat_ok = record.lat.is_finite() && (-90.0..=90.0).contains(&record.lat);
        let lng_ok = record.lng.is_finite() && (-180.0..=180.0).contains(&record.lng);
        if !lat_ok || !lng_ok {
            return None;
        }
        Some(Self {
            lat: record.lat,
            lng: record.lng,
            color: MarkerColor::for_status(record.status),
            popup: MarkerPopup {
                id: record.id.clone(),
                city: record.city.clone(),
                tower_type: record.tower_type.label().to_string(),
                status: record.status.label().to_string(),
                report: ReportAction {
                    tower_id: record.id.clone(),
                },
            },
        })
    }
}

/// Map collaborator. Grouping of dense markers is left to the layer.
pub trait MarkerLayer {
    fn clear_markers(&mut self);
    fn add_marker(&mut self, marker: Marker);
    fn markers(&self) -> &[Marker];
}

pub struct MapRenderer<L> {
    layer: L,
}

impl<L: MarkerLayer> MapRenderer<L> {
    pub fn new(layer: L) -> Self {
        Self { layer }
    }

    pub fn render(&mut self, view: &FilteredView<'_>) {
        self.layer.clear_markers();
        for record in view {
            match Marker::from_record(record) {
                Some(marker) => self.layer.add_marker(marker),
                None => tracing::warn!(
                    id = %record.id,
                    lat = record.lat,
                    lng = record.lng,
                    "skipping marker with out-of-range coordinates"
                ),
            }
        }
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    pub fn find_marker(&self, tower_id: &str) -> Option<&Marker> {
        self.layer
            .markers()
            .iter()
            .find(|m| m.popup.report.tower_id() == tower_id)
    }
}
