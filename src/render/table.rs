use serde::Serialize;

use crate::filter::FilteredView;
use crate::store::TowerRecord;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub id: String,
    pub city: String,
    #[serde(rename = "type")]
    pub tower_type: String,
    pub antennas: u32,
    pub status: String,
    pub last_maint: String,
}

impl TableRow {
    pub fn from_record(record: &TowerRecord) -> Self {
        Self {
            id: record.id.clone(),
            city: record.city.clone(),
            tower_type: record.tower_type.label().to_string(),
            antennas: record.antennas,
            status: record.status.label().to_string(),
            last_maint: record.last_maint.raw().to_string(),
        }
    }

    pub fn cells(&self) -> [String; 6] {
        [
            self.id.clone(),
            self.city.clone(),
            self.tower_type.clone(),
            self.antennas.to_string(),
            self.status.clone(),
            self.last_maint.clone(),
        ]
    }
}

pub const COLUMNS: [&str; 6] = ["ID", "City", "Type", "Antennas", "Status", "Last Maintenance"];

pub trait TableSurface {
    fn clear_rows(&mut self);
    fn append_row(&mut self, row: TableRow);
}

pub struct TableRenderer<S> {
    surface: S,
}

impl<S: TableSurface> TableRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn render(&mut self, view: &FilteredView<'_>) {
        self.surface.clear_rows();
        for record in view {
            self.surface.append_row(TableRow::from_record(record));
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
