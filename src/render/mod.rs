//! Presentation surfaces and the renderers that own them.
//!
//! Every renderer rebuilds its surface from scratch for each filtered view: previous rows,
//! markers and chart instances are discarded before the new set is created.

pub mod chart;
pub mod map;
pub mod surface;
pub mod table;

use crate::alerts::Alert;

pub use chart::{ChartBackend, ChartKind, ChartRenderer, ChartSlot, ChartSpec, Distribution};
pub use map::{HealthReportHandler, Marker, MarkerColor, MarkerLayer, MapRenderer, ReportAction};
pub use table::{TableRenderer, TableRow, TableSurface};

/// Host-side metric card and alert list.
pub trait SummaryPanel {
    fn set_total_towers(&mut self, total: usize);
    fn clear_alerts(&mut self);
    fn push_alert(&mut self, alert: &Alert);
}
