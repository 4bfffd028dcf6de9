//! In-memory host surfaces. They keep only the end state of the latest render, which is
//! what the output writers consume.

use std::collections::HashMap;

use crate::alerts::Alert;

use super::chart::{ChartBackend, ChartSlot, ChartSpec};
use super::map::{Marker, MarkerLayer};
use super::table::{TableRow, TableSurface};
use super::SummaryPanel;

#[derive(Debug, Default)]
pub struct RowBuffer {
    rows: Vec<TableRow>,
}

impl RowBuffer {
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}

impl TableSurface for RowBuffer {
    fn clear_rows(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }
}

#[derive(Debug, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerLayer for MarkerSet {
    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChartId(u64);

/// Tracks every chart instance it hands out so leaks show up as extra live entries.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    next_id: u64,
    live: HashMap<ChartId, ChartSpec>,
    created: usize,
    destroyed: usize,
}

impl ChartRegistry {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    /// The live chart for `slot`, if any.
    pub fn live(&self, slot: ChartSlot) -> Option<&ChartSpec> {
        self.live.values().find(|spec| spec.slot == slot)
    }
}

impl ChartBackend for ChartRegistry {
    type Handle = ChartId;

    fn create(&mut self, spec: ChartSpec) -> ChartId {
        let id = ChartId(self.next_id);
        self.next_id += 1;
        self.created += 1;
        tracing::debug!(chart = id.0, slot = ?spec.slot, categories = spec.labels.len(), "chart created");
        self.live.insert(id, spec);
        id
    }

    fn destroy(&mut self, handle: ChartId) {
        if self.live.remove(&handle).is_some() {
            self.destroyed += 1;
            tracing::debug!(chart = handle.0, "chart destroyed");
        }
    }
}

#[derive(Debug, Default)]
pub struct SummaryBuffer {
    total_towers: usize,
    alerts: Vec<Alert>,
}

impl SummaryBuffer {
    pub fn total_towers(&self) -> usize {
        self.total_towers
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }
}

impl SummaryPanel for SummaryBuffer {
    fn set_total_towers(&mut self, total: usize) {
        self.total_towers = total;
    }

    fn clear_alerts(&mut self) {
        self.alerts.clear();
    }

    fn push_alert(&mut self, alert: &Alert) {
        self.alerts.push(alert.clone());
    }
}
