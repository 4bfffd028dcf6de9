use crate::alerts::{derive_alerts, AlertPolicy};
use crate::filter::{self, evaluate, FilterCriteria, FilterOptions, SelectorError};
use crate::output::{AlertEntry, CriteriaSummary, DashboardSnapshot, InventoryEntry};
use crate::render::chart::{CITY_COLOR, TYPE_PALETTE};
use crate::render::surface::{ChartRegistry, MarkerSet, RowBuffer, SummaryBuffer};
use crate::render::{
    ChartBackend, ChartRenderer, ChartSlot, HealthReportHandler, MapRenderer, MarkerLayer,
    SummaryPanel, TableRenderer, TableSurface,
};
use crate::store::TowerStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleSummary {
    pub cycle: u64,
    pub total: usize,
    pub alerts: usize,
}

/// Drives render cycles: one filter evaluation, then every consumer exactly once with the
/// same view. Consumers only ever see `&FilteredView`, and `render` takes `&mut self`, so
/// cycles cannot overlap.
pub struct RenderOrchestrator<'s, T, M, C: ChartBackend, P> {
    store: &'s TowerStore,
    criteria: FilterCriteria,
    policy: AlertPolicy,
    table: TableRenderer<T>,
    map: MapRenderer<M>,
    charts: ChartRenderer<C>,
    summary: P,
    cycles: u64,
}

impl<'s, T, M, C, P> RenderOrchestrator<'s, T, M, C, P>
where
    T: TableSurface,
    M: MarkerLayer,
    C: ChartBackend,
    P: SummaryPanel,
{
    pub fn new(
        store: &'s TowerStore,
        policy: AlertPolicy,
        table: T,
        markers: M,
        charts: C,
        summary: P,
    ) -> Self {
        Self {
            store,
            criteria: FilterCriteria::all(),
            policy,
            table: TableRenderer::new(table),
            map: MapRenderer::new(markers),
            charts: ChartRenderer::new(charts),
            summary,
            cycles: 0,
        }
    }

    pub fn render(&mut self) -> CycleSummary {
        let store = self.store;
        let view = evaluate(store.records(), &self.criteria);

        self.table.render(&view);
        self.map.render(&view);
        self.charts.render(&view);

        let alerts = derive_alerts(&view, &self.policy);
        self.summary.clear_alerts();
        for alert in alerts.iter() {
            self.summary.push_alert(alert);
        }
        self.summary.set_total_towers(view.len());

        self.cycles += 1;
        tracing::debug!(
            cycle = self.cycles,
            criteria = %self.criteria,
            total = view.len(),
            alerts = alerts.len(),
            "render cycle complete"
        );
        CycleSummary {
            cycle: self.cycles,
            total: view.len(),
            alerts: alerts.len(),
        }
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> CycleSummary {
        self.criteria = criteria;
        self.render()
    }

    pub fn set_region(&mut self, value: &str) -> CycleSummary {
        self.criteria.region = filter::parse_region(value);
        self.render()
    }

    pub fn set_tower_type(&mut self, value: &str) -> Result<CycleSummary, SelectorError> {
        self.criteria.tower_type = filter::parse_tower_type(value)?;
        Ok(self.render())
    }

    pub fn set_status(&mut self, value: &str) -> Result<CycleSummary, SelectorError> {
        self.criteria.status = filter::parse_status(value)?;
        Ok(self.render())
    }

    pub fn reset(&mut self) -> CycleSummary {
        self.set_criteria(FilterCriteria::all())
    }

    /// Invokes the popup report action of the marker currently placed for `tower_id`.
    /// Returns `false` when no such marker is on the map.
    pub fn request_report(&self, tower_id: &str, handler: &mut dyn HealthReportHandler) -> bool {
        match self.map.find_marker(tower_id) {
            Some(marker) => {
                marker.popup.report.invoke(handler);
                true
            }
            None => false,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_records(self.store.records())
    }

    pub fn table(&self) -> &T {
        self.table.surface()
    }

    pub fn markers(&self) -> &M {
        self.map.layer()
    }

    pub fn charts(&self) -> &C {
        self.charts.backend()
    }

    pub fn summary(&self) -> &P {
        &self.summary
    }
}

pub type MemoryDashboard<'s> =
    RenderOrchestrator<'s, RowBuffer, MarkerSet, ChartRegistry, SummaryBuffer>;

impl<'s> MemoryDashboard<'s> {
    pub fn in_memory(store: &'s TowerStore, policy: AlertPolicy) -> Self {
        Self::new(
            store,
            policy,
            RowBuffer::default(),
            MarkerSet::default(),
            ChartRegistry::default(),
            SummaryBuffer::default(),
        )
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let rows = self.table().rows().to_vec();
        let total_antennas = rows.iter().map(|r| u64::from(r.antennas)).sum();
        let charts = [ChartSlot::TypeDistribution, ChartSlot::CityDistribution]
            .into_iter()
            .filter_map(|slot| self.charts().live(slot).cloned())
            .collect();
        DashboardSnapshot {
            reference_date: self.policy.reference_date.format("%Y-%m-%d").to_string(),
            threshold_days: self.policy.threshold_days,
            criteria: CriteriaSummary::from(&self.criteria),
            options: self.filter_options(),
            total_towers: self.summary().total_towers(),
            total_antennas,
            table: rows,
            markers: self.markers().markers().to_vec(),
            charts,
            alerts: self
                .summary()
                .alerts()
                .iter()
                .map(AlertEntry::from)
                .collect(),
            inventory: self
                .store
                .records()
                .iter()
                .map(|r| InventoryEntry::from_record(r, &self.policy))
                .collect(),
            type_palette: TYPE_PALETTE,
            city_color: CITY_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::render::table::TableRow;

    /// Table surface that counts how often each operation is called.
    #[derive(Default)]
    struct CountingTable {
        clears: usize,
        rows: usize,
    }

    impl TableSurface for CountingTable {
        fn clear_rows(&mut self) {
            self.clears += 1;
            self.rows = 0;
        }

        fn append_row(&mut self, _row: TableRow) {
            self.rows += 1;
        }
    }

    fn policy() -> AlertPolicy {
        AlertPolicy::new(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap())
    }

    #[test]
    fn each_consumer_runs_once_per_cycle() {
        let store = TowerStore::sample();
        let mut dash = RenderOrchestrator::new(
            &store,
            policy(),
            CountingTable::default(),
            MarkerSet::default(),
            ChartRegistry::default(),
            SummaryBuffer::default(),
        );
        dash.render();
        dash.set_region("Delhi");
        assert_eq!(dash.table().clears, 2);
        assert_eq!(dash.table().rows, 1);
        assert_eq!(dash.charts().created(), 4);
        assert_eq!(dash.charts().live_count(), 2);
        assert_eq!(dash.cycles(), 2);
    }

    #[test]
    fn invalid_selector_leaves_criteria_untouched() {
        let store = TowerStore::sample();
        let mut dash = MemoryDashboard::in_memory(&store, policy());
        dash.render();
        assert!(dash.set_status("Retired").is_err());
        assert_eq!(dash.criteria(), &FilterCriteria::all());
        assert_eq!(dash.cycles(), 1);
    }

    #[test]
    fn report_request_only_reaches_visible_markers() {
        #[derive(Default)]
        struct Sink(Vec<String>);
        impl HealthReportHandler for Sink {
            fn request_report(&mut self, tower_id: &str) {
                self.0.push(tower_id.to_string());
            }
        }

        let store = TowerStore::sample();
        let mut dash = MemoryDashboard::in_memory(&store, policy());
        dash.set_region("Delhi");
        let mut sink = Sink::default();
        assert!(dash.request_report("TWR-002", &mut sink));
        assert!(!dash.request_report("TWR-003", &mut sink));
        assert_eq!(sink.0, vec!["TWR-002".to_string()]);
    }

    #[test]
    fn reset_restores_full_view() {
        let store = TowerStore::sample();
        let mut dash = MemoryDashboard::in_memory(&store, policy());
        dash.set_region("Delhi");
        let summary = dash.reset();
        assert_eq!(summary.total, 4);
        assert_eq!(dash.snapshot().table.len(), 4);
    }
}
