pub mod report;

use colored::Colorize;
use serde::Serialize;

use crate::alerts::{alert_for, Alert, AlertPolicy};
use crate::filter::{FilterCriteria, FilterOptions};
use crate::render::map::{Marker, MarkerColor};
use crate::render::table::{TableRow, COLUMNS};
use crate::render::{ChartKind, ChartSpec};
use crate::store::TowerRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CriteriaSummary {
    pub region: String,
    #[serde(rename = "type")]
    pub tower_type: String,
    pub status: String,
}

impl From<&FilterCriteria> for CriteriaSummary {
    fn from(c: &FilterCriteria) -> Self {
        Self {
            region: c.region.to_string(),
            tower_type: c.tower_type.to_string(),
            status: c.status.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AlertEntry {
    pub message: String,
    #[serde(flatten)]
    pub detail: Alert,
}

impl From<&Alert> for AlertEntry {
    fn from(alert: &Alert) -> Self {
        Self {
            message: alert.to_string(),
            detail: alert.clone(),
        }
    }
}

/// One store record with its row, marker and alert precomputed, so the HTML dashboard can
/// re-filter the whole store without rerunning the pipeline.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InventoryEntry {
    #[serde(flatten)]
    pub row: TableRow,
    pub marker: Option<Marker>,
    pub alert: Option<AlertEntry>,
}

impl InventoryEntry {
    pub fn from_record(record: &TowerRecord, policy: &AlertPolicy) -> Self {
        Self {
            row: TableRow::from_record(record),
            marker: Marker::from_record(record),
            alert: alert_for(record, policy).as_ref().map(AlertEntry::from),
        }
    }
}

/// End state of every surface after one render cycle.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardSnapshot {
    pub reference_date: String,
    pub threshold_days: u32,
    pub criteria: CriteriaSummary,
    pub options: FilterOptions,
    pub total_towers: usize,
    pub total_antennas: u64,
    pub table: Vec<TableRow>,
    pub markers: Vec<Marker>,
    pub charts: Vec<ChartSpec>,
    pub alerts: Vec<AlertEntry>,
    pub inventory: Vec<InventoryEntry>,
    pub type_palette: [&'static str; 3],
    pub city_color: &'static str,
}

fn format_kv_line(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(":: {:<10}: {}\n", label, value));
}

fn color_status(status: &str) -> String {
    match status {
        "Active" => status.green().to_string(),
        "Under Maintenance" => status.yellow().to_string(),
        _ => status.red().to_string(),
    }
}

fn color_marker(color: MarkerColor) -> String {
    let label = color.css();
    match color {
        MarkerColor::Green => label.green().bold().to_string(),
        MarkerColor::Orange => label.yellow().bold().to_string(),
        MarkerColor::Red => label.red().bold().to_string(),
    }
}

fn push_table(out: &mut String, rows: &[TableRow]) {
    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.cells().iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header = COLUMNS
        .iter()
        .zip(widths.iter())
        .map(|(c, w)| format!("{:<w$}", c, w = *w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(&header.bold().white().to_string());
    out.push('\n');

    for row in rows {
        let cells = row.cells();
        let mut line = Vec::with_capacity(cells.len());
        for (i, (cell, w)) in cells.iter().zip(widths.iter()).enumerate() {
            let padded = format!("{:<w$}", cell, w = *w);
            if i == 4 {
                line.push(color_status(&padded));
            } else {
                line.push(padded);
            }
        }
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    if rows.is_empty() {
        out.push_str(&"(no towers match the current filters)".italic().to_string());
        out.push('\n');
    }
}

fn push_chart(out: &mut String, chart: &ChartSpec) {
    let glyph = match chart.kind {
        ChartKind::Pie => '●',
        ChartKind::Bar => '█',
    };
    out.push_str(&chart.title.bold().white().to_string());
    out.push('\n');
    let width = chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    for (label, value) in chart.labels.iter().zip(chart.values.iter()) {
        let bar: String = std::iter::repeat(glyph).take(*value).collect();
        out.push_str(&format!("  {:<w$}  {} {}\n", label, bar.cyan(), value, w = width));
    }
    if chart.labels.is_empty() {
        out.push_str("  (no categories)\n");
    }
}

pub fn render_text(snapshot: &DashboardSnapshot) -> Vec<u8> {
    let mut out = String::new();
    format_kv_line(&mut out, "Towers", &snapshot.total_towers.to_string());
    format_kv_line(&mut out, "Antennas", &snapshot.total_antennas.to_string());
    format_kv_line(
        &mut out,
        "Filters",
        &format!(
            "region={} type={} status={}",
            snapshot.criteria.region, snapshot.criteria.tower_type, snapshot.criteria.status
        ),
    );
    format_kv_line(
        &mut out,
        "Reference",
        &format!(
            "{} (overdue after {} days)",
            snapshot.reference_date, snapshot.threshold_days
        ),
    );
    out.push('\n');

    push_table(&mut out, &snapshot.table);
    out.push('\n');

    for chart in snapshot.charts.iter() {
        push_chart(&mut out, chart);
        out.push('\n');
    }

    out.push_str(&"Map".bold().white().to_string());
    out.push('\n');
    for m in snapshot.markers.iter() {
        out.push_str(&format!(
            "  {}{}{} {} {} ({:.4}, {:.4})\n",
            "[".bold().white(),
            color_marker(m.color),
            "]".bold().white(),
            m.popup.id,
            m.popup.city,
            m.lat,
            m.lng
        ));
    }
    out.push('\n');

    out.push_str(&"Alerts".bold().white().to_string());
    out.push('\n');
    for a in snapshot.alerts.iter() {
        out.push_str(&format!(
            "  {}{}{} {}\n",
            "[".bold().white(),
            "WRN".bold().yellow(),
            "]".bold().white(),
            a.message
        ));
    }
    if snapshot.alerts.is_empty() {
        out.push_str("  none\n");
    }
    out.into_bytes()
}

pub fn render_json(snapshot: &DashboardSnapshot) -> Vec<u8> {
    serde_json::to_vec_pretty(snapshot).unwrap_or_else(|_| b"{}\n".to_vec())
}

pub fn render_html(snapshot: &DashboardSnapshot) -> Vec<u8> {
    report::render_html(snapshot)
}

pub fn render(snapshot: &DashboardSnapshot, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(snapshot),
        OutputFormat::Json => render_json(snapshot),
        OutputFormat::Html => render_html(snapshot),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::alerts::AlertPolicy;
    use crate::orchestrator::MemoryDashboard;
    use crate::store::TowerStore;

    fn snapshot() -> DashboardSnapshot {
        let store = TowerStore::sample();
        let mut dash = MemoryDashboard::in_memory(
            &store,
            AlertPolicy::new(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()),
        );
        dash.render();
        dash.snapshot()
    }

    #[test]
    fn format_parse_and_inference() {
        assert_eq!(OutputFormat::parse(" HTML "), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::parse("xml"), None);
        assert_eq!(
            infer_format_from_path("out/dash.JSON"),
            Some(OutputFormat::Json)
        );
        assert_eq!(infer_format_from_path("dash"), None);
    }

    #[test]
    fn json_snapshot_carries_alert_messages_and_kinds() {
        let value: serde_json::Value = serde_json::from_slice(&render_json(&snapshot())).unwrap();
        assert_eq!(value["total_towers"], 4);
        assert_eq!(value["total_antennas"], 23);
        let alerts = value["alerts"].as_array().unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0]["kind"], "status");
        assert_eq!(alerts[0]["id"], "TWR-002");
        assert_eq!(value["markers"][1]["color"], "orange");
        assert_eq!(value["table"][0]["type"], "SST");
    }

    #[test]
    fn text_lists_rows_and_alerts() {
        let text = String::from_utf8(render_text(&snapshot())).unwrap();
        assert!(text.contains("TWR-003"));
        assert!(text.contains("Towers by City"));
        assert!(text.contains("TWR-004 in Chennai is Non-functional"));
    }
}
