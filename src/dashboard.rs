// src/dashboard.rs
//! Filtering, summary metrics, and the presentation model for one render pass.
//!
//! Everything here is a pure function of the loaded dataset and the vendor
//! selection. The GUI only draws what `render` returns.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::data_types::{Dataset, Record};

pub const PENDING_STATUS: &str = "Pending";
pub const ETA_HEADER_LABEL: &str = "ETA (Arrival)";

const TABLE_ETA_FORMAT: &str = "%-d %b %Y, %H:%M";
const METRIC_ETA_FORMAT: &str = "%m-%d %H:%M";

/// Vendors the user has chosen to show. Empty means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    vendors: BTreeSet<String>,
}

impl FilterSelection {
    pub fn all(vendors: &[String]) -> Self {
        vendors.iter().cloned().collect()
    }

    pub fn set(&mut self, vendor: &str, selected: bool) {
        if selected {
            self.vendors.insert(vendor.to_string());
        } else {
            self.vendors.remove(vendor);
        }
    }

    pub fn contains(&self, vendor: &str) -> bool {
        self.vendors.contains(vendor)
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }
}

impl<S: Into<String>> FromIterator<S> for FilterSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        FilterSelection {
            vendors: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub total: usize,
    pub pending: usize,
    pub earliest_eta: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowStyle {
    pub highlighted: bool,
}

/// Inputs that produce a thinner dashboard but are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateInputWarning {
    NoRecords,
    NoEta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDisplay {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub style: RowStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub metrics: Vec<MetricDisplay>,
    pub table: TableView,
    pub warnings: Vec<DegenerateInputWarning>,
}

/// Distinct vendors in order of first appearance.
pub fn enumerate_vendors(dataset: &Dataset) -> Vec<String> {
    let mut seen = HashSet::new();
    dataset
        .records
        .iter()
        .filter(|record| seen.insert(record.vendor.as_str()))
        .map(|record| record.vendor.clone())
        .collect()
}

/// Selection to use after a reload produced `vendors`.
///
/// Starts from every vendor on the first load and whenever the set of vendors
/// changes; otherwise the user's choice is kept.
pub fn reconcile_selection(
    current: Option<&FilterSelection>,
    previous_vendors: &[String],
    vendors: &[String],
) -> FilterSelection {
    let unchanged = {
        let before: HashSet<&str> = previous_vendors.iter().map(String::as_str).collect();
        let after: HashSet<&str> = vendors.iter().map(String::as_str).collect();
        before == after
    };

    match current {
        Some(selection) if unchanged => selection.clone(),
        _ => FilterSelection::all(vendors),
    }
}

/// Keeps records whose vendor is selected. An empty selection keeps everything.
pub fn apply_filter(dataset: &Dataset, selection: &FilterSelection) -> Dataset {
    if selection.is_empty() {
        return dataset.clone();
    }

    dataset.with_records(
        dataset
            .records
            .iter()
            .filter(|record| selection.contains(&record.vendor))
            .cloned()
            .collect(),
    )
}

pub fn compute_metrics(filtered: &Dataset) -> Metrics {
    Metrics {
        total: filtered.len(),
        pending: filtered
            .records
            .iter()
            .filter(|record| is_pending(record))
            .count(),
        earliest_eta: filtered.records.iter().filter_map(|record| record.eta).min(),
    }
}

pub fn style_for(record: &Record) -> RowStyle {
    RowStyle {
        highlighted: is_pending(record),
    }
}

pub fn render(filtered: &Dataset, metrics: &Metrics) -> DashboardView {
    let mut display = vec![
        MetricDisplay {
            label: "Total Vessels",
            value: metrics.total.to_string(),
        },
        MetricDisplay {
            label: "Pending Orders",
            value: metrics.pending.to_string(),
        },
    ];

    let mut warnings = Vec::new();
    if filtered.is_empty() {
        warnings.push(DegenerateInputWarning::NoRecords);
    }
    match metrics.earliest_eta {
        Some(eta) => display.push(MetricDisplay {
            label: "Earliest ETA",
            value: eta.format(METRIC_ETA_FORMAT).to_string(),
        }),
        None if !filtered.is_empty() => warnings.push(DegenerateInputWarning::NoEta),
        None => {}
    }
    if !warnings.is_empty() {
        debug!(?warnings, "rendering with degenerate input");
    }

    let eta_index = filtered.eta_index();
    let headers = filtered
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            if i == eta_index {
                ETA_HEADER_LABEL.to_string()
            } else {
                header.clone()
            }
        })
        .collect();

    let rows = filtered
        .records
        .iter()
        .map(|record| {
            let mut cells = record.cells.clone();
            if let (Some(eta), Some(cell)) = (record.eta, cells.get_mut(eta_index)) {
                *cell = eta.format(TABLE_ETA_FORMAT).to_string();
            }
            TableRow {
                cells,
                style: style_for(record),
            }
        })
        .collect();

    DashboardView {
        metrics: display,
        table: TableView { headers, rows },
        warnings,
    }
}

fn is_pending(record: &Record) -> bool {
    record.order_status == PENDING_STATUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::{parse_eta, TableData};

    fn dataset(rows: &[[&str; 3]]) -> Dataset {
        Dataset::from_table(TableData {
            headers: vec!["Vendor".into(), "Order_Status".into(), "ETA".into()],
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        })
        .unwrap()
    }

    fn sample() -> Dataset {
        dataset(&[
            ["A", "Pending", "2024-01-02T10:00"],
            ["B", "Done", "2024-01-01T09:00"],
        ])
    }

    fn is_subsequence(sub: &Dataset, of: &Dataset) -> bool {
        let mut it = of.records.iter();
        sub.records.iter().all(|r| it.any(|o| o == r))
    }

    #[test]
    fn single_vendor_selection() {
        let d = sample();
        let filtered = apply_filter(&d, &FilterSelection::from_iter(["A"]));

        assert_eq!(filtered.records, vec![d.records[0].clone()]);
        assert_eq!(
            compute_metrics(&filtered),
            Metrics {
                total: 1,
                pending: 1,
                earliest_eta: parse_eta("2024-01-02T10:00"),
            }
        );
    }

    #[test]
    fn both_vendors_take_minimum_eta() {
        let d = sample();
        let filtered = apply_filter(&d, &FilterSelection::from_iter(["A", "B"]));

        let metrics = compute_metrics(&filtered);
        assert_eq!(metrics.total, 2);
        assert_eq!(metrics.pending, 1);
        assert_eq!(metrics.earliest_eta, parse_eta("2024-01-01T09:00"));
    }

    #[test]
    fn empty_selection_shows_everything() {
        let d = sample();
        assert_eq!(apply_filter(&d, &FilterSelection::default()), d);
    }

    #[test]
    fn unknown_vendor_filters_to_nothing() {
        let d = sample();
        let filtered = apply_filter(&d, &FilterSelection::from_iter(["Z"]));
        assert!(filtered.is_empty());
        assert_eq!(filtered.headers, d.headers);
    }

    #[test]
    fn filter_preserves_source_order() {
        let d = dataset(&[
            ["A", "Pending", ""],
            ["B", "Done", ""],
            ["C", "Pending", ""],
            ["A", "Done", ""],
            ["C", "Done", ""],
        ]);

        for selection in [vec!["A"], vec!["C", "A"], vec!["B"], vec!["A", "B", "C"]] {
            let filtered = apply_filter(&d, &FilterSelection::from_iter(selection));
            assert!(is_subsequence(&filtered, &d));
        }

        let filtered = apply_filter(&d, &FilterSelection::from_iter(["C", "A"]));
        let statuses: Vec<_> = filtered
            .records
            .iter()
            .map(|r| (r.vendor.as_str(), r.order_status.as_str()))
            .collect();
        assert_eq!(
            statuses,
            vec![("A", "Pending"), ("C", "Pending"), ("A", "Done"), ("C", "Done")]
        );
    }

    #[test]
    fn metrics_of_empty_dataset() {
        let empty = dataset(&[]);
        assert_eq!(
            compute_metrics(&empty),
            Metrics {
                total: 0,
                pending: 0,
                earliest_eta: None,
            }
        );
    }

    #[test]
    fn pending_match_is_exact() {
        let d = dataset(&[
            ["A", "Pending", ""],
            ["A", "pending", ""],
            ["A", "PENDING", ""],
            ["A", "Pending ", ""],
        ]);
        let metrics = compute_metrics(&d);
        assert_eq!(metrics.pending, 1);
        assert_eq!(metrics.total, 4);
        assert!(metrics.pending <= metrics.total);
    }

    #[test]
    fn vendors_are_listed_once_in_first_seen_order() {
        let d = dataset(&[
            ["Beta", "Done", ""],
            ["Alpha", "Done", ""],
            ["Beta", "Pending", ""],
        ]);
        let vendors = enumerate_vendors(&d);
        assert_eq!(vendors, vec!["Beta", "Alpha"]);
        assert_eq!(FilterSelection::all(&vendors).len(), 2);
    }

    #[test]
    fn whitespace_variants_are_distinct_vendors() {
        let d = dataset(&[["A", "Pending", ""], ["A ", "Pending ", ""]]);
        assert_eq!(enumerate_vendors(&d), vec!["A", "A "]);

        let view = render(&d, &compute_metrics(&d));
        assert!(view.table.rows[0].style.highlighted);
        assert!(!view.table.rows[1].style.highlighted);
        assert_eq!(view.metrics[1].value, "1");
    }

    fn names(vendors: &[&str]) -> Vec<String> {
        vendors.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn first_load_selects_every_vendor() {
        let vendors = names(&["A", "B"]);
        assert_eq!(
            reconcile_selection(None, &[], &vendors),
            FilterSelection::from_iter(["A", "B"])
        );
    }

    #[test]
    fn new_vendor_after_reload_is_shown() {
        let before = names(&["A", "B"]);
        let after = names(&["A", "B", "C"]);
        let d = dataset(&[["A", "Done", ""], ["B", "Done", ""], ["C", "Pending", ""]]);

        let selection = reconcile_selection(None, &[], &before);
        let selection = reconcile_selection(Some(&selection), &before, &after);

        assert_eq!(apply_filter(&d, &selection).len(), 3);
    }

    #[test]
    fn vanished_selection_falls_back_to_all() {
        let before = names(&["A", "B"]);
        let after = names(&["B", "C"]);
        let d = dataset(&[["B", "Done", ""], ["C", "Pending", ""]]);

        let only_a = FilterSelection::from_iter(["A"]);
        let selection = reconcile_selection(Some(&only_a), &before, &after);

        assert_eq!(selection, FilterSelection::from_iter(["B", "C"]));
        assert_eq!(apply_filter(&d, &selection).len(), 2);
    }

    #[test]
    fn unchanged_vendors_keep_user_choice() {
        let vendors = names(&["A", "B"]);
        let reordered = names(&["B", "A"]);
        let only_b = FilterSelection::from_iter(["B"]);

        assert_eq!(reconcile_selection(Some(&only_b), &vendors, &reordered), only_b);

        let cleared = FilterSelection::default();
        assert_eq!(reconcile_selection(Some(&cleared), &vendors, &vendors), cleared);
    }

    #[test]
    fn selection_toggles() {
        let mut selection = FilterSelection::all(&["A".to_string(), "B".to_string()]);
        selection.set("A", false);
        assert!(!selection.contains("A"));
        assert!(selection.contains("B"));
        selection.set("B", false);
        assert!(selection.is_empty());
    }

    #[test]
    fn render_formats_eta_and_highlights_pending() {
        let d = sample();
        let view = render(&d, &compute_metrics(&d));

        assert_eq!(view.table.headers, vec!["Vendor", "Order_Status", "ETA (Arrival)"]);
        assert_eq!(view.table.rows[0].cells[2], "2 Jan 2024, 10:00");
        assert!(view.table.rows[0].style.highlighted);
        assert!(!view.table.rows[1].style.highlighted);

        let labels: Vec<_> = view.metrics.iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["Total Vessels", "Pending Orders", "Earliest ETA"]);
        assert_eq!(view.metrics[2].value, "01-01 09:00");
        assert!(view.warnings.is_empty());
    }

    #[test]
    fn render_without_eta_omits_metric() {
        let d = dataset(&[["A", "Pending", ""], ["B", "Done", "soon"]]);
        let metrics = compute_metrics(&d);
        assert_eq!(metrics.earliest_eta, None);

        let view = render(&d, &metrics);
        assert_eq!(view.metrics.len(), 2);
        assert_eq!(view.warnings, vec![DegenerateInputWarning::NoEta]);
        // unparsed cells are shown as-is
        assert_eq!(view.table.rows[1].cells[2], "soon");
    }

    #[test]
    fn render_empty_dataset() {
        let d = dataset(&[]);
        let view = render(&d, &compute_metrics(&d));
        assert!(view.table.rows.is_empty());
        assert_eq!(view.metrics[0].value, "0");
        assert_eq!(view.warnings, vec![DegenerateInputWarning::NoRecords]);
    }

    #[test]
    fn style_follows_status() {
        let d = sample();
        assert_eq!(style_for(&d.records[0]), RowStyle { highlighted: true });
        assert_eq!(style_for(&d.records[1]), RowStyle::default());
    }
}
