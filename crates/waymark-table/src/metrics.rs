//! Portfolio revenue metrics over the filtered table.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::columns::{find_named, ResolvedColumns};
use crate::table::{ProjectTable, RowFilter};

// ============================================================================
// Amount Parsing
// ============================================================================

/// Parse a revenue cell into a decimal amount.
///
/// Thousands separators are stripped. Blank or unparseable cells count as
/// zero: in the source spreadsheets an empty revenue cell means "nothing
/// booked", not "unknown".
pub fn parse_amount(raw: &str) -> Decimal {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}

// ============================================================================
// KPIs
// ============================================================================

/// Headline numbers for the summary view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KpiSummary {
    /// Rows passing the filter.
    pub projects: usize,
    pub total_revenue: Decimal,
    /// Highest-revenue project, first occurrence winning ties. `None` when
    /// the revenue column is disabled or nothing booked revenue.
    pub top_contributor: Option<(String, Decimal)>,
}

/// Compute the KPI block over the rows passing `filter`.
pub fn kpi_summary(
    table: &ProjectTable,
    columns: &ResolvedColumns,
    filter: &RowFilter,
) -> KpiSummary {
    let indices = table.filtered(filter);
    let mut summary = KpiSummary {
        projects: indices.len(),
        ..KpiSummary::default()
    };

    let Some(revenue_col) = columns.revenue else {
        return summary;
    };

    let mut top: Option<(String, Decimal)> = None;
    for &idx in &indices {
        let amount = table
            .cell(idx, revenue_col)
            .map(parse_amount)
            .unwrap_or(Decimal::ZERO);
        summary.total_revenue += amount;

        match &top {
            Some((_, best)) if *best >= amount => {}
            _ => {
                let project = table.cell(idx, columns.project).unwrap_or("").to_string();
                top = Some((project, amount));
            }
        }
    }
    if summary.total_revenue > Decimal::ZERO {
        summary.top_contributor = top;
    }
    summary
}

// ============================================================================
// Rollups
// ============================================================================

/// Revenue rollup by an arbitrary column, descending by amount.
///
/// The group column is looked up with the usual exact-then-substring rule.
/// Blank group values land in the "(none)" bucket. Ties sort by group name
/// so output is deterministic. Empty when the revenue or group column is
/// missing.
pub fn revenue_by(
    table: &ProjectTable,
    columns: &ResolvedColumns,
    filter: &RowFilter,
    group_col: &str,
) -> Vec<(String, Decimal)> {
    let Some(revenue_col) = columns.revenue else {
        return Vec::new();
    };
    let Some(group) = find_named(table.headers(), group_col) else {
        return Vec::new();
    };

    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
    for idx in table.filtered(filter) {
        let key = match table.cell(idx, group) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => "(none)".to_string(),
        };
        let amount = table
            .cell(idx, revenue_col)
            .map(parse_amount)
            .unwrap_or(Decimal::ZERO);
        *buckets.entry(key).or_insert(Decimal::ZERO) += amount;
    }

    let mut rollup: Vec<(String, Decimal)> = buckets.into_iter().collect();
    rollup.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rollup
}

/// Top `n` rows by revenue as (project, revenue) pairs, descending.
pub fn top_projects(
    table: &ProjectTable,
    columns: &ResolvedColumns,
    filter: &RowFilter,
    n: usize,
) -> Vec<(String, Decimal)> {
    let Some(revenue_col) = columns.revenue else {
        return Vec::new();
    };

    let mut entries: Vec<(String, Decimal)> = table
        .filtered(filter)
        .into_iter()
        .map(|idx| {
            let project = table.cell(idx, columns.project).unwrap_or("").to_string();
            let amount = table
                .cell(idx, revenue_col)
                .map(parse_amount)
                .unwrap_or(Decimal::ZERO);
            (project, amount)
        })
        .collect();

    // Stable sort: row order decides ties.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}

// ============================================================================
// Tests
// ============================================================================
