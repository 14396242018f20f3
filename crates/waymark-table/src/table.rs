//! Versioned in-memory project table and row filtering.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;
use waymark_core::ProjectRecord;

use crate::columns::ResolvedColumns;
use crate::TableError;

// ============================================================================
// Version Tokens
// ============================================================================

/// Monotonic edit counter for one table.
///
/// Derived artifacts (records, roadmaps) carry no back-reference to the
/// table; a reader holding an old token can compare it against `version()`
/// to detect staleness. Mutation never invalidates earlier snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableVersion(pub u64);

impl Default for TableVersion {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for TableVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

// ============================================================================
// Project Table
// ============================================================================

/// In-memory snapshot of the source spreadsheet.
///
/// Cells are untyped trimmed strings; interpretation (dates, amounts) happens
/// downstream. Rows always have exactly `headers.len()` cells: ragged input
/// is padded (or clipped) on construction, so cell access never surprises.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    version: TableVersion,
}

impl ProjectTable {
    /// Build a table from pre-split cells, at version 1.
    pub fn from_rows<H, C>(headers: Vec<H>, rows: Vec<Vec<C>>) -> Self
    where
        H: Into<String>,
        C: Into<String>,
    {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|h| h.into().trim().to_string())
            .collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut cells: Vec<String> = row
                    .into_iter()
                    .map(|c| c.into().trim().to_string())
                    .collect();
                cells.resize(width, String::new());
                cells
            })
            .collect();
        Self {
            headers,
            rows,
            version: TableVersion(1),
        }
    }

    /// Current version token.
    pub fn version(&self) -> TableVersion {
        self.version
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }

    /// Index of an exact header match.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Overwrite one cell. Returns the bumped version token.
    pub fn edit_cell(
        &mut self,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<TableVersion, TableError> {
        if row >= self.rows.len() {
            return Err(TableError::RowOutOfBounds {
                row,
                rows: self.rows.len(),
            });
        }
        if col >= self.headers.len() {
            return Err(TableError::ColumnOutOfBounds {
                col,
                cols: self.headers.len(),
            });
        }
        self.rows[row][col] = value.into().trim().to_string();
        self.version = TableVersion(self.version.0 + 1);
        Ok(self.version)
    }

    /// Remove one row. Returns the bumped version token.
    pub fn delete_row(&mut self, row: usize) -> Result<TableVersion, TableError> {
        if row >= self.rows.len() {
            return Err(TableError::RowOutOfBounds {
                row,
                rows: self.rows.len(),
            });
        }
        self.rows.remove(row);
        self.version = TableVersion(self.version.0 + 1);
        Ok(self.version)
    }

    /// Snapshot rows into pipeline records using the resolved columns.
    ///
    /// Rows with a blank project cell are skipped; empty milestone cells are
    /// simply absent from the record.
    pub fn records(&self, columns: &ResolvedColumns) -> Vec<ProjectRecord> {
        let mut records = Vec::with_capacity(self.rows.len());
        for (idx, row) in self.rows.iter().enumerate() {
            let project = row.get(columns.project).map(String::as_str).unwrap_or("");
            if project.is_empty() {
                debug!("skipping row {idx}: blank project id");
                continue;
            }
            let mut record = ProjectRecord::new(project);
            for (&kind, &col) in &columns.milestones {
                match row.get(col) {
                    Some(cell) if !cell.is_empty() => {
                        record.milestones.insert(kind, cell.clone());
                    }
                    _ => {}
                }
            }
            records.push(record);
        }
        records
    }

    /// Indices of rows passing the filter, in row order. Never mutates.
    pub fn filtered(&self, filter: &RowFilter) -> Vec<usize> {
        (0..self.rows.len())
            .filter(|&row| self.row_matches(row, filter))
            .collect()
    }

    fn row_matches(&self, row: usize, filter: &RowFilter) -> bool {
        for (column, allowed) in &filter.columns {
            let value = self
                .column_index(column)
                .and_then(|col| self.cell(row, col))
                .unwrap_or("");
            if !allowed.contains(value) {
                return false;
            }
        }
        if let Some(group) = &filter.any_group {
            let hit = group.columns.iter().any(|column| {
                self.column_index(column)
                    .and_then(|col| self.cell(row, col))
                    .is_some_and(|value| group.values.contains(value))
            });
            if !hit {
                return false;
            }
        }
        true
    }
}

// ============================================================================
// Row Filters
// ============================================================================

/// Conjunction of row predicates.
///
/// Each named column constrains rows to an allowed value set; all named
/// columns must match. The optional group passes a row when *any* of its
/// columns holds one of its values (the shape of a customer filter spanning
/// several customer columns). An empty filter matches every row.
///
/// Column names are matched against headers exactly; a filter naming an
/// absent column matches no rows (the missing value is never in the set).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowFilter {
    columns: BTreeMap<String, BTreeSet<String>>,
    any_group: Option<AnyGroup>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AnyGroup {
    columns: Vec<String>,
    values: BTreeSet<String>,
}

impl RowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only rows whose `column` value is one of `values`.
    pub fn allow<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = self
            .columns
            .entry(column.into())
            .or_default();
        set.extend(values.into_iter().map(Into::into));
        self
    }

    /// Keep only rows where at least one of `columns` holds one of `values`.
    pub fn any_of<C, I, S>(mut self, columns: C, values: I) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.any_group = Some(AnyGroup {
            columns: columns.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// True when no criteria are set (matches every row).
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.any_group.is_none()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColumnProfile;
    use pretty_assertions::assert_eq;
    use waymark_core::MilestoneKind;

    fn sample_table() -> ProjectTable {
        ProjectTable::from_rows(
            vec!["Project", "NPDR Date", "DV Date", "Market", "Customer 1", "Customer 2"],
            vec![
                vec!["alpha", "2025-01-10", "2025-02-14", "automotive", "acme", ""],
                vec!["beta", "", "2025-03-01", "medical", "", "zenith"],
                vec!["gamma", "2025-04-01", "", "automotive", "acme", "zenith"],
            ],
        )
    }

    #[test]
    fn from_rows_pads_ragged_rows() {
        let table = ProjectTable::from_rows(
            vec!["A", "B", "C"],
            vec![vec!["1"], vec!["1", "2", "3", "4"]],
        );
        assert_eq!(table.row(0), Some(&["1".into(), String::new(), String::new()][..]));
        assert_eq!(table.row(1), Some(&["1".into(), "2".into(), "3".into()][..]));
    }

    #[test]
    fn from_rows_trims_cells_and_headers() {
        let table = ProjectTable::from_rows(vec!["  Project  "], vec![vec!["  alpha "]]);
        assert_eq!(table.headers(), ["Project"]);
        assert_eq!(table.cell(0, 0), Some("alpha"));
    }

    #[test]
    fn versions_start_at_one_and_bump_per_edit() {
        let mut table = sample_table();
        assert_eq!(table.version(), TableVersion(1));

        let v2 = table.edit_cell(0, 2, "2025-02-21").unwrap();
        assert_eq!(v2, TableVersion(2));
        assert_eq!(table.cell(0, 2), Some("2025-02-21"));

        let v3 = table.delete_row(1).unwrap();
        assert_eq!(v3, TableVersion(3));
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn failed_mutations_leave_version_unchanged() {
        let mut table = sample_table();

        let err = table.edit_cell(99, 0, "x").unwrap_err();
        assert!(matches!(err, TableError::RowOutOfBounds { row: 99, rows: 3 }));

        let err = table.edit_cell(0, 99, "x").unwrap_err();
        assert!(matches!(err, TableError::ColumnOutOfBounds { col: 99, cols: 6 }));

        let err = table.delete_row(3).unwrap_err();
        assert!(matches!(err, TableError::RowOutOfBounds { row: 3, rows: 3 }));

        assert_eq!(table.version(), TableVersion(1));
    }

    #[test]
    fn records_skip_blank_projects_and_empty_cells() {
        let table = ProjectTable::from_rows(
            vec!["Project", "NPDR Date", "DV Date"],
            vec![
                vec!["alpha", "2025-01-10", ""],
                vec!["", "2025-02-01", "2025-02-15"],
            ],
        );
        let columns = ColumnProfile::default().resolve(table.headers()).unwrap();
        let records = table.records(&columns);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].project, "alpha");
        assert_eq!(records[0].raw(MilestoneKind::Open), Some("2025-01-10"));
        assert_eq!(records[0].raw(MilestoneKind::DesignValidation), None);
    }

    #[test]
    fn empty_filter_matches_every_row() {
        let table = sample_table();
        assert!(RowFilter::new().is_empty());
        assert_eq!(table.filtered(&RowFilter::new()), vec![0, 1, 2]);
    }

    #[test]
    fn column_filter_narrows_rows() {
        let table = sample_table();
        let filter = RowFilter::new().allow("Market", ["automotive"]);
        assert_eq!(table.filtered(&filter), vec![0, 2]);

        let filter = RowFilter::new().allow("Market", ["automotive", "medical"]);
        assert_eq!(table.filtered(&filter), vec![0, 1, 2]);
    }

    #[test]
    fn filters_on_absent_columns_match_nothing() {
        let table = sample_table();
        let filter = RowFilter::new().allow("Region", ["emea"]);
        assert_eq!(table.filtered(&filter), Vec::<usize>::new());
    }

    #[test]
    fn any_group_passes_when_any_column_hits() {
        let table = sample_table();
        let filter = RowFilter::new().any_of(["Customer 1", "Customer 2"], ["zenith"]);
        assert_eq!(table.filtered(&filter), vec![1, 2]);

        // Combined with a column criterion: both must hold.
        let filter = RowFilter::new()
            .allow("Market", ["automotive"])
            .any_of(["Customer 1", "Customer 2"], ["zenith"]);
        assert_eq!(table.filtered(&filter), vec![2]);
    }

    #[test]
    fn version_token_display() {
        assert_eq!(TableVersion(7).to_string(), "v7");
    }
}
