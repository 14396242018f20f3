//! CSV ingest and filtered export.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::table::{ProjectTable, RowFilter};
use crate::TableError;

/// Load a CSV file into a table.
///
/// The first record is the header row. Cells are trimmed and ragged rows are
/// padded rather than rejected; spreadsheet exports are rarely rectangular.
pub fn load_csv(path: impl AsRef<Path>) -> Result<ProjectTable, TableError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = read_csv(file)?;
    info!(
        "loaded {} rows x {} columns from {}",
        table.row_count(),
        table.headers().len(),
        path.display()
    );
    Ok(table)
}

/// Load CSV from any reader.
pub fn read_csv(reader: impl Read) -> Result<ProjectTable, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    Ok(ProjectTable::from_rows(headers, rows))
}

/// Write headers plus the rows passing `filter` as CSV.
pub fn export_csv<W: Write>(
    table: &ProjectTable,
    writer: W,
    filter: &RowFilter,
) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.headers())?;
    for idx in table.filtered(filter) {
        if let Some(row) = table.row(idx) {
            csv_writer.write_record(row)?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    #[test]
    fn load_csv_trims_and_pads() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "Project, DV Date ,Market").unwrap();
        writeln!(file, " alpha ,2025-02-14,automotive").unwrap();
        writeln!(file, "beta,2025-03-01").unwrap();
        file.flush().unwrap();

        let table = load_csv(file.path()).unwrap();
        assert_eq!(table.headers(), ["Project", "DV Date", "Market"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 0), Some("alpha"));
        assert_eq!(table.cell(1, 2), Some(""));
    }

    #[test]
    fn load_csv_reports_missing_files() {
        let err = load_csv("/nonexistent/projects.csv").unwrap_err();
        assert!(matches!(err, TableError::Io(_)));
    }

    #[test]
    fn read_csv_accepts_in_memory_input() {
        let table = read_csv("Project,NPDR Date\nalpha,2025-01-10\n".as_bytes()).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(0, 1), Some("2025-01-10"));
    }

    #[test]
    fn export_writes_filtered_rows_only() {
        let table = ProjectTable::from_rows(
            vec!["Project", "Market"],
            vec![
                vec!["alpha", "automotive"],
                vec!["beta", "medical"],
                vec!["gamma", "automotive"],
            ],
        );
        let filter = RowFilter::new().allow("Market", ["automotive"]);

        let mut out = Vec::new();
        export_csv(&table, &mut out, &filter).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Project,Market\nalpha,automotive\ngamma,automotive\n");
    }

    #[test]
    fn export_with_empty_filter_keeps_everything() {
        let table = ProjectTable::from_rows(
            vec!["Project"],
            vec![vec!["alpha"], vec!["beta"]],
        );
        let mut out = Vec::new();
        export_csv(&table, &mut out, &RowFilter::new()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Project\nalpha\nbeta\n"
        );
    }
}
