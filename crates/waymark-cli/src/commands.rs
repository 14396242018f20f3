//! Command implementations behind the CLI dispatch.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use waymark_core::{MilestoneKind, RoadmapRenderer};
use waymark_render::{JsonRenderer, SvgRenderer, TextRenderer};
use waymark_table::{
    export_csv, kpi_summary, load_csv, revenue_by, top_projects, ColumnProfile, ProjectTable,
    ResolvedColumns, RowFilter,
};
use waymark_timeline::{build_roadmap, resolve};

// ============================================================================
// Shared Loading
// ============================================================================

/// Load the CSV table and resolve its columns.
///
/// Without `--profile`, the built-in header candidates apply.
fn load_table(file: &Path, profile: Option<&Path>) -> Result<(ProjectTable, ResolvedColumns)> {
    let profile = match profile {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read profile {}", path.display()))?;
            let profile = ColumnProfile::from_toml(&text)
                .with_context(|| format!("invalid profile {}", path.display()))?;
            info!("loaded column profile from {}", path.display());
            profile
        }
        None => ColumnProfile::default(),
    };

    let table = load_csv(file).with_context(|| format!("cannot load {}", file.display()))?;
    let columns = profile
        .resolve(table.headers())
        .with_context(|| format!("column resolution failed for {}", file.display()))?;
    debug!("resolved columns: {columns:?}");
    Ok((table, columns))
}

/// Parse repeated `COLUMN=V1,V2` specs into one conjunctive filter.
fn parse_filters(specs: &[String]) -> Result<RowFilter> {
    let mut filter = RowFilter::new();
    for spec in specs {
        let Some((column, values)) = spec.split_once('=') else {
            bail!("invalid filter '{spec}' (expected COLUMN=V1,V2)");
        };
        let column = column.trim();
        let values: Vec<&str> = values
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();
        if column.is_empty() || values.is_empty() {
            bail!("invalid filter '{spec}' (expected COLUMN=V1,V2)");
        }
        filter = filter.allow(column, values);
    }
    Ok(filter)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("cannot write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => {
            print!("{content}");
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

// ============================================================================
// check
// ============================================================================

/// Report which columns resolved and how many rows carry timeline data.
pub fn run_check(file: &Path, profile: Option<&Path>) -> Result<()> {
    let (table, columns) = load_table(file, profile)?;
    let headers = table.headers();

    println!(
        "{}: {} rows, {} columns",
        file.display(),
        table.row_count(),
        headers.len()
    );
    println!();
    println!("{:<24}{}", "project", headers[columns.project]);
    for kind in MilestoneKind::ALL {
        match columns.milestone(kind) {
            Some(idx) => println!("{:<24}{}", kind.as_str(), headers[idx]),
            None => println!("{:<24}(not found; disabled)", kind.as_str()),
        }
    }
    match columns.revenue {
        Some(idx) => println!("{:<24}{}", "revenue", headers[idx]),
        None => println!("{:<24}(not found; disabled)", "revenue"),
    }
    let groups: Vec<&str> = columns
        .groups
        .iter()
        .map(|(_, idx)| headers[*idx].as_str())
        .collect();
    println!(
        "{:<24}{}",
        "groups",
        if groups.is_empty() { "(none)".to_string() } else { groups.join(", ") }
    );
    let customers: Vec<&str> = columns
        .customers
        .iter()
        .map(|idx| headers[*idx].as_str())
        .collect();
    println!(
        "{:<24}{}",
        "customers",
        if customers.is_empty() { "(none)".to_string() } else { customers.join(", ") }
    );

    let today = Local::now().date_naive();
    let records = table.records(&columns);
    let with_data = records.iter().filter(|r| resolve(r, today).has_data).count();
    println!();
    println!("timeline coverage: {with_data} of {} projects", records.len());
    Ok(())
}

// ============================================================================
// roadmap
// ============================================================================

/// Build the roadmap and render it in the requested format.
pub fn run_roadmap(
    file: &Path,
    profile: Option<&Path>,
    as_of: Option<NaiveDate>,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let (table, columns) = load_table(file, profile)?;
    let records = table.records(&columns);
    let now = as_of.unwrap_or_else(|| Local::now().date_naive());
    let roadmap = build_roadmap(&records, now);

    let rendered = match format {
        "text" => TextRenderer::default().render(&roadmap)?,
        "json" => JsonRenderer::new().render(&roadmap)?,
        "svg" => SvgRenderer::default().render(&roadmap)?,
        other => bail!("unknown format: {other} (expected text, json or svg)"),
    };
    write_output(output, &rendered)
}

// ============================================================================
// summary
// ============================================================================

/// Print the KPI block, with optional rollup and top-projects sections.
pub fn run_summary(
    file: &Path,
    profile: Option<&Path>,
    group_by: Option<&str>,
    top: usize,
    filters: &[String],
) -> Result<()> {
    let (table, columns) = load_table(file, profile)?;
    let filter = parse_filters(filters)?;
    let summary = kpi_summary(&table, &columns, &filter);

    println!("projects:        {}", summary.projects);
    if columns.revenue.is_some() {
        println!("total revenue:   {}", summary.total_revenue);
        match &summary.top_contributor {
            Some((project, amount)) => println!("top contributor: {project} ({amount})"),
            None => println!("top contributor: (none)"),
        }
    } else {
        println!("total revenue:   (no revenue column)");
    }

    if let Some(group) = group_by {
        let rollup = revenue_by(&table, &columns, &filter, group);
        println!();
        println!("revenue by {group}:");
        if rollup.is_empty() {
            println!("  (no data)");
        }
        for (key, amount) in rollup {
            println!("  {key:<20} {amount}");
        }
    }

    if top > 0 && columns.revenue.is_some() {
        let entries = top_projects(&table, &columns, &filter, top);
        if !entries.is_empty() {
            println!();
            println!("top projects:");
            for (project, amount) in entries {
                println!("  {project:<20} {amount}");
            }
        }
    }
    Ok(())
}

// ============================================================================
// export
// ============================================================================

/// Write a filtered copy of the table. Needs no column profile: filters name
/// headers directly.
pub fn run_export(file: &Path, output: &Path, filters: &[String]) -> Result<()> {
    let table = load_csv(file).with_context(|| format!("cannot load {}", file.display()))?;
    let filter = parse_filters(filters)?;
    let kept = table.filtered(&filter).len();

    let out = File::create(output)
        .with_context(|| format!("cannot create {}", output.display()))?;
    export_csv(&table, out, &filter)?;

    println!(
        "wrote {kept} of {} rows to {}",
        table.row_count(),
        output.display()
    );
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse_into_a_conjunction() {
        let specs = vec![
            "Market=automotive, medical".to_string(),
            "Scene=indoor".to_string(),
        ];
        let filter = parse_filters(&specs).unwrap();
        assert_eq!(
            filter,
            RowFilter::new()
                .allow("Market", ["automotive", "medical"])
                .allow("Scene", ["indoor"])
        );
    }

    #[test]
    fn no_specs_mean_match_everything() {
        let filter = parse_filters(&[]).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn malformed_filters_are_rejected() {
        assert!(parse_filters(&["Market".to_string()]).is_err());
        assert!(parse_filters(&["=automotive".to_string()]).is_err());
        assert!(parse_filters(&["Market=".to_string()]).is_err());
        assert!(parse_filters(&["Market=,,".to_string()]).is_err());
    }

    #[test]
    fn repeated_columns_merge_their_values() {
        let specs = vec!["Market=automotive".to_string(), "Market=medical".to_string()];
        let filter = parse_filters(&specs).unwrap();
        assert_eq!(
            filter,
            RowFilter::new().allow("Market", ["automotive", "medical"])
        );
    }
}
