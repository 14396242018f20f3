//! Column profiles and header resolution.
//!
//! Source spreadsheets drift: the same milestone shows up as "NPDR Date" in
//! one export and "NPDR" in the next. A [`ColumnProfile`] lists acceptable
//! header names per role, in priority order, and resolves them against a
//! concrete header row exactly once per table load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use waymark_core::MilestoneKind;

use crate::TableError;

// ============================================================================
// Profiles
// ============================================================================

/// Declarative mapping from table roles to candidate header names.
///
/// Candidates are tried in order; the first one present wins. `Default`
/// matches the header conventions of the source spreadsheets. Profiles load
/// from TOML, where any subset of fields may be overridden; unknown keys are
/// rejected so typos surface as configuration errors instead of silently
/// disabled features.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ColumnProfile {
    /// Project id column candidates. Resolution failure here is fatal.
    pub project: Vec<String>,
    /// Project-open (NPDR) milestone candidates.
    pub open: Vec<String>,
    pub design_validation: Vec<String>,
    pub engineering_validation: Vec<String>,
    pub order_start: Vec<String>,
    /// Grouping columns offered for revenue rollups.
    pub groups: Vec<String>,
    /// Columns scanned together by the "any customer matches" filter group.
    pub customers: Vec<String>,
    pub revenue: RevenueRule,
}

impl Default for ColumnProfile {
    fn default() -> Self {
        Self {
            project: vec!["Project".into(), "Project Name".into()],
            open: vec!["NPDR Date".into(), "Open Date".into(), "NPDR".into()],
            design_validation: vec!["DV Date".into(), "Design Validation".into()],
            engineering_validation: vec!["EV Date".into(), "Engineering Validation".into()],
            order_start: vec!["Order Start".into(), "Order Start Quarter".into()],
            groups: vec!["Category".into(), "Market".into(), "Scene".into()],
            customers: vec![
                "Customer 1".into(),
                "Customer 2".into(),
                "Customer 3".into(),
                "Customer 4".into(),
                "Customer 5".into(),
            ],
            revenue: RevenueRule::default(),
        }
    }
}

/// Three-step revenue column detection, most specific rule first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RevenueRule {
    /// Step 1: first header containing all of these, case-insensitively.
    pub contains_all: Vec<String>,
    /// Step 2: first header containing `contains` but not `excludes`.
    pub contains: String,
    pub excludes: String,
    /// Step 3: exact fallback header.
    pub fallback: String,
}

impl Default for RevenueRule {
    fn default() -> Self {
        Self {
            contains_all: vec!["revenue".into(), "twd".into()],
            contains: "revenue".into(),
            excludes: "tier".into(),
            fallback: "Est. Revenue (TWD)".into(),
        }
    }
}

impl ColumnProfile {
    /// Parse a profile from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, TableError> {
        Ok(toml::from_str(text)?)
    }

    /// Candidate headers for one milestone kind, in priority order.
    pub fn milestone_candidates(&self, kind: MilestoneKind) -> &[String] {
        match kind {
            MilestoneKind::Open => &self.open,
            MilestoneKind::DesignValidation => &self.design_validation,
            MilestoneKind::EngineeringValidation => &self.engineering_validation,
            MilestoneKind::OrderStart => &self.order_start,
        }
    }

    /// Resolve this profile against a concrete header row.
    ///
    /// A miss on the project column is a configuration error. Every other
    /// miss disables that feature for the whole table and logs one warning
    /// here, not per row.
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedColumns, TableError> {
        let project = find_column(headers, &self.project).ok_or_else(|| {
            TableError::MissingProjectColumn {
                candidates: self.project.clone(),
            }
        })?;

        let mut milestones = BTreeMap::new();
        for kind in MilestoneKind::ALL {
            match find_column(headers, self.milestone_candidates(kind)) {
                Some(idx) => {
                    milestones.insert(kind, idx);
                }
                None => warn!("no {kind} column found; milestone disabled"),
            }
        }

        let revenue = find_revenue_column(headers, &self.revenue);
        if revenue.is_none() {
            warn!("no revenue column found; revenue metrics disabled");
        }

        let groups = self
            .groups
            .iter()
            .filter_map(|name| find_named(headers, name).map(|idx| (name.clone(), idx)))
            .collect();

        let mut customers = Vec::new();
        for name in &self.customers {
            if let Some(idx) = find_named(headers, name) {
                if !customers.contains(&idx) {
                    customers.push(idx);
                }
            }
        }

        Ok(ResolvedColumns {
            project,
            milestones,
            revenue,
            groups,
            customers,
        })
    }
}

// ============================================================================
// Resolved Columns
// ============================================================================

/// Column indices for one concrete header row.
///
/// Resolution is pure: the same profile and headers always produce the same
/// indices. Absent entries mean the feature is disabled for this table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    /// Project id column.
    pub project: usize,
    /// Found milestone columns by kind.
    pub milestones: BTreeMap<MilestoneKind, usize>,
    /// Revenue column, when detected.
    pub revenue: Option<usize>,
    /// Found grouping columns, as (profile name, index) pairs.
    pub groups: Vec<(String, usize)>,
    /// Found customer columns (the any-of filter group).
    pub customers: Vec<usize>,
}

impl ResolvedColumns {
    pub fn milestone(&self, kind: MilestoneKind) -> Option<usize> {
        self.milestones.get(&kind).copied()
    }
}

// ============================================================================
// Lookup
// ============================================================================

/// First candidate present in `headers`.
///
/// Exact matches win over case-insensitive substring matches: all candidates
/// are tried exactly before any candidate falls back to a substring scan.
/// Within a pass, earlier candidates win.
pub fn find_column(headers: &[String], candidates: &[String]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|c| exact_match(headers, c))
        .or_else(|| candidates.iter().find_map(|c| substring_match(headers, c)))
}

/// Single-name lookup with the same exact-then-substring rule.
pub fn find_named(headers: &[String], name: &str) -> Option<usize> {
    exact_match(headers, name).or_else(|| substring_match(headers, name))
}

fn exact_match(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn substring_match(headers: &[String], name: &str) -> Option<usize> {
    let needle = name.to_lowercase();
    if needle.is_empty() {
        return None;
    }
    headers
        .iter()
        .position(|h| h.to_lowercase().contains(&needle))
}

/// Revenue detection per [`RevenueRule`], most specific rule first.
pub fn find_revenue_column(headers: &[String], rule: &RevenueRule) -> Option<usize> {
    if !rule.contains_all.is_empty() {
        let needles: Vec<String> = rule.contains_all.iter().map(|n| n.to_lowercase()).collect();
        let hit = headers.iter().position(|h| {
            let lower = h.to_lowercase();
            needles.iter().all(|n| lower.contains(n.as_str()))
        });
        if hit.is_some() {
            return hit;
        }
    }

    let contains = rule.contains.to_lowercase();
    let excludes = rule.excludes.to_lowercase();
    if !contains.is_empty() {
        let hit = headers.iter().position(|h| {
            let lower = h.to_lowercase();
            lower.contains(&contains) && (excludes.is_empty() || !lower.contains(&excludes))
        });
        if hit.is_some() {
            return hit;
        }
    }

    exact_match(headers, &rule.fallback)
}

// ============================================================================
// Tests
// ============================================================================
