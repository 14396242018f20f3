//! # waymark-core
//!
//! Core domain model and traits for the waymark roadmap engine.
//!
//! This crate provides:
//! - Domain types: `MilestoneKind`, `ProjectRecord`, `ResolvedMilestone`, `ProjectTimeline`
//! - Roadmap output types: `Roadmap`, `Segment`, `MarkerSeries`, `Lane`
//! - Calendar types: `WeekLabel`, `WeekAxis` (ISO week bucketing)
//! - The `RoadmapRenderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use waymark_core::{MilestoneKind, ProjectRecord};
//!
//! let record = ProjectRecord::new("falcon-oled")
//!     .milestone(MilestoneKind::Open, "2025-01-10")
//!     .milestone(MilestoneKind::OrderStart, "2025Q3");
//!
//! assert_eq!(record.raw(MilestoneKind::OrderStart), Some("2025Q3"));
//! ```

pub mod relative;
pub mod week;

pub use relative::{RelativeTime, TimeDirection};
pub use week::{week_label, WeekAxis, WeekLabel};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Milestone Kinds
// ============================================================================

/// The four tracked project checkpoints, in canonical process order.
///
/// The derived `Ord` is the canonical order: it breaks ties between
/// same-date milestones and drives the fast-track color rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MilestoneKind {
    /// Project opened (NPDR raised).
    Open,
    /// Design validation complete.
    DesignValidation,
    /// Engineering validation complete.
    EngineeringValidation,
    /// Committed order start, often expressed as a fiscal quarter.
    OrderStart,
}

impl MilestoneKind {
    /// All kinds, in canonical order.
    pub const ALL: [Self; 4] = [
        Self::Open,
        Self::DesignValidation,
        Self::EngineeringValidation,
        Self::OrderStart,
    ];

    /// Long display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::DesignValidation => "Design Validation",
            Self::EngineeringValidation => "Engineering Validation",
            Self::OrderStart => "Order Start",
        }
    }

    /// Short code used in hover text and the legend.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open => "NPDR",
            Self::DesignValidation => "DV",
            Self::EngineeringValidation => "EV",
            Self::OrderStart => "Order",
        }
    }
}

impl fmt::Display for MilestoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Project Records
// ============================================================================

/// One row of the source table, reduced to what timeline construction needs.
///
/// Milestone values stay untyped strings here. Parsing happens downstream, so
/// a record survives any cell content: the normalizer turns garbage into
/// "milestone absent", never into an error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Unique project identifier, the grouping key.
    pub project: String,
    /// Raw milestone cell values, keyed by kind. Absent key = empty cell.
    pub milestones: BTreeMap<MilestoneKind, String>,
}

impl ProjectRecord {
    /// Create an empty record for the given project.
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            milestones: BTreeMap::new(),
        }
    }

    /// Builder-style: attach a raw milestone value.
    pub fn milestone(mut self, kind: MilestoneKind, raw: impl Into<String>) -> Self {
        self.milestones.insert(kind, raw.into());
        self
    }

    /// Raw value for `kind`, if the cell held anything.
    pub fn raw(&self, kind: MilestoneKind) -> Option<&str> {
        self.milestones.get(&kind).map(String::as_str)
    }
}

// ============================================================================
// Resolved Timelines
// ============================================================================

/// A milestone with its normalized calendar date.
///
/// The whole pipeline works in `NaiveDate`, so dates carry no time-of-day
/// component by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMilestone {
    pub kind: MilestoneKind,
    pub date: NaiveDate,
}

impl ResolvedMilestone {
    pub fn new(kind: MilestoneKind, date: NaiveDate) -> Self {
        Self { kind, date }
    }

    /// ISO week this milestone lands in.
    pub fn week(&self) -> WeekLabel {
        WeekLabel::from_date(self.date)
    }
}

/// Derived per-project timeline, recomputed on every render pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTimeline {
    pub project: String,
    /// Resolved milestones sorted ascending by date, ties broken by the
    /// canonical kind order.
    pub milestones: Vec<ResolvedMilestone>,
    /// True iff at least one milestone resolved.
    pub has_data: bool,
    /// Week of the earliest milestone, or the "now" week when `has_data`
    /// is false. Lane sort key.
    pub anchor_week: WeekLabel,
}

impl ProjectTimeline {
    /// Consecutive milestone pairs, in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&ResolvedMilestone, &ResolvedMilestone)> {
        self.milestones.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// First and last milestone dates, when any resolved.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.milestones.first(), self.milestones.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

// ============================================================================
// Roadmap Output
// ============================================================================

/// Colors a segment can take, assigned by the transition classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PhaseColor {
    /// Standard design phase (ends at Design Validation).
    Amber,
    /// Standard engineering phase (ends at Engineering Validation).
    Purple,
    /// Standard adoption phase (ends at Order Start).
    Green,
    /// Out-of-order or skipped process step.
    Gray,
}

impl PhaseColor {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Amber => "amber",
            Self::Purple => "purple",
            Self::Green => "green",
            Self::Gray => "gray",
        }
    }

    /// Fixed render palette.
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Amber => "#F39C12",
            Self::Purple => "#9B59B6",
            Self::Green => "#2ECC71",
            Self::Gray => "#D7DBDD",
        }
    }
}

impl From<PhaseColor> for String {
    fn from(color: PhaseColor) -> Self {
        color.hex().to_string()
    }
}

impl TryFrom<String> for PhaseColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "#f39c12" | "amber" => Ok(Self::Amber),
            "#9b59b6" | "purple" => Ok(Self::Purple),
            "#2ecc71" | "green" => Ok(Self::Green),
            "#d7dbdd" | "gray" => Ok(Self::Gray),
            other => Err(format!("unknown phase color: {other}")),
        }
    }
}

impl fmt::Display for PhaseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Marker glyph for a milestone kind (plotly-compatible symbol names).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSymbol {
    Circle,
    Diamond,
    Square,
    Star,
}

/// How one milestone kind's markers are drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub symbol: MarkerSymbol,
    pub color: String,
    pub size: u32,
}

impl MarkerStyle {
    /// Fixed style per milestone kind.
    pub fn for_kind(kind: MilestoneKind) -> Self {
        match kind {
            MilestoneKind::Open => Self {
                symbol: MarkerSymbol::Circle,
                color: "#2E86C1".into(),
                size: 10,
            },
            MilestoneKind::DesignValidation => Self {
                symbol: MarkerSymbol::Diamond,
                color: "#F39C12".into(),
                size: 10,
            },
            MilestoneKind::EngineeringValidation => Self {
                symbol: MarkerSymbol::Square,
                color: "#9B59B6".into(),
                size: 10,
            },
            MilestoneKind::OrderStart => Self {
                symbol: MarkerSymbol::Star,
                color: "#27AE60".into(),
                size: 14,
            },
        }
    }
}

/// One project's row on the rendered roadmap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub project: String,
    /// Week label of the earliest milestone ("now" week when no data).
    pub anchor_week: String,
    pub has_data: bool,
}

/// The renderable line between two chronologically adjacent milestones of
/// one project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub project: String,
    pub start: ResolvedMilestone,
    pub end: ResolvedMilestone,
    pub start_week: String,
    pub end_week: String,
    /// Axis labels strictly between `start_week` and `end_week`, in axis
    /// order; the rendered line passes through every one of them.
    pub intermediates: Vec<String>,
    pub color: PhaseColor,
    pub hover: String,
}

impl Segment {
    /// Full sequence of axis labels the line passes through.
    pub fn waypoints(&self) -> Vec<String> {
        let mut points = Vec::with_capacity(self.intermediates.len() + 2);
        points.push(self.start_week.clone());
        points.extend(self.intermediates.iter().cloned());
        points.push(self.end_week.clone());
        points
    }

    /// Calendar days between the two endpoints.
    pub fn duration_days(&self) -> i64 {
        (self.end.date - self.start.date).num_days()
    }
}

/// One milestone occurrence in the marker overlay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub project: String,
    pub date: NaiveDate,
    pub week: String,
    pub hover: String,
}

/// All markers of one milestone kind, with their shared style.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSeries {
    pub kind: MilestoneKind,
    pub style: MarkerStyle,
    pub points: Vec<Marker>,
}

/// Placeholder for projects with no resolvable milestones, pinned to the
/// "now" column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoDataMarker {
    pub project: String,
    pub week: String,
    pub note: String,
}

/// Everything a charting collaborator needs for one render pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    /// Ordered categorical axis: one entry per visible ISO week.
    pub axis: Vec<String>,
    /// The "now" reference week label.
    pub now_label: String,
    /// Chronological index of `now_label` within `axis`.
    pub now_index: usize,
    /// Project lanes, top-to-bottom.
    pub lanes: Vec<Lane>,
    /// Line segments, in lane order then milestone order.
    pub segments: Vec<Segment>,
    /// Marker overlay, one series per milestone kind in canonical order.
    pub markers: Vec<MarkerSeries>,
    /// Lanes with nothing to draw.
    pub no_data: Vec<NoDataMarker>,
}

impl Roadmap {
    /// Segments belonging to one project, in milestone order.
    pub fn segments_for<'a>(&'a self, project: &'a str) -> impl Iterator<Item = &'a Segment> {
        self.segments.iter().filter(move |s| s.project == project)
    }

    /// Chronological index of an axis label.
    pub fn axis_index(&self, label: &str) -> Option<usize> {
        self.axis.iter().position(|l| l == label)
    }

    /// Pixel height hint for the rendered chart.
    pub fn suggested_height(&self) -> u32 {
        std::cmp::max(400, 150 + 45 * self.lanes.len() as u32)
    }
}

// ============================================================================
// Legend
// ============================================================================

/// One legend row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    pub meaning: String,
}

impl LegendEntry {
    fn new(label: &str, color: &str, meaning: &str) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            meaning: meaning.into(),
        }
    }
}

/// The fixed five-entry legend describing the canonical meaning of each
/// color on the roadmap.
pub fn standard_legend() -> Vec<LegendEntry> {
    vec![
        LegendEntry::new("NPDR", "#2E86C1", "project open milestone"),
        LegendEntry::new(
            "Design phase",
            PhaseColor::Amber.hex(),
            "Open to Design Validation",
        ),
        LegendEntry::new(
            "Engineering phase",
            PhaseColor::Purple.hex(),
            "Design Validation to Engineering Validation",
        ),
        LegendEntry::new(
            "Adoption phase",
            PhaseColor::Green.hex(),
            "Engineering Validation to Order Start",
        ),
        LegendEntry::new(
            "Missing step",
            PhaseColor::Gray.hex(),
            "out-of-order or skipped process step",
        ),
    ]
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering for an assembled roadmap.
pub trait RoadmapRenderer {
    type Output;

    /// Render a roadmap to the output format.
    fn render(&self, roadmap: &Roadmap) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
