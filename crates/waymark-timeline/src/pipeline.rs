//! Full roadmap assembly for one render pass.
//!
//! `build_roadmap` is the pipeline entry point: it resolves every record,
//! derives the shared week axis, synthesizes segments, and packages the
//! marker overlay, no-data placeholders, and "now" reference line into a
//! single [`Roadmap`] value for a charting collaborator. The reference date
//! is always injected; nothing here reads a clock.

use chrono::NaiveDate;
use tracing::warn;
use waymark_core::{
    Lane, Marker, MarkerSeries, MarkerStyle, MilestoneKind, NoDataMarker, ProjectRecord,
    ProjectTimeline, RelativeTime, Roadmap, WeekAxis, WeekLabel,
};

use crate::resolve::resolve;
use crate::segment::build_segments;

/// Collect the shared axis for a set of timelines.
///
/// Each project contributes every ISO week its line passes through (the
/// full span between its first and last milestone, which is what keeps
/// multi-week gaps rendering as continuous lines on a categorical axis);
/// projects with a single milestone contribute that week alone. The "now"
/// week is always present. Weeks no project touches never appear.
pub fn build_axis(timelines: &[ProjectTimeline], now: NaiveDate) -> WeekAxis {
    let mut weeks = Vec::new();
    for timeline in timelines {
        if let Some((first, last)) = timeline.span() {
            weeks.extend(WeekLabel::span_inclusive(
                WeekLabel::from_date(first),
                WeekLabel::from_date(last),
            ));
        }
    }
    weeks.push(WeekLabel::from_date(now));
    WeekAxis::build(weeks)
}

/// Run the whole pipeline over a snapshot of records.
///
/// Output is deterministic for a given input and `now`: lanes sort by
/// anchor week (stable, so same-anchor projects keep their table order),
/// segments follow lane order, and marker series follow the canonical kind
/// order.
pub fn build_roadmap(records: &[ProjectRecord], now: NaiveDate) -> Roadmap {
    let mut timelines: Vec<ProjectTimeline> =
        records.iter().map(|record| resolve(record, now)).collect();
    timelines.sort_by_key(|timeline| timeline.anchor_week);

    let axis = build_axis(&timelines, now);
    let now_week = WeekLabel::from_date(now);
    let now_label = now_week.to_string();
    let now_index = axis.position(now_week).unwrap_or_else(|| {
        warn!("now label {now_label} missing from axis; pinning the reference line at 0");
        0
    });

    let mut lanes = Vec::with_capacity(timelines.len());
    let mut segments = Vec::new();
    let mut no_data = Vec::new();
    for timeline in &timelines {
        lanes.push(Lane {
            project: timeline.project.clone(),
            anchor_week: timeline.anchor_week.to_string(),
            has_data: timeline.has_data,
        });
        if timeline.has_data {
            segments.extend(build_segments(timeline, &axis, now));
        } else {
            no_data.push(NoDataMarker {
                project: timeline.project.clone(),
                week: now_label.clone(),
                note: "no timeline data".into(),
            });
        }
    }

    let mut markers = Vec::with_capacity(MilestoneKind::ALL.len());
    for kind in MilestoneKind::ALL {
        let mut points = Vec::new();
        for timeline in &timelines {
            for milestone in timeline.milestones.iter().filter(|m| m.kind == kind) {
                let relative = RelativeTime::between(now, milestone.date);
                points.push(Marker {
                    project: timeline.project.clone(),
                    date: milestone.date,
                    week: milestone.week().to_string(),
                    hover: format!(
                        "{} {}: {} ({})",
                        timeline.project,
                        kind.as_str(),
                        milestone.date.format("%Y.%m.%d"),
                        relative.phrase()
                    ),
                });
            }
        }
        markers.push(MarkerSeries {
            kind,
            style: MarkerStyle::for_kind(kind),
            points,
        });
    }

    Roadmap {
        axis: axis.labels(),
        now_label,
        now_index,
        lanes,
        segments,
        markers,
        no_data,
    }
}
