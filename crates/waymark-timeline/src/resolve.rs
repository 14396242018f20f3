//! Per-project milestone resolution.

use chrono::NaiveDate;
use waymark_core::{MilestoneKind, ProjectRecord, ProjectTimeline, ResolvedMilestone, WeekLabel};

use crate::normalize::normalize;

/// Resolve one record into its ordered timeline.
///
/// Missing or unparseable milestone values drop silently; the result is
/// always a valid timeline, with `has_data = false` when nothing resolved.
/// Milestones sort ascending by date, same-date ties by canonical kind
/// order.
pub fn resolve(record: &ProjectRecord, now: NaiveDate) -> ProjectTimeline {
    let mut milestones: Vec<ResolvedMilestone> = MilestoneKind::ALL
        .iter()
        .filter_map(|&kind| {
            normalize(record.raw(kind)).map(|date| ResolvedMilestone::new(kind, date))
        })
        .collect();

    milestones.sort_by_key(|m| (m.date, m.kind));

    let has_data = !milestones.is_empty();
    let anchor_week = milestones
        .first()
        .map_or_else(|| WeekLabel::from_date(now), ResolvedMilestone::week);

    ProjectTimeline {
        project: record.project.clone(),
        milestones,
        has_data,
        anchor_week,
    }
}
