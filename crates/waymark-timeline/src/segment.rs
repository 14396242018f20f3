//! Segment synthesis between consecutive milestones.

use chrono::NaiveDate;
use tracing::warn;
use waymark_core::{
    MilestoneKind, ProjectTimeline, RelativeTime, ResolvedMilestone, Segment, WeekAxis,
};

use crate::color::classify;

/// Build the renderable segments for one project timeline.
///
/// The global axis supplies the week labels each line passes through; the
/// intermediate list is the axis slice strictly between the endpoint weeks.
/// Timelines with fewer than two milestones produce nothing (a single
/// milestone is a point marker, not a segment). An endpoint week missing
/// from the axis is an invariant violation: it logs a warning and the
/// segment degrades to no intermediates instead of failing the render.
pub fn build_segments(
    timeline: &ProjectTimeline,
    axis: &WeekAxis,
    now: NaiveDate,
) -> Vec<Segment> {
    timeline
        .pairs()
        .map(|(start, end)| {
            let start_week = start.week();
            let end_week = end.week();
            let intermediates = match axis.between(start_week, end_week) {
                Some(slice) => slice.iter().map(ToString::to_string).collect(),
                None => {
                    warn!(
                        "segment weeks {start_week}..{end_week} missing from axis \
                         for {}; dropping intermediates",
                        timeline.project
                    );
                    Vec::new()
                }
            };

            Segment {
                project: timeline.project.clone(),
                start: *start,
                end: *end,
                start_week: start_week.to_string(),
                end_week: end_week.to_string(),
                intermediates,
                color: classify(start.kind, end.kind),
                hover: hover_text(&timeline.project, start, end, now),
            }
        })
        .collect()
}

/// Hover text: phase duration, date range, countdown to the end, plus the
/// time already spent when the phase started at Open in the past.
fn hover_text(
    project: &str,
    start: &ResolvedMilestone,
    end: &ResolvedMilestone,
    now: NaiveDate,
) -> String {
    let days = (end.date - start.date).num_days();
    let mut text = format!(
        "{} ({} -> {}): {} days ({} - {}); ends {}",
        project,
        start.kind.code(),
        end.kind.code(),
        days,
        start.date.format("%Y.%m.%d"),
        end.date.format("%Y.%m.%d"),
        RelativeTime::between(now, end.date).phrase(),
    );
    if start.kind == MilestoneKind::Open && start.date < now {
        let opened = RelativeTime::between(now, start.date);
        text.push_str(&format!("; opened {}", opened.phrase()));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use waymark_core::{PhaseColor, WeekLabel};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn milestone(kind: MilestoneKind, y: i32, m: u32, d: u32) -> ResolvedMilestone {
        ResolvedMilestone::new(kind, date(y, m, d))
    }

    fn timeline(project: &str, milestones: Vec<ResolvedMilestone>) -> ProjectTimeline {
        let anchor = milestones
            .first()
            .map_or_else(|| WeekLabel::from_date(date(2025, 6, 1)), |m| m.week());
        ProjectTimeline {
            project: project.into(),
            has_data: !milestones.is_empty(),
            milestones,
            anchor_week: anchor,
        }
    }

    fn axis_for(timelines: &[ProjectTimeline]) -> WeekAxis {
        let mut weeks = Vec::new();
        for t in timelines {
            if let Some((first, last)) = t.span() {
                weeks.extend(WeekLabel::span_inclusive(
                    WeekLabel::from_date(first),
                    WeekLabel::from_date(last),
                ));
            }
        }
        WeekAxis::build(weeks)
    }

    #[test]
    fn fewer_than_two_milestones_produce_no_segments() {
        let now = date(2025, 6, 1);
        let empty = timeline("empty", vec![]);
        let single = timeline("single", vec![milestone(MilestoneKind::Open, 2025, 1, 10)]);
        let axis = axis_for(&[empty.clone(), single.clone()]);

        assert!(build_segments(&empty, &axis, now).is_empty());
        assert!(build_segments(&single, &axis, now).is_empty());
    }

    #[test]
    fn intermediates_are_the_axis_slice_between_endpoints() {
        let now = date(2025, 6, 1);
        let t = timeline(
            "alpha",
            vec![
                milestone(MilestoneKind::Open, 2025, 1, 10), // 2025-W02
                milestone(MilestoneKind::DesignValidation, 2025, 3, 5), // 2025-W10
            ],
        );
        let axis = axis_for(std::slice::from_ref(&t));

        let segments = build_segments(&t, &axis, now);
        assert_eq!(segments.len(), 1);
        let segment = &segments[0];

        assert_eq!(segment.start_week, "2025-W02");
        assert_eq!(segment.end_week, "2025-W10");
        // strictly between: W03..W09
        assert_eq!(segment.intermediates.len(), 7);
        assert_eq!(segment.intermediates.first().unwrap(), "2025-W03");
        assert_eq!(segment.intermediates.last().unwrap(), "2025-W09");

        let start_idx = axis.position(WeekLabel::new(2025, 2).unwrap()).unwrap();
        let end_idx = axis.position(WeekLabel::new(2025, 10).unwrap()).unwrap();
        assert_eq!(segment.intermediates.len(), end_idx - start_idx - 1);
    }

    #[test]
    fn same_week_endpoints_have_no_intermediates() {
        let now = date(2025, 6, 1);
        let t = timeline(
            "fast",
            vec![
                milestone(MilestoneKind::Open, 2025, 3, 3),
                milestone(MilestoneKind::DesignValidation, 2025, 3, 7),
            ],
        );
        let axis = axis_for(std::slice::from_ref(&t));

        let segments = build_segments(&t, &axis, now);
        assert_eq!(segments[0].start_week, segments[0].end_week);
        assert!(segments[0].intermediates.is_empty());
    }

    #[test]
    fn missing_axis_weeks_degrade_to_no_intermediates() {
        let now = date(2025, 6, 1);
        let t = timeline(
            "degraded",
            vec![
                milestone(MilestoneKind::Open, 2025, 1, 10),
                milestone(MilestoneKind::OrderStart, 2025, 9, 30),
            ],
        );
        // axis deliberately missing the end week
        let axis = WeekAxis::build(vec![WeekLabel::new(2025, 2).unwrap()]);

        let segments = build_segments(&t, &axis, now);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].intermediates.is_empty());
    }

    #[test]
    fn colors_follow_the_transition_classifier() {
        let now = date(2025, 6, 1);
        let t = timeline(
            "alpha",
            vec![
                milestone(MilestoneKind::Open, 2025, 1, 10),
                milestone(MilestoneKind::EngineeringValidation, 2025, 3, 5),
                milestone(MilestoneKind::OrderStart, 2025, 9, 30),
            ],
        );
        let axis = axis_for(std::slice::from_ref(&t));

        let segments = build_segments(&t, &axis, now);
        assert_eq!(segments.len(), 2);
        // DV was skipped: the Open->EV segment takes EV's standard color
        assert_eq!(segments[0].color, PhaseColor::Purple);
        assert_eq!(segments[1].color, PhaseColor::Green);
    }

    #[test]
    fn hover_reports_duration_countdown_and_open_elapsed() {
        let now = date(2025, 6, 1);
        let t = timeline(
            "alpha",
            vec![
                milestone(MilestoneKind::Open, 2025, 5, 25),
                milestone(MilestoneKind::DesignValidation, 2025, 6, 8),
            ],
        );
        let axis = axis_for(std::slice::from_ref(&t));

        let hover = &build_segments(&t, &axis, now)[0].hover;
        assert_eq!(
            hover,
            "alpha (NPDR -> DV): 14 days (2025.05.25 - 2025.06.08); \
             ends in 7 days (1.0 weeks); opened 7 days ago (1.0 weeks)"
        );
    }

    #[test]
    fn hover_omits_elapsed_when_start_is_not_open_or_not_past() {
        let now = date(2025, 1, 1);
        let t = timeline(
            "future",
            vec![
                milestone(MilestoneKind::Open, 2025, 5, 25),
                milestone(MilestoneKind::DesignValidation, 2025, 6, 8),
            ],
        );
        let axis = axis_for(std::slice::from_ref(&t));

        let hover = &build_segments(&t, &axis, now)[0].hover;
        assert!(!hover.contains("opened"));
        assert!(hover.contains("ends in 158 days"));
    }
}
