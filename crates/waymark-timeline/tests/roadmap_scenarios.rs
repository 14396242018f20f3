//! End-to-end scenarios for the roadmap pipeline.
//!
//! These exercise the full record -> roadmap path: resolution order, axis
//! contents, intermediate waypoints, colors, and the determinism guarantee.

use chrono::NaiveDate;
use waymark_core::{MilestoneKind, PhaseColor, ProjectRecord};
use waymark_timeline::build_roadmap;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn alpha() -> ProjectRecord {
    ProjectRecord::new("Alpha")
        .milestone(MilestoneKind::Open, "2025-01-10")
        .milestone(MilestoneKind::EngineeringValidation, "2025-03-05")
        .milestone(MilestoneKind::OrderStart, "2025Q3")
}

/// Open=2025-01-10 (W02), EV=2025-03-05 (W10), Order=2025Q3 (Sep 30, W40):
/// resolved order is Open, EV, Order; the axis holds every week of the span.
#[test]
fn alpha_scenario_resolves_and_fills_the_axis() {
    let now = date(2025, 6, 1); // 2025-W22, inside the span
    let roadmap = build_roadmap(&[alpha()], now);

    assert_eq!(roadmap.lanes.len(), 1);
    assert!(roadmap.lanes[0].has_data);
    assert_eq!(roadmap.lanes[0].anchor_week, "2025-W02");

    // every ISO week from 2025-W02 through 2025-W40
    assert_eq!(roadmap.axis.len(), 39);
    assert_eq!(roadmap.axis.first().unwrap(), "2025-W02");
    assert_eq!(roadmap.axis.last().unwrap(), "2025-W40");
    assert!(roadmap.axis.contains(&"2025-W22".to_string()));
    assert_eq!(roadmap.now_label, "2025-W22");
    assert_eq!(roadmap.now_index, 20);
}

/// Two segments: Open->EV takes EV's standard color because DV was skipped,
/// EV->Order is the standard adoption transition.
#[test]
fn alpha_scenario_segment_colors() {
    let roadmap = build_roadmap(&[alpha()], date(2025, 6, 1));

    assert_eq!(roadmap.segments.len(), 2);

    let first = &roadmap.segments[0];
    assert_eq!(first.start.kind, MilestoneKind::Open);
    assert_eq!(first.end.kind, MilestoneKind::EngineeringValidation);
    assert_eq!(first.color, PhaseColor::Purple);

    let second = &roadmap.segments[1];
    assert_eq!(second.start.kind, MilestoneKind::EngineeringValidation);
    assert_eq!(second.end.kind, MilestoneKind::OrderStart);
    assert_eq!(second.color, PhaseColor::Green);
}

/// Intermediate lists are exactly the axis slice strictly between the
/// endpoints: length end_index - start_index - 1, no label outside the range.
#[test]
fn segment_completeness_over_multi_week_gaps() {
    let roadmap = build_roadmap(&[alpha()], date(2025, 6, 1));

    for segment in &roadmap.segments {
        let start_idx = roadmap
            .axis
            .iter()
            .position(|l| l == &segment.start_week)
            .expect("start week on axis");
        let end_idx = roadmap
            .axis
            .iter()
            .position(|l| l == &segment.end_week)
            .expect("end week on axis");

        assert_eq!(
            segment.intermediates.len(),
            end_idx - start_idx - 1,
            "intermediates must cover the axis slice for {} -> {}",
            segment.start_week,
            segment.end_week
        );
        for label in &segment.intermediates {
            let idx = roadmap.axis.iter().position(|l| l == label).unwrap();
            assert!(idx > start_idx && idx < end_idx);
        }
    }

    // Open (W02) -> EV (W10): seven weeks strictly between
    assert_eq!(roadmap.segments[0].intermediates.len(), 7);
}

/// Re-running the pipeline on unchanged input and unchanged "now" produces
/// byte-identical output.
#[test]
fn pipeline_is_idempotent() {
    let records = vec![
        alpha(),
        ProjectRecord::new("Beta")
            .milestone(MilestoneKind::Open, "2025-02-03")
            .milestone(MilestoneKind::DesignValidation, "2025-04-18"),
        ProjectRecord::new("NoDates"),
    ];
    let now = date(2025, 6, 1);

    let first = serde_json::to_string(&build_roadmap(&records, now)).unwrap();
    let second = serde_json::to_string(&build_roadmap(&records, now)).unwrap();
    assert_eq!(first, second);
}

/// A record with missing or unparseable milestones never fails; it yields a
/// no-data lane and marker.
#[test]
fn unusable_records_degrade_to_no_data() {
    let records = vec![
        ProjectRecord::new("Empty"),
        ProjectRecord::new("Junk")
            .milestone(MilestoneKind::Open, "N/A")
            .milestone(MilestoneKind::DesignValidation, "pending review")
            .milestone(MilestoneKind::OrderStart, "Q9 someday"),
    ];
    let roadmap = build_roadmap(&records, date(2025, 6, 1));

    assert_eq!(roadmap.no_data.len(), 2);
    assert!(roadmap.segments.is_empty());
    for marker in &roadmap.no_data {
        assert_eq!(marker.week, "2025-W22");
        assert_eq!(marker.note, "no timeline data");
    }
    assert!(roadmap.lanes.iter().all(|lane| !lane.has_data));
}

/// Projects spanning disjoint ranges only contribute their own weeks; the
/// axis never includes weeks no project touches.
#[test]
fn axis_excludes_untouched_weeks() {
    let records = vec![
        ProjectRecord::new("Early")
            .milestone(MilestoneKind::Open, "2025-01-06")
            .milestone(MilestoneKind::DesignValidation, "2025-01-20"),
        ProjectRecord::new("Late")
            .milestone(MilestoneKind::Open, "2025-11-03")
            .milestone(MilestoneKind::DesignValidation, "2025-11-17"),
    ];
    // now sits between the two clusters
    let roadmap = build_roadmap(&records, date(2025, 6, 2));

    // W02..W04, W23 (now), W45..W47
    assert_eq!(
        roadmap.axis,
        [
            "2025-W02", "2025-W03", "2025-W04", "2025-W23", "2025-W45", "2025-W46", "2025-W47"
        ]
    );
    assert_eq!(roadmap.now_index, 3);
}

/// The now marker also works when it falls outside every project's span.
#[test]
fn now_outside_all_spans_still_lands_on_the_axis() {
    let roadmap = build_roadmap(&[alpha()], date(2026, 2, 4));

    assert_eq!(roadmap.now_label, "2026-W06");
    assert_eq!(roadmap.axis.len(), 40); // 39 span weeks + the now week
    assert_eq!(roadmap.now_index, 39);
    assert_eq!(roadmap.axis.last().unwrap(), "2026-W06");
}
