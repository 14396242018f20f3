//! JSON roadmap output for charting collaborators.

use waymark_core::{RenderError, Roadmap, RoadmapRenderer};

/// Serializes the full [`Roadmap`] via serde.
///
/// Pretty-printed by default; [`JsonRenderer::compact`] yields a single
/// line. Field order follows the type declarations, so output is stable
/// across runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonRenderer {
    compact: bool,
}

impl JsonRenderer {
    /// Pretty-printing renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line renderer.
    pub fn compact() -> Self {
        Self { compact: true }
    }
}

impl RoadmapRenderer for JsonRenderer {
    type Output = String;

    fn render(&self, roadmap: &Roadmap) -> Result<String, RenderError> {
        let result = if self.compact {
            serde_json::to_string(roadmap)
        } else {
            serde_json::to_string_pretty(roadmap)
        };
        result.map_err(|e| RenderError::Format(format!("JSON serialization failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use waymark_core::{Lane, Marker, MarkerSeries, MarkerStyle, MilestoneKind};

    fn sample_roadmap() -> Roadmap {
        Roadmap {
            axis: vec!["2025-W02".into(), "2025-W03".into()],
            now_label: "2025-W03".into(),
            now_index: 1,
            lanes: vec![Lane {
                project: "falcon-oled".into(),
                anchor_week: "2025-W02".into(),
                has_data: true,
            }],
            segments: Vec::new(),
            markers: vec![MarkerSeries {
                kind: MilestoneKind::Open,
                style: MarkerStyle::for_kind(MilestoneKind::Open),
                points: vec![Marker {
                    project: "falcon-oled".into(),
                    date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                    week: "2025-W02".into(),
                    hover: "falcon-oled NPDR: 2025.01.10".into(),
                }],
            }],
            no_data: Vec::new(),
        }
    }

    #[test]
    fn pretty_output_round_trips() {
        let roadmap = sample_roadmap();
        let json = JsonRenderer::new().render(&roadmap).unwrap();

        assert!(json.contains('\n'));
        let parsed: Roadmap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, roadmap);
    }

    #[test]
    fn compact_output_is_one_line() {
        let json = JsonRenderer::compact().render(&sample_roadmap()).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"axis\":[\"2025-W02\",\"2025-W03\"]"));
    }

    #[test]
    fn output_is_deterministic() {
        let roadmap = sample_roadmap();
        let renderer = JsonRenderer::new();
        assert_eq!(
            renderer.render(&roadmap).unwrap(),
            renderer.render(&roadmap).unwrap()
        );
    }

    #[test]
    fn dates_serialize_as_iso_strings() {
        let json = JsonRenderer::compact().render(&sample_roadmap()).unwrap();
        assert!(json.contains("\"2025-01-10\""));
    }
}
