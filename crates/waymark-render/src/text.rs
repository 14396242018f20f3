//! Plain text roadmap rendering for terminals and logs.

use waymark_core::{standard_legend, MilestoneKind, RenderError, Roadmap, RoadmapRenderer};

use crate::truncate;

/// Monospace text renderer.
///
/// One row per project lane, one character per axis week: milestones print
/// as letters, segment spans as dashes, and the "now" column as a vertical
/// bar wherever nothing else claims the cell. A `v` ruler above the lanes
/// points at the "now" column.
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Width of the project name column.
    pub name_width: usize,
    /// Include the legend block.
    pub show_legend: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            name_width: 24,
            show_legend: true,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the project name column width.
    pub fn name_width(mut self, width: usize) -> Self {
        self.name_width = width;
        self
    }

    /// Skip the legend block.
    pub fn without_legend(mut self) -> Self {
        self.show_legend = false;
        self
    }

    /// One character per axis week for one project lane.
    fn lane_cells(&self, roadmap: &Roadmap, project: &str) -> Vec<char> {
        let mut cells = vec![' '; roadmap.axis.len()];

        for segment in roadmap.segments_for(project) {
            if let (Some(start), Some(end)) = (
                roadmap.axis_index(&segment.start_week),
                roadmap.axis_index(&segment.end_week),
            ) {
                for cell in cells.iter_mut().take(end + 1).skip(start) {
                    *cell = '-';
                }
            }
        }

        // Letters overwrite the spans they sit on.
        for series in &roadmap.markers {
            for point in series.points.iter().filter(|p| p.project == project) {
                if let Some(idx) = roadmap.axis_index(&point.week) {
                    cells[idx] = milestone_letter(series.kind);
                }
            }
        }

        if let Some(cell) = cells.get_mut(roadmap.now_index) {
            if *cell == ' ' {
                *cell = '|';
            }
        }

        cells
    }
}

impl RoadmapRenderer for TextRenderer {
    type Output = String;

    fn render(&self, roadmap: &Roadmap) -> Result<String, RenderError> {
        let mut out = String::new();

        match (roadmap.axis.first(), roadmap.axis.last()) {
            (Some(first), Some(last)) => out.push_str(&format!(
                "Roadmap as of {} ({} weeks: {} .. {})\n",
                roadmap.now_label,
                roadmap.axis.len(),
                first,
                last
            )),
            _ => out.push_str(&format!("Roadmap as of {} (empty axis)\n", roadmap.now_label)),
        }
        out.push('\n');

        let mut ruler = vec![' '; roadmap.axis.len()];
        if let Some(cell) = ruler.get_mut(roadmap.now_index) {
            *cell = 'v';
        }
        out.push_str(&format!(
            "{:width$}  {}\n",
            "",
            ruler.iter().collect::<String>(),
            width = self.name_width
        ));

        for lane in &roadmap.lanes {
            let cells: String = self.lane_cells(roadmap, &lane.project).iter().collect();
            out.push_str(&format!(
                "{:<width$}  {}\n",
                truncate(&lane.project, self.name_width),
                cells,
                width = self.name_width
            ));
        }

        if !roadmap.no_data.is_empty() {
            let names: Vec<&str> = roadmap
                .no_data
                .iter()
                .map(|m| m.project.as_str())
                .collect();
            out.push('\n');
            out.push_str(&format!("no timeline data: {}\n", names.join(", ")));
        }

        if self.show_legend {
            out.push('\n');
            out.push_str(
                "legend: N=NPDR  D=Design Validation  E=Engineering Validation  O=Order Start\n",
            );
            for entry in standard_legend() {
                out.push_str(&format!(
                    "  {} ({}): {}\n",
                    entry.label, entry.color, entry.meaning
                ));
            }
        }

        Ok(out)
    }
}

fn milestone_letter(kind: MilestoneKind) -> char {
    match kind {
        MilestoneKind::Open => 'N',
        MilestoneKind::DesignValidation => 'D',
        MilestoneKind::EngineeringValidation => 'E',
        MilestoneKind::OrderStart => 'O',
    }
}
