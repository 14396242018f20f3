//! # waymark-render
//!
//! Rendering backends for waymark roadmaps.
//!
//! This crate provides:
//! - SVG roadmap rendering (self-contained, no JavaScript)
//! - JSON output for charting collaborators
//! - Plain text output for terminals and logs
//!
//! All renderers implement [`waymark_core::RoadmapRenderer`] and are pure:
//! the same `Roadmap` value always renders to equivalent output.
//!
//! ## Example
//!
//! ```rust,ignore
//! use waymark_core::RoadmapRenderer;
//! use waymark_render::{JsonRenderer, SvgRenderer, TextRenderer};
//!
//! let svg = SvgRenderer::new().render(&roadmap)?;
//! let json = JsonRenderer::new().render(&roadmap)?;
//! let text = TextRenderer::new().render(&roadmap)?;
//! ```

pub mod json;
pub mod text;

pub use json::JsonRenderer;
pub use text::TextRenderer;

use std::collections::BTreeMap;

use svg::node::element::{Circle, Group, Line, Polygon, Polyline, Rectangle, Text};
use svg::Document;
use waymark_core::{
    standard_legend, MarkerStyle, MarkerSymbol, Roadmap, RenderError, RoadmapRenderer,
};

/// SVG roadmap renderer configuration
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    /// Width of one axis column in pixels
    pub column_width: u32,
    /// Height per project lane in pixels
    pub row_height: u32,
    /// Width of the label column in pixels
    pub label_width: u32,
    /// Header height in pixels
    pub header_height: u32,
    /// Height reserved for the legend
    pub legend_height: u32,
    /// Padding around the chart
    pub padding: u32,
    /// Draw every n-th axis label (ticks are drawn for all columns)
    pub axis_label_step: usize,
    /// Background color
    pub background_color: String,
    /// Grid line color
    pub grid_color: String,
    /// Text color
    pub text_color: String,
    /// Reference line ("now") color
    pub now_color: String,
    /// Color for no-data placeholders
    pub no_data_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            column_width: 34,
            row_height: 40,
            label_width: 180,
            header_height: 50,
            legend_height: 40,
            padding: 20,
            axis_label_step: 2,
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            now_color: "#e74c3c".into(),
            no_data_color: "#95a5a6".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the axis column width
    pub fn column_width(mut self, width: u32) -> Self {
        self.column_width = width;
        self
    }

    /// Configure lane height
    pub fn row_height(mut self, height: u32) -> Self {
        self.row_height = height;
        self
    }

    /// Configure the project label gutter width
    pub fn label_width(mut self, width: u32) -> Self {
        self.label_width = width;
        self
    }

    /// Calculate the total width of the SVG
    fn total_width(&self, axis_len: usize) -> u32 {
        self.padding * 2 + self.label_width + axis_len as u32 * self.column_width
    }

    /// Calculate the height the layout itself needs
    fn content_height(&self, lane_count: usize) -> u32 {
        self.padding * 2
            + self.header_height
            + lane_count as u32 * self.row_height
            + self.legend_height
    }

    /// Center x of one axis column
    fn column_x(&self, index: usize) -> f64 {
        f64::from(self.padding + self.label_width)
            + (index as f64 + 0.5) * f64::from(self.column_width)
    }

    /// Center y of one project lane
    fn lane_y(&self, row: usize) -> f64 {
        f64::from(self.padding + self.header_height)
            + (row as f64 + 0.5) * f64::from(self.row_height)
    }

    /// Bottom y of the lane area
    fn chart_bottom(&self, lane_count: usize) -> f64 {
        f64::from(self.padding + self.header_height + lane_count as u32 * self.row_height)
    }

    /// Create the header with the chart title and week labels
    fn render_header(&self, roadmap: &Roadmap) -> Group {
        let mut group = Group::new().set("class", "header");

        let title = Text::new(format!("Roadmap as of {}", roadmap.now_label))
            .set("x", self.padding)
            .set("y", self.padding + 15)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size + 2)
            .set("font-weight", "bold")
            .set("fill", self.text_color.as_str());
        group = group.add(title);

        let step = self.axis_label_step.max(1);
        for (i, label) in roadmap.axis.iter().enumerate() {
            let x = self.column_x(i);

            let tick = Line::new()
                .set("x1", x)
                .set("y1", self.padding + self.header_height - 8)
                .set("x2", x)
                .set("y2", self.padding + self.header_height)
                .set("stroke", self.text_color.as_str())
                .set("stroke-width", 1);
            group = group.add(tick);

            if i % step == 0 {
                let text = Text::new(label.as_str())
                    .set("x", x)
                    .set("y", self.padding + self.header_height - 14)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size - 2)
                    .set("fill", self.text_color.as_str())
                    .set("text-anchor", "middle");
                group = group.add(text);
            }
        }

        group
    }

    /// Create the background grid
    fn render_grid(&self, roadmap: &Roadmap) -> Group {
        let mut group = Group::new().set("class", "grid");

        let lane_count = roadmap.lanes.len();
        let right = f64::from(self.padding + self.label_width)
            + roadmap.axis.len() as f64 * f64::from(self.column_width);
        let top = f64::from(self.padding + self.header_height);
        let bottom = self.chart_bottom(lane_count);

        // Lane separators
        for row in 0..=lane_count {
            let y = top + row as f64 * f64::from(self.row_height);
            let line = Line::new()
                .set("x1", self.padding)
                .set("y1", y)
                .set("x2", right)
                .set("y2", y)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        // Week column boundaries
        for i in 0..=roadmap.axis.len() {
            let x = f64::from(self.padding + self.label_width)
                + i as f64 * f64::from(self.column_width);
            let line = Line::new()
                .set("x1", x)
                .set("y1", top)
                .set("x2", x)
                .set("y2", bottom)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        group
    }

    /// Create one project lane: name label plus its segment polylines
    fn render_lane(&self, roadmap: &Roadmap, row: usize, project: &str) -> Group {
        let mut group = Group::new().set("class", "lane");
        let y = self.lane_y(row);

        let label = Text::new(truncate(project, 24))
            .set("x", self.padding + 8)
            .set("y", y + 4.0)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", self.text_color.as_str());
        group = group.add(label);

        for segment in roadmap.segments_for(project) {
            let points: Vec<String> = segment
                .waypoints()
                .iter()
                .filter_map(|label| roadmap.axis_index(label))
                .map(|idx| format!("{:.1},{:.1}", self.column_x(idx), y))
                .collect();
            if points.len() < 2 {
                continue;
            }

            let line = Polyline::new()
                .set("points", points.join(" "))
                .set("fill", "none")
                .set("stroke", segment.color.hex())
                .set("stroke-width", 3)
                .set("stroke-linecap", "round");
            group = group.add(line);
        }

        group
    }

    /// Create the milestone marker overlay
    fn render_markers(&self, roadmap: &Roadmap, rows: &BTreeMap<&str, usize>) -> Group {
        let mut group = Group::new().set("class", "markers");

        for series in &roadmap.markers {
            for point in &series.points {
                let (Some(&row), Some(idx)) = (
                    rows.get(point.project.as_str()),
                    roadmap.axis_index(&point.week),
                ) else {
                    continue;
                };
                group = group.add(self.marker_node(
                    &series.style,
                    self.column_x(idx),
                    self.lane_y(row),
                ));
            }
        }

        group
    }

    /// Create placeholders for lanes with nothing to draw
    fn render_no_data(&self, roadmap: &Roadmap, rows: &BTreeMap<&str, usize>) -> Group {
        let mut group = Group::new().set("class", "no-data");

        for marker in &roadmap.no_data {
            let (Some(&row), Some(idx)) = (
                rows.get(marker.project.as_str()),
                roadmap.axis_index(&marker.week),
            ) else {
                continue;
            };
            let cx = self.column_x(idx);
            let cy = self.lane_y(row);

            let circle = Circle::new()
                .set("cx", cx)
                .set("cy", cy)
                .set("r", 5)
                .set("fill", "none")
                .set("stroke", self.no_data_color.as_str())
                .set("stroke-width", 1.5);
            group = group.add(circle);

            let note = Text::new(marker.note.as_str())
                .set("x", cx + 10.0)
                .set("y", cy + 4.0)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size - 2)
                .set("font-style", "italic")
                .set("fill", self.no_data_color.as_str());
            group = group.add(note);
        }

        group
    }

    /// Create the dashed "now" reference line with its label
    fn render_now_line(&self, roadmap: &Roadmap) -> Group {
        let mut group = Group::new().set("class", "now-line");

        let x = self.column_x(roadmap.now_index);
        let y_top = f64::from(self.padding + self.header_height);
        let y_bottom = self.chart_bottom(roadmap.lanes.len());

        let line = Line::new()
            .set("x1", x)
            .set("y1", y_top)
            .set("x2", x)
            .set("y2", y_bottom)
            .set("stroke", self.now_color.as_str())
            .set("stroke-width", 2)
            .set("stroke-dasharray", "6,4");
        group = group.add(line);

        let label = Text::new(roadmap.now_label.as_str())
            .set("x", x)
            .set("y", y_top - 2.0)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size - 2)
            .set("fill", self.now_color.as_str())
            .set("text-anchor", "middle");
        group = group.add(label);

        group
    }

    /// Render the legend
    fn render_legend(&self, roadmap: &Roadmap) -> Group {
        let mut group = Group::new().set("class", "legend");

        let y = self.chart_bottom(roadmap.lanes.len()) + 20.0;
        let box_size = 12.0;
        let spacing = 150.0;

        for (i, entry) in standard_legend().iter().enumerate() {
            let x = f64::from(self.padding) + i as f64 * spacing;

            let swatch = Rectangle::new()
                .set("x", x)
                .set("y", y - box_size + 2.0)
                .set("width", box_size)
                .set("height", box_size)
                .set("rx", 2)
                .set("fill", entry.color.as_str());
            group = group.add(swatch);

            let label = Text::new(entry.label.as_str())
                .set("x", x + box_size + 5.0)
                .set("y", y)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size - 1)
                .set("fill", self.text_color.as_str());
            group = group.add(label);
        }

        group
    }

    /// One milestone marker in its kind's shape
    fn marker_node(&self, style: &MarkerStyle, cx: f64, cy: f64) -> Group {
        let group = Group::new().set("class", "marker");
        let half = f64::from(style.size) / 2.0;

        match style.symbol {
            MarkerSymbol::Circle => group.add(
                Circle::new()
                    .set("cx", cx)
                    .set("cy", cy)
                    .set("r", half)
                    .set("fill", style.color.as_str()),
            ),
            MarkerSymbol::Square => group.add(
                Rectangle::new()
                    .set("x", cx - half)
                    .set("y", cy - half)
                    .set("width", half * 2.0)
                    .set("height", half * 2.0)
                    .set("fill", style.color.as_str()),
            ),
            MarkerSymbol::Diamond => group.add(
                Polygon::new()
                    .set(
                        "points",
                        format!(
                            "{:.1},{:.1} {:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
                            cx,
                            cy - half,
                            cx + half,
                            cy,
                            cx,
                            cy + half,
                            cx - half,
                            cy
                        ),
                    )
                    .set("fill", style.color.as_str()),
            ),
            MarkerSymbol::Star => group.add(
                Polygon::new()
                    .set("points", star_points(cx, cy, half))
                    .set("fill", style.color.as_str()),
            ),
        }
    }
}

impl RoadmapRenderer for SvgRenderer {
    type Output = String;

    fn render(&self, roadmap: &Roadmap) -> Result<String, RenderError> {
        if roadmap.lanes.is_empty() {
            return Err(RenderError::InvalidData("no lanes to render".into()));
        }
        if roadmap.axis.is_empty() {
            return Err(RenderError::InvalidData("empty week axis".into()));
        }

        let width = self.total_width(roadmap.axis.len());
        let height = self
            .content_height(roadmap.lanes.len())
            .max(roadmap.suggested_height());

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        let background = Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", self.background_color.as_str());
        document = document.add(background);

        document = document.add(self.render_grid(roadmap));
        document = document.add(self.render_header(roadmap));

        let rows: BTreeMap<&str, usize> = roadmap
            .lanes
            .iter()
            .enumerate()
            .map(|(row, lane)| (lane.project.as_str(), row))
            .collect();

        for (row, lane) in roadmap.lanes.iter().enumerate() {
            document = document.add(self.render_lane(roadmap, row, &lane.project));
        }
        document = document.add(self.render_markers(roadmap, &rows));
        document = document.add(self.render_no_data(roadmap, &rows));
        document = document.add(self.render_now_line(roadmap));
        document = document.add(self.render_legend(roadmap));

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("failed to write SVG: {e}")))?;
        String::from_utf8(output).map_err(|e| RenderError::Format(format!("invalid UTF-8: {e}")))
    }
}

/// Ten-point outline of a five-armed star centered at (cx, cy)
fn star_points(cx: f64, cy: f64, outer: f64) -> String {
    use std::f64::consts::PI;

    let mut points = Vec::with_capacity(10);
    for i in 0..10 {
        let radius = if i % 2 == 0 { outer } else { outer * 0.45 };
        let angle = -PI / 2.0 + PI / 5.0 * i as f64;
        points.push(format!(
            "{:.1},{:.1}",
            cx + radius * angle.cos(),
            cy + radius * angle.sin()
        ));
    }
    points.join(" ")
}

/// Truncate a string to a maximum number of characters with ellipsis
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
