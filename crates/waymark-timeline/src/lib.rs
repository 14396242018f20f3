//! # waymark-timeline
//!
//! The roadmap timeline construction pipeline.
//!
//! This crate provides:
//! - Date normalization: explicit dates and fiscal-quarter shorthand
//! - Per-project milestone resolution and ordering
//! - Shared week-axis construction (ISO week buckets)
//! - Segment synthesis with intermediate waypoints and transition colors
//! - Relative-time hover annotations against an injected "now"
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use waymark_core::{MilestoneKind, ProjectRecord};
//! use waymark_timeline::build_roadmap;
//!
//! let records = vec![ProjectRecord::new("alpha")
//!     .milestone(MilestoneKind::Open, "2025-01-10")
//!     .milestone(MilestoneKind::OrderStart, "2025Q3")];
//!
//! let now = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//! let roadmap = build_roadmap(&records, now);
//!
//! assert_eq!(roadmap.now_label, "2025-W22");
//! assert_eq!(roadmap.lanes.len(), 1);
//! assert_eq!(roadmap.segments.len(), 1);
//! ```

pub mod color;
pub mod normalize;
pub mod pipeline;
pub mod resolve;
pub mod segment;

pub use color::classify;
pub use normalize::normalize;
pub use pipeline::{build_axis, build_roadmap};
pub use resolve::resolve;
pub use segment::build_segments;
