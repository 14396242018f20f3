//! Segment color classification.

use waymark_core::{MilestoneKind, PhaseColor};

/// Classify a segment by its start and end milestone kinds.
///
/// The three standard transitions get their phase colors. Any other pair
/// landing on DV/EV/Order inherits the destination's standard color, so a
/// fast-tracked phase stays visually associated with where it ends; the rule
/// therefore collapses to a match on the end kind. A segment ending at Open
/// is an out-of-order step and renders gray.
pub fn classify(start: MilestoneKind, end: MilestoneKind) -> PhaseColor {
    use waymark_core::MilestoneKind::{
        DesignValidation, EngineeringValidation, Open, OrderStart,
    };
    match (start, end) {
        (Open, DesignValidation) => PhaseColor::Amber,
        (DesignValidation, EngineeringValidation) => PhaseColor::Purple,
        (EngineeringValidation, OrderStart) => PhaseColor::Green,
        (_, DesignValidation) => PhaseColor::Amber,
        (_, EngineeringValidation) => PhaseColor::Purple,
        (_, OrderStart) => PhaseColor::Green,
        (_, Open) => PhaseColor::Gray,
    }
}
