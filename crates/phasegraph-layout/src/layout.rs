//! Grid layout derivation
//!
//! Places phases left to right on the main row, stacks each phase's
//! sub-phases beneath it, and puts the end markers in a column at the right
//! edge. Positions depend only on indices, so a layout is recomputed from
//! the graph on every call and never cached.

use crate::config::LayoutConfig;
use phasegraph_model::{EndId, PhaseGraph, PhaseId, Target, END_MARKERS};
use serde::Serialize;

// Margins around the end-marker column when it is taller than the phase area.
const END_SECTION_TOP_MARGIN: i64 = 60;
const END_SECTION_BOTTOM_MARGIN: i64 = 80;

/// A point in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

/// An axis-aligned box in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    /// Midpoint of the left edge, where incoming routes attach
    #[inline]
    #[must_use]
    pub fn left_anchor(&self) -> Point {
        Point {
            x: self.x,
            y: self.y + self.height / 2,
        }
    }
}

/// Placed sub-phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubPhaseBox {
    pub id: PhaseId,
    pub name: String,
    pub rect: Rect,
}

/// Placed phase with its sub-phase stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseBox {
    pub id: PhaseId,
    pub name: String,
    pub rect: Rect,
    pub sub_phases: Vec<SubPhaseBox>,
}

/// Placed end marker (a circle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndBox {
    pub id: EndId,
    pub label: &'static str,
    pub center: Point,
    pub radius: i64,
}

/// Complete placement for one graph state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramLayout {
    pub width: i64,
    pub height: i64,
    pub phases: Vec<PhaseBox>,
    pub ends: Vec<EndBox>,
}

impl DiagramLayout {
    /// Attachment point of a top-level phase
    #[must_use]
    pub fn phase_anchor(&self, id: PhaseId) -> Option<Point> {
        self.phases
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.rect.left_anchor())
    }

    /// Center of an end marker
    #[must_use]
    pub fn end_position(&self, id: EndId) -> Option<Point> {
        self.ends.iter().find(|e| e.id == id).map(|e| e.center)
    }

    /// Where a route to `target` ends
    #[must_use]
    pub fn target_anchor(&self, target: Target) -> Option<Point> {
        match target {
            Target::Phase(id) => self.phase_anchor(id),
            Target::End(id) => self.end_position(id),
        }
    }

    /// Box of any phase or sub-phase
    #[must_use]
    pub fn node_rect(&self, id: PhaseId) -> Option<Rect> {
        self.phases.iter().find_map(|p| {
            if p.id == id {
                Some(p.rect)
            } else {
                p.sub_phases.iter().find(|s| s.id == id).map(|s| s.rect)
            }
        })
    }
}

/// Derives [`DiagramLayout`]s from graphs
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutDeriver {
    config: LayoutConfig,
}

impl LayoutDeriver {
    /// Deriver using `config`
    #[inline]
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Place every node of `graph`
    #[must_use]
    pub fn derive(&self, graph: &PhaseGraph) -> DiagramLayout {
        let c = self.config;
        let main_row_y = i64::from(c.main_row_y);
        let phase_width = i64::from(c.phase_width);
        let phase_height = i64::from(c.phase_height);

        let phases = graph
            .phases()
            .iter()
            .enumerate()
            .map(|(index, phase)| {
                let x = self.phase_x(index);
                let sub_phases = phase
                    .sub_phases
                    .iter()
                    .enumerate()
                    .map(|(sub_index, sub)| SubPhaseBox {
                        id: sub.id,
                        name: sub.name.clone(),
                        rect: Rect {
                            x,
                            y: self.sub_phase_y(sub_index),
                            width: phase_width,
                            height: i64::from(c.sub_phase_height),
                        },
                    })
                    .collect();

                PhaseBox {
                    id: phase.id(),
                    name: phase.name().to_string(),
                    rect: Rect {
                        x,
                        y: main_row_y,
                        width: phase_width,
                        height: phase_height,
                    },
                    sub_phases,
                }
            })
            .collect();

        let width = self.diagram_width(graph);
        DiagramLayout {
            width,
            height: self.diagram_height(graph),
            phases,
            ends: self.end_positions(width),
        }
    }

    /// X of the phase at `index`
    #[must_use]
    pub fn phase_x(&self, index: usize) -> i64 {
        i64::from(self.config.start_x) + steps(index, self.config.phase_gap)
    }

    /// Y of the sub-phase at `sub_index` within its stack
    #[must_use]
    pub fn sub_phase_y(&self, sub_index: usize) -> i64 {
        let c = self.config;
        i64::from(c.main_row_y)
            + i64::from(c.phase_height)
            + steps(sub_index + 1, c.parallel_gap)
    }

    /// Canvas width: grows by one phase gap per phase
    #[must_use]
    pub fn diagram_width(&self, graph: &PhaseGraph) -> i64 {
        let c = self.config;
        i64::from(c.start_x)
            + steps(graph.len(), c.phase_gap)
            + i64::from(c.phase_width)
            + i64::from(c.right_padding)
    }

    /// Canvas height: the taller of the deepest sub-phase stack and the end column
    #[must_use]
    pub fn diagram_height(&self, graph: &PhaseGraph) -> i64 {
        let c = self.config;
        let main_row_y = i64::from(c.main_row_y);

        let max_sub_phases = graph
            .phases()
            .iter()
            .map(|p| p.sub_phases.len())
            .max()
            .unwrap_or(0);
        let base = main_row_y + i64::from(c.phase_height) + i64::from(c.parallel_gap);
        let stack_height =
            base + steps(max_sub_phases, c.parallel_gap) + i64::from(c.bottom_padding);

        let end_steps = steps(END_MARKERS.len() - 1, c.end_spacing);
        let end_section_height = main_row_y - END_SECTION_TOP_MARGIN
            + end_steps
            + 2 * i64::from(c.end_radius)
            + END_SECTION_BOTTOM_MARGIN;
        // only exceeds the section height when the column was pushed down
        let end_column_bottom = self.end_column_top()
            + end_steps
            + i64::from(c.end_radius)
            + END_SECTION_BOTTOM_MARGIN;

        stack_height.max(end_section_height).max(end_column_bottom)
    }

    /// Center y of the first end marker
    ///
    /// Lifted above the main row, but never so far that a marker leaves the
    /// top of the canvas.
    #[must_use]
    pub fn end_column_top(&self) -> i64 {
        let c = self.config;
        let lifted = i64::from(c.main_row_y) - i64::from(c.end_column_lift);
        lifted.max(i64::from(c.end_radius))
    }

    /// End marker column for a canvas of `width`
    #[must_use]
    pub fn end_positions(&self, width: i64) -> Vec<EndBox> {
        let c = self.config;
        let x = width - i64::from(c.end_column_inset);
        let start_y = self.end_column_top();

        END_MARKERS
            .iter()
            .enumerate()
            .map(|(index, marker)| EndBox {
                id: marker.id,
                label: marker.label,
                center: Point {
                    x,
                    y: start_y + steps(index, c.end_spacing),
                },
                radius: i64::from(c.end_radius),
            })
            .collect()
    }
}

/// Derive a layout with the default grid
#[must_use]
pub fn derive_layout(graph: &PhaseGraph) -> DiagramLayout {
    LayoutDeriver::default().derive(graph)
}

fn steps(count: usize, step: u32) -> i64 {
    i64::try_from(count)
        .unwrap_or(i64::MAX)
        .saturating_mul(i64::from(step))
}
