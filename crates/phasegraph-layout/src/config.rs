//! Layout configuration
//!
//! Grid constants for the sequence diagram. Defaults reproduce the
//! designer's canvas; every field may be overridden from configuration.

use serde::{Deserialize, Serialize};

/// Grid layout constants (canvas units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// X of the first phase
    pub start_x: u32,
    /// Y of the main phase row
    pub main_row_y: u32,
    /// Width of phase and sub-phase boxes
    pub phase_width: u32,
    /// Height of phase boxes
    pub phase_height: u32,
    /// Horizontal step between consecutive phases
    pub phase_gap: u32,
    /// Vertical step between stacked sub-phases
    pub parallel_gap: u32,
    /// Height of sub-phase boxes
    pub sub_phase_height: u32,
    /// Vertical step between end markers
    pub end_spacing: u32,
    /// Radius of end markers
    pub end_radius: u32,
    /// Distance of the end column from the right edge
    pub end_column_inset: u32,
    /// How far above the main row the first end marker sits
    pub end_column_lift: u32,
    /// Space right of the last phase
    pub right_padding: u32,
    /// Space below the deepest sub-phase stack
    pub bottom_padding: u32,
}

impl LayoutConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With phase origin
    #[inline]
    #[must_use]
    pub fn with_origin(mut self, start_x: u32, main_row_y: u32) -> Self {
        self.start_x = start_x;
        self.main_row_y = main_row_y;
        self
    }

    /// With horizontal phase step
    #[inline]
    #[must_use]
    pub fn with_phase_gap(mut self, gap: u32) -> Self {
        self.phase_gap = gap;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_x: 60,
            main_row_y: 160,
            phase_width: 180,
            phase_height: 70,
            phase_gap: 220,
            parallel_gap: 90,
            sub_phase_height: 60,
            end_spacing: 120,
            end_radius: 28,
            end_column_inset: 100,
            end_column_lift: 80,
            right_padding: 260,
            bottom_padding: 160,
        }
    }
}
