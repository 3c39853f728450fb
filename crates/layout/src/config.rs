/// Tunables for the layout algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Upper bound on the number of height-search passes when balancing a
    /// multi-column container.
    ///
    /// The search is heuristic. When the cap is hit the last attempt is accepted
    /// and any leftover content continues in the next area.
    ///
    /// Defaults to `4`.
    pub max_relayout_count: usize,

    /// Maximum number of times the grid matrix may grow while searching for a
    /// vacancy for auto-placed items.
    ///
    /// Defaults to `1000`.
    pub max_grid_growth: usize,

    /// Distance between implicit tab stops, in points.
    ///
    /// Defaults to `50.0`.
    pub default_tab_pitch: f32,

    /// Share of justification space given to word spacing; the rest goes to
    /// character spacing. Can be overridden per element.
    ///
    /// Defaults to `0.75`.
    pub spacing_ratio: f32,

    /// Tolerance used by column width distribution.
    ///
    /// Defaults to `1e-4`.
    pub epsilon: f32,

    /// Tolerance used by fit checks against available area.
    ///
    /// Defaults to `0.01`.
    pub float_epsilon: f32,

    /// Retry content that does not fit on an empty page with forced placement
    /// instead of failing.
    ///
    /// Defaults to `true`.
    pub forced_placement_on_empty_page: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_relayout_count: 4,
            max_grid_growth: 1000,
            default_tab_pitch: 50.0,
            spacing_ratio: 0.75,
            epsilon: 1e-4,
            float_epsilon: 0.01,
            forced_placement_on_empty_page: true,
        }
    }
}
