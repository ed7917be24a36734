/// The golden ratio, the default width/height target.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Configuration for the packing pass.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Gap kept between horizontally adjacent children (px)
    spacing_horizontal: f64,
    /// Gap kept between vertically adjacent children (px)
    spacing_vertical: f64,
    /// Width/height ratio preferred when growing the packing region
    target_ratio: f64,
    /// Compaction sweep cap, per child
    sweeps_per_child: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing_horizontal: 0.0,
            spacing_vertical: 0.0,
            target_ratio: PHI,
            sweeps_per_child: 2,
        }
    }
}

impl LayoutConfig {
    /// Negative or non-finite gaps are treated as zero.
    pub fn with_spacing(mut self, horizontal: f64, vertical: f64) -> Self {
        self.spacing_horizontal = sanitize_spacing(horizontal);
        self.spacing_vertical = sanitize_spacing(vertical);
        self
    }

    /// Falls back to [`PHI`] for non-positive or non-finite ratios.
    pub fn with_target_ratio(mut self, ratio: f64) -> Self {
        self.target_ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            PHI
        };
        self
    }

    pub fn with_sweeps_per_child(mut self, sweeps: usize) -> Self {
        self.sweeps_per_child = sweeps;
        self
    }

    pub fn spacing_horizontal(&self) -> f64 {
        self.spacing_horizontal
    }

    pub fn spacing_vertical(&self) -> f64 {
        self.spacing_vertical
    }

    pub fn target_ratio(&self) -> f64 {
        self.target_ratio
    }

    /// Upper bound on compaction sweeps for a layout of `children` entries.
    pub fn sweep_cap(&self, children: usize) -> usize {
        self.sweeps_per_child.saturating_mul(children).max(1)
    }
}

fn sanitize_spacing(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
