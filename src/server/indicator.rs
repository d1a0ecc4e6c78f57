use slotmap::new_key_type;

new_key_type! {
    /// Handle to one player's indicator. Once the indicator is destroyed the
    /// key never resolves again.
    pub struct IndicatorKey;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarColor {
    White,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarOverlay {
    Progress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndicatorStyle {
    pub color: BarColor,
    pub overlay: BarOverlay,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            color: BarColor::White,
            overlay: BarOverlay::Progress,
        }
    }
}

/// A player's skill progress bar.
#[derive(Clone, Debug, PartialEq)]
pub struct Indicator {
    pub label: String,
    percent: f32,
    pub visible: bool,
    pub style: IndicatorStyle,
}

impl Indicator {
    /// A fresh, hidden, empty bar.
    pub fn new() -> Self {
        Self {
            label: String::new(),
            percent: 0.0,
            visible: false,
            style: IndicatorStyle::default(),
        }
    }

    pub fn percent(&self) -> f32 {
        self.percent
    }

    pub fn set_percent(&mut self, percent: f32) {
        self.percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 1.0)
        };
    }

    /// Shows `label` at `percent`.
    pub fn show(&mut self, label: &str, percent: f32) {
        self.label.clear();
        self.label.push_str(label);
        self.set_percent(percent);
        self.visible = true;
    }
}

impl Default for Indicator {
    fn default() -> Self {
        Self::new()
    }
}

/// How far `experience` is through a level needing `threshold`, in [0, 1].
///
/// A non-positive threshold counts as a level that is already complete once
/// any experience has been earned.
pub fn progress(experience: i64, threshold: i64) -> f32 {
    if threshold <= 0 {
        return if experience > 0 { 1.0 } else { 0.0 };
    }
    (experience as f64 / threshold as f64).clamp(0.0, 1.0) as f32
}
