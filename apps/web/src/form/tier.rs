//! Score tiers — the pure mapping from a match score to its presentation.
//!
//! Thresholds are shared by every style variant; only the label and colour
//! tables differ between `StyleVariant`s.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub const HIGH_THRESHOLD: f64 = 70.0;
pub const AVERAGE_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    /// score ≥ 70
    Success,
    /// 40 ≤ score < 70
    Warning,
    /// score < 40
    Danger,
}

impl ScoreTier {
    /// Boundaries belong to the upper tier. A NaN score falls through to Danger.
    pub fn for_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            ScoreTier::Success
        } else if score >= AVERAGE_THRESHOLD {
            ScoreTier::Warning
        } else {
            ScoreTier::Danger
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreTier::Success => "success",
            ScoreTier::Warning => "warning",
            ScoreTier::Danger => "danger",
        }
    }
}

/// Visual variant of the form. Selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleVariant {
    #[default]
    Vivid,
    Classic,
}

impl FromStr for StyleVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vivid" => Ok(StyleVariant::Vivid),
            "classic" => Ok(StyleVariant::Classic),
            other => Err(format!("unknown form style '{other}' (expected vivid or classic)")),
        }
    }
}

impl fmt::Display for StyleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleVariant::Vivid => f.write_str("vivid"),
            StyleVariant::Classic => f.write_str("classic"),
        }
    }
}

/// Label and CSS classes for one tier in one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierStyle {
    pub label: &'static str,
    /// Border and text colour of the score circle.
    pub ring_class: &'static str,
    pub background_class: &'static str,
    /// Gradient behind the circle.
    pub glow_class: &'static str,
}

impl StyleVariant {
    pub fn tier_style(self, tier: ScoreTier) -> TierStyle {
        match (self, tier) {
            (StyleVariant::Vivid, ScoreTier::Success) => TierStyle {
                label: "Excellent Match",
                ring_class: "border-emerald-500 text-emerald-600",
                background_class: "bg-gradient-to-br from-emerald-50 to-teal-50",
                glow_class: "from-emerald-500 to-teal-500",
            },
            (StyleVariant::Vivid, ScoreTier::Warning) => TierStyle {
                label: "Average Match",
                ring_class: "border-amber-500 text-amber-600",
                background_class: "bg-gradient-to-br from-amber-50 to-orange-50",
                glow_class: "from-amber-500 to-orange-500",
            },
            (StyleVariant::Vivid, ScoreTier::Danger) => TierStyle {
                label: "Needs Work",
                ring_class: "border-rose-500 text-rose-600",
                background_class: "bg-gradient-to-br from-rose-50 to-pink-50",
                glow_class: "from-rose-500 to-pink-500",
            },
            (StyleVariant::Classic, ScoreTier::Success) => TierStyle {
                label: "Good Match",
                ring_class: "border-green-500 text-green-600",
                background_class: "bg-green-50",
                glow_class: "from-green-400 to-green-500",
            },
            (StyleVariant::Classic, ScoreTier::Warning) => TierStyle {
                label: "Average Match",
                ring_class: "border-yellow-500 text-yellow-600",
                background_class: "bg-yellow-50",
                glow_class: "from-yellow-400 to-yellow-500",
            },
            (StyleVariant::Classic, ScoreTier::Danger) => TierStyle {
                label: "Low Match",
                ring_class: "border-red-500 text-red-600",
                background_class: "bg-red-50",
                glow_class: "from-red-400 to-red-500",
            },
        }
    }
}
