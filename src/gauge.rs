//! ROI gauge: maps an ROI percentage onto a capped fill fraction and a colour band.

use serde::Serialize;

/// ROI at which the gauge is full. Anything above renders identically.
pub const MAX_GAUGE_ROI: f64 = 300.0;

/// Length of the semi-circle arc (π·r for r = 80) used as the SVG dash array.
pub const GAUGE_ARC_LENGTH: f64 = 251.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorBand {
    Low,
    Medium,
    HighGradient,
    Excellent,
}

impl ColorBand {
    pub fn for_roi(roi: f64) -> Self {
        if roi.is_nan() || roi < 50.0 {
            ColorBand::Low
        } else if roi < 100.0 {
            ColorBand::Medium
        } else if roi < 200.0 {
            ColorBand::HighGradient
        } else {
            ColorBand::Excellent
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorBand::Low => "low",
            ColorBand::Medium => "medium",
            ColorBand::HighGradient => "high-gradient",
            ColorBand::Excellent => "excellent",
        }
    }

    /// (start, end) colours; solid bands repeat the same colour.
    pub fn stops(self) -> (&'static str, &'static str) {
        match self {
            ColorBand::Low => ("#ef4444", "#ef4444"),           // red
            ColorBand::Medium => ("#f97316", "#f97316"),        // orange
            ColorBand::HighGradient => ("#facc15", "#a3e635"), // yellow -> lime
            ColorBand::Excellent => ("#22c55e", "#22c55e"),     // green
        }
    }

    pub fn is_gradient(self) -> bool {
        let (start, end) = self.stops();
        start != end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeReading {
    pub fraction: f64,
    pub band: ColorBand,
}

impl GaugeReading {
    /// SVG `stroke-dashoffset` for the active arc: full length is empty, 0 is full.
    pub fn dash_offset(&self) -> f64 {
        GAUGE_ARC_LENGTH * (1.0 - self.fraction)
    }
}

pub fn normalize(roi: f64) -> GaugeReading {
    let fraction = if roi.is_nan() {
        0.0
    } else {
        roi.min(MAX_GAUGE_ROI).max(0.0) / MAX_GAUGE_ROI
    };
    GaugeReading {
        fraction,
        band: ColorBand::for_roi(roi),
    }
}
