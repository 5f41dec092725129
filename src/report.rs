//! ROI Report: input record, derived metrics and cost breakdown
//!
//! Everything here is a pure function of `InputRecord`. A `Report` pairs the
//! record with its single evaluation so views never recompute it.

use serde::Serialize;

// ── Types ──

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputRecord {
    pub client: String,
    pub project: String,
    pub weekly_saved: f64,     // hours per week
    pub annual_saved: f64,     // hours per year (supplied independently)
    pub annual_savings: f64,   // £ saved in year 1
    pub investment: f64,       // total year-1 cost
    pub payback: f64,          // months to break even
    pub roi: f64,              // percent
    pub monthly_costs: f64,    // recurring £ per month
    pub hourly_rate: f64,      // £ per hour
    pub impl_fee: f64,         // one-time
    pub platform_costs: f64,   // monthly
    pub ai_costs: f64,         // monthly
    pub annual_recurring: f64, // year-1 recurring total
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub roi_multiplier: f64,
    pub net_benefit: f64,
    pub monthly_benefit: f64,
    pub support_costs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Implementation,
    Platform,
    AiUsage,
    SupportOps,
}

impl CostCategory {
    /// Chart order. Filtering never reorders these.
    pub const ALL: [CostCategory; 4] = [
        CostCategory::Implementation,
        CostCategory::Platform,
        CostCategory::AiUsage,
        CostCategory::SupportOps,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CostCategory::Implementation => "Implementation",
            CostCategory::Platform => "Platform Costs (1Y)",
            CostCategory::AiUsage => "AI Usage (1Y)",
            CostCategory::SupportOps => "Support & Ops",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            CostCategory::Implementation => "#3b82f6", // blue
            CostCategory::Platform => "#10b981",       // emerald
            CostCategory::AiUsage => "#8b5cf6",        // violet
            CostCategory::SupportOps => "#f59e0b",     // amber
        }
    }

    fn value(self, input: &InputRecord, metrics: &DerivedMetrics) -> f64 {
        match self {
            CostCategory::Implementation => input.impl_fee,
            CostCategory::Platform => input.platform_costs * 12.0,
            CostCategory::AiUsage => input.ai_costs * 12.0,
            CostCategory::SupportOps => metrics.support_costs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub category: CostCategory,
    pub label: &'static str,
    pub value: f64,
    pub color: &'static str,
}

// ── Derivation ──

pub fn derive(input: &InputRecord) -> DerivedMetrics {
    let roi_multiplier = (input.roi / 100.0) + 1.0;
    let net_benefit = input.annual_savings - input.annual_recurring;
    let monthly_benefit = net_benefit / 12.0;

    // Investment = impl + platform*12 + ai*12 + support; support is what's left over
    let itemized = input.impl_fee + input.platform_costs * 12.0 + input.ai_costs * 12.0;
    let residual = input.investment - itemized;
    // `f64::max` would swallow NaN, so clamp only when the residual is actually negative
    let support_costs = if residual < 0.0 { 0.0 } else { residual };

    DerivedMetrics {
        roi_multiplier,
        net_benefit,
        monthly_benefit,
        support_costs,
    }
}

pub fn build_breakdown(input: &InputRecord, metrics: &DerivedMetrics) -> Vec<BreakdownEntry> {
    CostCategory::ALL
        .iter()
        .map(|&category| BreakdownEntry {
            category,
            label: category.label(),
            value: category.value(input, metrics),
            color: category.color(),
        })
        .filter(|entry| entry.value > 0.0)
        .collect()
}

/// Sum of the charted slices. Equals `investment` unless the residual was clamped.
pub fn breakdown_total(entries: &[BreakdownEntry]) -> f64 {
    entries.iter().map(|e| e.value).sum()
}

// ── Report ──

/// One resolved input and everything derived from it.
#[derive(Debug, Clone)]
pub struct Report {
    input: InputRecord,
    metrics: DerivedMetrics,
    breakdown: Vec<BreakdownEntry>,
}

impl Report {
    pub fn new(input: InputRecord) -> Self {
        let metrics = derive(&input);
        let breakdown = build_breakdown(&input, &metrics);
        Self {
            input,
            metrics,
            breakdown,
        }
    }

    pub fn input(&self) -> &InputRecord {
        &self.input
    }

    pub fn metrics(&self) -> &DerivedMetrics {
        &self.metrics
    }

    pub fn breakdown(&self) -> &[BreakdownEntry] {
        &self.breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::demo_record;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_roi_multiplier() {
        let input = InputRecord {
            roi: 246.0,
            ..Default::default()
        };
        assert!(approx(derive(&input).roi_multiplier, 3.46));

        let breakeven = InputRecord::default();
        assert_eq!(derive(&breakeven).roi_multiplier, 1.0);

        for roi in [-50.0, 0.0, 12.5, 100.0, 999.0] {
            let input = InputRecord {
                roi,
                ..Default::default()
            };
            assert_eq!(derive(&input).roi_multiplier, roi / 100.0 + 1.0);
        }
    }

    #[test]
    fn test_support_costs_residual() {
        let input = InputRecord {
            investment: 45000.0,
            impl_fee: 25000.0,
            platform_costs: 800.0,
            ai_costs: 400.0,
            ..Default::default()
        };
        // 25000 + 9600 + 4800 = 39400
        assert_eq!(derive(&input).support_costs, 5600.0);
    }

    #[test]
    fn test_support_costs_clamped_when_itemized_exceeds_investment() {
        let input = InputRecord {
            investment: 10000.0,
            impl_fee: 25000.0,
            platform_costs: 800.0,
            ..Default::default()
        };
        assert_eq!(derive(&input).support_costs, 0.0);

        let exact = InputRecord {
            investment: 34600.0,
            impl_fee: 25000.0,
            platform_costs: 800.0,
            ..Default::default()
        };
        assert_eq!(derive(&exact).support_costs, 0.0);
    }

    #[test]
    fn test_support_costs_never_negative() {
        for (investment, impl_fee, platform, ai) in [
            (0.0, 0.0, 0.0, 0.0),
            (0.0, 1.0, 0.0, 0.0),
            (100.0, 0.0, 100.0, 100.0),
            (1e9, 5e8, 1e7, 1e7),
            (-500.0, 0.0, 0.0, 0.0),
        ] {
            let input = InputRecord {
                investment,
                impl_fee,
                platform_costs: platform,
                ai_costs: ai,
                ..Default::default()
            };
            assert!(derive(&input).support_costs >= 0.0);
        }
    }

    fn amount() -> impl Strategy<Value = f64> {
        -1e12f64..1e12f64
    }

    proptest! {
        /// Residual is never reported negative, whatever the itemised costs are.
        #[test]
        fn test_support_costs_never_negative_for_any_costs(
            investment in amount(),
            impl_fee in amount(),
            platform_costs in amount(),
            ai_costs in amount(),
        ) {
            let input = InputRecord {
                investment,
                impl_fee,
                platform_costs,
                ai_costs,
                ..Default::default()
            };
            let metrics = derive(&input);
            prop_assert!(metrics.support_costs >= 0.0);

            let itemized = impl_fee + platform_costs * 12.0 + ai_costs * 12.0;
            if itemized >= investment {
                prop_assert_eq!(metrics.support_costs, 0.0);
            } else {
                prop_assert_eq!(metrics.support_costs, investment - itemized);
            }
        }

        #[test]
        fn test_roi_multiplier_identity(roi in -1e6f64..1e6f64) {
            let input = InputRecord { roi, ..Default::default() };
            prop_assert_eq!(derive(&input).roi_multiplier, roi / 100.0 + 1.0);
        }

        #[test]
        fn test_breakdown_only_positive_in_order(
            investment in amount(),
            impl_fee in amount(),
            platform_costs in amount(),
            ai_costs in amount(),
        ) {
            let input = InputRecord {
                investment,
                impl_fee,
                platform_costs,
                ai_costs,
                ..Default::default()
            };
            let entries = build_breakdown(&input, &derive(&input));
            prop_assert!(entries.iter().all(|e| e.value > 0.0));
            let positions: Vec<_> = entries
                .iter()
                .map(|e| CostCategory::ALL.iter().position(|c| *c == e.category))
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_net_benefit_underwater() {
        let input = InputRecord {
            annual_savings: 100.0,
            annual_recurring: 200.0,
            ..Default::default()
        };
        let metrics = derive(&input);
        assert_eq!(metrics.net_benefit, -100.0);
        assert_eq!(metrics.monthly_benefit, -100.0 / 12.0);
        assert!(approx(metrics.monthly_benefit, -8.333333333333334));
    }

    #[test]
    fn test_non_finite_input_propagates() {
        let input = InputRecord {
            annual_savings: f64::INFINITY,
            roi: f64::NAN,
            investment: f64::NAN,
            ..Default::default()
        };
        let metrics = derive(&input);
        assert!(metrics.net_benefit.is_infinite());
        assert!(metrics.roi_multiplier.is_nan());
        assert!(metrics.support_costs.is_nan());
    }

    #[test]
    fn test_derive_does_not_touch_input() {
        let input = demo_record();
        let before = input.clone();
        let _ = derive(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_demo_record_end_to_end() {
        let metrics = derive(&demo_record());
        assert!(approx(metrics.roi_multiplier, 3.46));
        assert_eq!(metrics.net_benefit, 141600.0);
        assert_eq!(metrics.monthly_benefit, 11800.0);
        assert_eq!(metrics.support_costs, 5600.0);
    }

    #[test]
    fn test_breakdown_demo_all_present() {
        let input = demo_record();
        let entries = build_breakdown(&input, &derive(&input));
        let labels: Vec<_> = entries.iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                "Implementation",
                "Platform Costs (1Y)",
                "AI Usage (1Y)",
                "Support & Ops"
            ]
        );
        let values: Vec<_> = entries.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![25000.0, 9600.0, 4800.0, 5600.0]);
        assert_eq!(breakdown_total(&entries), input.investment);
    }

    #[test]
    fn test_breakdown_filters_zero_and_keeps_order() {
        let input = InputRecord {
            investment: 20000.0,
            impl_fee: 0.0,
            platform_costs: 500.0,
            ai_costs: 0.0,
            ..Default::default()
        };
        let entries = build_breakdown(&input, &derive(&input));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, CostCategory::Platform);
        assert_eq!(entries[0].value, 6000.0);
        assert_eq!(entries[0].color, "#10b981");
        assert_eq!(entries[1].category, CostCategory::SupportOps);
        assert_eq!(entries[1].value, 14000.0);
    }

    #[test]
    fn test_breakdown_excludes_negative_values() {
        let input = InputRecord {
            impl_fee: -100.0,
            ai_costs: -5.0,
            platform_costs: 10.0,
            ..Default::default()
        };
        // Hand-built metrics with a negative residual must still not chart it
        let metrics = DerivedMetrics {
            roi_multiplier: 1.0,
            net_benefit: 0.0,
            monthly_benefit: 0.0,
            support_costs: -1.0,
        };
        let entries = build_breakdown(&input, &metrics);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Platform Costs (1Y)");
        assert!(entries.iter().all(|e| e.value > 0.0));
    }

    #[test]
    fn test_breakdown_total_below_investment_when_clamped() {
        let input = InputRecord {
            investment: 1000.0,
            impl_fee: 1500.0,
            ..Default::default()
        };
        let entries = build_breakdown(&input, &derive(&input));
        assert_eq!(breakdown_total(&entries), 1500.0);

        let empty = InputRecord::default();
        assert!(build_breakdown(&empty, &derive(&empty)).is_empty());
    }

    #[test]
    fn test_report_evaluates_once() {
        let report = Report::new(demo_record());
        assert_eq!(report.input(), &demo_record());
        assert_eq!(report.metrics(), &derive(&demo_record()));
        assert_eq!(report.breakdown().len(), 4);
    }
}
