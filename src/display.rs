//! Terminal rendering of an ROI report: header, gauge, cards, breakdown, table.

use chrono::NaiveDate;
use colored::{ColoredString, Colorize};

use crate::config::Branding;
use crate::gauge::{normalize, ColorBand, GaugeReading};
use crate::report::{breakdown_total, Report};
use crate::utils::{format_currency, format_number, format_plain, format_signed_currency};

const RULE: &str = "════════════════════════════════════════════════════════════";
const GAUGE_WIDTH: usize = 40;
const BAR_WIDTH: usize = 24;

pub const FOOTNOTE: &str = "* Calculations based on provided hours saved and hourly rates. \
ROI includes implementation fees and year-1 recurring costs. \
All projections are for the first 12 months.";

/// One titled figure, as shown on the dashboard cards.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub subtitle: String,
    pub subtext: Option<String>,
}

/// `18 October 2026`
pub fn report_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

pub fn multiplier_sentence(multiplier: f64) -> String {
    format!(
        "For every £1 invested, returns £{:.2}",
        multiplier
    )
}

/// Cards in dashboard order: savings and investment first, projections last.
pub fn metric_cards(report: &Report) -> Vec<MetricCard> {
    let input = report.input();
    let metrics = report.metrics();

    vec![
        MetricCard {
            title: "Annual Cost Savings",
            value: format_currency(input.annual_savings),
            subtitle: "Projected Y1 Savings".to_string(),
            subtext: None,
        },
        MetricCard {
            title: "Time Savings",
            value: format!("{} hrs", format_number(input.weekly_saved)),
            subtitle: format!("{} hours/year", format_number(input.annual_saved)),
            subtext: None,
        },
        MetricCard {
            title: "Total Investment",
            value: format_currency(input.investment),
            subtitle: "Year 1 Total Cost".to_string(),
            subtext: Some(format!(
                "{} impl. + {} recurring",
                format_currency(input.impl_fee),
                format_currency(input.annual_recurring)
            )),
        },
        MetricCard {
            title: "Monthly Recurring",
            value: format_currency(input.monthly_costs),
            subtitle: format!("{} annually", format_currency(input.annual_recurring)),
            subtext: None,
        },
        MetricCard {
            title: "Year 1 Net Profit",
            value: format_currency(metrics.net_benefit),
            subtitle: "After all costs".to_string(),
            subtext: None,
        },
        MetricCard {
            title: "Payback Period",
            value: format!("{} Months", format_plain(input.payback)),
            subtitle: "Time to Breakeven".to_string(),
            subtext: None,
        },
    ]
}

/// Financial overview rows: (metric, value, monthly impact).
pub fn overview_rows(report: &Report) -> Vec<(&'static str, String, String)> {
    let input = report.input();
    let metrics = report.metrics();
    vec![
        (
            "Initial Investment",
            format_currency(input.investment),
            "—".to_string(),
        ),
        (
            "Recurring Costs",
            format!("{}/mo", format_currency(input.monthly_costs)),
            recurring_impact(input.monthly_costs),
        ),
        (
            "Hourly Rate",
            format!("{}/hr", format_currency(input.hourly_rate)),
            "—".to_string(),
        ),
        (
            "Year 1 Net Profit",
            format_currency(metrics.net_benefit),
            format_signed_currency(metrics.monthly_benefit),
        ),
    ]
}

/// A recurring cost always reads as an outflow, `-£0` included. Only a negative cost shows as `+`.
fn recurring_impact(monthly_costs: f64) -> String {
    if monthly_costs < 0.0 {
        format_signed_currency(-monthly_costs)
    } else {
        format!("-{}", format_currency(monthly_costs))
    }
}

// ── Text dashboard ──

pub fn format_dashboard(report: &Report, branding: &Branding, generated_on: &str) -> String {
    let input = report.input();
    let mut out = Vec::new();

    // Header
    out.push(format!(
        "{}  {}",
        format!(" {} ", branding.mark).on_blue().white().bold(),
        branding.title.to_uppercase().blue().bold()
    ));
    out.push(format!("     {}", input.client.bold()));
    out.push(format!(
        "     ▸ {}  ·  {}",
        input.project,
        generated_on.dimmed()
    ));
    out.push(RULE.to_string());
    out.push(String::new());

    out.extend(format_gauge(report));
    out.push(String::new());

    for card in metric_cards(report) {
        out.push(format!(
            "  {} {}",
            format!("{:<22}", card.title.to_uppercase()).dimmed(),
            card.value.bold()
        ));
        out.push(format!("  {:<22} {}", "", card.subtitle));
        if let Some(subtext) = card.subtext {
            out.push(format!("  {:<22} {}", "", subtext.dimmed()));
        }
    }
    out.push(String::new());

    out.extend(format_breakdown(report));
    out.push(String::new());

    out.extend(format_overview_table(report));
    out.push(String::new());
    out.push(format!("  {}", FOOTNOTE.dimmed()));
    out.push(String::new());

    out.push(RULE.to_string());
    out.push(format!(
        "{} - {}    Generated on {}",
        branding.name, branding.title, generated_on
    ));

    out.join("\n")
}

fn format_gauge(report: &Report) -> Vec<String> {
    let roi = report.input().roi;
    let reading = normalize(roi);
    let filled = filled_cells(&reading, GAUGE_WIDTH);

    let bar: String = (0..GAUGE_WIDTH)
        .map(|i| {
            if i < filled {
                paint_band("█", reading.band, i, GAUGE_WIDTH).to_string()
            } else {
                "░".dimmed().to_string()
            }
        })
        .collect();

    vec![
        format!("  {}", "PROJECT ROI".dimmed()),
        format!("  [{}]  {}", bar, format!("{}%", format_plain(roi)).bold()),
        format!("  {}", "RETURN ON INVESTMENT".dimmed()),
        format!(
            "  {}",
            multiplier_sentence(report.metrics().roi_multiplier)
        ),
    ]
}

fn format_breakdown(report: &Report) -> Vec<String> {
    let entries = report.breakdown();
    let total = breakdown_total(entries);
    let mut lines = vec![format!("  {}", "INVESTMENT BREAKDOWN".dimmed())];

    if entries.is_empty() {
        lines.push("  (no itemised costs)".to_string());
    }

    for entry in entries {
        let share = if total > 0.0 { entry.value / total } else { 0.0 };
        let cells = ((share * BAR_WIDTH as f64).round() as usize).clamp(1, BAR_WIDTH);
        let bar = paint_hex(&"█".repeat(cells), entry.color);
        lines.push(format!(
            "  {:<22} {}{} {:>10}  {:>5.1}%",
            entry.label,
            bar,
            " ".repeat(BAR_WIDTH - cells),
            format_currency(entry.value),
            share * 100.0
        ));
    }

    lines.push(format!(
        "  {:<22} {} {}",
        "TOTAL",
        " ".repeat(BAR_WIDTH),
        format!("{:>10}", format_currency(report.input().investment)).bold()
    ));
    lines
}

fn format_overview_table(report: &Report) -> Vec<String> {
    let mut lines = vec![
        format!("  {}", "FINANCIAL OVERVIEW".dimmed()),
        format!("  {:<20} {:<15} {:<15}", "Metric", "Value", "Monthly Impact"),
        format!("  {:-<20} {:-<15} {:-<15}", "", "", ""),
    ];

    for (metric, value, impact) in overview_rows(report) {
        let impact = if impact.starts_with('-') {
            impact.red().to_string()
        } else if impact.starts_with('+') {
            impact.green().bold().to_string()
        } else {
            impact.dimmed().to_string()
        };
        lines.push(format!("  {:<20} {:<15} {}", metric, value, impact));
    }
    lines
}

/// Shown instead of the dashboard when the link itself cannot be read.
pub fn format_invalid_link() -> String {
    format!(
        "{}\n{}",
        "Invalid Dashboard Link".red().bold(),
        "Please check your URL parameters."
    )
}

// ── Helpers ──

pub fn filled_cells(reading: &GaugeReading, width: usize) -> usize {
    ((reading.fraction * width as f64).round() as usize).min(width)
}

/// `#3b82f6` -> (59, 130, 246)
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn paint_hex(text: &str, hex: &str) -> ColoredString {
    match hex_to_rgb(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

/// Gradient bands blend from start to end colour across the bar.
fn paint_band(text: &str, band: ColorBand, index: usize, width: usize) -> ColoredString {
    let (start, end) = band.stops();
    if !band.is_gradient() {
        return paint_hex(text, start);
    }
    match (hex_to_rgb(start), hex_to_rgb(end)) {
        (Some(a), Some(b)) => {
            let t = index as f64 / (width.max(2) - 1) as f64;
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
            text.truecolor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
        }
        _ => text.normal(),
    }
}
