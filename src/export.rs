//! Machine-readable and printable report exports.
//!
//! JSON mirrors everything the dashboard shows. The HTML document is
//! self-contained (inline CSS and SVG, no scripts) and carries print rules so
//! a browser's "Save as PDF" produces the paper version of the report.

use anyhow::{Context, Result};
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt::Write as _;
use std::path::Path;

use crate::config::Branding;
use crate::display::{metric_cards, multiplier_sentence, overview_rows, FOOTNOTE};
use crate::gauge::{normalize, GaugeReading, GAUGE_ARC_LENGTH};
use crate::report::{BreakdownEntry, DerivedMetrics, InputRecord, Report};
use crate::resolver::{InputOrigin, Resolution};
use crate::utils::{format_currency, format_plain};

const DONUT_RADIUS: f64 = 95.0;
const DONUT_GAP: f64 = 4.0;

// ── JSON ──

#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub origin: InputOrigin,
    pub unparsed_fields: &'a [&'static str],
    pub input: &'a InputRecord,
    pub metrics: &'a DerivedMetrics,
    pub breakdown: &'a [BreakdownEntry],
    pub gauge: GaugeReading,
    pub generated_on: &'a str,
}

impl<'a> ReportDocument<'a> {
    pub fn new(resolution: &'a Resolution, report: &'a Report, generated_on: &'a str) -> Self {
        Self {
            origin: resolution.origin,
            unparsed_fields: &resolution.unparsed,
            input: report.input(),
            metrics: report.metrics(),
            breakdown: report.breakdown(),
            gauge: normalize(report.input().roi),
            generated_on,
        }
    }
}

pub fn to_json(document: &ReportDocument) -> Result<String> {
    serde_json::to_string_pretty(document).context("Failed to serialize report to JSON")
}

// ── HTML ──

pub fn write_html(path: &Path, report: &Report, branding: &Branding, generated_on: &str) -> Result<()> {
    let html = render_html(report, branding, generated_on);
    std::fs::write(path, html)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

pub fn render_html(report: &Report, branding: &Branding, generated_on: &str) -> String {
    let input = report.input();
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<header>
  <div class="brand"><span class="mark">{mark}</span><div><div class="label">{title}</div><h1>{client}</h1></div></div>
  <div class="meta"><div class="project">{project}</div><div class="date">{date}</div></div>
</header>
<main>
<section class="grid">
"#,
        mark = html_escape(&branding.mark),
        title = html_escape(&branding.title),
        client = html_escape(&input.client),
        project = html_escape(&input.project),
        date = html_escape(generated_on),
    );

    body.push_str(&render_gauge_card(report));

    body.push_str("<div class=\"cards\">\n");
    for card in metric_cards(report) {
        let _ = write!(
            body,
            "<div class=\"card\"><h3>{}</h3><div class=\"value\">{}</div><div class=\"subtitle\">{}</div>",
            html_escape(card.title),
            html_escape(&card.value),
            html_escape(&card.subtitle)
        );
        if let Some(subtext) = &card.subtext {
            let _ = write!(body, "<div class=\"subtext\">{}</div>", html_escape(subtext));
        }
        body.push_str("</div>\n");
    }
    body.push_str("</div>\n</section>\n<section class=\"grid two page-break\">\n");

    body.push_str(&render_donut_card(report));
    body.push_str(&render_table_card(report));

    let _ = write!(
        body,
        r#"</section>
</main>
<footer class="print-only"><span>{brand} - {title}</span><span>Generated on {date}</span></footer>
"#,
        brand = html_escape(&branding.name),
        title = html_escape(&branding.title),
        date = html_escape(generated_on),
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="en-GB">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - {client}</title>
<style>{css}</style>
</head>
<body>
{body}</body>
</html>
"#,
        title = html_escape(&branding.title),
        client = html_escape(&input.client),
        css = STYLES,
        body = body,
    )
}

fn render_gauge_card(report: &Report) -> String {
    let roi = report.input().roi;
    let reading = normalize(roi);
    let (start, end) = reading.band.stops();
    let stroke = if reading.band.is_gradient() {
        "url(#gauge-gradient)".to_string()
    } else {
        start.to_string()
    };

    format!(
        r##"<div class="card gauge band-{band}">
<h3>Project ROI</h3>
<svg viewBox="0 0 200 110" role="img" aria-label="ROI gauge">
  <defs><linearGradient id="gauge-gradient" x1="0%" y1="0%" x2="100%" y2="0%"><stop offset="0%" stop-color="{start}"/><stop offset="100%" stop-color="{end}"/></linearGradient></defs>
  <path d="M 20 100 A 80 80 0 0 1 180 100" fill="none" stroke="#e2e8f0" stroke-width="24" stroke-linecap="round"/>
  <path d="M 20 100 A 80 80 0 0 1 180 100" fill="none" stroke="{stroke}" stroke-width="24" stroke-linecap="round" stroke-dasharray="{arc}" stroke-dashoffset="{offset:.2}"/>
</svg>
<div class="roi">{roi}%</div>
<div class="label">Return on Investment</div>
<div class="multiplier">{sentence}</div>
</div>
"##,
        band = reading.band.name(),
        start = start,
        end = end,
        stroke = stroke,
        arc = GAUGE_ARC_LENGTH,
        offset = reading.dash_offset(),
        roi = html_escape(&format_plain(roi)),
        sentence = html_escape(&multiplier_sentence(report.metrics().roi_multiplier)),
    )
}

/// Donut segments as (entry, dash length, dash offset) along a circle of `DONUT_RADIUS`.
pub fn donut_segments(entries: &[BreakdownEntry]) -> Vec<(&BreakdownEntry, f64, f64)> {
    let circumference = 2.0 * PI * DONUT_RADIUS;
    let total: f64 = entries.iter().map(|e| e.value).sum();
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }

    let gap = if entries.len() > 1 { DONUT_GAP } else { 0.0 };
    let mut consumed = 0.0;
    entries
        .iter()
        .map(|entry| {
            let span = entry.value / total * circumference;
            let length = (span - gap).max(0.5);
            let segment = (entry, length, -consumed);
            consumed += span;
            segment
        })
        .collect()
}

fn render_donut_card(report: &Report) -> String {
    let mut svg = String::new();
    for (entry, length, offset) in donut_segments(report.breakdown()) {
        let _ = write!(
            svg,
            r#"<circle cx="120" cy="120" r="{r}" fill="none" stroke="{color}" stroke-width="30" stroke-dasharray="{len:.2} {rest:.2}" stroke-dashoffset="{offset:.2}" transform="rotate(-90 120 120)"><title>{label}: {value}</title></circle>"#,
            r = DONUT_RADIUS,
            color = entry.color,
            len = length,
            rest = 2.0 * PI * DONUT_RADIUS,
            offset = offset,
            label = html_escape(entry.label),
            value = html_escape(&format_currency(entry.value)),
        );
    }

    let mut legend = String::new();
    for entry in report.breakdown() {
        let _ = write!(
            legend,
            r#"<li><span class="dot" style="background:{}"></span>{} <strong>{}</strong></li>"#,
            entry.color,
            html_escape(entry.label),
            html_escape(&format_currency(entry.value))
        );
    }

    format!(
        r#"<div class="card">
<h3>Investment Breakdown</h3>
<svg viewBox="0 0 240 240" class="donut" role="img" aria-label="Investment breakdown">{svg}
  <text x="120" y="112" text-anchor="middle" class="total-label">TOTAL</text>
  <text x="120" y="136" text-anchor="middle" class="total-value">{total}</text>
</svg>
<ul class="legend">{legend}</ul>
</div>
"#,
        svg = svg,
        total = html_escape(&format_currency(report.input().investment)),
        legend = legend,
    )
}

fn render_table_card(report: &Report) -> String {
    let rows = overview_rows(report);
    let last = rows.len().saturating_sub(1);
    let mut table = String::new();
    for (i, (metric, value, impact)) in rows.iter().enumerate() {
        let impact_class = if impact.starts_with('-') {
            "negative"
        } else if impact.starts_with('+') {
            "positive"
        } else {
            "muted"
        };
        let _ = write!(
            table,
            r#"<tr{row}><td>{}</td><td>{}</td><td class="{cls}">{}</td></tr>"#,
            html_escape(metric),
            html_escape(value),
            html_escape(impact),
            row = if i == last { r#" class="highlight""# } else { "" },
            cls = impact_class,
        );
    }

    format!(
        r#"<div class="card">
<h3>Financial Overview</h3>
<table><thead><tr><th>Metric</th><th>Value</th><th>Monthly Impact</th></tr></thead><tbody>{table}</tbody></table>
<p class="note">{note}</p>
</div>
"#,
        table = table,
        note = html_escape(FOOTNOTE),
    )
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLES: &str = r#"
body { margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; background: #f8fafc; color: #0f172a; }
header { display: flex; justify-content: space-between; align-items: center; padding: 1.25rem 2rem; background: #fff; border-bottom: 1px solid #e2e8f0; }
header .brand { display: flex; gap: 1rem; align-items: center; }
header .mark { width: 2.5rem; height: 2.5rem; border-radius: .5rem; background: #2563eb; color: #fff; font-weight: 700; display: flex; align-items: center; justify-content: center; }
header .label { font-size: .65rem; font-weight: 700; letter-spacing: .2em; text-transform: uppercase; color: #2563eb; }
header h1 { margin: .1rem 0 0; font-size: 1.25rem; }
header .meta { text-align: right; }
header .project { font-weight: 600; color: #334155; }
header .date { font-size: .75rem; color: #94a3b8; }
main { max-width: 1400px; margin: 0 auto; padding: 2rem; }
.grid { display: grid; grid-template-columns: 1fr 2fr; gap: 1.5rem; margin-bottom: 1.5rem; }
.grid.two { grid-template-columns: 1fr 1fr; }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1.5rem; }
.card { background: #fff; border: 1px solid #f1f5f9; border-radius: .75rem; padding: 1.5rem; box-shadow: 0 1px 2px rgb(0 0 0 / .05); }
.card h3 { margin: 0 0 .5rem; font-size: .75rem; font-weight: 700; text-transform: uppercase; letter-spacing: .05em; color: #64748b; }
.card .value { font-size: 1.9rem; font-weight: 700; }
.card .subtitle { font-size: .875rem; color: #475569; margin-top: .75rem; }
.card .subtext { font-size: .75rem; color: #94a3b8; margin-top: .25rem; }
.gauge { text-align: center; }
.gauge svg { width: 16rem; overflow: visible; }
.gauge .roi { font-size: 3rem; font-weight: 700; }
.gauge .label { font-size: .8rem; font-weight: 700; color: #94a3b8; text-transform: uppercase; margin: .5rem 0; }
.gauge .multiplier { display: inline-block; background: #f8fafc; border-radius: .5rem; padding: .5rem 1rem; font-size: .875rem; color: #475569; }
.donut { width: 100%; max-height: 300px; }
.total-label { font-size: 10px; fill: #94a3b8; }
.total-value { font-size: 18px; font-weight: 700; fill: #1e293b; }
.legend { list-style: none; padding: 0; display: flex; flex-wrap: wrap; gap: .75rem; font-size: .8rem; }
.dot { display: inline-block; width: .6rem; height: .6rem; border-radius: 50%; margin-right: .35rem; }
table { width: 100%; border-collapse: collapse; font-size: .875rem; }
th { text-align: left; background: #f8fafc; color: #64748b; font-weight: 500; padding: .9rem 1.2rem; }
td { padding: .9rem 1.2rem; border-top: 1px solid #f1f5f9; color: #475569; }
tr.highlight { background: #eff6ff; font-weight: 700; }
.negative { color: #ef4444; }
.positive { color: #10b981; font-weight: 700; }
.muted { color: #94a3b8; }
.note { margin-top: 1.5rem; padding: 1rem; background: #f8fafc; border-radius: .5rem; font-size: .75rem; color: #64748b; }
.print-only { display: none; }
@media print {
  * { -webkit-print-color-adjust: exact !important; print-color-adjust: exact !important; }
  body { background: #fff; }
  .page-break { page-break-before: always; }
  .print-only { display: flex; justify-content: space-between; position: fixed; bottom: 0; left: 0; right: 0; padding: 1rem 2rem; font-size: .75rem; color: #94a3b8; border-top: 1px solid #e2e8f0; }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::InputRecord;
    use crate::resolver::{demo_record, resolve, QueryParams};

    #[test]
    fn test_json_document_demo() {
        let resolution = resolve(&QueryParams::default());
        let report = Report::new(resolution.record.clone());
        let json = to_json(&ReportDocument::new(&resolution, &report, "18 October 2026")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["origin"], "demo");
        assert_eq!(value["input"]["client"], "Acme Corp");
        assert_eq!(value["metrics"]["net_benefit"], 141600.0);
        assert_eq!(value["metrics"]["support_costs"], 5600.0);
        assert_eq!(value["breakdown"].as_array().unwrap().len(), 4);
        assert_eq!(value["breakdown"][3]["label"], "Support & Ops");
        assert_eq!(value["gauge"]["band"], "excellent");
        assert_eq!(value["generated_on"], "18 October 2026");
    }

    #[test]
    fn test_json_lists_unparsed_fields() {
        let resolution = resolve(&QueryParams::parse("client=X&roi=abc"));
        let report = Report::new(resolution.record.clone());
        let json = to_json(&ReportDocument::new(&resolution, &report, "today")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["origin"], "supplied");
        assert_eq!(value["unparsed_fields"], serde_json::json!(["roi"]));
        assert_eq!(value["gauge"]["band"], "low");
    }

    #[test]
    fn test_render_html_demo() {
        let html = render_html(&Report::new(demo_record()), &Branding::default(), "18 October 2026");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Acme Corp</h1>"));
        assert!(html.contains("246%"));
        assert!(html.contains("For every £1 invested, returns £3.46"));
        assert!(html.contains("band-excellent"));
        assert!(html.contains("stroke=\"#22c55e\""));
        assert!(html.contains("Support &amp; Ops"));
        assert!(html.contains("+£11,800"));
        assert!(html.contains("Generated on 18 October 2026"));
        assert!(html.contains("@media print"));
    }

    #[test]
    fn test_render_html_gradient_band() {
        let report = Report::new(InputRecord {
            client: "Mid".to_string(),
            roi: 150.0,
            ..Default::default()
        });
        let html = render_html(&report, &Branding::default(), "d");
        assert!(html.contains("band-high-gradient"));
        assert!(html.contains("url(#gauge-gradient)"));
    }

    #[test]
    fn test_render_html_escapes_client() {
        let report = Report::new(InputRecord {
            client: "<script>alert(1)</script>".to_string(),
            project: "R&D".to_string(),
            ..Default::default()
        });
        let html = render_html(&report, &Branding::default(), "d");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("R&amp;D"));
    }

    #[test]
    fn test_donut_segments() {
        let input = demo_record();
        let report = Report::new(input);
        let segments = donut_segments(report.breakdown());
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].2, 0.0);

        let circumference = 2.0 * PI * DONUT_RADIUS;
        let first_span = 25000.0 / 45000.0 * circumference;
        assert!((segments[1].2 + first_span).abs() < 1e-9);
        assert!(segments.iter().all(|(_, len, _)| *len > 0.0));

        assert!(donut_segments(&[]).is_empty());
    }

    #[test]
    fn test_write_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        write_html(&path, &Report::new(demo_record()), &Branding::default(), "d").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Investment Breakdown"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&#39;");
    }
}
