//! Report link resolution
//!
//! Turns a report link (full URL, bare query string, file or stdin) into a
//! fully populated `InputRecord`. Links without `client` and `project` fall
//! back to the demo dataset so there is always something to render.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

use crate::report::InputRecord;

lazy_static! {
    // Longest leading float, same prefix rule as a browser's parseFloat
    static ref LEADING_FLOAT: Regex =
        Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap();
}

/// The source channel itself could not be read. Shown as "Invalid Dashboard Link".
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read report link from {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read report link from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("Not an addressable report link '{link}': {source}")]
    NotAddressable {
        link: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone)]
pub enum LinkSource {
    /// Nothing supplied; resolves to the demo dataset
    Empty,
    Inline(String),
    File(PathBuf),
    Stdin,
}

impl LinkSource {
    pub fn describe(&self) -> String {
        match self {
            LinkSource::Empty => "no link".to_string(),
            LinkSource::Inline(_) => "command line".to_string(),
            LinkSource::File(path) => path.display().to_string(),
            LinkSource::Stdin => "stdin".to_string(),
        }
    }

    /// Read the raw link text and decode its query parameters.
    pub fn read(&self) -> Result<QueryParams, SourceError> {
        let raw = match self {
            LinkSource::Empty => String::new(),
            LinkSource::Inline(link) => link.clone(),
            LinkSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| SourceError::Unreadable {
                    path: path.clone(),
                    source,
                })?
            }
            LinkSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(SourceError::Stdin)?;
                buf
            }
        };
        QueryParams::from_link(&raw)
    }
}

// ── Query parameters ──

/// Decoded key/value pairs in link order. Repeated keys keep every value; lookups take the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Accepts `https://host/path?a=1`, `/path?a=1`, `?a=1` or `a=1`.
    pub fn from_link(link: &str) -> Result<Self, SourceError> {
        let link = link.trim();
        if link.is_empty() {
            return Ok(Self::default());
        }

        if has_scheme(link) {
            let url = Url::parse(link).map_err(|source| SourceError::NotAddressable {
                link: link.to_string(),
                source,
            })?;
            return Ok(Self::parse(url.query().unwrap_or("")));
        }

        let without_fragment = link.split('#').next().unwrap_or("");
        let query = match without_fragment.split_once('?') {
            Some((_, q)) => q,
            None => without_fragment,
        };
        Ok(Self::parse(query))
    }

    pub fn has(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// True when the link starts with `scheme://`. URLs inside parameter values don't count.
fn has_scheme(link: &str) -> bool {
    let head = link.split(['?', '#']).next().unwrap_or("");
    match head.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

// ── Resolution ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputOrigin {
    Demo,
    Supplied,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub record: InputRecord,
    pub origin: InputOrigin,
    /// Fields present in the link whose value had no numeric prefix (coerced to 0)
    pub unparsed: Vec<&'static str>,
}

pub fn demo_record() -> InputRecord {
    InputRecord {
        client: "Acme Corp".to_string(),
        project: "Customer Service Automation".to_string(),
        weekly_saved: 120.0,
        annual_saved: 6240.0,
        annual_savings: 156000.0,
        investment: 45000.0,
        payback: 4.2,
        roi: 246.0,
        monthly_costs: 1200.0,
        hourly_rate: 25.0,
        impl_fee: 25000.0,
        platform_costs: 800.0,
        ai_costs: 400.0,
        annual_recurring: 14400.0,
    }
}

pub fn resolve(params: &QueryParams) -> Resolution {
    if !params.has("client") && !params.has("project") {
        return Resolution {
            record: demo_record(),
            origin: InputOrigin::Demo,
            unparsed: Vec::new(),
        };
    }

    let mut unparsed = Vec::new();
    let mut num = |key: &'static str| -> f64 {
        let raw = match params.get(key) {
            Some(v) => v.replace(',', ""),
            None => return 0.0,
        };
        if raw.is_empty() {
            return 0.0;
        }
        match parse_leading_float(&raw) {
            Some(value) => value,
            None => {
                unparsed.push(key);
                0.0
            }
        }
    };

    let record = InputRecord {
        client: String::new(),
        project: String::new(),
        weekly_saved: num("weekly_saved"),
        annual_saved: num("annual_saved"),
        annual_savings: num("annual_savings"),
        investment: num("investment"),
        payback: num("payback"),
        roi: num("roi"),
        monthly_costs: num("monthly_costs"),
        hourly_rate: num("hourly_rate"),
        impl_fee: num("impl_fee"),
        platform_costs: num("platform_costs"),
        ai_costs: num("ai_costs"),
        annual_recurring: num("annual_recurring"),
    };

    let text = |key: &str| params.get(key).unwrap_or_default().to_string();

    Resolution {
        record: InputRecord {
            client: text("client"),
            project: text("project"),
            ..record
        },
        origin: InputOrigin::Supplied,
        unparsed,
    }
}

/// Parse the longest numeric prefix of `raw` after leading whitespace.
/// `"4.2 months"` gives 4.2, `"abc"` gives None.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let m = LEADING_FLOAT.find(trimmed)?;
    let text = m.as_str();
    if let Some(sign) = text.strip_suffix("Infinity") {
        return Some(if sign == "-" {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    text.parse::<f64>().ok()
}
