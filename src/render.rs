//! Text rendering of the calculator screen.
//!
//! Every function returns plain lines; the session loop decides where they go.

use crate::bands::{BandLevels, DaysConvention, GammaBands};
use crate::errors::{CalcError, CalcResult};
use crate::watchlist::Watchlist;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub const TITLE: &str = "GAMMA BANDS CALCULATOR";
pub const FOOTER: &str = "SBH DIGITAL LTD";

const WIDTH: usize = 60;

/// Number of decimal places shown for band values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    Two,
    #[default]
    Four,
}

impl Precision {
    #[inline]
    pub fn places(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Two => Self::Four,
            Self::Four => Self::Two,
        }
    }

    /// Fixed-place formatting. Negative zero prints as zero.
    #[inline]
    pub fn format(self, value: f64) -> String {
        let value = if value == 0.0 { 0.0 } else { value };
        format!("{:.*}", self.places(), value)
    }
}

impl std::str::FromStr for Precision {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim() {
            "2" => Ok(Self::Two),
            "4" => Ok(Self::Four),
            other => Err(CalcError::Parse(format!("decimals must be 2 or 4, got {other:?}"))),
        }
    }
}

/// Raw form contents as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct FormView<'a> {
    pub settle: &'a str,
    pub iv: &'a str,
    pub rr_skew: &'a str,
    pub days: DaysConvention,
    pub precision: Precision,
}

pub fn header<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let clock = now.format("%b %d, %Y, %I:%M %p").to_string();
    let pad = WIDTH.saturating_sub(TITLE.len() + clock.len()).max(1);
    format!("{TITLE}{}{clock}", " ".repeat(pad))
}

/// Securities bar. The selected label is bracketed.
pub fn securities_bar(watchlist: &Watchlist) -> String {
    let selected = watchlist.selected();
    let labels: Vec<String> = watchlist
        .labels()
        .iter()
        .map(|l| {
            if l == selected {
                format!("[{l}]")
            } else {
                l.clone()
            }
        })
        .collect();
    format!("SECURITIES: {}", labels.join(" "))
}

pub fn form(selected: &str, view: &FormView<'_>) -> Vec<String> {
    vec![
        field("UNDERLYING", selected),
        field("DAYS", view.days),
        field("SETTLE", view.settle),
        field("IV (%)", view.iv),
        field("RR SKEW (%)", view.rr_skew),
        field("DECIMALS", view.precision.places()),
    ]
}

/// Result panels, titled with the label selected at render time.
pub fn results(selected: &str, bands: &GammaBands, precision: Precision) -> Vec<String> {
    let mut lines = Vec::with_capacity(12);
    lines.push(format!("GAMMA BANDS - {selected}"));
    lines.push(String::new());
    lines.push("GAMMA BAND".to_string());
    lines.push(format!("  {}", precision.format(bands.gamma_band)));
    lines.push("UPPER BANDS".to_string());
    push_levels(&mut lines, &bands.upper, precision);
    lines.push("LOWER BANDS".to_string());
    push_levels(&mut lines, &bands.lower, precision);
    lines
}

pub fn json(bands: &GammaBands) -> CalcResult<String> {
    Ok(serde_json::to_string_pretty(bands)?)
}

/// Full screen: header, securities bar, form, results when present, footer.
pub fn screen<Tz>(
    now: &DateTime<Tz>,
    watchlist: &Watchlist,
    view: &FormView<'_>,
    bands: Option<&GammaBands>,
) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let rule = "=".repeat(WIDTH);
    let mut lines = vec![header(now), rule.clone(), securities_bar(watchlist), rule.clone()];
    lines.extend(form(watchlist.selected(), view));
    if let Some(b) = bands {
        lines.push("-".repeat(WIDTH));
        lines.extend(results(watchlist.selected(), b, view.precision));
    }
    lines.push(rule);
    lines.push(format!("{FOOTER:>WIDTH$}"));
    lines
}

fn push_levels(lines: &mut Vec<String>, levels: &BandLevels, precision: Precision) {
    lines.push(field("  1G", precision.format(levels.one_g)));
    lines.push(field("  1/2G", precision.format(levels.half_g)));
    lines.push(field("  1/4G", precision.format(levels.quarter_g)));
}

fn field(label: &str, value: impl Display) -> String {
    format!("{label:<14}{value}")
}
