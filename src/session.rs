use crate::bands::{self, DaysConvention, GammaBands};
use crate::command::{Command, HELP};
use crate::config::AppConfig;
use crate::errors::{CalcError, CalcResult};
use crate::render::{self, FormView, Precision};
use crate::watchlist::{ListChange, Watchlist};
use smallvec::SmallVec;

// ── Messages INTO the session loop ──

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Line(String),
    Shutdown,
}

/// Lines produced by one command (most commands emit a handful).
pub type Output = SmallVec<[String; 16]>;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Print(Output),
    Quit,
}

// ── Session state (owned by the loop, no locks) ──

#[derive(Debug, Clone)]
pub struct Session {
    pub watchlist: Watchlist,
    pub settle: String,
    pub iv: String,
    pub rr_skew: String,
    pub days: DaysConvention,
    pub precision: Precision,
    /// Last successful computation. Left untouched when a calc fails.
    pub results: Option<GammaBands>,
}

impl Session {
    pub fn new(watchlist: Watchlist, days: DaysConvention, precision: Precision) -> Self {
        Self {
            watchlist,
            settle: String::new(),
            iv: String::new(),
            rr_skew: String::new(),
            days,
            precision,
            results: None,
        }
    }

    pub fn from_config(cfg: &AppConfig) -> CalcResult<Self> {
        let watchlist = Watchlist::new(&cfg.underlyings, &cfg.selected)
            .ok_or_else(|| CalcError::Config("no usable underlyings".into()))?;
        Ok(Self::new(watchlist, cfg.days, cfg.precision))
    }

    /// Apply one command. Errors leave the session as it was, except that
    /// `calc` with inline values keeps the new form text.
    pub fn apply(&mut self, cmd: Command) -> CalcResult<Outcome> {
        let mut out = Output::new();
        match cmd {
            Command::Settle(v) => self.settle = v,
            Command::Iv(v) => self.iv = v,
            Command::RrSkew(v) => self.rr_skew = v,
            Command::Days(d) => self.days = d,

            Command::Calc(values) => {
                if let Some([s, v, r]) = values {
                    self.settle = s;
                    self.iv = v;
                    self.rr_skew = r;
                }
                let bands = bands::compute_from_text(&self.settle, &self.iv, self.days, &self.rr_skew)?;
                tracing::info!(
                    underlying = self.watchlist.selected(),
                    days = self.days.days(),
                    gamma_band = bands.gamma_band,
                    upper_1g = bands.upper.one_g,
                    lower_1g = bands.lower.one_g,
                    "gamma bands computed"
                );
                self.results = Some(bands);
                out.extend(render::results(self.watchlist.selected(), &bands, self.precision));
            }

            Command::Add(label) => {
                let change = self.watchlist.add(&label);
                out.push(notice("add", &label, change));
            }
            Command::Remove(label) => {
                let change = self.watchlist.remove(&label);
                out.push(notice("remove", &label, change));
            }
            Command::Select(label) => {
                let change = self.watchlist.select(&label);
                out.push(notice("select", &label, change));
            }

            Command::Decimals(p) => {
                self.precision = p.unwrap_or_else(|| self.precision.toggle());
                out.push(format!("decimals: {}", self.precision.places()));
            }

            Command::Show => out.extend(self.screen()),
            Command::Json => match &self.results {
                Some(b) => out.push(render::json(b)?),
                None => out.push("no results yet".to_string()),
            },
            Command::Help => out.extend(HELP.iter().map(|s| s.to_string())),
            Command::Quit => return Ok(Outcome::Quit),
        }
        Ok(Outcome::Print(out))
    }

    /// Parse and apply one raw input line.
    pub fn handle_line(&mut self, line: &str) -> CalcResult<Outcome> {
        match Command::parse(line)? {
            Some(cmd) => self.apply(cmd),
            None => Ok(Outcome::Print(Output::new())),
        }
    }

    pub fn screen(&self) -> Vec<String> {
        let view = FormView {
            settle: &self.settle,
            iv: &self.iv,
            rr_skew: &self.rr_skew,
            days: self.days,
            precision: self.precision,
        };
        render::screen(
            &chrono::Local::now(),
            &self.watchlist,
            &view,
            self.results.as_ref(),
        )
    }
}

fn notice(action: &str, label: &str, change: ListChange) -> String {
    match change {
        ListChange::Applied => format!("{action} {}: ok", label.trim().to_uppercase()),
        ListChange::Rejected(reason) => {
            tracing::debug!(action, label, reason, "watchlist edit rejected");
            format!("{action} {}: {reason}", label.trim().to_uppercase())
        }
    }
}
