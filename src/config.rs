use crate::bands::DaysConvention;
use crate::errors::{CalcError, CalcResult};
use crate::render::Precision;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub days: DaysConvention,
    pub precision: Precision,
    pub underlyings: Vec<String>,
    pub selected: String,
}

impl AppConfig {
    pub fn from_env() -> CalcResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CalcResult<Self> {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let days = var_or("GAMMA_DAYS", "256")
            .parse::<DaysConvention>()
            .map_err(|e| CalcError::Config(format!("GAMMA_DAYS: {e}")))?;

        let precision = var_or("GAMMA_DECIMALS", "4")
            .parse::<Precision>()
            .map_err(|e| CalcError::Config(format!("GAMMA_DECIMALS: {e}")))?;

        let underlyings = parse_underlyings(&var_or("GAMMA_UNDERLYINGS", "Crude,ES,NQ,GC,BTC"));
        if underlyings.is_empty() {
            return Err(CalcError::Config("GAMMA_UNDERLYINGS: no labels".into()));
        }

        Ok(Self {
            days,
            precision,
            underlyings,
            selected: var_or("GAMMA_SELECTED", "ES"),
        })
    }
}

fn parse_underlyings(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
