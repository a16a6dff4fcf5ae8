use crate::errors::{CalcError, CalcResult};

/// Days-per-year used to de-annualize implied volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DaysConvention {
    /// 256 trading days
    #[default]
    Trading256,
    /// 365 calendar days
    Calendar365,
}

impl DaysConvention {
    #[inline]
    pub fn days(self) -> u32 {
        match self {
            Self::Trading256 => 256,
            Self::Calendar365 => 365,
        }
    }

    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            256 => Some(Self::Trading256),
            365 => Some(Self::Calendar365),
            _ => None,
        }
    }
}

impl std::fmt::Display for DaysConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.days())
    }
}

impl std::str::FromStr for DaysConvention {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::from_days)
            .ok_or_else(|| CalcError::Parse(format!("days must be 256 or 365, got {s:?}")))
    }
}

/// One side of the bands: the full band and its half and quarter fractions.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct BandLevels {
    pub one_g: f64,
    pub half_g: f64,
    pub quarter_g: f64,
}

impl BandLevels {
    #[inline]
    fn from_one_g(one_g: f64) -> Self {
        Self {
            one_g,
            half_g: one_g * 0.5,
            quarter_g: one_g * 0.25,
        }
    }
}

/// Output of a single band computation. Recomputed from scratch on every calc.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct GammaBands {
    pub gamma_band: f64,
    pub upper: BandLevels,
    pub lower: BandLevels,
}

/// Gamma band computation.
///
/// gamma = S * (IV / sqrt(D)) / 100
/// upper 1G = gamma * (1 + rr)
/// lower 1G = |gamma * (rr - 1)|
///
/// where rr is the risk-reversal skew as a fraction. Upper 1G is not
/// clamped, so it goes negative when rr < -1.
///
/// Pure function. Rejects non-finite inputs without computing anything,
/// and rejects results that overflow f64.
pub fn compute(
    settle: f64,
    iv_pct: f64,
    days: DaysConvention,
    rr_skew_pct: f64,
) -> CalcResult<GammaBands> {
    ensure_finite("settle", settle)?;
    ensure_finite("iv", iv_pct)?;
    ensure_finite("rr skew", rr_skew_pct)?;

    let rr = rr_skew_pct / 100.0;
    let gamma_band = settle * (iv_pct / f64::from(days.days()).sqrt()) / 100.0;

    let upper = BandLevels::from_one_g(gamma_band * (1.0 + rr));
    let lower = BandLevels::from_one_g((gamma_band * (rr - 1.0)).abs());

    if !(gamma_band.is_finite() && upper.one_g.is_finite() && lower.one_g.is_finite()) {
        return Err(CalcError::Parse(format!(
            "inputs overflow: gamma band {gamma_band}, upper {}, lower {}",
            upper.one_g, lower.one_g
        )));
    }

    Ok(GammaBands {
        gamma_band,
        upper,
        lower,
    })
}

/// Parse raw form text and compute. All three fields must parse before
/// anything is computed.
pub fn compute_from_text(
    settle: &str,
    iv_pct: &str,
    days: DaysConvention,
    rr_skew_pct: &str,
) -> CalcResult<GammaBands> {
    let settle = parse_field("settle", settle)?;
    let iv_pct = parse_field("iv", iv_pct)?;
    let rr_skew_pct = parse_field("rr skew", rr_skew_pct)?;
    compute(settle, iv_pct, days, rr_skew_pct)
}

fn parse_field(name: &str, raw: &str) -> CalcResult<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| CalcError::Parse(format!("{name}: {raw:?} is not a number")))?;
    ensure_finite(name, value)?;
    Ok(value)
}

#[inline]
fn ensure_finite(name: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::Parse(format!("{name}: {value} is not finite")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_zero_skew_scenario() {
        let b = compute(100.0, 20.0, DaysConvention::Trading256, 0.0).unwrap();
        assert_eq!(b.gamma_band, 1.25);
        assert_eq!(b.upper.one_g, 1.25);
        assert_eq!(b.lower.one_g, 1.25);
        assert_eq!(b.upper.half_g, 0.625);
        assert_eq!(b.lower.quarter_g, 0.3125);
    }

    #[test]
    fn test_positive_skew_scenario() {
        let b = compute(100.0, 20.0, DaysConvention::Trading256, 10.0).unwrap();
        assert_eq!(b.gamma_band, 1.25);
        assert!((b.upper.one_g - 1.375).abs() < EPS, "upper={}", b.upper.one_g);
        assert!((b.lower.one_g - 1.125).abs() < EPS, "lower={}", b.lower.one_g);
    }

    #[test]
    fn test_calendar_days_uses_exact_sqrt() {
        let b = compute(100.0, 20.0, DaysConvention::Calendar365, 0.0).unwrap();
        let expected = 100.0 * (20.0 / 365.0_f64.sqrt()) / 100.0;
        assert_eq!(b.gamma_band, expected);
        assert!((b.gamma_band - 1.046_847_845).abs() < 1e-8, "gamma={}", b.gamma_band);
    }

    #[test]
    fn test_fractions_are_exact_multiples() {
        for &(s, v, rr) in &[(4321.5, 18.2, -7.5), (0.73, 95.0, 33.0), (-50.0, 12.0, 150.0)] {
            for days in [DaysConvention::Trading256, DaysConvention::Calendar365] {
                let b = compute(s, v, days, rr).unwrap();
                assert_eq!(b.upper.half_g, b.upper.one_g * 0.5);
                assert_eq!(b.upper.quarter_g, b.upper.one_g * 0.25);
                assert_eq!(b.lower.half_g, b.lower.one_g * 0.5);
                assert_eq!(b.lower.quarter_g, b.lower.one_g * 0.25);
            }
        }
    }

    #[test]
    fn test_lower_band_never_negative() {
        for rr in [-250.0, -100.0, -1.0, 0.0, 50.0, 100.0, 180.0] {
            for s in [-100.0, 0.0, 100.0] {
                let b = compute(s, 20.0, DaysConvention::Trading256, rr).unwrap();
                assert!(b.lower.one_g >= 0.0, "lower={} for s={s} rr={rr}", b.lower.one_g);
            }
        }
    }

    #[test]
    fn test_upper_band_unclamped_below_minus_hundred() {
        let b = compute(100.0, 20.0, DaysConvention::Trading256, -150.0).unwrap();
        assert!(b.upper.one_g < 0.0, "upper={}", b.upper.one_g);
        assert!(b.lower.one_g > 0.0);
    }

    #[test]
    fn test_symmetric_at_zero_skew() {
        let b = compute(5123.25, 14.7, DaysConvention::Calendar365, 0.0).unwrap();
        assert_eq!(b.upper, b.lower);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(compute(f64::NAN, 20.0, DaysConvention::Trading256, 0.0).is_err());
        assert!(compute(100.0, f64::INFINITY, DaysConvention::Trading256, 0.0).is_err());
        assert!(compute(100.0, 20.0, DaysConvention::Trading256, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_overflow_rejected() {
        let r = compute(1e300, 1e300, DaysConvention::Trading256, 100.0);
        assert!(matches!(r, Err(CalcError::Parse(_))), "result={r:?}");
        let r = compute(1e300, 20.0, DaysConvention::Trading256, 1e300);
        assert!(matches!(r, Err(CalcError::Parse(_))), "result={r:?}");
        // Large but representable still computes
        let b = compute(1e150, 1e150, DaysConvention::Trading256, 100.0).unwrap();
        assert!(b.lower.one_g >= 0.0 && b.gamma_band.is_finite());
    }

    #[test]
    fn test_text_parse_failures() {
        let d = DaysConvention::Trading256;
        assert!(matches!(compute_from_text("", "20", d, "0"), Err(CalcError::Parse(_))));
        assert!(matches!(compute_from_text("100", "abc", d, "0"), Err(CalcError::Parse(_))));
        assert!(matches!(compute_from_text("100", "20", d, "inf"), Err(CalcError::Parse(_))));
        assert!(matches!(compute_from_text("NaN", "20", d, "0"), Err(CalcError::Parse(_))));
    }

    #[test]
    fn test_text_trims_whitespace() {
        let b = compute_from_text(" 100 ", "20\t", DaysConvention::Trading256, " 10").unwrap();
        assert_eq!(b, compute(100.0, 20.0, DaysConvention::Trading256, 10.0).unwrap());
    }

    #[test]
    fn test_days_parse() {
        assert_eq!("256".parse::<DaysConvention>().unwrap(), DaysConvention::Trading256);
        assert_eq!(" 365 ".parse::<DaysConvention>().unwrap(), DaysConvention::Calendar365);
        assert!("252".parse::<DaysConvention>().is_err());
        assert!("x".parse::<DaysConvention>().is_err());
    }
}
