use crate::bands::DaysConvention;
use crate::errors::{CalcError, CalcResult};
use crate::render::Precision;

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Settle(String),
    Iv(String),
    RrSkew(String),
    Days(DaysConvention),
    /// Optionally replaces settle, iv and rr skew before computing.
    Calc(Option<[String; 3]>),
    Add(String),
    Remove(String),
    Select(String),
    /// None toggles.
    Decimals(Option<Precision>),
    Show,
    Json,
    Help,
    Quit,
}

pub const HELP: &[&str] = &[
    "settle <x>             set settlement price",
    "iv <x>                 set implied volatility (%)",
    "rr <x>                 set risk-reversal skew (%)",
    "days <256|365>         set days convention",
    "calc [settle iv rr]    compute gamma bands",
    "add <label>            track an underlying",
    "remove <label>         stop tracking an underlying",
    "select <label>         select an underlying",
    "decimals [2|4]         set or toggle displayed decimals",
    "show                   redraw the screen",
    "json                   print last result as JSON",
    "quit                   exit",
];

impl Command {
    /// Parse a single input line. Blank lines yield None.
    pub fn parse(line: &str) -> CalcResult<Option<Self>> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = parts.collect();

        let cmd = match verb.to_ascii_lowercase().as_str() {
            "settle" => Command::Settle(single(verb, &args)?),
            "iv" => Command::Iv(single(verb, &args)?),
            "rr" => Command::RrSkew(single(verb, &args)?),
            "days" => Command::Days(single(verb, &args)?.parse()?),
            "calc" => match args.as_slice() {
                [] => Command::Calc(None),
                [s, v, r] => Command::Calc(Some([s.to_string(), v.to_string(), r.to_string()])),
                _ => return Err(CalcError::Command("calc takes zero or three values".into())),
            },
            "add" => Command::Add(single(verb, &args)?),
            "remove" | "rm" => Command::Remove(single(verb, &args)?),
            "select" | "sel" => Command::Select(single(verb, &args)?),
            "decimals" => match args.as_slice() {
                [] => Command::Decimals(None),
                [p] => Command::Decimals(Some(p.parse()?)),
                _ => return Err(CalcError::Command("decimals takes at most one value".into())),
            },
            "show" => Command::Show,
            "json" => Command::Json,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CalcError::Command(format!("unknown command {other:?}"))),
        };
        Ok(Some(cmd))
    }
}

fn single(verb: &str, args: &[&str]) -> CalcResult<String> {
    match args {
        [one] => Ok((*one).to_string()),
        [] => Err(CalcError::Command(format!("{verb} needs a value"))),
        _ => Err(CalcError::Command(format!("{verb} takes a single value"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_ignored() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_field_commands_keep_raw_text() {
        assert_eq!(Command::parse("settle 4500.25").unwrap(), Some(Command::Settle("4500.25".into())));
        assert_eq!(Command::parse("IV abc").unwrap(), Some(Command::Iv("abc".into())));
        assert_eq!(Command::parse("rr -12").unwrap(), Some(Command::RrSkew("-12".into())));
    }

    #[test]
    fn test_calc_forms() {
        assert_eq!(Command::parse("calc").unwrap(), Some(Command::Calc(None)));
        assert_eq!(
            Command::parse("calc 100 20 10").unwrap(),
            Some(Command::Calc(Some(["100".into(), "20".into(), "10".into()])))
        );
        assert!(matches!(Command::parse("calc 100 20"), Err(CalcError::Command(_))));
    }

    #[test]
    fn test_days_and_decimals() {
        assert_eq!(
            Command::parse("days 365").unwrap(),
            Some(Command::Days(DaysConvention::Calendar365))
        );
        assert!(matches!(Command::parse("days 252"), Err(CalcError::Parse(_))));
        assert_eq!(Command::parse("decimals").unwrap(), Some(Command::Decimals(None)));
        assert_eq!(
            Command::parse("decimals 2").unwrap(),
            Some(Command::Decimals(Some(Precision::Two)))
        );
    }

    #[test]
    fn test_unknown_and_missing_args() {
        assert!(matches!(Command::parse("plot"), Err(CalcError::Command(_))));
        assert!(matches!(Command::parse("add"), Err(CalcError::Command(_))));
        assert!(matches!(Command::parse("select ES NQ"), Err(CalcError::Command(_))));
    }
}
