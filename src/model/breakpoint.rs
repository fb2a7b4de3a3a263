use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Responsive layout threshold, derived from the terminal width in columns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    #[default]
    Base,
    Sm,
    Md,
    Lg,
    Xl,
}

static ALL_BREAKPOINTS: &[Breakpoint] = &[
    Breakpoint::Base,
    Breakpoint::Sm,
    Breakpoint::Md,
    Breakpoint::Lg,
    Breakpoint::Xl,
];

impl Breakpoint {
    /// Returns the breakpoint a terminal `columns` wide falls into.
    pub fn from_width(columns: u16) -> Self {
        match columns {
            0..40 => Self::Base,
            40..60 => Self::Sm,
            60..80 => Self::Md,
            80..120 => Self::Lg,
            _ => Self::Xl,
        }
    }

    /// Returns the lowercase identifier used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
        }
    }

    /// Returns all breakpoints from narrowest to widest.
    pub fn all() -> &'static [Breakpoint] {
        ALL_BREAKPOINTS
    }
}

#[mutants::skip]
impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown breakpoint: {0}")]
pub struct UnknownBreakpoint(pub String);

impl FromStr for Breakpoint {
    type Err = UnknownBreakpoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_BREAKPOINTS
            .iter()
            .copied()
            .find(|bp| bp.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownBreakpoint(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn from_width_thresholds() {
        assert_eq!(Breakpoint::from_width(0), Breakpoint::Base);
        assert_eq!(Breakpoint::from_width(39), Breakpoint::Base);
        assert_eq!(Breakpoint::from_width(40), Breakpoint::Sm);
        assert_eq!(Breakpoint::from_width(59), Breakpoint::Sm);
        assert_eq!(Breakpoint::from_width(60), Breakpoint::Md);
        assert_eq!(Breakpoint::from_width(80), Breakpoint::Lg);
        assert_eq!(Breakpoint::from_width(119), Breakpoint::Lg);
        assert_eq!(Breakpoint::from_width(120), Breakpoint::Xl);
        assert_eq!(Breakpoint::from_width(u16::MAX), Breakpoint::Xl);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("SM".parse(), Ok(Breakpoint::Sm));
        assert_eq!("base".parse(), Ok(Breakpoint::Base));
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            "xxl".parse::<Breakpoint>(),
            Err(UnknownBreakpoint("xxl".to_string()))
        );
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Breakpoint::Md).unwrap();
        assert_eq!(json, "\"md\"");
        let back: Breakpoint = serde_json::from_str("\"xl\"").unwrap();
        assert_eq!(back, Breakpoint::Xl);
    }

    #[test]
    fn all_is_ordered_narrow_to_wide() {
        let all = Breakpoint::all();
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[quickcheck]
    fn from_width_is_monotonic(a: u16, b: u16) -> bool {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Breakpoint::from_width(lo) <= Breakpoint::from_width(hi)
    }

    #[quickcheck]
    fn as_str_round_trips_through_parse(idx: usize) -> bool {
        let bp = Breakpoint::all()[idx % Breakpoint::all().len()];
        bp.as_str().parse::<Breakpoint>() == Ok(bp)
    }
}
