use dns_controller_core::Ttl;
use std::{fmt, str::FromStr, time::Duration};

/// Smallest TTL accepted from an annotation, in seconds.
pub const MIN_SECS: i64 = 1;

/// Largest TTL accepted from an annotation, in seconds.
pub const MAX_SECS: i64 = i32::MAX as i64;

/// A duration in Go's `time.ParseDuration` format, e.g. `1h30m` or `2.5s`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GoDuration {
    duration: Duration,
    is_negative: bool,
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    #[error("invalid unit: {}", EXPECTED_UNITS)]
    InvalidUnit,

    #[error("missing a unit: {}", EXPECTED_UNITS)]
    NoUnit,

    #[error("invalid floating-point number: {}", .0)]
    NotANumber(#[from] std::num::ParseFloatError),

    #[error("duration overflows the largest representable duration")]
    Overflow,

    #[error("TTL must be between {} and {} seconds, got {}", MIN_SECS, MAX_SECS, .0)]
    OutOfRange(i64),
}

const EXPECTED_UNITS: &str = "expected one of 'ns', 'us', '\u{00b5}s', 'ms', 's', 'm', or 'h'";

/// Parses a record TTL given either as whole seconds or as a Go duration.
///
/// Fractional seconds are truncated. Values outside
/// [`MIN_SECS`]..=[`MAX_SECS`] are rejected.
pub fn parse(s: &str) -> Result<Ttl, ParseError> {
    let s = s.trim();
    let secs = match s.parse::<GoDuration>() {
        Ok(d) => {
            let secs = i64::try_from(d.duration.as_secs()).unwrap_or(i64::MAX);
            if d.is_negative {
                -secs
            } else {
                secs
            }
        }
        Err(error) => s.parse::<i64>().map_err(|_| error)?,
    };

    if !(MIN_SECS..=MAX_SECS).contains(&secs) {
        return Err(ParseError::OutOfRange(secs));
    }
    // The range check bounds `secs` to the u32 domain.
    Ok(Ttl::from_secs(secs as u32))
}

// === impl GoDuration ===

impl GoDuration {
    #[inline]
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.is_negative
    }
}

impl From<Duration> for GoDuration {
    fn from(duration: Duration) -> Self {
        Self {
            duration,
            is_negative: false,
        }
    }
}

impl From<GoDuration> for Duration {
    fn from(GoDuration { duration, .. }: GoDuration) -> Self {
        duration
    }
}

impl fmt::Display for GoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write;
        if self.is_negative {
            f.write_char('-')?;
        }
        fmt::Debug::fmt(&self.duration, f)
    }
}

impl FromStr for GoDuration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (is_negative, mut rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        if rest == "0" {
            return Ok(Self {
                duration: Duration::ZERO,
                is_negative,
            });
        }
        if rest.is_empty() {
            return Err(ParseError::NoUnit);
        }

        let mut duration = Duration::ZERO;
        while !rest.is_empty() {
            let (term, tail) = Term::split(rest)?;
            duration = duration
                .checked_add(term.to_duration()?)
                .ok_or(ParseError::Overflow)?;
            rest = tail;
        }

        Ok(Self {
            duration,
            is_negative,
        })
    }
}

// === impl Term ===

/// One `<number><unit>` term of a duration string.
#[derive(Debug)]
struct Term<'s> {
    whole: &'s str,
    fraction: &'s str,
    unit_nanos: u128,
}

impl<'s> Term<'s> {
    /// Fraction digits beyond this add nothing at nanosecond precision.
    const MAX_FRACTION_DIGITS: usize = 18;

    /// Splits the leading term off `s`.
    fn split(s: &'s str) -> Result<(Self, &'s str), ParseError> {
        let unit_start = s
            .find(|c: char| c.is_alphabetic())
            .ok_or(ParseError::NoUnit)?;
        let (number, rest) = s.split_at(unit_start);
        let unit_end = rest
            .find(|c: char| !c.is_alphabetic())
            .unwrap_or(rest.len());
        let (unit, rest) = rest.split_at(unit_end);

        number.parse::<f64>()?;
        if !number.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            return Err(ParseError::NoUnit);
        }
        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));

        let unit_nanos = match unit {
            "ns" => 1,
            // U+00B5 is the "micro sign" while U+03BC is "Greek letter mu"
            "us" | "\u{00b5}s" | "\u{03bc}s" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 60 * 60 * NANOS_PER_SEC,
            _ => return Err(ParseError::InvalidUnit),
        };

        let term = Self {
            whole,
            fraction: &fraction[..fraction.len().min(Self::MAX_FRACTION_DIGITS)],
            unit_nanos,
        };
        Ok((term, rest))
    }

    fn to_duration(&self) -> Result<Duration, ParseError> {
        let whole = digits(self.whole)?
            .checked_mul(self.unit_nanos)
            .ok_or(ParseError::Overflow)?;
        let scale = 10u128.pow(self.fraction.len() as u32);
        let fraction = digits(self.fraction)?
            .checked_mul(self.unit_nanos)
            .ok_or(ParseError::Overflow)?
            / scale;
        let nanos = whole.checked_add(fraction).ok_or(ParseError::Overflow)?;

        let secs = u64::try_from(nanos / NANOS_PER_SEC).map_err(|_| ParseError::Overflow)?;
        let subsec = u32::try_from(nanos % NANOS_PER_SEC).map_err(|_| ParseError::Overflow)?;
        Ok(Duration::new(secs, subsec))
    }
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Reads a run of ASCII digits, treating an empty run as zero.
fn digits(s: &str) -> Result<u128, ParseError> {
    s.bytes().try_fold(0u128, |acc, b| {
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(u128::from(b - b'0')))
            .ok_or(ParseError::Overflow)
    })
}
