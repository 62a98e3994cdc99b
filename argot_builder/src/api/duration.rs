use std::time::Duration;

use thiserror::Error;

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;
// Fraction digits beyond this are below nanosecond precision for every unit.
const MAXIMUM_FRACTION_DIGITS: usize = 18;

/// Error for when a duration literal cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// The literal is malformed.
    #[error("invalid duration '{0}'")]
    Invalid(String),
    /// A number is not followed by a unit.
    #[error("missing unit in duration '{0}'")]
    MissingUnit(String),
    /// A unit is not one of `ns`, `us`, `µs`, `ms`, `s`, `m`, `h`.
    #[error("unknown unit '{unit}' in duration '{input}'")]
    UnknownUnit {
        /// The unit as written.
        unit: String,
        /// The whole literal.
        input: String,
    },
    /// The literal is below zero.
    #[error("duration '{0}' is negative")]
    Negative(String),
    /// The literal does not fit.
    #[error("duration '{0}' is out of range")]
    Overflow(String),
}

/// Parse a duration literal, as a sequence of decimal numbers each with a unit suffix (ex: `300ms`, `1.5h`, `2h45m`).
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    if rest.is_empty() {
        return Err(DurationError::Invalid(input.to_string()));
    }

    let overflow = || DurationError::Overflow(input.to_string());
    let mut total: u128 = 0;

    while !rest.is_empty() {
        let whole_length = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (whole, tail) = rest.split_at(whole_length);
        rest = tail;
        let mut fraction = "";

        if let Some(tail) = rest.strip_prefix('.') {
            let fraction_length = tail.bytes().take_while(u8::is_ascii_digit).count();
            fraction = &tail[..fraction_length];
            rest = &tail[fraction_length..];
        }

        if whole.is_empty() && fraction.is_empty() {
            return Err(DurationError::Invalid(input.to_string()));
        }

        let unit_length = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, tail) = rest.split_at(unit_length);
        rest = tail;

        let scale: u128 = match unit {
            "" => return Err(DurationError::MissingUnit(input.to_string())),
            "ns" => 1,
            "us" | "\u{00b5}s" | "\u{03bc}s" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SECOND,
            "m" => NANOS_PER_MINUTE,
            "h" => NANOS_PER_HOUR,
            _ => {
                return Err(DurationError::UnknownUnit {
                    unit: unit.to_string(),
                    input: input.to_string(),
                })
            }
        };

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;

        if !fraction.is_empty() {
            let digits = &fraction[..fraction.len().min(MAXIMUM_FRACTION_DIGITS)];
            let numerator: u128 = digits.parse().map_err(|_| overflow())?;
            let denominator = 10u128.pow(digits.len() as u32);
            nanos = nanos
                .checked_add(numerator * scale / denominator)
                .ok_or_else(overflow)?;
        }

        total = total.checked_add(nanos).ok_or_else(overflow)?;
    }

    if negative && total > 0 {
        return Err(DurationError::Negative(input.to_string()));
    }

    let seconds = u64::try_from(total / NANOS_PER_SECOND).map_err(|_| overflow())?;
    Ok(Duration::new(seconds, (total % NANOS_PER_SECOND) as u32))
}

/// Render a duration in the form accepted by [`parse_duration`] (ex: `1h30m0s`, `1.5s`, `250ms`).
pub fn format_duration(duration: &Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < 1_000 {
        return format!("{nanos}ns");
    }

    if nanos < 1_000_000 {
        return format!("{}\u{00b5}s", decimal(nanos, 1_000));
    }

    if nanos < NANOS_PER_SECOND {
        return format!("{}ms", decimal(nanos, 1_000_000));
    }

    let hours = nanos / NANOS_PER_HOUR;
    let minutes = (nanos % NANOS_PER_HOUR) / NANOS_PER_MINUTE;
    let seconds = nanos % NANOS_PER_MINUTE;
    let mut out = String::default();

    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }

    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }

    out.push_str(&decimal(seconds, NANOS_PER_SECOND));
    out.push('s');
    out
}

// `unit` must be a power of ten.
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let fraction = value % unit;

    if fraction == 0 {
        return whole.to_string();
    }

    let width = unit.to_string().len() - 1;
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", Duration::ZERO)]
    #[case("-0", Duration::ZERO)]
    #[case("5s", Duration::from_secs(5))]
    #[case("+5s", Duration::from_secs(5))]
    #[case("1.5h", Duration::from_secs(5400))]
    #[case("1h30m", Duration::from_secs(5400))]
    #[case("300ms", Duration::from_millis(300))]
    #[case(".5s", Duration::from_millis(500))]
    #[case("1.s", Duration::from_secs(1))]
    #[case("10us", Duration::from_micros(10))]
    #[case("10µs", Duration::from_micros(10))]
    #[case("7ns", Duration::from_nanos(7))]
    #[case("2h45m3.25s", Duration::from_millis(9_903_250))]
    fn parse(#[case] input: &str, #[case] expected: Duration) {
        assert_eq!(parse_duration(input).unwrap(), expected);
    }

    #[rstest]
    #[case("", DurationError::Invalid("".to_string()))]
    #[case("s", DurationError::Invalid("s".to_string()))]
    #[case(".s", DurationError::Invalid(".s".to_string()))]
    #[case("5", DurationError::MissingUnit("5".to_string()))]
    #[case("-5s", DurationError::Negative("-5s".to_string()))]
    #[case(
        "94522879700260684295381835.9999h",
        DurationError::Overflow("94522879700260684295381835.9999h".to_string())
    )]
    #[case(
        "340282366920938463463374607431768211456ns",
        DurationError::Overflow("340282366920938463463374607431768211456ns".to_string())
    )]
    fn parse_invalid(#[case] input: &str, #[case] expected: DurationError) {
        assert_eq!(parse_duration(input).unwrap_err(), expected);
    }

    #[test]
    fn parse_unknown_unit() {
        assert_matches!(
            parse_duration("3d"),
            Err(DurationError::UnknownUnit { unit, .. }) if unit == "d"
        );
    }

    #[rstest]
    #[case(Duration::ZERO, "0s")]
    #[case(Duration::from_nanos(7), "7ns")]
    #[case(Duration::from_micros(1500), "1.5ms")]
    #[case(Duration::from_micros(10), "10µs")]
    #[case(Duration::from_millis(1500), "1.5s")]
    #[case(Duration::from_secs(60 * 15), "15m0s")]
    #[case(Duration::from_secs(5400), "1h30m0s")]
    #[case(Duration::from_millis(9_903_250), "2h45m3.25s")]
    fn format(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(&duration), expected);
    }
}
