//! Time ranges with their raw (as typed) boundaries
//!
//! A dashboard range such as "last 6 hours" is carried twice: resolved to absolute
//! instants (`from`, `to`) and in its raw form (`now-6h`, `now`). The raw form decides
//! cacheability and forms part of the cache key; the instants drive trimming.
//!
//! # Examples
//!
//! ```rust
//! use relcache::TimeRange;
//! use chrono::{TimeDelta, TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2024, 5, 28, 12, 0, 0).unwrap();
//! let range = TimeRange::relative("now-6h", "now", now).unwrap();
//!
//! assert_eq!(range.from, now - TimeDelta::hours(6));
//! assert_eq!(range.to, now);
//! assert!(range.raw.from.is_relative_to_now());
//! ```

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::config::constants::RELATIVE_NOW;
use crate::errors::TimeRangeError;

/// A raw range boundary: either a fixed instant or an expression such as `now-1h`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTime {
    Instant(DateTime<Utc>),
    Expression(String),
}

impl RawTime {
    /// Whether the boundary is expressed relative to the current instant
    ///
    /// `now` must stand alone or be followed by an offset or rounding suffix, so
    /// `nowhere` is not relative.
    pub fn is_relative_to_now(&self) -> bool {
        match self {
            RawTime::Expression(expression) => expression
                .trim()
                .strip_prefix(RELATIVE_NOW)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(['+', '-', '/'])),
            RawTime::Instant(_) => false,
        }
    }

    /// Stable textual form used in cache keys
    ///
    /// Surrounding whitespace is not part of the key.
    pub fn descriptor(&self) -> String {
        match self {
            RawTime::Expression(expression) => expression.trim().to_owned(),
            RawTime::Instant(instant) => instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl From<&str> for RawTime {
    fn from(expression: &str) -> Self {
        RawTime::Expression(expression.to_owned())
    }
}

impl From<DateTime<Utc>> for RawTime {
    fn from(instant: DateTime<Utc>) -> Self {
        RawTime::Instant(instant)
    }
}

impl std::fmt::Display for RawTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.descriptor())
    }
}

/// Raw boundaries of a range, as entered by the user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawTimeRange {
    pub from: RawTime,
    pub to: RawTime,
}

/// A resolved time range together with its raw boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub raw: RawTimeRange,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>, raw: RawTimeRange) -> Self {
        Self { from, to, raw }
    }

    /// A range whose raw boundaries are the instants themselves
    pub fn absolute(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            raw: RawTimeRange {
                from: RawTime::Instant(from),
                to: RawTime::Instant(to),
            },
        }
    }

    /// Resolve two relative expressions against `now`
    pub fn relative(
        from_expression: &str,
        to_expression: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, TimeRangeError> {
        let from = resolve_relative(from_expression, now)?;
        let to = resolve_relative(to_expression, now)?;

        Ok(Self {
            from,
            to,
            raw: RawTimeRange {
                from: RawTime::from(from_expression),
                to: RawTime::from(to_expression),
            },
        })
    }

    /// Start of the range in epoch milliseconds
    pub fn start_millis(&self) -> i64 {
        self.from.timestamp_millis()
    }

    /// End of the range in epoch milliseconds
    pub fn end_millis(&self) -> i64 {
        self.to.timestamp_millis()
    }

    /// Length of the range
    pub fn span(&self) -> TimeDelta {
        self.to - self.from
    }
}

/// Resolve a `now[(+|-)<amount><unit>]*` expression against `now`
///
/// Supported units are `s`, `m`, `h`, `d` and `w`. Rounding suffixes such as
/// `now/d` are rejected with [`TimeRangeError::UnsupportedRounding`].
pub fn resolve_relative(
    expression: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, TimeRangeError> {
    let trimmed = expression.trim();
    let Some(mut rest) = trimmed.strip_prefix(RELATIVE_NOW) else {
        return Err(TimeRangeError::invalid_expression(
            expression,
            "expected expression to start with `now`",
        ));
    };

    if rest.contains('/') {
        return Err(TimeRangeError::UnsupportedRounding {
            expression: expression.to_owned(),
        });
    }

    let mut instant = now;
    while !rest.is_empty() {
        let negative = match rest.as_bytes()[0] {
            b'-' => true,
            b'+' => false,
            _ => {
                return Err(TimeRangeError::invalid_expression(
                    expression,
                    format!("expected `+` or `-` before {rest:?}"),
                ))
            }
        };

        let after_sign = &rest[1..];
        let digits = after_sign.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return Err(TimeRangeError::invalid_expression(
                expression,
                "expected an amount after the sign",
            ));
        }

        let amount: i64 = after_sign[..digits]
            .parse()
            .map_err(|_| out_of_range(expression))?;

        let unit_and_rest = &after_sign[digits..];
        let Some(unit) = unit_and_rest.chars().next() else {
            return Err(TimeRangeError::invalid_expression(
                expression,
                "expected a unit after the amount",
            ));
        };

        let offset = unit_offset(expression, unit, amount)?;
        let shifted = if negative {
            instant.checked_sub_signed(offset)
        } else {
            instant.checked_add_signed(offset)
        };
        instant = shifted.ok_or_else(|| out_of_range(expression))?;

        rest = &unit_and_rest[unit.len_utf8()..];
    }

    Ok(instant)
}

fn unit_offset(expression: &str, unit: char, amount: i64) -> Result<TimeDelta, TimeRangeError> {
    let offset = match unit {
        's' => TimeDelta::try_seconds(amount),
        'm' => TimeDelta::try_minutes(amount),
        'h' => TimeDelta::try_hours(amount),
        'd' => TimeDelta::try_days(amount),
        'w' => TimeDelta::try_weeks(amount),
        other => {
            return Err(TimeRangeError::invalid_expression(
                expression,
                format!("unsupported unit `{other}`"),
            ))
        }
    };

    offset.ok_or_else(|| out_of_range(expression))
}

fn out_of_range(expression: &str) -> TimeRangeError {
    TimeRangeError::OutOfRange {
        expression: expression.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 28, 21, 0, 0).unwrap()
    }

    #[test]
    fn test_resolve_now() {
        assert_eq!(resolve_relative("now", now()).unwrap(), now());
        assert_eq!(resolve_relative("  now ", now()).unwrap(), now());
    }

    #[test]
    fn test_resolve_offsets() {
        assert_eq!(
            resolve_relative("now-1h", now()).unwrap(),
            now() - TimeDelta::hours(1)
        );
        assert_eq!(
            resolve_relative("now-30m", now()).unwrap(),
            now() - TimeDelta::minutes(30)
        );
        assert_eq!(
            resolve_relative("now+2d", now()).unwrap(),
            now() + TimeDelta::days(2)
        );
        assert_eq!(
            resolve_relative("now-1w", now()).unwrap(),
            now() - TimeDelta::weeks(1)
        );
    }

    #[test]
    fn test_resolve_chained_offsets() {
        assert_eq!(
            resolve_relative("now-1d+2h-15s", now()).unwrap(),
            now() - TimeDelta::days(1) + TimeDelta::hours(2) - TimeDelta::seconds(15)
        );
    }

    #[test]
    fn test_rejects_malformed_expressions() {
        for expression in ["", "1h", "now-", "now-h", "now-5", "now*5m", "now-5x", "later"] {
            assert!(
                matches!(
                    resolve_relative(expression, now()),
                    Err(TimeRangeError::InvalidExpression { .. })
                ),
                "{expression:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_rounding() {
        assert!(matches!(
            resolve_relative("now-1d/d", now()),
            Err(TimeRangeError::UnsupportedRounding { .. })
        ));
    }

    #[test]
    fn test_rejects_overflow() {
        assert!(matches!(
            resolve_relative("now-99999999999999999999s", now()),
            Err(TimeRangeError::OutOfRange { .. })
        ));
        assert!(matches!(
            resolve_relative("now+9999999999999w", now()),
            Err(TimeRangeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_relative_range_keeps_raw_expressions() {
        let range = TimeRange::relative("now-1h", "now", now()).unwrap();

        assert_eq!(range.from, now() - TimeDelta::hours(1));
        assert_eq!(range.to, now());
        assert_eq!(range.raw.from, RawTime::from("now-1h"));
        assert_eq!(range.raw.to, RawTime::from("now"));
        assert_eq!(range.span(), TimeDelta::hours(1));
    }

    #[test]
    fn test_absolute_range_is_not_relative() {
        let range = TimeRange::absolute(now() - TimeDelta::hours(1), now());

        assert!(!range.raw.from.is_relative_to_now());
        assert_eq!(range.raw.from.descriptor(), "2024-05-28T20:00:00.000Z");
    }

    #[test]
    fn test_raw_time_deserializes_instant_or_expression() {
        let instant: RawTime = serde_json::from_str("\"2024-05-28T20:00:00Z\"").unwrap();
        assert_eq!(
            instant,
            RawTime::Instant(Utc.with_ymd_and_hms(2024, 5, 28, 20, 0, 0).unwrap())
        );

        let expression: RawTime = serde_json::from_str("\"now-6h\"").unwrap();
        assert_eq!(expression, RawTime::from("now-6h"));
        assert!(expression.is_relative_to_now());
    }

    #[test]
    fn test_only_now_prefixed_expressions_are_relative() {
        for expression in ["now", " now-1h", "now+5m", "now/d", "now-1d/d"] {
            assert!(
                RawTime::from(expression).is_relative_to_now(),
                "{expression:?} should be relative"
            );
        }
        for expression in ["nowhere", "nows", "now1h", "", "later", "1h"] {
            assert!(
                !RawTime::from(expression).is_relative_to_now(),
                "{expression:?} should not be relative"
            );
        }
    }

    #[test]
    fn test_descriptor_ignores_surrounding_whitespace() {
        assert_eq!(RawTime::from(" now-1h ").descriptor(), "now-1h");
        assert_eq!(
            RawTime::from(" now-1h").descriptor(),
            RawTime::from("now-1h").descriptor()
        );
    }

    #[test]
    fn test_millis_accessors() {
        let range = TimeRange::absolute(
            Utc.timestamp_millis_opt(1_716_854_400_000).unwrap(),
            Utc.timestamp_millis_opt(1_716_855_300_000).unwrap(),
        );

        assert_eq!(range.start_millis(), 1_716_854_400_000);
        assert_eq!(range.end_millis(), 1_716_855_300_000);
    }
}
