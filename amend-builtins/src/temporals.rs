//! Temporal coercions: dates, times, date-times, and temporal offsets.
//!
//! Text parses against the ISO-8601 shapes only; locale formats are a
//! caller concern. Range windows over temporals are the shared
//! [`Bounds`](crate::Bounds) amendment, not anything here.

use amend_engine::{Amendment, Check, Correction};
use amend_types::Value;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use tracing::debug;

fn fallback_or_uncorrectable<T>(
    identity: &'static str,
    fallback: &Option<T>,
    value: &Value,
    target: &str,
) -> Correction
where
    T: Clone + Into<Value>,
{
    match fallback {
        Some(fallback) => {
            debug!(identity, "cast failed, substituting fallback");
            Correction::amended(fallback.clone())
        }
        None => Correction::uncorrectable(format!("cannot cast {value:?} to {target}")),
    }
}

/// Coerce date-times and ISO-8601 text (`YYYY-MM-DD`) into a date.
#[derive(Debug, Clone, Default)]
pub struct CoerceToDate {
    pub fallback: Option<NaiveDate>,
}

impl CoerceToDate {
    const IDENTITY: &'static str = "coerce-date";

    fn cast(value: &Value) -> Option<NaiveDate> {
        match value {
            Value::DateTime(dt) => Some(dt.date()),
            Value::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
            _ => None,
        }
    }
}

impl Amendment for CoerceToDate {
    fn identity(&self) -> &'static str {
        Self::IDENTITY
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Date(_) => Check::Conforms,
            Value::DateTime(_) | Value::Text(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        if let Some(date) = Self::cast(&value) {
            return Ok(Correction::amended(date));
        }
        Ok(fallback_or_uncorrectable(
            Self::IDENTITY,
            &self.fallback,
            &value,
            "a date",
        ))
    }
}

/// Coerce date-times and ISO-8601 text (`HH:MM:SS[.frac]`) into a time.
#[derive(Debug, Clone, Default)]
pub struct CoerceToTime {
    pub fallback: Option<NaiveTime>,
}

impl CoerceToTime {
    const IDENTITY: &'static str = "coerce-time";

    fn cast(value: &Value) -> Option<NaiveTime> {
        match value {
            Value::DateTime(dt) => Some(dt.time()),
            Value::Text(s) => NaiveTime::parse_from_str(s.trim(), "%H:%M:%S%.f").ok(),
            _ => None,
        }
    }
}

impl Amendment for CoerceToTime {
    fn identity(&self) -> &'static str {
        Self::IDENTITY
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Time(_) => Check::Conforms,
            Value::DateTime(_) | Value::Text(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        if let Some(time) = Self::cast(&value) {
            return Ok(Correction::amended(time));
        }
        Ok(fallback_or_uncorrectable(
            Self::IDENTITY,
            &self.fallback,
            &value,
            "a time",
        ))
    }
}

/// Coerce dates (widened to midnight) and ISO-8601 text into a date-time.
///
/// Text accepts both the `T` and the space separator, with an optional
/// fractional-second tail.
#[derive(Debug, Clone, Default)]
pub struct CoerceToDateTime {
    pub fallback: Option<NaiveDateTime>,
}

impl CoerceToDateTime {
    const IDENTITY: &'static str = "coerce-date-time";

    fn cast(value: &Value) -> Option<NaiveDateTime> {
        match value {
            Value::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            Value::Text(s) => {
                let s = s.trim();
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                    .ok()
            }
            _ => None,
        }
    }
}

impl Amendment for CoerceToDateTime {
    fn identity(&self) -> &'static str {
        Self::IDENTITY
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::DateTime(_) => Check::Conforms,
            Value::Date(_) | Value::Text(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        if let Some(dt) = Self::cast(&value) {
            return Ok(Correction::amended(dt));
        }
        Ok(fallback_or_uncorrectable(
            Self::IDENTITY,
            &self.fallback,
            &value,
            "a date-time",
        ))
    }
}

/// Coerce seconds (integer or finite real) and `[-]HH:MM:SS[.frac]` text
/// into a temporal offset.
#[derive(Debug, Clone, Default)]
pub struct CoerceToOffset {
    pub fallback: Option<TimeDelta>,
}

impl CoerceToOffset {
    const IDENTITY: &'static str = "coerce-offset";

    fn cast(value: &Value) -> Option<TimeDelta> {
        match value {
            Value::Int(secs) => TimeDelta::try_seconds(*secs),
            Value::Real(secs) => real_seconds_to_delta(*secs),
            Value::Text(s) => parse_clock_offset(s.trim()),
            _ => None,
        }
    }
}

impl Amendment for CoerceToOffset {
    fn identity(&self) -> &'static str {
        Self::IDENTITY
    }

    fn check(&self, value: &Value) -> Check {
        match value {
            Value::Offset(_) => Check::Conforms,
            Value::Int(_) | Value::Real(_) | Value::Text(_) => Check::Amendable,
            _ => Check::Unsupported,
        }
    }

    fn correct(&self, value: Value) -> anyhow::Result<Correction> {
        if let Some(delta) = Self::cast(&value) {
            return Ok(Correction::amended(delta));
        }
        Ok(fallback_or_uncorrectable(
            Self::IDENTITY,
            &self.fallback,
            &value,
            "a temporal offset",
        ))
    }
}

fn real_seconds_to_delta(secs: f64) -> Option<TimeDelta> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.trunc();
    if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return None;
    }
    let nanos = (secs.fract() * 1e9).round() as i64;
    TimeDelta::try_seconds(whole as i64)
        .and_then(|base| base.checked_add(&TimeDelta::nanoseconds(nanos)))
}

/// Parse `[-]HH:MM:SS[.frac]`. Hours are unbounded; minutes and seconds are
/// clock digits.
fn parse_clock_offset(text: &str) -> Option<TimeDelta> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let mut parts = body.split(':');
    let (hours, minutes, seconds) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let hours: i64 = hours.parse().ok()?;
    if hours < 0 {
        return None;
    }
    let minutes: i64 = minutes.parse().ok()?;
    if !(0..60).contains(&minutes) {
        return None;
    }

    let (secs_text, nanos) = match seconds.split_once('.') {
        None => (seconds, 0i64),
        Some((whole, frac)) => {
            if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let scale = 10u32.pow(9 - frac.len() as u32);
            let frac: i64 = frac.parse().ok()?;
            (whole, frac * i64::from(scale))
        }
    };
    let seconds: i64 = secs_text.parse().ok()?;
    if !(0..60).contains(&seconds) {
        return None;
    }

    let total_seconds = hours.checked_mul(3600)?.checked_add(minutes * 60 + seconds)?;
    let magnitude = TimeDelta::try_seconds(total_seconds)?
        .checked_add(&TimeDelta::nanoseconds(nanos))?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use amend_engine::apply;
    use amend_types::AmendOutcome;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn run(amendment: impl Amendment + 'static, value: Value) -> AmendOutcome {
        apply(&[Arc::new(amendment)], value).expect("apply")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn iso_text_parses_to_date() {
        let outcome = run(CoerceToDate::default(), Value::from(" 2024-02-29 "));
        assert!(outcome.conforms);
        assert_eq!(outcome.value, Value::Date(date(2024, 2, 29)));
    }

    #[test]
    fn impossible_dates_are_uncorrectable() {
        let outcome = run(CoerceToDate::default(), Value::from("2023-02-29"));
        assert!(!outcome.conforms);
        assert!(outcome.reason.expect("reason").kind.is_uncorrectable());
    }

    #[test]
    fn date_time_narrows_to_its_date_and_time() {
        let dt = date(2024, 6, 1).and_hms_opt(13, 30, 5).expect("valid time");

        assert_eq!(
            run(CoerceToDate::default(), Value::DateTime(dt)).value,
            Value::Date(date(2024, 6, 1))
        );
        assert_eq!(
            run(CoerceToTime::default(), Value::DateTime(dt)).value,
            Value::Time(NaiveTime::from_hms_opt(13, 30, 5).expect("valid time"))
        );
    }

    #[test]
    fn date_widens_to_midnight() {
        let outcome = run(CoerceToDateTime::default(), Value::Date(date(2024, 6, 1)));
        assert_eq!(
            outcome.value,
            Value::DateTime(date(2024, 6, 1).and_time(NaiveTime::MIN))
        );
    }

    #[test]
    fn date_time_text_accepts_both_separators() {
        let expected = Value::DateTime(
            date(2024, 6, 1).and_hms_opt(13, 30, 5).expect("valid time"),
        );
        assert_eq!(
            run(CoerceToDateTime::default(), Value::from("2024-06-01T13:30:05")).value,
            expected
        );
        assert_eq!(
            run(CoerceToDateTime::default(), Value::from("2024-06-01 13:30:05")).value,
            expected
        );
    }

    #[test]
    fn fractional_seconds_survive_time_parsing() {
        let outcome = run(CoerceToTime::default(), Value::from("01:02:03.250"));
        let expected =
            NaiveTime::from_hms_milli_opt(1, 2, 3, 250).expect("valid time");
        assert_eq!(outcome.value, Value::Time(expected));
    }

    #[test]
    fn integer_seconds_become_an_offset() {
        let outcome = run(CoerceToOffset::default(), Value::Int(90));
        assert_eq!(outcome.value, Value::Offset(TimeDelta::seconds(90)));
    }

    #[test]
    fn real_seconds_keep_their_fraction() {
        let outcome = run(CoerceToOffset::default(), Value::Real(1.5));
        assert_eq!(
            outcome.value,
            Value::Offset(TimeDelta::milliseconds(1500))
        );

        assert!(!run(CoerceToOffset::default(), Value::Real(f64::NAN)).conforms);
    }

    #[test]
    fn clock_text_parses_with_sign_and_fraction() {
        assert_eq!(
            run(CoerceToOffset::default(), Value::from("01:30:00")).value,
            Value::Offset(TimeDelta::seconds(5400))
        );
        assert_eq!(
            run(CoerceToOffset::default(), Value::from("-00:00:01.5")).value,
            Value::Offset(TimeDelta::milliseconds(-1500))
        );
    }

    #[test]
    fn malformed_clock_text_is_uncorrectable() {
        for bad in ["1:99:00", "01:00", "xx:00:00", "00:00:61", "00:00:00.0000000001"] {
            let outcome = run(CoerceToOffset::default(), Value::from(bad));
            assert!(!outcome.conforms, "{bad} should not parse");
        }
    }

    #[test]
    fn temporal_fallbacks_substitute_on_cast_failure() {
        let fallback = date(2000, 1, 1);
        let amendment = CoerceToDate {
            fallback: Some(fallback),
        };
        let outcome = run(amendment, Value::from("not a date"));
        assert!(outcome.conforms);
        assert_eq!(outcome.value, Value::Date(fallback));
    }
}
