//! Time functions.

use chrono::{Local, SecondsFormat};

use crate::error::Result;
use crate::value::Value;

use super::{arity, wrong_type, Builtin};

pub(crate) const FUNCTIONS: &[(&str, Builtin)] = &[
    ("now", now),
    ("rfc3339", rfc3339),
    ("iso8601", iso8601),
];

const ISO8601: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

fn now(args: &[Value]) -> Result<Value> {
    arity::<0>("now", args)?;
    Ok(Value::Time(Local::now()))
}

fn rfc3339(args: &[Value]) -> Result<Value> {
    let [time] = arity::<1>("rfc3339", args)?;
    let time = time
        .as_time()
        .ok_or_else(|| wrong_type("rfc3339", "time", time))?;
    Ok(Value::from(time.to_rfc3339_opts(SecondsFormat::Secs, true)))
}

fn iso8601(args: &[Value]) -> Result<Value> {
    let [time] = arity::<1>("iso8601", args)?;
    let time = time
        .as_time()
        .ok_or_else(|| wrong_type("iso8601", "time", time))?;
    Ok(Value::from(time.format(ISO8601).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn fixed() -> Value {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let time = offset.with_ymd_and_hms(2020, 5, 17, 13, 4, 5).unwrap();
        Value::Time(time.with_timezone(&Local))
    }

    #[test]
    fn test_now() {
        assert!(matches!(now(&[]).unwrap(), Value::Time(_)));
        assert!(now(&[Value::Nil]).is_err());
    }

    #[test]
    fn test_rfc3339_round_trips() {
        let formatted = rfc3339(&[fixed()]).unwrap().to_string();
        let parsed = chrono::DateTime::parse_from_rfc3339(&formatted).unwrap();
        assert_eq!(parsed.timestamp(), fixed().as_time().unwrap().timestamp());
    }

    #[test]
    fn test_iso8601_has_milliseconds() {
        let formatted = iso8601(&[fixed()]).unwrap().to_string();
        let (_, fraction) = formatted.split_once('.').unwrap();
        assert!(fraction.starts_with("000"));
        assert!(fraction.contains(':'));
    }

    #[test]
    fn test_time_required() {
        assert!(rfc3339(&[Value::from("2020")]).is_err());
        assert!(iso8601(&[Value::Nil]).is_err());
    }
}
