use crate::Value;
use std::fmt::Write;
use time::{Date, PrimitiveDateTime, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($out:ident, $value:expr) => {{
        let mut buffer = ryu::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

/// Inline `vars` into the `?` placeholders of `sql`, for logging purposes only.
///
/// Strings are wrapped in `escaper` with inner occurrences doubled. Placeholders
/// without a matching variable are left untouched.
pub fn explain_sql(sql: &str, escaper: &str, vars: &[Value]) -> String {
    let mut out = String::with_capacity(sql.len() + vars.len() * 8);
    let mut vars = vars.iter();
    for c in sql.chars() {
        if c == '?' {
            if let Some(value) = vars.next() {
                write_value(&mut out, escaper, value);
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn write_string(out: &mut String, escaper: &str, value: &str) {
    out.push_str(escaper);
    let mut position = 0;
    for (i, _) in value.match_indices(escaper) {
        out.push_str(&value[position..i]);
        out.push_str(escaper);
        out.push_str(escaper);
        position = i + escaper.len();
    }
    out.push_str(&value[position..]);
    out.push_str(escaper);
}

fn write_date(out: &mut String, value: &Date) {
    let _ = write!(
        out,
        "{:04}-{:02}-{:02}",
        value.year(),
        value.month() as u8,
        value.day()
    );
}

/// Milliseconds are written only when not zero, trailing zeros trimmed.
fn write_time(out: &mut String, value: &Time) {
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        value.hour(),
        value.minute(),
        value.second()
    );
    let mut millis = value.millisecond();
    if millis > 0 {
        let mut width = 3;
        while millis % 10 == 0 {
            millis /= 10;
            width -= 1;
        }
        let _ = write!(out, ".{:0width$}", millis);
    }
}

fn write_timestamp(out: &mut String, escaper: &str, value: &PrimitiveDateTime) {
    out.push_str(escaper);
    write_date(out, &value.date());
    out.push(' ');
    write_time(out, &value.time());
    out.push_str(escaper);
}

fn write_value(out: &mut String, escaper: &str, value: &Value) {
    match value {
        v if v.is_null() => out.push_str("NULL"),
        Value::Boolean(Some(v)) => out.push_str(["false", "true"][*v as usize]),
        Value::Int8(Some(v)) => write_integer!(out, *v),
        Value::Int16(Some(v)) => write_integer!(out, *v),
        Value::Int32(Some(v)) => write_integer!(out, *v),
        Value::Int64(Some(v)) => write_integer!(out, *v),
        Value::UInt8(Some(v)) => write_integer!(out, *v),
        Value::UInt16(Some(v)) => write_integer!(out, *v),
        Value::UInt32(Some(v)) => write_integer!(out, *v),
        Value::UInt64(Some(v)) => write_integer!(out, *v),
        Value::Float32(Some(v)) => write_float!(out, *v),
        Value::Float64(Some(v)) => write_float!(out, *v),
        Value::Decimal(Some(v)) => {
            let _ = write!(out, "{}", v);
        }
        Value::Varchar(Some(v)) => write_string(out, escaper, v),
        Value::Blob(Some(v)) => match std::str::from_utf8(v) {
            Ok(text) if text.chars().all(|c| !c.is_control() || c.is_whitespace()) => {
                write_string(out, escaper, text)
            }
            _ => {
                out.push_str("0x");
                out.push_str(&hex::encode_upper(v));
            }
        },
        Value::Date(Some(v)) => {
            out.push_str(escaper);
            write_date(out, v);
            out.push_str(escaper);
        }
        Value::Time(Some(v)) => {
            out.push_str(escaper);
            write_time(out, v);
            out.push_str(escaper);
        }
        Value::Timestamp(Some(v)) => write_timestamp(out, escaper, v),
        Value::TimestampWithTimezone(Some(v)) => {
            let v = v.to_utc();
            write_timestamp(out, escaper, &PrimitiveDateTime::new(v.date(), v.time()));
        }
        Value::Uuid(Some(v)) => {
            out.push_str(escaper);
            let _ = write!(out, "{}", v);
            out.push_str(escaper);
        }
        Value::List(Some(values)) => {
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, escaper, v);
            }
        }
        _ => log::error!("Cannot explain {:?}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::explain_sql;
    use crate::Value;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use time::macros::{date, datetime};

    #[test]
    fn inline_values() {
        let sql = explain_sql(
            "SELECT * FROM T WHERE A = ? AND B = ? AND C IN (?) AND D = ?",
            "'",
            &[
                "it's".into(),
                Value::Null,
                vec![1_i64, 2].into(),
                Decimal::from_str("1.50").expect("decimal").into(),
            ],
        );
        assert_eq!(
            sql,
            "SELECT * FROM T WHERE A = 'it''s' AND B = NULL AND C IN (1,2) AND D = 1.50"
        );
    }

    #[test]
    fn times_and_blobs() {
        let sql = explain_sql(
            "? ? ? ? ?",
            "'",
            &[
                datetime!(2024-03-01 10:20:30.120).into(),
                datetime!(2024-03-01 10:20:30).into(),
                date!(2024 - 03 - 01).into(),
                Value::Blob(Some(b"text".to_vec().into())),
                Value::Blob(Some(vec![0, 255, 16].into())),
            ],
        );
        assert_eq!(
            sql,
            "'2024-03-01 10:20:30.12' '2024-03-01 10:20:30' '2024-03-01' 'text' 0x00FF10"
        );
    }

    #[test]
    fn missing_variables() {
        assert_eq!(explain_sql("? ?", "\"", &[true.into()]), "true ?");
    }
}
