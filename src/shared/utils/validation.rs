use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static ISO_DATE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").ok());

/// Checks over untyped JSON values coming from user files.
///
/// Every rule treats missing keys, `null` and blank strings the same way,
/// so callers only need `is_absent` to decide between "required" and
/// "malformed" messages.
pub struct ValueChecks;

impl ValueChecks {
    pub fn is_absent(value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Finite number from a JSON number or a numeric string
    pub fn as_finite_number(value: &Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        number.is_finite().then_some(number)
    }

    /// Whole number representable as `i64`
    pub fn as_integer(value: &Value) -> Option<i64> {
        if let Value::Number(n) = value {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
        }
        let number = Self::as_finite_number(value)?;
        if number.fract() != 0.0 || number < i64::MIN as f64 || number >= i64::MAX as f64 {
            return None;
        }
        Some(number as i64)
    }

    pub fn non_empty_str(value: &Value) -> Option<&str> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Strict `YYYY-MM-DD` calendar date, surrounding blanks ignored;
    /// rollovers such as `2023-02-30` are rejected
    pub fn strict_iso_date(value: &Value) -> Option<NaiveDate> {
        let text = value.as_str()?.trim();
        let caps = ISO_DATE.as_ref()?.captures(text)?;
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}
