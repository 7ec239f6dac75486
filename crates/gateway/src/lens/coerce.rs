//! Lenient conversions from loosely-typed backend JSON.
//!
//! The backend sends numbers as either JSON numbers or strings, and omits
//! fields freely. Numeric strings are read by their leading numeric prefix,
//! so `"12px"` is 12 and `"abc"` is 0.

use serde_json::Value;

/// String field; numbers are rendered, anything else is `""`.
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Nullable string field; empty strings collapse to `None`.
pub fn optional_text(value: &Value) -> Option<String> {
    match text(value) {
        s if s.is_empty() => None,
        s => Some(s),
    }
}

/// Boolean field; `"true"` and non-zero numbers count as set.
pub fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

/// Integer field, truncating fractions; unparseable values are 0.
pub fn int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => leading_int(s),
        _ => 0,
    }
}

/// Floating-point field; unparseable values are 0.
pub fn float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => leading_float(s),
        _ => 0.0,
    }
}

fn sign_len(s: &str) -> usize {
    usize::from(s.starts_with('+') || s.starts_with('-'))
}

fn digits_len(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Integer value of the longest `[+-]?[0-9]+` prefix after leading whitespace.
pub fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let sign = sign_len(s);
    let digits = digits_len(&s[sign..]);
    if digits == 0 {
        return 0;
    }
    let prefix = &s[..sign + digits];
    prefix.parse::<i64>().unwrap_or_else(|_| {
        // Out of range: saturate in the direction of the sign.
        if prefix.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Value of the longest decimal-float prefix after leading whitespace.
pub fn leading_float(s: &str) -> f64 {
    let s = s.trim_start();
    let mut end = sign_len(s);
    let int_digits = digits_len(&s[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if s[end..].starts_with('.') {
        frac_digits = digits_len(&s[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0.0;
    }

    if s[end..].starts_with('e') || s[end..].starts_with('E') {
        let exp = &s[end + 1..];
        let exp_sign = sign_len(exp);
        let exp_digits = digits_len(&exp[exp_sign..]);
        if exp_digits > 0 {
            end += 1 + exp_sign + exp_digits;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_handles_numbers_and_missing() {
        assert_eq!(text(&json!("Anime")), "Anime");
        assert_eq!(text(&json!(12)), "12");
        assert_eq!(text(&Value::Null), "");
        assert_eq!(text(&json!(true)), "");
    }

    #[test]
    fn optional_text_collapses_empty() {
        assert_eq!(optional_text(&json!("")), None);
        assert_eq!(optional_text(&Value::Null), None);
        assert_eq!(optional_text(&json!("a.png")), Some("a.png".into()));
    }

    #[test]
    fn flag_accepts_common_encodings() {
        assert!(flag(&json!(true)));
        assert!(flag(&json!("true")));
        assert!(flag(&json!(1)));
        assert!(!flag(&json!(0)));
        assert!(!flag(&json!("yes please")));
        assert!(!flag(&Value::Null));
    }

    #[test]
    fn int_reads_numeric_prefix() {
        assert_eq!(int(&json!("12px")), 12);
        assert_eq!(int(&json!("  -7")), -7);
        assert_eq!(int(&json!("12.9")), 12);
        assert_eq!(int(&json!("abc")), 0);
        assert_eq!(int(&json!("")), 0);
        assert_eq!(int(&json!("-")), 0);
        assert_eq!(int(&json!(40.8)), 40);
        assert_eq!(int(&json!(5)), 5);
        assert_eq!(int(&Value::Null), 0);
    }

    #[test]
    fn int_is_decimal_only() {
        assert_eq!(int(&json!("0x10")), 0);
        assert_eq!(int(&json!("010")), 10);
    }

    #[test]
    fn int_saturates_on_overflow() {
        assert_eq!(leading_int("99999999999999999999999"), i64::MAX);
        assert_eq!(leading_int("-99999999999999999999999"), i64::MIN);
    }

    #[test]
    fn float_reads_numeric_prefix() {
        assert_eq!(float(&json!("7.5")), 7.5);
        assert_eq!(float(&json!(".5x")), 0.5);
        assert_eq!(float(&json!("3.")), 3.0);
        assert_eq!(float(&json!("1e2")), 100.0);
        assert_eq!(float(&json!("2e")), 2.0);
        assert_eq!(float(&json!("-4.25cfg")), -4.25);
        assert_eq!(float(&json!(".")), 0.0);
        assert_eq!(float(&json!("nan")), 0.0);
        assert_eq!(float(&json!(6)), 6.0);
    }
}
