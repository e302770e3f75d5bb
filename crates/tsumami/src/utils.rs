//! String helpers and argument resolution

use serde_json::Value;
use tsumami_dom::Element;

pub use tsumami_dom::to_camel_case;

/// A value, or a function computing it from an element and its index in
/// the set being processed.
///
/// ```ignore
/// nodes.set_attr("title", "fixed");
/// nodes.set_attr("title", |el: &Element, i: usize| format!("{}-{i}", el.tag_name()));
/// ```
pub trait Resolve<T> {
    fn resolve(&self, element: &Element, index: usize) -> T;
}

impl Resolve<String> for &str {
    fn resolve(&self, _: &Element, _: usize) -> String {
        (*self).to_string()
    }
}

impl Resolve<String> for String {
    fn resolve(&self, _: &Element, _: usize) -> String {
        self.clone()
    }
}

impl Resolve<Option<bool>> for bool {
    fn resolve(&self, _: &Element, _: usize) -> Option<bool> {
        Some(*self)
    }
}

impl Resolve<Option<bool>> for Option<bool> {
    fn resolve(&self, _: &Element, _: usize) -> Option<bool> {
        *self
    }
}

impl<F, T> Resolve<T> for F
where
    F: Fn(&Element, usize) -> T,
{
    fn resolve(&self, element: &Element, index: usize) -> T {
        self(element, index)
    }
}

/// Byte length of the longest decimal number literal at the start of `s`:
/// `[+-]? (digits ('.' digits?)? | '.' digits) ([eE] [+-]? digits)?`
fn decimal_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_digits = digits(i);
    i += int_digits;

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = digits(i + 1);
        if int_digits > 0 || frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = digits(j);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }
    i
}

fn signed_infinity(s: &str) -> Option<(f64, usize)> {
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    rest.starts_with("Infinity")
        .then(|| (sign * f64::INFINITY, s.len() - rest.len() + "Infinity".len()))
}

/// Whole-string numeric conversion: surrounding whitespace is ignored, an
/// empty string is zero and `0x`/`0o`/`0b` integers are accepted.
fn to_number(value: &str) -> Option<f64> {
    let t = value.trim();
    if t.is_empty() {
        return Some(0.0);
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(body) = t.strip_prefix(prefix) {
            return u64::from_str_radix(body, radix).ok().map(|n| n as f64);
        }
    }

    if let Some((inf, len)) = signed_infinity(t) {
        return (len == t.len()).then_some(inf);
    }
    if decimal_prefix_len(t) == t.len() {
        t.parse().ok()
    } else {
        None
    }
}

/// Leading-number conversion: parses the longest numeric prefix and ignores
/// the rest.
fn parse_float(value: &str) -> Option<f64> {
    let t = value.trim_start();
    if let Some((inf, _)) = signed_infinity(t) {
        return Some(inf);
    }
    match decimal_prefix_len(t) {
        0 => None,
        len => t[..len].parse().ok(),
    }
}

/// True if `value` reads as a finite number both as a whole and by its
/// leading number. `"12"`, `" -1.5e3 "` and `"0x1A"` are numeric; `""`,
/// `"12px"` and `"Infinity"` are not.
pub fn is_numeric(value: &str) -> bool {
    match (to_number(value), parse_float(value)) {
        (Some(whole), Some(leading)) => !(whole - leading).is_nan(),
        _ => false,
    }
}

/// Parse a string as boolean, number or JSON, falling back to the trimmed
/// string itself
pub fn parse_string(value: &str) -> Value {
    let v = value.trim();

    match v {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if is_numeric(v) {
        if let Some(n) = parse_float(v) {
            return number(n);
        }
    }

    serde_json::from_str(v).unwrap_or_else(|_| Value::String(v.to_string()))
}

/// Integral values become JSON integers so they deserialize into integer types
fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}
