//! Exact-decimal JSON numbers.

use std::fmt;

/// A JSON number that remembers the exact decimal text it was written with.
///
/// Binary floating point cannot represent most decimal literals, so a
/// `Number` keeps the source digit sequence and re-emits it verbatim on
/// save. Literals such as `0.30000000000000004`, or integers past 2^53,
/// survive a load/save cycle untouched. Numeric accessors interpret the
/// text on demand.
///
/// # Examples
///
/// ```
/// use json_document::Number;
///
/// let n = Number::from_literal("0.30000000000000004").unwrap();
/// assert_eq!(n.as_str(), "0.30000000000000004");
/// assert_eq!(n.to_string(), "0.30000000000000004");
/// ```
#[derive(Debug, Clone)]
pub struct Number {
    text: Box<str>,
}

impl Number {
    /// Parses a JSON number literal, keeping its exact text.
    ///
    /// Returns `None` if `text` is not a valid JSON number (RFC 8259
    /// grammar: no leading zeros, no leading `+`, no trailing dot).
    #[must_use]
    pub fn from_literal(text: &str) -> Option<Self> {
        if is_valid_literal(text) {
            Some(Self { text: text.into() })
        } else {
            None
        }
    }

    /// Converts a finite `f64`, formatting it with the shortest digit
    /// sequence that round-trips. Returns `None` for NaN and infinities,
    /// which have no JSON representation.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        value.is_finite().then(|| Self {
            text: format_f64(value).into(),
        })
    }

    /// The exact text this number was written with.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Numeric interpretation as `f64`, possibly losing precision.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.text.parse().unwrap_or(f64::NAN)
    }

    /// Numeric interpretation as `i64`, if the text is an integer in range.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.text.parse().ok()
    }

    /// Numeric interpretation as `u64`, if the text is a non-negative
    /// integer in range.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.text.parse().ok()
    }

    /// Whether the literal has no fraction or exponent part.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        !self.text.contains(['.', 'e', 'E'])
    }

    // Sign, significant digits with leading and trailing zeros stripped,
    // and the decimal exponent of the last kept digit. Every value has
    // exactly one such form; zero normalizes to `(false, "", 0)` however
    // it was written.
    fn normalized(&self) -> (bool, String, i128) {
        let text: &str = &self.text;
        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (mantissa, exponent) = match rest.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => (mantissa, parse_exponent(exponent)),
            None => (rest, 0),
        };
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let mut exponent = exponent - frac_part.len() as i128;
        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);
        while digits.ends_with('0') {
            digits.pop();
            exponent += 1;
        }
        let leading = digits.len() - digits.trim_start_matches('0').len();
        digits.drain(..leading);
        if digits.is_empty() {
            return (false, digits, 0);
        }
        (negative, digits, exponent)
    }
}

// JSON does not bound exponent length; one that overflows `i128` is
// saturated far past anything a parseable neighbor can reach.
fn parse_exponent(text: &str) -> i128 {
    text.parse().unwrap_or(if text.starts_with('-') {
        i128::MIN / 2
    } else {
        i128::MAX / 2
    })
}

/// Exact numeric equality: `1e2` equals `100`, while values that differ
/// only beyond `f64` precision stay distinct.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        if self.text == other.text {
            return true;
        }
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

macro_rules! impl_from_int_for_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(value: $t) -> Self {
                    Self { text: value.to_string().into() }
                }
            }
        )*
    };
}

impl_from_int_for_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

// Rust's `{}` for f64 prints the shortest representation that parses back
// to the same value, but bare integral floats print without a fraction
// ("1"), which is fine as JSON number text.
fn format_f64(value: f64) -> String {
    value.to_string()
}

// -? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?
fn is_valid_literal(text: &str) -> bool {
    let mut s = text.strip_prefix('-').unwrap_or(text);
    let int_len = leading_digits(s);
    if int_len == 0 || (int_len > 1 && s.starts_with('0')) {
        return false;
    }
    s = &s[int_len..];
    if let Some(rest) = s.strip_prefix('.') {
        let frac_len = leading_digits(rest);
        if frac_len == 0 {
            return false;
        }
        s = &rest[frac_len..];
    }
    if let Some(rest) = s.strip_prefix(['e', 'E']) {
        let rest = rest.strip_prefix(['+', '-']).unwrap_or(rest);
        let exp_len = leading_digits(rest);
        if exp_len == 0 {
            return false;
        }
        s = &rest[exp_len..];
    }
    s.is_empty()
}

fn leading_digits(s: &str) -> usize {
    s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len()
}
