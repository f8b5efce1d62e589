//! Field-level encoding and decoding.
//!
//! Encoding is a lossy, fixed-width projection: content longer than the
//! field is cut, shorter content is padded, and everything written is
//! uppercased.

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::model::{FieldRange, Value, ValueKind};

// =============================================================================
// ENCODING
// =============================================================================

/// Formats `value` for a field of `width` bytes, before truncation.
///
/// Numbers come back zero-padded on the left to at least `width`; text and
/// custom content come back as-is, to be space-padded on the right by
/// [`write_field`].
pub fn format_value<'a>(value: &'a Value<'_>, width: usize) -> Cow<'a, [u8]> {
    match value {
        Value::Text(text) => Cow::Borrowed(text.as_bytes()),
        Value::Custom(data) => Cow::Borrowed(data.as_ref()),
        Value::Boolean(b) => {
            let digit = if *b { "1" } else { "0" };
            Cow::Owned(format!("{digit:0>width$}").into_bytes())
        }
        // no sign is ever written
        Value::SignedInt(v) => Cow::Owned(format!("{:0width$}", v.unsigned_abs()).into_bytes()),
        Value::UnsignedInt(v) => Cow::Owned(format!("{v:0width$}").into_bytes()),
        Value::Decimal(v) => {
            // drop the decimal point and fill its place with a leading zero
            let formatted = format!("{v:0width$.2}").replace('.', "");
            Cow::Owned(format!("0{formatted}").into_bytes())
        }
    }
}

/// Writes `value` into `line[range]`.
///
/// The content is uppercased, cut to the range length (never splitting a
/// UTF-8 character) and space-filled to the end of the range.
pub fn write_field(line: &mut [u8], range: FieldRange, value: &Value<'_>) {
    let width = range.len();
    let content = format_value(value, width);
    let slot = &mut line[range.as_range()];

    let (upper, len) = match std::str::from_utf8(&content) {
        Ok(text) => {
            let upper = text.to_uppercase();
            let mut len = upper.len().min(width);
            while !upper.is_char_boundary(len) {
                len -= 1;
            }
            (upper.into_bytes(), len)
        }
        Err(_) => {
            let upper = content.to_ascii_uppercase();
            let len = upper.len().min(width);
            (upper, len)
        }
    };

    slot[..len].copy_from_slice(&upper[..len]);
    slot[len..].fill(b' ');
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes the raw bytes of one field as `kind`.
///
/// Built-in kinds are trimmed of surrounding whitespace first; custom fields
/// receive the raw bytes untouched. Text that is not valid UTF-8 (a Latin-1
/// file, say) is decoded lossily with U+FFFD in place of the invalid bytes;
/// use a custom field to keep those bytes.
pub fn decode_value(kind: ValueKind, raw: &[u8]) -> Result<Value<'_>> {
    match kind {
        ValueKind::Custom => Ok(Value::Custom(Cow::Borrowed(raw))),
        ValueKind::Text => Ok(Value::Text(match String::from_utf8_lossy(raw) {
            Cow::Borrowed(text) => Cow::Borrowed(text.trim()),
            Cow::Owned(text) => Cow::Owned(text.trim().to_string()),
        })),
        ValueKind::Boolean => Ok(Value::Boolean(trimmed(raw)?.parse::<i64>()? != 0)),
        ValueKind::SignedInt => Ok(Value::SignedInt(trimmed(raw)?.parse()?)),
        ValueKind::UnsignedInt => Ok(Value::UnsignedInt(trimmed(raw)?.parse()?)),
        ValueKind::Decimal => Ok(Value::Decimal(parse_decimal(trimmed(raw)?)?)),
    }
}

fn trimmed(raw: &[u8]) -> Result<&str> {
    std::str::from_utf8(raw)
        .map(str::trim)
        .map_err(|_| Error::InvalidUtf8)
}

/// Parses a decimal with two implied fractional digits.
///
/// The point goes back two digits from the right; inputs of two characters
/// or fewer are read as `0.<text>`.
fn parse_decimal(text: &str) -> Result<f64> {
    let number = if text.len() > 2 && text.is_char_boundary(text.len() - 2) {
        let (int, frac) = text.split_at(text.len() - 2);
        format!("{int}.{frac}")
    } else {
        format!("0.{text}")
    };
    Ok(number.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: Value<'_>, width: usize) -> String {
        let mut line = vec![b'#'; width];
        write_field(
            &mut line,
            FieldRange {
                begin: 0,
                end: width,
            },
            &value,
        );
        String::from_utf8(line).unwrap()
    }

    #[test]
    fn test_encode_int() {
        assert_eq!(encode(Value::SignedInt(123), 20), "00000000000000000123");
        assert_eq!(encode(Value::UnsignedInt(445), 10), "0000000445");
    }

    #[test]
    fn test_encode_negative_int_has_no_sign() {
        assert_eq!(encode(Value::SignedInt(-12), 5), "00012");
    }

    #[test]
    fn test_encode_int_too_long_keeps_leading_digits() {
        assert_eq!(encode(Value::UnsignedInt(123456), 4), "1234");
    }

    #[test]
    fn test_encode_text() {
        let value = Value::Text("This is a text".into());
        assert_eq!(encode(value, 30), format!("{:<30}", "THIS IS A TEXT"));
    }

    #[test]
    fn test_encode_text_truncates() {
        let value = Value::Text(
            "This is a test with a long text to check if the strip is working well".into(),
        );
        assert_eq!(encode(value, 30), "THIS IS A TEST WITH A LONG TEX");
    }

    #[test]
    fn test_encode_text_multibyte_boundary() {
        // "ção" uppercases to "ÇÃO": two 2-byte characters then 'O'
        let value = Value::Text("ção".into());
        assert_eq!(encode(value, 3), "Ç ");
        assert_eq!(encode(Value::Text("ção".into()), 5), "ÇÃO");
    }

    #[test]
    fn test_encode_bool() {
        assert_eq!(encode(Value::Boolean(true), 1), "1");
        assert_eq!(encode(Value::Boolean(false), 9), "000000000");
        assert_eq!(encode(Value::Boolean(true), 4), "0001");
    }

    #[test]
    fn test_encode_decimal() {
        assert_eq!(encode(Value::Decimal(50.30), 10), "0000005030");
        assert_eq!(encode(Value::Decimal(30.50), 10), "0000003050");
        assert_eq!(encode(Value::Decimal(1234.5), 15), "000000000123450");
    }

    #[test]
    fn test_encode_custom_uppercased_and_padded() {
        let value = Value::Custom(Cow::Borrowed(&b"This is a custom type test 1"[..]));
        assert_eq!(encode(value, 30), "THIS IS A CUSTOM TYPE TEST 1  ");
    }

    #[test]
    fn test_encode_custom_non_utf8() {
        let mut line = vec![b' '; 4];
        let value = Value::Custom(Cow::Borrowed(&[b'a', 0xFF, b'b', b'c', b'd'][..]));
        write_field(&mut line, FieldRange { begin: 0, end: 4 }, &value);
        assert_eq!(line, [b'A', 0xFF, b'B', b'C']);
    }

    #[test]
    fn test_write_only_touches_range() {
        let mut line = vec![b'.'; 10];
        write_field(&mut line, FieldRange { begin: 2, end: 5 }, &Value::UnsignedInt(7));
        assert_eq!(line, b"..007.....");
    }

    #[test]
    fn test_decode_text_trims() {
        let value = decode_value(ValueKind::Text, b"  HELLO WORLD    ").unwrap();
        assert_eq!(value, Value::Text("HELLO WORLD".into()));
    }

    #[test]
    fn test_decode_bool() {
        assert_eq!(decode_value(ValueKind::Boolean, b"1").unwrap(), Value::Boolean(true));
        assert_eq!(
            decode_value(ValueKind::Boolean, b"000000000").unwrap(),
            Value::Boolean(false)
        );
        assert_eq!(decode_value(ValueKind::Boolean, b"0002").unwrap(), Value::Boolean(true));
        assert!(matches!(
            decode_value(ValueKind::Boolean, b"X"),
            Err(Error::ParseInt(_))
        ));
    }

    #[test]
    fn test_decode_ints() {
        assert_eq!(
            decode_value(ValueKind::SignedInt, b"00000000000000000123").unwrap(),
            Value::SignedInt(123)
        );
        assert_eq!(
            decode_value(ValueKind::UnsignedInt, b"0000000445").unwrap(),
            Value::UnsignedInt(445)
        );
        assert!(matches!(
            decode_value(ValueKind::UnsignedInt, b"    "),
            Err(Error::ParseInt(_))
        ));
        assert!(matches!(
            decode_value(ValueKind::UnsignedInt, b"-1"),
            Err(Error::ParseInt(_))
        ));
    }

    #[test]
    fn test_decode_decimal() {
        assert_eq!(
            decode_value(ValueKind::Decimal, b"0000005030").unwrap(),
            Value::Decimal(50.30)
        );
        assert_eq!(
            decode_value(ValueKind::Decimal, b"000000000123450").unwrap(),
            Value::Decimal(1234.5)
        );
    }

    #[test]
    fn test_decode_decimal_short_digits() {
        assert_eq!(decode_value(ValueKind::Decimal, b"  05").unwrap(), Value::Decimal(0.05));
        assert_eq!(decode_value(ValueKind::Decimal, b"   5").unwrap(), Value::Decimal(0.5));
        assert!(matches!(
            decode_value(ValueKind::Decimal, b"12A45"),
            Err(Error::ParseFloat(_))
        ));
    }

    #[test]
    fn test_decode_custom_untrimmed() {
        let value = decode_value(ValueKind::Custom, b" ABC  ").unwrap();
        assert_eq!(value, Value::Custom(Cow::Borrowed(&b" ABC  "[..])));
    }

    #[test]
    fn test_decode_text_invalid_utf8_is_lossy() {
        let value = decode_value(ValueKind::Text, b" JO\xC3O 007 ").unwrap();
        assert_eq!(value, Value::Text("JO\u{FFFD}O 007".into()));
    }

    #[test]
    fn test_decode_number_invalid_utf8() {
        assert!(matches!(
            decode_value(ValueKind::UnsignedInt, &[0xFF, 0xFE]),
            Err(Error::InvalidUtf8)
        ));
    }
}
