//! Record encoding/decoding: one record per fixed-width line.
//!
//! Neither direction is transactional. On the first field error the call
//! stops, but fields already written to the line (encode) or assigned to the
//! record (decode) stay as they are.

use tracing::trace;

use crate::codec::field::{decode_value, write_field};
use crate::error::{Error, Result};
use crate::model::{FieldRange, Layout, Record};

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes `record` into a new line of `line_width` bytes.
pub fn encode_record<R: Record>(record: &R, line_width: usize) -> Result<Vec<u8>> {
    let mut line = vec![b' '; line_width];
    encode_record_into(record, &mut line)?;
    Ok(line)
}

/// Encodes `record` into `line`, whose length is the line width.
///
/// Bytes not covered by any field are left untouched. On error, fields
/// encoded before the failing one remain written.
pub fn encode_record_into<R: Record>(record: &R, line: &mut [u8]) -> Result<()> {
    encode_with_layout(R::layout(), record, line)
}

/// Encodes `record` with an explicit layout.
pub fn encode_with_layout<R>(layout: &Layout<R>, record: &R, line: &mut [u8]) -> Result<()> {
    let line_width = line.len();
    for field in layout.fields() {
        let range = match FieldRange::parse(field.tag(), line_width) {
            Ok(Some(range)) if !range.is_empty() => range,
            Ok(_) => continue,
            Err(e) => return Err(e.in_field(field.name())),
        };
        let value = field.get(record).map_err(|e| e.in_field(field.name()))?;
        write_field(line, range, &value);
    }
    trace!(line_width, fields = layout.len(), "encoded record line");
    Ok(())
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes `data` into `record`.
///
/// Ranges are validated against `data.len()`. Read-only fields are skipped.
/// On error, fields decoded before the failing one remain assigned.
pub fn decode_record<R: Record>(data: &[u8], record: &mut R) -> Result<()> {
    decode_with_layout(R::layout(), data, record)
}

/// Decodes `data` into `record` with an explicit layout.
pub fn decode_with_layout<R>(layout: &Layout<R>, data: &[u8], record: &mut R) -> Result<()> {
    for field in layout.fields() {
        let range = match FieldRange::parse(field.tag(), data.len()) {
            Ok(Some(range)) if !range.is_empty() => range,
            Ok(_) => continue,
            Err(e) => return Err(e.in_field(field.name())),
        };
        if !field.is_writable() {
            continue;
        }

        let raw = &data[range.as_range()];
        decode_value(field.kind(), raw)
            .and_then(|value| field.set(record, value))
            .map_err(|e: Error| e.in_unmarshal(field.name(), raw))?;
    }
    trace!(len = data.len(), fields = layout.len(), "decoded record line");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Line {
        number: i32,
        name: String,
        amount: f64,
        count: u16,
        active: bool,
        hidden: String,
    }

    impl Record for Line {
        fn layout() -> &'static Layout<Self> {
            lazy_static! {
                static ref LAYOUT: Layout<Line> = Layout::<Line>::builder()
                    .field("number", "0,5", |r| &r.number, |r| &mut r.number)
                    .field("name", "5,15", |r| &r.name, |r| &mut r.name)
                    .field("amount", "15,25", |r| &r.amount, |r| &mut r.amount)
                    .field("count", "25,28", |r| &r.count, |r| &mut r.count)
                    .field("active", "28,29", |r| &r.active, |r| &mut r.active)
                    .field("hidden", "29,35", |r| &r.hidden, |r| &mut r.hidden)
                    .read_only()
                    .build();
            }
            &LAYOUT
        }
    }

    fn sample() -> Line {
        Line {
            number: 42,
            name: "Maria".to_string(),
            amount: 50.30,
            count: 7,
            active: true,
            hidden: "secret".to_string(),
        }
    }

    #[test]
    fn test_encode_line() {
        let line = encode_record(&sample(), 40).unwrap();
        assert_eq!(line.len(), 40);
        assert_eq!(line, b"00042MARIA     00000050300071SECRET     ");
    }

    #[test]
    fn test_decode_line() {
        let mut decoded = Line::default();
        decode_record(b"00042MARIA     00000050300071SECRET     ", &mut decoded).unwrap();
        assert_eq!(
            decoded,
            Line {
                name: "MARIA".to_string(),
                hidden: String::new(),
                ..sample()
            }
        );
    }

    #[test]
    fn test_encode_into_keeps_uncovered_bytes() {
        let mut line = vec![b'*'; 40];
        encode_record_into(&sample(), &mut line).unwrap();
        assert_eq!(&line[35..], b"*****");
    }

    #[derive(Debug, Default)]
    struct Broken {
        first: u32,
        second: u32,
    }

    fn broken_layout(second_tag: &'static str) -> Layout<Broken> {
        Layout::<Broken>::builder()
            .field("first", "0,3", |r| &r.first, |r| &mut r.first)
            .field("second", second_tag, |r| &r.second, |r| &mut r.second)
            .build()
    }

    #[test]
    fn test_encode_is_not_transactional() {
        let layout = broken_layout("3,11");
        let record = Broken { first: 9, second: 1 };
        let mut line = vec![b' '; 10];

        let err = encode_with_layout(&layout, &record, &mut line).unwrap_err();
        assert!(matches!(
            err,
            Error::Field { field: "second", ref source } if matches!(**source, Error::InvalidRange)
        ));
        assert_eq!(&line[..3], b"009");
    }

    #[test]
    fn test_decode_is_not_transactional() {
        let layout = broken_layout("3,6");
        let mut record = Broken::default();

        let err = decode_with_layout(&layout, b"123ABC", &mut record).unwrap_err();
        match err {
            Error::Unmarshal { field, data, source } => {
                assert_eq!(field, "second");
                assert_eq!(data, b"ABC");
                assert!(matches!(*source, Error::ParseInt(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(record.first, 123);
    }

    #[test]
    fn test_decode_tag_error_is_field_error() {
        let layout = broken_layout("3,X");
        let mut record = Broken::default();

        let err = decode_with_layout(&layout, b"123456", &mut record).unwrap_err();
        assert_eq!(err.field(), Some("second"));
        assert!(matches!(err.cause(), Error::InvalidEndRange));
    }

    #[test]
    fn test_fields_without_range_are_skipped() {
        let layout = broken_layout("");
        let record = Broken { first: 1, second: 2 };
        let mut line = vec![b' '; 6];
        encode_with_layout(&layout, &record, &mut line).unwrap();
        assert_eq!(line, b"001   ");

        let mut decoded = Broken::default();
        decode_with_layout(&layout, b"001XXX", &mut decoded).unwrap();
        assert_eq!(decoded.second, 0);
    }

    #[test]
    fn test_zero_width_range_is_skipped() {
        let layout = broken_layout("0,0");
        let mut decoded = Broken::default();
        decode_with_layout(&layout, b"004", &mut decoded).unwrap();
        assert_eq!(decoded.first, 4);
    }
}
