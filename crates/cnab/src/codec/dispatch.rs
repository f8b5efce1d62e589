//! Decoding of CNAB streams into records.
//!
//! A stream decodes into a single record, a collection of records (one per
//! line), or a [`PrefixMap`] that routes each line by its leading
//! discriminator to another target.

use std::fmt;

use tracing::{debug, trace};

use crate::codec::primitives::{Lines, is_blank_line};
use crate::codec::record::decode_record;
use crate::error::Result;
use crate::limits::LINE_BREAK;
use crate::model::Record;

/// A destination for CNAB data.
pub trait Decode {
    /// Decodes `data` into `self`.
    fn decode(&mut self, data: &[u8]) -> Result<()>;
}

impl<R: Record> Decode for R {
    fn decode(&mut self, data: &[u8]) -> Result<()> {
        decode_record(data, self)
    }
}

/// Appends one record per non-blank line. Records decoded before a failing
/// line stay in the collection.
impl<R: Record + Default> Decode for Vec<R> {
    fn decode(&mut self, data: &[u8]) -> Result<()> {
        for line in Lines::new(data).filter(|line| !is_blank_line(line)) {
            let mut record = R::default();
            decode_record(line, &mut record)?;
            self.push(record);
        }
        Ok(())
    }
}

/// Parses CNAB data and stores the result in `target`.
pub fn unmarshal<T: Decode + ?Sized>(data: &[u8], target: &mut T) -> Result<()> {
    target.decode(data)
}

/// Routes the lines of a stream to targets by byte prefix.
///
/// Every non-blank line is tested against every prefix; a line matching
/// several prefixes goes to each of them. The lines of each group keep
/// their relative order and are re-joined with the line break marker before
/// being decoded into the group's target. Targets whose prefix matched no
/// line are left untouched.
///
/// ```rust
/// # use cnab::codec::PrefixMap;
/// # fn run(data: &[u8], header: &mut impl cnab::codec::Decode, details: &mut impl cnab::codec::Decode) -> cnab::error::Result<()> {
/// let mut routes = PrefixMap::new()
///     .route("0", header)
///     .route("1", details);
/// cnab::codec::unmarshal(data, &mut routes)?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct PrefixMap<'a> {
    routes: Vec<(Vec<u8>, &'a mut dyn Decode)>,
}

impl<'a> PrefixMap<'a> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Adds a route for lines starting with `prefix`.
    pub fn route(mut self, prefix: impl AsRef<[u8]>, target: &'a mut dyn Decode) -> Self {
        self.routes.push((prefix.as_ref().to_vec(), target));
        self
    }

    /// Returns the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if there are no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Decode for PrefixMap<'_> {
    fn decode(&mut self, data: &[u8]) -> Result<()> {
        let mut groups: Vec<Vec<&[u8]>> = vec![Vec::new(); self.routes.len()];
        let mut seen = 0usize;
        let mut unmatched = 0usize;

        for line in Lines::new(data).filter(|line| !is_blank_line(line)) {
            seen += 1;
            let mut matched = false;
            for ((prefix, _), group) in self.routes.iter().zip(groups.iter_mut()) {
                if line.starts_with(prefix) {
                    group.push(line);
                    matched = true;
                }
            }
            if !matched {
                unmatched += 1;
            }
        }
        debug!(lines = seen, unmatched, routes = self.routes.len(), "dispatching cnab stream");

        for ((prefix, target), group) in self.routes.iter_mut().zip(groups) {
            if group.is_empty() {
                continue;
            }
            trace!(
                prefix = %String::from_utf8_lossy(prefix),
                lines = group.len(),
                "decoding dispatch group"
            );
            target.decode(&group.join(LINE_BREAK))?;
        }
        Ok(())
    }
}

impl fmt::Debug for PrefixMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.routes.iter().map(|(prefix, _)| String::from_utf8_lossy(prefix)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::Layout;
    use lazy_static::lazy_static;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Item {
        kind: String,
        label: String,
    }

    impl Record for Item {
        fn layout() -> &'static Layout<Self> {
            lazy_static! {
                static ref LAYOUT: Layout<Item> = Layout::<Item>::builder()
                    .field("kind", "0,2", |r| &r.kind, |r| &mut r.kind)
                    .field("label", "2,6", |r| &r.label, |r| &mut r.label)
                    .build();
            }
            &LAYOUT
        }
    }

    fn item(kind: &str, label: &str) -> Item {
        Item {
            kind: kind.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_collection_skips_blank_lines() {
        let mut items: Vec<Item> = Vec::new();
        unmarshal(b"1 AAAA\r\n\r\n1 BBBB\r\n\x1A", &mut items).unwrap();
        assert_eq!(items, [item("1", "AAAA"), item("1", "BBBB")]);
    }

    #[test]
    fn test_collection_keeps_decoded_prefix_on_error() {
        let mut items: Vec<Item> = Vec::new();
        let err = unmarshal(b"1 AAAA\r\n1 B", &mut items).unwrap_err();
        assert!(matches!(err.cause(), Error::InvalidRange));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_dispatch_by_prefix() {
        let mut header = Item::default();
        let mut details: Vec<Item> = Vec::new();
        let mut trailer = Item::default();

        let data = b"0 HEAD\r\n1 LIN1\r\n1 LIN2\r\n2 FOOT\x1A";
        let mut routes = PrefixMap::new()
            .route("0", &mut header)
            .route("1", &mut details)
            .route("2", &mut trailer);
        unmarshal(data, &mut routes).unwrap();
        drop(routes);

        assert_eq!(header, item("0", "HEAD"));
        assert_eq!(details, [item("1", "LIN1"), item("1", "LIN2")]);
        assert_eq!(trailer, item("2", "FOOT"));
    }

    #[test]
    fn test_line_matching_several_prefixes_goes_to_each() {
        let mut all: Vec<Item> = Vec::new();
        let mut ones: Vec<Item> = Vec::new();

        let mut routes = PrefixMap::new().route("", &mut all).route("1", &mut ones);
        unmarshal(b"0 HEAD\r\n1 LIN1", &mut routes).unwrap();
        drop(routes);

        assert_eq!(all.len(), 2);
        assert_eq!(ones, [item("1", "LIN1")]);
    }

    #[test]
    fn test_nested_maps() {
        let mut debits: Vec<Item> = Vec::new();
        let mut credits: Vec<Item> = Vec::new();
        let mut nested = PrefixMap::new()
            .route("1D", &mut debits)
            .route("1C", &mut credits);

        let mut routes = PrefixMap::new().route("1", &mut nested);
        unmarshal(b"0 HEAD\r\n1DAAAA\r\n1CBBBB\r\n1DCCCC", &mut routes).unwrap();
        drop(routes);
        drop(nested);

        assert_eq!(debits, [item("1D", "AAAA"), item("1D", "CCCC")]);
        assert_eq!(credits, [item("1C", "BBBB")]);
    }

    #[test]
    fn test_unmatched_targets_untouched() {
        let mut header = item("x", "keep");
        let mut details: Vec<Item> = Vec::new();

        let mut routes = PrefixMap::new()
            .route("0", &mut header)
            .route("1", &mut details);
        assert_eq!(routes.len(), 2);
        unmarshal(b"1 LIN1", &mut routes).unwrap();
        drop(routes);

        assert_eq!(header, item("x", "keep"));
        assert_eq!(details.len(), 1);
    }

    #[test]
    fn test_single_record_group_uses_first_line() {
        let mut header = Item::default();
        let mut routes = PrefixMap::new().route("0", &mut header);
        unmarshal(b"0 AAAA\r\n0 BBBB", &mut routes).unwrap();
        drop(routes);
        assert_eq!(header, item("0", "AAAA"));
    }
}
