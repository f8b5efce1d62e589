//! Field range declarations.
//!
//! A field declares where it lives in the line with a tag of the form
//! `"<begin>,<end>"`: a half-open byte interval `[begin, end)`. An empty tag
//! means the field is not part of the layout.

use std::ops::Range;

use crate::error::{Error, Result};
use crate::limits::TAG_SEPARATOR;

/// A resolved half-open byte range inside a record line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldRange {
    pub begin: usize,
    pub end: usize,
}

impl FieldRange {
    /// Resolves a field tag against the width of the line it will address.
    ///
    /// Returns `Ok(None)` for an empty tag; such fields are skipped by the
    /// record codec.
    pub fn parse(tag: &str, line_width: usize) -> Result<Option<FieldRange>> {
        if tag.is_empty() {
            return Ok(None);
        }

        let mut parts = tag.split(TAG_SEPARATOR);
        let (Some(begin), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::InvalidTagFormat);
        };

        let begin: i64 = begin.parse().map_err(|_| Error::InvalidBeginRange)?;
        let end: i64 = end.parse().map_err(|_| Error::InvalidEndRange)?;

        if begin < 0 || end < begin || end > line_width as i64 {
            return Err(Error::InvalidRange);
        }

        Ok(Some(FieldRange {
            begin: begin as usize,
            end: end as usize,
        }))
    }

    /// Number of bytes covered by the range.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Returns true for a zero-width range.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// The range as a slice index.
    #[inline]
    pub fn as_range(&self) -> Range<usize> {
        self.begin..self.end
    }
}
