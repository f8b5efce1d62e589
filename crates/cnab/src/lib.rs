//! CNAB: positional codec for Brazilian fixed-width banking files.
//!
//! This crate converts records to and from CNAB 240/400/500 files, where
//! every record occupies one line of a fixed width and every field occupies
//! a fixed byte range of that line.
//!
//! # Overview
//!
//! - **Records**: types implementing [`Record`] describe their fields once,
//!   in a memoized [`Layout`]
//! - **Files**: lines joined by CRLF, closed by `0x1A` when the file is made
//!   of more than one input
//! - **Dispatch**: on decode, lines are routed to targets by their leading
//!   record type discriminator
//!
//! # Quick Start
//!
//! ```rust
//! use cnab::{Layout, PrefixMap, Record};
//! use lazy_static::lazy_static;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Header {
//!     record_type: u8,
//!     company: String,
//! }
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Payment {
//!     record_type: u8,
//!     amount: f64,
//! }
//!
//! impl Record for Header {
//!     fn layout() -> &'static Layout<Self> {
//!         lazy_static! {
//!             static ref LAYOUT: Layout<Header> = Layout::<Header>::builder()
//!                 .field("record_type", "0,1", |r| &r.record_type, |r| &mut r.record_type)
//!                 .field("company", "1,31", |r| &r.company, |r| &mut r.company)
//!                 .build();
//!         }
//!         &LAYOUT
//!     }
//! }
//!
//! impl Record for Payment {
//!     fn layout() -> &'static Layout<Self> {
//!         lazy_static! {
//!             static ref LAYOUT: Layout<Payment> = Layout::<Payment>::builder()
//!                 .field("record_type", "0,1", |r| &r.record_type, |r| &mut r.record_type)
//!                 .field("amount", "1,16", |r| &r.amount, |r| &mut r.amount)
//!                 .build();
//!         }
//!         &LAYOUT
//!     }
//! }
//!
//! let header = Header { record_type: 0, company: "Acme".to_string() };
//! let payments = vec![
//!     Payment { record_type: 1, amount: 10.5 },
//!     Payment { record_type: 1, amount: 99.99 },
//! ];
//!
//! // Encode to a CNAB 240 file
//! let data = cnab::marshal_240(&[&header, &payments]).unwrap();
//! assert_eq!(data.len(), 3 * 240 + 2 * 2 + 1);
//!
//! // Decode back, routing by record type
//! let mut decoded_header = Header::default();
//! let mut decoded_payments: Vec<Payment> = Vec::new();
//! let mut routes = PrefixMap::new()
//!     .route("0", &mut decoded_header)
//!     .route("1", &mut decoded_payments);
//! cnab::unmarshal(&data, &mut routes).unwrap();
//! drop(routes);
//!
//! assert_eq!(decoded_header.company, "ACME");
//! assert_eq!(decoded_payments[1].amount, 99.99);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Field ranges, value kinds and record layouts
//! - [`codec`]: Field, record and file encoding/decoding, prefix dispatch
//! - [`error`]: Error types
//! - [`limits`]: Wire constants (line widths, control bytes)
//!
//! # Wire Format
//!
//! Numbers are zero-padded on the left, text is space-padded on the right,
//! and everything written is uppercased. Content longer than its range is
//! cut. Decimals carry two implied fractional digits.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{
    Decode, Encode, EncodeOptions, PrefixMap, decode_record, encode_record, marshal, marshal_240,
    marshal_400, marshal_500, marshal_with_options, unmarshal,
};
pub use error::{BoxError, Error, Result};
pub use limits::{CNAB240, CNAB400, CNAB500, FINAL_CONTROL_BYTE, LINE_BREAK};
pub use model::{FieldRange, Layout, LayoutBuilder, Marshal, Record, Unmarshal, Value, ValueKind};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
