//! Positional encoding/decoding for CNAB files.
//!
//! Records map to fixed-width lines, files are lines joined by CRLF, and
//! decoding can route lines to different targets by prefix.

pub mod dispatch;
pub mod field;
pub mod file;
pub mod primitives;
pub mod record;

pub use dispatch::{Decode, PrefixMap, unmarshal};
pub use field::{decode_value, format_value, write_field};
pub use file::{
    Encode, EncodeOptions, marshal, marshal_240, marshal_400, marshal_500, marshal_with_options,
};
pub use primitives::{LineWriter, Lines, is_blank_line};
pub use record::{
    decode_record, decode_with_layout, encode_record, encode_record_into, encode_with_layout,
};
