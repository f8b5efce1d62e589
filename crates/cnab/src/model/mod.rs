//! Data model for CNAB records.
//!
//! - Field ranges (`"<begin>,<end>"` tags)
//! - Value kinds (how a field is formatted)
//! - Layouts (ordered field descriptors of a record type)

pub mod layout;
pub mod range;
pub mod value;

pub use layout::{Field, Layout, LayoutBuilder, Marshal, Record, Unmarshal};
pub use range::FieldRange;
pub use value::{Scalar, Value, ValueKind};
