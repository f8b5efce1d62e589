//! Record layouts.
//!
//! A [`Layout`] is the ordered list of fields of one record type: the name,
//! the range tag, the [`ValueKind`] and the accessors that move values in and
//! out of the record. Layouts are built once per type with
//! [`LayoutBuilder`] and handed out by [`Record::layout`].
//!
//! # Example
//!
//! ```rust
//! use cnab::model::{Layout, Record};
//! use lazy_static::lazy_static;
//!
//! #[derive(Debug, Default)]
//! struct Trailer {
//!     record_type: u8,
//!     total: f64,
//!     note: String,
//! }
//!
//! impl Record for Trailer {
//!     fn layout() -> &'static Layout<Self> {
//!         lazy_static! {
//!             static ref LAYOUT: Layout<Trailer> = Layout::<Trailer>::builder()
//!                 .field("record_type", "0,1", |r| &r.record_type, |r| &mut r.record_type)
//!                 .field("total", "1,16", |r| &r.total, |r| &mut r.total)
//!                 .field("note", "", |r| &r.note, |r| &mut r.note)
//!                 .build();
//!         }
//!         &LAYOUT
//!     }
//! }
//!
//! assert_eq!(Trailer::layout().len(), 3);
//! ```

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::{BoxError, Error, Result};
use crate::model::value::{Scalar, Value, ValueKind};

/// A type laid out on a single fixed-width line.
pub trait Record: Sized + 'static {
    /// Returns the memoized layout of this type.
    fn layout() -> &'static Layout<Self>;
}

/// Encode hook for types with their own CNAB representation.
pub trait Marshal {
    /// Returns the field content. It is truncated or space-padded to the
    /// field width and uppercased before being written.
    fn marshal_cnab(&self) -> std::result::Result<Vec<u8>, BoxError>;
}

/// Decode hook for types with their own CNAB representation.
///
/// Receives the raw, untrimmed field bytes. Implementations must copy the
/// data if they want to keep it.
pub trait Unmarshal {
    fn unmarshal_cnab(&mut self, data: &[u8]) -> std::result::Result<(), BoxError>;
}

type Getter<R> = Box<dyn for<'r> Fn(&'r R) -> Result<Value<'r>> + Send + Sync>;
type Setter<R> = Box<dyn for<'v> Fn(&mut R, Value<'v>) -> Result<()> + Send + Sync>;

fn getter<R, F>(f: F) -> Getter<R>
where
    F: for<'r> Fn(&'r R) -> Result<Value<'r>> + Send + Sync + 'static,
{
    Box::new(f)
}

fn setter<R, F>(f: F) -> Setter<R>
where
    F: for<'v> Fn(&mut R, Value<'v>) -> Result<()> + Send + Sync + 'static,
{
    Box::new(f)
}

/// One field of a record layout.
pub struct Field<R> {
    name: &'static str,
    tag: &'static str,
    kind: ValueKind,
    get: Option<Getter<R>>,
    set: Option<Setter<R>>,
    writable: bool,
}

impl<R> Field<R> {
    /// Field name, used in error reports.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Range tag as declared; empty when the field has no range.
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Formatting kind of the field.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Returns false for fields skipped on decode.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Reads the field out of `record`.
    ///
    /// Fails with [`Error::UnsupportedType`] for decode-only fields.
    pub fn get<'r>(&self, record: &'r R) -> Result<Value<'r>> {
        match &self.get {
            Some(get) => get(record),
            None => Err(Error::UnsupportedType),
        }
    }

    /// Stores a decoded value into `record`.
    ///
    /// Fails with [`Error::UnsupportedType`] for encode-only fields.
    pub fn set(&self, record: &mut R, value: Value<'_>) -> Result<()> {
        match &self.set {
            Some(set) => set(record, value),
            None => Err(Error::UnsupportedType),
        }
    }
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("writable", &self.writable)
            .finish()
    }
}

/// Ordered field descriptors of a record type.
#[derive(Debug)]
pub struct Layout<R> {
    fields: Vec<Field<R>>,
}

impl<R: 'static> Layout<R> {
    /// Starts a new layout.
    pub fn builder() -> LayoutBuilder<R> {
        LayoutBuilder { fields: Vec::new() }
    }
}

impl<R> Layout<R> {
    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field<R>] {
        &self.fields
    }

    /// Looks a field up by name.
    pub fn field(&self, name: &str) -> Option<&Field<R>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`Layout`].
///
/// Each method appends one field. The tag is `"<begin>,<end>"`, or `""` for a
/// field that is not part of the line. Tags are resolved on every call
/// against the line width in use, so a bad tag surfaces as a field error at
/// encode/decode time.
pub struct LayoutBuilder<R> {
    fields: Vec<Field<R>>,
}

impl<R: 'static> LayoutBuilder<R> {
    fn push(mut self, field: Field<R>) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a field of a built-in kind.
    pub fn field<T: Scalar + 'static>(
        self,
        name: &'static str,
        tag: &'static str,
        get: fn(&R) -> &T,
        set: fn(&mut R) -> &mut T,
    ) -> Self {
        self.push(Field {
            name,
            tag,
            kind: T::KIND,
            get: Some(getter(move |record: &R| Ok(get(record).to_value()))),
            set: Some(setter(move |record: &mut R, value| {
                *set(record) = T::from_value(value)?;
                Ok(())
            })),
            writable: true,
        })
    }

    /// Adds a field encoded and decoded through [`Marshal`] and [`Unmarshal`].
    pub fn custom<T: Marshal + Unmarshal + 'static>(
        self,
        name: &'static str,
        tag: &'static str,
        get: fn(&R) -> &T,
        set: fn(&mut R) -> &mut T,
    ) -> Self {
        self.push(Field {
            name,
            tag,
            kind: ValueKind::Custom,
            get: Some(marshal_getter(get)),
            set: Some(unmarshal_setter(set)),
            writable: true,
        })
    }

    /// Adds an encode-only field. Decoding it fails with
    /// [`Error::UnsupportedType`].
    pub fn marshal<T: Marshal + 'static>(
        self,
        name: &'static str,
        tag: &'static str,
        get: fn(&R) -> &T,
    ) -> Self {
        self.push(Field {
            name,
            tag,
            kind: ValueKind::Custom,
            get: Some(marshal_getter(get)),
            set: None,
            writable: true,
        })
    }

    /// Adds a decode-only field. Encoding it fails with
    /// [`Error::UnsupportedType`].
    pub fn unmarshal<T: Unmarshal + 'static>(
        self,
        name: &'static str,
        tag: &'static str,
        set: fn(&mut R) -> &mut T,
    ) -> Self {
        self.push(Field {
            name,
            tag,
            kind: ValueKind::Custom,
            get: None,
            set: Some(unmarshal_setter(set)),
            writable: true,
        })
    }

    /// Adds a field using the type's textual form: [`Display`] to encode and
    /// [`FromStr`] over the raw, untrimmed field text to decode.
    ///
    /// Fallback for types without CNAB hooks.
    pub fn text<T>(
        self,
        name: &'static str,
        tag: &'static str,
        get: fn(&R) -> &T,
        set: fn(&mut R) -> &mut T,
    ) -> Self
    where
        T: Display + FromStr + 'static,
        T::Err: Into<BoxError>,
    {
        self.push(Field {
            name,
            tag,
            kind: ValueKind::Custom,
            get: Some(getter(move |record: &R| {
                Ok(Value::Custom(Cow::Owned(get(record).to_string().into_bytes())))
            })),
            set: Some(setter(move |record: &mut R, value| {
                let Value::Custom(data) = value else {
                    return Err(Error::UnsupportedType);
                };
                let text = std::str::from_utf8(&data).map_err(|_| Error::InvalidUtf8)?;
                *set(record) = text.parse().map_err(|e: T::Err| Error::Hook(e.into()))?;
                Ok(())
            })),
            writable: true,
        })
    }

    /// Marks the most recently added field as unwritable: it is still encoded
    /// but skipped on decode.
    pub fn read_only(mut self) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.writable = false;
        }
        self
    }

    /// Finishes the layout.
    pub fn build(self) -> Layout<R> {
        Layout {
            fields: self.fields,
        }
    }
}

fn marshal_getter<R: 'static, T: Marshal + 'static>(get: fn(&R) -> &T) -> Getter<R> {
    getter(move |record: &R| {
        let data = get(record).marshal_cnab().map_err(Error::Hook)?;
        Ok(Value::Custom(Cow::Owned(data)))
    })
}

fn unmarshal_setter<R: 'static, T: Unmarshal + 'static>(set: fn(&mut R) -> &mut T) -> Setter<R> {
    setter(move |record: &mut R, value| {
        let Value::Custom(data) = value else {
            return Err(Error::UnsupportedType);
        };
        set(record).unmarshal_cnab(&data).map_err(Error::Hook)
    })
}
