//! File composition for CNAB output.
//!
//! A file is built from one or more top-level inputs. Each input is a single
//! record or a homogeneous collection of records, and each record becomes
//! one line. Lines are separated by [`LINE_BREAK`](crate::limits::LINE_BREAK);
//! files made from more than one input are closed by
//! [`FINAL_CONTROL_BYTE`](crate::limits::FINAL_CONTROL_BYTE) unless disabled
//! in [`EncodeOptions`].

use tracing::debug;

use crate::codec::primitives::LineWriter;
use crate::codec::record::encode_record_into;
use crate::error::Result;
use crate::limits::{CNAB240, CNAB400, CNAB500};
use crate::model::Record;

/// Options for composing files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Append the final control byte to files built from more than one
    /// input. Defaults to `true`.
    pub include_final_control_byte: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            include_final_control_byte: true,
        }
    }
}

impl EncodeOptions {
    /// Creates default encoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that never append the final control byte.
    pub fn without_final_control_byte() -> Self {
        Self {
            include_final_control_byte: false,
        }
    }
}

/// A top-level input of a CNAB file: one or more records.
pub trait Encode {
    /// Appends one line per record to `writer`.
    fn encode_lines(&self, writer: &mut LineWriter) -> Result<()>;

    /// Number of lines this input produces.
    fn line_count(&self) -> usize;
}

impl<R: Record> Encode for R {
    fn encode_lines(&self, writer: &mut LineWriter) -> Result<()> {
        encode_record_into(self, writer.begin_line())
    }

    fn line_count(&self) -> usize {
        1
    }
}

impl<R: Record> Encode for Vec<R> {
    fn encode_lines(&self, writer: &mut LineWriter) -> Result<()> {
        for record in self {
            encode_record_into(record, writer.begin_line())?;
        }
        Ok(())
    }

    fn line_count(&self) -> usize {
        self.len()
    }
}

/// Encodes `inputs` as a CNAB file with lines of `line_width` bytes, using
/// default options.
pub fn marshal(line_width: usize, inputs: &[&dyn Encode]) -> Result<Vec<u8>> {
    marshal_with_options(line_width, inputs, EncodeOptions::default())
}

/// Encodes `inputs` as a CNAB file with lines of `line_width` bytes.
///
/// A single input never gets the final control byte. With more than one
/// input, the byte is appended when the output is non-empty and
/// `options.include_final_control_byte` is set. The first field error aborts
/// the whole file.
pub fn marshal_with_options(
    line_width: usize,
    inputs: &[&dyn Encode],
    options: EncodeOptions,
) -> Result<Vec<u8>> {
    let lines = inputs.iter().map(|input| input.line_count()).sum();
    let mut writer = LineWriter::with_capacity(line_width, lines);

    for input in inputs {
        input.encode_lines(&mut writer)?;
    }

    let final_byte =
        inputs.len() > 1 && !writer.is_empty() && options.include_final_control_byte;
    if final_byte {
        writer.write_final_control_byte();
    }

    debug!(
        inputs = inputs.len(),
        lines = writer.line_count(),
        bytes = writer.len(),
        final_byte,
        "composed cnab file"
    );
    Ok(writer.into_bytes())
}

/// Returns the CNAB 240 encoding of `inputs`.
pub fn marshal_240(inputs: &[&dyn Encode]) -> Result<Vec<u8>> {
    marshal(CNAB240, inputs)
}

/// Returns the CNAB 400 encoding of `inputs`.
pub fn marshal_400(inputs: &[&dyn Encode]) -> Result<Vec<u8>> {
    marshal(CNAB400, inputs)
}

/// Returns the CNAB 500 encoding of `inputs`.
pub fn marshal_500(inputs: &[&dyn Encode]) -> Result<Vec<u8>> {
    marshal(CNAB500, inputs)
}
