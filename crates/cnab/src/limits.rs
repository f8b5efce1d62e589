//! Wire constants for CNAB files.

/// Control characters between two record lines (hex `0D0A`).
///
/// Never written after the last line of a file.
pub const LINE_BREAK: &[u8] = b"\r\n";

/// Control character closing a multi-record file (hex `1A`).
pub const FINAL_CONTROL_BYTE: u8 = 0x1A;

/// Line width of the CNAB 240 layout.
pub const CNAB240: usize = 240;

/// Line width of the CNAB 400 layout.
pub const CNAB400: usize = 400;

/// Line width of the CNAB 500 layout.
pub const CNAB500: usize = 500;

/// Separator between the two components of a field tag (`"<begin>,<end>"`).
pub const TAG_SEPARATOR: char = ',';
