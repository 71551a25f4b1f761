//! Hex escaping for raster field data sent under `^FH`.
//!
//! With `^FH_` active, `_XX` in field data stands for the byte `0xXX`. User
//! text is escaped so that the command prefixes `^` and `~`, the indicator
//! itself, and the backslash used by the `\&` line-continuation marker can
//! never be read as commands.

/// Indicator character declared by `^FH_`.
pub const HEX_INDICATOR: u8 = b'_';

/// Bytes that must not appear raw in field data.
const RESERVED: &[u8] = b"^~_\\";

/// Escape reserved bytes in `text` as `_XX` hex pairs.
///
/// ```
/// use label_engine_core::escape::encode_field_data;
/// assert_eq!(encode_field_data("A^B_C"), "A_5EB_5FC");
/// ```
pub fn encode_field_data(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() && RESERVED.contains(&(ch as u8)) {
            out.push(HEX_INDICATOR as char);
            out.push_str(&format!("{:02X}", ch as u8));
        } else {
            out.push(ch);
        }
    }
    out
}

/// A malformed escape sequence at a specific byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexEscapeError {
    /// Byte offset of the indicator character.
    pub offset: usize,
    /// Human-readable description of the error.
    pub message: String,
}

/// Decode `_XX` sequences in `content` back into bytes.
///
/// Processing continues past malformed sequences, which are copied through
/// raw; every problem is reported in the `Err` list.
pub fn decode_hex_escapes(content: &str) -> Result<Vec<u8>, Vec<HexEscapeError>> {
    let bytes = content.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut errors = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != HEX_INDICATOR {
            output.push(bytes[i]);
            i += 1;
            continue;
        }
        match (hex_value(bytes.get(i + 1)), hex_value(bytes.get(i + 2))) {
            (Some(hi), Some(lo)) => {
                output.push((hi << 4) | lo);
                i += 3;
            }
            _ => {
                errors.push(HexEscapeError {
                    offset: i,
                    message: format!(
                        "invalid escape at offset {i} (expected '_' followed by two hex digits)"
                    ),
                });
                output.push(bytes[i]);
                i += 1;
            }
        }
    }

    if errors.is_empty() {
        Ok(output)
    } else {
        Err(errors)
    }
}

fn hex_value(b: Option<&u8>) -> Option<u8> {
    match *b? {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}
