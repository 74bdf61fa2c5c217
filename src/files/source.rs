//! Source text I/O with encoding and byte-order-mark handling

use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::error::NolockError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// A decoded source file, remembering how to write it back
#[derive(Debug, Clone)]
pub struct SourceText {
    pub text: String,
    /// Whether the file started with a UTF-8 byte-order mark
    pub has_bom: bool,
    /// Encoding the text was decoded with (after any fallback)
    pub encoding: &'static Encoding,
    /// The bytes exactly as read from disk
    pub original: Vec<u8>,
}

/// Look up an encoding by its WHATWG label (`utf-8`, `windows-1252`, `latin1`, ...).
///
/// Encodings that `encoding_rs` can only decode (UTF-16, replacement) are
/// rejected since rewritten files could not be written back.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, NolockError> {
    let encoding =
        Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| NolockError::UnknownEncoding {
            label: label.to_string(),
        })?;
    if encoding.output_encoding() != encoding {
        return Err(NolockError::UnsupportedEncoding {
            label: label.to_string(),
        });
    }
    Ok(encoding)
}

/// Decode raw file bytes.
///
/// Invalid UTF-8 without a BOM falls back to Windows-1252, the usual encoding
/// of legacy sources saved on Windows.
pub fn decode_source(
    path: &Path,
    bytes: Vec<u8>,
    encoding: &'static Encoding,
) -> Result<SourceText, NolockError> {
    if bytes.starts_with(UTF16_LE_BOM) || bytes.starts_with(UTF16_BE_BOM) {
        let name = if bytes.starts_with(UTF16_LE_BOM) {
            "UTF-16LE"
        } else {
            "UTF-16BE"
        };
        return Err(NolockError::UnsupportedBom {
            path: path.to_path_buf(),
            encoding: name.to_string(),
        });
    }

    let has_bom = bytes.starts_with(UTF8_BOM);
    let body = if has_bom {
        &bytes[UTF8_BOM.len()..]
    } else {
        &bytes[..]
    };

    let (text, used) = match encoding.decode_without_bom_handling_and_without_replacement(body) {
        Some(text) => (text.into_owned(), encoding),
        None if encoding == UTF_8 && !has_bom => {
            tracing::debug!(
                "{} is not valid UTF-8, decoding as windows-1252",
                path.display()
            );
            let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(body);
            if had_errors {
                return Err(NolockError::Decode {
                    path: path.to_path_buf(),
                    encoding: WINDOWS_1252.name().to_string(),
                });
            }
            (text.into_owned(), WINDOWS_1252)
        }
        None => {
            return Err(NolockError::Decode {
                path: path.to_path_buf(),
                encoding: encoding.name().to_string(),
            })
        }
    };

    Ok(SourceText {
        text,
        has_bom,
        encoding: used,
        original: bytes,
    })
}

/// Read and decode a source file.
pub fn read_source(path: &Path, encoding: &'static Encoding) -> Result<SourceText, NolockError> {
    let bytes = std::fs::read(path).map_err(|source| NolockError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    decode_source(path, bytes, encoding)
}

/// Encode `new_text` the way `source` was read: same encoding, same BOM.
pub fn encode_source(
    path: &Path,
    source: &SourceText,
    new_text: &str,
) -> Result<Vec<u8>, NolockError> {
    let (encoded, _, had_unmappable) = source.encoding.encode(new_text);
    if had_unmappable {
        return Err(NolockError::Encode {
            path: path.to_path_buf(),
            encoding: source.encoding.name().to_string(),
        });
    }

    let mut bytes = Vec::with_capacity(encoded.len() + UTF8_BOM.len());
    if source.has_bom {
        bytes.extend_from_slice(UTF8_BOM);
    }
    bytes.extend_from_slice(&encoded);
    Ok(bytes)
}

/// Write rewritten text back to `path`.
pub fn write_source(path: &Path, source: &SourceText, new_text: &str) -> Result<(), NolockError> {
    let bytes = encode_source(path, source, new_text)?;
    std::fs::write(path, bytes).map_err(|source| NolockError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// `Default.aspx.vb` -> `Default.aspx.vb.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Copy the original bytes next to the file before it is overwritten.
pub fn write_backup(path: &Path, source: &SourceText) -> Result<PathBuf, NolockError> {
    let backup = backup_path(path);
    std::fs::write(&backup, &source.original).map_err(|err| NolockError::Backup {
        path: backup.clone(),
        source: err,
    })?;
    Ok(backup)
}
