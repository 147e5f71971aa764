use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::{debug, warn};

use crate::error::RcpierError;

/// Report text decoded from raw file bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedReport {
    pub text: String,
    /// Name of the encoding the text was decoded with.
    pub encoding: &'static str,
    /// Undecodable bytes were dropped.
    pub lossy: bool,
}

/// Decode report bytes, never failing.
///
/// Tries a byte-order mark, then strict UTF-8, then Windows-1252 for
/// single-byte exports. Input that fits none of these is decoded as UTF-8
/// with invalid sequences dropped.
pub fn decode_report(bytes: &[u8]) -> DecodedReport {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if !had_errors {
            debug!("decoded report as {} (byte-order mark)", encoding.name());
            return DecodedReport {
                text: text.into_owned(),
                encoding: encoding.name(),
                lossy: false,
            };
        }
    }

    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        debug!("decoded report as UTF-8");
        return DecodedReport {
            text: text.into_owned(),
            encoding: UTF_8.name(),
            lossy: false,
        };
    }

    if !bytes.contains(&0) {
        if let Some(text) = WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
        {
            debug!("decoded report as {}", WINDOWS_1252.name());
            return DecodedReport {
                text: text.into_owned(),
                encoding: WINDOWS_1252.name(),
                lossy: false,
            };
        }
    }

    warn!("report is not valid in any known encoding; dropping undecodable bytes");
    DecodedReport {
        text: decode_utf8_dropping_invalid(bytes),
        encoding: UTF_8.name(),
        lossy: true,
    }
}

/// Read and decode a report file.
pub fn load_report_file(path: &Path) -> Result<DecodedReport, RcpierError> {
    let bytes = std::fs::read(path)?;
    Ok(decode_report(&bytes))
}

fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_utf8() {
        let decoded = decode_report("Loadcase ID: DC1 °".as_bytes());
        assert_eq!(decoded.text, "Loadcase ID: DC1 °");
        assert_eq!(decoded.encoding, "UTF-8");
        assert!(!decoded.lossy);
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let decoded = decode_report(b"\xEF\xBB\xBFLoadcase ID: DC1");
        assert_eq!(decoded.text, "Loadcase ID: DC1");
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "LL1".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = decode_report(&bytes);
        assert_eq!(decoded.text, "LL1");
        assert_eq!(decoded.encoding, "UTF-16LE");
    }

    #[test]
    fn single_byte_fallback() {
        // 0xB0 is the degree sign in Windows-1252
        let decoded = decode_report(b"Angle 90\xB0");
        assert_eq!(decoded.text, "Angle 90°");
        assert_eq!(decoded.encoding, "windows-1252");
        assert!(!decoded.lossy);
    }

    #[test]
    fn undecodable_bytes_are_dropped() {
        let decoded = decode_report(b"DC\x001\xFF2");
        assert_eq!(decoded.text, "DC\u{0}12");
        assert!(decoded.lossy);
    }
}
