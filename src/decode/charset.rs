//! Character-set detection and conversion for XML documents.

use std::borrow::Cow;

use encoding_rs::Encoding;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::DecodeError;

/// Converts bytes in a named character encoding into Unicode text.
///
/// The decoder only calls this for documents that are not UTF-8.
pub trait Transcoder {
    fn transcode(&self, label: &str, bytes: &[u8]) -> Result<String, DecodeError>;
}

/// [`Transcoder`] backed by `encoding_rs`, which knows every label in the
/// WHATWG Encoding Standard (`ISO-8859-1`, `windows-1252`, `Shift_JIS`, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodingRsTranscoder;

impl Transcoder for EncodingRsTranscoder {
    fn transcode(&self, label: &str, bytes: &[u8]) -> Result<String, DecodeError> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| DecodeError::UnsupportedCharset(label.to_string()))?;

        encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(Cow::into_owned)
            .ok_or_else(|| DecodeError::Malformed {
                encoding: encoding.name().to_string(),
            })
    }
}

/// Returns the `encoding` pseudo-attribute of the XML declaration, if any.
///
/// Only the prolog is scanned; the first element ends the search. The
/// declaration is ASCII in every encoding this crate reads without a BOM, so
/// the raw bytes can be scanned before anything is transcoded.
pub fn detect_encoding(bytes: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(bytes);

    loop {
        match reader.read_event() {
            Ok(Event::Decl(decl)) => {
                return match decl.encoding() {
                    Some(Ok(label)) => Some(String::from_utf8_lossy(&label).into_owned()),
                    _ => None,
                };
            }
            Ok(Event::Text(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_)) => continue,
            _ => return None,
        }
    }
}

/// A declaration that could be read as ASCII rules out UTF-16, so UTF-16
/// labels fall back to UTF-8 here, as `output_encoding` maps them.
fn is_utf8(label: &str) -> bool {
    Encoding::for_label(label.trim().as_bytes()).map(Encoding::output_encoding) == Some(encoding_rs::UTF_8)
}

/// Produces the document as UTF-8 text.
///
/// A byte-order mark decides the encoding if present, then the declaration,
/// then UTF-8 by default. Non-UTF-8 input goes through `transcoder`.
pub(crate) fn to_utf8<T: Transcoder + ?Sized>(bytes: &[u8], transcoder: &T) -> Result<String, DecodeError> {
    let text = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding == encoding_rs::UTF_8 => utf8(&bytes[bom_len..])?,
        Some((encoding, bom_len)) => transcode_declared(encoding.name(), &bytes[bom_len..], transcoder)?,
        None => match detect_encoding(bytes) {
            Some(label) if !is_utf8(&label) => transcode_declared(&label, bytes, transcoder)?,
            _ => utf8(bytes)?,
        },
    };

    if text.trim().is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(text)
}

fn transcode_declared<T: Transcoder + ?Sized>(
    label: &str,
    bytes: &[u8],
    transcoder: &T,
) -> Result<String, DecodeError> {
    tracing::debug!(encoding = label, "transcoding xml");
    transcoder.transcode(label, bytes)
}

fn utf8(bytes: &[u8]) -> Result<String, DecodeError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::Malformed {
        encoding: encoding_rs::UTF_8.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_encoding_reads_declaration() {
        let doc = br#"<?xml version="1.0" encoding="ISO-8859-1"?><root/>"#;
        assert_eq!(detect_encoding(doc).as_deref(), Some("ISO-8859-1"));
    }

    #[test]
    fn test_detect_encoding_without_declaration() {
        assert_eq!(detect_encoding(b"<root><a>x</a></root>"), None);
        assert_eq!(detect_encoding(br#"<?xml version="1.0"?><root/>"#), None);
        assert_eq!(detect_encoding(b""), None);
    }

    #[test]
    fn test_detect_encoding_stops_at_first_element() {
        let doc = br#"<root><?xml version="1.0" encoding="latin1"?></root>"#;
        assert_eq!(detect_encoding(doc), None);
    }

    #[test]
    fn test_encoding_rs_transcoder() {
        let text = EncodingRsTranscoder.transcode("iso-8859-1", b"caf\xe9").unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn test_encoding_rs_transcoder_unknown_label() {
        let err = EncodingRsTranscoder.transcode("x-klingon", b"abc").unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedCharset(l) if l == "x-klingon"));
    }

    #[test]
    fn test_to_utf8_rejects_invalid_utf8() {
        let err = to_utf8(b"<root>caf\xe9</root>", &EncodingRsTranscoder).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    #[test]
    fn test_to_utf8_strips_bom() {
        let text = to_utf8(b"\xef\xbb\xbf<root/>", &EncodingRsTranscoder).unwrap();
        assert_eq!(text, "<root/>");
    }

    #[test]
    fn test_to_utf8_follows_utf16_bom() {
        let mut doc = vec![0xff, 0xfe];
        for unit in "<root>é</root>".encode_utf16() {
            doc.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(to_utf8(&doc, &EncodingRsTranscoder).unwrap(), "<root>é</root>");
    }

    #[test]
    fn test_to_utf8_empty() {
        assert!(matches!(to_utf8(b"", &EncodingRsTranscoder), Err(DecodeError::Empty)));
        assert!(matches!(to_utf8(b" \n\t", &EncodingRsTranscoder), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_to_utf8_skips_transcoder_for_declared_utf8() {
        struct Refuse;
        impl Transcoder for Refuse {
            fn transcode(&self, label: &str, _: &[u8]) -> Result<String, DecodeError> {
                Err(DecodeError::UnsupportedCharset(label.to_string()))
            }
        }

        let doc = r#"<?xml version="1.0" encoding="UTF-8"?><root>ü</root>"#;
        assert_eq!(to_utf8(doc.as_bytes(), &Refuse).unwrap(), doc);
    }
}
