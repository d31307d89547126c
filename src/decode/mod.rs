//! XML decoding for BART API payloads.
//!
//! BART does not always answer in UTF-8, so documents are first brought to
//! UTF-8 according to their byte-order mark or `encoding="..."` declaration,
//! then deserialized with `quick-xml` into a caller-owned serde type.
//! Elements the target type does not name are ignored.

mod charset;

pub use charset::{EncodingRsTranscoder, Transcoder, detect_encoding};

use std::io::Read;

use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// Decodes the XML document in `source` into `T`.
///
/// # Errors
///
/// Returns an error if the source cannot be read, is empty, declares an
/// unknown charset, is not valid in its charset, or does not map onto `T`.
pub fn decode<T: DeserializeOwned>(source: impl Read) -> Result<T, DecodeError> {
    decode_with(source, &EncodingRsTranscoder)
}

/// Like [`decode`], with a caller-supplied charset layer.
pub fn decode_with<T, R>(mut source: R, transcoder: &dyn Transcoder) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;

    let text = charset::to_utf8(&bytes, transcoder)?;
    Ok(quick_xml::de::from_str(&text)?)
}

/// Returns the document in `bytes` as UTF-8 text without deserializing it.
///
/// # Errors
///
/// Same charset and emptiness failures as [`decode`].
pub fn transcode(bytes: &[u8]) -> Result<String, DecodeError> {
    charset::to_utf8(bytes, &EncodingRsTranscoder)
}
