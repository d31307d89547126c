//! Error types returned by the client and the XML decoder.

use thiserror::Error;

/// Errors from [`Client::pull`](crate::Client::pull).
#[derive(Debug, Error)]
pub enum Error {
    /// Connection, DNS, or body-read failure, passed through untouched.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The composed request target could not be parsed as a URL. `url` has
    /// the key replaced, so the message is safe to log.
    #[error("invalid request url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Errors from [`decode`](crate::decode()) and [`transcode`](crate::transcode).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read xml source: {0}")]
    Io(#[from] std::io::Error),

    /// The input held no document at all.
    #[error("unexpected end of input: document is empty")]
    Empty,

    /// The prolog declared an encoding the charset layer does not know.
    #[error("unsupported charset '{0}'")]
    UnsupportedCharset(String),

    /// The bytes are not valid in the encoding they were read as.
    #[error("input is not valid {encoding}")]
    Malformed { encoding: String },

    #[error("xml decode error: {0}")]
    Xml(#[from] quick_xml::de::DeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        assert_eq!(
            DecodeError::UnsupportedCharset("x-klingon".into()).to_string(),
            "unsupported charset 'x-klingon'"
        );
        assert_eq!(
            DecodeError::Malformed {
                encoding: "UTF-8".into()
            }
            .to_string(),
            "input is not valid UTF-8"
        );
        assert!(DecodeError::Empty.to_string().contains("end of input"));
    }

    #[test]
    fn test_invalid_url_keeps_source() {
        let source = url::Url::parse("no scheme").unwrap_err();
        let err = Error::InvalidUrl {
            url: "no scheme".into(),
            source,
        };
        assert!(err.to_string().starts_with("invalid request url 'no scheme'"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_decode_error_converts() {
        let err: Error = DecodeError::Empty.into();
        assert!(matches!(err, Error::Decode(DecodeError::Empty)));
    }
}
