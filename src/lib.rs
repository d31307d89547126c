//! Client for the BART (Bay Area Rapid Transit) API.
//!
//! [`Client::pull`] sends a command to an endpoint and returns the raw body;
//! [`decode()`] turns an XML body into a caller-defined serde type, honouring
//! whatever character encoding the document declares. Response types are not
//! provided here; callers keep their own.

pub mod api;
pub mod decode;
pub mod error;
pub mod fetch;
pub mod output;

pub use api::{Client, DEFAULT_BASE_URL, Endpoint, PUBLIC_API_KEY, Params, build_query_url};
pub use decode::{EncodingRsTranscoder, Transcoder, decode, decode_with, detect_encoding, transcode};
pub use error::{DecodeError, Error};
