//! Blocking HTTP transport used by [`crate::Client`].
//!
//! [`HttpClient`] is the seam between the API client and reqwest.
//! [`BasicClient`] sends through one shared connection pool, and the types in
//! [`layers`] wrap any transport with optional behaviour such as timeouts.

mod basic;
mod client;
pub mod layers;

pub use basic::BasicClient;
pub use client::HttpClient;

/// Issues a GET for `url` and reads the whole body, whatever the status.
///
/// The response is dropped, and its connection released, before returning.
pub fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: reqwest::Url) -> reqwest::Result<Vec<u8>> {
    let req = reqwest::blocking::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req)?;
    tracing::debug!(status = resp.status().as_u16(), "response received");
    Ok(resp.bytes()?.to_vec())
}
