use std::time::Duration;

use crate::fetch::client::HttpClient;

/// An [`HttpClient`] wrapper that puts a total deadline on every request.
///
/// The deadline covers connecting, sending, and reading the response body.
/// An expired deadline surfaces as a transport error where
/// [`reqwest::Error::is_timeout`] is true.
#[derive(Debug, Clone)]
pub struct Timeout<C> {
    pub inner: C,
    pub timeout: Duration,
}

impl<C> Timeout<C> {
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl<C: HttpClient> HttpClient for Timeout<C> {
    fn execute(&self, mut req: reqwest::blocking::Request) -> reqwest::Result<reqwest::blocking::Response> {
        *req.timeout_mut() = Some(self.timeout);
        self.inner.execute(req)
    }
}
