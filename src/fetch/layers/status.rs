use crate::fetch::client::HttpClient;

/// An [`HttpClient`] wrapper that turns 4xx and 5xx responses into errors.
///
/// The resulting [`reqwest::Error`] carries the status in
/// [`reqwest::Error::status`]. The body of a rejected response is discarded.
#[derive(Debug, Clone)]
pub struct RequireSuccess<C> {
    pub inner: C,
}

impl<C> RequireSuccess<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: HttpClient> HttpClient for RequireSuccess<C> {
    fn execute(&self, req: reqwest::blocking::Request) -> reqwest::Result<reqwest::blocking::Response> {
        self.inner.execute(req)?.error_for_status()
    }
}
