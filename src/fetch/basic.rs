use super::client::HttpClient;
use once_cell::sync::Lazy;

static SHARED: Lazy<reqwest::blocking::Client> = Lazy::new(reqwest::blocking::Client::new);

/// Handle to the process-wide shared blocking client.
///
/// The handle owns nothing; every [`BasicClient`] borrows the same underlying
/// connection pool, which is built on first use and lives for the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicClient;

impl BasicClient {
    pub fn new() -> Self {
        Self
    }
}

impl HttpClient for BasicClient {
    fn execute(&self, req: reqwest::blocking::Request) -> reqwest::Result<reqwest::blocking::Response> {
        SHARED.execute(req)
    }
}
