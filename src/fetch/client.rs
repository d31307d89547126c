use reqwest::blocking::{Request, Response};

/// A blocking transport that executes a single prepared request.
///
/// Implementations may rewrite the request before sending it or inspect the
/// response afterwards; see [`crate::fetch::layers`].
pub trait HttpClient: Send + Sync {
    fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

impl<C: HttpClient + ?Sized> HttpClient for Box<C> {
    fn execute(&self, req: Request) -> reqwest::Result<Response> {
        (**self).execute(req)
    }
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    fn execute(&self, req: Request) -> reqwest::Result<Response> {
        (**self).execute(req)
    }
}
