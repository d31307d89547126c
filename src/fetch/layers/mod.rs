//! Optional wrappers around an [`HttpClient`](crate::fetch::HttpClient).
//!
//! The core client never inspects status codes and never sets a deadline.
//! Callers who want either wrap their transport in these layers and hand the
//! result to [`Client::with_http`](crate::Client::with_http).

mod status;
mod timeout;

pub use status::RequireSuccess;
pub use timeout::Timeout;
