//! BART API client.
//!
//! [`Client`] turns a command name and optional parameters into a single GET
//! against its base URL and hands back the raw body. It never decodes, never
//! retries, and never looks at the status code; see [`crate::fetch::layers`]
//! for opt-in hardening.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use crate::decode::decode;
use crate::error::Error;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};

/// The public key BART provides for unregistered use of their API.
///
/// Using it means accepting BART's license agreement.
pub const PUBLIC_API_KEY: &str = "MW9S-E7SL-26DU-VV8V";

/// Base URL a freshly constructed [`Client`] points at.
pub const DEFAULT_BASE_URL: &str = Endpoint::Advisory.url();

/// Stands in for the key in request targets that end up in error messages.
const REDACTED_KEY: &str = "<redacted>";

/// Optional query parameters appended after `cmd` and `key`.
pub type Params = BTreeMap<String, String>;

/// The known BART API endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Service advisories (delays), elevator status and active train count.
    Advisory,
    /// Real-time departure estimates at a station.
    Estimates,
    /// Information about one or all routes.
    Route,
    /// Trip planning, fares, route and station schedules, special schedules.
    Schedule,
    /// Station list, station details and access information.
    Station,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Advisory,
        Endpoint::Estimates,
        Endpoint::Route,
        Endpoint::Schedule,
        Endpoint::Station,
    ];

    pub const fn url(self) -> &'static str {
        match self {
            Endpoint::Advisory => "http://api.bart.gov/api/bsa.aspx",
            Endpoint::Estimates => "http://api.bart.gov/api/etd.aspx",
            Endpoint::Route => "http://api.bart.gov/api/route.aspx",
            Endpoint::Schedule => "http://api.bart.gov/api/sched.aspx",
            Endpoint::Station => "http://api.bart.gov/api/stn.aspx",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Endpoint::Advisory => "advisory",
            Endpoint::Estimates => "estimates",
            Endpoint::Route => "route",
            Endpoint::Schedule => "schedule",
            Endpoint::Station => "station",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown endpoint '{0}' (expected advisory, estimates, route, schedule or station)")]
pub struct ParseEndpointError(String);

impl FromStr for Endpoint {
    type Err = ParseEndpointError;

    /// Accepts the long names as well as the `.aspx` stems BART uses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "advisory" | "bsa" => Ok(Endpoint::Advisory),
            "estimates" | "etd" => Ok(Endpoint::Estimates),
            "route" => Ok(Endpoint::Route),
            "schedule" | "sched" => Ok(Endpoint::Schedule),
            "station" | "stn" => Ok(Endpoint::Station),
            _ => Err(ParseEndpointError(s.to_string())),
        }
    }
}

/// Builds the request target for a command.
///
/// The result is `base?cmd=<cmd>&key=<key>` followed by `&<k>=<v>` for every
/// entry in `query`. Nothing is percent-encoded: values containing `&`, `=`,
/// `?`, `#` or spaces will corrupt the query string, so callers that need
/// them must encode them first.
pub fn build_query_url(base_url: &str, cmd: &str, key: &str, query: Option<&Params>) -> String {
    let mut target = format!("{base_url}?cmd={cmd}&key={key}");

    for (k, v) in query.into_iter().flatten() {
        target.push('&');
        target.push_str(k);
        target.push('=');
        target.push_str(v);
    }

    target
}

/// The BART API client.
///
/// A client holds an API key and a base URL. Changing the base URL needs
/// `&mut self`, so it can never race an in-flight [`pull`](Self::pull);
/// callers sharing one client across threads use
/// [`pull_from`](Self::pull_from) with their own base URL instead.
#[derive(Debug, Clone)]
pub struct Client<C = BasicClient> {
    key: String,
    base_url: String,
    http: C,
}

impl Client {
    /// Creates a client for `key` pointed at the advisory endpoint.
    ///
    /// The key is not validated; the API server decides whether it is good.
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_http(key, BasicClient::new())
    }

    /// Creates a client for `key` pointed at `endpoint`.
    pub fn with_endpoint(key: impl Into<String>, endpoint: Endpoint) -> Self {
        let mut client = Self::new(key);
        client.set_base_url(endpoint.url());
        client
    }
}

impl<C: HttpClient> Client<C> {
    /// Creates a client that sends its requests through `http`.
    pub fn with_http(key: impl Into<String>, http: C) -> Self {
        Self {
            key: key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replaces the base URL. No validation happens here; a malformed URL
    /// shows up as [`Error::InvalidUrl`] or a transport error on the next pull.
    pub fn set_base_url(&mut self, url: impl Into<String>) {
        self.base_url = url.into();
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// Sends `cmd` with optional extra parameters to the current base URL and
    /// returns the response body.
    ///
    /// The body is returned whatever the HTTP status; a 404 or 500 from the
    /// server is still `Ok`. The request is never retried.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUrl`] if the composed target is not a URL, and
    /// [`Error::Transport`] if the request or the body read fails.
    pub fn pull(&self, cmd: &str, query: Option<&Params>) -> Result<Vec<u8>, Error> {
        self.pull_from(&self.base_url, cmd, query)
    }

    /// Same as [`pull`](Self::pull) but against `base_url` instead of the
    /// client's own.
    #[tracing::instrument(skip(self, query), fields(params = query.map_or(0, |q| q.len())))]
    pub fn pull_from(&self, base_url: &str, cmd: &str, query: Option<&Params>) -> Result<Vec<u8>, Error> {
        let target = build_query_url(base_url, cmd, &self.key, query);
        let url = reqwest::Url::parse(&target).map_err(|source| Error::InvalidUrl {
            url: build_query_url(base_url, cmd, REDACTED_KEY, query),
            source,
        })?;

        let body = fetch_bytes(&self.http, url)?;
        tracing::debug!(bytes = body.len(), "pulled");
        Ok(body)
    }

    /// Pulls `cmd` and decodes the XML body into `T`.
    ///
    /// # Errors
    ///
    /// Anything [`pull`](Self::pull) returns, plus [`Error::Decode`].
    pub fn pull_xml<T: DeserializeOwned>(&self, cmd: &str, query: Option<&Params>) -> Result<T, Error> {
        let body = self.pull(cmd, query)?;
        Ok(decode(body.as_slice())?)
    }
}
