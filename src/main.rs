//! CLI entry point for the BART API client.
//!
//! Provides subcommands for pulling a command from an endpoint and for
//! re-encoding a saved XML document as UTF-8.

use anyhow::{Context, Result};
use bart_api::{
    Client, Endpoint, Error, PUBLIC_API_KEY, Params,
    fetch::{
        BasicClient, HttpClient,
        layers::{RequireSuccess, Timeout},
    },
    output::write_body,
    transcode,
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_LOG_FILE: &str = "logs/bart_api.log";

#[derive(Parser)]
#[command(name = "bart_api")]
#[command(about = "Query the BART API from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a command to a BART endpoint and print the response body
    Pull {
        /// API command, e.g. "bsa", "etd", "stns"
        #[arg(short, long)]
        cmd: String,

        /// Endpoint to query (advisory, estimates, route, schedule, station)
        #[arg(short, long, default_value = "advisory")]
        endpoint: Endpoint,

        /// Explicit base URL, overriding --endpoint
        #[arg(long, env = "BART_BASE_URL")]
        base_url: Option<String>,

        /// API key (falls back to BART's public key)
        #[arg(short, long, env = "BART_API_KEY", default_value = PUBLIC_API_KEY)]
        key: String,

        /// Extra query parameter as KEY=VALUE; may be repeated
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Abort the request after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Treat 4xx and 5xx responses as failures
        #[arg(long, default_value_t = false)]
        require_success: bool,

        /// Re-encode an XML body as UTF-8 before writing it
        #[arg(long, default_value_t = false)]
        utf8: bool,

        /// File to write the body to (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Append to the output file instead of replacing it
        #[arg(long, default_value_t = false, requires = "output")]
        append: bool,
    },
    /// Print a saved XML document as UTF-8, honouring its declared encoding
    Transcode {
        /// Path to the XML document
        #[arg(value_name = "FILE")]
        file: String,
    },
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    Ok((k.to_string(), v.to_string()))
}

/// Installs a coloured stderr layer (`RUST_LOG`, default info) and a JSON
/// layer (`RUST_LOG_JSON`, default debug) writing to a daily-rolling file
/// named after `LOG_FILE_PATH`.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path = PathBuf::from(
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string()),
    );
    let log_dir = log_file_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let prefix = log_file_path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("bart_api");
    let suffix = log_file_path
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or("log");

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix(suffix)
        .build(log_dir)
        .with_context(|| format!("cannot open log directory {}", log_dir.display()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let console = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info")?);

    let json_file = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(file_writer)
        .with_filter(env_filter("RUST_LOG_JSON", "debug")?);

    tracing_subscriber::registry().with(console).with(json_file).init();
    Ok(guard)
}

fn env_filter(var: &str, default: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::from_env(var).add_directive(default.parse()?))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_logging()?;

    run(Cli::parse().command)
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Pull {
            cmd,
            endpoint,
            base_url,
            key,
            params,
            timeout,
            require_success,
            utf8,
            output,
            append,
        } => {
            let mut http: Box<dyn HttpClient> = Box::new(BasicClient::new());
            if let Some(secs) = timeout {
                http = Box::new(Timeout::new(http, Duration::from_secs(secs)));
            }
            if require_success {
                http = Box::new(RequireSuccess::new(http));
            }

            let mut client = Client::with_http(key, http);
            client.set_base_url(base_url.unwrap_or_else(|| endpoint.url().to_string()));

            let query: Params = params.into_iter().collect();
            let query = (!query.is_empty()).then_some(&query);

            info!(%cmd, base_url = client.base_url(), "Pulling");
            let body = client
                .pull(&cmd, query)
                .map_err(without_key)
                .with_context(|| format!("pull '{cmd}' from {} failed", client.base_url()))?;
            info!(bytes = body.len(), "Pulled");

            if utf8 {
                let text = transcode(&body).context("response is not a decodable xml document")?;
                write_body(output.as_deref(), text.as_bytes(), append)?;
            } else {
                write_body(output.as_deref(), &body, append)?;
            }
        }
        Commands::Transcode { file } => {
            let bytes = std::fs::read(&file).with_context(|| format!("failed to read '{file}'"))?;
            let text = transcode(&bytes).with_context(|| format!("failed to transcode '{file}'"))?;
            write_body(None, text.as_bytes(), false)?;
        }
    }

    Ok(())
}

/// reqwest errors print the request URL, which carries the key.
fn without_key(err: Error) -> Error {
    match err {
        Error::Transport(e) => Error::Transport(e.without_url()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("orig=12th").unwrap(), ("orig".into(), "12th".into()));
        assert_eq!(parse_param("a=b=c").unwrap(), ("a".into(), "b=c".into()));
        assert!(parse_param("novalue").is_err());
    }

    #[test]
    fn test_cli_parses_pull() {
        let cli = Cli::try_parse_from([
            "bart_api", "pull", "--cmd", "etd", "-e", "estimates", "-k", "abc", "-p", "orig=12th",
        ])
        .unwrap();

        match cli.command {
            Commands::Pull {
                cmd,
                endpoint,
                key,
                params,
                ..
            } => {
                assert_eq!(cmd, "etd");
                assert_eq!(endpoint, Endpoint::Estimates);
                assert_eq!(key, "abc");
                assert_eq!(params, vec![("orig".to_string(), "12th".to_string())]);
            }
            _ => panic!("expected pull"),
        }
    }

    #[test]
    fn test_without_key_strips_url_from_transport_errors() {
        let mut client = Client::new("SECRETKEY");
        client.set_base_url("http://127.0.0.1:1/");

        let err = client.pull("bsa", None).map_err(without_key).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(!format!("{err} {err:?}").contains("SECRETKEY"));
    }

    #[test]
    fn test_cli_rejects_unknown_endpoint() {
        assert!(Cli::try_parse_from(["bart_api", "pull", "--cmd", "x", "-e", "nowhere"]).is_err());
    }
}
