//! Writing pulled bodies to stdout or a file.

use anyhow::{Context, Result};
use tracing::debug;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Writes `body` to `path`, or to stdout when no path is given.
///
/// With `append` the file is created if missing and extended otherwise;
/// without it the file is truncated first.
pub fn write_body(path: Option<&str>, body: &[u8], append: bool) -> Result<()> {
    let Some(path) = path else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(body)?;
        stdout.flush()?;
        return Ok(());
    };

    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, append, bytes = body.len(), "Writing body");

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .with_context(|| format!("failed to open '{path}'"))?;

    file.write_all(body)?;
    if append && !body.ends_with(b"\n") {
        file.write_all(b"\n")?;
    }
    file.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_write_body_to_stdout_does_not_panic() {
        write_body(None, b"", false).unwrap();
    }

    #[test]
    fn test_write_body_creates_file() {
        let path = temp_path("bart_api_test_create.xml");
        let _ = fs::remove_file(&path); // clean up any prior run

        write_body(Some(&path), b"<root/>", false).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"<root/>");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_body_truncates() {
        let path = temp_path("bart_api_test_truncate.xml");
        let _ = fs::remove_file(&path);

        write_body(Some(&path), b"<first>longer</first>", false).unwrap();
        write_body(Some(&path), b"<second/>", false).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<second/>");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_body_appends_one_line_per_body() {
        let path = temp_path("bart_api_test_append.json");
        let _ = fs::remove_file(&path);

        write_body(Some(&path), br#"{"a":1}"#, true).unwrap();
        write_body(Some(&path), b"{\"a\":2}\n", true).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec![r#"{"a":1}"#, r#"{"a":2}"#]);

        fs::remove_file(&path).unwrap();
    }
}
