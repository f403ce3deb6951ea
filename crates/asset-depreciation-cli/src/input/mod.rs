pub mod file;

use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Resolve command input: `--input` file first, then piped stdin JSON.
/// `None` means neither was supplied and the caller should use its flags.
pub fn read_structured<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_document(path)?));
    }

    // An interactive terminal never carries a request document.
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

/// Blank input means nothing was piped; anything else must be a JSON request.
fn parse_piped<T: DeserializeOwned>(
    buffer: &str,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    tracing::debug!(bytes = trimmed.len(), "request read from stdin");
    Ok(Some(serde_json::from_str(trimmed)?))
}
