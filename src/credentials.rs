use crate::error::{EnrichError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load the HTTP headers (API host and key) sent with every radius request.
///
/// The file is a flat JSON object of header name to value, for example
/// `{"x-rapidapi-key": "...", "x-rapidapi-host": "..."}`.
pub fn load_headers(path: &Path) -> Result<HeaderMap> {
    if !path.exists() {
        return Err(EnrichError::MissingCredentials(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let raw: BTreeMap<String, String> = serde_json::from_str(&content)?;
    debug!("Loaded {} credential headers from {}", raw.len(), path.display());
    headers_from_map(raw)
}

fn headers_from_map(raw: BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(raw.len());
    for (name, value) in raw {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| EnrichError::InvalidHeader(format!("{}: {}", name, e)))?;
        let mut header_value = HeaderValue::from_str(&value)
            .map_err(|e| EnrichError::InvalidHeader(format!("{}: {}", name, e)))?;
        header_value.set_sensitive(true);
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}
