use crate::config::LookupConfig;
use crate::constants::RESPONSE_KEY_FIELD;
use crate::credentials::load_headers;
use crate::error::{EnrichError, Result};
use crate::normalize::normalize;
use crate::types::{Key, LookupResult, RadiusLookup};
use crate::union::ordered_union;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Blocking client for the zip-code radius API.
///
/// Every failure is contained here: the caller only ever sees a (possibly
/// empty) list of keys. An empty result is cached like any other, so a
/// transient failure sticks until the cache file is removed.
pub struct RadiusApiClient {
    client: Client,
    url: String,
    delay: Duration,
}

impl RadiusApiClient {
    pub fn new(
        url: impl Into<String>,
        headers: HeaderMap,
        timeout: Duration,
        delay: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            delay,
        })
    }

    /// Build a client from config, loading the credentials headers.
    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        let headers = load_headers(&config.credentials)?;
        Self::new(
            config.url.clone(),
            headers,
            Duration::from_secs(config.timeout_seconds),
            Duration::from_millis(config.delay_ms),
        )
    }

    fn try_fetch(&self, key: &Key, radius: u32) -> Result<LookupResult> {
        let radius = radius.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[("zipCode", key.as_str()), ("radius", radius.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::Api {
                message: format!("radius lookup returned HTTP {}", status.as_u16()),
            });
        }
        let body = response.text()?;
        parse_radius_response(&body)
    }
}

impl RadiusLookup for RadiusApiClient {
    #[instrument(skip(self), fields(key = %key))]
    fn radius_zips(&self, key: &Key, radius: u32) -> LookupResult {
        let started = Instant::now();
        let result = match self.try_fetch(key, radius) {
            Ok(keys) => {
                debug!("Found {} zip codes within {} miles", keys.len(), radius);
                crate::metrics::lookup::success(started.elapsed().as_secs_f64(), keys.len());
                keys
            }
            Err(EnrichError::Json(e)) => {
                warn!("Error parsing JSON response for zip code {}: {}", key, e);
                crate::metrics::lookup::failure();
                Vec::new()
            }
            Err(e) => {
                warn!("Error fetching data for zip code {}: {}", key, e);
                crate::metrics::lookup::failure();
                Vec::new()
            }
        };

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        result
    }
}

/// Extract result keys from a radius API response body.
///
/// The body must be a JSON array. Items without a usable `zipCode` are skipped.
pub fn parse_radius_response(body: &str) -> Result<LookupResult> {
    let items: Vec<Value> = serde_json::from_str(body)?;
    let keys = items
        .iter()
        .filter_map(|item| match item.get(RESPONSE_KEY_FIELD)? {
            Value::String(zip) => Some(normalize(zip)),
            Value::Number(zip) => Some(normalize(zip)),
            _ => None,
        });
    Ok(ordered_union([keys]))
}
