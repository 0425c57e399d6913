//! Web temperature feed adapter.
//!
//! The boiler's sensor box publishes a tiny HTML page whose body text is a
//! bracketed list:
//!
//! ```text
//! [1718000000, 41.2, 41.5, 41.9, 42.3, 42.8]
//! ```
//!
//! The first field is a stamp and is skipped.  The last value is the
//! current temperature; the average is taken over every value except the
//! last two.

use log::warn;
use reqwest::blocking::Client;

use crate::app::ports::ReadingsPort;
use crate::config::SystemConfig;
use crate::control::TemperatureSample;
use crate::error::{Error, Result};

use super::utils::{build_client, classify};

/// Minimum number of temperature values for a usable sample (the average
/// window excludes the last two).
const MIN_VALUES: usize = 3;

/// [`ReadingsPort`] backed by the HTTP feed.
pub struct HttpFeed {
    client: Client,
    url: String,
}

impl HttpFeed {
    pub fn new(config: &SystemConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.request_timeout())?,
            url: config.feed_url.clone(),
        })
    }

    /// Fetch and parse one sample.
    pub fn fetch(&self) -> Result<TemperatureSample> {
        let page = self
            .client
            .get(&self.url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::text)
            .map_err(|e| classify("temperature feed", &e))?;
        parse_feed_page(&page)
    }
}

impl ReadingsPort for HttpFeed {
    fn read_temperature(&mut self) -> TemperatureSample {
        match self.fetch() {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Temperature feed unavailable, failing safe: {e}");
                TemperatureSample::unavailable()
            }
        }
    }
}

/// Text content of the page body with all markup removed.
fn body_text(page: &str) -> String {
    let lower = page.to_ascii_lowercase();
    let body = match lower.find("<body") {
        Some(open) => {
            let start = lower[open..].find('>').map_or(page.len(), |i| open + i + 1);
            let end = lower[start..]
                .find("</body")
                .map_or(page.len(), |i| start + i);
            &page[start..end]
        }
        None => page,
    };

    let mut text = String::with_capacity(body.len());
    let mut in_tag = false;
    for c in body.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

/// Parse the feed page into a sample.
pub fn parse_feed_page(page: &str) -> Result<TemperatureSample> {
    let text = body_text(page).replace(['[', ']'], "");

    let values = text
        .split(',')
        .skip(1)
        .map(|field| {
            let field = field.trim();
            field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::protocol(format!("feed value `{field}` is not a number")))
        })
        .collect::<Result<Vec<f64>>>()?;

    if values.len() < MIN_VALUES {
        return Err(Error::protocol(format!(
            "feed carries {} values, need at least {MIN_VALUES}",
            values.len()
        )));
    }

    let window = &values[..values.len() - 2];
    let average = window.iter().sum::<f64>() / window.len() as f64;
    let current = values[values.len() - 1];

    Ok(TemperatureSample::new(current, average))
}
