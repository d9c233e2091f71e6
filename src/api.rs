/// Synchronous client for fetching the **base map style document**.
///
/// The style is a boundary artifact: this crate never generates it, only
/// augments it with election sources and layers (see `style_doc`). Basemap
/// providers authenticate with a `key` query parameter, appended here.
///
/// Typical usage:
/// ```no_run
/// # use obwody_rs::api::StyleClient;
/// let client = StyleClient::default();
/// let style = client.fetch_style(
///     "https://api.maptiler.com/maps/dataviz-light/style.json",
///     Some("my-token"),
/// )?;
/// # Ok::<(), anyhow::Error>(())
/// ```
use anyhow::{Context, Result, bail};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StyleClient {
    http: HttpClient,
}

impl Default for StyleClient {
    fn default() -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("obwody_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build");
        Self { http }
    }
}

// Allow -, _, . unescaped in tokens
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Percent-encode a single query value.
pub fn encode_query_value(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

/// Append `key=<token>` to `url`, respecting an existing query string.
pub fn with_key(url: &str, token: Option<&str>) -> String {
    match token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => {
            let sep = if url.contains('?') { '&' } else { '?' };
            format!("{url}{sep}key={}", encode_query_value(t))
        }
        None => url.to_string(),
    }
}

impl StyleClient {
    /// GET the style document and check it is a JSON object.
    pub fn fetch_style(&self, url: &str, token: Option<&str>) -> Result<Value> {
        let full = with_key(url, token);
        log::debug!("fetching base style from {url}");
        let resp = self
            .http
            .get(&full)
            .send()
            .with_context(|| format!("requesting style {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            bail!("style request to {url} failed with HTTP {status}");
        }
        let v: Value = resp.json().context("decoding style JSON")?;
        if !v.is_object() {
            bail!("style document at {url} is not a JSON object");
        }
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_appended_and_encoded() {
        assert_eq!(
            with_key("https://x/style.json", Some("a b/c")),
            "https://x/style.json?key=a%20b%2Fc"
        );
        assert_eq!(
            with_key("https://x/style.json?lang=pl", Some("k-1")),
            "https://x/style.json?lang=pl&key=k-1"
        );
        assert_eq!(with_key("https://x/s.json", Some("  ")), "https://x/s.json");
        assert_eq!(with_key("https://x/s.json", None), "https://x/s.json");
    }
}
