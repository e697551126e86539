// Excerpt fetcher: asks the Wikivoyage search API for a page matching the
// country's canonical name and returns its excerpt with search markup removed.

use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

/// Markup the search endpoint leaves in excerpts.
const MARKUP: [&str; 3] = ["<span class=\"searchmatch\">", "</span>", "&quot;"];

pub trait ExcerptSource {
    /// Excerpt for the first page matching `canonical_name`, or `None` when
    /// the search has no results.
    fn fetch_excerpt(&self, canonical_name: &str) -> Result<Option<String>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    pages: Vec<SearchPage>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    excerpt: Option<String>,
}

pub struct WikiClient {
    client: Client,
    base_url: String,
}

impl WikiClient {
    /// Build the client with the bearer token and contact User-Agent baked
    /// into its default headers.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .default_headers(default_headers(config)?)
            .build()?;
        Ok(WikiClient {
            client,
            base_url: config.wiki_url.trim_end_matches('/').to_string(),
        })
    }
}

fn default_headers(config: &Config) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let agent = match &config.contact_email {
        Some(email) => format!("wayfarer ({})", email),
        None => format!("wayfarer/{}", env!("CARGO_PKG_VERSION")),
    };
    let agent = HeaderValue::from_str(&agent)
        .map_err(|_| Error::Config("contact email is not a valid header value".into()))?;
    headers.insert(USER_AGENT, agent);

    if let Some(token) = &config.wiki_token {
        let val = format!("Bearer {}", token);
        let val = HeaderValue::from_str(&val)
            .map_err(|_| Error::Config("wiki token is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, val);
    }
    Ok(headers)
}

impl ExcerptSource for WikiClient {
    fn fetch_excerpt(&self, canonical_name: &str) -> Result<Option<String>> {
        let url = format!("{}/search/page", &self.base_url);
        debug!(%url, query = canonical_name, "GET");
        let res = self
            .client
            .get(&url)
            .query(&[("q", canonical_name), ("limit", "1")])
            .send()?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().unwrap_or_default();
            return Err(Error::Api { status, body });
        }
        let search: SearchResponse = res.json()?;
        Ok(search
            .pages
            .into_iter()
            .next()
            .and_then(|page| page.excerpt)
            .map(|text| clean_excerpt(&text)))
    }
}

/// Strip search-highlight spans and quote entities from an excerpt.
pub fn clean_excerpt(raw: &str) -> String {
    MARKUP
        .iter()
        .fold(raw.to_string(), |text, markup| text.replace(markup, ""))
}
