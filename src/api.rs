// Country lookup client: a small blocking HTTP client for the REST
// Countries service. It returns raw records; turning them into something
// the rest of the program can display is the job of `country`.

use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Seam between the search loop and the country service, so the loop can be
/// driven against in-memory data in tests.
pub trait CountrySource {
    /// Search by (partial) name. An unknown name is `Error::NotFound`.
    fn lookup(&self, name: &str) -> Result<Vec<RawCountryRecord>>;

    /// Common names of every country the service knows about.
    fn list_all_names(&self) -> Result<Vec<String>>;
}

/// One country as the service returns it. Only the fields we read are
/// declared; everything that can be missing for territories is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawCountryRecord {
    pub name: CountryName,
    pub population: u64,
    #[serde(default)]
    pub capital: Vec<String>,
    pub subregion: Option<String>,
    #[serde(default)]
    pub region: String,
    pub languages: Option<BTreeMap<String, String>>,
    pub currencies: Option<BTreeMap<String, CurrencyInfo>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CountryName {
    pub common: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CurrencyInfo {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// Body of `/all?fields=name`.
#[derive(Debug, Deserialize)]
struct NameOnly {
    name: CountryName,
}

/// The service's not-found payload: `{"status":404,"message":"Not Found"}`.
#[derive(Debug, Deserialize)]
struct ApiStatus {
    status: u16,
    #[serde(default)]
    message: String,
}

/// Blocking client for the REST Countries API.
#[derive(Clone)]
pub struct CountryClient {
    client: Client,
    base_url: String,
}

impl CountryClient {
    /// Build a client from the loaded configuration (base URL and timeout).
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .build()?;
        Ok(CountryClient {
            client,
            base_url: config.countries_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_text(&self, url: &str) -> Result<(u16, String)> {
        debug!(%url, "GET");
        let res = self.client.get(url).send()?;
        let status = res.status().as_u16();
        let body = res.text()?;
        Ok((status, body))
    }
}

impl CountrySource for CountryClient {
    fn lookup(&self, name: &str) -> Result<Vec<RawCountryRecord>> {
        let url = format!("{}/name/{}", &self.base_url, urlencoding::encode(name));
        let (status, body) = self.get_text(&url)?;
        parse_lookup_body(name, status, &body)
    }

    fn list_all_names(&self) -> Result<Vec<String>> {
        let url = format!("{}/all?fields=name", &self.base_url);
        let (status, body) = self.get_text(&url)?;
        if !(200..300).contains(&status) {
            return Err(Error::Api { status, body });
        }
        let names: Vec<NameOnly> =
            serde_json::from_str(&body).map_err(|e| Error::Parse(e.to_string()))?;
        Ok(names.into_iter().map(|n| n.name.common).collect())
    }
}

/// Interpret a name-search response. A 404 status, the service's status
/// payload carrying 404, or an empty list all mean "no such country".
pub fn parse_lookup_body(query: &str, status: u16, body: &str) -> Result<Vec<RawCountryRecord>> {
    if status == 404 {
        return Err(Error::NotFound(query.to_string()));
    }
    if let Ok(payload) = serde_json::from_str::<ApiStatus>(body) {
        if payload.status == 404 {
            return Err(Error::NotFound(query.to_string()));
        }
        return Err(Error::Api {
            status: payload.status,
            body: payload.message,
        });
    }
    if !(200..300).contains(&status) {
        return Err(Error::Api {
            status,
            body: body.to_string(),
        });
    }

    let records: Vec<RawCountryRecord> =
        serde_json::from_str(body).map_err(|e| Error::Parse(e.to_string()))?;
    if records.is_empty() {
        return Err(Error::NotFound(query.to_string()));
    }
    Ok(records)
}
