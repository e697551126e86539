// Shared fixtures for unit tests: raw records, a scripted console and
// in-memory stand-ins for the two HTTP services.

use crate::api::{CountryName, CountrySource, CurrencyInfo, RawCountryRecord};
use crate::error::{Error, Result};
use crate::excerpt::ExcerptSource;
use crate::prompt::Console;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Inhabited country with the given language codes and one currency.
/// Languages are named "<CODE> language"; the currency "<CODE> currency" with
/// symbol "$".
pub fn country(name: &str, languages: &[&str], currency: &str) -> RawCountryRecord {
    let languages = languages
        .iter()
        .map(|code| (code.to_string(), format!("{} language", code.to_uppercase())))
        .collect();
    let mut currencies = BTreeMap::new();
    currencies.insert(
        currency.to_string(),
        CurrencyInfo {
            name: Some(format!("{} currency", currency)),
            symbol: Some("$".into()),
        },
    );
    RawCountryRecord {
        name: CountryName {
            common: name.to_string(),
        },
        population: 1_000_000,
        capital: vec![format!("{} City", name)],
        subregion: Some("Western Europe".into()),
        region: "Europe".into(),
        languages: Some(languages),
        currencies: Some(currencies),
    }
}

/// Uninhabited territory: no capital, languages or currencies.
pub fn territory(name: &str) -> RawCountryRecord {
    RawCountryRecord {
        name: CountryName {
            common: name.to_string(),
        },
        population: 0,
        capital: Vec::new(),
        subregion: None,
        region: "Antarctic".into(),
        languages: None,
        currencies: None,
    }
}

/// Console fed from a fixed list of answers. Records every prompt and
/// every printed line.
#[derive(Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn printed(&self, line: &str) -> bool {
        self.output.iter().any(|l| l == line)
    }

    pub fn unused_answers(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("script ran out of answers at '{}'", prompt),
            ))
        })
    }

    fn show(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}

/// Failure key for `list_all_names` in [`FakeCountries::failing`].
pub const ALL_NAMES: &str = "/all";

/// A real connection-refused error from reqwest. Nothing listens on port 1.
pub fn connect_error() -> Error {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .expect("client builds");
    match client.get("http://127.0.0.1:1").send() {
        Err(e) => Error::Http(e),
        Ok(_) => panic!("unexpected listener on 127.0.0.1:1"),
    }
}

pub fn server_error() -> Error {
    Error::Api {
        status: 500,
        body: "Internal Server Error".into(),
    }
}

/// Country service backed by a map from lowercased query to results.
#[derive(Default)]
pub struct FakeCountries {
    results: HashMap<String, Vec<RawCountryRecord>>,
    names: Vec<String>,
    failures: RefCell<HashMap<String, (usize, fn() -> Error)>>,
    pub calls: Cell<usize>,
}

impl FakeCountries {
    pub fn with(mut self, query: &str, records: Vec<RawCountryRecord>) -> Self {
        for record in &records {
            self.names.push(record.name.common.clone());
        }
        self.results.insert(query.to_lowercase(), records);
        self
    }

    /// Make the next `times` calls for `query` fail with `make_error()`.
    /// Use [`ALL_NAMES`] to fail `list_all_names`.
    pub fn failing(self, query: &str, times: usize, make_error: fn() -> Error) -> Self {
        self.failures
            .borrow_mut()
            .insert(query.to_lowercase(), (times, make_error));
        self
    }

    fn injected_failure(&self, key: &str) -> Option<Error> {
        self.calls.set(self.calls.get() + 1);
        let mut failures = self.failures.borrow_mut();
        let (remaining, make_error) = failures.get_mut(key)?;
        if *remaining == 0 {
            return None;
        }
        *remaining -= 1;
        Some((*make_error)())
    }
}

impl CountrySource for FakeCountries {
    fn lookup(&self, name: &str) -> Result<Vec<RawCountryRecord>> {
        if let Some(e) = self.injected_failure(&name.to_lowercase()) {
            return Err(e);
        }
        self.results
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn list_all_names(&self) -> Result<Vec<String>> {
        if let Some(e) = self.injected_failure(ALL_NAMES) {
            return Err(e);
        }
        Ok(self.names.clone())
    }
}

#[derive(Default)]
pub struct FakeExcerpts {
    pub missing: bool,
}

impl ExcerptSource for FakeExcerpts {
    fn fetch_excerpt(&self, canonical_name: &str) -> Result<Option<String>> {
        if self.missing {
            return Ok(None);
        }
        Ok(Some(format!("{} is worth a visit", canonical_name)))
    }
}
