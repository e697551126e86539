// Turning a free-text query and the service's raw answer into one canonical
// country record: pick the right entry (disambiguation), then flatten it with
// "N/A" standing in for anything the service leaves out.

use crate::api::RawCountryRecord;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Placeholder for fields a country does not have (e.g. no capital).
pub const NOT_AVAILABLE: &str = "N/A";

/// Queries whose wanted country is not the service's first hit. Searching
/// "georgia" lists South Georgia first; the country is the second entry.
const HOMONYMS: &[(&str, usize)] = &[("georgia", 1)];

/// Queries matching two sibling countries told apart by north/south.
/// The service lists the northern one first.
const NORTH_SOUTH: &[&str] = &["korea"];

pub const QUALIFIER_PROMPT: &str = "North, or South? ";

/// How to pick one entry out of a multi-result lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disambiguation {
    /// Use this index without asking.
    Index(usize),
    /// Ask the user for a north/south qualifier, then use [`qualifier_index`].
    AskQualifier,
}

/// Rule for a lowercased query.
pub fn disambiguate(query: &str) -> Disambiguation {
    if let Some((_, index)) = HOMONYMS.iter().find(|(name, _)| *name == query) {
        return Disambiguation::Index(*index);
    }
    if NORTH_SOUTH.contains(&query) {
        return Disambiguation::AskQualifier;
    }
    Disambiguation::Index(0)
}

/// "south" (any case) picks the second entry; any other answer the first.
pub fn qualifier_index(answer: &str) -> usize {
    if answer.trim().eq_ignore_ascii_case("south") {
        1
    } else {
        0
    }
}

/// Entry at `index`, or the first entry when the service returned fewer
/// results than the rule expects.
pub fn select(records: &[RawCountryRecord], index: usize) -> Option<&RawCountryRecord> {
    records.get(index).or_else(|| records.first())
}

/// Official language codes, uppercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Languages {
    NotAvailable,
    One(String),
    Many(BTreeSet<String>),
}

impl fmt::Display for Languages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Languages::NotAvailable => f.write_str(NOT_AVAILABLE),
            Languages::One(code) => f.write_str(code),
            Languages::Many(codes) => {
                let joined: Vec<&str> = codes.iter().map(String::as_str).collect();
                f.write_str(&joined.join(", "))
            }
        }
    }
}

impl Serialize for Languages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Canonical, flat view of one country. Every field is filled; missing data
/// shows up as [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedCountry {
    #[serde(rename = "Country")]
    pub name: String,
    #[serde(rename = "Capital City")]
    pub capital: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Population")]
    pub population: u64,
    #[serde(rename = "Official Languages")]
    pub languages: Languages,
    #[serde(rename = "Currency")]
    pub currency: String,
}

impl NormalizedCountry {
    /// The four headline fields, in display order.
    pub fn summary(&self) -> [(&'static str, String); 4] {
        [
            ("Country", self.name.clone()),
            ("Capital City", self.capital.clone()),
            ("Region", self.region.clone()),
            ("Population", self.population.to_string()),
        ]
    }
}

/// Language and currency details shown on request. Only exists when the
/// record carries both maps; territories without them get none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FurtherInfo {
    /// Full language names.
    pub languages: Vec<String>,
    /// Currencies as "CODE (Name, symbol)".
    pub currencies: Vec<String>,
}

pub fn further_info(raw: &RawCountryRecord) -> Option<FurtherInfo> {
    let languages = raw.languages.as_ref().filter(|m| !m.is_empty())?;
    let currencies = raw.currencies.as_ref().filter(|m| !m.is_empty())?;

    let currencies = currencies
        .iter()
        .map(|(code, info)| {
            let details: Vec<&str> = [info.name.as_deref(), info.symbol.as_deref()]
                .into_iter()
                .flatten()
                .collect();
            if details.is_empty() {
                code.clone()
            } else {
                format!("{} ({})", code, details.join(", "))
            }
        })
        .collect();

    Some(FurtherInfo {
        languages: languages.values().cloned().collect(),
        currencies,
    })
}

pub fn normalize(raw: &RawCountryRecord) -> NormalizedCountry {
    let capital = raw
        .capital
        .first()
        .cloned()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let region = raw.subregion.clone().unwrap_or_else(|| raw.region.clone());

    let (languages, currency) = if further_info(raw).is_some() {
        (language_codes(raw), currency_code(raw))
    } else {
        (Languages::NotAvailable, NOT_AVAILABLE.to_string())
    };

    NormalizedCountry {
        name: raw.name.common.clone(),
        capital,
        region,
        population: raw.population,
        languages,
        currency,
    }
}

fn language_codes(raw: &RawCountryRecord) -> Languages {
    let mut codes: BTreeSet<String> = raw
        .languages
        .iter()
        .flat_map(|m| m.keys())
        .map(|code| code.to_uppercase())
        .collect();
    match codes.len() {
        0 => Languages::NotAvailable,
        1 => Languages::One(codes.pop_first().unwrap_or_default()),
        _ => Languages::Many(codes),
    }
}

// The service lists at most one currency per country.
fn currency_code(raw: &RawCountryRecord) -> String {
    raw.currencies
        .as_ref()
        .and_then(|m| m.keys().next().cloned())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
