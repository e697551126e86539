// UI layer: the interactive search loop. Each search goes
// lookup -> pick one entry -> normalize -> show -> visited? -> wishlist?
// and everything the user records is written out once, when they stop.

use crate::api::{CountrySource, RawCountryRecord};
use crate::config::Config;
use crate::country::{
    disambiguate, further_info, normalize, qualifier_index, select, Disambiguation,
    NormalizedCountry, QUALIFIER_PROMPT,
};
use crate::error::{Error, Result};
use crate::excerpt::ExcerptSource;
use crate::prompt::{is_affirmative, Console};
use crate::session::SessionAccumulator;
use crate::storage::OutputPaths;
use crate::visit::validate_year;
use chrono::Datelike;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

pub const NOT_FOUND_MESSAGE: &str = "Error. Please enter a country name.";
pub const UNAVAILABLE_MESSAGE: &str =
    "The country service could not answer that search. Please try again later.";

/// What happened to one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    NotFound,
    /// The service answered with an error or an unreadable body.
    Unavailable,
    Visited,
    Wishlisted,
    Skipped,
}

/// Greet the user, run searches until they stop, then write their files.
/// Blocks until the session is over.
pub fn run_session<C, S, E>(mut console: C, countries: S, excerpts: E, config: &Config) -> Result<()>
where
    C: Console,
    S: CountrySource,
    E: ExcerptSource,
{
    let user_name = console.ask("Hello! What's your name? ")?;
    console.show(&format!(
        "Welcome {}!\nLooking for a new place to go? Search for country information here!",
        user_name.trim()
    ));
    console.show("Please note - if searching for somewhere in the UK, please specify 'United Kingdom' or 'GB'");

    let paths = OutputPaths::new(&config.output_dir, &user_name);
    let current_year = chrono::Local::now().year();
    SearchLoop::new(console, countries, excerpts, current_year).run(&paths)
}

pub struct SearchLoop<C, S, E> {
    console: C,
    countries: S,
    excerpts: E,
    session: SessionAccumulator,
    current_year: i32,
    rng: StdRng,
}

impl<C, S, E> SearchLoop<C, S, E>
where
    C: Console,
    S: CountrySource,
    E: ExcerptSource,
{
    pub fn new(console: C, countries: S, excerpts: E, current_year: i32) -> Self {
        SearchLoop {
            console,
            countries,
            excerpts,
            session: SessionAccumulator::new(),
            current_year,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed random source for suggestions.
    #[cfg(test)]
    pub(crate) fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &SessionAccumulator {
        &self.session
    }

    /// Keep offering searches until the user stops, then flush the session.
    ///
    /// Each turn offers a search twice and the second answer decides whether
    /// another turn follows. Whatever was recorded is flushed even when the
    /// loop ends on an error.
    pub fn run(mut self, paths: &OutputPaths) -> Result<()> {
        let outcome = self.turns();

        let SearchLoop {
            mut console,
            session,
            ..
        } = self;
        if let Err(flush_error) = session.flush(paths) {
            if let Err(e) = &outcome {
                warn!(error = %e, "search loop failed before the session could be saved");
            }
            return Err(flush_error);
        }
        outcome?;

        console.show("Thank you for using this program!");
        Ok(())
    }

    fn turns(&mut self) -> Result<()> {
        loop {
            self.offer_search()?;
            if !self.offer_search()? {
                return Ok(());
            }
        }
    }

    /// Ask for an explicit search, then for a suggestion. Returns false when
    /// the user wants neither.
    pub fn offer_search(&mut self) -> Result<bool> {
        let answer = self.console.ask("Would you like to search for a country? y/n ")?;
        if is_affirmative(&answer) {
            let query = self.console.ask("Enter a country to search for: ")?;
            self.search(&query)?;
            return Ok(true);
        }

        let answer = self.console.ask("Would you like a suggestion? ")?;
        if is_affirmative(&answer) {
            self.suggest()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Pick a random country and search for it.
    pub fn suggest(&mut self) -> Result<SearchOutcome> {
        let names = match self.call_countries("Finding a suggestion...", |c| c.list_all_names()) {
            Ok(names) => names,
            Err(e @ (Error::Api { .. } | Error::Parse(_))) => {
                warn!(error = %e, "country list unavailable");
                self.console.error(UNAVAILABLE_MESSAGE);
                return Ok(SearchOutcome::Unavailable);
            }
            Err(e) => return Err(e),
        };
        let Some(name) = names.choose(&mut self.rng).cloned() else {
            self.console.error("No suggestions are available right now.");
            return Ok(SearchOutcome::NotFound);
        };
        self.console.show(&name);
        self.search(&name)
    }

    /// One full search: resolve, present, then offer the visit log and the
    /// wishlist, in that order. A country lands in at most one of them.
    pub fn search(&mut self, query: &str) -> Result<SearchOutcome> {
        let query = query.trim().to_lowercase();
        let raw = match self.resolve(&query)? {
            Ok(raw) => raw,
            Err(outcome) => return Ok(outcome),
        };

        let country = normalize(&raw);
        self.present(&raw, &country)?;

        if self.ask_visited(&country.name)? {
            return Ok(SearchOutcome::Visited);
        }
        if self.ask_wishlist(country)? {
            return Ok(SearchOutcome::Wishlisted);
        }
        Ok(SearchOutcome::Skipped)
    }

    /// Look the query up and pick the one entry the user means. The inner
    /// `Err` is a search that ended early; its message has been shown.
    fn resolve(
        &mut self,
        query: &str,
    ) -> Result<std::result::Result<RawCountryRecord, SearchOutcome>> {
        if query.is_empty() {
            self.console.error(NOT_FOUND_MESSAGE);
            return Ok(Err(SearchOutcome::NotFound));
        }
        let records = match self.call_countries("Searching...", |c| c.lookup(query)) {
            Ok(records) => records,
            Err(Error::NotFound(_)) => {
                self.console.error(NOT_FOUND_MESSAGE);
                return Ok(Err(SearchOutcome::NotFound));
            }
            Err(e @ (Error::Api { .. } | Error::Parse(_))) => {
                warn!(error = %e, query, "country lookup failed");
                self.console.error(UNAVAILABLE_MESSAGE);
                return Ok(Err(SearchOutcome::Unavailable));
            }
            Err(e) => return Err(e),
        };

        let index = match disambiguate(query) {
            Disambiguation::Index(index) => index,
            Disambiguation::AskQualifier => qualifier_index(&self.console.ask(QUALIFIER_PROMPT)?),
        };
        debug!(query, index, results = records.len(), "resolved");
        match select(&records, index) {
            Some(raw) => Ok(Ok(raw.clone())),
            None => {
                self.console.error(NOT_FOUND_MESSAGE);
                Ok(Err(SearchOutcome::NotFound))
            }
        }
    }

    /// Call the country service, offering a retry when it cannot be reached.
    fn call_countries<T>(&mut self, message: &str, call: impl Fn(&S) -> Result<T>) -> Result<T> {
        loop {
            let countries = &self.countries;
            match self.console.busy(message, || call(countries)) {
                Err(e) if e.is_transport() => {
                    warn!(error = %e, "country service unreachable");
                    self.console
                        .error(&format!("Could not reach the country service: {}", e));
                    let retry = self.console.ask("Would you like to try again? ")?;
                    if !is_affirmative(&retry) {
                        return Err(e);
                    }
                }
                other => return other,
            }
        }
    }

    fn present(&mut self, raw: &RawCountryRecord, country: &NormalizedCountry) -> Result<()> {
        self.show_excerpt(&country.name);

        for (label, value) in country.summary() {
            self.console.show(&format!("{}: {}", label, value));
        }

        // Territories without language/currency data skip the question.
        let Some(info) = further_info(raw) else {
            return Ok(());
        };
        let choice = self
            .console
            .ask("Would you like to know the currency or languages of this country? ")?
            .trim()
            .to_lowercase();
        let languages = info.languages.join(", ");
        let currencies = info.currencies.join(", ");
        if is_affirmative(&choice) {
            self.console.show(&format!("Official languages spoken: {}", languages));
            self.console.show(&format!("Currency: {}", currencies));
        } else if choice == "languages" {
            self.console.show(&format!("Languages spoken: {}", languages));
        } else if choice == "currency" {
            self.console.show(&format!("Currency: {}", currencies));
        }
        Ok(())
    }

    fn show_excerpt(&mut self, name: &str) {
        let excerpts = &self.excerpts;
        let fetched = self
            .console
            .busy("Fetching excerpt...", || excerpts.fetch_excerpt(name));
        match fetched {
            Ok(Some(text)) => {
                self.console.show("\nHere is an excerpt from Wikivoyage:\n");
                self.console.show(&format!("'...{}...'\n", text));
            }
            Ok(None) => self.console.show(&format!("No excerpt available for {}.", name)),
            Err(e) => {
                warn!(error = %e, country = name, "excerpt fetch failed");
                self.console.show(&format!("No excerpt available for {}.", name));
            }
        }
    }

    /// Visit path. True only when a visit was recorded; a declined question
    /// or a rejected year sends the country on to the wishlist question.
    fn ask_visited(&mut self, name: &str) -> Result<bool> {
        let answer = self.console.ask("Have you been to this country before? ")?;
        if !is_affirmative(&answer) {
            return Ok(false);
        }

        let year = self.console.ask("Which year did you go? ")?.trim().to_string();
        let verdict = validate_year(&year, self.current_year);
        if !verdict.is_accepted() {
            self.console.error(&verdict.message(self.current_year));
            return Ok(false);
        }
        self.console.success(&verdict.message(self.current_year));

        let memory = self
            .console
            .ask("What is your favourite memory from visiting this country? ")?;
        let times = self.ask_times_visited(name)?;
        self.session.record_visit(name, &year, memory.trim(), times);
        Ok(true)
    }

    /// Re-prompts until a whole number of at least 1 is given.
    fn ask_times_visited(&mut self, name: &str) -> Result<u32> {
        let prompt = format!("Please enter the number of times you have been to {}: ", name);
        loop {
            let answer = self.console.ask(&prompt)?;
            match answer.trim().parse::<u32>() {
                Ok(times) if times >= 1 => return Ok(times),
                _ => debug!(answer = answer.as_str(), "rejected visit count"),
            }
        }
    }

    fn ask_wishlist(&mut self, country: NormalizedCountry) -> Result<bool> {
        let answer = self
            .console
            .ask("Would you like to add this country to your wishlist? ")?;
        if is_affirmative(&answer) {
            self.session.record_wishlist(country);
            self.console.success("Added to wishlist");
            Ok(true)
        } else {
            self.console.show("Not added to wishlist");
            Ok(false)
        }
    }
}
