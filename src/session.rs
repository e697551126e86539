// Everything the user decided during one run: countries visited and
// countries wished for. Built once in `ui::SearchLoop`, written out once at
// the end by `flush`.

use crate::country::NormalizedCountry;
use crate::error::Result;
use crate::storage::{self, OutputPaths};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitEntry {
    pub country: String,
    /// Four-digit year of the most recent visit, as typed.
    pub year: String,
    pub memory: String,
    /// Always at least 1.
    pub times_visited: u32,
}

/// A wishlist row is the normalized country itself; languages and currency
/// are already merged into it.
pub type WishlistEntry = NormalizedCountry;

/// Append-only visit log and wishlist for one session. Duplicates across
/// searches are kept.
#[derive(Debug, Default)]
pub struct SessionAccumulator {
    visits: Vec<VisitEntry>,
    wishlist: Vec<WishlistEntry>,
}

impl SessionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_visit(&mut self, country: &str, year: &str, memory: &str, times_visited: u32) {
        debug_assert!(times_visited >= 1);
        self.visits.push(VisitEntry {
            country: country.to_string(),
            year: year.to_string(),
            memory: memory.to_string(),
            times_visited,
        });
    }

    pub fn record_wishlist(&mut self, country: NormalizedCountry) {
        self.wishlist.push(country);
    }

    pub fn visits(&self) -> &[VisitEntry] {
        &self.visits
    }

    pub fn wishlist(&self) -> &[WishlistEntry] {
        &self.wishlist
    }

    /// Write the wishlist (truncating) and append the visits. Consumes the
    /// session so it cannot be flushed twice.
    pub fn flush(self, paths: &OutputPaths) -> Result<()> {
        storage::write_wishlist(&paths.wishlist, &self.wishlist)?;
        storage::append_travels(&paths.travels, &self.visits)?;
        info!(
            visits = self.visits.len(),
            wishlist = self.wishlist.len(),
            "session flushed"
        );
        Ok(())
    }
}
