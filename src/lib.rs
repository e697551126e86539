// Library root
// -----------
// The binary (`main.rs`) loads the configuration, builds the two HTTP
// clients and hands them to the interactive loop in `ui`.
//
// Module responsibilities:
// - `api`: REST Countries lookups (name search, list of all names).
// - `excerpt`: Wikivoyage excerpt for a country's canonical name.
// - `country`: picking one entry from a lookup and normalizing it.
// - `visit`: plausibility check for visit years.
// - `session`: the visit log and wishlist collected during a run.
// - `storage`: the CSV files written when the run ends.
// - `prompt`: console abstraction and yes/no matching.
// - `ui`: the search loop tying it all together.
pub mod api;
pub mod config;
pub mod country;
pub mod error;
pub mod excerpt;
pub mod prompt;
pub mod session;
pub mod storage;
pub mod ui;
pub mod visit;

#[cfg(test)]
mod test_utils;
