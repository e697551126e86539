// Output files written at the end of a session:
// - `<name>_wishlist.csv`, recreated every run
// - `<name>_travels.csv`, appended to every run (header included each time)

use crate::error::Result;
use crate::session::{VisitEntry, WishlistEntry};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub const WISHLIST_HEADER: [&str; 6] = [
    "Country",
    "Capital City",
    "Region",
    "Population",
    "Official Languages",
    "Currency",
];

/// Leading empty cell is the index column's header.
pub const TRAVELS_HEADER: [&str; 5] = [
    "",
    "Country",
    "Year Visited (most recent)",
    "Times Visited",
    "Favourite Memory",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub wishlist: PathBuf,
    pub travels: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: &Path, user_name: &str) -> Self {
        let stem = file_stem(user_name);
        OutputPaths {
            wishlist: dir.join(format!("{}_wishlist.csv", stem)),
            travels: dir.join(format!("{}_travels.csv", stem)),
        }
    }
}

/// File-name form of the user's display name: spaces become underscores.
pub fn file_stem(user_name: &str) -> String {
    let trimmed = user_name.trim();
    if trimmed.is_empty() {
        "traveller".to_string()
    } else {
        trimmed.replace(' ', "_")
    }
}

pub fn write_wishlist(path: &Path, entries: &[WishlistEntry]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(WISHLIST_HEADER)?;
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn append_travels(path: &Path, entries: &[VisitEntry]) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(TRAVELS_HEADER)?;
    for (index, visit) in entries.iter().enumerate() {
        writer.write_record([
            index.to_string(),
            visit.country.clone(),
            visit.year.clone(),
            visit.times_visited.to_string(),
            visit.memory.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::normalize;
    use crate::test_utils::{country, territory};

    fn visit(country: &str, year: &str, memory: &str, times: u32) -> VisitEntry {
        VisitEntry {
            country: country.into(),
            year: year.into(),
            memory: memory.into(),
            times_visited: times,
        }
    }

    #[test]
    fn stem_replaces_spaces() {
        assert_eq!(file_stem("Ada Lovelace"), "Ada_Lovelace");
        assert_eq!(file_stem("  "), "traveller");
    }

    #[test]
    fn wishlist_rows_follow_header_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.csv");
        let mut swiss = country("Switzerland", &["fra", "deu"], "CHF");
        swiss.capital = vec!["Bern".into()];
        let entries = vec![
            normalize(&swiss),
            normalize(&territory("Heard Island")),
        ];

        write_wishlist(&path, &entries).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), WISHLIST_HEADER.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].iter().collect::<Vec<_>>(),
            vec!["Switzerland", "Bern", "Western Europe", "1000000", "DEU, FRA", "CHF"]
        );
        assert_eq!(&rows[1][1], "N/A");
        assert_eq!(&rows[1][5], "N/A");
    }

    #[test]
    fn wishlist_is_truncated_each_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.csv");
        write_wishlist(&path, &[normalize(&country("Japan", &["jpn"], "JPY"))]).unwrap();
        write_wishlist(&path, &[]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), WISHLIST_HEADER.join(","));
    }

    #[test]
    fn travels_are_appended_with_index_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        append_travels(&path, &[visit("Italy", "2018", "Gelato, obviously", 1)]).unwrap();
        append_travels(&path, &[visit("Peru", "2022", "Machu Picchu", 2)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                ",Country,Year Visited (most recent),Times Visited,Favourite Memory",
                "0,Italy,2018,1,\"Gelato, obviously\"",
                ",Country,Year Visited (most recent),Times Visited,Favourite Memory",
                "0,Peru,2022,2,Machu Picchu",
            ]
        );
    }
}
