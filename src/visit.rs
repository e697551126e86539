// Plausibility check for a user-reported visit year.

/// Longest lifespan we accept: anything further back than this cannot have
/// been visited by someone alive today.
pub const MAX_LIFESPAN_YEARS: i32 = 117;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearVerdict {
    Accepted,
    /// The year is after the current one.
    Future,
    /// The year is more than [`MAX_LIFESPAN_YEARS`] ago.
    Implausible,
    /// Not a four-digit year.
    Malformed,
}

impl YearVerdict {
    pub fn is_accepted(self) -> bool {
        self == YearVerdict::Accepted
    }

    /// Line shown to the user for this verdict.
    pub fn message(self, current_year: i32) -> String {
        match self {
            YearVerdict::Accepted => "Added to past travels".to_string(),
            YearVerdict::Future => "You haven't been there yet!".to_string(),
            YearVerdict::Implausible => format!(
                "That's impossible! The oldest person alive was born in {}!",
                current_year - MAX_LIFESPAN_YEARS
            ),
            YearVerdict::Malformed => "Please enter a four-digit year.".to_string(),
        }
    }
}

/// Judge `candidate` against `current_year`.
///
/// The future check compares the century halves first and the year-within-
/// century halves second, so "2031" against 2026 is future because 20 == 20
/// and 31 > 26. The lifespan check runs only if the year is not in the future.
pub fn validate_year(candidate: &str, current_year: i32) -> YearVerdict {
    let candidate = candidate.trim();
    let Some((century, within)) = split_year(candidate) else {
        return YearVerdict::Malformed;
    };
    let Some((now_century, now_within)) = split_year(&format!("{:04}", current_year)) else {
        return YearVerdict::Malformed;
    };

    if century > now_century || (century == now_century && within > now_within) {
        return YearVerdict::Future;
    }

    let year = century * 100 + within;
    if current_year - year > MAX_LIFESPAN_YEARS {
        return YearVerdict::Implausible;
    }
    YearVerdict::Accepted
}

fn split_year(year: &str) -> Option<(i32, i32)> {
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let century = year[..2].parse().ok()?;
    let within = year[2..].parse().ok()?;
    Some((century, within))
}
