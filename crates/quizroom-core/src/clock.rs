use chrono::{Local, NaiveDate};

/// Source of calendar dates for leaderboard entries.
///
/// The quiz engine itself never reads a clock; only the session controller
/// stamps completed runs, and tests pin the date with [`Clock::Fixed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(NaiveDate),
}

impl Clock {
    #[must_use]
    pub fn fixed(date: NaiveDate) -> Self {
        Self::Fixed(date)
    }

    /// Today's date in the local timezone, or the pinned date.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}
