use chrono::Local;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Represents a `YYYY-MM` month key, for example `2025-08`.
///
/// This is the join key between limit rows and transaction dates: a
/// transaction belongs to a month when its ISO date string starts with the
/// month key. Matching is exact string equality on the key itself.
#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthKey(String);

impl MonthKey {
    /// The current month in local time.
    pub fn current() -> Self {
        Self(Local::now().format("%Y-%m").to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// True if the ISO `YYYY-MM-DD` date string falls inside this month.
    pub fn contains_date(&self, date: &str) -> bool {
        date.starts_with(self.0.as_str())
    }

    /// A human heading for the month, e.g. `August 2025`.
    pub fn name(&self) -> String {
        if self.0.len() != 7 {
            return self.0.clone();
        }
        let year = &self.0[..4];
        let month: usize = self.0[5..].parse().unwrap_or(0);
        let names = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        match names.get(month.wrapping_sub(1)) {
            Some(name) => format!("{name} {year}"),
            None => self.0.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MonthKeyError(String);

impl Display for MonthKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for MonthKeyError {}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid = s.len() == 7
            && s.as_bytes()[4] == b'-'
            && s[..4].chars().all(|c| c.is_ascii_digit())
            && matches!(s[5..].parse::<u32>(), Ok(m) if (1..=12).contains(&m));
        if !valid {
            return Err(MonthKeyError(format!(
                "A month key must look like YYYY-MM, got '{s}'"
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Today as an ISO `YYYY-MM-DD` date string, the format the Date column uses.
pub(crate) fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
