use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Hazard classification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FilterMode {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "hazardous")]
    HazardousOnly,
    #[serde(rename = "safe")]
    SafeOnly,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::HazardousOnly => "hazardous",
            FilterMode::SafeOnly => "safe",
        }
    }

    /// Whether an object with the given hazard flag passes this filter
    pub fn accepts(&self, is_hazardous: bool) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::HazardousOnly => is_hazardous,
            FilterMode::SafeOnly => !is_hazardous,
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "hazardous" | "hazardous_only" => Ok(FilterMode::HazardousOnly),
            "safe" | "safe_only" => Ok(FilterMode::SafeOnly),
            _ => Err(format!("Unknown filter mode: {}", s)),
        }
    }
}

/// Ordering criterion, evaluated on each object's first close approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortKey {
    /// Approach timestamp, earliest first
    #[default]
    #[serde(rename = "date")]
    Date,
    /// Miss distance, nearest first
    #[serde(rename = "distance")]
    Distance,
    /// Relative velocity, fastest first
    #[serde(rename = "speed")]
    Speed,
    /// Maximum estimated diameter, largest first
    #[serde(rename = "size")]
    Size,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Distance => "distance",
            SortKey::Speed => "speed",
            SortKey::Size => "size",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "distance" => Ok(SortKey::Distance),
            "speed" => Ok(SortKey::Speed),
            "size" => Ok(SortKey::Size),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

/// Feed time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DateRange {
    #[default]
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "week")]
    Week,
}

impl DateRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Today => "today",
            DateRange::Week => "week",
        }
    }

    /// Inclusive `(start, end)` window starting at `today`.
    ///
    /// `Week` spans seven calendar days, so the end date is six days later.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            DateRange::Today => (today, today),
            DateRange::Week => {
                let end = today.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
                (today, end)
            }
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            _ => Err(format!("Unknown date range: {}", s)),
        }
    }
}
