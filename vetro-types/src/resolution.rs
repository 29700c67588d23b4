use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::VetroError;

/// Sampling granularity of a time series.
///
/// The wire strings are part of the upstream contract, as is the per-resolution
/// cap on how many days a single bulk page may cover (callers need it to size
/// requests when pagination is disabled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Resolution {
    /// 10-minute cadence (`10m`).
    #[serde(rename = "10m")]
    TenMinutes,
    /// Hourly cadence (`1h`).
    #[serde(rename = "1h")]
    OneHour,
    /// Daily cadence (`24h`).
    #[default]
    #[serde(rename = "24h")]
    OneDay,
    /// Weekly cadence (`1w`).
    #[serde(rename = "1w")]
    OneWeek,
    /// Monthly cadence (`1month`).
    #[serde(rename = "1month")]
    OneMonth,
}

impl Resolution {
    /// All resolutions the bulk endpoints accept.
    pub const ALL: [Self; 5] = [
        Self::TenMinutes,
        Self::OneHour,
        Self::OneDay,
        Self::OneWeek,
        Self::OneMonth,
    ];

    /// The wire string for this resolution.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TenMinutes => "10m",
            Self::OneHour => "1h",
            Self::OneDay => "24h",
            Self::OneWeek => "1w",
            Self::OneMonth => "1month",
        }
    }

    /// Maximum timerange in days a single bulk page may cover.
    #[must_use]
    pub const fn max_days(self) -> u32 {
        match self {
            Self::TenMinutes | Self::OneHour => 10,
            Self::OneDay => 31,
            Self::OneWeek | Self::OneMonth => 93,
        }
    }

    /// Maximum timerange in seconds a single bulk page may cover.
    #[must_use]
    pub const fn max_window_secs(self) -> i64 {
        self.max_days() as i64 * 86_400
    }

    /// Nominal seconds between two observations at this cadence.
    ///
    /// Months are approximated as 30 days; the value is only used to derive a
    /// `since` timestamp that yields a requested number of points.
    #[must_use]
    pub const fn step_secs(self) -> i64 {
        match self {
            Self::TenMinutes => 600,
            Self::OneHour => 3_600,
            Self::OneDay => 86_400,
            Self::OneWeek => 604_800,
            Self::OneMonth => 2_592_000,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = VetroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "10m" => Ok(Self::TenMinutes),
            "1h" => Ok(Self::OneHour),
            "24h" => Ok(Self::OneDay),
            "1w" => Ok(Self::OneWeek),
            "1month" => Ok(Self::OneMonth),
            other => Err(VetroError::config(format!(
                "unknown resolution '{other}' (expected one of 10m, 1h, 24h, 1w, 1month)"
            ))),
        }
    }
}
