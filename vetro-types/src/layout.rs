use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::VetroError;

/// Output layout for reshaped bulk data.
///
/// The three layouts are mutually exclusive and chosen per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulkLayout {
    /// One table: rows per timestamp, one column per (asset, series-key) pair.
    #[default]
    #[serde(rename = "wide")]
    Wide,
    /// One table per asset; columns are the series keys seen across the input.
    #[serde(rename = "by-asset")]
    ByAsset,
    /// One table per series key; columns are the assets seen across the input.
    #[serde(rename = "by-series-key")]
    BySeriesKey,
}

impl BulkLayout {
    /// The canonical name of this layout.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wide => "wide",
            Self::ByAsset => "by-asset",
            Self::BySeriesKey => "by-series-key",
        }
    }
}

impl fmt::Display for BulkLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkLayout {
    type Err = VetroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wide" => Ok(Self::Wide),
            "by-asset" => Ok(Self::ByAsset),
            "by-series-key" => Ok(Self::BySeriesKey),
            other => Err(VetroError::config(format!(
                "unknown bulk layout '{other}' (expected wide, by-asset, or by-series-key)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trip() {
        for layout in [BulkLayout::Wide, BulkLayout::ByAsset, BulkLayout::BySeriesKey] {
            assert_eq!(layout.as_str().parse::<BulkLayout>().unwrap(), layout);
        }
    }

    #[test]
    fn unknown_layout_is_config_error() {
        assert!(matches!(
            "long".parse::<BulkLayout>().unwrap_err(),
            VetroError::Config(_)
        ));
    }
}
