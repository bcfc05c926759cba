use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Upstream data provider a widget is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProviderId {
    AlphaVantage,
    Finnhub,
}

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::AlphaVantage, ProviderId::Finnhub];

    /// Wire name, as used in gateway requests and persisted widgets.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::AlphaVantage => "alphaVantage",
            ProviderId::Finnhub => "finnhub",
        }
    }

    /// Human readable provider name.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderId::AlphaVantage => "Alpha Vantage",
            ProviderId::Finnhub => "Finnhub",
        }
    }

    /// Environment variable that carries the provider credential.
    pub fn credential_env(&self) -> &'static str {
        match self {
            ProviderId::AlphaVantage => "ALPHA_VANTAGE_API_KEY",
            ProviderId::Finnhub => "FINNHUB_API_KEY",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = MarketDataError;

    /// Provider names are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ProviderId::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| MarketDataError::UnsupportedProvider(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str_is_case_insensitive() {
        assert_eq!("alphaVantage".parse::<ProviderId>().unwrap(), ProviderId::AlphaVantage);
        assert_eq!("ALPHAVANTAGE".parse::<ProviderId>().unwrap(), ProviderId::AlphaVantage);
        assert_eq!(" Finnhub ".parse::<ProviderId>().unwrap(), ProviderId::Finnhub);
    }

    #[test]
    fn test_unknown_provider() {
        let err = "yahoo".parse::<ProviderId>().unwrap_err();
        assert_eq!(err, MarketDataError::UnsupportedProvider("yahoo".to_string()));
    }

    #[test]
    fn test_provider_serde_names() {
        assert_eq!(
            serde_json::to_string(&ProviderId::AlphaVantage).unwrap(),
            "\"alphaVantage\""
        );
        let p: ProviderId = serde_json::from_str("\"finnhub\"").unwrap();
        assert_eq!(p, ProviderId::Finnhub);
    }
}
