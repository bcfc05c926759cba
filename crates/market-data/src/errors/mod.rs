//! Error types for the market data crate.
//!
//! Only the gateway boundary produces errors. Normalization, path resolution
//! and formatting never fail: a document that does not match any known shape
//! simply yields empty output.

use thiserror::Error;

/// Errors that can occur while fetching raw provider documents.
///
/// The type is `Clone` so that a single in-flight fetch can be shared between
/// several waiters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The credential for a provider is not configured.
    /// Raised before any network call is attempted.
    #[error("Missing {env_var}")]
    MissingCredential {
        /// The provider that has no credential
        provider: String,
        /// The environment variable expected to carry the credential
        env_var: &'static str,
    },

    /// The provider name is not one the gateway knows about.
    #[error("Unsupported provider")]
    UnsupportedProvider(String),

    /// The upstream provider rate limited the request (HTTP 429).
    #[error("Rate limit exceeded")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred (bad URL, unreadable body, ...).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(String),
}

impl MarketDataError {
    /// Whether this is the distinguished upstream rate-limit condition.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Whether this is a configuration problem rather than a fetch failure.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential { .. } | Self::UnsupportedProvider(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_display() {
        let error = MarketDataError::MissingCredential {
            provider: "alphaVantage".to_string(),
            env_var: "ALPHA_VANTAGE_API_KEY",
        };
        assert_eq!(error.to_string(), "Missing ALPHA_VANTAGE_API_KEY");
        assert!(error.is_configuration());
        assert!(!error.is_rate_limited());
    }

    #[test]
    fn test_rate_limited_is_distinguished() {
        let error = MarketDataError::RateLimited {
            provider: "finnhub".to_string(),
        };
        assert!(error.is_rate_limited());
        assert!(!error.is_configuration());
        assert_eq!(error.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::ProviderError {
            provider: "finnhub".to_string(),
            message: "HTTP 500".to_string(),
        };
        assert_eq!(error.to_string(), "Provider error: finnhub - HTTP 500");

        let error = MarketDataError::Network("connection refused".to_string());
        assert_eq!(error.to_string(), "Network error: connection refused");

        let error = MarketDataError::UnsupportedProvider("yahoo".to_string());
        assert_eq!(error.to_string(), "Unsupported provider");
    }
}
