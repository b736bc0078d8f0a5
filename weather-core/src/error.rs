use std::fmt;

/// Coarse category of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    Provider,
    Schema,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchErrorKind::Network => "network",
            FetchErrorKind::Provider => "provider",
            FetchErrorKind::Schema => "schema",
        })
    }
}

/// Failure of a single fetch. Always displayable, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request could not complete (timeout, DNS, connection refused).
    #[error("network error: {0}")]
    Network(String),

    /// A response arrived but the provider reported failure or sent garbage.
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider reported success but an expected field was absent or malformed.
    #[error("unexpected response layout: {0}")]
    Schema(String),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::Provider(_) => FetchErrorKind::Provider,
            FetchError::Schema(_) => FetchErrorKind::Schema,
        }
    }

    /// Text that replaces the weather display.
    pub fn message(&self) -> String {
        format!("獲取天氣信息失敗: {self}")
    }
}

/// Startup configuration problems. These abort before any window is shown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "No API key configured.\n\
         Hint: set CWA_API_KEY or run `weather configure` and enter your key."
    )]
    MissingApiKey,

    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}
