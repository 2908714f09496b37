//! Connection configuration for the search service.

use url::Url;

use crate::errors::SearchIndexError;

/// Default search service host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default search service port.
pub const DEFAULT_PORT: u16 = 8989;

/// Default URL scheme.
pub const DEFAULT_SCHEME: &str = "http";

/// Default basic-auth user.
pub const DEFAULT_USERNAME: &str = "elastic";

/// Default basic-auth password.
pub const DEFAULT_PASSWORD: &str = "elastic";

/// Connection parameters for the search service.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// `http` or `https`.
    pub scheme: String,
    /// Basic-auth user. `None` disables authentication.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: String,
    /// Ask the service to refresh after writes so they are visible to the next read.
    pub refresh: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            scheme: DEFAULT_SCHEME.to_string(),
            username: Some(DEFAULT_USERNAME.to_string()),
            password: DEFAULT_PASSWORD.to_string(),
            refresh: true,
        }
    }
}

impl ConnectionConfig {
    /// Build the base URL of the service.
    pub fn url(&self) -> Result<Url, SearchIndexError> {
        if self.scheme != "http" && self.scheme != "https" {
            return Err(SearchIndexError::connection(format!(
                "Unsupported scheme '{}'",
                self.scheme
            )));
        }

        Url::parse(&format!("{}://{}:{}", self.scheme, self.host, self.port))
            .map_err(|e| SearchIndexError::connection(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let config = ConnectionConfig::default();
        assert_eq!(config.url().unwrap().as_str(), "http://localhost:8989/");
    }

    #[test]
    fn test_rejects_unknown_scheme() {
        let config = ConnectionConfig {
            scheme: "ftp".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.url(),
            Err(SearchIndexError::ConnectionError(_))
        ));
    }

    #[test]
    fn test_https_url() {
        let config = ConnectionConfig {
            host: "search.internal".to_string(),
            port: 443,
            scheme: "https".to_string(),
            ..Default::default()
        };
        assert_eq!(config.url().unwrap().host_str(), Some("search.internal"));
    }
}
