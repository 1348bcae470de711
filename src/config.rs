//! Construction-time settings of a [crate::CarminClient].

use crate::constants::{DEFAULT_API_KEY, DEFAULT_API_URL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings for [crate::CarminClient::new].
///
/// The [Default] points to the public VIP instance with a placeholder key,
/// verifying its certificate against the built-in root certificates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Credential sent in the `apikey` header of every request.
    pub api_key: String,
    /// REST root, used as the prefix of every endpoint.
    pub api_url: String,
    /// CA bundle trusted in addition to the built-in roots. If the path is
    /// not a file, certificates are not verified.
    pub certificate_path: Option<PathBuf>,
    /// Request timeout. By default requests wait forever.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            certificate_path: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_api_key(self, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_api_url(self, api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_certificate(self, path: impl Into<PathBuf>) -> Self {
        Self {
            certificate_path: Some(path.into()),
            ..self
        }
    }

    /// Verify with the built-in root certificates only.
    #[must_use]
    pub fn without_certificate(self) -> Self {
        Self {
            certificate_path: None,
            ..self
        }
    }

    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "https://vip.creatis.insa-lyon.fr/rest/");
        assert_eq!(config.api_key, "TheApiKey");
        assert_eq!(config.certificate_path, None);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::default()
            .with_api_key("secret")
            .with_api_url("http://localhost:8080/rest/")
            .without_certificate()
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.api_url, "http://localhost:8080/rest/");
        assert_eq!(config.certificate_path, None);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_key": "secret", "certificate_path": "/etc/ssl/vip.crt"}"#)
                .unwrap();
        assert_eq!(
            config,
            ClientConfig::default()
                .with_api_key("secret")
                .with_certificate("/etc/ssl/vip.crt")
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let config = ClientConfig::default().with_timeout(Duration::from_millis(1500));
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<ClientConfig>(&json).unwrap(), config);
    }
}
